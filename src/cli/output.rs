use serde::Serialize;

use crate::model::{Board, List, Price, Sticker, SubList, format_amount};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson {
    pub lists: Vec<ListJson>,
    pub total: f64,
}

#[derive(Serialize)]
pub struct ListJson {
    pub id: String,
    pub name: String,
    pub color: String,
    pub width: u32,
    pub total: f64,
    #[serde(rename = "subLists", skip_serializing_if = "Vec::is_empty")]
    pub sub_lists: Vec<SubListJson>,
}

#[derive(Serialize)]
pub struct SubListJson {
    pub id: String,
    pub name: String,
    pub color: String,
    pub total: f64,
    pub stickers: Vec<StickerJson>,
}

#[derive(Serialize)]
pub struct StickerJson {
    pub id: String,
    pub name: String,
    /// Price as entered (number or text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<serde_json::Value>,
    pub amount: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Board with computed totals. `with_children: false` gives the list
/// summary used by `sb total`.
pub fn board_to_json(board: &Board, with_children: bool) -> BoardJson {
    BoardJson {
        lists: board
            .lists
            .iter()
            .map(|l| list_to_json(l, with_children))
            .collect(),
        total: board.total(),
    }
}

fn list_to_json(list: &List, with_children: bool) -> ListJson {
    ListJson {
        id: list.id.clone(),
        name: list.name.clone(),
        color: list.color.class_name().to_string(),
        width: list.width,
        total: list.total(),
        sub_lists: if with_children {
            list.sub_lists.iter().map(sub_list_to_json).collect()
        } else {
            Vec::new()
        },
    }
}

fn sub_list_to_json(sub: &SubList) -> SubListJson {
    SubListJson {
        id: sub.id.clone(),
        name: sub.name.clone(),
        color: sub.color.class_name().to_string(),
        total: sub.total(),
        stickers: sub.stickers.iter().map(|s| sticker_to_json(s, sub)).collect(),
    }
}

fn sticker_to_json(sticker: &Sticker, owner: &SubList) -> StickerJson {
    StickerJson {
        id: sticker.id.clone(),
        name: sticker.name.clone(),
        price: sticker
            .price
            .as_ref()
            .and_then(|p| serde_json::to_value(p).ok()),
        amount: sticker.amount(),
        color: sticker.effective_color(owner).class_name().to_string(),
        link: sticker.link.clone(),
        description: sticker.description.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `$1,200` style money formatting with thousands separators
pub fn format_money(n: f64) -> String {
    let text = format_amount(n.abs());
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if n < 0.0 { "-" } else { "" };
    match frac {
        Some(f) => format!("{}${}.{}", sign, grouped, f),
        None => format!("{}${}", sign, grouped),
    }
}

/// Indented tree of the board: lists, groups and stickers with ids and totals
pub fn format_board(board: &Board) -> Vec<String> {
    let mut lines = Vec::new();
    for list in &board.lists {
        lines.push(format!(
            "{}  {}  [{}]",
            list.name,
            format_money(list.total()),
            list.id
        ));
        for sub in &list.sub_lists {
            lines.push(format!(
                "  {} ({})  {}  [{}]",
                sub.name,
                sub.color,
                format_money(sub.total()),
                sub.id
            ));
            for st in &sub.stickers {
                lines.push(format_sticker_line(st));
            }
        }
    }
    lines.push(format!("Total: {}", format_money(board.total())));
    lines
}

fn format_sticker_line(sticker: &Sticker) -> String {
    let price = match &sticker.price {
        Some(Price::Text(s)) if s.trim().parse::<f64>().is_err() => format!("{:?}", s),
        Some(_) => format_money(sticker.amount()),
        None => "-".to_string(),
    };
    let mut line = format!("    {}  {}  [{}]", sticker.name, price, sticker.id);
    if let Some(link) = &sticker.link {
        line.push_str(&format!("  <{}>", link));
    }
    line
}

/// One line per list plus the board total
pub fn format_totals(board: &Board) -> Vec<String> {
    let width = board
        .lists
        .iter()
        .map(|l| l.name.chars().count())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<String> = board
        .lists
        .iter()
        .map(|l| format!("{:<width$}  {}", l.name, format_money(l.total()), width = width))
        .collect();
    lines.push(format!("Total: {}", format_money(board.total())));
    lines
}
