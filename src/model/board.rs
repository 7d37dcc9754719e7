use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::color::ColorTag;
use super::price::Price;

/// Default width of a list column, in pixels
pub const DEFAULT_LIST_WIDTH: u32 = 320;
pub const MIN_LIST_WIDTH: u32 = 280;
pub const MAX_LIST_WIDTH: u32 = 800;

/// The three entity kinds of the board hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    List,
    SubList,
    Sticker,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::List => write!(f, "list"),
            EntityKind::SubList => write!(f, "sub-list"),
            EntityKind::Sticker => write!(f, "sticker"),
        }
    }
}

/// The whole document: an ordered sequence of lists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    pub lists: Vec<List>,
}

/// A top-level comparison option (a column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_list_color")]
    pub color: ColorTag,
    #[serde(default = "default_width", deserialize_with = "deserialize_width")]
    pub width: u32,
    #[serde(rename = "subLists", default)]
    pub sub_lists: Vec<SubList>,
}

/// A named, colored group of stickers inside a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubList {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: ColorTag,
    #[serde(default)]
    pub stickers: Vec<Sticker>,
}

/// A priced leaf item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn default_list_color() -> ColorTag {
    ColorTag::PaleBlue
}

fn default_width() -> u32 {
    DEFAULT_LIST_WIDTH
}

/// Ids are strings, but older documents carry plain numbers.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
        RawId::Null(()) => String::new(),
    })
}

/// Widths may be fractional pixels from a resize; missing, null or zero
/// means the default.
fn deserialize_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawWidth {
        Int(i64),
        Float(f64),
        Null(()),
    }

    let px = match RawWidth::deserialize(deserializer)? {
        RawWidth::Int(n) => n as f64,
        RawWidth::Float(f) => f,
        RawWidth::Null(()) => 0.0,
    };
    let rounded = px.round();
    if rounded < 1.0 {
        return Ok(DEFAULT_LIST_WIDTH);
    }
    Ok(rounded.min(u32::MAX as f64) as u32)
}

impl Board {
    pub fn new(lists: Vec<List>) -> Self {
        Board { lists }
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Sum of all list totals
    pub fn total(&self) -> f64 {
        self.lists.iter().map(List::total).sum()
    }

    /// Number of lists, sub-lists and stickers combined
    pub fn entity_count(&self) -> usize {
        self.lists
            .iter()
            .map(|l| 1 + l.sub_lists.iter().map(|s| 1 + s.stickers.len()).sum::<usize>())
            .sum()
    }

    pub fn find_list(&self, id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn find_list_mut(&mut self, id: &str) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| l.id == id)
    }

    /// Find a sub-list anywhere on the board, with its owning list
    pub fn find_sub_list(&self, id: &str) -> Option<(&List, &SubList)> {
        self.lists.iter().find_map(|l| {
            l.sub_lists.iter().find(|s| s.id == id).map(|s| (l, s))
        })
    }

    /// Find a sticker anywhere on the board, with its owning sub-list and list
    pub fn find_sticker(&self, id: &str) -> Option<(&List, &SubList, &Sticker)> {
        for list in &self.lists {
            for sub in &list.sub_lists {
                if let Some(st) = sub.stickers.iter().find(|s| s.id == id) {
                    return Some((list, sub, st));
                }
            }
        }
        None
    }

    /// Visit every id on the board in document order
    pub fn for_each_id(&self, f: &mut dyn FnMut(EntityKind, &str)) {
        for list in &self.lists {
            f(EntityKind::List, &list.id);
            for sub in &list.sub_lists {
                f(EntityKind::SubList, &sub.id);
                for st in &sub.stickers {
                    f(EntityKind::Sticker, &st.id);
                }
            }
        }
    }
}

impl List {
    pub fn new(id: String, name: String, color: ColorTag, width: u32) -> Self {
        List {
            id,
            name,
            color,
            width,
            sub_lists: Vec::new(),
        }
    }

    /// Sum of sub-list totals
    pub fn total(&self) -> f64 {
        self.sub_lists.iter().map(SubList::total).sum()
    }

    pub fn find_sub_list(&self, id: &str) -> Option<&SubList> {
        self.sub_lists.iter().find(|s| s.id == id)
    }

    pub fn find_sub_list_mut(&mut self, id: &str) -> Option<&mut SubList> {
        self.sub_lists.iter_mut().find(|s| s.id == id)
    }
}

impl SubList {
    pub fn new(id: String, name: String, color: ColorTag) -> Self {
        SubList {
            id,
            name,
            color,
            stickers: Vec::new(),
        }
    }

    /// Sum of sticker amounts
    pub fn total(&self) -> f64 {
        self.stickers.iter().map(Sticker::amount).sum()
    }

    pub fn find_sticker_mut(&mut self, id: &str) -> Option<&mut Sticker> {
        self.stickers.iter_mut().find(|s| s.id == id)
    }
}

impl Sticker {
    pub fn new(id: String, name: String, price: f64) -> Self {
        Sticker {
            id,
            name,
            price: Some(Price::Number(price)),
            color: None,
            description: None,
            link: None,
        }
    }

    /// Numeric price for totals (missing or non-numeric counts as 0)
    pub fn amount(&self) -> f64 {
        self.price.as_ref().map_or(0.0, Price::amount)
    }

    /// The color to draw this sticker with
    pub fn effective_color(&self, owner: &SubList) -> ColorTag {
        self.color.unwrap_or(owner.color)
    }
}

/// Clamp a requested list width into the supported range
pub fn clamp_width(width: u32) -> u32 {
    width.clamp(MIN_LIST_WIDTH, MAX_LIST_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        let mut equipment = SubList::new("s1".into(), "Equipment".into(), ColorTag::Yellow);
        equipment
            .stickers
            .push(Sticker::new("k1".into(), "Laptop".into(), 1200.0));
        equipment
            .stickers
            .push(Sticker::new("k2".into(), "Monitor".into(), 300.0));
        let mut software = SubList::new("s2".into(), "Software".into(), ColorTag::Pink);
        let mut odd = Sticker::new("k3".into(), "Licence".into(), 0.0);
        odd.price = Some(Price::Text("ask sales".into()));
        software.stickers.push(odd);
        let mut unpriced = Sticker::new("k4".into(), "Fonts".into(), 0.0);
        unpriced.price = None;
        software.stickers.push(unpriced);

        let mut a = List::new("l1".into(), "Option A".into(), ColorTag::PaleBlue, 320);
        a.sub_lists.push(equipment);
        a.sub_lists.push(software);
        Board::new(vec![a])
    }

    #[test]
    fn totals_ignore_non_numeric_prices() {
        let board = sample();
        let list = &board.lists[0];
        assert_eq!(list.sub_lists[0].total(), 1500.0);
        assert_eq!(list.sub_lists[1].total(), 0.0);
        assert_eq!(list.total(), 1500.0);
        assert_eq!(board.total(), 1500.0);
    }

    #[test]
    fn entity_count_counts_every_level() {
        assert_eq!(sample().entity_count(), 1 + 2 + 4);
    }

    #[test]
    fn find_helpers_return_owners() {
        let board = sample();
        let (list, sub) = board.find_sub_list("s2").unwrap();
        assert_eq!(list.id, "l1");
        assert_eq!(sub.name, "Software");
        let (_, sub, st) = board.find_sticker("k2").unwrap();
        assert_eq!(sub.id, "s1");
        assert_eq!(st.name, "Monitor");
        assert!(board.find_sticker("nope").is_none());
    }

    #[test]
    fn document_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let list = &json[0];
        assert!(list.get("subLists").is_some());
        assert_eq!(list["color"], "bg-blue-100");
        assert_eq!(list["subLists"][0]["stickers"][0]["price"], 1200.0);
        // Missing optional fields are not written
        assert!(list["subLists"][1]["stickers"][1].get("price").is_none());
        assert!(list["subLists"][0]["stickers"][0].get("link").is_none());
    }

    #[test]
    fn lenient_load_of_old_documents() {
        let text = r#"[{"id": 7, "name": "Old", "color": "bg-green-100",
            "subLists": [{"id": "g", "name": "G", "color": "bg-red-200",
              "stickers": [{"id": 8, "name": "Thing", "price": "15"}]}]}]"#;
        let board: Board = serde_json::from_str(text).unwrap();
        assert_eq!(board.lists[0].id, "7");
        assert_eq!(board.lists[0].width, DEFAULT_LIST_WIDTH);
        let st = &board.lists[0].sub_lists[0].stickers[0];
        assert_eq!(st.id, "8");
        assert_eq!(st.amount(), 15.0);
        assert_eq!(st.effective_color(&board.lists[0].sub_lists[0]), ColorTag::Red);

        let widths = r#"[
            {"id": "a", "name": "A", "width": 412.5, "subLists": []},
            {"id": "b", "name": "B", "width": null, "subLists": []},
            {"id": "c", "name": "C", "width": 0, "subLists": []},
            {"id": "d", "name": "D", "width": 500, "subLists": []}
        ]"#;
        let board: Board = serde_json::from_str(widths).unwrap();
        let widths: Vec<u32> = board.lists.iter().map(|l| l.width).collect();
        assert_eq!(widths, [413, DEFAULT_LIST_WIDTH, DEFAULT_LIST_WIDTH, 500]);
    }

    #[test]
    fn clamp_width_bounds() {
        assert_eq!(clamp_width(100), MIN_LIST_WIDTH);
        assert_eq!(clamp_width(5000), MAX_LIST_WIDTH);
        assert_eq!(clamp_width(400), 400);
    }
}
