use super::board::{Board, DEFAULT_LIST_WIDTH, EntityKind, List, Sticker, SubList};
use super::color::ColorTag;
use super::id::generate_id;

/// The starter board: two options with a few groups and priced items.
/// Every id is freshly generated.
pub fn default_board() -> Board {
    let sticker = |name: &str, price: f64, description: &str| {
        let mut s = Sticker::new(generate_id(EntityKind::Sticker), name.to_string(), price);
        s.description = Some(description.to_string());
        s
    };
    let sub_list = |name: &str, color: ColorTag, stickers: Vec<Sticker>| {
        let mut s = SubList::new(generate_id(EntityKind::SubList), name.to_string(), color);
        s.stickers = stickers;
        s
    };
    let list = |name: &str, color: ColorTag, sub_lists: Vec<SubList>| {
        let mut l = List::new(
            generate_id(EntityKind::List),
            name.to_string(),
            color,
            DEFAULT_LIST_WIDTH,
        );
        l.sub_lists = sub_lists;
        l
    };

    Board::new(vec![
        list(
            "Option A",
            ColorTag::PaleBlue,
            vec![
                sub_list(
                    "Equipment",
                    ColorTag::Yellow,
                    vec![
                        sticker("Laptop", 1200.0, "High performance laptop"),
                        sticker("Monitor", 300.0, "27-inch 4K"),
                    ],
                ),
                sub_list(
                    "Software",
                    ColorTag::Pink,
                    vec![sticker("Adobe Suite", 600.0, "Creative Cloud All Apps")],
                ),
            ],
        ),
        list(
            "Option B",
            ColorTag::PaleGreen,
            vec![sub_list(
                "Equipment",
                ColorTag::Purple,
                vec![
                    sticker("Desktop", 1500.0, "Gaming PC"),
                    sticker("Dual Monitors", 600.0, "Two 24-inch screens"),
                ],
            )],
        ),
    ])
}

/// Compare two boards by shape only: list, sub-list and sticker names,
/// counts and numeric prices. Ids, colors, widths and descriptions are
/// ignored.
pub fn same_structure(a: &Board, b: &Board) -> bool {
    if a.lists.len() != b.lists.len() {
        return false;
    }
    a.lists.iter().zip(&b.lists).all(|(la, lb)| {
        la.name == lb.name
            && la.sub_lists.len() == lb.sub_lists.len()
            && la.sub_lists.iter().zip(&lb.sub_lists).all(|(sa, sb)| {
                sa.name == sb.name
                    && sa.stickers.len() == sb.stickers.len()
                    && sa
                        .stickers
                        .iter()
                        .zip(&sb.stickers)
                        .all(|(ka, kb)| ka.name == kb.name && ka.amount() == kb.amount())
            })
    })
}

/// True when the board is still the untouched starter board (or empty)
pub fn is_pristine(board: &Board) -> bool {
    board.is_empty() || same_structure(board, &default_board())
}
