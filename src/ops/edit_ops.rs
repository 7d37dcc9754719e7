use crate::model::{Board, ColorTag, EntityKind, List, Price, Sticker, SubList, clamp_width};

use super::id_repair::{collect_ids, fresh_unique_id};

/// Error type for edit operations
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("{kind} not found: {id}")]
    PathNotFound { kind: EntityKind, id: String },
    #[error("invalid price: {0:?}")]
    InvalidPrice(String),
}

fn not_found(kind: EntityKind, id: &str) -> EditError {
    EditError::PathNotFound {
        kind,
        id: id.to_string(),
    }
}

/// Fields of the sticker editor, saved together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StickerForm {
    pub name: String,
    /// Raw price input; coerced to a number on save
    pub price: String,
    pub link: String,
    pub description: String,
}

impl StickerForm {
    /// Prefill the form from an existing sticker
    pub fn from_sticker(sticker: &Sticker) -> Self {
        StickerForm {
            name: sticker.name.clone(),
            price: sticker
                .price
                .as_ref()
                .map(|p| p.to_string())
                .unwrap_or_default(),
            link: sticker.link.clone().unwrap_or_default(),
            description: sticker.description.clone().unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

fn list_mut<'a>(board: &'a mut Board, id: &str) -> Result<&'a mut List, EditError> {
    board
        .find_list_mut(id)
        .ok_or_else(|| not_found(EntityKind::List, id))
}

fn sub_list_mut<'a>(board: &'a mut Board, id: &str) -> Result<&'a mut SubList, EditError> {
    board
        .lists
        .iter_mut()
        .find_map(|l| l.find_sub_list_mut(id))
        .ok_or_else(|| not_found(EntityKind::SubList, id))
}

fn sticker_mut<'a>(board: &'a mut Board, id: &str) -> Result<&'a mut Sticker, EditError> {
    board
        .lists
        .iter_mut()
        .flat_map(|l| l.sub_lists.iter_mut())
        .find_map(|s| s.find_sticker_mut(id))
        .ok_or_else(|| not_found(EntityKind::Sticker, id))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Append a new list named `Option {n+1}`. Returns its id.
pub fn add_list(board: &mut Board, width: u32) -> String {
    let id = fresh_unique_id(EntityKind::List, &mut collect_ids(board));
    let name = format!("Option {}", board.lists.len() + 1);
    board.lists.push(List::new(
        id.clone(),
        name,
        ColorTag::PaleBlue,
        clamp_width(width),
    ));
    id
}

/// Append a "New Group" to a list, colored by its position in the palette.
pub fn add_sub_list(board: &mut Board, list_id: &str) -> Result<String, EditError> {
    let id = fresh_unique_id(EntityKind::SubList, &mut collect_ids(board));
    let list = list_mut(board, list_id)?;
    let color = ColorTag::cycled(list.sub_lists.len());
    list.sub_lists
        .push(SubList::new(id.clone(), "New Group".to_string(), color));
    Ok(id)
}

/// Append a "New Sticker" priced 0 in the sub-list's color.
pub fn add_sticker(board: &mut Board, sub_list_id: &str) -> Result<String, EditError> {
    let id = fresh_unique_id(EntityKind::Sticker, &mut collect_ids(board));
    let sub = sub_list_mut(board, sub_list_id)?;
    let mut sticker = Sticker::new(id.clone(), "New Sticker".to_string(), 0.0);
    sticker.color = Some(sub.color);
    sub.stickers.push(sticker);
    Ok(id)
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

pub fn delete_list(board: &mut Board, id: &str) -> Result<List, EditError> {
    let idx = board
        .lists
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| not_found(EntityKind::List, id))?;
    Ok(board.lists.remove(idx))
}

pub fn delete_sub_list(board: &mut Board, id: &str) -> Result<SubList, EditError> {
    for list in &mut board.lists {
        if let Some(idx) = list.sub_lists.iter().position(|s| s.id == id) {
            return Ok(list.sub_lists.remove(idx));
        }
    }
    Err(not_found(EntityKind::SubList, id))
}

pub fn delete_sticker(board: &mut Board, id: &str) -> Result<Sticker, EditError> {
    for sub in board.lists.iter_mut().flat_map(|l| l.sub_lists.iter_mut()) {
        if let Some(idx) = sub.stickers.iter().position(|s| s.id == id) {
            return Ok(sub.stickers.remove(idx));
        }
    }
    Err(not_found(EntityKind::Sticker, id))
}

// ---------------------------------------------------------------------------
// List fields
// ---------------------------------------------------------------------------

pub fn rename_list(board: &mut Board, id: &str, name: String) -> Result<(), EditError> {
    list_mut(board, id)?.name = name;
    Ok(())
}

/// Set a list's width, clamped to the supported range. Returns the width
/// actually stored.
pub fn resize_list(board: &mut Board, id: &str, width: u32) -> Result<u32, EditError> {
    let list = list_mut(board, id)?;
    list.width = clamp_width(width);
    Ok(list.width)
}

pub fn recolor_list(board: &mut Board, id: &str, color: ColorTag) -> Result<(), EditError> {
    list_mut(board, id)?.color = color;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sub-list fields
// ---------------------------------------------------------------------------

pub fn rename_sub_list(board: &mut Board, id: &str, name: String) -> Result<(), EditError> {
    sub_list_mut(board, id)?.name = name;
    Ok(())
}

/// Recolor a sub-list. Stickers keep their own color.
pub fn recolor_sub_list(board: &mut Board, id: &str, color: ColorTag) -> Result<(), EditError> {
    sub_list_mut(board, id)?.color = color;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sticker fields
// ---------------------------------------------------------------------------

pub fn rename_sticker(board: &mut Board, id: &str, name: String) -> Result<(), EditError> {
    sticker_mut(board, id)?.name = name;
    Ok(())
}

pub fn reprice_sticker(board: &mut Board, id: &str, price: f64) -> Result<(), EditError> {
    if !price.is_finite() {
        return Err(EditError::InvalidPrice(price.to_string()));
    }
    sticker_mut(board, id)?.price = Some(Price::Number(price));
    Ok(())
}

pub fn recolor_sticker(board: &mut Board, id: &str, color: ColorTag) -> Result<(), EditError> {
    sticker_mut(board, id)?.color = Some(color);
    Ok(())
}

/// Set or clear (blank input) a sticker's link
pub fn relink_sticker(board: &mut Board, id: &str, link: &str) -> Result<(), EditError> {
    sticker_mut(board, id)?.link = non_empty(link);
    Ok(())
}

/// Set or clear (blank input) a sticker's description
pub fn redescribe_sticker(board: &mut Board, id: &str, text: &str) -> Result<(), EditError> {
    sticker_mut(board, id)?.description = non_empty(text);
    Ok(())
}

/// Replace name, price, link and description in one step. The price input
/// must be numeric (blank means 0); on error nothing is changed.
pub fn save_sticker_form(board: &mut Board, id: &str, form: &StickerForm) -> Result<(), EditError> {
    let price = Price::from_input(&form.price)
        .ok_or_else(|| EditError::InvalidPrice(form.price.clone()))?;
    let sticker = sticker_mut(board, id)?;
    sticker.name = form.name.trim().to_string();
    sticker.price = Some(Price::Number(price.amount()));
    sticker.link = non_empty(&form.link);
    sticker.description = non_empty(&form.description);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::defaults::default_board;

    fn sticker_id(board: &Board, name: &str) -> String {
        board
            .lists
            .iter()
            .flat_map(|l| &l.sub_lists)
            .flat_map(|s| &s.stickers)
            .find(|s| s.name == name)
            .map(|s| s.id.clone())
            .unwrap()
    }

    #[test]
    fn add_list_names_and_defaults() {
        let mut board = default_board();
        let id = add_list(&mut board, 100);
        let list = board.find_list(&id).unwrap();
        assert_eq!(list.name, "Option 3");
        assert_eq!(list.color, ColorTag::PaleBlue);
        assert_eq!(list.width, 280);
        assert!(list.sub_lists.is_empty());
        assert_eq!(board.lists.last().unwrap().id, id);
    }

    #[test]
    fn add_sub_list_cycles_palette() {
        let mut board = default_board();
        let list_id = board.lists[0].id.clone();
        let id = add_sub_list(&mut board, &list_id).unwrap();
        let (_, sub) = board.find_sub_list(&id).unwrap();
        assert_eq!(sub.name, "New Group");
        // Two sub-lists already present
        assert_eq!(sub.color, ColorTag::Blue);
    }

    #[test]
    fn add_sticker_takes_sub_list_color() {
        let mut board = default_board();
        let sub_id = board.lists[1].sub_lists[0].id.clone();
        let id = add_sticker(&mut board, &sub_id).unwrap();
        let (_, sub, st) = board.find_sticker(&id).unwrap();
        assert_eq!(st.name, "New Sticker");
        assert_eq!(st.amount(), 0.0);
        assert_eq!(st.color, Some(ColorTag::Purple));
        assert_eq!(sub.stickers.last().unwrap().id, id);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut board = default_board();
        assert!(matches!(
            add_sticker(&mut board, "nope"),
            Err(EditError::PathNotFound {
                kind: EntityKind::SubList,
                ..
            })
        ));
        assert!(rename_list(&mut board, "nope", "x".into()).is_err());
        assert!(delete_sticker(&mut board, "nope").is_err());
    }

    #[test]
    fn delete_removes_descendants() {
        let mut board = default_board();
        let list_id = board.lists[0].id.clone();
        let removed = delete_list(&mut board, &list_id).unwrap();
        assert_eq!(removed.name, "Option A");
        assert_eq!(board.lists.len(), 1);
        assert_eq!(board.entity_count(), 1 + 1 + 2);
    }

    #[test]
    fn resize_is_clamped() {
        let mut board = default_board();
        let id = board.lists[0].id.clone();
        assert_eq!(resize_list(&mut board, &id, 2000).unwrap(), 800);
        assert_eq!(resize_list(&mut board, &id, 500).unwrap(), 500);
        assert_eq!(board.lists[0].width, 500);
    }

    #[test]
    fn sticker_edits_preserve_identity_and_order() {
        let mut board = default_board();
        let id = sticker_id(&board, "Monitor");
        rename_sticker(&mut board, &id, "Big Monitor".into()).unwrap();
        reprice_sticker(&mut board, &id, 450.0).unwrap();
        recolor_sticker(&mut board, &id, ColorTag::Teal).unwrap();
        relink_sticker(&mut board, &id, "https://example.com/monitor").unwrap();
        redescribe_sticker(&mut board, &id, "  ").unwrap();

        let st = &board.lists[0].sub_lists[0].stickers[1];
        assert_eq!(st.id, id);
        assert_eq!(st.name, "Big Monitor");
        assert_eq!(st.amount(), 450.0);
        assert_eq!(st.color, Some(ColorTag::Teal));
        assert_eq!(st.link.as_deref(), Some("https://example.com/monitor"));
        assert_eq!(st.description, None);
        assert_eq!(board.lists[0].total(), 2250.0);
    }

    #[test]
    fn save_form_coerces_price() {
        let mut board = default_board();
        let id = sticker_id(&board, "Laptop");
        let mut form = StickerForm::from_sticker(&board.find_sticker(&id).unwrap().2);
        assert_eq!(form.price, "1200");
        assert_eq!(form.description, "High performance laptop");

        form.price = "$999.50".into();
        form.link = "https://shop.example/laptop".into();
        save_sticker_form(&mut board, &id, &form).unwrap();
        let st = board.find_sticker(&id).unwrap().2;
        assert_eq!(st.price, Some(Price::Number(999.5)));
        assert_eq!(st.link.as_deref(), Some("https://shop.example/laptop"));
    }

    #[test]
    fn save_form_rejects_bad_price() {
        let mut board = default_board();
        let id = sticker_id(&board, "Laptop");
        let before = board.clone();
        let form = StickerForm {
            name: "Changed".into(),
            price: "lots".into(),
            ..Default::default()
        };
        assert!(matches!(
            save_sticker_form(&mut board, &id, &form),
            Err(EditError::InvalidPrice(_))
        ));
        assert_eq!(board, before);
    }
}
