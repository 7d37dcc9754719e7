use std::collections::HashSet;

use crate::model::id::{generate_id, is_well_formed};
use crate::model::{Board, EntityKind};

/// One id that was replaced during repair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdRepair {
    pub kind: EntityKind,
    pub old_id: String,
    pub new_id: String,
    pub reason: RepairReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairReason {
    Duplicate,
    Malformed,
}

/// Mint an id for `kind` that is not already in `taken`, and record it there.
pub fn fresh_unique_id(kind: EntityKind, taken: &mut HashSet<String>) -> String {
    loop {
        let id = generate_id(kind);
        if taken.insert(id.clone()) {
            return id;
        }
    }
}

/// Collect every id currently on the board
pub fn collect_ids(board: &Board) -> HashSet<String> {
    let mut ids = HashSet::new();
    board.for_each_id(&mut |_, id| {
        ids.insert(id.to_string());
    });
    ids
}

/// Make every id on the board unique across all kinds, in document order.
/// The first occurrence of an id keeps it; later duplicates and malformed
/// ids get a fresh one. Ownership, order and values are untouched.
pub fn repair_ids(board: &mut Board) -> Vec<IdRepair> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut repairs = Vec::new();

    let mut check = |kind: EntityKind, id: &mut String, seen: &mut HashSet<String>| {
        let reason = if !is_well_formed(id) {
            Some(RepairReason::Malformed)
        } else if seen.contains(id.as_str()) {
            Some(RepairReason::Duplicate)
        } else {
            None
        };
        match reason {
            None => {
                seen.insert(id.clone());
            }
            Some(reason) => {
                let new_id = fresh_unique_id(kind, seen);
                repairs.push(IdRepair {
                    kind,
                    old_id: std::mem::replace(id, new_id.clone()),
                    new_id,
                    reason,
                });
            }
        }
    };

    for list in &mut board.lists {
        check(EntityKind::List, &mut list.id, &mut seen);
        for sub in &mut list.sub_lists {
            check(EntityKind::SubList, &mut sub.id, &mut seen);
            for st in &mut sub.stickers {
                check(EntityKind::Sticker, &mut st.id, &mut seen);
            }
        }
    }

    for r in &repairs {
        tracing::info!(kind = %r.kind, old = %r.old_id, new = %r.new_id, reason = ?r.reason, "repaired id");
    }
    repairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorTag, List, Sticker, SubList};

    fn board_with_ids(list: &str, sub: &str, stickers: &[&str]) -> Board {
        let mut s = SubList::new(sub.into(), "G".into(), ColorTag::Yellow);
        s.stickers = stickers
            .iter()
            .enumerate()
            .map(|(i, id)| Sticker::new((*id).into(), format!("S{}", i), i as f64 * 10.0))
            .collect();
        let mut l = List::new(list.into(), "L".into(), ColorTag::PaleBlue, 320);
        l.sub_lists.push(s);
        Board::new(vec![l])
    }

    #[test]
    fn clean_board_is_left_alone() {
        let mut board = board_with_ids("l", "s", &["a", "b"]);
        let before = board.clone();
        assert!(repair_ids(&mut board).is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn duplicate_sticker_ids_are_split() {
        let mut board = board_with_ids("l", "s", &["x", "x"]);
        let repairs = repair_ids(&mut board);
        assert_eq!(repairs.len(), 1);
        assert_eq!(repairs[0].reason, RepairReason::Duplicate);

        let stickers = &board.lists[0].sub_lists[0].stickers;
        assert_eq!(stickers[0].id, "x");
        assert_ne!(stickers[1].id, "x");
        assert!(stickers[1].id.starts_with("sticker-"));
        assert_eq!(stickers[1].name, "S1");
        assert_eq!(stickers[1].amount(), 10.0);
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut board = board_with_ids("same", "same", &["same"]);
        let repairs = repair_ids(&mut board);
        assert_eq!(repairs.len(), 2);
        assert_eq!(board.lists[0].id, "same");
        assert!(board.lists[0].sub_lists[0].id.starts_with("sub-"));
        assert_eq!(collect_ids(&board).len(), 3);
    }

    #[test]
    fn malformed_ids_are_replaced() {
        let mut board = board_with_ids("", "s", &["has space"]);
        let repairs = repair_ids(&mut board);
        assert_eq!(repairs.len(), 2);
        assert!(repairs.iter().all(|r| r.reason == RepairReason::Malformed));
        assert!(board.lists[0].id.starts_with("list-"));
    }

    #[test]
    fn fresh_unique_id_avoids_taken() {
        let mut taken = HashSet::new();
        let a = fresh_unique_id(EntityKind::Sticker, &mut taken);
        let b = fresh_unique_id(EntityKind::Sticker, &mut taken);
        assert_ne!(a, b);
        assert!(taken.contains(&a) && taken.contains(&b));
    }
}
