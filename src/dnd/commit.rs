use crate::model::Board;
use crate::ops::hierarchy::{self, HierarchyError, ParentPath};

use super::resolve::{Location, resolve};
use super::target::DragTarget;

/// A same-container reorder computed on drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReorder {
    pub parent: ParentPath,
    pub from: usize,
    pub to: usize,
}

/// Work out the final reorder for a drop of `active` onto `over`.
///
/// Lists take the index of the list `over` belongs to. Sub-lists need a
/// sub-list `over` in the same list, stickers a sticker `over` in the same
/// sub-list. Anything else, including equal indices, commits nothing.
pub fn plan_drop(
    board: &Board,
    active: &DragTarget,
    over: Option<&DragTarget>,
) -> Option<PlannedReorder> {
    let over = resolve(board, over?)?;
    let from = resolve(board, active)?;
    let (parent, from_idx, to_idx) = match (from, over) {
        (Location::List { list }, over) => (ParentPath::Board, list, over.list_index()),
        (
            Location::SubList { list, sub_list },
            Location::SubList {
                list: over_list,
                sub_list: over_sub,
            },
        ) if list == over_list => (from.parent_path(board), sub_list, over_sub),
        (
            Location::Sticker {
                list,
                sub_list,
                sticker,
            },
            Location::Sticker {
                list: over_list,
                sub_list: over_sub,
                sticker: over_sticker,
            },
        ) if (list, sub_list) == (over_list, over_sub) => {
            (from.parent_path(board), sticker, over_sticker)
        }
        _ => return None,
    };
    if from_idx == to_idx {
        return None;
    }
    Some(PlannedReorder {
        parent,
        from: from_idx,
        to: to_idx,
    })
}

pub fn apply_reorder(board: &Board, planned: &PlannedReorder) -> Result<Board, HierarchyError> {
    hierarchy::move_within_parent(board, &planned.parent, planned.from, planned.to)
}

/// Plan and apply a drop. `None` means the board is unchanged.
pub fn commit_drop(board: &Board, active: &DragTarget, over: Option<&DragTarget>) -> Option<Board> {
    let planned = plan_drop(board, active, over)?;
    tracing::debug!(
        parent = ?planned.parent,
        from = planned.from,
        to = planned.to,
        "drop reorder"
    );
    apply_reorder(board, &planned).ok()
}
