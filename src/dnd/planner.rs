use crate::model::Board;
use crate::ops::hierarchy::{self, HierarchyError, NodePath, ParentPath};

use super::resolve::{Location, resolve};
use super::target::DragTarget;

/// A live relocation into a different container, computed on drag-over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: NodePath,
    pub dest: ParentPath,
    pub index: usize,
}

/// Decide whether hovering `over` while dragging `active` moves `active`
/// into another container.
///
/// - A sticker moves when the hovered sticker's sub-list (or the hovered
///   sub-list itself) is not its current owner. It lands at the hovered
///   sticker's position, or at the end.
/// - A sub-list moves when the hovered list (or the hovered sub-list's list)
///   is not its current owner. It lands at the hovered sub-list's position,
///   or at the end.
/// - Lists never move here; they reorder on drop.
///
/// Same-container hovers, unresolved targets and cross-level hovers return
/// `None`.
pub fn plan_drag_over(board: &Board, active: &DragTarget, over: &DragTarget) -> Option<PlannedMove> {
    let from = resolve(board, active)?;
    match from {
        Location::List { .. } => None,
        Location::Sticker {
            list, sub_list, ..
        } => {
            let (dest_list, dest_sub, index) = match resolve(board, over)? {
                Location::Sticker {
                    list,
                    sub_list,
                    sticker,
                } => (list, sub_list, Some(sticker)),
                Location::SubList { list, sub_list } => (list, sub_list, None),
                Location::List { .. } => return None,
            };
            if (dest_list, dest_sub) == (list, sub_list) {
                return None;
            }
            let dest = &board.lists[dest_list].sub_lists[dest_sub];
            Some(PlannedMove {
                source: from.path(board),
                dest: ParentPath::SubList {
                    list: board.lists[dest_list].id.clone(),
                    sub_list: dest.id.clone(),
                },
                index: index.unwrap_or(dest.stickers.len()),
            })
        }
        Location::SubList { list, .. } => {
            let (dest_list, index) = match resolve(board, over)? {
                Location::List { list } => (list, None),
                Location::SubList { list, sub_list } => (list, Some(sub_list)),
                Location::Sticker { .. } => return None,
            };
            if dest_list == list {
                return None;
            }
            let dest = &board.lists[dest_list];
            Some(PlannedMove {
                source: from.path(board),
                dest: ParentPath::List {
                    list: dest.id.clone(),
                },
                index: index.unwrap_or(dest.sub_lists.len()),
            })
        }
    }
}

/// Apply a planned move, producing the next board
pub fn apply_move(board: &Board, planned: &PlannedMove) -> Result<Board, HierarchyError> {
    hierarchy::move_across_parent(board, &planned.source, &planned.dest, planned.index)
}

/// Plan and apply in one step. `None` means the board is unchanged.
pub fn drag_over(board: &Board, active: &DragTarget, over: &DragTarget) -> Option<Board> {
    let planned = plan_drag_over(board, active, over)?;
    tracing::debug!(
        source = planned.source.id(),
        dest = ?planned.dest,
        index = planned.index,
        "live move"
    );
    match apply_move(board, &planned) {
        Ok(next) => Some(next),
        Err(e) => {
            tracing::debug!(error = %e, "live move skipped");
            None
        }
    }
}
