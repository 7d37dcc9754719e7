use crate::model::Board;
use crate::ops::hierarchy::{NodePath, ParentPath};

use super::target::DragTarget;

/// Where a target sits on the board, as indices from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    List {
        list: usize,
    },
    SubList {
        list: usize,
        sub_list: usize,
    },
    Sticker {
        list: usize,
        sub_list: usize,
        sticker: usize,
    },
}

impl Location {
    /// Index of the owning (or own) list
    pub fn list_index(&self) -> usize {
        match *self {
            Location::List { list }
            | Location::SubList { list, .. }
            | Location::Sticker { list, .. } => list,
        }
    }

    /// `(list, sub_list)` for sub-lists and stickers
    pub fn sub_list_index(&self) -> Option<(usize, usize)> {
        match *self {
            Location::List { .. } => None,
            Location::SubList { list, sub_list } | Location::Sticker { list, sub_list, .. } => {
                Some((list, sub_list))
            }
        }
    }

    /// Position of the entity inside its own container
    pub fn index(&self) -> usize {
        match *self {
            Location::List { list } => list,
            Location::SubList { sub_list, .. } => sub_list,
            Location::Sticker { sticker, .. } => sticker,
        }
    }

    /// The id chain for this location. Panics if the location did not come
    /// from `board`.
    pub fn path(&self, board: &Board) -> NodePath {
        match *self {
            Location::List { list } => NodePath::List {
                list: board.lists[list].id.clone(),
            },
            Location::SubList { list, sub_list } => {
                let l = &board.lists[list];
                NodePath::SubList {
                    list: l.id.clone(),
                    sub_list: l.sub_lists[sub_list].id.clone(),
                }
            }
            Location::Sticker {
                list,
                sub_list,
                sticker,
            } => {
                let l = &board.lists[list];
                let s = &l.sub_lists[sub_list];
                NodePath::Sticker {
                    list: l.id.clone(),
                    sub_list: s.id.clone(),
                    sticker: s.stickers[sticker].id.clone(),
                }
            }
        }
    }

    /// The container holding this entity
    pub fn parent_path(&self, board: &Board) -> ParentPath {
        self.path(board).parent()
    }
}

/// Locate a target by linear search. `None` when the id is no longer on the
/// board or the kind does not match.
pub fn resolve(board: &Board, target: &DragTarget) -> Option<Location> {
    match target {
        DragTarget::List(id) => board
            .lists
            .iter()
            .position(|l| &l.id == id)
            .map(|list| Location::List { list }),
        DragTarget::SubList(id) => board.lists.iter().enumerate().find_map(|(li, l)| {
            l.sub_lists
                .iter()
                .position(|s| &s.id == id)
                .map(|si| Location::SubList {
                    list: li,
                    sub_list: si,
                })
        }),
        DragTarget::Sticker(id) => {
            for (li, l) in board.lists.iter().enumerate() {
                for (si, s) in l.sub_lists.iter().enumerate() {
                    if let Some(ki) = s.stickers.iter().position(|k| &k.id == id) {
                        return Some(Location::Sticker {
                            list: li,
                            sub_list: si,
                            sticker: ki,
                        });
                    }
                }
            }
            None
        }
    }
}
