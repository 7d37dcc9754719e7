use crate::model::Board;

use super::commit::commit_drop;
use super::planner::drag_over;
use super::resolve::{Location, resolve};
use super::target::DragTarget;

/// Snapshot of the dragged entity taken at drag start, used for the overlay
/// while the gesture is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOrigin {
    pub target: DragTarget,
    pub name: String,
    pub list_id: String,
    /// Owning sub-list, for stickers
    pub sub_list_id: Option<String>,
    /// Position inside the original container
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragOrigin),
}

/// One drag gesture at a time: `Idle -> Dragging -> Idle`.
///
/// Event handlers that change the board return the next board; the caller
/// owns the board and decides what to do with it.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn origin(&self) -> Option<&DragOrigin> {
        match &self.state {
            DragState::Dragging(origin) => Some(origin),
            DragState::Idle => None,
        }
    }

    /// The entity being dragged
    pub fn active(&self) -> Option<&DragTarget> {
        self.origin().map(|o| &o.target)
    }

    /// Begin a drag. Returns false (and stays idle) when the target does not
    /// resolve or a drag is already in progress.
    pub fn on_drag_start(&mut self, board: &Board, target: DragTarget) -> bool {
        if self.is_dragging() {
            tracing::debug!(%target, "drag start ignored: already dragging");
            return false;
        }
        let Some(loc) = resolve(board, &target) else {
            tracing::debug!(%target, "drag start ignored: target not found");
            return false;
        };
        let list = &board.lists[loc.list_index()];
        let (name, sub_list_id) = match loc {
            Location::List { .. } => (list.name.clone(), None),
            Location::SubList { sub_list, .. } => (list.sub_lists[sub_list].name.clone(), None),
            Location::Sticker {
                sub_list, sticker, ..
            } => {
                let sub = &list.sub_lists[sub_list];
                (sub.stickers[sticker].name.clone(), Some(sub.id.clone()))
            }
        };
        tracing::debug!(%target, "drag start");
        self.state = DragState::Dragging(DragOrigin {
            target,
            name,
            list_id: list.id.clone(),
            sub_list_id,
            index: loc.index(),
        });
        true
    }

    /// Hover tick. Returns the live-preview board when the dragged entity
    /// changes container.
    pub fn on_drag_over(
        &self,
        board: &Board,
        active: &DragTarget,
        over: &DragTarget,
    ) -> Option<Board> {
        if !self.is_dragging() {
            return None;
        }
        drag_over(board, active, over)
    }

    /// Release. Always returns to idle; returns the committed board when the
    /// drop reordered something.
    pub fn on_drag_end(
        &mut self,
        board: &Board,
        active: &DragTarget,
        over: Option<&DragTarget>,
    ) -> Option<Board> {
        if !self.is_dragging() {
            return None;
        }
        self.state = DragState::Idle;
        tracing::debug!(%active, over = ?over.map(|o| o.to_string()), "drag end");
        commit_drop(board, active, over)
    }

    /// Abort without committing. Live moves already made stay in place.
    pub fn on_drag_cancel(&mut self) {
        if self.is_dragging() {
            tracing::debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }
}
