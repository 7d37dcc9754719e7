//! Drag-and-drop engine: typed targets, resolution, the session state
//! machine, live relocation on hover and reorder on drop.

pub mod commit;
pub mod planner;
pub mod resolve;
pub mod session;
pub mod target;

pub use session::{DragOrigin, DragSession, DragState};
pub use target::{DragTarget, TargetParseError};
