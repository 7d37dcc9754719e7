pub mod board_io;
pub mod config_io;
pub mod lock;
pub mod recovery;
pub mod share;
pub mod state;
pub mod store;
pub mod watcher;
