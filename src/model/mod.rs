pub mod board;
pub mod color;
pub mod config;
pub mod defaults;
pub mod id;
pub mod price;

pub use board::*;
pub use color::*;
pub use config::*;
pub use price::*;
