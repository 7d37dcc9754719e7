pub mod edit_ops;
pub mod hierarchy;
pub mod id_repair;
