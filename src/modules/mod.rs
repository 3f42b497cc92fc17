pub mod collection;
pub mod operations;
