pub mod common;
pub mod library;
