//! CLI commands

pub mod clean;
pub mod list;
pub mod parse;
pub mod show;
pub mod validate;
