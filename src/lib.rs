pub mod config;
pub mod github;
pub mod search;
pub mod tui;
