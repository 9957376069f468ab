pub mod debounce;
pub mod engine;
pub mod session;

pub use engine::SearchEngine;
pub use session::{Completion, SearchRequest, SearchSession};
