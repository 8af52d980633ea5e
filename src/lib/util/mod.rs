//! Utility module.

mod block_font;
pub mod cache;
pub mod debounce;
pub mod text;
