//! Rendering module for converting reconstructed documents to output formats.

mod json;
mod markdown;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::to_markdown;
pub use options::{PageSelection, RenderOptions};
pub use text::to_text;
