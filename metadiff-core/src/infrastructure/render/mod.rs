// metadiff-core/src/infrastructure/render/mod.rs

pub mod html;
pub mod text;

pub use html::{HtmlRenderer, write_html_report};
pub use text::TextRenderer;
