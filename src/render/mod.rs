//! Report Rendering
//!
//! Message templates and the grouped text report.

pub mod renderer;
pub mod templates;

pub use renderer::ResultRenderer;
pub use templates::{apply_format, TemplateTable};
