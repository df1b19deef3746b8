//! Template resolution and rendering for source code generators.
//!
//! Given a logical template name and a data model, `templar` finds the
//! right template document (in the user's template folder, a library
//! flavor folder, or the templates bundled with the tool) and renders it
//! through the engine for its syntax.
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod markdown;
pub mod templates;

pub use config::GenerationConfig;
pub use error::{Error, Result};
pub use templates::{MultiTemplateEngine, TemplateEngine, TemplateLocator, TemplatePath};
