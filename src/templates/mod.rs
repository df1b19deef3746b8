//! Template system for code generation.
//!
//! This module turns a logical template name into a concrete template
//! source and renders it with the engine matching the source's syntax.
//!
//! The template system supports:
//! - Tiered lookup across a user template folder, library flavors and
//!   bundled resources ([`TemplateLocator`])
//! - Mustache and handlebars syntaxes plus verbatim copies
//! - Extension-keyed dispatch with user-registered engines
//!   ([`MultiTemplateEngine`])
//! - Embedded templates for binary distribution

pub mod embedded;
pub mod engine;
pub mod exact_copy;
pub mod handlebars_engine;
pub mod helpers;
pub mod locator;
pub mod multi;
pub mod mustache_engine;
pub mod path;

pub use embedded::{EmbeddedTemplates, MemoryResources, ResourceStore, resource_id};
pub use engine::{TemplateEngine, TemplateReader};
pub use exact_copy::ExactCopyEngine;
pub use handlebars_engine::HandlebarsEngine;
pub use locator::*;
pub use multi::*;
pub use mustache_engine::MustacheEngine;
pub use path::TemplatePath;
