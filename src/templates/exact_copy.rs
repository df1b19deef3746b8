//! Engine that passes template files through unchanged.

use std::sync::Arc;

use serde_json::Value;

use super::{ResourceStore, TemplateEngine, TemplateReader};
use crate::config::GenerationConfig;
use crate::error::Result;

/// Returns the located file's content untouched, ignoring the render data.
///
/// Invalid UTF-8 sequences are replaced with `U+FFFD` rather than failing
/// the copy.
///
/// Used for opaque assets (licenses, binary-safe text, build scripts) which
/// must be referenced by their full file name.
#[derive(Debug, Clone)]
pub struct ExactCopyEngine {
    reader: TemplateReader,
}

impl ExactCopyEngine {
    pub fn new(config: Arc<GenerationConfig>) -> Self {
        Self {
            reader: TemplateReader::new(config, None),
        }
    }

    pub fn with_resources(config: Arc<GenerationConfig>, resources: Arc<dyn ResourceStore>) -> Self {
        Self {
            reader: TemplateReader::with_resources(config, None, resources),
        }
    }
}

impl TemplateEngine for ExactCopyEngine {
    fn render(&self, name: &str, _data: &Value) -> Result<String> {
        self.reader.read_lossy(name)
    }

    fn file_extension(&self) -> Option<&str> {
        None
    }
}
