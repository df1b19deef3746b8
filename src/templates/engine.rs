//! Rendering contract shared by all template engines.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{EmbeddedTemplates, ResourceStore, TemplateExtensions, TemplateLocator, TemplatePath};
use crate::config::GenerationConfig;
use crate::error::Result;

/// Transforms a template document using data provided at render time.
pub trait TemplateEngine: Send + Sync {
    /// Locate the template called `name` and render it against `data`.
    ///
    /// Fails if the template cannot be located, read or executed.
    fn render(&self, name: &str, data: &Value) -> Result<String>;

    /// Extension of the files this engine handles, without the leading
    /// period. `None` means the engine accepts any file verbatim.
    fn file_extension(&self) -> Option<&str>;
}

/// Locates and reads template sources on behalf of an engine.
///
/// Every engine searches for its own extension only, so a bare basename
/// handed to the mustache engine never resolves to a handlebars file.
#[derive(Debug, Clone)]
pub struct TemplateReader {
    config: Arc<GenerationConfig>,
    locator: TemplateLocator,
}

impl TemplateReader {
    /// Reader over the compiled-in templates
    pub fn new(config: Arc<GenerationConfig>, extension: Option<&str>) -> Self {
        Self::with_resources(config, extension, Arc::new(EmbeddedTemplates))
    }

    pub fn with_resources(
        config: Arc<GenerationConfig>,
        extension: Option<&str>,
        resources: Arc<dyn ResourceStore>,
    ) -> Self {
        let extensions = TemplateExtensions::with(extension);
        Self {
            config,
            locator: TemplateLocator::with_resources(extensions, resources),
        }
    }

    /// Find the template called `name`
    pub fn find(&self, name: &str) -> Result<TemplatePath> {
        self.locator.resolve(&self.config, name)
    }

    /// Read the complete content of the template called `name`
    pub fn read(&self, name: &str) -> Result<String> {
        Ok(self.find(name)?.read_to_string()?)
    }

    /// [`read`](Self::read), replacing invalid UTF-8 instead of failing
    pub fn read_lossy(&self, name: &str) -> Result<String> {
        Ok(self.find(name)?.read_to_string_lossy()?)
    }
}

static PARTIAL_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\{~?(#?)>\s*("[^"]+"|'[^']+'|[^\s}~]+)[^}]*\}\}"#).expect("valid partial pattern")
});

static INLINE_PARTIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\{~?#\*inline\s+("[^"]+"|'[^']+'|[^\s}~]+)"#).expect("valid inline pattern")
});

/// A partial inclusion tag found in a handlebars source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PartialTag {
    /// Logical name of the included template
    pub name: String,
    /// Partial block (`{{#> name}}`), which carries its own fallback body
    pub block: bool,
}

/// Statically named partial tags in `source`, in document order.
///
/// Dynamic partials (`{{> (lookup ..)}}`) cannot be located ahead of
/// rendering and are skipped. Inline partials are reported like any other
/// tag; see [`inline_partials`].
pub(crate) fn partial_tags(source: &str) -> Vec<PartialTag> {
    PARTIAL_TAG
        .captures_iter(source)
        .filter_map(|caps| {
            let name = unquote(caps.get(2)?.as_str());
            if name.starts_with(['(', '@']) {
                return None;
            }
            Some(PartialTag {
                name: name.to_string(),
                block: !caps.get(1)?.as_str().is_empty(),
            })
        })
        .collect()
}

/// Names declared with `{{#*inline "name"}}` in `source`
pub(crate) fn inline_partials(source: &str) -> HashSet<String> {
    INLINE_PARTIAL
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).map(|m| unquote(m.as_str()).to_string()))
        .collect()
}

fn unquote(name: &str) -> &str {
    name.trim_matches(['"', '\''])
}
