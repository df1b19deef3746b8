//! Template engine using `handlebars` syntax.
//!
//! A superset of the mustache engine's features with named helper
//! invocation (see [`helpers`](super::helpers)). Compiled templates are kept
//! in the engine's registry for the lifetime of the engine, which is one
//! generation run; the cache is never invalidated, so edits to template
//! files during a run are not picked up.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use handlebars::Handlebars;
use serde_json::Value;
use tracing::debug;

use super::engine::{inline_partials, partial_tags};
use super::helpers::register_helpers;
use super::{HANDLEBARS_EXTENSION, ResourceStore, TemplateEngine, TemplateReader};
use crate::config::GenerationConfig;
use crate::error::{Error, Result};

pub struct HandlebarsEngine {
    reader: TemplateReader,
    /// Compiled templates keyed by logical name
    registry: RwLock<Handlebars<'static>>,
}

impl HandlebarsEngine {
    pub fn new(config: Arc<GenerationConfig>) -> Self {
        Self::from_reader(TemplateReader::new(config, Some(HANDLEBARS_EXTENSION)))
    }

    pub fn with_resources(config: Arc<GenerationConfig>, resources: Arc<dyn ResourceStore>) -> Self {
        Self::from_reader(TemplateReader::with_resources(
            config,
            Some(HANDLEBARS_EXTENSION),
            resources,
        ))
    }

    fn from_reader(reader: TemplateReader) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        register_helpers(&mut registry);

        Self {
            reader,
            registry: RwLock::new(registry),
        }
    }

    /// Number of compiled templates held in the cache
    pub fn cached_templates(&self) -> usize {
        self.read_registry().get_templates().len()
    }

    fn read_registry(&self) -> RwLockReadGuard<'_, Handlebars<'static>> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_registry(&self) -> RwLockWriteGuard<'_, Handlebars<'static>> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Compile `name` and every statically referenced partial into the cache.
    ///
    /// Partials are registered before the template that includes them, so a
    /// cached template always has its partials available. References to
    /// inline partials declared by the template or any template including it
    /// are left to the registry. When two threads compile the same template
    /// concurrently the first registration wins.
    fn compile(
        &self,
        name: &str,
        optional: bool,
        inline: &HashSet<String>,
        visited: &mut HashSet<String>,
    ) -> Result<()> {
        if !visited.insert(name.to_string()) {
            return Ok(());
        }
        if self.read_registry().has_template(name) {
            debug!(template = name, "Handlebars cache hit");
            return Ok(());
        }

        let source = match self.reader.read(name) {
            Ok(source) => source,
            // A partial block renders its own body when the partial is missing
            Err(e) if optional && e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        };

        let mut declared = inline_partials(&source);
        declared.extend(inline.iter().cloned());
        for partial in partial_tags(&source) {
            if declared.contains(&partial.name) {
                continue;
            }
            self.compile(&partial.name, partial.block, &declared, visited)?;
        }

        let mut registry = self.write_registry();
        if !registry.has_template(name) {
            debug!(template = name, "Compiling handlebars template");
            registry
                .register_template_string(name, &source)
                .map_err(|e| Error::syntax(name, e))?;
        }
        Ok(())
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn render(&self, name: &str, data: &Value) -> Result<String> {
        self.compile(name, false, &HashSet::new(), &mut HashSet::new())?;

        self.read_registry()
            .render(name, data)
            .map_err(|e| Error::render(name, e))
    }

    fn file_extension(&self) -> Option<&str> {
        Some(HANDLEBARS_EXTENSION)
    }
}

impl std::fmt::Debug for HandlebarsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlebarsEngine")
            .field("reader", &self.reader)
            .field("cached_templates", &self.cached_templates())
            .finish()
    }
}
