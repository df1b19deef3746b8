//! Extension-keyed dispatch across template engines.
//!
//! [`MultiTemplateEngine`] selects the engine by the extension of the file
//! a name actually resolves to, not by whatever the caller typed:
//!
//! | extension  | engine                 |
//! |------------|------------------------|
//! | `mustache` | [`MustacheEngine`]     |
//! | `hbs`      | [`HandlebarsEngine`]   |
//! | other      | [`ExactCopyEngine`]    |
//!
//! Files with any other extension must be referenced by their full name and
//! are copied as-is. More engines can be added through the builder. The
//! search order of the dispatcher's locator is derived from the engine
//! table when it is built, so the two can never disagree; registration order
//! decides which file wins when a basename matches several syntaxes.
//!
//! # Example
//!
//! ```no_run
//! use templar::{GenerationConfig, MultiTemplateEngine, TemplateEngine};
//! use serde_json::json;
//!
//! let config = GenerationConfig::new("./templates", "rust").with_library("axum");
//! let engine = MultiTemplateEngine::new(config);
//! let rendered = engine.render("model", &json!({"name": "Pet"}))?;
//! # Ok::<(), templar::Error>(())
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    EmbeddedTemplates, ExactCopyEngine, HANDLEBARS_EXTENSION, HandlebarsEngine,
    MUSTACHE_EXTENSION, MustacheEngine, ResourceStore, TemplateEngine, TemplateExtensions,
    TemplateLocator, TemplatePath,
};
use crate::config::GenerationConfig;
use crate::error::{Error, Result};

/// The engines a dispatcher can delegate to.
pub enum Engine {
    ExactCopy(ExactCopyEngine),
    Mustache(MustacheEngine),
    Handlebars(HandlebarsEngine),
    UserDefined(Arc<dyn TemplateEngine>),
}

impl Engine {
    fn as_engine(&self) -> &dyn TemplateEngine {
        match self {
            Self::ExactCopy(engine) => engine,
            Self::Mustache(engine) => engine,
            Self::Handlebars(engine) => engine,
            Self::UserDefined(engine) => engine.as_ref(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ExactCopy(_) => "exact_copy",
            Self::Mustache(_) => "mustache",
            Self::Handlebars(_) => "handlebars",
            Self::UserDefined(_) => "user_defined",
        }
    }
}

impl TemplateEngine for Engine {
    fn render(&self, name: &str, data: &Value) -> Result<String> {
        self.as_engine().render(name, data)
    }

    fn file_extension(&self) -> Option<&str> {
        self.as_engine().file_extension()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Engine").field(&self.kind()).finish()
    }
}

/// An engine waiting for the builder's final resource bundle.
enum Registration {
    Mustache,
    Handlebars,
    UserDefined(String, Arc<dyn TemplateEngine>),
}

impl Registration {
    fn extension(&self) -> &str {
        match self {
            Self::Mustache => MUSTACHE_EXTENSION,
            Self::Handlebars => HANDLEBARS_EXTENSION,
            Self::UserDefined(extension, _) => extension,
        }
    }

    fn build(self, config: &Arc<GenerationConfig>, resources: &Arc<dyn ResourceStore>) -> Engine {
        match self {
            Self::Mustache => Engine::Mustache(MustacheEngine::with_resources(
                Arc::clone(config),
                Arc::clone(resources),
            )),
            Self::Handlebars => Engine::Handlebars(HandlebarsEngine::with_resources(
                Arc::clone(config),
                Arc::clone(resources),
            )),
            Self::UserDefined(_, engine) => Engine::UserDefined(engine),
        }
    }
}

/// Collects engines for a [`MultiTemplateEngine`].
pub struct MultiTemplateEngineBuilder {
    config: Arc<GenerationConfig>,
    resources: Arc<dyn ResourceStore>,
    registrations: Vec<Registration>,
}

impl MultiTemplateEngineBuilder {
    /// Builder with no syntax engines; everything renders as exact copy
    pub fn empty(config: impl Into<Arc<GenerationConfig>>) -> Self {
        Self {
            config: config.into(),
            resources: Arc::new(EmbeddedTemplates),
            registrations: Vec::new(),
        }
    }

    /// Search `resources` instead of the compiled-in templates
    pub fn with_resources(mut self, resources: Arc<dyn ResourceStore>) -> Self {
        self.resources = resources;
        self
    }

    /// Register an additional engine under its own file extension.
    ///
    /// Fails if the engine claims no extension, which is reserved for the
    /// exact-copy fallback. Registering an extension twice replaces the
    /// earlier engine but keeps its precedence.
    pub fn register(self, engine: impl TemplateEngine + 'static) -> Result<Self> {
        self.register_shared(Arc::new(engine))
    }

    /// [`register`](Self::register) for an engine that is already shared
    pub fn register_shared(self, engine: Arc<dyn TemplateEngine>) -> Result<Self> {
        let extension = engine
            .file_extension()
            .map(|e| e.trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                Error::config("A template engine must declare a file extension to be registered")
            })?;

        Ok(self.push(Registration::UserDefined(extension, engine)))
    }

    fn push(mut self, registration: Registration) -> Self {
        let slot = self
            .registrations
            .iter()
            .position(|r| r.extension() == registration.extension());

        match slot {
            Some(idx) => {
                warn!(
                    extension = registration.extension(),
                    "Replacing registered template engine"
                );
                self.registrations[idx] = registration;
            }
            None => self.registrations.push(registration),
        }
        self
    }

    /// Build the dispatcher; the table and search order are fixed from here on
    pub fn build(self) -> MultiTemplateEngine {
        let extensions =
            TemplateExtensions::with(self.registrations.iter().map(Registration::extension));
        let locator = TemplateLocator::with_resources(extensions, Arc::clone(&self.resources));

        let engines = self
            .registrations
            .into_iter()
            .map(|registration| {
                let extension = registration.extension().to_string();
                (extension, registration.build(&self.config, &self.resources))
            })
            .collect();

        let exact_copy = Engine::ExactCopy(ExactCopyEngine::with_resources(
            Arc::clone(&self.config),
            Arc::clone(&self.resources),
        ));

        MultiTemplateEngine {
            config: self.config,
            locator,
            engines,
            exact_copy,
        }
    }
}

/// Renders each template with the engine matching its file extension.
pub struct MultiTemplateEngine {
    config: Arc<GenerationConfig>,
    locator: TemplateLocator,
    /// Engine table in registration order
    engines: Vec<(String, Engine)>,
    exact_copy: Engine,
}

impl MultiTemplateEngine {
    /// Dispatcher with the mustache and handlebars engines over the compiled-in templates
    pub fn new(config: impl Into<Arc<GenerationConfig>>) -> Self {
        Self::builder(config).build()
    }

    /// Builder seeded with the mustache and handlebars engines, in that order
    pub fn builder(config: impl Into<Arc<GenerationConfig>>) -> MultiTemplateEngineBuilder {
        MultiTemplateEngineBuilder::empty(config)
            .push(Registration::Mustache)
            .push(Registration::Handlebars)
    }

    /// Extensions searched for a bare basename, in precedence order
    pub fn extensions(&self) -> &TemplateExtensions {
        self.locator.extensions()
    }

    /// Find the file `name` resolves to across all registered syntaxes
    pub fn locate(&self, name: &str) -> Result<TemplatePath> {
        self.locator.resolve(&self.config, name)
    }

    /// The engine for files with `extension`; unknown extensions get exact copy
    pub fn engine_for(&self, extension: Option<&str>) -> &Engine {
        extension
            .and_then(|ext| {
                self.engines
                    .iter()
                    .find(|(key, _)| key == ext)
                    .map(|(_, engine)| engine)
            })
            .unwrap_or(&self.exact_copy)
    }

    /// Serialise `model` and render `name` with it
    pub fn render_with<T: Serialize>(&self, name: &str, model: &T) -> Result<String> {
        let data = serde_json::to_value(model)?;
        self.render(name, &data)
    }
}

impl TemplateEngine for MultiTemplateEngine {
    fn render(&self, name: &str, data: &Value) -> Result<String> {
        let template = self.locate(name)?;
        let extension = template.extension();
        let engine = self.engine_for(extension.as_deref());

        debug!(
            template = name,
            path = %template,
            engine = engine.kind(),
            "Dispatching template"
        );
        engine.render(name, data)
    }

    fn file_extension(&self) -> Option<&str> {
        None
    }
}

impl std::fmt::Debug for MultiTemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiTemplateEngine")
            .field("config", &self.config)
            .field("extensions", self.extensions())
            .field("engines", &self.engines)
            .finish()
    }
}
