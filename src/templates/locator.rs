//! Template lookup across the user template folder and the bundled resources.
//!
//! A logical template name is resolved by walking a fixed list of tiers and,
//! inside every tier, trying each recognised extension in registration order.
//! The first existing candidate wins:
//!
//! 1. `<template_dir>/libraries/<library>/` on disk (only with a library)
//! 2. `<template_dir>/` on disk
//! 3. `<embedded_template_dir>/libraries/<library>/` in the bundle (only with a library)
//! 4. `<embedded_template_dir>/` in the bundle
//! 5. `<common_template_dir>/` in the bundle, never with a library subfolder
//!
//! A name may be a bare basename (`model`) or a full file name
//! (`Cargo.toml`). Names ending in the legacy `.mustache` suffix are
//! stripped first so the extension is re-derived by the search.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::embedded::resource_id;
use super::{ResourceStore, TemplatePath};
use crate::config::GenerationConfig;
use crate::error::{Error, Result};

/// File extension of mustache-syntax templates
pub const MUSTACHE_EXTENSION: &str = "mustache";

/// File extension of handlebars-syntax templates
pub const HANDLEBARS_EXTENSION: &str = "hbs";

const LEGACY_TEMPLATE_SUFFIX: &str = ".mustache";

/// Ordered, de-duplicated list of recognised template extensions.
///
/// The first entry is always the "no extension" sentinel, which matches a
/// name verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateExtensions(Vec<Option<String>>);

impl TemplateExtensions {
    /// Extensions matching names verbatim only
    pub fn exact() -> Self {
        Self(vec![None])
    }

    /// Sentinel followed by `extensions` in order, duplicates dropped
    pub fn with<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::exact();
        for extension in extensions {
            list.push(extension.as_ref());
        }
        list
    }

    fn push(&mut self, extension: &str) {
        let extension = extension.trim_start_matches('.');
        if !self.0.iter().any(|e| e.as_deref() == Some(extension)) {
            self.0.push(Some(extension.to_string()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(|e| e.as_deref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// File names to probe for `name`, in precedence order
    pub fn candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = String> + 'a {
        self.iter().map(move |extension| match extension {
            None => name.to_string(),
            Some(extension) => format!("{name}.{extension}"),
        })
    }
}

/// One stratum of the template search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTier {
    /// Library subfolder of the user template folder
    Library,
    /// User template folder
    TemplateDir,
    /// Library subfolder of the bundled target folder
    EmbeddedLibrary,
    /// Bundled target folder
    Embedded,
    /// Bundled folder shared by all targets
    Common,
}

impl SearchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::TemplateDir => "template_dir",
            Self::EmbeddedLibrary => "embedded_library",
            Self::Embedded => "embedded",
            Self::Common => "common",
        }
    }

    /// Whether this tier reads from the bundled resources
    pub fn is_bundled(&self) -> bool {
        !matches!(self, Self::Library | Self::TemplateDir)
    }
}

impl fmt::Display for SearchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves logical template names to concrete template sources.
#[derive(Clone)]
pub struct TemplateLocator {
    extensions: TemplateExtensions,
    resources: Arc<dyn ResourceStore>,
}

impl TemplateLocator {
    /// Create a locator over a custom resource bundle
    pub fn with_resources(extensions: TemplateExtensions, resources: Arc<dyn ResourceStore>) -> Self {
        Self {
            extensions,
            resources,
        }
    }

    pub fn extensions(&self) -> &TemplateExtensions {
        &self.extensions
    }

    /// Resolve `name`, failing with [`Error::TemplateNotFound`] if no tier holds it
    pub fn resolve(&self, config: &GenerationConfig, name: &str) -> Result<TemplatePath> {
        self.find(config, name)
            .ok_or_else(|| Error::not_found(name))
    }

    /// Resolve `name`, returning `None` if no tier holds it
    pub fn find(&self, config: &GenerationConfig, name: &str) -> Option<TemplatePath> {
        let name = strip_legacy_extension(name);

        for (tier, folder) in search_tiers(config) {
            let found = if tier.is_bundled() {
                self.find_in_resources(name, &folder)
            } else {
                self.find_in_folder(name, &folder)
            };

            if let Some(path) = found {
                debug!(template = name, tier = %tier, path = %path, "Resolved template");
                return Some(path);
            }
            debug!(template = name, tier = %tier, folder = %folder.display(), "Template not in tier");
        }

        None
    }

    fn find_in_folder(&self, name: &str, folder: &Path) -> Option<TemplatePath> {
        self.extensions
            .candidates(name)
            .map(|candidate| folder.join(candidate))
            .find(|path| path.is_file())
            .map(TemplatePath::File)
    }

    fn find_in_resources(&self, name: &str, folder: &Path) -> Option<TemplatePath> {
        self.extensions
            .candidates(name)
            .map(|candidate| resource_id(&folder.join(candidate)))
            .find(|id| self.resources.contains(id))
            .map(|id| TemplatePath::resource(id, Arc::clone(&self.resources)))
    }
}

impl fmt::Debug for TemplateLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateLocator")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

/// The tiers searched for `config`, in order, with the folder of each.
pub fn search_tiers(config: &GenerationConfig) -> Vec<(SearchTier, PathBuf)> {
    let mut tiers = Vec::with_capacity(5);
    let library = config.library();

    if let Some(library) = library {
        tiers.push((SearchTier::Library, library_path(&config.template_dir, library)));
    }
    tiers.push((SearchTier::TemplateDir, config.template_dir.clone()));

    let embedded = Path::new(&config.embedded_template_dir);
    if let Some(library) = library {
        tiers.push((SearchTier::EmbeddedLibrary, library_path(embedded, library)));
    }
    tiers.push((SearchTier::Embedded, embedded.to_path_buf()));
    tiers.push((
        SearchTier::Common,
        PathBuf::from(&config.common_template_dir),
    ));

    tiers
}

/// Remove the legacy `.mustache` suffix from a caller-supplied name
pub fn strip_legacy_extension(name: &str) -> &str {
    name.strip_suffix(LEGACY_TEMPLATE_SUFFIX).unwrap_or(name)
}

fn library_path(base: &Path, library: &str) -> PathBuf {
    base.join("libraries").join(library)
}
