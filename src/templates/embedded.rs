//! Bundled template resources.
//!
//! Templates shipped with the tool are compiled into the binary with the
//! `rust-embed` crate, so generation works right after `cargo install`
//! without a separate template checkout.
//!
//! # Resource identifiers
//!
//! A resource is addressed by its path relative to the bundled root, always
//! using `/` as the separator (for example `rust/libraries/axum/main.rs.mustache`).
//! Callers building identifiers from host paths must normalise them with
//! [`resource_id`] first.
//!
//! Other bundles can be plugged in through the [`ResourceStore`] trait;
//! [`MemoryResources`] keeps them in a map.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{MAIN_SEPARATOR, Path};

use rust_embed::RustEmbed;

/// Read access to a set of bundled template resources.
pub trait ResourceStore: Send + Sync {
    /// Load the bytes of the resource, or `None` if it is not bundled
    fn load(&self, id: &str) -> Option<Cow<'static, [u8]>>;

    /// Check whether the resource is bundled
    fn contains(&self, id: &str) -> bool {
        self.load(id).is_some()
    }
}

/// Container for all templates embedded at compile time.
///
/// This struct uses the `rust-embed` derive macro to include all files
/// from the `templates/` directory in the binary.
#[derive(RustEmbed)]
#[folder = "templates/"]
pub struct EmbeddedTemplates;

impl ResourceStore for EmbeddedTemplates {
    fn load(&self, id: &str) -> Option<Cow<'static, [u8]>> {
        <EmbeddedTemplates as RustEmbed>::get(id).map(|file| file.data)
    }
}

/// In-memory resource bundle.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource; host separators in `id` are normalised to `/`
    pub fn insert(&mut self, id: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.files.insert(resource_id(id.as_ref()), contents.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, id: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(id, contents);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceStore for MemoryResources {
    fn load(&self, id: &str) -> Option<Cow<'static, [u8]>> {
        self.files.get(id).map(|data| Cow::Owned(data.clone()))
    }

    fn contains(&self, id: &str) -> bool {
        self.files.contains_key(id)
    }
}

/// Convert a host path into a resource identifier with `/` separators.
pub fn resource_id(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let normalized = if MAIN_SEPARATOR == '/' {
        raw.into_owned()
    } else {
        raw.replace(MAIN_SEPARATOR, "/")
    };
    // Relative host paths may carry a `./` prefix
    normalized.trim_start_matches("./").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_memory_resources_lookup() {
        let store = MemoryResources::new().with("rust/model.mustache", "struct {{name}};");

        assert_eq!(store.len(), 1);
        assert!(store.contains("rust/model.mustache"));
        assert!(!store.contains("rust/model"));
        assert_eq!(
            store.load("rust/model.mustache").as_deref(),
            Some(b"struct {{name}};".as_slice())
        );
    }

    #[test]
    fn test_resource_id_uses_forward_slashes() {
        let path: PathBuf = ["rust", "libraries", "axum", "main.rs"].iter().collect();
        assert_eq!(resource_id(&path), "rust/libraries/axum/main.rs");
    }

    #[test]
    fn test_resource_id_strips_current_dir_prefix() {
        assert_eq!(resource_id(Path::new("./model.mustache")), "model.mustache");
    }

    #[test]
    fn test_real_embedded_templates_available() {
        let store = EmbeddedTemplates;

        assert!(store.contains("_common/LICENSE"));
        assert!(store.contains("rust/model.mustache"));
        assert!(store.contains("rust/libraries/axum/main.rs.mustache"));
        assert!(!store.contains("rust/does-not-exist.mustache"));
    }
}
