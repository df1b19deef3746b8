//! Template engine using logic-less `mustache` syntax.
//!
//! Supports variable interpolation, sections, inverted sections, set
//! delimiter tags and partials. Variables that cannot be resolved in any
//! enclosing scope render as an empty string, so sparse data models never
//! fail a render.
//!
//! Partials (`{{> name}}`) are located with the same search as top-level
//! templates. Every partial reachable from the template is copied into a
//! private scratch folder and handed to the `mustache` crate from there, so
//! the crate never reads from the working directory and recursive partials
//! stop where the data ends.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Component, Path};
use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;
use tracing::debug;

use super::{MUSTACHE_EXTENSION, ResourceStore, TemplateEngine, TemplateReader};
use crate::config::GenerationConfig;
use crate::error::{Error, Result};

const DEFAULT_OPEN: &str = "{{";
const DEFAULT_CLOSE: &str = "}}";

#[derive(Debug, Clone)]
pub struct MustacheEngine {
    reader: TemplateReader,
}

impl MustacheEngine {
    pub fn new(config: Arc<GenerationConfig>) -> Self {
        Self {
            reader: TemplateReader::new(config, Some(MUSTACHE_EXTENSION)),
        }
    }

    pub fn with_resources(config: Arc<GenerationConfig>, resources: Arc<dyn ResourceStore>) -> Self {
        Self {
            reader: TemplateReader::with_resources(config, Some(MUSTACHE_EXTENSION), resources),
        }
    }

    /// Read every partial reachable from `source`, keyed by partial name.
    ///
    /// Fails if a partial cannot be located, or if a chain of partials
    /// includes itself outside of any section, which no data could stop.
    fn collect_partials(&self, name: &str, source: &str) -> Result<BTreeMap<String, String>> {
        let mut partials = BTreeMap::new();
        let mut unguarded: HashMap<String, Vec<String>> = HashMap::new();
        let mut pending = vec![(name.to_string(), partial_tags(source))];

        while let Some((owner, tags)) = pending.pop() {
            let mut direct = Vec::new();
            for tag in tags {
                if !tag.guarded {
                    direct.push(tag.name.clone());
                }
                if partials.contains_key(&tag.name) {
                    continue;
                }
                check_partial_name(&owner, &tag.name)?;

                debug!(template = %owner, partial = %tag.name, "Loading mustache partial");
                let partial = self.reader.read(&tag.name)?;
                pending.push((tag.name.clone(), partial_tags(&partial)));
                partials.insert(tag.name, partial);
            }
            unguarded.entry(owner).or_default().extend(direct);
        }

        check_bounded(name, &unguarded, &mut Vec::new(), &mut HashSet::new())?;
        Ok(partials)
    }
}

impl TemplateEngine for MustacheEngine {
    fn render(&self, name: &str, data: &Value) -> Result<String> {
        let source = self.reader.read(name)?;
        let partials = self.collect_partials(name, &source)?;

        // The crate loads partials from `<template_path>/<name>.mustache`
        let scratch = TempDir::new()?;
        for (partial, content) in &partials {
            let mut path = scratch.path().join(partial);
            path.set_extension(MUSTACHE_EXTENSION);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
        }

        let context = mustache::Context::new(scratch.path().to_path_buf());
        let template = context
            .compile(source.chars())
            .map_err(|e| Error::syntax(name, e))?;
        template
            .render_to_string(data)
            .map_err(|e| Error::render(name, e))
    }

    fn file_extension(&self) -> Option<&str> {
        Some(MUSTACHE_EXTENSION)
    }
}

/// A partial tag found while scanning a mustache source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MustachePartial {
    name: String,
    /// Inside a section or inverted section, so the data decides whether it renders
    guarded: bool,
}

/// Partial tags in `source`, honouring set delimiter tags.
fn partial_tags(source: &str) -> Vec<MustachePartial> {
    let mut open = DEFAULT_OPEN.to_string();
    let mut close = DEFAULT_CLOSE.to_string();
    let mut depth = 0usize;
    let mut partials = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find(open.as_str()) {
        let after = &rest[start + open.len()..];
        // Triple mustache closes with an extra brace
        let closing = if after.starts_with('{') {
            format!("}}{close}")
        } else {
            close.clone()
        };
        let Some(end) = after.find(closing.as_str()) else {
            break;
        };
        let content = after[..end].trim();
        rest = &after[end + closing.len()..];

        match content.chars().next() {
            Some('#' | '^') => depth += 1,
            Some('/') => depth = depth.saturating_sub(1),
            Some('>') => partials.push(MustachePartial {
                name: content[1..].trim().to_string(),
                guarded: depth > 0,
            }),
            Some('=') if content.len() > 1 && content.ends_with('=') => {
                let mut delimiters = content[1..content.len() - 1].split_whitespace();
                if let (Some(o), Some(c), None) =
                    (delimiters.next(), delimiters.next(), delimiters.next())
                {
                    open = o.to_string();
                    close = c.to_string();
                }
            }
            _ => {}
        }
    }

    partials
}

/// Partial names become paths in the scratch folder and must stay inside it
fn check_partial_name(owner: &str, name: &str) -> Result<()> {
    let path = Path::new(name);
    let valid = !name.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if valid {
        Ok(())
    } else {
        Err(Error::syntax(owner, format!("invalid partial name '{name}'")))
    }
}

fn check_bounded(
    name: &str,
    unguarded: &HashMap<String, Vec<String>>,
    chain: &mut Vec<String>,
    done: &mut HashSet<String>,
) -> Result<()> {
    if chain.iter().any(|n| n == name) {
        return Err(Error::syntax(
            name,
            format!("partial '{name}' includes itself outside of any section"),
        ));
    }
    if done.contains(name) {
        return Ok(());
    }

    chain.push(name.to_string());
    for next in unguarded.get(name).into_iter().flatten() {
        check_bounded(next, unguarded, chain, done)?;
    }
    chain.pop();
    done.insert(name.to_string());
    Ok(())
}
