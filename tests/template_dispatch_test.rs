//! Integration tests for template resolution and engine dispatch

use std::fs;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use tempfile::TempDir;
use templar::templates::{
    ExactCopyEngine, HandlebarsEngine, MemoryResources, MustacheEngine, SearchTier, search_tiers,
};
use templar::{Error, GenerationConfig, MultiTemplateEngine, TemplateEngine};

fn write(dir: &TempDir, relative: &str, contents: &str) {
    let path = dir.path().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn bundled() -> MemoryResources {
    MemoryResources::new()
        .with("go/libraries/gin/server.mustache", "gin {{name}}")
        .with("go/server.mustache", "net/http {{name}}")
        .with("go/model.hbs", "type {{camelize name}} struct{}")
        .with("_common/LICENSE", "MIT {{year}}")
        .with("_common/libraries/gin/LICENSE", "never used")
}

fn engine(dir: &TempDir, library: Option<&str>) -> MultiTemplateEngine {
    let mut config = GenerationConfig::new(dir.path(), "go");
    config.library = library.map(str::to_string);
    MultiTemplateEngine::builder(config)
        .with_resources(Arc::new(bundled()))
        .build()
}

#[test]
fn test_search_tiers_follow_precedence() {
    let config = GenerationConfig::new("/work/templates", "go").with_library("gin");
    let tiers: Vec<SearchTier> = search_tiers(&config).into_iter().map(|(t, _)| t).collect();

    assert_eq!(
        tiers,
        vec![
            SearchTier::Library,
            SearchTier::TemplateDir,
            SearchTier::EmbeddedLibrary,
            SearchTier::Embedded,
            SearchTier::Common,
        ]
    );
}

#[test]
fn test_user_templates_override_bundled() {
    let dir = TempDir::new().unwrap();
    let data = json!({"name": "pets"});

    let engine = engine(&dir, Some("gin"));
    assert_eq!(engine.render("server", &data).unwrap(), "gin pets");

    write(&dir, "server.hbs", "custom {{name}}");
    let engine = self::engine(&dir, Some("gin"));
    assert_eq!(engine.render("server", &data).unwrap(), "custom pets");

    write(&dir, "libraries/gin/server.mustache", "custom gin {{name}}");
    let engine = self::engine(&dir, Some("gin"));
    assert_eq!(engine.render("server", &data).unwrap(), "custom gin pets");
}

#[test]
fn test_library_falls_back_to_flavorless_templates() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir, Some("echo"));

    assert_eq!(
        engine.render("server", &json!({"name": "pets"})).unwrap(),
        "net/http pets"
    );
}

#[test]
fn test_common_tier_ignores_library() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir, Some("gin"));

    let path = engine.locate("LICENSE").unwrap();
    assert_eq!(path.path(), "_common/LICENSE");
    assert!(path.is_resource());
    assert_eq!(
        engine.render("LICENSE", &json!({"year": 2024})).unwrap(),
        "MIT {{year}}"
    );
}

#[test]
fn test_engine_is_chosen_by_resolved_extension() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir, None);

    assert_eq!(
        engine.render("model", &json!({"name": "pet_owner"})).unwrap(),
        "type petOwner struct{}"
    );
    assert_eq!(
        engine.render("server.mustache", &json!({"name": "pets"})).unwrap(),
        "net/http pets"
    );
}

#[test]
fn test_missing_template_reports_name() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir, None);

    let err = engine.render("api", &Value::Null).unwrap_err();
    assert!(matches!(&err, Error::TemplateNotFound(name) if name == "api"));
    assert_eq!(err.to_string(), "The template file 'api' was not found");
}

#[test]
fn test_render_serializable_model() {
    #[derive(Serialize)]
    struct Model {
        name: String,
    }

    let dir = TempDir::new().unwrap();
    write(&dir, "greeting.mustache", "Hello {{name}}{{unknown}}!");
    let engine = engine(&dir, None);

    let model = Model {
        name: "Pet Store".to_string(),
    };
    assert_eq!(
        engine.render_with("greeting", &model).unwrap(),
        "Hello Pet Store!"
    );
}

#[test]
fn test_bundled_templates_render() {
    let dir = TempDir::new().unwrap();
    let config = GenerationConfig::new(dir.path(), "rust").with_library("axum");
    let engine = MultiTemplateEngine::new(config);

    let model = engine
        .render(
            "model",
            &json!({"name": "Pet", "fields": [{"field": "id", "type": "i64"}]}),
        )
        .unwrap();
    assert!(model.starts_with("// This file is generated."));
    assert!(model.contains("pub struct Pet {"));
    assert!(model.contains("pub id: i64,"));

    let manifest = engine
        .render("Cargo.toml", &json!({"name": "PetStore", "library": "axum"}))
        .unwrap();
    assert!(manifest.contains("name = \"pet-store\""));
    assert!(manifest.contains("version = \"0.1.0\""));
    assert!(manifest.contains("axum = \"0.8\""));

    assert_eq!(
        engine.locate("main.rs").unwrap().path(),
        "rust/libraries/axum/main.rs.mustache"
    );
}

#[test]
fn test_standalone_engines_use_bundled_templates() {
    let dir = TempDir::new().unwrap();
    let config = Arc::new(GenerationConfig::new(dir.path(), "rust").with_library("axum"));

    let mustache = MustacheEngine::new(Arc::clone(&config));
    let main = mustache
        .render("main.rs", &json!({"host": "0.0.0.0:8080", "operations": []}))
        .unwrap();
    assert!(main.starts_with("// This file is generated."));
    assert!(main.contains("bind(\"0.0.0.0:8080\")"));

    let handlebars = HandlebarsEngine::new(Arc::clone(&config));
    let manifest = handlebars
        .render("Cargo.toml", &json!({"name": "petStore"}))
        .unwrap();
    assert!(manifest.contains("name = \"pet-store\""));
    assert!(!manifest.contains("axum"));

    let exact = ExactCopyEngine::new(config);
    let license = exact.render("LICENSE", &Value::Null).unwrap();
    assert!(license.starts_with("Copyright {{year}}"));
    assert!(exact.render("model", &Value::Null).unwrap_err().is_not_found());
}

#[test]
fn test_recursive_mustache_partial_on_disk() {
    let dir = TempDir::new().unwrap();
    write(&dir, "tree.mustache", "<ul>{{#roots}}{{> item}}{{/roots}}</ul>");
    write(&dir, "item.mustache", "<li>{{label}}{{#children}}{{> item}}{{/children}}</li>");
    let engine = engine(&dir, None);

    let data = json!({
        "roots": [
            {"label": "pets", "children": [{"label": "dogs", "children": []}]},
            {"label": "stores", "children": []}
        ]
    });
    assert_eq!(
        engine.render("tree", &data).unwrap(),
        "<ul><li>pets<li>dogs</li></li><li>stores</li></ul>"
    );
}
