//! Helpers available to handlebars-syntax templates.
//!
//! The humanize set turns identifiers and numbers from the data model into
//! readable text, e.g. `{{titleize operationId}}` or `{{binaryPrefix size}}`.
//! `equals` is a block helper for comparisons:
//!
//! ```handlebars
//! {{#equals httpMethod "GET"}}read-only{{else}}mutating{{/equals}}
//! ```

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderErrorReason, Renderable, handlebars_helper,
};
use inflector::Inflector;
use serde_json::Value;

handlebars_helper!(camelize: |s: str| s.to_camel_case());
handlebars_helper!(decamelize: |s: str| s.to_snake_case().replace('_', " "));
handlebars_helper!(titleize: |s: str| s.to_title_case());
handlebars_helper!(underscore: |s: str| s.to_snake_case());
handlebars_helper!(hyphenate: |s: str| s.to_kebab_case());
handlebars_helper!(capitalize: |s: str| capitalize_first(s));
handlebars_helper!(pluralize: |s: str| s.to_plural());
handlebars_helper!(singularize: |s: str| s.to_singular());
handlebars_helper!(ordinalize: |v: Json| display_value(v).ordinalize());
handlebars_helper!(slugify: |s: str| slug(s));
handlebars_helper!(word_wrap: |s: str, len: u64| wrap_at_word(s, len as usize));
handlebars_helper!(binary_prefix: |n: f64| scaled(n, 1024.0, &["bytes", "KB", "MB", "GB", "TB", "PB", "EB"], " "));
handlebars_helper!(metric_prefix: |n: f64| scaled(n, 1000.0, &["", "k", "M", "G", "T", "P", "E"], ""));
handlebars_helper!(spell_digit: |v: Json| spell(v));
handlebars_helper!(format_percent: |n: f64| format!("{}%", trim_number(n * 100.0)));

/// Block helper rendering its body when both parameters are equal, the
/// `{{else}}` branch otherwise.
pub struct EqualsHelper;

impl HelperDef for EqualsHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let left = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("equals", 0))?;
        let right = h
            .param(1)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("equals", 1))?;

        let branch = if left.value() == right.value() {
            h.template()
        } else {
            h.inverse()
        };

        match branch {
            Some(template) => template.render(r, ctx, rc, out),
            None => Ok(()),
        }
    }
}

/// Register every built-in helper on `registry`
pub fn register_helpers(registry: &mut Handlebars<'_>) {
    registry.register_helper("camelize", Box::new(camelize));
    registry.register_helper("decamelize", Box::new(decamelize));
    registry.register_helper("titleize", Box::new(titleize));
    registry.register_helper("underscore", Box::new(underscore));
    registry.register_helper("hyphenate", Box::new(hyphenate));
    registry.register_helper("capitalize", Box::new(capitalize));
    registry.register_helper("pluralize", Box::new(pluralize));
    registry.register_helper("singularize", Box::new(singularize));
    registry.register_helper("ordinalize", Box::new(ordinalize));
    registry.register_helper("slugify", Box::new(slugify));
    registry.register_helper("wordWrap", Box::new(word_wrap));
    registry.register_helper("binaryPrefix", Box::new(binary_prefix));
    registry.register_helper("metricPrefix", Box::new(metric_prefix));
    registry.register_helper("spellDigit", Box::new(spell_digit));
    registry.register_helper("formatPercent", Box::new(format_percent));
    registry.register_helper("equals", Box::new(EqualsHelper));
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn slug(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Truncate `s` at the first word boundary at or after `len` characters
fn wrap_at_word(s: &str, len: usize) -> String {
    if s.chars().count() <= len {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .skip(len)
        .find(|(_, c)| c.is_whitespace())
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    s[..cut].to_string()
}

fn scaled(n: f64, base: f64, units: &[&str], separator: &str) -> String {
    let mut value = n;
    let mut unit = 0;
    while value.abs() >= base && unit + 1 < units.len() {
        value /= base;
        unit += 1;
    }
    let suffix = units[unit];
    if suffix.is_empty() {
        trim_number(value)
    } else {
        format!("{}{separator}{suffix}", trim_number(value))
    }
}

/// Format with at most two decimals, dropping trailing zeros
fn trim_number(n: f64) -> String {
    let formatted = format!("{n:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn spell(value: &Value) -> String {
    const DIGITS: [&str; 10] = [
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
    ];
    match value.as_u64() {
        Some(d) if d < 10 => DIGITS[d as usize].to_string(),
        _ => display_value(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, data: &Value) -> String {
        let mut registry = Handlebars::new();
        register_helpers(&mut registry);
        registry.render_template(template, data).unwrap()
    }

    #[test]
    fn test_case_helpers() {
        let data = json!({"id": "find pets by status", "op": "findPetsByStatus"});

        assert_eq!(render("{{camelize id}}", &data), "findPetsByStatus");
        assert_eq!(render("{{decamelize op}}", &data), "find pets by status");
        assert_eq!(render("{{titleize id}}", &data), "Find Pets By Status");
        assert_eq!(render("{{underscore op}}", &data), "find_pets_by_status");
        assert_eq!(render("{{hyphenate op}}", &data), "find-pets-by-status");
        assert_eq!(render("{{capitalize op}}", &data), "FindPetsByStatus");
    }

    #[test]
    fn test_inflection_helpers() {
        let data = json!({"noun": "category", "plural": "pets", "rank": 2});

        assert_eq!(render("{{pluralize noun}}", &data), "categories");
        assert_eq!(render("{{singularize plural}}", &data), "pet");
        assert_eq!(render("{{ordinalize rank}}", &data), "2nd");
    }

    #[test]
    fn test_text_helpers() {
        let data = json!({"title": "Pet Store: v2 API!", "text": "Lorem ipsum dolorem si amet"});

        assert_eq!(render("{{slugify title}}", &data), "pet-store-v2-api");
        assert_eq!(render("{{wordWrap text 8}}", &data), "Lorem ipsum");
        assert_eq!(render("{{wordWrap text 100}}", &data), "Lorem ipsum dolorem si amet");
    }

    #[test]
    fn test_number_helpers() {
        let data = json!({"small": 512, "kib": 1536, "big": 2500000, "ratio": 0.125, "digit": 7, "many": 42});

        assert_eq!(render("{{binaryPrefix small}}", &data), "512 bytes");
        assert_eq!(render("{{binaryPrefix kib}}", &data), "1.5 KB");
        assert_eq!(render("{{metricPrefix big}}", &data), "2.5M");
        assert_eq!(render("{{formatPercent ratio}}", &data), "12.5%");
        assert_eq!(render("{{spellDigit digit}}", &data), "seven");
        assert_eq!(render("{{spellDigit many}}", &data), "42");
    }

    #[test]
    fn test_equals_helper() {
        let template = "{{#equals method \"GET\"}}read{{else}}write{{/equals}}";

        assert_eq!(render(template, &json!({"method": "GET"})), "read");
        assert_eq!(render(template, &json!({"method": "POST"})), "write");
        assert_eq!(render(template, &json!({})), "write");
        assert_eq!(render("{{#equals a b}}same{{/equals}}", &json!({"a": 1, "b": 2})), "");
    }

    #[test]
    fn test_helper_without_argument_fails() {
        let mut registry = Handlebars::new();
        register_helpers(&mut registry);
        assert!(registry.render_template("{{#equals}}x{{/equals}}", &json!({})).is_err());
    }
}
