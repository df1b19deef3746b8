//! CommonMark to HTML conversion for descriptions embedded in templates.

use pulldown_cmark::{Parser, html};

const P_START: &str = "<p>";
const P_END: &str = "</p>\n";

/// Convert Markdown text to HTML.
///
/// A result made of a single paragraph is returned without its `<p>`
/// wrapper, so short descriptions can be inlined into non-block contexts
/// such as a one-line summary. `None` converts to an empty string.
///
/// ```
/// use templar::markdown::to_html;
///
/// assert_eq!(to_html(Some("*pets*")), "<em>pets</em>");
/// assert_eq!(to_html(None), "");
/// ```
pub fn to_html(markdown: Option<&str>) -> String {
    let Some(markdown) = markdown else {
        return String::new();
    };

    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new(markdown));
    unwrapped(rendered)
}

fn unwrapped(html: String) -> String {
    let single_paragraph =
        html.starts_with(P_START) && html.ends_with(P_END) && html.rfind(P_START) == Some(0);

    if single_paragraph {
        html[P_START.len()..html.len() - P_END.len()].to_string()
    } else {
        html
    }
}
