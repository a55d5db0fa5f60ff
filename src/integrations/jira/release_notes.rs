//! Pulling the release notes out of Jira's "Release Notes" page.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn editcopy() -> &'static Regex {
    static EDITCOPY: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)] // Constant pattern
    EDITCOPY.get_or_init(|| {
        Regex::new(
            r#"(?is)<textarea\b[^>]*\bid\s*=\s*["']?editcopy["']?[^>]*>(.*?)</textarea\s*>"#,
        )
        .unwrap()
    })
}

fn entity() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)] // Constant pattern
    ENTITY.get_or_init(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap())
}

/// The text of the `editcopy` text area, which is where Jira renders copyable release notes.
///
/// Returns `None` if the page doesn't have one, which happens when Jira serves something other
/// than the release notes (an error page, a login form).
pub(crate) fn from_page(page: &str) -> Option<String> {
    let content = editcopy().captures(page)?.get(1)?.as_str();
    // Browsers drop a single newline right after `<textarea>`
    let content = content
        .strip_prefix("\r\n")
        .or_else(|| content.strip_prefix('\n'))
        .unwrap_or(content);
    Some(decode_entities(content))
}

fn decode_entities(text: &str) -> String {
    entity()
        .replace_all(text, |captures: &Captures| {
            let whole = captures.get(0).map_or("", |whole| whole.as_str());
            let name = captures.get(1).map_or("", |name| name.as_str());
            decode_entity(name).map_or_else(|| whole.to_string(), String::from)
        })
        .into_owned()
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(hex) = name
        .strip_prefix("#x")
        .or_else(|| name.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(decimal) = name.strip_prefix('#') {
        return decimal.parse().ok().and_then(char::from_u32);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}
