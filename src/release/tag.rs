use std::sync::OnceLock;

use miette::Diagnostic;
use regex::Regex;

/// Matches the heading Jira puts at the top of release notes, capturing the rest of the line
/// after "Version".
const HEADING_PATTERN: &str = r".*Release notes - .* - Version\s*([^\n]*)";

fn heading() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)] // The pattern is a constant, tested below
    HEADING.get_or_init(|| Regex::new(HEADING_PATTERN).unwrap())
}

/// Pick the tag for a release: `explicit` when given, otherwise parsed from the notes.
///
/// ## Errors
/// 1. `explicit` is blank
/// 2. No `explicit` tag is given and the notes have no usable version heading
pub(crate) fn resolve(notes: &str, explicit: Option<&str>) -> Result<String, Error> {
    match explicit {
        Some(tag) if tag.trim().is_empty() => Err(Error::BlankTag),
        Some(tag) => Ok(tag.to_string()),
        None => extract(notes),
    }
}

/// Parse a tag out of the heading line of some Jira release notes.
///
/// Jira names versions with a free-form label, the version number being the last word of it,
/// so `Release notes - App - Version Sprint 42 3.2.1` gives `3.2.1`.
pub(crate) fn extract(notes: &str) -> Result<String, Error> {
    let captures = heading().captures(notes).ok_or(Error::MissingHeading)?;
    let label = captures.get(1).map_or("", |label| label.as_str());
    label
        .split_whitespace()
        .last()
        .map(ToString::to_string)
        .ok_or_else(|| Error::EmptyVersion {
            heading: captures
                .get(0)
                .map_or_else(String::new, |heading| heading.as_str().trim().to_string()),
        })
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub(crate) enum Error {
    #[error("Could not find a version heading in the release notes")]
    #[diagnostic(
        code(release::tag::missing_heading),
        help(
            "The release notes must contain a line like \"Release notes - <project> - Version <name>\". \
            Pass --tag to choose the tag yourself."
        )
    )]
    MissingHeading,
    #[error("The release notes heading {heading:?} has no version name to use as a tag")]
    #[diagnostic(
        code(release::tag::empty_version),
        help("Pass --tag to choose the tag yourself.")
    )]
    EmptyVersion { heading: String },
    #[error("The tag must not be empty")]
    #[diagnostic(
        code(release::tag::blank),
        help("Leave out --tag to use the version from the release notes.")
    )]
    BlankTag,
}
