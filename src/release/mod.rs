use std::fmt;

use miette::Diagnostic;

pub(crate) use payload::ReleasePayload;

pub(crate) mod payload;
pub(crate) mod tag;

/// The commit released when the user doesn't pick one.
pub(crate) const DEFAULT_COMMIT: &str = "master";

/// What the user asked for, built once from the command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ReleaseRequest {
    pub(crate) project_id: String,
    pub(crate) version_id: String,
    pub(crate) repository: Repository,
    pub(crate) commit: String,
    /// Overrides the tag parsed from the release notes
    pub(crate) tag: Option<String>,
    /// Overrides the release title, which is otherwise the tag
    pub(crate) title: Option<String>,
}

/// Release notes of one Jira version, along with the tag to release them under.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ReleaseNotes {
    pub(crate) raw_text: String,
    pub(crate) tag: String,
}

impl ReleaseNotes {
    /// Pair fetched notes with a tag, parsing one out of the notes only if `explicit_tag` is `None`.
    pub(crate) fn new(raw_text: String, explicit_tag: Option<&str>) -> Result<Self, tag::Error> {
        let tag = tag::resolve(&raw_text, explicit_tag)?;
        Ok(Self { raw_text, tag })
    }
}

/// The GitHub repository a release is created in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Repository {
    pub(crate) owner: String,
    pub(crate) name: String,
}

impl Repository {
    /// Accepts either `name`, owned by `default_owner`, or a full `owner/name`.
    ///
    /// ## Errors
    /// If `value` is blank or has more than one `/` between its parts.
    pub(crate) fn parse(value: &str, default_owner: &str) -> Result<Self, InvalidRepository> {
        let trimmed = value.trim().trim_matches('/');
        let invalid = || InvalidRepository {
            value: value.to_string(),
        };
        let mut parts = trimmed.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), None, None) if !name.is_empty() => Ok(Self {
                owner: default_owner.to_string(),
                name: name.to_string(),
            }),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{value:?} is not a GitHub repository")]
#[diagnostic(
    code(release::invalid_repository),
    help("Pass either the repository's name or owner/name.")
)]
pub(crate) struct InvalidRepository {
    value: String,
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
