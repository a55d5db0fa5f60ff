use serde::Serialize;

use super::{ReleaseNotes, DEFAULT_COMMIT};

/// The body of GitHub's "create a release" request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct ReleasePayload {
    pub(crate) tag_name: String,
    /// The release title
    pub(crate) name: String,
    pub(crate) body: String,
    pub(crate) target_commitish: String,
}

impl ReleasePayload {
    /// Build the release from fetched notes. The full notes, heading included, become the body.
    pub(crate) fn new(notes: ReleaseNotes, title: Option<&str>, commit: Option<&str>) -> Self {
        let ReleaseNotes { raw_text, tag } = notes;
        let name = title
            .filter(|title| !title.trim().is_empty())
            .map_or_else(|| tag.clone(), ToString::to_string);
        let target_commitish = commit
            .filter(|commit| !commit.trim().is_empty())
            .unwrap_or(DEFAULT_COMMIT)
            .to_string();
        Self {
            tag_name: tag,
            name,
            body: raw_text,
            target_commitish,
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn notes(tag: &str) -> ReleaseNotes {
        ReleaseNotes {
            raw_text: "Release notes - App - Version Sprint 42 3.2.1\n<h2>Story</h2>".to_string(),
            tag: tag.to_string(),
        }
    }

    #[test]
    fn title_defaults_to_tag() {
        let payload = ReleasePayload::new(notes("3.2.1"), None, Some("deadbeef"));

        assert_eq!(payload.name, "3.2.1");
        assert_eq!(payload.tag_name, "3.2.1");
    }

    #[test]
    fn blank_title_falls_back_to_tag() {
        let payload = ReleasePayload::new(notes("3.2.1"), Some("  "), None);

        assert_eq!(payload.name, "3.2.1");
    }

    #[test]
    fn explicit_title() {
        let payload = ReleasePayload::new(notes("3.2.1"), Some("Sprint 42"), None);

        assert_eq!(payload.name, "Sprint 42");
        assert_eq!(payload.tag_name, "3.2.1");
    }

    #[test]
    fn commit_defaults_to_master() {
        let payload = ReleasePayload::new(notes("3.2.1"), None, None);

        assert_eq!(payload.target_commitish, "master");
    }

    #[test]
    fn body_is_the_full_notes() {
        let payload = ReleasePayload::new(notes("3.2.1"), None, Some("main"));

        assert_eq!(
            payload.body,
            "Release notes - App - Version Sprint 42 3.2.1\n<h2>Story</h2>"
        );
        assert_eq!(payload.target_commitish, "main");
    }

    #[test]
    fn serializes_github_field_names() {
        let payload = ReleasePayload::new(notes("3.2.1"), None, Some("deadbeef"));

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "tag_name": "3.2.1",
                "name": "3.2.1",
                "body": "Release notes - App - Version Sprint 42 3.2.1\n<h2>Story</h2>",
                "target_commitish": "deadbeef",
            })
        );
    }
}
