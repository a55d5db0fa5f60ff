use async_trait::async_trait;

use crate::release::{ReleasePayload, Repository};

pub(crate) mod github;
pub(crate) mod jira;
#[cfg(test)]
pub(crate) mod test_server;

/// Somewhere release notes for a tracker version can be read from.
#[async_trait]
pub(crate) trait ReleaseNotesSource {
    /// Whatever a login leaves behind for fetching. Dropped once the notes are read.
    type Session: Send + Sync;

    /// Check the credentials, before anything is fetched with them.
    async fn log_in(&self) -> Result<Self::Session, jira::Error>;

    /// Returns the raw release notes of `version_id` in `project_id`.
    async fn fetch_release_notes(
        &self,
        session: &Self::Session,
        project_id: &str,
        version_id: &str,
    ) -> Result<String, jira::Error>;
}

/// Somewhere releases can be created.
#[async_trait]
pub(crate) trait ReleasePublisher {
    async fn publish_release(
        &self,
        repository: &Repository,
        payload: &ReleasePayload,
    ) -> Result<PublishedRelease, github::Error>;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PublishedRelease {
    /// Where a human can view the release
    pub(crate) url: String,
}
