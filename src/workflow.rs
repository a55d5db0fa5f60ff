use miette::Diagnostic;
use tracing::info;

use crate::{
    integrations::{github, jira, PublishedRelease, ReleaseNotesSource, ReleasePublisher},
    progress::Progress,
    release::{tag, ReleaseNotes, ReleasePayload, ReleaseRequest},
};

/// Whether a workflow should really publish. Wraps whatever would do the publishing.
#[derive(Clone, Copy, Debug)]
pub(crate) enum RunType<T> {
    /// Fetch everything, but only describe what would be published.
    DryRun(T),
    /// This is a real run of a workflow, actually do the thing.
    Real(T),
}

/// Fetch the release notes of the requested Jira version and publish them as a GitHub release.
///
/// Returns the created release, or `None` for a dry run. Nothing is published unless the notes
/// were fetched and a tag determined.
pub(crate) async fn release<S, P>(
    request: &ReleaseRequest,
    tracker: &S,
    publisher: RunType<&P>,
    progress: &mut impl Progress,
) -> Result<Option<PublishedRelease>, Error>
where
    S: ReleaseNotesSource + Sync,
    P: ReleasePublisher + Sync,
{
    let notes = fetch_notes(request, tracker, progress).await?;
    let payload = ReleasePayload::new(
        notes,
        request.title.as_deref(),
        Some(request.commit.as_str()),
    );
    let ReleasePayload {
        tag_name,
        name,
        body,
        target_commitish,
    } = &payload;
    let repository = &request.repository;

    let publisher = match publisher {
        RunType::DryRun(_) => {
            info!(
                "Would create GitHub release {name} with tag {tag_name} in repository {repository} on commit {target_commitish} and body:\n{body}"
            );
            return Ok(None);
        }
        RunType::Real(publisher) => publisher,
    };

    progress.start(format!(
        "Creating GitHub release {tag_name} in repository {repository} on commit {target_commitish}."
    ));
    let published = progress.finish(publisher.publish_release(repository, &payload).await)?;
    Ok(Some(published))
}

async fn fetch_notes<S>(
    request: &ReleaseRequest,
    tracker: &S,
    progress: &mut impl Progress,
) -> Result<ReleaseNotes, Error>
where
    S: ReleaseNotesSource + Sync,
{
    let ReleaseRequest {
        project_id,
        version_id,
        ..
    } = request;
    progress.start("Logging into Jira.".to_string());
    let session = progress.finish(tracker.log_in().await)?;

    progress.start(format!("Loading release notes for version {version_id}."));
    let notes = tracker
        .fetch_release_notes(&session, project_id, version_id)
        .await
        .map_err(Error::from)
        .and_then(|raw_text| {
            ReleaseNotes::new(raw_text, request.tag.as_deref()).map_err(|source| Error::Tag {
                project_id: project_id.clone(),
                version_id: version_id.clone(),
                source,
            })
        });
    progress.finish(notes)
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Jira(#[from] jira::Error),
    #[error("Could not determine a tag for version {version_id} of Jira project {project_id}")]
    #[diagnostic(code(workflow::tag))]
    Tag {
        project_id: String,
        version_id: String,
        #[source]
        #[diagnostic_source]
        source: tag::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    GitHub(#[from] github::Error),
}
