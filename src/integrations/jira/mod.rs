use async_trait::async_trait;
use miette::Diagnostic;
use reqwest::{header::HeaderMap, Client, StatusCode, Url};
use tracing::debug;

use super::ReleaseNotesSource;
use crate::app_config;

mod release_notes;

/// Reads release notes from the Jira web UI. There's no REST endpoint for these, so this loads
/// the same page a person would.
#[derive(Debug)]
pub(crate) struct Jira {
    config: app_config::Jira,
}

impl Jira {
    pub(crate) fn new(config: app_config::Jira) -> Self {
        Self { config }
    }

    fn release_notes_url(&self) -> String {
        format!("{}/secure/ReleaseNote.jspa", self.config.url)
    }

    /// A fresh HTTP session, which lives from login until the notes are read.
    fn open_session(&self) -> Result<Client, Error> {
        Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|source| Error::Fetch {
                activity: "starting an HTTP session",
                source,
            })
    }
}

#[async_trait]
impl ReleaseNotesSource for Jira {
    type Session = Client;

    async fn log_in(&self) -> Result<Client, Error> {
        let session = self.open_session()?;
        let url = format!("{}/rest/api/2/myself", self.config.url);
        let credentials = &self.config.credentials;
        debug!(
            "Logging into Jira org {org} at {url} as {username}",
            org = self.config.org,
            username = credentials.username
        );

        let response = session
            .get(url)
            .header("Authorization", credentials.authorization_header())
            .send()
            .await
            .map_err(|source| Error::Fetch {
                activity: "logging in",
                source,
            })?;
        if login_failed(response.headers()) || !response.status().is_success() {
            return Err(Error::Authentication {
                jira_url: self.config.url.clone(),
                status: response.status(),
            });
        }
        Ok(session)
    }

    async fn fetch_release_notes(
        &self,
        session: &Client,
        project_id: &str,
        version_id: &str,
    ) -> Result<String, Error> {
        let url = self.release_notes_url();
        debug!("Loading {url}?projectId={project_id}&version={version_id}");
        let timed_out = || Error::Timeout {
            project_id: project_id.to_string(),
            version_id: version_id.to_string(),
        };

        let response = session
            .get(url)
            .query(&[("projectId", project_id), ("version", version_id)])
            .header(
                "Authorization",
                self.config.credentials.authorization_header(),
            )
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    timed_out()
                } else {
                    Error::Fetch {
                        activity: "requesting release notes",
                        source,
                    }
                }
            })?;
        check_response(
            &self.config.url,
            response.status(),
            response.url(),
            response.headers(),
            project_id,
            version_id,
        )?;

        // The timeout covers the body too, so a page which stops halfway lands here
        let page = response.text().await.map_err(|source| {
            if source.is_timeout() {
                timed_out()
            } else {
                Error::Fetch {
                    activity: "reading the release notes page",
                    source,
                }
            }
        })?;
        release_notes::from_page(&page).ok_or_else(|| Error::NotFound {
            project_id: project_id.to_string(),
            version_id: version_id.to_string(),
        })
    }
}

fn login_failed(headers: &HeaderMap) -> bool {
    headers
        .get("X-Seraph-LoginReason")
        .and_then(|reason| reason.to_str().ok())
        .is_some_and(|reason| reason.contains("FAILED") || reason.contains("DENIED"))
}

/// Jira signals a failed login in a header, or by sending you to a login page.
fn check_response(
    jira_url: &str,
    status: StatusCode,
    final_url: &Url,
    headers: &HeaderMap,
    project_id: &str,
    version_id: &str,
) -> Result<(), Error> {
    let redirected_to_login = final_url.host_str() == Some("id.atlassian.com")
        || final_url.path().to_lowercase().contains("login");
    if login_failed(headers)
        || redirected_to_login
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
    {
        return Err(Error::Authentication {
            jira_url: jira_url.to_string(),
            status,
        });
    }
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound {
            project_id: project_id.to_string(),
            version_id: version_id.to_string(),
        });
    }
    if !status.is_success() {
        return Err(Error::UnexpectedStatus {
            status,
            project_id: project_id.to_string(),
            version_id: version_id.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub(crate) enum Error {
    #[error("{jira_url} rejected the login ({status})")]
    #[diagnostic(
        code(jira::authentication),
        help(
            "Check JIRA_USERNAME and JIRA_PASSWORD. Atlassian Cloud expects your email address and an API token."
        )
    )]
    Authentication {
        jira_url: String,
        status: StatusCode,
    },
    #[error("No release notes found for version {version_id} of Jira project {project_id}")]
    #[diagnostic(
        code(jira::not_found),
        help("Make sure the project and version IDs are the numeric IDs Jira shows in the version's URL.")
    )]
    NotFound {
        project_id: String,
        version_id: String,
    },
    #[error(
        "Timed out waiting for the release notes of version {version_id} of Jira project {project_id}"
    )]
    #[diagnostic(
        code(jira::not_found),
        help("Set JIRA_TIMEOUT_SECS to wait longer.")
    )]
    Timeout {
        project_id: String,
        version_id: String,
    },
    #[error(
        "Jira responded with {status} for the release notes of version {version_id} of project {project_id}"
    )]
    #[diagnostic(code(jira::fetch))]
    UnexpectedStatus {
        status: StatusCode,
        project_id: String,
        version_id: String,
    },
    #[error("Trouble communicating with Jira while {activity}: {source}")]
    #[diagnostic(
        code(jira::fetch),
        help("There was a problem communicating with Jira, this may be a network issue.")
    )]
    Fetch {
        activity: &'static str,
        source: reqwest::Error,
    },
}
