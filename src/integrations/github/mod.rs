use async_trait::async_trait;
use miette::Diagnostic;
use reqwest::{Client, StatusCode};

use super::{PublishedRelease, ReleasePublisher};
use crate::{
    app_config,
    release::{ReleasePayload, Repository},
};

mod create_release;

/// Creates releases through the GitHub REST API.
#[derive(Debug)]
pub(crate) struct GitHub {
    config: app_config::GitHub,
}

impl GitHub {
    pub(crate) fn new(config: app_config::GitHub) -> Self {
        Self { config }
    }

    fn client() -> Result<Client, Error> {
        Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::ApiRequest {
                activity: "starting an HTTP session",
                source,
            })
    }
}

#[async_trait]
impl ReleasePublisher for GitHub {
    async fn publish_release(
        &self,
        repository: &Repository,
        payload: &ReleasePayload,
    ) -> Result<PublishedRelease, Error> {
        let client = Self::client()?;
        create_release::create_release(
            &client,
            &self.config.api_url,
            &self.config.credentials,
            repository,
            payload,
        )
        .await
    }
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub(crate) enum Error {
    #[error("GitHub rejected the credentials while creating a release in {repository} ({status})")]
    #[diagnostic(
        code(github::authentication),
        help(
            "Check GITHUB_USERNAME and GITHUB_PASSWORD. The password should be a personal access token with permission to create releases in this repository."
        )
    )]
    Authentication { repository: String, status: StatusCode },
    #[error("A release with tag {tag} already exists in {repository}")]
    #[diagnostic(
        code(github::conflict),
        help("Delete the existing release or pass a different --tag.")
    )]
    Conflict { tag: String, repository: String },
    #[error("GitHub refused to create release {tag} in {repository} ({status}): {message}")]
    #[diagnostic(code(github::publish))]
    Publish {
        tag: String,
        repository: String,
        status: StatusCode,
        message: String,
    },
    #[error("Trouble communicating with GitHub while {activity}: {source}")]
    #[diagnostic(
        code(github::api_request_error),
        help(
            "There was a problem communicating with GitHub, this may be a network issue or a permissions issue."
        )
    )]
    ApiRequest {
        activity: &'static str,
        source: reqwest::Error,
    },
    #[error("Trouble decoding the response from GitHub while {activity}: {source}")]
    #[diagnostic(
        code(github::api_response_error),
        help("The release may have been created anyway, check the repository on GitHub.")
    )]
    ApiResponse {
        activity: &'static str,
        source: reqwest::Error,
    },
}
