use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::Error;
use crate::{
    app_config::Credentials,
    integrations::PublishedRelease,
    release::{ReleasePayload, Repository},
};

#[derive(Deserialize)]
struct CreateReleaseResponse {
    html_url: String,
}

/// The shape of GitHub's error responses, e.g. the 422 for an existing tag.
#[derive(Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<Value>,
}

impl ErrorResponse {
    fn is_already_exists(&self) -> bool {
        self.errors
            .iter()
            .any(|error| error.get("code").and_then(Value::as_str) == Some("already_exists"))
    }
}

pub(super) async fn create_release(
    client: &Client,
    api_url: &str,
    credentials: &Credentials,
    repository: &Repository,
    payload: &ReleasePayload,
) -> Result<PublishedRelease, Error> {
    let Repository { owner, name } = repository;
    let url = format!("{api_url}/repos/{owner}/{name}/releases");
    debug!("Creating release {} with {url}", payload.tag_name);

    let response = client
        .post(&url)
        .header("Accept", "application/vnd.github+json")
        .header("Authorization", credentials.authorization_header())
        .json(payload)
        .send()
        .await
        .map_err(|source| Error::ApiRequest {
            activity: "creating a release",
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                debug!("Could not read the body of GitHub's {status} response: {err}");
                String::new()
            }
        };
        debug!("GitHub responded with {status}: {body}");
        return Err(classify_failure(status, &body, repository, &payload.tag_name));
    }

    let created: CreateReleaseResponse =
        response.json().await.map_err(|source| Error::ApiResponse {
            activity: "creating a release",
            source,
        })?;
    Ok(PublishedRelease {
        url: created.html_url,
    })
}

fn classify_failure(status: StatusCode, body: &str, repository: &Repository, tag: &str) -> Error {
    let response: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
    let repository = repository.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Authentication { repository, status }
        }
        StatusCode::UNPROCESSABLE_ENTITY if response.is_already_exists() => Error::Conflict {
            tag: tag.to_string(),
            repository,
        },
        _ => Error::Publish {
            tag: tag.to_string(),
            repository,
            status,
            message: if response.message.is_empty() {
                body.trim().to_string()
            } else {
                response.message
            },
        },
    }
}
