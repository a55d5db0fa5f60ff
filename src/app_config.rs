use std::{fmt, time::Duration};

use base64::{prelude::BASE64_STANDARD as base64, Engine};
use miette::Diagnostic;

/// Everything needed to talk to Jira and GitHub, loaded once at startup and passed down.
#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) jira: Jira,
    pub(crate) github: GitHub,
}

#[derive(Clone, Debug)]
pub(crate) struct Jira {
    pub(crate) credentials: Credentials,
    pub(crate) org: String,
    /// Base URL of the Jira instance, usually `https://{org}.atlassian.net`
    pub(crate) url: String,
    pub(crate) timeout: Duration,
}

#[derive(Clone, Debug)]
pub(crate) struct GitHub {
    pub(crate) credentials: Credentials,
    /// The owner used for repositories given without one
    pub(crate) org: String,
    pub(crate) api_url: String,
}

#[derive(Clone)]
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl Credentials {
    /// The value of a basic auth `Authorization` header.
    pub(crate) fn authorization_header(&self) -> String {
        let Self { username, password } = self;
        format!("Basic {}", base64.encode(format!("{username}:{password}")))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

const JIRA_USERNAME: &str = "JIRA_USERNAME";
const JIRA_PASSWORD: &str = "JIRA_PASSWORD";
const JIRA_ORG_NAME: &str = "JIRA_ORG_NAME";
const GITHUB_USERNAME: &str = "GITHUB_USERNAME";
const GITHUB_PASSWORD: &str = "GITHUB_PASSWORD";
const GITHUB_ORG_NAME: &str = "GITHUB_ORG_NAME";

pub(crate) const REQUIRED_VARIABLES: [&str; 6] = [
    JIRA_USERNAME,
    JIRA_PASSWORD,
    JIRA_ORG_NAME,
    GITHUB_USERNAME,
    GITHUB_PASSWORD,
    GITHUB_ORG_NAME,
];

const JIRA_URL: &str = "JIRA_URL";
const JIRA_TIMEOUT_SECS: &str = "JIRA_TIMEOUT_SECS";
const GITHUB_API_URL: &str = "GITHUB_API_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

impl Config {
    /// Load the config from the process environment.
    pub(crate) fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the config using `lookup` to resolve each variable. Empty values count as unset.
    ///
    /// ## Errors
    /// 1. Any of [`REQUIRED_VARIABLES`] is missing
    /// 2. `JIRA_TIMEOUT_SECS` is set but isn't a whole number of seconds
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARIABLES
            .into_iter()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingVariables {
                missing: missing.join(", "),
            });
        }
        let required = |key: &'static str| {
            get(key).ok_or_else(|| Error::MissingVariables {
                missing: key.to_string(),
            })
        };

        let jira_org = required(JIRA_ORG_NAME)?;
        let timeout = match get(JIRA_TIMEOUT_SECS) {
            None => DEFAULT_TIMEOUT,
            Some(value) => match value.trim().parse() {
                Ok(seconds) => Duration::from_secs(seconds),
                Err(_) => return Err(Error::InvalidTimeout { value }),
            },
        };
        let jira = Jira {
            credentials: Credentials {
                username: required(JIRA_USERNAME)?,
                password: required(JIRA_PASSWORD)?,
            },
            url: get(JIRA_URL)
                .map_or_else(|| format!("https://{jira_org}.atlassian.net"), trim_url),
            org: jira_org,
            timeout,
        };
        let github = GitHub {
            credentials: Credentials {
                username: required(GITHUB_USERNAME)?,
                password: required(GITHUB_PASSWORD)?,
            },
            org: required(GITHUB_ORG_NAME)?,
            api_url: get(GITHUB_API_URL)
                .map_or_else(|| DEFAULT_GITHUB_API_URL.to_string(), trim_url),
        };
        Ok(Self { jira, github })
    }
}

fn trim_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub(crate) enum Error {
    #[error(
        "You must set the JIRA_USERNAME, JIRA_PASSWORD, JIRA_ORG_NAME, GITHUB_USERNAME, GITHUB_PASSWORD and GITHUB_ORG_NAME environment variables."
    )]
    #[diagnostic(
        code(app_config::missing_variables),
        help("Currently missing: {missing}")
    )]
    MissingVariables { missing: String },
    #[error("JIRA_TIMEOUT_SECS must be a whole number of seconds, got {value:?}")]
    #[diagnostic(code(app_config::invalid_timeout))]
    InvalidTimeout { value: String },
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn full_env() -> HashMap<&'static str, String> {
        REQUIRED_VARIABLES
            .into_iter()
            .map(|key| (key, format!("{}-value", key.to_lowercase())))
            .collect()
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<Config, Error> {
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn loads_all_required_variables() {
        let mut env = full_env();
        env.insert(JIRA_ORG_NAME, "acme".to_string());

        let config = load(&env).unwrap();

        assert_eq!(config.jira.url, "https://acme.atlassian.net");
        assert_eq!(config.jira.credentials.username, "jira_username-value");
        assert_eq!(config.jira.credentials.password, "jira_password-value");
        assert_eq!(config.jira.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.github.org, "github_org_name-value");
        assert_eq!(config.github.api_url, DEFAULT_GITHUB_API_URL);
    }

    #[test]
    fn nothing_set_lists_every_variable() {
        let err = load(&HashMap::new()).unwrap_err();

        let Error::MissingVariables { missing } = &err else {
            panic!("Expected missing variables, got {err:?}");
        };
        assert_eq!(
            missing,
            "JIRA_USERNAME, JIRA_PASSWORD, JIRA_ORG_NAME, GITHUB_USERNAME, GITHUB_PASSWORD, GITHUB_ORG_NAME"
        );
        let message = err.to_string();
        for key in REQUIRED_VARIABLES {
            assert!(message.contains(key), "{key} not in {message}");
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut env = full_env();
        env.insert(GITHUB_PASSWORD, "  ".to_string());

        let err = load(&env).unwrap_err();

        assert!(
            matches!(&err, Error::MissingVariables { missing } if missing == "GITHUB_PASSWORD"),
            "{err:?}"
        );
    }

    #[test]
    fn optional_overrides() {
        let mut env = full_env();
        env.insert(JIRA_URL, "https://jira.example.com/".to_string());
        env.insert(GITHUB_API_URL, "https://github.example.com/api/v3".to_string());
        env.insert(JIRA_TIMEOUT_SECS, "5".to_string());

        let config = load(&env).unwrap();

        assert_eq!(config.jira.url, "https://jira.example.com");
        assert_eq!(config.github.api_url, "https://github.example.com/api/v3");
        assert_eq!(config.jira.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_timeout() {
        let mut env = full_env();
        env.insert(JIRA_TIMEOUT_SECS, "soon".to_string());

        let err = load(&env).unwrap_err();

        assert!(matches!(err, Error::InvalidTimeout { .. }), "{err:?}");
    }

    #[test]
    fn basic_auth_header() {
        let credentials = Credentials {
            username: "Aladdin".to_string(),
            password: "open sesame".to_string(),
        };

        assert_eq!(
            credentials.authorization_header(),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn debug_redacts_password() {
        let credentials = Credentials {
            username: "me".to_string(),
            password: "hunter2".to_string(),
        };

        let debug = format!("{credentials:?}");

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("me"));
    }
}
