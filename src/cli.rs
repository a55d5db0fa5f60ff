use clap::{command, Arg, ArgAction, ArgMatches, Command};

use crate::release::{InvalidRepository, ReleaseRequest, Repository, DEFAULT_COMMIT};

pub(crate) fn command() -> Command {
    command!()
        .about("Release a Jira version to GitHub.")
        .arg(
            Arg::new("jira-project")
                .short('p')
                .long("jira-project")
                .value_name("ID")
                .help("The Jira project ID that contains the version for release.")
                .value_parser(non_blank)
                .required(true),
        )
        .arg(
            Arg::new("jira-version")
                .short('j')
                .long("jira-version")
                .value_name("ID")
                .help("The Jira version ID to use for the release.")
                .value_parser(non_blank)
                .required(true),
        )
        .arg(
            Arg::new("github-repo")
                .short('g')
                .long("github-repo")
                .value_name("REPO")
                .help("The GitHub repository in which the release will be created.")
                .long_help(
                    "The GitHub repository in which the release will be created. \
                    Either a name owned by GITHUB_ORG_NAME or owner/name.",
                )
                .value_parser(repository)
                .required(true),
        )
        .arg(
            Arg::new("commit")
                .short('c')
                .long("commit")
                .value_name("COMMIT")
                .help("The commit to tag for this release.")
                .default_value(DEFAULT_COMMIT),
        )
        .arg(
            Arg::new("tag")
                .short('t')
                .long("tag")
                .value_name("TAG")
                .help("The tag name to use in GitHub. If not supplied, it will be extracted from the Jira version name.")
                .value_parser(non_blank),
        )
        .arg(
            Arg::new("release")
                .short('r')
                .long("release")
                .value_name("NAME")
                .help("The release name to use in GitHub. If not supplied the tag name will be used as the release name."),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Fetch the release notes, but only print the release that would be created.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print extra information, like the requests being made.")
                .action(ArgAction::SetTrue),
        )
}

fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

fn repository(value: &str) -> Result<String, String> {
    // The owner isn't known until the environment is loaded, only the shape is checked here
    Repository::parse(value, "")
        .map(|_| value.to_string())
        .map_err(|_| "expected `name` or `owner/name`".to_string())
}

/// Everything the user passed on the command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Args {
    pub(crate) project_id: String,
    pub(crate) version_id: String,
    pub(crate) github_repo: String,
    pub(crate) commit: String,
    pub(crate) tag: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) dry_run: bool,
    pub(crate) verbose: bool,
}

impl Args {
    /// Parse the process arguments, exiting with usage on invalid input.
    pub(crate) fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let string = |id: &str| matches.get_one::<String>(id).cloned();
        Self {
            project_id: string("jira-project").unwrap_or_default(),
            version_id: string("jira-version").unwrap_or_default(),
            github_repo: string("github-repo").unwrap_or_default(),
            commit: string("commit").unwrap_or_else(|| DEFAULT_COMMIT.to_string()),
            tag: string("tag"),
            title: string("release"),
            dry_run: matches.get_flag("dry-run"),
            verbose: matches.get_flag("verbose"),
        }
    }

    pub(crate) fn to_request(
        &self,
        default_owner: &str,
    ) -> Result<ReleaseRequest, InvalidRepository> {
        Ok(ReleaseRequest {
            project_id: self.project_id.clone(),
            version_id: self.version_id.clone(),
            repository: Repository::parse(&self.github_repo, default_owner)?,
            commit: self.commit.clone(),
            tag: self.tag.clone(),
            title: self.title.clone(),
        })
    }
}
