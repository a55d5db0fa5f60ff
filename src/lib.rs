#![doc = include_str!("../README.md")]

use miette::Result;
use tracing::Level;

use crate::{
    app_config::Config,
    cli::Args,
    integrations::{github::GitHub, jira::Jira},
    workflow::RunType,
};

mod app_config;
mod cli;
mod integrations;
mod progress;
mod release;
mod workflow;

/// Run the command line: fetch the requested Jira version's release notes and publish them.
///
/// ## Errors
/// Anything which stops the release from being created, already formatted for the user.
pub async fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let Config { jira, github } = Config::from_env()?;
    let request = args.to_request(&github.org)?;
    let jira = Jira::new(jira);
    let github = GitHub::new(github);
    let publisher = if args.dry_run {
        RunType::DryRun(&github)
    } else {
        RunType::Real(&github)
    };

    let published =
        workflow::release(&request, &jira, publisher, &mut progress::Log::default()).await?;
    if let Some(published) = published {
        println!("{}", published.url);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}
