use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use sitesurveyor::config::SiteConfig;

mod authenticate;
mod changelog;
mod community;
mod downloads;
mod releases;
mod status;

use self::authenticate::AuthenticateSubcommand;
use self::changelog::ChangelogSubcommand;
use self::community::CommunitySubcommand;
use self::downloads::DownloadsSubcommand;
use self::releases::ReleasesSubcommand;
use self::status::StatusSubcommand;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
    #[clap(flatten)]
    pub options: GlobalOptions,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = SiteConfig::load(self.options.config.as_deref())
            .await
            .context("Failed to load SiteSurveyor configuration!")?;
        self.subcommand.run(&config).await
    }
}

#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Path to a configuration file to use instead of discovering one.
    #[clap(long, global = true, action = ArgAction::Set)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Releases(ReleasesSubcommand),
    Downloads(DownloadsSubcommand),
    Changelog(ChangelogSubcommand),
    Community(CommunitySubcommand),
    Status(StatusSubcommand),
    Authenticate(AuthenticateSubcommand),
}

impl Subcommand {
    pub async fn run(self, config: &SiteConfig) -> Result<()> {
        match self {
            Self::Releases(cmd) => cmd.run(config).await,
            Self::Downloads(cmd) => cmd.run(config).await,
            Self::Changelog(cmd) => cmd.run(config).await,
            Self::Community(cmd) => cmd.run(config).await,
            Self::Status(cmd) => cmd.run(config).await,
            Self::Authenticate(cmd) => cmd.run(config).await,
        }
    }
}
