use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;
use tracing::info;

use sitesurveyor::config::SiteConfig;

use crate::util::{CliProgressTracker, github_provider};

/// Checks the GitHub token given in the GITHUB_TOKEN or GH_TOKEN environment variables.
#[derive(Debug, Parser)]
pub struct AuthenticateSubcommand {
    /// Verify the token using the GitHub API, instead of only checking its format.
    #[clap(long)]
    pub verify: bool,
}

impl AuthenticateSubcommand {
    pub async fn run(self, config: &SiteConfig) -> Result<()> {
        let Some(token) = config.token.as_deref() else {
            bail!(
                "No GitHub token is configured.\
                \nSet the {} environment variable to raise API rate limits.",
                style("GITHUB_TOKEN").bold().green()
            );
        };
        verify_token_format(token)?;

        if !self.verify {
            info!(
                "A GitHub token is configured. Run with {} to check it against the API.",
                style("--verify").bold().green()
            );
            return Ok(());
        }

        let pt = CliProgressTracker::new_with_message("Verifying", 1);
        let provider = github_provider(config)?;
        let verified = provider
            .verify_authentication()
            .await
            .context("GitHub API returned an error during token verification")?;
        pt.task_completed();
        let elapsed = pt.formatted_elapsed();
        pt.finish_and_clear();

        if !verified {
            bail!(
                "Failed to verify the configured GitHub token using the API.\
                \nPlease ensure the validity of the token, or generate a new token."
            );
        }

        info!("The configured GitHub token is valid. {elapsed}");
        Ok(())
    }
}

const FINE_GRAINED_TOKEN_PREFIX: &str = "github_pat_";

fn verify_token_format(token: &str) -> Result<()> {
    let mut chars = token.chars();
    let valid = token.starts_with(FINE_GRAINED_TOKEN_PREFIX)
        || (token.starts_with("gh")
            && chars.nth(2).is_some_and(|c| c.is_ascii_lowercase())
            && chars.next() == Some('_'));
    if !valid {
        bail!(
            "Invalid GitHub token format.\
            \nGitHub tokens must start with 'github_pat_', or 'gh' followed by a lowercase letter and an underscore."
        );
    }
    Ok(())
}
