use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::{info, warn};

use sitesurveyor::{
    config::SiteConfig,
    releases::format_release_date,
    status::{StatusIndicator, fetch_status_snapshot},
};

use crate::util::{CliProgressTracker, github_provider};

/// Shows the current status of the services that releases are served from.
#[derive(Debug, Parser)]
pub struct StatusSubcommand {}

impl StatusSubcommand {
    pub async fn run(self, config: &SiteConfig) -> Result<()> {
        let provider = github_provider(config)?;

        let pt = CliProgressTracker::new_with_message("Checking status", 1);
        let snapshot = fetch_status_snapshot(&provider, &config.status_feed_url).await;
        pt.task_completed();
        pt.finish_and_clear();

        if !snapshot.is_available() {
            warn!(
                "{}\nSource: {}",
                snapshot.description,
                style(&snapshot.source).underlined()
            );
            return Ok(());
        }

        let indicator = match snapshot.indicator {
            StatusIndicator::None => style("●").green(),
            StatusIndicator::Minor | StatusIndicator::Maintenance => style("●").yellow(),
            StatusIndicator::Major | StatusIndicator::Critical => style("●").red(),
        };
        let page = snapshot
            .page_url
            .as_deref()
            .map(|url| format!("\n{}", style(url).underlined()))
            .unwrap_or_default();
        info!(
            "{indicator} {} {}\n{} {}{page}",
            style(&snapshot.description).bold(),
            style(format!("({})", snapshot.indicator)).dim(),
            style(&snapshot.source).white(),
            style(format!(
                "updated {}",
                format_release_date(Some(snapshot.updated_at))
            ))
            .dim(),
        );

        Ok(())
    }
}
