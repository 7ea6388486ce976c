use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::info;

use sitesurveyor::{config::SiteConfig, releases::group_by_month};

use crate::util::{CliProgressTracker, describe_origin, release_fetcher, render_highlights};

/// Shows the changelog, with releases grouped by the month they were published in.
#[derive(Debug, Parser)]
pub struct ChangelogSubcommand {
    /// Skip any cached release data.
    #[clap(long)]
    pub force: bool,
}

impl ChangelogSubcommand {
    pub async fn run(self, config: &SiteConfig) -> Result<()> {
        let fetcher = release_fetcher(config)?;

        let pt = CliProgressTracker::new_with_message("Fetching releases", 1);
        let fetched = fetcher.fetch_all_releases(self.force).await;
        pt.task_completed();
        pt.finish_and_clear();

        let fetched = fetched.with_context(|| {
            format!(
                "The changelog is unavailable right now.\
                \nView all releases at {}",
                config.repository.releases_url()
            )
        })?;
        if let Some(notice) = describe_origin(fetched.origin()) {
            info!("{notice}");
        }

        let sections = group_by_month(fetched.releases());
        if sections.is_empty() {
            info!("No releases have been published yet.");
            return Ok(());
        }

        let mut lines = Vec::new();
        for section in sections {
            lines.push(format!(
                "{} {}",
                style(&section.period).bold().underlined(),
                style(format!("({} releases)", section.len())).dim()
            ));
            for release in &section.releases {
                lines.push(format!("  {}", style(release.display_name()).bold().white()));
                lines.extend(render_highlights(&release.highlights(), "    "));
            }
            lines.push(String::new());
        }
        println!("{}", lines.join("\n").trim_end());

        Ok(())
    }
}
