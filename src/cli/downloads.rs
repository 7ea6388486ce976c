use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;
use tracing::info;

use sitesurveyor::{
    config::SiteConfig,
    descriptor::categorize,
    releases::format_release_date,
    view::{Track, filter, latest_stable},
};

use crate::util::{CliProgressTracker, describe_origin, release_fetcher, render_assets};

/// Shows the downloads for the latest stable release, grouped by platform.
#[derive(Debug, Parser)]
pub struct DownloadsSubcommand {
    /// Show downloads for the release with this tag instead.
    #[clap(long)]
    pub tag: Option<String>,
    /// Skip any cached release data.
    #[clap(long)]
    pub force: bool,
}

impl DownloadsSubcommand {
    pub async fn run(self, config: &SiteConfig) -> Result<()> {
        let fetcher = release_fetcher(config)?;

        let pt = CliProgressTracker::new_with_message("Fetching releases", 1);
        let fetched = fetcher.fetch_all_releases(self.force).await;
        pt.task_completed();
        pt.finish_and_clear();

        let fetched = fetched.with_context(|| {
            format!(
                "Downloads are unavailable right now.\
                \nView all releases at {}",
                config.repository.releases_url()
            )
        })?;
        if let Some(notice) = describe_origin(fetched.origin()) {
            info!("{notice}");
        }

        let releases = fetched.releases();
        let release = match self.tag.as_deref() {
            Some(tag) => releases
                .iter()
                .find(|release| release.tag_name.eq_ignore_ascii_case(tag.trim())),
            None => latest_stable(&filter(releases, Track::Stable, "")),
        };
        let Some(release) = release else {
            match self.tag {
                Some(tag) => bail!("No release with the tag '{tag}' exists."),
                None => bail!(
                    "No stable release has been published yet.\
                    \nView all releases at {}",
                    config.repository.releases_url()
                ),
            }
        };

        let assets = categorize(&release.assets);
        info!(
            "{} {}",
            style(release.display_name()).bold().white(),
            style(format_release_date(release.published_at)).dim()
        );
        if assets.is_empty() {
            info!("This release has no downloads.");
        } else {
            println!("{}", render_assets(&assets));
        }

        Ok(())
    }
}
