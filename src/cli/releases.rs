use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use tracing::{info, warn};

use sitesurveyor::{
    config::SiteConfig,
    view::{FilterState, ReleaseListView, Track},
};

use crate::util::{CliProgressTracker, describe_origin, release_fetcher, render_card};

/// Lists releases, optionally filtered by track and a search query.
#[derive(Debug, Parser)]
pub struct ReleasesSubcommand {
    /// Which releases to show - all, stable, or prerelease.
    #[clap(long, default_value = "all")]
    pub track: Track,
    /// Only show releases mentioning this text in their tag, name, notes, or files.
    #[clap(long, short)]
    pub query: Option<String>,
    /// Skip any cached release data.
    #[clap(long)]
    pub force: bool,
    /// Print the release list state, and any matching releases, as JSON instead.
    #[clap(long)]
    pub json: bool,
}

impl ReleasesSubcommand {
    pub async fn run(self, config: &SiteConfig) -> Result<()> {
        let fetcher = release_fetcher(config)?;

        let pt = CliProgressTracker::new_with_message("Fetching releases", 1);
        let fetched = fetcher.fetch_all_releases(self.force).await;
        pt.task_completed();
        pt.finish_and_clear();

        let state = FilterState::new(self.track, self.query.unwrap_or_default());
        let view = ReleaseListView::build(&config.repository, &fetched, &state);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
            if let ReleaseListView::Unavailable { releases_url, .. } = &view {
                bail!(
                    "Release information is unavailable right now.\
                    \nView all releases at {releases_url}"
                );
            }
            return Ok(());
        }

        match view {
            ReleaseListView::Unavailable {
                reason,
                releases_url,
                ..
            } => {
                warn!(
                    "Release information is unavailable right now.\
                    \n{reason}\
                    \n\nView all releases at {}",
                    style(releases_url).underlined()
                );
            }
            ReleaseListView::NoReleases { releases_url } => {
                info!(
                    "No releases have been published yet.\
                    \nCheck back later at {}",
                    style(releases_url).underlined()
                );
            }
            ReleaseListView::NoMatches { state, total } => {
                info!(
                    "None of the {total} releases match the {} track{}.",
                    style(state.track).bold(),
                    if state.query.trim().is_empty() {
                        String::new()
                    } else {
                        format!(" and the query '{}'", style(state.query.trim()).bold())
                    }
                );
            }
            ReleaseListView::Listing {
                entries, origin, ..
            } => {
                if let Some(notice) = describe_origin(origin) {
                    info!("{notice}");
                }
                let cards = entries.iter().map(render_card).collect::<Vec<_>>();
                println!("{}", cards.join("\n\n"));
            }
        }

        Ok(())
    }
}
