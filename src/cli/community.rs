use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sitesurveyor::{
    community::{PageLoad, Section, load_community_page},
    config::SiteConfig,
    releases::format_release_date,
    view::{Track, filter, latest_stable},
};

use crate::util::{CliProgressTracker, release_fetcher};

/// Shows repository activity and the most recently opened issues.
#[derive(Debug, Parser)]
pub struct CommunitySubcommand {}

impl CommunitySubcommand {
    pub async fn run(self, config: &SiteConfig) -> Result<()> {
        let fetcher = release_fetcher(config)?;

        // Tear down in-flight requests on ctrl-c, without writing any results
        let cancel = CancellationToken::new();
        let cancel_on_signal = cancel.clone();
        let signal_task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel_on_signal.cancel();
            }
        });

        let pt = CliProgressTracker::new_with_message("Loading community data", 1);
        let load = load_community_page(&fetcher, config.issues_per_page, &cancel).await;
        pt.task_completed();
        pt.finish_and_clear();
        signal_task.abort();

        let PageLoad::Loaded(page) = load else {
            bail!("Loading community data was cancelled.");
        };

        match &page.releases {
            Ok(fetched) => {
                let stable = filter(fetched.releases(), Track::Stable, "");
                match latest_stable(&stable) {
                    Some(release) => info!(
                        "Latest release: {} {}",
                        style(release.display_name()).bold().green(),
                        style(format_release_date(release.published_at)).dim()
                    ),
                    None => info!("No stable release has been published yet."),
                }
            }
            Err(e) => warn!(
                "Release information is unavailable right now.\n{e}\
                \nView all releases at {}",
                style(config.repository.releases_url()).underlined()
            ),
        }

        match &page.snapshot {
            Section::Ready(snapshot) => {
                let pushed = snapshot
                    .pushed_at
                    .map(|at| format!(", last push {}", format_release_date(Some(at))))
                    .unwrap_or_default();
                info!(
                    "{} stars, {} forks, {} watchers, {} open issues{pushed}",
                    style(snapshot.stars).bold(),
                    style(snapshot.forks).bold(),
                    style(snapshot.subscribers).bold(),
                    style(snapshot.open_issues).bold(),
                );
            }
            Section::Unavailable(e) => warn!("Repository statistics are unavailable.\n{e}"),
        }

        match &page.issues {
            Section::Ready(issues) if issues.is_empty() => info!("There are no open issues."),
            Section::Ready(issues) => {
                let lines = issues
                    .iter()
                    .map(|issue| {
                        let labels = if issue.labels.is_empty() {
                            String::new()
                        } else {
                            format!(" {}", style(format!("[{}]", issue.labels.join(", "))).cyan())
                        };
                        format!(
                            "  {} {}{labels} {}",
                            style(format!("#{}", issue.number)).dim(),
                            issue.title,
                            style(format!("({} comments)", issue.comments)).dim(),
                        )
                    })
                    .collect::<Vec<_>>();
                println!("Open issues:\n{}", lines.join("\n"));
            }
            Section::Unavailable(e) => warn!("Open issues are unavailable.\n{e}"),
        }

        Ok(())
    }
}
