use console::style;

use sitesurveyor::{
    descriptor::CategorizedAssets,
    releases::{Highlight, format_asset_size},
    sources::ReleaseOrigin,
    view::ReleaseCard,
};

pub fn render_card(card: &ReleaseCard<'_>) -> String {
    let mut header = style(card.tag).bold().white().to_string();
    if card.has_distinct_name() {
        header.push_str(&format!(" {}", style(card.name).white()));
    }
    if card.is_latest {
        header.push_str(&format!(" {}", style("Latest").bold().green()));
    }
    if card.is_prerelease {
        header.push_str(&format!(" {}", style("Pre-release").bold().yellow()));
    }
    header.push_str(&format!(" {}", style(&card.date).dim()));

    let mut lines = vec![header];
    lines.extend(render_highlights(&card.highlights, "  "));
    if !card.assets.is_empty() {
        lines.push(format!(
            "  {}",
            style(format!("{} downloads", card.assets.len())).dim()
        ));
    }
    lines.join("\n")
}

pub fn render_highlights(highlights: &[Highlight], indent: &str) -> Vec<String> {
    highlights
        .iter()
        .map(|highlight| {
            if highlight.is_breaking {
                format!(
                    "{indent}{} {}",
                    style("•").red(),
                    style(&highlight.text).red()
                )
            } else {
                format!("{indent}{} {}", style("•").cyan(), highlight.text)
            }
        })
        .collect()
}

pub fn render_assets(assets: &CategorizedAssets<'_>) -> String {
    let mut lines = Vec::new();
    for (platform, entries) in assets.groups() {
        lines.push(style(platform).bold().white().to_string());
        for entry in entries {
            let arch = entry
                .arch
                .map(|arch| format!(" {}", style(arch).magenta()))
                .unwrap_or_default();
            lines.push(format!(
                "  {}{arch} {}\n    {}",
                entry.asset.name,
                style(format!("({})", format_asset_size(entry.asset.size))).dim(),
                style(&entry.asset.download_url).underlined(),
            ));
        }
    }
    lines.join("\n")
}

pub fn describe_origin(origin: ReleaseOrigin) -> Option<String> {
    match origin {
        ReleaseOrigin::Live => None,
        ReleaseOrigin::Cache => Some(style("Showing cached release data.").dim().to_string()),
        ReleaseOrigin::Fallback => Some(
            style("GitHub is unreachable, showing bundled release data.")
                .yellow()
                .to_string(),
        ),
    }
}
