use chrono::{DateTime, Utc};

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/**
    Formats a publish timestamp as a medium-style date, such as `Mar 14, 2025`.

    Releases without a timestamp are shown as `Unpublished`.
*/
#[must_use]
pub fn format_release_date(published_at: Option<DateTime<Utc>>) -> String {
    match published_at {
        Some(published_at) => published_at.format("%b %-d, %Y").to_string(),
        None => String::from("Unpublished"),
    }
}

/**
    Formats a byte count as a human-readable size using binary (1024) units.

    Whole values are shown without decimals, anything else with a single decimal,
    such as `512 B`, `1.5 KB`, or `24 MB`.
*/
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_asset_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit_index = 0;

    while value >= 1024.0 && unit_index < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    let unit = SIZE_UNITS[unit_index];
    if value.fract() == 0.0 {
        format!("{value:.0} {unit}")
    } else {
        format!("{value:.1} {unit}")
    }
}
