use serde::Serialize;

use crate::util::str::contains_ignore_case;

/**
    The maximum number of highlights extracted from a single release.
*/
pub const MAX_HIGHLIGHTS: usize = 3;

// Candidates this short or shorter are almost always noise, eg. "-", "wip", "..."
const NOISE_MAX_LEN: usize = 3;

const BREAKING_KEYWORD: &str = "breaking";

const BULLET_MARKERS: [char; 3] = ['-', '*', '+'];
const FENCE_MARKERS: [&str; 2] = ["```", "~~~"];
// `__` is never stripped, so identifiers such as `__init__` stay intact
const BOLD_MARKER: &str = "**";

/**
    A short, human-readable point summarizing part of a release.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub text: String,
    pub is_breaking: bool,
}

impl Highlight {
    fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let is_breaking = contains_ignore_case(&text, BREAKING_KEYWORD);
        Self { text, is_breaking }
    }
}

/**
    Extracts up to [`MAX_HIGHLIGHTS`] highlights from freeform release notes.

    Bullet points (lines starting with `-`, `*` or `+` and then whitespace) are
    preferred. If the notes contain no bullet points at all, the first lines
    are used as they are instead. Fenced code blocks and bold markers are
    stripped beforehand, so that they do not turn into bogus bullet points.

    Never fails - absent or malformed notes simply result in no highlights.
*/
#[must_use]
pub fn extract_highlights(body: Option<&str>) -> Vec<Highlight> {
    let Some(body) = body else {
        return Vec::new();
    };

    let lines = prose_lines(body);

    let bullets = lines
        .iter()
        .filter_map(|line| strip_bullet(line))
        .collect::<Vec<_>>();
    let candidates = if bullets.is_empty() {
        lines.iter().map(String::as_str).collect()
    } else {
        bullets
    };

    candidates
        .into_iter()
        .filter(|text| text.chars().count() > NOISE_MAX_LEN)
        .take(MAX_HIGHLIGHTS)
        .map(Highlight::new)
        .collect()
}

/*
    Splits the body into trimmed, non-empty lines, on any newline style,
    skipping anything inside of fenced code blocks and removing bold markers.
*/
fn prose_lines(body: &str) -> Vec<String> {
    let mut in_fence = false;
    let mut lines = Vec::new();

    for line in body.split(['\r', '\n']) {
        let line = line.trim();
        if FENCE_MARKERS.iter().any(|fence| line.starts_with(fence)) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let line = line.replace(BOLD_MARKER, "");
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    lines
}

fn strip_bullet(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(BULLET_MARKERS)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}
