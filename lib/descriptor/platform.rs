use std::fmt;

use serde::Serialize;

use crate::util::str::char_is_word_separator;

// Matching file extensions - always checked against the end of the lowercased file name
#[rustfmt::skip]
const PLATFORM_EXTENSIONS: [(Platform, &[&str]); 2] = [
    (Platform::Windows, &[".exe", ".msi"]),
    (Platform::Linux,   &[".deb", ".rpm", ".tar.gz", ".appimage"]),
];

// Matching substrings - these can be partial matches, eg. "appwin64.zip" will match as windows
#[rustfmt::skip]
const PLATFORM_SUBSTRINGS: [(Platform, &[&str]); 2] = [
    (Platform::Windows, &["windows", "win32", "win64"]),
    (Platform::Linux,   &["linux", "ubuntu", "debian"]),
];

// Matching words - these must be full word matches, and only apply to zip
// archives, eg. "app-win.zip" is windows, but "darwin.zip" and "app-win.tar" are not
// Note that these can not contain word separators like "-" or "_", since they're stripped
const WINDOWS_ZIP_WORDS: [&str; 1] = ["win"];
const ZIP_EXTENSION: &str = ".zip";

/**
    Enum representing the platform bucket a downloadable asset belongs to.

    Note that the ordering here is also the precedence order used during
    detection - an asset matching both windows and linux keywords is windows.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    Other,
}

impl Platform {
    /**
        Detect a platform by identifying extensions and keywords in a file name.

        This never fails - any file name not matching a known platform is [`Platform::Other`].
    */
    pub fn detect(file_name: impl AsRef<str>) -> Self {
        let lowercased = file_name.as_ref().to_lowercase();

        if is_windows(&lowercased) {
            Self::Windows
        } else if is_linux(&lowercased) {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /**
        Get the name of the platform as a display label.
    */
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux / Debian",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

fn matches_keywords(platform: Platform, lowercased: &str) -> bool {
    let has_extension = PLATFORM_EXTENSIONS
        .iter()
        .filter(|(p, _)| *p == platform)
        .flat_map(|(_, extensions)| extensions.iter())
        .any(|extension| lowercased.ends_with(extension));
    let has_substring = PLATFORM_SUBSTRINGS
        .iter()
        .filter(|(p, _)| *p == platform)
        .flat_map(|(_, substrings)| substrings.iter())
        .any(|substring| lowercased.contains(substring));
    has_extension || has_substring
}

fn is_windows(lowercased: &str) -> bool {
    if matches_keywords(Platform::Windows, lowercased) {
        return true;
    }
    lowercased.ends_with(ZIP_EXTENSION)
        && lowercased
            .split(char_is_word_separator)
            .any(|word| WINDOWS_ZIP_WORDS.contains(&word))
}

fn is_linux(lowercased: &str) -> bool {
    matches_keywords(Platform::Linux, lowercased)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_lowercase() {
        for (platform, keywords) in PLATFORM_EXTENSIONS
            .into_iter()
            .chain(PLATFORM_SUBSTRINGS.into_iter())
        {
            for keyword in keywords {
                assert_eq!(
                    keyword.to_string(),
                    keyword.to_lowercase(),
                    "Platform keyword for {platform:?} is not lowercase: {keyword}"
                );
            }
        }
    }

    #[test]
    fn words_do_not_contain_word_separators() {
        for word in WINDOWS_ZIP_WORDS {
            assert!(
                !word.contains(char_is_word_separator),
                "Windows zip word contains word separator: {word}"
            );
        }
    }

    #[test]
    fn detect_windows() {
        const NAMES: [&str; 7] = [
            "SiteSurveyor-Windows.zip",
            "SiteSurveyor-Setup.exe",
            "SiteSurveyor.MSI",
            "sitesurveyor-win64-portable.7z",
            "sitesurveyor-win32.tar.gz",
            "sitesurveyor-win.zip",
            "SiteSurveyor_Win_x64.zip",
        ];
        for name in NAMES {
            assert_eq!(Platform::detect(name), Platform::Windows, "Name: {name}");
        }
    }

    #[test]
    fn detect_linux() {
        const NAMES: [&str; 7] = [
            "SiteSurveyor-Debian-amd64.deb",
            "sitesurveyor-1.0.0.x86_64.rpm",
            "sitesurveyor.tar.gz",
            "SiteSurveyor-x86_64.AppImage",
            "sitesurveyor-linux.zip",
            "sitesurveyor-ubuntu-22.04.zip",
            "sitesurveyor-win.tar.gz",
        ];
        for name in NAMES {
            assert_eq!(Platform::detect(name), Platform::Linux, "Name: {name}");
        }
    }

    #[test]
    fn detect_other() {
        const NAMES: [&str; 6] = [
            "SiteSurveyor.dmg",
            "checksums.txt",
            "sitesurveyor-darwin.zip",
            "twin-peaks.zip",
            "sitesurveyor-win.7z",
            "source.zip",
        ];
        for name in NAMES {
            assert_eq!(Platform::detect(name), Platform::Other, "Name: {name}");
        }
    }

    #[test]
    fn windows_takes_precedence() {
        assert_eq!(
            Platform::detect("sitesurveyor-windows-linux-subsystem.deb"),
            Platform::Windows
        );
        assert_eq!(Platform::detect("ubuntu-installer.exe"), Platform::Windows);
    }
}
