use std::fmt;

use serde::Serialize;

// Matching substrings - these can be partial matches, eg. "app_aarch64.deb" will match as arm64
// Checked in order, ARM first, so that an asset may only ever get a single architecture tag
#[rustfmt::skip]
const ARCH_SUBSTRINGS: [(Arch, &[&str]); 2] = [
    (Arch::Arm64, &["arm64", "aarch64"]),
    (Arch::X64,   &["x86_64", "x86-64", "amd64", "x64"]),
];

/**
    Enum representing the architecture an asset was built for.

    This is an orthogonal label to the [`Platform`](super::Platform) of an asset.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    /**
        Detect an architecture by identifying keywords in a file name.
    */
    pub fn detect(search_string: impl AsRef<str>) -> Option<Self> {
        let lowercased = search_string.as_ref().to_lowercase();
        for (arch, keywords) in ARCH_SUBSTRINGS {
            for keyword in keywords {
                if lowercased.contains(keyword) {
                    return Some(arch);
                }
            }
        }
        None
    }

    /**
        Get the architecture as a display label, such as "x64" or "ARM64".
    */
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm64 => "ARM64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substrings_are_lowercase() {
        for (arch, keywords) in ARCH_SUBSTRINGS {
            for keyword in keywords {
                assert_eq!(
                    keyword.to_string(),
                    keyword.to_lowercase(),
                    "Arch substring for {arch:?} is not lowercase: {keyword}"
                );
            }
        }
    }

    #[test]
    fn detect_arch_valid() {
        const REAL_ARCHITECTURES: [(&str, Arch); 7] = [
            ("APP-x86_64-VER", Arch::X64),
            ("APP-x86-64-VER", Arch::X64),
            ("APP-x64-VER", Arch::X64),
            ("APP-AMD64-VER", Arch::X64),
            ("APP-arm64-VER", Arch::Arm64),
            ("APP-aarch64-VER", Arch::Arm64),
            ("APP-ARM64-VER", Arch::Arm64),
        ];
        for (name, expected) in REAL_ARCHITECTURES {
            assert_eq!(Arch::detect(name), Some(expected), "Name: {name}");
        }
    }

    #[test]
    fn detect_arch_invalid() {
        const FAKE_ARCHITECTURES: [&str; 5] = [
            "APP-x86-VER",
            "APP-i686-VER",
            "APP-arm-VER",
            "APP-armv7-VER",
            "SiteSurveyor-Windows.zip",
        ];
        for name in FAKE_ARCHITECTURES {
            assert_eq!(Arch::detect(name), None, "Name: {name}");
        }
    }
}
