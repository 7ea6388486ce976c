use serde::Serialize;

use crate::releases::Asset;

mod arch;
mod platform;

pub use self::arch::Arch;
pub use self::platform::Platform;

/**
    Information describing which system a downloadable asset is meant for.

    Derived from the file name of an asset, and never stored.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AssetDescriptor {
    platform: Platform,
    arch: Option<Arch>,
}

impl AssetDescriptor {
    /**
        Detect the descriptor for an asset by identifying keywords in its file name.

        Platform and architecture are detected independently of each other.
    */
    pub fn detect(file_name: impl AsRef<str>) -> Self {
        let file_name = file_name.as_ref();
        Self {
            platform: Platform::detect(file_name),
            arch: Arch::detect(file_name),
        }
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub const fn arch(&self) -> Option<Arch> {
        self.arch
    }
}

/**
    An asset together with its detected architecture tag.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategorizedAsset<'a> {
    pub asset: &'a Asset,
    pub arch: Option<Arch>,
}

/**
    Assets of a release, partitioned into disjoint platform buckets.

    Every asset given to [`categorize`] ends up in exactly one bucket.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizedAssets<'a> {
    pub windows: Vec<CategorizedAsset<'a>>,
    pub linux: Vec<CategorizedAsset<'a>>,
    pub other: Vec<CategorizedAsset<'a>>,
}

impl<'a> CategorizedAssets<'a> {
    /**
        Get the assets in the bucket for the given platform.
    */
    #[must_use]
    pub fn get(&self, platform: Platform) -> &[CategorizedAsset<'a>] {
        match platform {
            Platform::Windows => &self.windows,
            Platform::Linux => &self.linux,
            Platform::Other => &self.other,
        }
    }

    /**
        Iterate over all non-empty buckets, in platform order.
    */
    pub fn groups(&self) -> impl Iterator<Item = (Platform, &[CategorizedAsset<'a>])> {
        [Platform::Windows, Platform::Linux, Platform::Other]
            .into_iter()
            .map(|platform| (platform, self.get(platform)))
            .filter(|(_, assets)| !assets.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len() + self.linux.len() + self.other.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/**
    Categorizes the given assets into platform buckets, keeping their relative order.

    See [`Platform::detect`] and [`Arch::detect`] for the rules used.
*/
#[must_use]
pub fn categorize(assets: &[Asset]) -> CategorizedAssets<'_> {
    let mut categorized = CategorizedAssets::default();
    for asset in assets {
        let descriptor = AssetDescriptor::detect(&asset.name);
        let entry = CategorizedAsset {
            asset,
            arch: descriptor.arch(),
        };
        match descriptor.platform() {
            Platform::Windows => categorized.windows.push(entry),
            Platform::Linux => categorized.linux.push(entry),
            Platform::Other => categorized.other.push(entry),
        }
    }
    categorized
}
