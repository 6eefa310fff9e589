//! Build configuration — where the path list lives and where the tree goes.

use crate::core::source::SourceLocator;
use crate::ui::surface::DEFAULT_MOUNT;

/// Path list fetched when no source is given.
pub const DEFAULT_SOURCE: &str = "buildtree-files.txt";

/// The two recognised build options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Locator of the path list: URL, file path, or `-` for stdin.
    pub source: String,
    /// Mount point on the display surface that receives the tree.
    pub mount: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            mount: DEFAULT_MOUNT.to_string(),
        }
    }
}

impl BuildConfig {
    pub fn new(source: impl Into<String>, mount: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            mount: mount.into(),
        }
    }

    pub fn locator(&self) -> SourceLocator {
        SourceLocator::parse(&self.source)
    }
}
