//! Immutable inputs to the classification pipeline.
//!
//! These are built once at startup (see `allpi-runtime-config`) and passed by
//! reference into the fetcher and classifier, so tests can run the whole
//! pipeline against fixtures without any globals.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ROOT: &str = "pics";
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Identifies one branch of one remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoRef {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

/// Where gallery images live and how their public URLs are formed.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub repo: RepoRef,
    /// Root directory inside the repository, without trailing slash.
    pub root: String,
    /// Lowercase extensions without the leading dot.
    pub image_extensions: Vec<String>,
    pub raw_base_url: String,
}

impl SourceConfig {
    pub fn new(repo: RepoRef) -> Self {
        Self {
            repo,
            root: DEFAULT_ROOT.to_string(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
        }
    }

    pub fn with_root(mut self, root: &str) -> Self {
        self.root = root.trim_matches('/').to_string();
        self
    }

    pub fn with_image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.image_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    pub fn with_raw_base_url(mut self, base: &str) -> Self {
        self.raw_base_url = base.trim_end_matches('/').to_string();
        self
    }

    /// Case-insensitive extension check on the final path segment.
    /// A bare dotfile such as `.png` counts as an image.
    pub fn is_image_name(&self, name: &str) -> bool {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        self.image_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

/// How images nested more than one level below the root are grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderGrouping {
    /// `pics/trip/day1/x.jpg` belongs to folder `trip`.
    #[default]
    TopLevel,
    /// `pics/trip/day1/x.jpg` belongs to folder `trip/day1`.
    FullPath,
}

/// Whether directories without any image survive classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyFolderPolicy {
    #[default]
    Omit,
    /// Folders are also seeded from `tree` entries and may have no images.
    Retain,
}

/// Interleaving of root images and folders in the combined listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOrder {
    #[default]
    RootImagesFirst,
    FoldersFirst,
}

/// How a delegated layout strategy talks to its classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationMode {
    /// One classifier call for the whole listing.
    #[default]
    Batch,
    /// One classifier call per item, all in flight at once.
    #[serde(alias = "per-item")]
    PerItem,
}

impl DelegationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::PerItem => "per_item",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions {
    pub grouping: FolderGrouping,
    pub empty_folders: EmptyFolderPolicy,
    pub order: ItemOrder,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SourceConfig {
        SourceConfig::new(RepoRef::new("octo", "photos", "main"))
    }

    #[test]
    fn image_names_match_case_insensitively() {
        let cfg = source();
        assert!(cfg.is_image_name("a.jpg"));
        assert!(cfg.is_image_name("A.JPEG"));
        assert!(cfg.is_image_name("shot.WebP"));
        assert!(!cfg.is_image_name("notes.txt"));
        assert!(!cfg.is_image_name("jpg"));
        assert!(!cfg.is_image_name("png."));
    }

    #[test]
    fn bare_dotfile_with_image_extension_is_an_image() {
        let cfg = source();
        assert!(cfg.is_image_name(".png"));
        assert!(cfg.is_image_name(".JPG"));
        assert!(!cfg.is_image_name(".gitkeep"));
    }

    #[test]
    fn custom_extensions_are_normalized() {
        let cfg = source().with_image_extensions([".AVIF", "heic", ""]);
        assert_eq!(cfg.image_extensions, vec!["avif", "heic"]);
        assert!(cfg.is_image_name("x.avif"));
        assert!(!cfg.is_image_name("x.jpg"));
    }

    #[test]
    fn root_and_base_url_are_trimmed() {
        let cfg = source()
            .with_root("/gallery/")
            .with_raw_base_url("https://cdn.example.com/");
        assert_eq!(cfg.root, "gallery");
        assert_eq!(cfg.raw_base_url, "https://cdn.example.com");
    }

    #[test]
    fn repo_ref_display() {
        assert_eq!(source().repo.to_string(), "octo/photos@main");
    }
}
