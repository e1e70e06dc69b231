//! Response shapes of the Git Trees API.
//! `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`

use allpi_core::{EntryKind, TreeEntry, TreeListing};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TreeResponse {
    #[serde(default)]
    pub sha: String,
    pub tree: Vec<WireEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// A single entry in the tree. Fields the gallery does not use (`mode`,
/// `size`, `url`) are ignored.
#[derive(Debug, Deserialize)]
pub struct WireEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub sha: String,
}

impl WireEntry {
    fn kind(&self) -> Option<EntryKind> {
        match self.entry_type.as_str() {
            "blob" => Some(EntryKind::Blob),
            "tree" => Some(EntryKind::Tree),
            "commit" => Some(EntryKind::Commit),
            _ => None,
        }
    }
}

impl TreeResponse {
    /// Convert to the core listing, skipping entries of unknown type.
    pub fn into_listing(self) -> TreeListing {
        let entries = self
            .tree
            .into_iter()
            .filter_map(|entry| match entry.kind() {
                Some(kind) => Some(TreeEntry::new(entry.path, kind, entry.sha)),
                None => {
                    tracing::debug!(
                        "skipping tree entry {} of unknown type {}",
                        entry.path,
                        entry.entry_type
                    );
                    None
                }
            })
            .collect();
        TreeListing {
            entries,
            truncated: self.truncated,
        }
    }
}
