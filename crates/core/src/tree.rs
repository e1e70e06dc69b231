use serde::{Deserialize, Serialize};

/// Kind of a node in a remote repository tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file.
    Blob,
    /// A directory.
    Tree,
    /// A submodule pointer.
    Commit,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }
}

/// One record of a recursive tree listing. Paths are relative to the
/// repository root and use `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
    pub content_hash: String,
}

impl TreeEntry {
    pub fn new(path: impl Into<String>, kind: EntryKind, content_hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            content_hash: content_hash.into(),
        }
    }
}

/// Result of fetching one branch's tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    pub entries: Vec<TreeEntry>,
    /// The remote reported that `entries` is incomplete.
    pub truncated: bool,
}

impl TreeListing {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Self {
            entries,
            truncated: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
