use crate::tree::{EntryKind, TreeEntry};
use sha2::{Digest, Sha256};

/// Blob entry with a content hash derived from its path.
pub fn blob(path: &str) -> TreeEntry {
    TreeEntry::new(path, EntryKind::Blob, fake_hash(path))
}

/// Directory entry.
pub fn dir(path: &str) -> TreeEntry {
    TreeEntry::new(path, EntryKind::Tree, fake_hash(path))
}

/// Blob entries for every path, in the given order.
pub fn listing(paths: &[&str]) -> Vec<TreeEntry> {
    paths.iter().map(|path| blob(path)).collect()
}

/// A small gallery: two root images, two folders, and some noise.
pub fn sample_entries() -> Vec<TreeEntry> {
    vec![
        blob("README.md"),
        dir("pics"),
        blob("pics/b.png"),
        blob("pics/a.jpg"),
        dir("pics/trip"),
        blob("pics/trip/2.jpg"),
        blob("pics/trip/1.jpg"),
        dir("pics/city"),
        blob("pics/city/night.webp"),
        blob("pics/city/notes.txt"),
    ]
}

fn fake_hash(path: &str) -> String {
    format!("{:x}", Sha256::digest(path.as_bytes()))[..40].to_string()
}
