//! Tree listing → root images + folders.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::config::{ClassifyOptions, EmptyFolderPolicy, FolderGrouping, ItemOrder, SourceConfig};
use crate::gallery::{FolderItem, GalleryItem, ImageItem};
use crate::tree::{EntryKind, TreeEntry};
use crate::url::raw_image_url;

/// Output of [`classify`]: each image appears exactly once, either in
/// `root_images` or in one folder's `images`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub root_images: Vec<ImageItem>,
    pub folders: Vec<FolderItem>,
}

/// Which slice of the gallery a caller wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryView {
    /// Root images and folders, interleaved per [`ItemOrder`].
    All,
    RootImages,
    Folders,
    /// The images of one folder, flattened into image items.
    Folder(String),
}

impl Classified {
    pub fn is_empty(&self) -> bool {
        self.root_images.is_empty() && self.folders.is_empty()
    }

    /// Total number of images across root and folders.
    pub fn image_count(&self) -> usize {
        self.root_images.len() + self.folders.iter().map(|f| f.images.len()).sum::<usize>()
    }

    pub fn folder(&self, name: &str) -> Option<&FolderItem> {
        self.folders.iter().find(|folder| folder.name == name)
    }

    /// Project the classification onto one view. Returns `None` only when a
    /// named folder does not exist.
    pub fn select(&self, view: &GalleryView, order: ItemOrder) -> Option<Vec<GalleryItem>> {
        let roots = || self.root_images.iter().cloned().map(GalleryItem::Image);
        let folders = || self.folders.iter().cloned().map(GalleryItem::Folder);
        let items = match view {
            GalleryView::All => match order {
                ItemOrder::RootImagesFirst => roots().chain(folders()).collect(),
                ItemOrder::FoldersFirst => folders().chain(roots()).collect(),
            },
            GalleryView::RootImages => roots().collect(),
            GalleryView::Folders => folders().collect(),
            GalleryView::Folder(name) => self
                .folder(name)?
                .images
                .iter()
                .cloned()
                .map(GalleryItem::Image)
                .collect(),
        };
        Some(items)
    }
}

/// Partition a tree listing into root images and folders.
///
/// Only blobs under `{root}/` with an image extension survive. A blob whose
/// path has one segment after the root is a root image; deeper blobs are
/// grouped into a folder keyed per [`FolderGrouping`]. Paths with empty
/// segments are skipped. Every list in the result is name-sorted.
pub fn classify(
    entries: &[TreeEntry],
    source: &SourceConfig,
    options: &ClassifyOptions,
) -> Classified {
    let prefix = if source.root.is_empty() {
        String::new()
    } else {
        format!("{}/", source.root)
    };

    let mut root_images = Vec::new();
    let mut folders: BTreeMap<String, FolderItem> = BTreeMap::new();

    for entry in entries {
        let Some(rel) = entry.path.strip_prefix(prefix.as_str()) else {
            continue;
        };
        let segments: Vec<&str> = rel.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            continue;
        }

        match entry.kind {
            EntryKind::Blob => {
                let Some((name, parents)) = segments.split_last() else {
                    continue;
                };
                if !source.is_image_name(name) {
                    continue;
                }
                let image = ImageItem {
                    id: entry.content_hash.clone(),
                    name: (*name).to_string(),
                    path: entry.path.clone(),
                    url: raw_image_url(source, &entry.path),
                    layout: None,
                };
                if parents.is_empty() {
                    root_images.push(image);
                } else {
                    let key = folder_key(parents, options.grouping);
                    folders
                        .entry(key.clone())
                        .or_insert_with(|| new_folder(&prefix, key))
                        .images
                        .push(image);
                }
            }
            EntryKind::Tree if options.empty_folders == EmptyFolderPolicy::Retain => {
                let key = folder_key(&segments, options.grouping);
                folders
                    .entry(key.clone())
                    .or_insert_with(|| new_folder(&prefix, key));
            }
            EntryKind::Tree | EntryKind::Commit => {}
        }
    }

    root_images.sort_by(|a, b| name_order(&a.name, &b.name));
    let mut folders: Vec<FolderItem> = folders
        .into_values()
        .filter(|folder| {
            options.empty_folders == EmptyFolderPolicy::Retain || !folder.images.is_empty()
        })
        .map(|mut folder| {
            folder.images.sort_by(|a, b| name_order(&a.name, &b.name));
            folder
        })
        .collect();
    folders.sort_by(|a, b| name_order(&a.name, &b.name).then_with(|| a.path.cmp(&b.path)));

    Classified {
        root_images,
        folders,
    }
}

/// Case-insensitive name order, with the raw string as a tiebreaker so the
/// order is total.
pub fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable synthetic id for a folder, derived from its path only.
pub fn folder_id(folder_path: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(folder_path.as_bytes()));
    format!("folder-{}", &digest[..16])
}

fn folder_key(parents: &[&str], grouping: FolderGrouping) -> String {
    match grouping {
        FolderGrouping::TopLevel => parents[0].to_string(),
        FolderGrouping::FullPath => parents.join("/"),
    }
}

fn new_folder(prefix: &str, key: String) -> FolderItem {
    let path = format!("{prefix}{key}");
    FolderItem {
        id: folder_id(&path),
        name: key,
        path,
        images: Vec::new(),
        layout: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoRef;
    use crate::gallery::ItemKind;
    use crate::testing::{blob, dir, listing};
    use std::collections::HashSet;

    fn source() -> SourceConfig {
        SourceConfig::new(RepoRef::new("studio", "gallery", "main"))
    }

    fn names(images: &[ImageItem]) -> Vec<&str> {
        images.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn bare_dotfile_images_are_kept() {
        let entries = listing(&["pics/.png", "pics/trip/.jpg", "pics/.gitkeep"]);
        let out = classify(&entries, &source(), &ClassifyOptions::default());
        assert_eq!(names(&out.root_images), vec![".png"]);
        assert_eq!(out.folders.len(), 1);
        assert_eq!(names(&out.folders[0].images), vec![".jpg"]);
    }

    #[test]
    fn groups_images_under_their_top_level_folder() {
        let entries = listing(&["pics/a.jpg", "pics/b/c.png", "pics/b/d.png", "pics/e/f.jpg"]);
        let out = classify(&entries, &source(), &ClassifyOptions::default());

        assert_eq!(names(&out.root_images), vec!["a.jpg"]);
        assert_eq!(out.folders.len(), 2);
        assert_eq!(out.folders[0].name, "b");
        assert_eq!(out.folders[0].path, "pics/b");
        assert_eq!(names(&out.folders[0].images), vec!["c.png", "d.png"]);
        assert_eq!(out.folders[1].name, "e");
        assert_eq!(names(&out.folders[1].images), vec!["f.jpg"]);
    }

    #[test]
    fn filters_non_images_and_paths_outside_root() {
        let entries = vec![
            blob("README.md"),
            blob("a.jpg"),
            blob("pictures/x.jpg"),
            blob("pics/notes.txt"),
            blob("pics/raw/scan.tiff"),
            blob("pics//double.jpg"),
            blob("pics/ok.GIF"),
            dir("pics/raw"),
            TreeEntry::new("pics/sub.jpg", EntryKind::Commit, "c0ffee"),
        ];
        let out = classify(&entries, &source(), &ClassifyOptions::default());

        assert_eq!(names(&out.root_images), vec!["ok.GIF"]);
        assert!(out.folders.is_empty(), "folder without images is omitted");
    }

    #[test]
    fn image_ids_and_urls_come_from_the_blob() {
        let entries = vec![TreeEntry::new("pics/a b.jpg", EntryKind::Blob, "abc123")];
        let out = classify(&entries, &source(), &ClassifyOptions::default());
        let image = &out.root_images[0];
        assert_eq!(image.id, "abc123");
        assert_eq!(image.path, "pics/a b.jpg");
        assert_eq!(
            image.url,
            "https://raw.githubusercontent.com/studio/gallery/main/pics/a%20b.jpg"
        );
    }

    #[test]
    fn sorting_is_case_insensitive() {
        let entries = listing(&[
            "pics/Zebra.jpg",
            "pics/apple.jpg",
            "pics/Mango.jpg",
            "pics/trip/b.jpg",
            "pics/trip/A.jpg",
            "pics/beta/x.jpg",
            "pics/Alpha/x.jpg",
        ]);
        let out = classify(&entries, &source(), &ClassifyOptions::default());

        assert_eq!(names(&out.root_images), vec!["apple.jpg", "Mango.jpg", "Zebra.jpg"]);
        let folder_names: Vec<&str> = out.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(folder_names, vec!["Alpha", "beta", "trip"]);
        assert_eq!(names(&out.folders[2].images), vec!["A.jpg", "b.jpg"]);
    }

    #[test]
    fn nested_images_group_by_top_level_or_full_path() {
        let entries = listing(&["pics/trip/day1/a.jpg", "pics/trip/day2/b.jpg", "pics/trip/c.jpg"]);

        let top = classify(&entries, &source(), &ClassifyOptions::default());
        assert_eq!(top.folders.len(), 1);
        assert_eq!(top.folders[0].name, "trip");
        assert_eq!(top.folders[0].images.len(), 3);

        let options = ClassifyOptions {
            grouping: FolderGrouping::FullPath,
            ..ClassifyOptions::default()
        };
        let full = classify(&entries, &source(), &options);
        let keys: Vec<&str> = full.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(keys, vec!["trip", "trip/day1", "trip/day2"]);
        assert_eq!(full.folders[1].path, "pics/trip/day1");
        assert_eq!(full.image_count(), 3);
    }

    #[test]
    fn retain_policy_keeps_directories_without_images() {
        let entries = vec![
            dir("pics/empty"),
            blob("pics/empty/readme.txt"),
            dir("pics/full"),
            blob("pics/full/a.jpg"),
            dir("elsewhere"),
        ];
        let options = ClassifyOptions {
            empty_folders: EmptyFolderPolicy::Retain,
            ..ClassifyOptions::default()
        };
        let out = classify(&entries, &source(), &options);

        assert_eq!(out.folders.len(), 2);
        assert_eq!(out.folders[0].name, "empty");
        assert!(out.folders[0].images.is_empty());
        assert_eq!(out.folders[1].images.len(), 1);

        let omitted = classify(&entries, &source(), &ClassifyOptions::default());
        assert_eq!(omitted.folders.len(), 1);
        assert_eq!(omitted.folders[0].name, "full");
    }

    #[test]
    fn every_image_lands_in_exactly_one_place() {
        let paths = [
            "pics/a.jpg",
            "pics/b.png",
            "pics/x/1.jpg",
            "pics/x/2.jpeg",
            "pics/x/y/3.webp",
            "pics/z/4.gif",
            "pics/z/skip.mov",
            "other/5.jpg",
        ];
        let entries = listing(&paths);
        let out = classify(&entries, &source(), &ClassifyOptions::default());

        let mut seen = HashSet::new();
        for image in out
            .root_images
            .iter()
            .chain(out.folders.iter().flat_map(|f| f.images.iter()))
        {
            assert!(seen.insert(image.path.clone()), "duplicate {}", image.path);
        }
        let expected: HashSet<String> = paths
            .iter()
            .filter(|p| p.starts_with("pics/") && !p.ends_with(".mov"))
            .map(|p| p.to_string())
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn classification_is_idempotent() {
        let entries = listing(&["pics/q/2.jpg", "pics/a.jpg", "pics/q/1.jpg", "pics/B.jpg"]);
        let first = classify(&entries, &source(), &ClassifyOptions::default());
        let second = classify(&entries, &source(), &ClassifyOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn folder_ids_are_path_derived_and_stable() {
        let a = folder_id("pics/trip");
        assert_eq!(a, folder_id("pics/trip"));
        assert_ne!(a, folder_id("pics/Trip"));
        assert!(a.starts_with("folder-"));
        assert_eq!(a.len(), "folder-".len() + 16);

        let entries = listing(&["pics/trip/a.jpg"]);
        let out = classify(&entries, &source(), &ClassifyOptions::default());
        assert_eq!(out.folders[0].id, a);
    }

    #[test]
    fn empty_input_yields_empty_classification() {
        let out = classify(&[], &source(), &ClassifyOptions::default());
        assert!(out.is_empty());
        assert_eq!(out.select(&GalleryView::All, ItemOrder::default()), Some(Vec::new()));
    }

    #[test]
    fn select_views() {
        let entries = listing(&["pics/a.jpg", "pics/b/c.png", "pics/b/d.png"]);
        let out = classify(&entries, &source(), &ClassifyOptions::default());

        let all = out
            .select(&GalleryView::All, ItemOrder::RootImagesFirst)
            .expect("all view");
        let kinds: Vec<ItemKind> = all.iter().map(GalleryItem::kind).collect();
        assert_eq!(kinds, vec![ItemKind::Image, ItemKind::Folder]);

        let all = out
            .select(&GalleryView::All, ItemOrder::FoldersFirst)
            .expect("all view");
        assert_eq!(all[0].kind(), ItemKind::Folder);

        let roots = out
            .select(&GalleryView::RootImages, ItemOrder::default())
            .expect("roots");
        assert_eq!(roots.len(), 1);

        let folders = out
            .select(&GalleryView::Folders, ItemOrder::default())
            .expect("folders");
        assert_eq!(folders.len(), 1);

        let folder = out
            .select(&GalleryView::Folder("b".to_string()), ItemOrder::default())
            .expect("folder b");
        let names: Vec<&str> = folder.iter().map(GalleryItem::name).collect();
        assert_eq!(names, vec!["c.png", "d.png"]);
        assert!(folder.iter().all(|item| item.kind() == ItemKind::Image));

        assert!(
            out.select(&GalleryView::Folder("missing".to_string()), ItemOrder::default())
                .is_none()
        );
    }

    #[test]
    fn empty_root_lists_the_whole_repository() {
        let cfg = source().with_root("");
        let entries = listing(&["a.jpg", "album/b.jpg"]);
        let out = classify(&entries, &cfg, &ClassifyOptions::default());
        assert_eq!(names(&out.root_images), vec!["a.jpg"]);
        assert_eq!(out.folders[0].path, "album");
    }
}
