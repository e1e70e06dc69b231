//! Gallery data model and classification pipeline.
//!
//! A remote repository tree is reduced to a gallery in two pure steps:
//! [`classify::classify`] partitions image blobs under the root prefix into
//! root images and folders, and [`classify::Classified::select`] turns the
//! result into the ordered [`GalleryItem`] list for one view. Layout
//! resolution happens later, in `allpi-layout`.

pub mod classify;
pub mod config;
pub mod gallery;
pub mod tree;
pub mod url;

pub use classify::{Classified, GalleryView, classify};
pub use config::{
    ClassifyOptions, DelegationMode, EmptyFolderPolicy, FolderGrouping, ItemOrder, RepoRef,
    SourceConfig,
};
pub use gallery::{FolderItem, GalleryItem, ImageItem, ItemKind, Layout};
pub use tree::{EntryKind, TreeEntry, TreeListing};
pub use url::raw_image_url;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
