use allpi_core::{GalleryItem, ItemKind, Layout};
use serde::Serialize;

/// What a resolver sees of an item: identity and location, never pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    pub path: String,
    /// Only set for folders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_count: Option<usize>,
}

impl LayoutRequest {
    pub fn from_item(item: &GalleryItem) -> Self {
        let image_count = match item {
            GalleryItem::Folder(folder) => Some(folder.images.len()),
            GalleryItem::Image(_) => None,
        };
        Self {
            id: item.id().to_string(),
            kind: item.kind(),
            name: item.name().to_string(),
            path: item.path().to_string(),
            image_count,
        }
    }

    /// Lowercased extension of `name`, if it has one.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDecision {
    pub id: String,
    pub layout: Layout,
}

impl LayoutDecision {
    pub fn new(id: impl Into<String>, layout: Layout) -> Self {
        Self {
            id: id.into(),
            layout,
        }
    }
}
