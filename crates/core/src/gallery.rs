use serde::{Deserialize, Serialize};

/// Rendering hint for one gallery item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum Layout {
    Horizontal,
    Vertical,
}

impl Layout {
    /// The rule used whenever no other decision is available:
    /// images scroll vertically, folders browse horizontally.
    pub fn default_for(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Image => Self::Vertical,
            ItemKind::Folder => Self::Horizontal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }

    /// Lenient parse used for model output.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum ItemKind {
    Image,
    Folder,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Folder => "folder",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single image. `id` is the blob's content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ImageItem {
    pub id: String,
    pub name: String,
    pub path: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts", ts(optional))]
    pub layout: Option<Layout>,
}

/// A folder of images. `id` is derived from the folder path, so renaming a
/// folder changes its identity even if the contents are unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct FolderItem {
    pub id: String,
    pub name: String,
    pub path: String,
    pub images: Vec<ImageItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts", ts(optional))]
    pub layout: Option<Layout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum GalleryItem {
    Image(ImageItem),
    Folder(FolderItem),
}

impl GalleryItem {
    pub fn id(&self) -> &str {
        match self {
            Self::Image(image) => &image.id,
            Self::Folder(folder) => &folder.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Image(image) => &image.name,
            Self::Folder(folder) => &folder.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Image(image) => &image.path,
            Self::Folder(folder) => &folder.path,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Image(_) => ItemKind::Image,
            Self::Folder(_) => ItemKind::Folder,
        }
    }

    pub fn layout(&self) -> Option<Layout> {
        match self {
            Self::Image(image) => image.layout,
            Self::Folder(folder) => folder.layout,
        }
    }

    pub fn set_layout(&mut self, layout: Layout) {
        match self {
            Self::Image(image) => image.layout = Some(layout),
            Self::Folder(folder) => folder.layout = Some(layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str) -> ImageItem {
        ImageItem {
            id: id.to_string(),
            name: format!("{id}.jpg"),
            path: format!("pics/{id}.jpg"),
            url: format!("https://raw.example.com/pics/{id}.jpg"),
            layout: None,
        }
    }

    #[test]
    fn default_layout_rule() {
        assert_eq!(Layout::default_for(ItemKind::Image), Layout::Vertical);
        assert_eq!(Layout::default_for(ItemKind::Folder), Layout::Horizontal);
    }

    #[test]
    fn layout_parse_is_lenient() {
        assert_eq!(Layout::parse(" Horizontal "), Some(Layout::Horizontal));
        assert_eq!(Layout::parse("VERTICAL"), Some(Layout::Vertical));
        assert_eq!(Layout::parse("diagonal"), None);
    }

    #[test]
    fn gallery_item_serializes_with_type_tag() {
        let mut item = GalleryItem::Image(image("a"));
        item.set_layout(Layout::Vertical);
        let value = serde_json::to_value(&item).expect("serialize item");
        assert_eq!(value["type"], "image");
        assert_eq!(value["layout"], "vertical");
        assert_eq!(value["id"], "a");

        let folder = GalleryItem::Folder(FolderItem {
            id: "folder-1".to_string(),
            name: "trip".to_string(),
            path: "pics/trip".to_string(),
            images: vec![image("b")],
            layout: None,
        });
        let value = serde_json::to_value(&folder).expect("serialize folder");
        assert_eq!(value["type"], "folder");
        assert!(value.get("layout").is_none());
        assert!(value["images"][0].get("layout").is_none());
    }

    #[test]
    fn gallery_item_roundtrips_through_json() {
        let raw = r#"{"type":"folder","id":"f","name":"n","path":"pics/n","images":[],"layout":"horizontal"}"#;
        let item: GalleryItem = serde_json::from_str(raw).expect("parse item");
        assert_eq!(item.kind(), ItemKind::Folder);
        assert_eq!(item.layout(), Some(Layout::Horizontal));
    }
}
