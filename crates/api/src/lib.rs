//! Shared API types for the allpi gallery service.
//!
//! This crate is the **single source of truth** for all response types the
//! server emits. TypeScript types are generated via `ts-rs` for the frontend.
//!
//! To regenerate TypeScript types:
//!   cargo test -p allpi-api --features ts -- export_typescript --nocapture

use serde::{Deserialize, Serialize};

// Re-export core gallery types for convenience
pub use allpi_core::{FolderItem, GalleryItem, ImageItem, ItemKind, Layout};

// ─── Shared Enums ────────────────────────────────────────────────────────────

/// Outcome of the remote tree fetch behind a listing.
///
/// `empty` and `upstream_unavailable` both come with no items; the status is
/// what lets the frontend tell "nothing uploaded yet" from "GitHub is down".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum ListingStatus {
    Ok,
    Empty,
    UpstreamUnavailable,
}

impl ListingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::Empty => "empty",
            Self::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the `layout` values in a listing came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum LayoutSource {
    /// Fixed rule: images vertical, folders horizontal.
    Rule,
    /// Every item was decided by the external classifier.
    Delegated,
    /// The classifier answered, but some items fell back to the rule.
    Partial,
    /// The classifier failed; every item fell back to the rule.
    Fallback,
    /// Nothing to classify.
    Skipped,
}

impl LayoutSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rule => "rule",
            Self::Delegated => "delegated",
            Self::Partial => "partial",
            Self::Fallback => "fallback",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for LayoutSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Gallery ─────────────────────────────────────────────────────────────────

/// Body of every gallery listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct GalleryResponse {
    pub status: ListingStatus,
    /// The remote tree listing was incomplete.
    pub truncated: bool,
    pub layout_source: LayoutSource,
    /// RFC 3339 timestamp of when the listing was produced.
    pub fetched_at: String,
    pub items: Vec<GalleryItem>,
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ApiError {
    pub error: String,
}

#[cfg(test)]
mod wire_tests {
    use super::*;

    #[test]
    fn enums_use_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_value(ListingStatus::UpstreamUnavailable).unwrap(),
            "upstream_unavailable"
        );
        assert_eq!(serde_json::to_value(LayoutSource::Partial).unwrap(), "partial");
        assert_eq!(ListingStatus::Empty.to_string(), "empty");
        assert_eq!(LayoutSource::Skipped.to_string(), "skipped");
    }

    #[test]
    fn gallery_response_shape() {
        let resp = GalleryResponse {
            status: ListingStatus::Ok,
            truncated: false,
            layout_source: LayoutSource::Rule,
            fetched_at: "2026-01-01T00:00:00Z".to_string(),
            items: vec![GalleryItem::Image(ImageItem {
                id: "abc".to_string(),
                name: "a.jpg".to_string(),
                path: "pics/a.jpg".to_string(),
                url: "https://raw.githubusercontent.com/o/r/main/pics/a.jpg".to_string(),
                layout: Some(Layout::Vertical),
            })],
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["layout_source"], "rule");
        assert_eq!(value["items"][0]["type"], "image");
        assert_eq!(value["items"][0]["layout"], "vertical");
    }
}

// ─── TypeScript generation ───────────────────────────────────────────────────
