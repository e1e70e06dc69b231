//! Request pipeline: fetch tree, classify paths, resolve layouts.

use std::sync::Arc;

use allpi_api::{GalleryResponse, LayoutSource, ListingStatus};
use allpi_core::{ClassifyOptions, GalleryView, SourceConfig, classify};
use allpi_github::TreeSource;
use allpi_layout::{LayoutResolver, apply_layouts};

use crate::error::ApiErr;

pub struct GalleryService {
    source: Arc<dyn TreeSource>,
    resolver: Arc<dyn LayoutResolver>,
    config: SourceConfig,
    options: ClassifyOptions,
}

impl GalleryService {
    pub fn new(
        source: Arc<dyn TreeSource>,
        resolver: Arc<dyn LayoutResolver>,
        config: SourceConfig,
        options: ClassifyOptions,
    ) -> Self {
        Self {
            source,
            resolver,
            config,
            options,
        }
    }

    pub fn source_config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn resolver_id(&self) -> &'static str {
        self.resolver.id()
    }

    /// Build the listing for `view`.
    ///
    /// A failed fetch is not an error here: it yields an empty listing with
    /// status `upstream_unavailable`. The only error is a named folder that
    /// does not exist in a listing that was fetched successfully.
    pub async fn load(&self, view: &GalleryView) -> Result<GalleryResponse, ApiErr> {
        let repo = &self.config.repo;
        let listing = match self.source.fetch_tree(repo).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(repo = %repo, kind = e.kind(), "tree fetch failed: {e}");
                return Ok(response(
                    ListingStatus::UpstreamUnavailable,
                    false,
                    LayoutSource::Skipped,
                    Vec::new(),
                ));
            }
        };

        let classified = classify(&listing.entries, &self.config, &self.options);
        tracing::debug!(
            repo = %repo,
            entries = listing.entries.len(),
            root_images = classified.root_images.len(),
            folders = classified.folders.len(),
            "classified tree"
        );

        let Some(items) = classified.select(view, self.options.order) else {
            let message = match view {
                GalleryView::Folder(name) => format!("folder not found: {name}"),
                _ => "view not found".to_string(),
            };
            return Err(ApiErr::not_found(message));
        };

        let status = if items.is_empty() {
            ListingStatus::Empty
        } else {
            ListingStatus::Ok
        };
        let outcome = apply_layouts(self.resolver.as_ref(), items).await;
        if outcome.defaulted > 0 && outcome.source != LayoutSource::Fallback {
            tracing::info!(
                defaulted = outcome.defaulted,
                "{} items used the rule layout",
                outcome.defaulted
            );
        }

        Ok(response(
            status,
            listing.truncated,
            outcome.source,
            outcome.items,
        ))
    }
}

fn response(
    status: ListingStatus,
    truncated: bool,
    layout_source: LayoutSource,
    items: Vec<allpi_core::GalleryItem>,
) -> GalleryResponse {
    GalleryResponse {
        status,
        truncated,
        layout_source,
        fetched_at: chrono::Utc::now().to_rfc3339(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allpi_core::testing::sample_entries;
    use allpi_core::{GalleryItem, Layout, RepoRef, TreeListing};
    use allpi_github::FetchError;
    use allpi_layout::RuleResolver;
    use async_trait::async_trait;
    use axum::http::StatusCode;

    struct Fixed(Option<TreeListing>);

    #[async_trait]
    impl TreeSource for Fixed {
        async fn fetch_tree(&self, _repo: &RepoRef) -> Result<TreeListing, FetchError> {
            self.0.clone().ok_or_else(|| FetchError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    fn service(listing: Option<TreeListing>) -> GalleryService {
        GalleryService::new(
            Arc::new(Fixed(listing)),
            Arc::new(RuleResolver),
            SourceConfig::new(RepoRef::new("octo", "photos", "main")),
            ClassifyOptions::default(),
        )
    }

    #[tokio::test]
    async fn full_listing_has_root_images_then_folders() {
        let svc = service(Some(TreeListing::new(sample_entries())));
        let resp = svc.load(&GalleryView::All).await.expect("load");
        assert_eq!(resp.status, ListingStatus::Ok);
        assert_eq!(resp.layout_source, LayoutSource::Rule);
        assert!(!resp.truncated);

        let names: Vec<&str> = resp.items.iter().map(GalleryItem::name).collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "city", "trip"]);
        assert!(resp.items.iter().all(|item| item.layout().is_some()));
        assert_eq!(resp.items[2].layout(), Some(Layout::Horizontal));
    }

    #[tokio::test]
    async fn fetch_failure_is_upstream_unavailable() {
        let resp = service(None)
            .load(&GalleryView::All)
            .await
            .expect("fetch failure is not an error");
        assert_eq!(resp.status, ListingStatus::UpstreamUnavailable);
        assert_eq!(resp.layout_source, LayoutSource::Skipped);
        assert!(resp.items.is_empty());
    }

    #[tokio::test]
    async fn empty_tree_is_empty_not_unavailable() {
        let resp = service(Some(TreeListing::new(vec![])))
            .load(&GalleryView::All)
            .await
            .expect("load");
        assert_eq!(resp.status, ListingStatus::Empty);
        assert_eq!(resp.layout_source, LayoutSource::Skipped);
    }

    #[tokio::test]
    async fn unknown_folder_is_not_found() {
        let err = service(Some(TreeListing::new(sample_entries())))
            .load(&GalleryView::Folder("nope".to_string()))
            .await
            .expect_err("missing folder");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.message().contains("nope"));
    }

    #[tokio::test]
    async fn unknown_folder_during_outage_is_not_an_error() {
        let resp = service(None)
            .load(&GalleryView::Folder("nope".to_string()))
            .await
            .expect("outage wins over 404");
        assert_eq!(resp.status, ListingStatus::UpstreamUnavailable);
    }

    #[tokio::test]
    async fn truncated_listing_is_flagged() {
        let mut listing = TreeListing::new(sample_entries());
        listing.truncated = true;
        let resp = service(Some(listing))
            .load(&GalleryView::RootImages)
            .await
            .expect("load");
        assert!(resp.truncated);
        assert_eq!(resp.items.len(), 2);
    }
}
