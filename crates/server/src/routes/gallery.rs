use allpi_api::GalleryResponse;
use allpi_core::GalleryView;
use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppState;
use crate::error::ApiErr;

/// GET /api/gallery: root images and folders.
pub async fn gallery(State(state): State<AppState>) -> Result<Json<GalleryResponse>, ApiErr> {
    state.gallery.load(&GalleryView::All).await.map(Json)
}

/// GET /api/images: root images only.
pub async fn images(State(state): State<AppState>) -> Result<Json<GalleryResponse>, ApiErr> {
    state.gallery.load(&GalleryView::RootImages).await.map(Json)
}

/// GET /api/folders: folders only.
pub async fn folders(State(state): State<AppState>) -> Result<Json<GalleryResponse>, ApiErr> {
    state.gallery.load(&GalleryView::Folders).await.map(Json)
}

/// GET /api/folders/{*name}: images of one folder, as image items.
///
/// `name` may contain slashes when folders are grouped by full path.
pub async fn folder(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GalleryResponse>, ApiErr> {
    let name = name.trim_matches('/').to_string();
    state.gallery.load(&GalleryView::Folder(name)).await.map(Json)
}
