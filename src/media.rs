//! Handles thumbnail fetching and decoding.
//!
//! Card thumbnails are public URLs from the video catalog. Fetching happens
//! on the async runtime; results are decoded into egui color images and
//! handed back to the UI thread through the thumbnail cache's pending map.

use super::errors::MediaError;
use egui::ColorImage as EguiColorImage;
use log::{debug, error, info, trace};
use reqwest::Client as ReqwestClient;

/// Fetches a thumbnail image over HTTP and decodes it.
///
/// Any failure (network, status, decode) is returned for the cache to
/// record as a tombstone; the card then renders its placeholder.
#[must_use = "fetching a thumbnail can fail; the Result must be handled"]
pub async fn fetch_thumbnail(
    client: &ReqwestClient,
    url: &str,
) -> Result<EguiColorImage, MediaError> {
    debug!("Fetching thumbnail: {}", url);

    let response = client.get(url).send().await.map_err(|e| {
        error!("Request error fetching thumbnail '{}': {:?}", url, e);
        MediaError::Download(e)
    })?;

    let response = response.error_for_status().map_err(|e| {
        let status = e.status().unwrap_or_default();
        error!("HTTP error {} fetching thumbnail '{}': {}", status, url, e);
        MediaError::Download(e)
    })?;

    let image_bytes = response.bytes().await.map_err(|e| {
        error!("Error reading thumbnail bytes for '{}': {:?}", url, e);
        MediaError::Download(e)
    })?;

    trace!("Decoding thumbnail: {}", url);
    let img = image::load_from_memory(&image_bytes).map_err(|e| {
        error!("Error decoding thumbnail '{}': {:?}", url, e);
        MediaError::Image(e)
    })?;

    let size = [img.width() as _, img.height() as _];
    let image_buffer = img.to_rgba8();
    let pixels = image_buffer.as_flat_samples();
    let egui_image = EguiColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
    info!("Successfully fetched and decoded thumbnail: {}", url);
    Ok(egui_image)
}
