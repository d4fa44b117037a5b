//! Defines the core data structures and enums used in the showreel application.
//!
//! This includes the video catalog records, the category taxonomy used for
//! gallery filtering, and the catalog loading helpers. Video records are
//! immutable once loaded; the catalog is an ordered sequence, either built in
//! or deserialized from a JSON file.

use super::errors::CatalogError;
use log::{debug, info, warn};
use serde::Deserialize;

/// Fixed category taxonomy for the video catalog.
///
/// The wire form is kebab-case (`"case-studies"`, `"ads"`, ...), matching
/// the catalog JSON.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    CaseStudies,
    Ads,
    Shorts,
    Music,
    Reels,
}

impl Category {
    /// All categories, in the order the filter bar presents them.
    pub const ALL: [Category; 5] = [
        Category::CaseStudies,
        Category::Ads,
        Category::Shorts,
        Category::Music,
        Category::Reels,
    ];

    /// Human-readable label shown on cards and filter buttons.
    pub fn label(&self) -> &'static str {
        match self {
            Category::CaseStudies => "Case",
            Category::Ads => "Ads",
            Category::Shorts => "Short",
            Category::Music => "Music",
            Category::Reels => "Reel",
        }
    }
}

/// The gallery's active filter: everything, or a single category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Whether a video passes this filter.
    pub fn matches(&self, video: &Video) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => video.category == *category,
        }
    }

    /// Label for the filter bar ("All" for the identity filter).
    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.label(),
        }
    }
}

/// A single video record in the catalog.
///
/// `id` is the opaque provider identifier used both for card-to-video
/// binding and for building the embed reference. `duration` is display-only
/// text ("M:SS"); it is never parsed.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    /// Thumbnail image URL. The catalog wire form calls this `thumbnail`.
    #[serde(rename = "thumbnail", alias = "thumbnail_url")]
    pub thumbnail_url: String,
    pub duration: String,
    #[serde(default)]
    pub featured: bool,
}

/// The built-in catalog, used when no catalog file is configured or the
/// configured file cannot be loaded.
pub fn default_catalog() -> Vec<Video> {
    vec![
        Video {
            id: "32V0GzI7I2o".to_string(),
            title: "Premium Brand Campaign".to_string(),
            description: "A visual narrative that transformed brand perception in the premium market.".to_string(),
            category: Category::CaseStudies,
            thumbnail_url: "https://img.youtube.com/vi/32V0GzI7I2o/maxresdefault.jpg".to_string(),
            duration: "2:30".to_string(),
            featured: true,
        },
        Video {
            id: "9zOpEKGi1fA".to_string(),
            title: "Motion Graphics Reel".to_string(),
            description: "Compilation of the best works in motion design and animation.".to_string(),
            category: Category::Shorts,
            thumbnail_url: "https://img.youtube.com/vi/9zOpEKGi1fA/maxresdefault.jpg".to_string(),
            duration: "1:45".to_string(),
            featured: true,
        },
        Video {
            id: "8Jd-bwOBiXo".to_string(),
            title: "TV Commercial - Product".to_string(),
            description: "Direction and editing of TV commercial focused on conversion.".to_string(),
            category: Category::Ads,
            thumbnail_url: "https://img.youtube.com/vi/8Jd-bwOBiXo/maxresdefault.jpg".to_string(),
            duration: "0:30".to_string(),
            featured: false,
        },
        Video {
            id: "_knXPHAiMuE".to_string(),
            title: "Short Documentary".to_string(),
            description: "Mini documentary on innovation and creativity in the digital market.".to_string(),
            category: Category::CaseStudies,
            thumbnail_url: "https://img.youtube.com/vi/_knXPHAiMuE/maxresdefault.jpg".to_string(),
            duration: "5:20".to_string(),
            featured: true,
        },
        Video {
            id: "oAGIIzr0A3g".to_string(),
            title: "Social Media Content".to_string(),
            description: "Dynamic content created for social media with high performance.".to_string(),
            category: Category::Shorts,
            thumbnail_url: "https://img.youtube.com/vi/oAGIIzr0A3g/maxresdefault.jpg".to_string(),
            duration: "0:15".to_string(),
            featured: false,
        },
    ]
}

/// Loads the video catalog from a JSON file: an ordered array of records
/// with the `Video` wire fields.
///
/// # Errors
/// Returns `CatalogError` if the file cannot be read, is not valid JSON for
/// an array of video records, or parses to an empty array.
#[must_use = "loading the catalog can fail; the Result must be handled"]
pub fn load_catalog(path: &str) -> Result<Vec<Video>, CatalogError> {
    info!("Loading video catalog from: {}", path);
    let raw = std::fs::read_to_string(path)?;
    let videos: Vec<Video> = serde_json::from_str(&raw)?;
    if videos.is_empty() {
        warn!("Catalog file '{}' contained no records", path);
        return Err(CatalogError::Empty);
    }
    debug!("Loaded {} catalog record(s) from '{}'", videos.len(), path);
    Ok(videos)
}

/// Loads the catalog named by `path`, falling back to the built-in catalog
/// on any failure. Catalog problems are never fatal.
pub fn load_catalog_or_default(path: Option<&str>) -> Vec<Video> {
    match path {
        Some(p) => match load_catalog(p) {
            Ok(videos) => videos,
            Err(e) => {
                warn!(
                    "Falling back to built-in catalog; could not load '{}': {}",
                    p, e
                );
                default_catalog()
            }
        },
        None => default_catalog(),
    }
}
