//! The video gallery: catalog, category filter, and render order.
//!
//! `visible_videos` is always a freshly derived, stable-ordered subsequence
//! of the catalog; it is recomputed on every filter change and never mutated
//! in place. Render output is a list of card descriptors bound to videos by
//! id, each carrying a staggered presentation delay.

use super::model::{CategoryFilter, Video};
use log::{debug, info};
use std::time::{Duration, Instant};

/// Per-card entrance stagger: card `i` reveals `i * 100ms` after render.
pub const CARD_REVEAL_STAGGER: Duration = Duration::from_millis(100);

/// Descriptor for one rendered gallery card. Carries the video's stable id
/// so the player can resolve the record unambiguously.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoCard {
    pub video_id: String,
    pub index: usize,
    /// Cosmetic entrance delay relative to the render timestamp.
    pub reveal_delay: Duration,
}

/// Holds the video catalog and the active filter, and produces render order.
#[derive(Debug)]
pub struct GalleryState {
    all_videos: Vec<Video>,
    active_filter: CategoryFilter,
    visible_videos: Vec<Video>,
    last_render: Option<Instant>,
}

impl GalleryState {
    pub fn new(catalog: Vec<Video>) -> Self {
        info!("Initializing gallery with {} video(s)", catalog.len());
        let visible_videos = catalog.clone();
        Self {
            all_videos: catalog,
            active_filter: CategoryFilter::All,
            visible_videos,
            last_render: None,
        }
    }

    /// Sets the active filter and recomputes the visible list as a stable
    /// filter over the catalog. Pure in (catalog, filter).
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        debug!("Gallery filter {:?} -> {:?}", self.active_filter, filter);
        self.active_filter = filter;
        self.visible_videos = self
            .all_videos
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
    }

    /// Produces one card descriptor per visible video, in catalog order,
    /// with the staggered entrance delay, and stamps the render time.
    pub fn render(&mut self, now: Instant) -> Vec<VideoCard> {
        self.last_render = Some(now);
        let cards: Vec<VideoCard> = self
            .visible_videos
            .iter()
            .enumerate()
            .map(|(index, video)| VideoCard {
                video_id: video.id.clone(),
                index,
                reveal_delay: CARD_REVEAL_STAGGER * index as u32,
            })
            .collect();
        debug!(
            "Gallery rendered {} card(s) under filter {:?}",
            cards.len(),
            self.active_filter
        );
        cards
    }

    /// Resolves a card's id back to its video record.
    pub fn find(&self, video_id: &str) -> Option<&Video> {
        self.all_videos.iter().find(|v| v.id == video_id)
    }

    pub fn visible_videos(&self) -> &[Video] {
        &self.visible_videos
    }

    pub fn active_filter(&self) -> CategoryFilter {
        self.active_filter
    }

    /// When the gallery was last rendered (drives card entrance fades).
    pub fn last_render(&self) -> Option<Instant> {
        self.last_render
    }
}
