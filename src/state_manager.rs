//! Manages grouped application states like thumbnail caching, scroll
//! reveals, and animated metric counters.
//!
//! This module helps in organizing the `ShowreelApp` state by encapsulating
//! related fields and logic into dedicated manager structs.

use super::errors::MediaError;
use egui::ColorImage as EguiColorImage;
use egui_extras::RetainedImage;
use log::{debug, trace, warn};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How long a section's reveal fade runs once it becomes visible.
pub const REVEAL_DURATION: Duration = Duration::from_millis(600);
/// How long a metric counter takes to count up to its target.
const COUNT_UP_DURATION: Duration = Duration::from_millis(1000);

/// State of one asynchronous thumbnail fetch.
#[derive(Debug)]
pub enum PendingFetch {
    InFlight,
    Done(Result<Arc<EguiColorImage>, MediaError>),
}

/// Manages caching of card thumbnails and tracks pending fetches.
///
/// Fetch tasks run on the async runtime and deposit their results into
/// `pending`; the UI thread drains completed entries into the cache each
/// frame. A failed fetch leaves a tombstone so the URL is not re-requested.
pub struct ThumbnailCacheManager {
    cache: HashMap<String, RetainedImage>,
    failed: HashSet<String>,
    /// Results of ongoing asynchronous fetches, keyed by thumbnail URL.
    pub pending: Arc<Mutex<HashMap<String, PendingFetch>>>,
}

impl ThumbnailCacheManager {
    pub fn new() -> Self {
        debug!("Initializing new ThumbnailCacheManager.");
        Self {
            cache: HashMap::new(),
            failed: HashSet::new(),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether `url` still needs a fetch: not cached, not tombstoned, and
    /// not already in flight.
    pub fn needs_fetch(&self, url: &str) -> bool {
        if self.cache.contains_key(url) || self.failed.contains(url) {
            return false;
        }
        !self.pending.lock().unwrap().contains_key(url)
    }

    /// Marks `url` as in flight. Call right before spawning the fetch task.
    pub fn note_in_flight(&self, url: &str) {
        self.pending
            .lock()
            .unwrap()
            .insert(url.to_string(), PendingFetch::InFlight);
    }

    /// Moves completed fetches into the cache (or the tombstone set) and
    /// leaves in-flight entries pending.
    pub fn drain_completed(&mut self) {
        let mut completed: Vec<(String, Result<Arc<EguiColorImage>, MediaError>)> = Vec::new();
        self.pending.lock().unwrap().retain(|url, state| match state {
            PendingFetch::InFlight => true,
            PendingFetch::Done(_) => {
                if let PendingFetch::Done(result) =
                    std::mem::replace(state, PendingFetch::InFlight)
                {
                    completed.push((url.clone(), result));
                }
                false
            }
        });

        for (url, result) in completed {
            match result {
                Ok(color_image) => {
                    debug!("Caching thumbnail for URL: {}", url);
                    self.cache.insert(
                        url.clone(),
                        RetainedImage::from_color_image(url, (*color_image).clone()),
                    );
                }
                Err(e) => {
                    warn!("Thumbnail fetch failed for '{}': {}", url, e);
                    self.failed.insert(url);
                }
            }
        }
    }

    /// The cached image for `url`, if the fetch has completed successfully.
    pub fn image(&self, url: &str) -> Option<&RetainedImage> {
        self.cache.get(url)
    }
}

/// Tracks which sections have scrolled into view and how far along their
/// one-shot entrance animation is.
#[derive(Debug)]
pub struct RevealState {
    first_seen: HashMap<String, Instant>,
}

impl RevealState {
    pub fn new() -> Self {
        debug!("Initializing new RevealState manager.");
        Self {
            first_seen: HashMap::new(),
        }
    }

    /// Reveal progress in 0..=1 for a section. The first call with
    /// `visible == true` starts the animation; sections never un-reveal.
    pub fn progress(&mut self, id: &str, visible: bool, now: Instant) -> f32 {
        if let Some(started) = self.first_seen.get(id) {
            let t = now.duration_since(*started).as_secs_f32()
                / REVEAL_DURATION.as_secs_f32();
            return ease_out_cubic(t.clamp(0.0, 1.0));
        }
        if visible {
            trace!("Section '{}' entered view; starting reveal", id);
            self.first_seen.insert(id.to_string(), now);
        }
        0.0
    }

    /// Whether any reveal is still mid-animation (repaint pacing).
    pub fn is_animating(&self, now: Instant) -> bool {
        self.first_seen
            .values()
            .any(|started| now.duration_since(*started) < REVEAL_DURATION)
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Animated count-up for a hero metric string like `"150+"` or `"8 years"`.
///
/// The numeric prefix counts up from zero over a fixed duration, keeping
/// the non-numeric suffix; once finished the original text is restored
/// verbatim. Text without a usable number is displayed unchanged forever.
#[derive(Debug, Clone)]
pub struct MetricCounter {
    original: String,
    target: Option<f32>,
    suffix: String,
    started: Option<Instant>,
}

impl MetricCounter {
    pub fn new(text: &str) -> Self {
        let digits: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let suffix: String = text
            .chars()
            .filter(|c| !c.is_ascii_digit() && *c != '.')
            .collect();
        let target = digits.parse::<f32>().ok();
        if target.is_none() && !text.is_empty() {
            trace!("Metric '{}' has no usable number; displaying as-is", text);
        }
        Self {
            original: text.to_string(),
            target,
            suffix,
            started: None,
        }
    }

    /// Starts the count-up. Subsequent calls are no-ops.
    pub fn begin(&mut self, now: Instant) {
        if self.target.is_some() && self.started.is_none() {
            self.started = Some(now);
        }
    }

    /// The text to display at `now`.
    pub fn display(&self, now: Instant) -> String {
        match (self.target, self.started) {
            (Some(target), Some(started)) => {
                let t = now.duration_since(started).as_secs_f32()
                    / COUNT_UP_DURATION.as_secs_f32();
                if t >= 1.0 {
                    self.original.clone()
                } else {
                    format!("{}{}", (target * t).floor() as i64, self.suffix)
                }
            }
            _ => self.original.clone(),
        }
    }

    /// Whether the counter is still mid-animation (repaint pacing).
    pub fn is_animating(&self, now: Instant) -> bool {
        matches!(
            (self.target, self.started),
            (Some(_), Some(started)) if now.duration_since(started) < COUNT_UP_DURATION
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // --- ThumbnailCacheManager ---

    #[test]
    fn fetch_lifecycle_moves_from_pending_to_cache() {
        let mut manager = ThumbnailCacheManager::new();
        let url = "https://example.test/a.jpg";
        assert!(manager.needs_fetch(url));

        manager.note_in_flight(url);
        assert!(!manager.needs_fetch(url), "in-flight URLs are not re-fetched");

        let image = Arc::new(EguiColorImage::example());
        manager
            .pending
            .lock()
            .unwrap()
            .insert(url.to_string(), PendingFetch::Done(Ok(image)));
        manager.drain_completed();

        assert!(manager.image(url).is_some());
        assert!(!manager.needs_fetch(url));
        assert!(manager.pending.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_fetch_leaves_a_tombstone() {
        let mut manager = ThumbnailCacheManager::new();
        let url = "https://example.test/broken.jpg";
        manager.note_in_flight(url);
        manager.pending.lock().unwrap().insert(
            url.to_string(),
            PendingFetch::Done(Err(MediaError::Generic("boom".to_string()))),
        );
        manager.drain_completed();

        assert!(manager.image(url).is_none());
        assert!(!manager.needs_fetch(url), "failures are not retried");
    }

    // --- RevealState ---

    #[test]
    fn reveal_starts_on_first_visibility_and_saturates() {
        let now = Instant::now();
        let mut reveal = RevealState::new();
        assert_eq!(reveal.progress("hero", false, now), 0.0);
        assert_eq!(reveal.progress("hero", true, now), 0.0);

        let mid = reveal.progress("hero", true, now + ms(300));
        assert!(mid > 0.0 && mid < 1.0);

        // Once revealed, visibility no longer matters.
        let done = reveal.progress("hero", false, now + ms(700));
        assert_eq!(done, 1.0);
        assert!(!reveal.is_animating(now + ms(700)));
    }

    #[test]
    fn reveal_progress_is_monotonic() {
        let now = Instant::now();
        let mut reveal = RevealState::new();
        reveal.progress("cards", true, now);
        let mut last = 0.0;
        for step in 1..=6 {
            let p = reveal.progress("cards", true, now + ms(step * 100));
            assert!(p >= last);
            last = p;
        }
    }

    // --- MetricCounter ---

    #[test]
    fn counter_animates_and_restores_original_text() {
        let now = Instant::now();
        let mut counter = MetricCounter::new("150+");
        assert_eq!(counter.display(now), "150+", "unchanged before begin");

        counter.begin(now);
        assert_eq!(counter.display(now + ms(500)), "75+");
        assert_eq!(counter.display(now + ms(1000)), "150+");
        assert_eq!(counter.display(now + ms(5000)), "150+");
        assert!(!counter.is_animating(now + ms(1000)));
    }

    #[test]
    fn counter_keeps_non_digit_suffix() {
        let now = Instant::now();
        let mut counter = MetricCounter::new("8 years");
        counter.begin(now);
        assert_eq!(counter.display(now + ms(500)), "4 years");
        assert_eq!(counter.display(now + ms(1200)), "8 years");
    }

    #[test]
    fn non_numeric_text_is_displayed_unchanged() {
        let now = Instant::now();
        let mut counter = MetricCounter::new("Worldwide");
        counter.begin(now);
        assert_eq!(counter.display(now), "Worldwide");
        assert_eq!(counter.display(now + ms(500)), "Worldwide");
        assert!(!counter.is_animating(now));
    }

    #[test]
    fn unparseable_number_is_displayed_unchanged() {
        let now = Instant::now();
        // Two dots survive the digit scrape but do not parse.
        let mut counter = MetricCounter::new("v1.2.3");
        counter.begin(now);
        assert_eq!(counter.display(now + ms(500)), "v1.2.3");
    }

    #[test]
    fn begin_is_idempotent() {
        let now = Instant::now();
        let mut counter = MetricCounter::new("40");
        counter.begin(now);
        counter.begin(now + ms(900)); // must not restart the animation
        assert_eq!(counter.display(now + ms(1000)), "40");
    }
}
