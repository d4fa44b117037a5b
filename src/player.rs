//! The modal video player controller.
//!
//! Synchronizes the overlay with exactly one open video at a time. Opening
//! while already open closes first and reopens after a settle delay; closing
//! hides the overlay immediately but clears the embed reference only after
//! the hide transition, so playback stops without a visible flash. The
//! embed reference is built from a base path, the video id and a fixed set
//! of playback flags.

use super::model::Video;
use super::schedule::PhaseQueue;
use log::{debug, info, trace};
use std::time::{Duration, Instant};

/// Delay between closing an open player and reopening with a new video.
pub const PLAYER_SETTLE_DELAY: Duration = Duration::from_millis(300);
/// Delay after hiding the overlay before the embed source is cleared.
/// Must equal or exceed the hide transition duration.
pub const EMBED_CLEAR_DELAY: Duration = Duration::from_millis(300);

/// Fixed playback flags appended to every embed reference, in this order.
pub const EMBED_FLAGS: [(&str, &str); 7] = [
    ("autoplay", "1"),
    ("rel", "0"),
    ("modestbranding", "1"),
    ("fs", "1"),
    ("cc_load_policy", "1"),
    ("iv_load_policy", "3"),
    ("playsinline", "1"),
];

/// Builds the embed reference for a video id: base path + id + flag set.
pub fn embed_url(base_url: &str, video_id: &str) -> String {
    let query: Vec<String> = EMBED_FLAGS
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    format!("{}{}?{}", base_url, video_id, query.join("&"))
}

#[derive(Clone, Debug)]
enum PlayerPhase {
    /// Clear the embed source once the hide transition has finished.
    ClearEmbed,
    /// Reopen with a new video after the close settle delay.
    Reopen(Video),
}

/// What the app shell should do in response to a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Key was not for us, or is an advisory playback hook with no
    /// required behavior (play/pause, seek, mute).
    Ignored,
    /// The player closed itself (Escape).
    Closed,
    /// The shell should issue the platform's native fullscreen request.
    RequestFullscreen,
}

/// Drives the modal overlay. The single writer of the player state; other
/// components observe via `is_open` / `current_video`.
#[derive(Debug)]
pub struct PlayerController {
    embed_base_url: String,
    is_open: bool,
    current_video: Option<Video>,
    embed_source: Option<String>,
    phases: PhaseQueue<PlayerPhase>,
}

impl PlayerController {
    pub fn new(embed_base_url: String) -> Self {
        Self {
            embed_base_url,
            is_open: false,
            current_video: None,
            embed_source: None,
            phases: PhaseQueue::new(),
        }
    }

    /// Opens the overlay for `video`. If the player is already open it
    /// closes first and schedules the reopen after the settle delay, so
    /// two videos are never visible at once.
    pub fn open(&mut self, video: Video, now: Instant) {
        if self.is_open {
            debug!(
                "open('{}') while open; closing and scheduling reopen",
                video.id
            );
            self.close(now);
            self.phases
                .schedule(now, PLAYER_SETTLE_DELAY, PlayerPhase::Reopen(video));
            return;
        }
        info!("Player opening video '{}' ({})", video.id, video.title);
        self.embed_source = Some(embed_url(&self.embed_base_url, &video.id));
        self.current_video = Some(video);
        self.is_open = true;
    }

    /// Hides the overlay and schedules the embed-source clear. No-op when
    /// already closed; calling it twice does not double-fire the clear.
    pub fn close(&mut self, now: Instant) {
        if !self.is_open {
            trace!("close() ignored: player already closed");
            return;
        }
        info!("Player closing");
        self.is_open = false;
        self.phases.invalidate();
        self.phases
            .schedule(now, EMBED_CLEAR_DELAY, PlayerPhase::ClearEmbed);
    }

    /// Fires due phases. The embed source is never cleared while the
    /// overlay is (again) visible; a pending reopen only fires if nothing
    /// reopened the player in the meantime.
    pub fn poll(&mut self, now: Instant) {
        for phase in self.phases.poll(now) {
            match phase {
                PlayerPhase::ClearEmbed => {
                    if !self.is_open {
                        debug!("Clearing embed source after hide transition");
                        self.embed_source = None;
                        self.current_video = None;
                    }
                }
                PlayerPhase::Reopen(video) => {
                    if !self.is_open {
                        self.open(video, now);
                    }
                }
            }
        }
    }

    /// Keyboard contract while open: Escape closes, F requests native
    /// fullscreen, the remaining playback keys are advisory no-ops.
    /// Everything is ignored while closed.
    pub fn handle_key(&mut self, key: egui::Key, now: Instant) -> PlayerAction {
        if !self.is_open {
            return PlayerAction::Ignored;
        }
        match key {
            egui::Key::Escape => {
                self.close(now);
                PlayerAction::Closed
            }
            egui::Key::F => PlayerAction::RequestFullscreen,
            egui::Key::Space | egui::Key::K => {
                debug!("Advisory play/pause key; no required behavior");
                PlayerAction::Ignored
            }
            egui::Key::M => {
                debug!("Advisory mute key; no required behavior");
                PlayerAction::Ignored
            }
            egui::Key::ArrowLeft | egui::Key::ArrowRight => {
                debug!("Advisory seek key; no required behavior");
                PlayerAction::Ignored
            }
            _ => PlayerAction::Ignored,
        }
    }

    // --- Queries ---

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_video(&self) -> Option<&Video> {
        self.current_video.as_ref()
    }

    pub fn embed_source(&self) -> Option<&str> {
        self.embed_source.as_deref()
    }

    /// Whether a settle/clear phase is still pending (repaint pacing).
    pub fn has_pending_phases(&self) -> bool {
        self.phases.has_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Video};

    fn video(id: &str) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {}", id),
            description: String::new(),
            category: Category::Ads,
            thumbnail_url: String::new(),
            duration: "1:00".to_string(),
            featured: false,
        }
    }

    fn player() -> PlayerController {
        PlayerController::new("https://www.youtube.com/embed/".to_string())
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn embed_url_carries_the_fixed_flag_set_in_order() {
        let url = embed_url("https://www.youtube.com/embed/", "abc123");
        assert_eq!(
            url,
            "https://www.youtube.com/embed/abc123?autoplay=1&rel=0&modestbranding=1&fs=1&cc_load_policy=1&iv_load_policy=3&playsinline=1"
        );
    }

    #[test]
    fn open_sets_state_and_embed_source() {
        let now = Instant::now();
        let mut player = player();
        player.open(video("v1"), now);
        assert!(player.is_open());
        assert_eq!(player.current_video().map(|v| v.id.as_str()), Some("v1"));
        assert!(player.embed_source().unwrap().contains("v1"));
    }

    #[test]
    fn reopen_settles_before_showing_the_new_video() {
        let now = Instant::now();
        let mut player = player();
        player.open(video("v1"), now);
        player.open(video("v2"), now + ms(50));

        // During the settle window nothing is visible: v1 and v2 are never
        // rendered simultaneously.
        assert!(!player.is_open());
        player.poll(now + ms(200));
        assert!(!player.is_open());

        player.poll(now + ms(350));
        assert!(player.is_open());
        assert_eq!(player.current_video().map(|v| v.id.as_str()), Some("v2"));
        assert!(player.embed_source().unwrap().contains("v2"));
    }

    #[test]
    fn close_hides_immediately_but_clears_after_the_delay() {
        let now = Instant::now();
        let mut player = player();
        player.open(video("v1"), now);
        player.close(now + ms(100));

        assert!(!player.is_open());
        // Source survives the hide transition to avoid a visible flash.
        assert!(player.embed_source().is_some());

        player.poll(now + ms(300));
        assert!(player.embed_source().is_some());
        player.poll(now + ms(400));
        assert!(player.embed_source().is_none());
        assert!(player.current_video().is_none());
    }

    #[test]
    fn close_is_idempotent() {
        let now = Instant::now();
        let mut player = player();
        player.open(video("v1"), now);
        player.close(now + ms(100));
        player.close(now + ms(150)); // second close: no-op, no re-schedule

        player.poll(now + ms(400));
        assert!(!player.is_open());
        assert!(player.embed_source().is_none());
        assert!(
            !player.has_pending_phases(),
            "no second clear left behind"
        );

        player.close(now + ms(500)); // closing the already-cleared player
        assert!(!player.is_open());
        assert!(!player.has_pending_phases());
    }

    #[test]
    fn reopen_before_clear_keeps_the_new_embed() {
        let now = Instant::now();
        let mut player = player();
        player.open(video("v1"), now);
        player.close(now + ms(100));
        // A fresh open lands before the pending clear fires.
        player.open(video("v2"), now + ms(200));
        player.poll(now + ms(450));
        assert!(player.is_open());
        assert_eq!(player.current_video().map(|v| v.id.as_str()), Some("v2"));
        assert!(player.embed_source().unwrap().contains("v2"));
    }

    #[test]
    fn escape_closes_and_other_keys_are_advisory() {
        let now = Instant::now();
        let mut player = player();
        assert_eq!(
            player.handle_key(egui::Key::Escape, now),
            PlayerAction::Ignored,
            "keys are ignored while closed"
        );

        player.open(video("v1"), now);
        assert_eq!(
            player.handle_key(egui::Key::Space, now),
            PlayerAction::Ignored
        );
        assert_eq!(
            player.handle_key(egui::Key::F, now),
            PlayerAction::RequestFullscreen
        );
        assert!(player.is_open());

        assert_eq!(
            player.handle_key(egui::Key::Escape, now + ms(10)),
            PlayerAction::Closed
        );
        assert!(!player.is_open());
    }
}
