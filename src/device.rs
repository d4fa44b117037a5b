//! The device interaction controller.
//!
//! Drives the one-shot "open" animation of the laptop/phone mockup: a
//! click takes the device from `Closed` to `Opening`, a chain of scheduled
//! phases reveals the frame, boots the screen, ramps brightness and loads
//! the gallery, and the final phase lands in `Open`. `close` tears the
//! sequence down and re-arms the hint. All timing lives in a per-form-factor
//! `LayoutProfile` so the desktop and narrow paths cannot drift apart.

use super::schedule::PhaseQueue;
use log::{debug, info, trace};
use std::time::{Duration, Instant};

/// Quiet window a viewport width must hold before a resize is committed.
pub const RESIZE_QUIET_WINDOW: Duration = Duration::from_millis(250);
/// Delay before the hint affordance returns after a close.
const HINT_REDISPLAY_DELAY: Duration = Duration::from_millis(1000);
/// Delay before the hint first appears once the device scrolls into view.
const ENTRANCE_HINT_DELAY: Duration = Duration::from_millis(1500);
/// Delay before content is re-rendered after a form-factor change while open.
const FORM_FACTOR_REFRESH_DELAY: Duration = Duration::from_millis(300);

/// The device's lifecycle state. Only the controller mutates this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceState {
    Closed,
    Opening,
    Open,
}

/// Which mockup is presented, derived from viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormFactor {
    /// Laptop mockup (wide layout).
    Desktop,
    /// Phone mockup (narrow layout).
    Narrow,
}

impl FormFactor {
    /// Selects the form factor for a viewport width against the configured
    /// narrow threshold.
    pub fn from_width(width: f32, narrow_threshold: f32) -> Self {
        if width <= narrow_threshold {
            FormFactor::Narrow
        } else {
            FormFactor::Desktop
        }
    }
}

/// Timing table for one form factor's opening sequence. Delays are strictly
/// increasing; callers may rely on phases never completing out of order.
#[derive(Clone, Copy, Debug)]
pub struct LayoutProfile {
    /// Lid tilt (laptop) or slide-in (phone) start.
    pub frame_reveal: Duration,
    /// Screen backlight comes on.
    pub screen_boot: Duration,
    /// Brightness ramp steps after boot.
    pub brightness_ramp: [(Duration, f32); 3],
    /// Gallery content is rendered onto the screen.
    pub content_load: Duration,
    /// The sequence completes and the device is `Open`.
    pub open_complete: Duration,
}

impl LayoutProfile {
    pub fn for_form_factor(form_factor: FormFactor) -> Self {
        match form_factor {
            FormFactor::Desktop => Self {
                frame_reveal: Duration::from_millis(100),
                screen_boot: Duration::from_millis(800),
                brightness_ramp: [
                    (Duration::from_millis(1000), 0.2),
                    (Duration::from_millis(1300), 0.6),
                    (Duration::from_millis(1600), 1.0),
                ],
                content_load: Duration::from_millis(1800),
                open_complete: Duration::from_millis(2500),
            },
            FormFactor::Narrow => Self {
                frame_reveal: Duration::from_millis(100),
                screen_boot: Duration::from_millis(600),
                brightness_ramp: [
                    (Duration::from_millis(800), 0.2),
                    (Duration::from_millis(1100), 0.6),
                    (Duration::from_millis(1400), 1.0),
                ],
                content_load: Duration::from_millis(1600),
                open_complete: Duration::from_millis(2000),
            },
        }
    }
}

/// One step of the opening/hint sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
enum DevicePhase {
    RevealFrame,
    BootScreen,
    Brightness(f32),
    LoadContent,
    Complete,
    ShowHint,
}

/// Side effects the controller asks its collaborators to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The gallery should (re-)render onto the device screen.
    RenderGallery,
    /// The opening sequence completed.
    Opened,
}

/// Commits viewport-width changes only after they hold for a quiet window.
#[derive(Debug)]
pub struct ResizeDebouncer {
    committed: f32,
    candidate: f32,
    candidate_since: Instant,
    quiet: Duration,
}

impl ResizeDebouncer {
    pub fn new(initial_width: f32, now: Instant) -> Self {
        Self {
            committed: initial_width,
            candidate: initial_width,
            candidate_since: now,
            quiet: RESIZE_QUIET_WINDOW,
        }
    }

    /// Records the current viewport width. A changed width restarts the
    /// quiet window; a repeated width lets it keep counting down.
    pub fn observe(&mut self, width: f32, now: Instant) {
        if (width - self.candidate).abs() > 0.5 {
            trace!("Resize candidate {} -> {}", self.candidate, width);
            self.candidate = width;
            self.candidate_since = now;
        }
    }

    /// Returns the newly committed width once the candidate has held for
    /// the quiet window, at most once per change.
    pub fn poll(&mut self, now: Instant) -> Option<f32> {
        if (self.candidate - self.committed).abs() > 0.5
            && now.duration_since(self.candidate_since) >= self.quiet
        {
            self.committed = self.candidate;
            debug!("Resize committed at width {}", self.committed);
            return Some(self.committed);
        }
        None
    }
}

/// Drives the device mockup's open/close lifecycle. The single writer of
/// `DeviceState`; collaborators observe through the query methods and the
/// events returned by `poll`.
#[derive(Debug)]
pub struct DeviceController {
    state: DeviceState,
    form_factor: FormFactor,
    narrow_threshold: f32,
    phases: PhaseQueue<DevicePhase>,
    debouncer: ResizeDebouncer,
    hint_visible: bool,
    frame_open: bool,
    screen_on: bool,
    screen_brightness: f32,
    entrance_seen: bool,
}

impl DeviceController {
    pub fn new(initial_width: f32, narrow_threshold: f32, now: Instant) -> Self {
        let form_factor = FormFactor::from_width(initial_width, narrow_threshold);
        info!(
            "Initializing DeviceController: width={}, form_factor={:?}",
            initial_width, form_factor
        );
        Self {
            state: DeviceState::Closed,
            form_factor,
            narrow_threshold,
            phases: PhaseQueue::new(),
            debouncer: ResizeDebouncer::new(initial_width, now),
            hint_visible: false,
            frame_open: false,
            screen_on: false,
            screen_brightness: 0.0,
            entrance_seen: false,
        }
    }

    /// Begins the opening sequence. No-op unless the device is `Closed`;
    /// a click during `Opening` or `Open` has no effect.
    pub fn open(&mut self, now: Instant) {
        if self.state != DeviceState::Closed {
            debug!("open() ignored in state {:?}", self.state);
            return;
        }
        info!(
            "Device transitioning Closed -> Opening ({:?})",
            self.form_factor
        );
        self.state = DeviceState::Opening;
        self.hint_visible = false;

        let profile = LayoutProfile::for_form_factor(self.form_factor);
        self.phases
            .schedule(now, profile.frame_reveal, DevicePhase::RevealFrame);
        self.phases
            .schedule(now, profile.screen_boot, DevicePhase::BootScreen);
        for (delay, level) in profile.brightness_ramp {
            self.phases
                .schedule(now, delay, DevicePhase::Brightness(level));
        }
        self.phases
            .schedule(now, profile.content_load, DevicePhase::LoadContent);
        self.phases
            .schedule(now, profile.open_complete, DevicePhase::Complete);
    }

    /// Closes the device. From `Open` this is the ordinary teardown; from
    /// `Opening` it cancels the in-flight sequence, so no not-yet-fired
    /// phase can take effect. From `Closed` it is a no-op.
    pub fn close(&mut self, now: Instant) {
        match self.state {
            DeviceState::Closed => {
                trace!("close() ignored: device already closed");
            }
            DeviceState::Opening | DeviceState::Open => {
                info!("Device transitioning {:?} -> Closed", self.state);
                self.state = DeviceState::Closed;
                self.phases.invalidate();
                self.frame_open = false;
                self.screen_on = false;
                self.screen_brightness = 0.0;
                self.phases
                    .schedule(now, HINT_REDISPLAY_DELAY, DevicePhase::ShowHint);
            }
        }
    }

    /// Entrance affordance: the first time the device section becomes
    /// visible while closed, the hint appears after a short delay.
    pub fn notice_visible(&mut self, now: Instant) {
        if self.entrance_seen {
            return;
        }
        self.entrance_seen = true;
        if self.state == DeviceState::Closed {
            debug!("Device entered viewport; arming hint");
            self.phases
                .schedule(now, ENTRANCE_HINT_DELAY, DevicePhase::ShowHint);
        }
    }

    /// Feeds the current viewport width into the resize debouncer.
    pub fn observe_width(&mut self, width: f32, now: Instant) {
        self.debouncer.observe(width, now);
    }

    /// Fires due phases and commits debounced resizes. Returns the side
    /// effects collaborators must perform, in temporal order. Every phase
    /// re-checks the device state at firing time; phases invalidated by an
    /// intervening `close` never surface here.
    pub fn poll(&mut self, now: Instant) -> Vec<DeviceEvent> {
        let mut events = Vec::new();

        if let Some(width) = self.debouncer.poll(now) {
            let new_form_factor = FormFactor::from_width(width, self.narrow_threshold);
            if new_form_factor != self.form_factor {
                info!(
                    "Form factor changed {:?} -> {:?} at width {}",
                    self.form_factor, new_form_factor, width
                );
                self.form_factor = new_form_factor;
                if self.state == DeviceState::Open {
                    self.phases.schedule(
                        now,
                        FORM_FACTOR_REFRESH_DELAY,
                        DevicePhase::LoadContent,
                    );
                }
            }
        }

        for phase in self.phases.poll(now) {
            match phase {
                DevicePhase::RevealFrame => {
                    if self.state == DeviceState::Opening {
                        self.frame_open = true;
                    }
                }
                DevicePhase::BootScreen => {
                    if self.state == DeviceState::Opening {
                        self.screen_on = true;
                        self.screen_brightness = 0.0;
                    }
                }
                DevicePhase::Brightness(level) => {
                    if self.state != DeviceState::Closed {
                        self.screen_brightness = level;
                    }
                }
                DevicePhase::LoadContent => {
                    if self.state != DeviceState::Closed {
                        events.push(DeviceEvent::RenderGallery);
                    }
                }
                DevicePhase::Complete => {
                    if self.state == DeviceState::Opening {
                        info!("Device transitioning Opening -> Open");
                        self.state = DeviceState::Open;
                        events.push(DeviceEvent::Opened);
                        events.push(DeviceEvent::RenderGallery);
                    }
                }
                DevicePhase::ShowHint => {
                    if self.state == DeviceState::Closed {
                        self.hint_visible = true;
                    }
                }
            }
        }

        events
    }

    // --- Queries (read-only; no other component mutates device state) ---

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn form_factor(&self) -> FormFactor {
        self.form_factor
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn frame_open(&self) -> bool {
        self.frame_open
    }

    pub fn screen_on(&self) -> bool {
        self.screen_on
    }

    pub fn screen_brightness(&self) -> f32 {
        self.screen_brightness
    }

    /// Whether any valid phase is still pending (used for repaint pacing).
    pub fn has_pending_phases(&self) -> bool {
        self.phases.has_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn desktop_controller(now: Instant) -> DeviceController {
        DeviceController::new(1280.0, 768.0, now)
    }

    fn narrow_controller(now: Instant) -> DeviceController {
        DeviceController::new(400.0, 768.0, now)
    }

    /// Runs poll at 50ms steps up to `until` and collects all events.
    fn drain(controller: &mut DeviceController, start: Instant, until: Duration) -> Vec<DeviceEvent> {
        let mut events = Vec::new();
        let mut elapsed = Duration::ZERO;
        while elapsed <= until {
            events.extend(controller.poll(start + elapsed));
            elapsed += ms(50);
        }
        events
    }

    #[test]
    fn open_runs_phases_in_order_and_lands_open() {
        let start = Instant::now();
        let mut device = desktop_controller(start);
        device.open(start);
        assert_eq!(device.state(), DeviceState::Opening);

        assert!(device.poll(start + ms(150)).is_empty());
        assert!(device.frame_open());
        assert!(!device.screen_on(), "screen boots at 800ms, not before");

        device.poll(start + ms(900));
        assert!(device.screen_on());

        device.poll(start + ms(1700));
        assert_eq!(device.screen_brightness(), 1.0);

        let events = device.poll(start + ms(1900));
        assert_eq!(events, vec![DeviceEvent::RenderGallery]);
        assert_eq!(device.state(), DeviceState::Opening);

        let events = device.poll(start + ms(2600));
        assert_eq!(
            events,
            vec![DeviceEvent::Opened, DeviceEvent::RenderGallery]
        );
        assert_eq!(device.state(), DeviceState::Open);
    }

    #[test]
    fn second_open_is_a_noop() {
        let start = Instant::now();
        let mut device = desktop_controller(start);
        device.open(start);
        device.open(start + ms(10)); // click again mid-opening

        let events = drain(&mut device, start, ms(3000));
        let opened = events
            .iter()
            .filter(|e| **e == DeviceEvent::Opened)
            .count();
        assert_eq!(opened, 1, "exactly one Opening -> Open transition");
        assert_eq!(device.state(), DeviceState::Open);

        device.open(start + ms(3100)); // click while open
        assert_eq!(device.state(), DeviceState::Open);
        assert!(!device.has_pending_phases());
    }

    #[test]
    fn close_when_closed_has_no_effect() {
        let start = Instant::now();
        let mut device = desktop_controller(start);
        device.close(start);
        assert_eq!(device.state(), DeviceState::Closed);
        assert!(!device.has_pending_phases());
        assert!(drain(&mut device, start, ms(2000)).is_empty());
        assert!(!device.hint_visible());
    }

    #[test]
    fn close_during_opening_cancels_pending_phases() {
        let start = Instant::now();
        let mut device = desktop_controller(start);
        device.open(start);
        device.poll(start + ms(150));
        device.close(start + ms(200));
        assert_eq!(device.state(), DeviceState::Closed);
        assert!(!device.frame_open());

        let events = drain(&mut device, start + ms(200), ms(3000));
        assert!(
            events.is_empty(),
            "no phase scheduled before close may take effect"
        );
        assert_eq!(device.state(), DeviceState::Closed);
        assert!(!device.screen_on());
        assert!(device.hint_visible(), "hint re-arms after close");
    }

    #[test]
    fn close_from_open_rearms_hint_after_delay() {
        let start = Instant::now();
        let mut device = desktop_controller(start);
        device.open(start);
        drain(&mut device, start, ms(2600));
        assert_eq!(device.state(), DeviceState::Open);

        let close_at = start + ms(3000);
        device.close(close_at);
        assert_eq!(device.state(), DeviceState::Closed);
        device.poll(close_at + ms(500));
        assert!(!device.hint_visible());
        device.poll(close_at + ms(1000));
        assert!(device.hint_visible());
    }

    #[test]
    fn narrow_profile_uses_shorter_chain() {
        let start = Instant::now();
        let mut device = narrow_controller(start);
        assert_eq!(device.form_factor(), FormFactor::Narrow);
        device.open(start);

        device.poll(start + ms(700));
        assert!(device.screen_on(), "narrow screen boots at 600ms");

        let events = device.poll(start + ms(2100));
        assert!(events.contains(&DeviceEvent::Opened));
        assert_eq!(device.state(), DeviceState::Open);
    }

    #[test]
    fn entrance_arms_hint_once() {
        let start = Instant::now();
        let mut device = desktop_controller(start);
        device.notice_visible(start);
        device.notice_visible(start + ms(100)); // scrolled out and back in
        device.poll(start + ms(1400));
        assert!(!device.hint_visible());
        device.poll(start + ms(1500));
        assert!(device.hint_visible());
    }

    #[test]
    fn resize_commits_only_after_quiet_window() {
        let start = Instant::now();
        let mut device = desktop_controller(start);
        device.observe_width(500.0, start);
        device.poll(start + ms(100));
        assert_eq!(device.form_factor(), FormFactor::Desktop);

        // Width flaps back and forth; the window restarts each change.
        device.observe_width(1280.0, start + ms(150));
        device.observe_width(500.0, start + ms(200));
        device.poll(start + ms(400));
        assert_eq!(device.form_factor(), FormFactor::Desktop);

        device.poll(start + ms(460));
        assert_eq!(device.form_factor(), FormFactor::Narrow);
    }

    #[test]
    fn form_factor_change_while_open_rerenders_content() {
        let start = Instant::now();
        let mut device = desktop_controller(start);
        device.open(start);
        drain(&mut device, start, ms(2600));
        assert_eq!(device.state(), DeviceState::Open);

        let resize_at = start + ms(3000);
        device.observe_width(500.0, resize_at);
        let commit_at = resize_at + ms(250);
        assert!(device.poll(commit_at).is_empty());
        assert_eq!(device.form_factor(), FormFactor::Narrow);

        let events = device.poll(commit_at + ms(300));
        assert_eq!(events, vec![DeviceEvent::RenderGallery]);
        assert_eq!(device.state(), DeviceState::Open);
    }

    #[test]
    fn form_factor_change_while_closed_does_not_render() {
        let start = Instant::now();
        let mut device = desktop_controller(start);
        device.observe_width(500.0, start);
        device.poll(start + ms(250));
        assert_eq!(device.form_factor(), FormFactor::Narrow);
        assert!(drain(&mut device, start + ms(250), ms(1000)).is_empty());
    }
}
