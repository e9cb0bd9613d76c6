//! Held-key navigation.
//!
//! The host reports which navigation keys are held each frame; the
//! controller turns that into zoom and pan steps, at most one step per axis
//! per [`INPUT_INTERVAL`].

use std::time::{Duration, Instant};

use tracing::trace;

use fractalview_core::ViewportState;

/// Minimum time between two steps on the same axis while a key stays held.
pub const INPUT_INTERVAL: Duration = Duration::from_millis(64);
/// Zoom factor per step.
pub const ZOOM_STEP: f64 = 0.9;
/// Pan distance per step, in screen units (divided by zoom).
pub const PAN_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    ZoomIn,
    ZoomOut,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::ZoomIn,
        Direction::ZoomOut,
        Direction::PanLeft,
        Direction::PanRight,
        Direction::PanUp,
        Direction::PanDown,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// The set of navigation keys held during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState(u8);

impl InputState {
    pub const NONE: Self = Self(0);

    pub fn held(directions: &[Direction]) -> Self {
        directions.iter().fold(Self::NONE, |acc, &d| acc.with(d))
    }

    pub fn with(self, direction: Direction) -> Self {
        Self(self.0 | direction.bit())
    }

    pub fn press(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    pub fn release(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The first held key of a pair, if any.
    fn pick(&self, first: Direction, second: Direction) -> Option<Direction> {
        if self.is_held(first) {
            Some(first)
        } else if self.is_held(second) {
            Some(second)
        } else {
            None
        }
    }
}

/// Rate limiter for one axis.
#[derive(Debug, Clone, Copy)]
pub struct DebounceTimer {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    /// Fire if never fired before or if `interval` has passed since the last
    /// firing. Returns whether it fired.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let ready = match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if ready {
            self.last_fired = Some(now);
        }
        ready
    }
}

impl Default for DebounceTimer {
    fn default() -> Self {
        Self::new(INPUT_INTERVAL)
    }
}

/// Owns the viewport and applies held-key navigation to it.
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: ViewportState,
    zoom_timer: DebounceTimer,
    horizontal_timer: DebounceTimer,
    vertical_timer: DebounceTimer,
}

impl ViewportController {
    pub fn new(viewport: ViewportState) -> Self {
        Self {
            viewport,
            zoom_timer: DebounceTimer::default(),
            horizontal_timer: DebounceTimer::default(),
            vertical_timer: DebounceTimer::default(),
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Replace the viewport outright. Timers are left alone.
    pub fn set_viewport(&mut self, viewport: ViewportState) {
        self.viewport = viewport;
    }

    /// Apply `input` at the current time. Returns `true` if the viewport changed.
    pub fn update(&mut self, input: &InputState) -> bool {
        self.update_at(input, Instant::now())
    }

    /// Apply `input` as of `now`.
    ///
    /// Zoom is applied before panning, so pan steps use this frame's zoom.
    pub fn update_at(&mut self, input: &InputState, now: Instant) -> bool {
        let mut changed = false;
        let vp = &mut self.viewport;

        if let Some(dir) = input.pick(Direction::ZoomOut, Direction::ZoomIn) {
            if self.zoom_timer.try_fire(now) {
                match dir {
                    Direction::ZoomOut => vp.zoom *= ZOOM_STEP,
                    _ => vp.zoom /= ZOOM_STEP,
                }
                changed = true;
            }
        }

        if let Some(dir) = input.pick(Direction::PanLeft, Direction::PanRight) {
            if self.horizontal_timer.try_fire(now) {
                let step = PAN_STEP / vp.zoom;
                match dir {
                    Direction::PanLeft => vp.offset.x -= step,
                    _ => vp.offset.x += step,
                }
                changed = true;
            }
        }

        if let Some(dir) = input.pick(Direction::PanUp, Direction::PanDown) {
            if self.vertical_timer.try_fire(now) {
                let step = PAN_STEP / vp.zoom;
                match dir {
                    Direction::PanUp => vp.offset.y -= step,
                    _ => vp.offset.y += step,
                }
                changed = true;
            }
        }

        if changed {
            trace!(
                x = vp.offset.x,
                y = vp.offset.y,
                zoom = vp.zoom,
                "Viewport moved"
            );
        }
        changed
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportState::default())
    }
}
