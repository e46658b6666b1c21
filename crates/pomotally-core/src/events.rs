use serde::{Deserialize, Serialize};

use crate::timer::Mode;

/// Cue names for interval-boundary sounds. The presentation layer owns
/// actual playback; the core only says which cue fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundKind {
    /// A focus interval just completed.
    FocusEnd,
    /// A break interval just completed.
    BreakEnd,
}

/// Coarse timer status for an always-visible indicator (tray icon,
/// prompt glyph, status bar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    /// No interval running.
    Idle,
    /// A focus interval is running.
    Active,
    /// A break interval is running.
    Break,
}

/// Callbacks the timer pushes to the presentation layer.
///
/// Implementations must be cheap and non-blocking: display updates
/// arrive once per tick, and completion callbacks may arrive from a
/// worker thread after persistence settles. Callbacks fire while the
/// driver holds its state lock, so they must not call back into the
/// timer.
pub trait Presenter: Send + Sync {
    /// Once per tick and on every explicit state change. `time` is the
    /// elapsed time in the current interval, formatted `MM:SS`.
    fn on_display_update(&self, mode: Mode, time: &str);

    /// A focus interval completed and was recorded; `count` is today's
    /// total after the update (or the best-effort re-read if the
    /// recording write failed).
    fn on_session_completed(&self, count: u32);

    /// An interval boundary was crossed.
    fn on_sound(&self, kind: SoundKind);

    /// The coarse timer status changed.
    fn on_indicator(&self, indicator: Indicator);

    /// Unrecoverable startup failure. The caller is expected to exit
    /// after this fires.
    fn on_fatal_error(&self, message: &str);
}
