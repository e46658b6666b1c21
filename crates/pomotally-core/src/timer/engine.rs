//! Timer engine implementation.
//!
//! The engine is a tick-counting state machine. It does not use internal
//! threads or read the clock - the caller is responsible for calling
//! `tick()` once per elapsed second.
//!
//! ## State Transitions
//!
//! The observable state is the pair `(running, mode)`:
//!
//! ```text
//! Idle -> FocusRunning -> BreakRunning -> FocusRunning -> ...
//! ```
//!
//! A focus interval that reaches its threshold rolls into a break; a
//! break that reaches its threshold rolls back into focus. The cycle
//! repeats until `stop()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Intervals::default());
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(TickEvent) when an interval completes
//! ```

use serde::{Deserialize, Serialize};

/// Which interval the timer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::Break => "break",
        }
    }
}

/// Interval thresholds in seconds.
///
/// Both values are full interval lengths, compared directly against the
/// elapsed-second counter. Defaults are the classic 25/5 split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub focus_secs: u32,
    pub break_secs: u32,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            break_secs: 5 * 60,
        }
    }
}

/// Emitted by `tick()` when the current interval reaches its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// A focus interval finished; the engine is now in a break.
    FocusCompleted,
    /// A break interval finished; the engine is back in focus.
    BreakCompleted,
}

/// Point-in-time view of the engine, safe to hand across threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub elapsed_secs: u32,
    pub running: bool,
    pub manual_break: bool,
    /// Elapsed time in the current interval, formatted `MM:SS`.
    pub display: String,
    /// Today's completed-session count. The engine has no store access,
    /// so this is `None` until the driver fills it in.
    pub today_count: Option<u32>,
}

/// Core timer engine.
///
/// Counts whole seconds handed to it by the caller -- no internal
/// clock, which keeps interval completion a pure function of tick
/// count.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    mode: Mode,
    /// Seconds elapsed in the current interval.
    elapsed_secs: u32,
    running: bool,
    /// True while in a break the user requested early.
    manual_break: bool,
    intervals: Intervals,
}

impl TimerEngine {
    /// Create a new engine in the idle state, positioned at focus.
    pub fn new(intervals: Intervals) -> Self {
        Self {
            mode: Mode::Focus,
            elapsed_secs: 0,
            running: false,
            manual_break: false,
            intervals,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_manual_break(&self) -> bool {
        self.manual_break
    }

    pub fn intervals(&self) -> Intervals {
        self.intervals
    }

    /// Elapsed time in the current interval as `MM:SS`.
    pub fn display_time(&self) -> String {
        let minutes = self.elapsed_secs / 60;
        let seconds = self.elapsed_secs % 60;
        format!("{minutes:02}:{seconds:02}")
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            elapsed_secs: self.elapsed_secs,
            running: self.running,
            manual_break: self.manual_break,
            display: self.display_time(),
            today_count: None,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh focus interval. Always restarts from zero, even if
    /// an interval is already underway.
    pub fn start(&mut self) {
        self.mode = Mode::Focus;
        self.elapsed_secs = 0;
        self.manual_break = false;
        self.running = true;
    }

    /// Halt the timer. The current mode is preserved so a later
    /// inspection still shows which interval was interrupted; elapsed
    /// time is cleared.
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_secs = 0;
    }

    /// Cut the current focus short and begin a break immediately.
    /// The interrupted focus does not count as completed.
    pub fn begin_manual_break(&mut self) {
        self.mode = Mode::Break;
        self.elapsed_secs = 0;
        self.manual_break = true;
        self.running = true;
    }

    /// Advance the timer by one second.
    ///
    /// Evaluation order per tick: increment elapsed, compare against the
    /// current interval's threshold, transition if reached. Returns the
    /// completion event when a transition happened, `None` otherwise.
    /// A no-op while stopped.
    pub fn tick(&mut self) -> Option<TickEvent> {
        if !self.running {
            return None;
        }
        self.elapsed_secs += 1;
        match self.mode {
            Mode::Focus if self.elapsed_secs >= self.intervals.focus_secs => {
                self.mode = Mode::Break;
                self.elapsed_secs = 0;
                self.manual_break = false;
                Some(TickEvent::FocusCompleted)
            }
            Mode::Break if self.elapsed_secs >= self.intervals.break_secs => {
                self.mode = Mode::Focus;
                self.elapsed_secs = 0;
                self.manual_break = false;
                Some(TickEvent::BreakCompleted)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short() -> Intervals {
        Intervals {
            focus_secs: 3,
            break_secs: 2,
        }
    }

    #[test]
    fn starts_idle_in_focus() {
        let engine = TimerEngine::new(Intervals::default());
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), Mode::Focus);
        assert_eq!(engine.elapsed_secs(), 0);
    }

    #[test]
    fn tick_is_noop_while_stopped() {
        let mut engine = TimerEngine::new(short());
        for _ in 0..10 {
            assert_eq!(engine.tick(), None);
        }
        assert_eq!(engine.elapsed_secs(), 0);
    }

    #[test]
    fn focus_completes_at_threshold() {
        let mut engine = TimerEngine::new(short());
        engine.start();
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.tick(), Some(TickEvent::FocusCompleted));
        assert_eq!(engine.mode(), Mode::Break);
        assert_eq!(engine.elapsed_secs(), 0);
        assert!(engine.is_running());
    }

    #[test]
    fn break_rolls_back_into_focus() {
        let mut engine = TimerEngine::new(short());
        engine.start();
        for _ in 0..3 {
            engine.tick();
        }
        assert_eq!(engine.mode(), Mode::Break);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.tick(), Some(TickEvent::BreakCompleted));
        assert_eq!(engine.mode(), Mode::Focus);
        assert_eq!(engine.elapsed_secs(), 0);
    }

    #[test]
    fn stop_preserves_mode_and_clears_elapsed() {
        let mut engine = TimerEngine::new(short());
        engine.start();
        for _ in 0..4 {
            engine.tick();
        }
        assert_eq!(engine.mode(), Mode::Break);
        engine.stop();
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), Mode::Break);
        assert_eq!(engine.elapsed_secs(), 0);
    }

    #[test]
    fn start_always_begins_fresh_focus() {
        let mut engine = TimerEngine::new(short());
        engine.start();
        engine.tick();
        engine.tick();
        engine.start();
        assert_eq!(engine.mode(), Mode::Focus);
        assert_eq!(engine.elapsed_secs(), 0);

        engine.begin_manual_break();
        engine.start();
        assert_eq!(engine.mode(), Mode::Focus);
        assert!(!engine.is_manual_break());
    }

    #[test]
    fn manual_break_uses_break_threshold() {
        let mut engine = TimerEngine::new(short());
        engine.start();
        engine.tick();
        engine.begin_manual_break();
        assert_eq!(engine.mode(), Mode::Break);
        assert_eq!(engine.elapsed_secs(), 0);
        assert!(engine.is_manual_break());

        assert_eq!(engine.tick(), None);
        assert_eq!(engine.tick(), Some(TickEvent::BreakCompleted));
        assert_eq!(engine.mode(), Mode::Focus);
        assert!(!engine.is_manual_break());
    }

    #[test]
    fn default_thresholds_complete_on_schedule() {
        let mut engine = TimerEngine::new(Intervals::default());
        engine.start();
        for _ in 0..1499 {
            assert_eq!(engine.tick(), None);
        }
        assert_eq!(engine.tick(), Some(TickEvent::FocusCompleted));
        for _ in 0..299 {
            assert_eq!(engine.tick(), None);
        }
        assert_eq!(engine.tick(), Some(TickEvent::BreakCompleted));
        assert_eq!(engine.mode(), Mode::Focus);
    }

    #[test]
    fn repeated_cycles_complete_once_each() {
        let mut engine = TimerEngine::new(Intervals::default());
        engine.start();
        let mut focus_done = 0;
        let mut break_done = 0;
        for _ in 0..3600 {
            match engine.tick() {
                Some(TickEvent::FocusCompleted) => focus_done += 1,
                Some(TickEvent::BreakCompleted) => break_done += 1,
                None => {}
            }
        }
        assert_eq!(focus_done, 2);
        assert_eq!(break_done, 2);
    }

    #[test]
    fn display_time_is_mm_ss() {
        let mut engine = TimerEngine::new(Intervals {
            focus_secs: 2000,
            break_secs: 300,
        });
        assert_eq!(engine.display_time(), "00:00");
        engine.start();
        for _ in 0..65 {
            engine.tick();
        }
        assert_eq!(engine.display_time(), "01:05");
        for _ in 0..1435 {
            engine.tick();
        }
        assert_eq!(engine.display_time(), "25:00");
    }
}
