//! # Pomotally Core Library
//!
//! This library provides the core logic for the pomotally Pomodoro
//! timer: the focus/break state machine, durable daily session counts,
//! and the derived exports and side channels that hang off them. The
//! CLI binary is a thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a tick-counting state machine (`TimerEngine`) plus the
//!   tokio-based schedule that drives it (`TimerDriver`)
//! - **Storage**: SQLite-backed daily counters with spreadsheet-style
//!   exports, and TOML-based configuration
//! - **Channels**: fire-and-forget delivery to notification and
//!   habit-tracking services
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`TimerDriver`]: tick scheduling and transition side effects
//! - [`SessionStore`]: session-count persistence and export artifacts
//! - [`Config`]: application configuration management
//! - [`SideChannel`]: trait for external delivery targets

pub mod channels;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use channels::{Beeminder, ChannelSet, Pushover, SideChannel};
pub use error::{ChannelError, ConfigError, CoreError, ExportError, StoreError};
pub use events::{Indicator, Presenter, SoundKind};
pub use storage::{today, Config, DailySessionRecord, SessionStore};
pub use timer::{Intervals, Mode, TickEvent, TimerDriver, TimerEngine, TimerSnapshot};
