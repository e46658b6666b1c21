//! Side channels for interval-boundary side effects.
//!
//! Channels deliver notifications and habit-log datapoints to external
//! services. Delivery is strictly fire-and-forget: the dispatcher hands
//! each call to a blocking task, logs failures and never lets them
//! reach timer or storage control flow.

pub mod beeminder;
pub mod pushover;

pub use beeminder::Beeminder;
pub use pushover::Pushover;

use std::sync::Arc;

use crate::error::ChannelError;

/// Every external delivery target implements this trait.
/// Channels are stateless between calls -- credentials come from the
/// OS keyring, looked up at construction.
///
/// The HTTP-backed implementations must be called from within a tokio
/// runtime (typically via `spawn_blocking`).
pub trait SideChannel: Send + Sync {
    /// Unique identifier (e.g. "pushover", "beeminder").
    fn name(&self) -> &str;

    /// Whether credentials are present for this service.
    fn is_configured(&self) -> bool;

    /// Deliver a short user-facing message.
    fn notify(&self, _message: &str) -> Result<(), ChannelError> {
        Ok(()) // default no-op
    }

    /// Record one habit datapoint against `goal`.
    fn log_habit(&self, _goal: &str) -> Result<(), ChannelError> {
        Ok(()) // default no-op
    }
}

/// The set of channels assembled at startup.
///
/// Dispatch methods return immediately; each delivery runs on the
/// blocking pool and outcomes only surface in the logs.
#[derive(Default)]
pub struct ChannelSet {
    channels: Vec<Arc<dyn SideChannel>>,
}

impl ChannelSet {
    pub fn new(channels: Vec<Arc<dyn SideChannel>>) -> Self {
        Self { channels }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Fan a notification out to every channel, fire-and-forget.
    pub fn dispatch_notify(&self, message: &str) {
        for channel in &self.channels {
            let channel = Arc::clone(channel);
            let message = message.to_string();
            tokio::task::spawn_blocking(move || {
                if let Err(e) = channel.notify(&message) {
                    tracing::warn!("notification via {} failed: {e}", channel.name());
                }
            });
        }
    }

    /// Fan a habit datapoint out to every channel, fire-and-forget.
    pub fn dispatch_habit(&self, goal: &str) {
        for channel in &self.channels {
            let channel = Arc::clone(channel);
            let goal = goal.to_string();
            tokio::task::spawn_blocking(move || {
                if let Err(e) = channel.log_habit(&goal) {
                    tracing::warn!("habit log via {} failed: {e}", channel.name());
                }
            });
        }
    }
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "pomotally";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
