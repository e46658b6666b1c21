//! Beeminder side channel -- one datapoint per break entered.

use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use crate::channels::keyring_store;
use crate::channels::SideChannel;
use crate::error::ChannelError;

const API_BASE: &str = "https://www.beeminder.com/api/v1";

pub struct Beeminder {
    auth_token: String,
    api_base: String,
}

impl Default for Beeminder {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            api_base: API_BASE.to_string(),
        }
    }
}

impl Beeminder {
    /// Load the stored auth token from the OS keyring (empty if absent).
    pub fn new() -> Self {
        let auth_token = keyring_store::get("beeminder_auth_token")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self {
            auth_token,
            api_base: API_BASE.to_string(),
        }
    }

    /// Persist the auth token to the OS keyring and update in-memory
    /// state.
    pub fn set_credentials(&mut self, auth_token: &str) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("beeminder_auth_token", auth_token)?;
        self.auth_token = auth_token.to_string();
        Ok(())
    }

    /// Remove the stored auth token.
    pub fn clear_credentials(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete("beeminder_auth_token")?;
        self.auth_token.clear();
        Ok(())
    }

    /// Post a value-1 datapoint against `goal`. The fresh `requestid`
    /// makes an accidental double-send idempotent on the server side.
    fn create_datapoint(&self, goal: &str) -> Result<(), ChannelError> {
        if !self.is_configured() {
            return Err(ChannelError::NotConfigured {
                service: "beeminder".into(),
            });
        }
        if goal.is_empty() {
            return Err(ChannelError::NotConfigured {
                service: "beeminder goal".into(),
            });
        }

        let url = format!("{}/users/me/goals/{}/datapoints.json", self.api_base, goal);
        let client = Client::new();
        let body = json!({
            "auth_token": self.auth_token,
            "value": 1,
            "timestamp": chrono::Utc::now().timestamp(),
            "comment": "+1 from timer",
            "requestid": Uuid::new_v4().to_string(),
        });

        let resp = tokio::runtime::Handle::current()
            .block_on(client.post(&url).json(&body).send())?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = tokio::runtime::Handle::current()
                .block_on(resp.text())
                .unwrap_or_default();
            Err(ChannelError::Rejected {
                service: "beeminder".into(),
                status,
                body,
            })
        }
    }
}

impl SideChannel for Beeminder {
    fn name(&self) -> &str {
        "beeminder"
    }

    fn is_configured(&self) -> bool {
        !self.auth_token.is_empty()
    }

    fn log_habit(&self, goal: &str) -> Result<(), ChannelError> {
        self.create_datapoint(goal)
    }
}
