//! Pushover side channel -- phone notifications at interval boundaries.

use reqwest::Client;
use serde_json::json;

use crate::channels::keyring_store;
use crate::channels::SideChannel;
use crate::error::ChannelError;

const API_URL: &str = "https://api.pushover.net/1/messages.json";

pub struct Pushover {
    token: String,
    user: String,
    api_url: String,
}

impl Default for Pushover {
    fn default() -> Self {
        Self {
            token: String::new(),
            user: String::new(),
            api_url: API_URL.to_string(),
        }
    }
}

impl Pushover {
    /// Load stored credentials from the OS keyring (empty if absent).
    pub fn new() -> Self {
        let token = keyring_store::get("pushover_token")
            .ok()
            .flatten()
            .unwrap_or_default();
        let user = keyring_store::get("pushover_user")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self {
            token,
            user,
            api_url: API_URL.to_string(),
        }
    }

    /// Persist user-provided credentials to the OS keyring and update
    /// in-memory state.
    pub fn set_credentials(
        &mut self,
        token: &str,
        user: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("pushover_token", token)?;
        keyring_store::set("pushover_user", user)?;
        self.token = token.to_string();
        self.user = user.to_string();
        Ok(())
    }

    /// Remove stored credentials.
    pub fn clear_credentials(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete("pushover_token")?;
        keyring_store::delete("pushover_user")?;
        self.token.clear();
        self.user.clear();
        Ok(())
    }

    fn post_message(&self, message: &str) -> Result<(), ChannelError> {
        if !self.is_configured() {
            return Err(ChannelError::NotConfigured {
                service: "pushover".into(),
            });
        }

        let client = Client::new();
        let body = json!({
            "token": self.token,
            "user": self.user,
            "message": message,
        });

        let resp = tokio::runtime::Handle::current()
            .block_on(client.post(&self.api_url).json(&body).send())?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = tokio::runtime::Handle::current()
                .block_on(resp.text())
                .unwrap_or_default();
            Err(ChannelError::Rejected {
                service: "pushover".into(),
                status,
                body,
            })
        }
    }
}

impl SideChannel for Pushover {
    fn name(&self) -> &str {
        "pushover"
    }

    fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.user.is_empty()
    }

    fn notify(&self, message: &str) -> Result<(), ChannelError> {
        self.post_message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_server(url: String) -> Pushover {
        Pushover {
            token: "app-token".into(),
            user: "user-key".into(),
            api_url: url,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn notify_posts_credentials_and_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(json!({
                "token": "app-token",
                "user": "user-key",
                "message": "Time for a break",
            })))
            .with_status(200)
            .create_async()
            .await;

        let channel = with_server(server.url());
        let result =
            tokio::task::spawn_blocking(move || channel.notify("Time for a break")).await;
        assert!(result.unwrap().is_ok());
        mock.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejection_surfaces_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(401)
            .with_body("bad token")
            .create_async()
            .await;

        let channel = with_server(server.url());
        let result = tokio::task::spawn_blocking(move || channel.notify("hello"))
            .await
            .unwrap();
        match result {
            Err(ChannelError::Rejected { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unconfigured_channel_refuses_to_send() {
        let channel = Pushover::default();
        let result = tokio::task::spawn_blocking(move || channel.notify("hello"))
            .await
            .unwrap();
        assert!(matches!(result, Err(ChannelError::NotConfigured { .. })));
    }
}
