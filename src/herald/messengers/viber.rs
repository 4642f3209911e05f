// SPDX-License-Identifier: MIT

use crate::base::error::HeraldError;
use crate::base::messenger::Messenger;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Viber REST bot messenger
pub struct Viber {
    client: Client,
    base_url: String,
    auth_token: String,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    status_message: String,
}

impl Viber {
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            auth_token: auth_token.into(),
        }
    }
}

#[async_trait]
impl Messenger for Viber {
    fn name(&self) -> &str {
        "viber"
    }

    async fn send_message(&self, receiver: &str, text: &str) -> Result<bool, HeraldError> {
        let url = format!("{}/pa/send_message", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(url)
            .header("X-Viber-Auth-Token", &self.auth_token)
            .json(&json!({
                "receiver": receiver,
                "type": "text",
                "text": text,
            }))
            .send()
            .await?;

        let body: SendMessageResponse = resp.json().await?;
        if body.status_message != "ok" {
            log::warn!("Viber refused message to {}: {}", receiver, body.status_message);
            return Ok(false);
        }
        Ok(true)
    }
}
