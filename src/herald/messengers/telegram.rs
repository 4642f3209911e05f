// SPDX-License-Identifier: MIT

use crate::base::error::HeraldError;
use crate::base::messenger::Messenger;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Telegram Bot API messenger
pub struct Telegram {
    client: Client,
    base_url: String,
    bot_token: String,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl Telegram {
    pub fn new(base_url: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            bot_token: bot_token.into(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }
}

#[async_trait]
impl Messenger for Telegram {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, receiver: &str, text: &str) -> Result<bool, HeraldError> {
        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .form(&[
                ("chat_id", receiver),
                ("parse_mode", "Markdown"),
                ("text", text),
            ])
            .send()
            .await?;

        let body: SendMessageResponse = resp.json().await?;
        if !body.ok {
            log::warn!(
                "Telegram refused message to {}: {}",
                receiver,
                body.description.unwrap_or_default()
            );
        }
        Ok(body.ok)
    }
}
