// SPDX-License-Identifier: MIT

use crate::base::messenger::Messenger;
use crate::herald::config::Settings;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Telegram, Viber};

/// Messengers a task may deliver through, keyed by lowercase name
#[derive(Clone)]
pub struct MessengerRegistry {
    messengers: Arc<RwLock<HashMap<String, Arc<dyn Messenger>>>>,
}

impl MessengerRegistry {
    pub fn new() -> Self {
        Self {
            messengers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry holding every messenger that has credentials configured
    pub async fn from_settings(settings: &Settings) -> Self {
        let registry = Self::new();

        match &settings.telegram_bot_token {
            Some(token) => {
                registry
                    .register(Arc::new(Telegram::new(&settings.telegram_base_url, token)))
                    .await
            }
            None => log::warn!("TELEGRAM_BOT_TOKEN not set, telegram disabled"),
        }
        match &settings.viber_auth_token {
            Some(token) => {
                registry
                    .register(Arc::new(Viber::new(&settings.viber_base_url, token)))
                    .await
            }
            None => log::warn!("VIBER_AUTH_TOKEN not set, viber disabled"),
        }

        registry
    }

    pub async fn register(&self, messenger: Arc<dyn Messenger>) {
        log::info!("Registered messenger: {}", messenger.name());
        let mut messengers = self.messengers.write().await;
        messengers.insert(messenger.name().to_lowercase(), messenger);
    }

    /// Case-insensitive lookup
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Messenger>> {
        let messengers = self.messengers.read().await;
        messengers.get(&name.to_lowercase()).cloned()
    }

    pub async fn names(&self) -> Vec<String> {
        let messengers = self.messengers.read().await;
        let mut names: Vec<String> = messengers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for MessengerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
