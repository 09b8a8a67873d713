//! Background delivery: turns push events into notifications and notification
//! clicks into navigations.
//!
//! `handle_push` and `handle_click` are pure. `DeliveryAdapter` is the glue
//! the host runtime drives; each of its methods handles exactly one event and
//! resolves only after the host has finished displaying or navigating.

use std::sync::Arc;

use crate::config::NotificationDefaults;
use crate::error::Result;
use crate::models::notification::{
    DisplayIntent, DisplayedNotification, NavigationIntent, NotificationData,
    NotificationOptions, NotificationPayload,
};
use crate::services::runtime::NotificationHost;

pub fn handle_push(data: &[u8], defaults: &NotificationDefaults) -> Result<DisplayIntent> {
    let payload: NotificationPayload = serde_json::from_slice(data)?;

    Ok(DisplayIntent {
        title: non_empty(payload.title).unwrap_or_else(|| defaults.app_name.clone()),
        options: NotificationOptions {
            body: payload.body,
            icon: non_empty(payload.icon).unwrap_or_else(|| defaults.icon.clone()),
            badge: non_empty(payload.badge).unwrap_or_else(|| defaults.badge.clone()),
            data: NotificationData { url: payload.url },
        },
    })
}

pub fn handle_click(notification: &DisplayedNotification) -> Option<NavigationIntent> {
    non_empty(notification.options.data.url.clone()).map(|url| NavigationIntent { url })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

pub struct DeliveryAdapter<H> {
    host: Arc<H>,
    defaults: NotificationDefaults,
}

impl<H: NotificationHost> DeliveryAdapter<H> {
    pub fn new(host: Arc<H>, defaults: NotificationDefaults) -> Self {
        Self { host, defaults }
    }

    pub async fn on_push(&self, data: &[u8]) -> Result<DisplayedNotification> {
        let intent = handle_push(data, &self.defaults).map_err(|e| {
            log::error!("Dropping push event: {}", e);
            e
        })?;

        let shown = self.host.show_notification(intent).await.map_err(|e| {
            log::error!("Push event not displayed: {}", e);
            e
        })?;

        log::info!("Displayed notification {} \"{}\"", shown.id, shown.title);
        Ok(shown)
    }

    /// Closes the notification, then opens its url if it carries one.
    pub async fn on_notification_click(
        &self,
        notification: &DisplayedNotification,
    ) -> Result<Option<NavigationIntent>> {
        if !self.host.close_notification(notification.id) {
            log::debug!("Notification {} was already closed", notification.id);
        }

        let navigation = match handle_click(notification) {
            Some(navigation) => navigation,
            None => return Ok(None),
        };

        self.host.open_window(&navigation.url).await.map_err(|e| {
            log::error!("Could not open {}: {}", navigation.url, e);
            e
        })?;

        log::info!("Notification {} opened {}", notification.id, navigation.url);
        Ok(Some(navigation))
    }
}
