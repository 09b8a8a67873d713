use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Server-originated message carried in a push event's data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub url: Option<String>,
}

/// Associated data kept on a displayed notification for click routing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationData {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationOptions {
    pub body: Option<String>,
    pub icon: String,
    pub badge: String,
    pub data: NotificationData,
}

/// What the delivery agent wants shown for one push event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayIntent {
    pub title: String,
    pub options: NotificationOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayedNotification {
    pub id: Uuid,
    pub title: String,
    pub options: NotificationOptions,
    pub shown_at: DateTime<Utc>,
}

impl DisplayedNotification {
    pub fn from_intent(intent: DisplayIntent) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: intent.title,
            options: intent.options,
            shown_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationIntent {
    pub url: String,
}

/// A browsing context opened in response to a notification click.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Navigation {
    pub url: String,
    pub opened_at: DateTime<Utc>,
}
