//! Seams to the host runtime.
//!
//! The coordinator and the delivery agent never talk to a browser or an OS
//! directly. Everything they need from the host goes through these traits.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    common::{Capabilities, Permission},
    notification::{DisplayIntent, DisplayedNotification},
    subscription::{PushSubscription, SubscribeOptions, WorkerRegistration},
};

/// Foreground side: worker registration, permission and push subscription.
#[async_trait]
pub trait PushRuntime: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    async fn register_worker(&self, script_path: &str, scope: &str) -> Result<WorkerRegistration>;

    async fn request_permission(&self) -> Permission;

    async fn subscribe(
        &self,
        registration: &WorkerRegistration,
        options: SubscribeOptions,
    ) -> Result<PushSubscription>;
}

/// Background side: notification display and click navigation.
#[async_trait]
pub trait NotificationHost: Send + Sync {
    /// Resolves once the notification is visible.
    async fn show_notification(&self, intent: DisplayIntent) -> Result<DisplayedNotification>;

    /// Returns false if the notification was already gone.
    fn close_notification(&self, id: Uuid) -> bool;

    async fn open_window(&self, url: &str) -> Result<()>;
}
