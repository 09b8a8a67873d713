use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;
use uuid::Uuid;

use crate::config::HostConfig;
use crate::error::{PushError, Result};
use crate::models::{
    common::{Capabilities, Permission},
    notification::{DisplayIntent, DisplayedNotification, Navigation},
    subscription::{PushSubscription, SubscribeOptions, WorkerRegistration},
};
use crate::services::runtime::{NotificationHost, PushRuntime};
use crate::services::vapid;

/// A host runtime that needs no browser. Pushes arrive over HTTP at the
/// subscription endpoint, notifications live in an in-memory tray and
/// navigations are recorded rather than rendered.
pub struct HeadlessRuntime {
    config: HostConfig,
    origin: Url,
    registration: Mutex<Option<WorkerRegistration>>,
    subscriptions: Mutex<HashMap<Uuid, PushSubscription>>,
    tray: Mutex<Vec<DisplayedNotification>>,
    navigations: Mutex<Vec<Navigation>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HeadlessRuntime {
    /// `origin` is the application the worker belongs to; relative paths
    /// resolve against it.
    pub fn new(config: HostConfig, origin: Url) -> Self {
        Self {
            config,
            origin,
            registration: Mutex::new(None),
            subscriptions: Mutex::new(HashMap::new()),
            tray: Mutex::new(Vec::new()),
            navigations: Mutex::new(Vec::new()),
        }
    }

    pub fn has_subscription(&self, id: &Uuid) -> bool {
        lock(&self.subscriptions).contains_key(id)
    }

    pub fn notification(&self, id: &Uuid) -> Option<DisplayedNotification> {
        lock(&self.tray).iter().find(|n| n.id == *id).cloned()
    }

    pub fn notifications(&self) -> Vec<DisplayedNotification> {
        lock(&self.tray).clone()
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        lock(&self.navigations).clone()
    }

    fn endpoint_for(&self, id: &Uuid) -> Result<Url> {
        Ok(self.config.public_url.join(&format!("push/{}", id))?)
    }
}

#[async_trait]
impl PushRuntime for HeadlessRuntime {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            service_worker: self.config.service_worker_supported,
            push_manager: self.config.push_supported,
        }
    }

    async fn register_worker(&self, script_path: &str, scope: &str) -> Result<WorkerRegistration> {
        if !script_path.starts_with('/') || !scope.starts_with('/') {
            return Err(PushError::Registration(format!(
                "script {} and scope {} must be absolute paths",
                script_path, scope
            )));
        }

        let registration = WorkerRegistration {
            script_url: self.origin.join(script_path)?.to_string(),
            scope: self.origin.join(scope)?.to_string(),
            registered_at: Utc::now(),
        };

        *lock(&self.registration) = Some(registration.clone());
        Ok(registration)
    }

    async fn request_permission(&self) -> Permission {
        self.config.permission
    }

    async fn subscribe(
        &self,
        registration: &WorkerRegistration,
        options: SubscribeOptions,
    ) -> Result<PushSubscription> {
        let active = lock(&self.registration)
            .as_ref()
            .map_or(false, |r| r.scope == registration.scope);
        if !active {
            return Err(PushError::Subscribe(format!(
                "no active worker registration for scope {}",
                registration.scope
            )));
        }
        if !options.user_visible_only {
            return Err(PushError::Subscribe(
                "subscriptions must promise user-visible notifications".to_string(),
            ));
        }
        if options.application_server_key.is_empty() {
            return Err(PushError::Subscribe("application server key is empty".to_string()));
        }

        let id = Uuid::new_v4();
        let mut keys = std::collections::BTreeMap::new();
        keys.insert(
            "auth".to_string(),
            vapid::bytes_to_url_base64(Uuid::new_v4().as_bytes()),
        );

        let subscription = PushSubscription {
            endpoint: self.endpoint_for(&id)?.to_string(),
            expiration_time: None,
            keys,
        };

        lock(&self.subscriptions).insert(id, subscription.clone());
        log::info!("Issued push subscription {}", subscription.endpoint);
        Ok(subscription)
    }
}

#[async_trait]
impl NotificationHost for HeadlessRuntime {
    async fn show_notification(&self, intent: DisplayIntent) -> Result<DisplayedNotification> {
        let notification = DisplayedNotification::from_intent(intent);
        lock(&self.tray).push(notification.clone());
        Ok(notification)
    }

    fn close_notification(&self, id: Uuid) -> bool {
        let mut tray = lock(&self.tray);
        let before = tray.len();
        tray.retain(|n| n.id != id);
        tray.len() != before
    }

    async fn open_window(&self, url: &str) -> Result<()> {
        let target = self
            .origin
            .join(url)
            .map_err(|e| PushError::Navigation(format!("{}: {}", url, e)))?;

        lock(&self.navigations).push(Navigation {
            url: target.to_string(),
            opened_at: Utc::now(),
        });
        Ok(())
    }
}
