use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::config::WorkerConfig;
use crate::error::PushError;
use crate::models::{
    common::Permission,
    subscription::{PushSubscription, SubscribeOptions},
};
use crate::services::{api::ServerApi, runtime::PushRuntime, vapid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStage {
    Registration,
    KeyFetch,
    KeyDecode,
    Subscribe,
}

impl std::fmt::Display for HandshakeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandshakeStage::Registration => write!(f, "worker registration"),
            HandshakeStage::KeyFetch => write!(f, "key fetch"),
            HandshakeStage::KeyDecode => write!(f, "key decode"),
            HandshakeStage::Subscribe => write!(f, "subscribe"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HandshakeOutcome {
    Subscribed(PushSubscription),
    /// The runtime lacks service worker or push support.
    Unsupported,
    Declined(Permission),
    Failed { stage: HandshakeStage, reason: String },
}

/// Runs the push subscription handshake at most once per instance.
pub struct SubscriptionCoordinator<R, A> {
    runtime: Arc<R>,
    api: Arc<A>,
    worker: WorkerConfig,
    outcome: OnceCell<HandshakeOutcome>,
}

impl<R: PushRuntime, A: ServerApi> SubscriptionCoordinator<R, A> {
    pub fn new(runtime: Arc<R>, api: Arc<A>, worker: WorkerConfig) -> Self {
        Self {
            runtime,
            api,
            worker,
            outcome: OnceCell::new(),
        }
    }

    /// Callers arriving while the first handshake is in flight wait for it;
    /// later callers get its stored outcome.
    pub async fn ensure_subscribed(&self) -> HandshakeOutcome {
        self.outcome
            .get_or_init(|| self.run_handshake())
            .await
            .clone()
    }

    pub fn outcome(&self) -> Option<&HandshakeOutcome> {
        self.outcome.get()
    }

    async fn run_handshake(&self) -> HandshakeOutcome {
        let capabilities = self.runtime.capabilities();
        if !capabilities.is_supported() {
            log::warn!(
                "Push notifications are not supported (service worker: {}, push: {})",
                capabilities.service_worker,
                capabilities.push_manager
            );
            return HandshakeOutcome::Unsupported;
        }

        let registration = match self
            .runtime
            .register_worker(&self.worker.script_path, &self.worker.scope)
            .await
        {
            Ok(registration) => registration,
            Err(e) => return failed(HandshakeStage::Registration, e),
        };
        log::info!(
            "Service worker registered: {} (scope {})",
            registration.script_url,
            registration.scope
        );

        let permission = self.runtime.request_permission().await;
        if permission != Permission::Granted {
            log::info!("Notification permission not granted: {}", permission);
            return HandshakeOutcome::Declined(permission);
        }

        let key_text = match self.api.fetch_vapid_public_key().await {
            Ok(text) => text,
            Err(e) => return failed(HandshakeStage::KeyFetch, e),
        };
        let key = match vapid::url_base64_to_bytes(&key_text) {
            Ok(key) => key,
            Err(e) => return failed(HandshakeStage::KeyDecode, e),
        };
        log::debug!("Decoded VAPID public key ({} bytes): {}", key.len(), hex::encode(&key));

        let subscription = match self
            .runtime
            .subscribe(&registration, SubscribeOptions::user_visible(key))
            .await
        {
            Ok(subscription) => subscription,
            Err(e) => return failed(HandshakeStage::Subscribe, e),
        };

        // The push service already holds the subscription; an upload failure
        // leaves the server to reconcile later.
        match self.api.upload_subscription(&subscription).await {
            Ok(status) if (200..300).contains(&status) => {
                log::info!("Push subscription registered: {}", subscription.endpoint);
            }
            Ok(status) => {
                log::warn!("Subscription upload answered with status {}", status);
            }
            Err(e) => {
                log::error!("Subscription upload failed: {}", e);
            }
        }

        HandshakeOutcome::Subscribed(subscription)
    }
}

fn failed(stage: HandshakeStage, error: PushError) -> HandshakeOutcome {
    log::error!("Push handshake aborted during {}: {}", stage, error);
    HandshakeOutcome::Failed {
        stage,
        reason: error.to_string(),
    }
}
