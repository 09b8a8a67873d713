use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Service worker registration failed: {0}")]
    Registration(String),

    #[error("VAPID public key fetch failed: {0}")]
    KeyFetch(String),

    #[error("VAPID public key decode failed: {0}")]
    KeyDecode(String),

    /// The push service refused to issue a subscription.
    #[error("Push subscription rejected: {0}")]
    Subscribe(String),

    #[error("Subscription upload failed: {0}")]
    Upload(String),

    /// A push event carried data that is not a JSON notification payload.
    #[error("Malformed push payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Notification display failed: {0}")]
    Display(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("No notification with id {0}")]
    UnknownNotification(Uuid),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T, E = PushError> = std::result::Result<T, E>;
