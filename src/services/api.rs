use async_trait::async_trait;
use reqwest::Client;

use crate::config::ServerConfig;
use crate::error::{PushError, Result};
use crate::models::subscription::PushSubscription;

/// The application server's key-issuance and subscription-storage endpoints.
#[async_trait]
pub trait ServerApi: Send + Sync {
    /// Returns the VAPID public key exactly as the server sent it.
    async fn fetch_vapid_public_key(&self) -> Result<String>;

    /// Returns the response status; a non-2xx status is not an error.
    async fn upload_subscription(&self, subscription: &PushSubscription) -> Result<u16>;
}

#[derive(Clone)]
pub struct HttpServerApi {
    client: Client,
    config: ServerConfig,
}

impl HttpServerApi {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ServerApi for HttpServerApi {
    async fn fetch_vapid_public_key(&self) -> Result<String> {
        let url = self.config.vapid_key_url()?;

        log::info!("Fetching VAPID public key from {}", url);

        let response = self.client
            .get(url)
            .header("Accept", "text/plain")
            .send()
            .await
            .map_err(|e| PushError::KeyFetch(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PushError::KeyFetch(e.to_string()))?;

        if !status.is_success() {
            return Err(PushError::KeyFetch(format!("server answered {}: {}", status, body)));
        }

        Ok(body)
    }

    async fn upload_subscription(&self, subscription: &PushSubscription) -> Result<u16> {
        let url = self.config.subscribe_url()?;

        log::info!("Uploading subscription for {} to {}", subscription.endpoint, url);

        let response = self.client
            .post(url)
            .header("Content-Type", "application/json")
            .json(subscription)
            .send()
            .await
            .map_err(|e| PushError::Upload(e.to_string()))?;

        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::collections::BTreeMap;
    use url::Url;

    fn create_test_config(base_url: &str) -> ServerConfig {
        ServerConfig {
            base_url: Url::parse(base_url).unwrap(),
            vapid_key_path: "/api/vapid-public-key".to_string(),
            subscribe_path: "/api/subscribe".to_string(),
        }
    }

    fn test_subscription() -> PushSubscription {
        let mut keys = BTreeMap::new();
        keys.insert("p256dh".to_string(), "BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM".to_string());
        keys.insert("auth".to_string(), "tBHItJI5svbpez7KI4CCXg".to_string());
        PushSubscription {
            endpoint: "https://push.example/abc".to_string(),
            expiration_time: None,
            keys,
        }
    }

    #[tokio::test]
    async fn test_fetch_vapid_public_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/vapid-public-key")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("BEl62iUYgUivxIkv")
            .create_async()
            .await;

        let api = HttpServerApi::new(create_test_config(&server.url()));
        let key = api.fetch_vapid_public_key().await.unwrap();

        assert_eq!(key, "BEl62iUYgUivxIkv");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_vapid_public_key_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/vapid-public-key")
            .with_status(500)
            .with_body("VAPID keys not configured")
            .create_async()
            .await;

        let api = HttpServerApi::new(create_test_config(&server.url()));
        let err = api.fetch_vapid_public_key().await.unwrap_err();

        assert!(matches!(err, PushError::KeyFetch(_)));
    }

    #[tokio::test]
    async fn test_upload_posts_subscription_json() {
        let subscription = test_subscription();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/subscribe")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "endpoint": "https://push.example/abc",
                "expirationTime": null,
                "keys": {
                    "p256dh": subscription.keys["p256dh"],
                    "auth": subscription.keys["auth"],
                }
            })))
            .with_status(201)
            .create_async()
            .await;

        let api = HttpServerApi::new(create_test_config(&server.url()));
        let status = api.upload_subscription(&subscription).await.unwrap();

        assert_eq!(status, 201);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_non_success_status_is_returned() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/subscribe")
            .with_status(503)
            .create_async()
            .await;

        let api = HttpServerApi::new(create_test_config(&server.url()));
        let status = api.upload_subscription(&test_subscription()).await.unwrap();

        assert_eq!(status, 503);
    }

    #[tokio::test]
    async fn test_upload_unreachable_server() {
        // Port 9 (discard) is not expected to accept connections.
        let api = HttpServerApi::new(create_test_config("http://127.0.0.1:9"));
        let err = api.upload_subscription(&test_subscription()).await.unwrap_err();

        assert!(matches!(err, PushError::Upload(_)));
    }
}
