use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use crate::error::{PushError, Result};
use crate::models::common::Permission;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub worker: WorkerConfig,
    pub notifications: NotificationDefaults,
    pub host: HostConfig,
}

/// Where the application server publishes its VAPID key and accepts subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Url,
    pub vapid_key_path: String,
    pub subscribe_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub script_path: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDefaults {
    pub app_name: String,
    pub icon: String,
    pub badge: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    pub port: u16,
    pub public_url: Url,
    pub permission: Permission,
    pub service_worker_supported: bool,
    pub push_supported: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(8090);

        let server_url = var("SERVER_URL")
            .unwrap_or_else(|| "http://localhost:5200".to_string());
        let public_url = var("PUBLIC_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        Ok(Config {
            server: ServerConfig {
                base_url: parse_url("SERVER_URL", &server_url)?,
                vapid_key_path: var("VAPID_KEY_PATH")
                    .unwrap_or_else(|| "/api/vapid-public-key".to_string()),
                subscribe_path: var("SUBSCRIBE_PATH")
                    .unwrap_or_else(|| "/api/subscribe".to_string()),
            },

            worker: WorkerConfig {
                script_path: var("WORKER_SCRIPT")
                    .unwrap_or_else(|| "/static/js/sw.js".to_string()),
                scope: var("WORKER_SCOPE").unwrap_or_else(|| "/".to_string()),
            },

            notifications: NotificationDefaults {
                app_name: var("APP_NAME").unwrap_or_else(|| "UniPlanBJ".to_string()),
                icon: var("DEFAULT_ICON")
                    .unwrap_or_else(|| "/static/images/logo.png".to_string()),
                badge: var("DEFAULT_BADGE")
                    .unwrap_or_else(|| "/static/images/badge.png".to_string()),
            },

            host: HostConfig {
                port,
                public_url: parse_url("PUBLIC_URL", &public_url)?,
                permission: var("PERMISSION")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(Permission::Granted),
                service_worker_supported: var("SERVICE_WORKER_SUPPORTED")
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or(true),
                push_supported: var("PUSH_SUPPORTED")
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or(true),
            },
        })
    }
}

impl ServerConfig {
    pub fn vapid_key_url(&self) -> Result<Url> {
        Ok(self.base_url.join(&self.vapid_key_path)?)
    }

    pub fn subscribe_url(&self) -> Result<Url> {
        Ok(self.base_url.join(&self.subscribe_path)?)
    }
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            app_name: "UniPlanBJ".to_string(),
            icon: "/static/images/logo.png".to_string(),
            badge: "/static/images/badge.png".to_string(),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            script_path: "/static/js/sw.js".to_string(),
            scope: "/".to_string(),
        }
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| PushError::Config(format!("{} is not a valid URL ({}): {}", name, value, e)))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}
