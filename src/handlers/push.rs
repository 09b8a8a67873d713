use actix_web::{get, post, web, HttpResponse, Result};
use actix_web::web::{Bytes, Data, Path};
use serde_json::json;
use uuid::Uuid;

use crate::error::PushError;
use crate::services::{
    delivery::DeliveryAdapter,
    headless::HeadlessRuntime,
    runtime::NotificationHost,
};

pub type Agent = DeliveryAdapter<HeadlessRuntime>;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(deliver_push)
        .service(list_notifications)
        .service(click_notification)
        .service(close_notification)
        .service(list_navigations)
        .service(health_check);
}

#[post("/push/{subscription_id}")]
pub async fn deliver_push(
    runtime: Data<HeadlessRuntime>,
    agent: Data<Agent>,
    path: Path<Uuid>,
    body: Bytes,
) -> Result<HttpResponse> {
    let subscription_id = path.into_inner();
    if !runtime.has_subscription(&subscription_id) {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": format!("No subscription {}", subscription_id)
        })));
    }

    match agent.on_push(&body).await {
        Ok(notification) => Ok(HttpResponse::Created().json(notification)),
        Err(e @ PushError::MalformedPayload(_)) => Ok(HttpResponse::BadRequest().json(json!({
            "error": e.to_string()
        }))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({
            "error": e.to_string()
        }))),
    }
}

#[get("/notifications")]
pub async fn list_notifications(runtime: Data<HeadlessRuntime>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(runtime.notifications()))
}

#[post("/notifications/{notification_id}/click")]
pub async fn click_notification(
    runtime: Data<HeadlessRuntime>,
    agent: Data<Agent>,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    let notification_id = path.into_inner();
    let notification = match runtime.notification(&notification_id) {
        Some(notification) => notification,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "error": PushError::UnknownNotification(notification_id).to_string()
            })))
        }
    };

    match agent.on_notification_click(&notification).await {
        Ok(navigation) => Ok(HttpResponse::Ok().json(json!({
            "opened": navigation.map(|n| n.url)
        }))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(json!({
            "error": e.to_string()
        }))),
    }
}

/// User dismissal without activation.
#[post("/notifications/{notification_id}/close")]
pub async fn close_notification(
    runtime: Data<HeadlessRuntime>,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    let notification_id = path.into_inner();
    if runtime.close_notification(notification_id) {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Ok(HttpResponse::NotFound().json(json!({
            "error": PushError::UnknownNotification(notification_id).to_string()
        })))
    }
}

#[get("/navigations")]
pub async fn list_navigations(runtime: Data<HeadlessRuntime>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(runtime.navigations()))
}

#[get("/health")]
pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}
