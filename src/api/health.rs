use crate::components::WidgetHost;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub mounted_widgets: usize,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(host: web::Data<WidgetHost>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "referral-widget".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mounted_widgets: host.mounted(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
