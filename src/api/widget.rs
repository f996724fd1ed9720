use crate::api::metrics;
use crate::components::WidgetHost;
use crate::middleware::auth_state;
use crate::models::{AuthState, CopyLinkResponse, UserInfoView};
use crate::services::{ExistenceOutcome, PersistResult};
use crate::utils::AppError;
use actix_web::{web, HttpRequest, HttpResponse};

fn unauthorized() -> HttpResponse {
    metrics::increment_error_count();
    let err = AppError::Unauthorized("Missing or invalid authorization token".to_string());
    HttpResponse::Unauthorized().json(serde_json::json!({
        "success": false,
        "error": err.to_string()
    }))
}

fn identified(req: &HttpRequest) -> Option<(AuthState, String)> {
    let auth = auth_state(req);
    let user_id = auth.user_id()?.to_string();
    Some((auth, user_id))
}

/// GET /api/v1/widget?referralCode=Happy321
/// Mounts the caller's widget on first sight, then renders it.
/// Anonymous callers get `null`.
#[utoipa::path(
    get,
    path = "/api/v1/widget",
    tag = "Widget",
    params(
        ("referralCode" = Option<String>, Query, description = "Inbound referral code used when registering")
    ),
    responses(
        (status = 200, description = "Rendered widget, or null when not signed in", body = UserInfoView)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_widget(req: HttpRequest, host: web::Data<WidgetHost>) -> HttpResponse {
    metrics::increment_request_count();

    let (auth, user_id) = match identified(&req) {
        Some(found) => found,
        None => return HttpResponse::Ok().json(Option::<UserInfoView>::None),
    };

    let page_url = req.full_url().to_string();
    log::info!("🧩 GET /widget for {}", user_id);

    let widget = host.mount(&user_id);
    let mut widget = widget.lock().await;

    match widget.on_auth_changed(&auth, &page_url).await {
        Some(report) => {
            if let ExistenceOutcome::Registered { used_code, .. } = &report.existence {
                log::info!("✅ Registered {} (referral code used: '{}')", report.user_id, used_code);
            }
            metrics::record_reconciliation(&report);
        }
        None if widget.is_logged_in() => {
            log::debug!("🧩 Widget for {} already reconciled", user_id);
        }
        None => {}
    }

    HttpResponse::Ok().json(widget.render(&auth))
}

/// POST /api/v1/widget/refresh
/// Mints a replacement referral code. Renders `null` when the caller's
/// widget was never mounted by a GET.
#[utoipa::path(
    post,
    path = "/api/v1/widget/refresh",
    tag = "Widget",
    responses(
        (status = 200, description = "Widget with the new referral code, or null when not mounted", body = UserInfoView),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn refresh_code(req: HttpRequest, host: web::Data<WidgetHost>) -> HttpResponse {
    metrics::increment_request_count();

    let (auth, user_id) = match identified(&req) {
        Some(found) => found,
        None => return unauthorized(),
    };

    log::info!("🔁 POST /widget/refresh for {}", user_id);

    let widget = match host.get(&user_id) {
        Some(widget) => widget,
        None => {
            log::warn!("⚠️ Refresh for {} before the widget was mounted", user_id);
            return HttpResponse::Ok().json(Option::<UserInfoView>::None);
        }
    };
    let mut widget = widget.lock().await;

    let outcome = widget.refresh(&auth).await;
    log::info!(
        "🔁 Referral code for {}: {} -> {}",
        user_id,
        outcome.old_code,
        outcome.adopted_code()
    );
    metrics::record_refresh(matches!(outcome.persisted, PersistResult::Failed(_)));

    HttpResponse::Ok().json(widget.render(&auth))
}

/// POST /api/v1/widget/copy
/// Copies the referral link to the host clipboard. Nothing is copied for a
/// widget that was never mounted.
#[utoipa::path(
    post,
    path = "/api/v1/widget/copy",
    tag = "Widget",
    responses(
        (status = 200, description = "Copy attempted", body = CopyLinkResponse),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn copy_link(req: HttpRequest, host: web::Data<WidgetHost>) -> HttpResponse {
    metrics::increment_request_count();

    let (_, user_id) = match identified(&req) {
        Some(found) => found,
        None => return unauthorized(),
    };

    let widget = match host.get(&user_id) {
        Some(widget) => widget,
        None => {
            log::warn!("⚠️ Copy for {} before the widget was mounted", user_id);
            return HttpResponse::Ok().json(CopyLinkResponse {
                copied: false,
                referral_link: String::new(),
            });
        }
    };
    let widget = widget.lock().await;

    let copied = widget.copy_link().await.is_ok();
    metrics::record_clipboard_write(copied);

    HttpResponse::Ok().json(CopyLinkResponse {
        copied,
        referral_link: widget.referral_link().to_string(),
    })
}

/// DELETE /api/v1/widget
/// Unmounts the caller's widget; the next GET reconciles again
#[utoipa::path(
    delete,
    path = "/api/v1/widget",
    tag = "Widget",
    responses(
        (status = 200, description = "Widget unmounted"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unmount_widget(req: HttpRequest, host: web::Data<WidgetHost>) -> HttpResponse {
    metrics::increment_request_count();

    let (_, user_id) = match identified(&req) {
        Some(found) => found,
        None => return unauthorized(),
    };

    let unmounted = host.unmount(&user_id);
    log::info!("🧩 DELETE /widget for {} (was mounted: {})", user_id, unmounted);

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "unmounted": unmounted
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/widget")
            .route("", web::get().to(get_widget))
            .route("", web::delete().to(unmount_widget))
            .route("/refresh", web::post().to(refresh_code))
            .route("/copy", web::post().to(copy_link)),
    );
}
