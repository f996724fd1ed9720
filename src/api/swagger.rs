use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Referral Widget API",
        version = "1.0.0",
        description = "Hosts the user info widget: profile snippet plus referral code and link.\n\n**Authentication:** JWT Bearer tokens issued by the identity provider. Without one, the widget renders `null`.\n\n**Features:**\n- Automatic registration with the referral backend on first sign-in\n- Referral code lookup, minting and refresh\n- Copy referral link to the host clipboard\n- Health monitoring and metrics"
    ),
    paths(
        // Widget
        crate::api::widget::get_widget,
        crate::api::widget::refresh_code,
        crate::api::widget::copy_link,
        crate::api::widget::unmount_widget,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UserInfoView,
            crate::models::CopyLinkResponse,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Widget", description = "User info widget: render, refresh the referral code, copy the referral link."),
        (name = "Health", description = "Health check and metrics endpoints."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token issued by the identity provider"))
                        .build()
                ),
            );
        }
    }
}
