use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{ControlMode, PrizeKind};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::wheel::get_prizes,
        handlers::wheel::get_status,
        handlers::wheel::spin,
        handlers::wheel::get_pending,
        handlers::wheel::consume_redemption,
        handlers::wheel::get_records,
        handlers::admin::list_prizes,
        handlers::admin::create_prize,
        handlers::admin::update_prize,
        handlers::admin::get_override,
        handlers::admin::replace_override,
        handlers::admin::list_spins,
        handlers::admin::get_stats,
    ),
    components(
        schemas(
            PrizeKind,
            ControlMode,
            WheelPrizeResponse,
            WheelStatusResponse,
            PendingGift,
            PendingRedemption,
            SpinResponse,
            SpinFailureResponse,
            SpinRecordQuery,
            SpinRecordResponse,
            SpinRecordPageResponse,
            ConsumeRedemptionRequest,
            UpsertPrizeRequest,
            OverridePolicyRequest,
            OverridePolicyResponse,
            AdminSpinQuery,
            SpinKindBreakdown,
            WheelStatsResponse,
            PaginationParams,
            ApiError,
            ApiErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "wheel", description = "Wheel of fortune API"),
        (name = "admin", description = "Wheel operator API"),
    ),
    info(
        title = "Wheel Backend API",
        version = "1.0.0",
        description = "Wheel of fortune prize engine REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
