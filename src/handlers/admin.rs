use crate::config::WheelConfig;
use crate::models::*;
use crate::services::{OverrideService, PrizeCatalogService, WheelService};
use crate::wheel::Lang;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use chrono::Utc;
use serde_json::json;

fn admin_lang(req: &HttpRequest, config: &WheelConfig) -> Lang {
    let header = req
        .headers()
        .get("Accept-Language")
        .and_then(|v| v.to_str().ok());
    Lang::negotiate(header, config.fallback_lang())
}

#[utoipa::path(
    get,
    path = "/admin/wheel/prizes",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部奖品 (含停用)", body = [WheelPrizeResponse]),
        (status = 401, description = "未授权"),
        (status = 403, description = "非管理员")
    )
)]
pub async fn list_prizes(
    service: web::Data<PrizeCatalogService>,
    config: web::Data<WheelConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    match service.list_all(admin_lang(&req, &config)).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/wheel/prizes",
    tag = "admin",
    request_body = UpsertPrizeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建奖品成功", body = WheelPrizeResponse),
        (status = 400, description = "参数校验失败"),
        (status = 403, description = "非管理员")
    )
)]
pub async fn create_prize(
    service: web::Data<PrizeCatalogService>,
    config: web::Data<WheelConfig>,
    req: HttpRequest,
    body: web::Json<UpsertPrizeRequest>,
) -> Result<HttpResponse> {
    match service.create(&body).await {
        Ok(model) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": WheelPrizeResponse::localized(model, admin_lang(&req, &config)),
            "message": "Prize created"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/wheel/prizes/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "奖品ID")
    ),
    request_body = UpsertPrizeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新奖品成功", body = WheelPrizeResponse),
        (status = 400, description = "参数校验失败"),
        (status = 404, description = "奖品不存在")
    )
)]
pub async fn update_prize(
    service: web::Data<PrizeCatalogService>,
    config: web::Data<WheelConfig>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpsertPrizeRequest>,
) -> Result<HttpResponse> {
    match service.update(path.into_inner(), &body).await {
        Ok(model) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": WheelPrizeResponse::localized(model, admin_lang(&req, &config)),
            "message": "Prize updated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/wheel/override",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前干预策略 (未配置时为 null)", body = OverridePolicyResponse)
    )
)]
pub async fn get_override(service: web::Data<OverrideService>) -> Result<HttpResponse> {
    match service.get().await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/wheel/override",
    tag = "admin",
    request_body = OverridePolicyRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "干预策略已替换, 序列下标归零", body = OverridePolicyResponse),
        (status = 400, description = "参数校验失败")
    )
)]
pub async fn replace_override(
    service: web::Data<OverrideService>,
    body: web::Json<OverridePolicyRequest>,
) -> Result<HttpResponse> {
    match service.replace(&body).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/wheel/spins",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)"),
        ("used" = Option<bool>, Query, description = "是否已兑现"),
        ("date" = Option<String>, Query, description = "转动日期 (YYYY-MM-DD)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "抽奖记录", body = SpinRecordPageResponse)
    )
)]
pub async fn list_spins(
    service: web::Data<WheelService>,
    query: web::Query<AdminSpinQuery>,
) -> Result<HttpResponse> {
    match service.list_all_records(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/wheel/stats",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "抽奖统计", body = WheelStatsResponse)
    )
)]
pub async fn get_stats(service: web::Data<WheelService>) -> Result<HttpResponse> {
    match service.stats(Utc::now()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/wheel")
            .route("/prizes", web::get().to(list_prizes))
            .route("/prizes", web::post().to(create_prize))
            .route("/prizes/{id}", web::put().to(update_prize))
            .route("/override", web::get().to(get_override))
            .route("/override", web::put().to(replace_override))
            .route("/spins", web::get().to(list_spins))
            .route("/stats", web::get().to(get_stats)),
    );
}
