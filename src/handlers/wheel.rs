use crate::config::WheelConfig;
use crate::error::AppError;
use crate::middlewares::current_caller;
use crate::models::*;
use crate::services::{PrizeCatalogService, RedemptionService, WheelService};
use crate::wheel::{Identity, Lang, messages};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use chrono::Utc;
use serde_json::json;

/// 请求语言: Accept-Language 中第一个支持的语言, 否则使用配置的默认语言
fn request_lang(req: &HttpRequest, config: &WheelConfig) -> Lang {
    let header = req
        .headers()
        .get("Accept-Language")
        .and_then(|v| v.to_str().ok());
    Lang::negotiate(header, config.fallback_lang())
}

fn session_cookie(name: &str, key: &str) -> Cookie<'static> {
    Cookie::build(name.to_string(), key.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .permanent()
        .finish()
}

#[utoipa::path(
    get,
    path = "/wheel/prizes",
    tag = "wheel",
    responses(
        (status = 200, description = "轮盘扇区列表 (按 id 升序)", body = [WheelPrizeResponse])
    )
)]
/// 获取轮盘上展示的全部启用奖品
pub async fn get_prizes(
    service: web::Data<PrizeCatalogService>,
    config: web::Data<WheelConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let lang = request_lang(&req, &config);
    match service.list_displayed(lang).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/wheel/status",
    tag = "wheel",
    responses(
        (status = 200, description = "今日是否可转动及待兑现奖品", body = WheelStatusResponse)
    )
)]
/// 今日是否还能转动; 匿名访客首次访问时总是可以
pub async fn get_status(service: web::Data<WheelService>, req: HttpRequest) -> Result<HttpResponse> {
    let caller = current_caller(&req);
    match service.status(caller.identity.as_ref(), Utc::now()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wheel/spin",
    tag = "wheel",
    responses(
        (status = 200, description = "转动成功, 或业务拒绝 (success=false)", body = SpinResponse),
        (status = 500, description = "内部错误", body = SpinFailureResponse)
    )
)]
/// 转动轮盘:
/// 1. 确定身份 (无身份时创建匿名会话并通过 Cookie 返回)
/// 2. 资格检查 + 选奖 + 写记录 (单事务)
/// 3. 计算目标扇区与旋转角度
pub async fn spin(
    service: web::Data<WheelService>,
    config: web::Data<WheelConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let lang = request_lang(&req, &config);
    let caller = current_caller(&req);
    let (identity, minted) = match caller.identity {
        Some(identity) => (identity, false),
        None => (Identity::new_session(), true),
    };

    match service.spin_wheel(&identity, lang, Utc::now()).await {
        Ok(result) => {
            let mut builder = HttpResponse::Ok();
            if minted && let Identity::Session(key) = &identity {
                builder.cookie(session_cookie(&config.session_cookie_name, key));
            }
            Ok(builder.json(result))
        }
        Err(e) if e.is_soft_failure() => {
            let message = match e {
                AppError::AlreadySpunToday => messages::already_spun_today(lang),
                _ => messages::no_prizes_available(lang),
            };
            Ok(HttpResponse::Ok().json(SpinFailureResponse::new(message)))
        }
        Err(e) => {
            log::error!("Wheel spin failed for {identity}: {e}");
            Ok(HttpResponse::InternalServerError()
                .json(SpinFailureResponse::new(messages::spin_failed(lang))))
        }
    }
}

#[utoipa::path(
    get,
    path = "/wheel/pending",
    tag = "wheel",
    responses(
        (status = 200, description = "待兑现奖品", body = PendingRedemption)
    )
)]
/// 当前身份尚未兑现的奖品 (折扣 / 免运费 / 礼品)
pub async fn get_pending(
    service: web::Data<RedemptionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let Some(identity) = current_caller(&req).identity else {
        return Ok(HttpResponse::Ok()
            .json(json!({ "success": true, "data": PendingRedemption::default() })));
    };
    match service.pending(&identity, Utc::now()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wheel/redemption/consume",
    tag = "wheel",
    request_body = ConsumeRedemptionRequest,
    responses(
        (status = 200, description = "已消耗的奖品快照 (重复调用返回空快照)", body = PendingRedemption)
    )
)]
/// 订单完成后消耗待兑现奖品, 并把未使用的抽奖记录标记为已使用
pub async fn consume_redemption(
    service: web::Data<RedemptionService>,
    req: HttpRequest,
    body: web::Json<ConsumeRedemptionRequest>,
) -> Result<HttpResponse> {
    let Some(identity) = current_caller(&req).identity else {
        return Ok(HttpResponse::Ok()
            .json(json!({ "success": true, "data": PendingRedemption::default() })));
    };
    let order_reference = body.into_inner().order_reference.unwrap_or_default();
    match service.consume(&identity, Utc::now()).await {
        Ok(data) => {
            log::info!("Redemption consumed for {identity} (order {order_reference:?})");
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/wheel/records",
    tag = "wheel",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    responses(
        (status = 200, description = "抽奖记录", body = SpinRecordPageResponse)
    )
)]
/// 分页获取当前身份的抽奖记录 (倒序)
pub async fn get_records(
    service: web::Data<WheelService>,
    req: HttpRequest,
    query: web::Query<SpinRecordQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let Some(identity) = current_caller(&req).identity else {
        let params = PaginationParams::new(query.page, query.per_page);
        let empty: SpinRecordPageResponse = PaginatedResponse::new(Vec::new(), &params, 0);
        return Ok(HttpResponse::Ok().json(json!({ "success": true, "data": empty })));
    };
    match service.list_records(&identity, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn wheel_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wheel")
            .route("/prizes", web::get().to(get_prizes))
            .route("/status", web::get().to(get_status))
            .route("/spin", web::post().to(spin))
            .route("/pending", web::get().to(get_pending))
            .route("/redemption/consume", web::post().to(consume_redemption))
            .route("/records", web::get().to(get_records)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_request_lang_negotiation() {
        let config = WheelConfig::default();
        let req = TestRequest::default()
            .insert_header(("Accept-Language", "he-IL,he;q=0.9,en;q=0.8"))
            .to_http_request();
        assert_eq!(request_lang(&req, &config), Lang::He);

        let req = TestRequest::default().to_http_request();
        assert_eq!(request_lang(&req, &config), Lang::Ar);
    }

    #[test]
    fn test_session_cookie_is_http_only() {
        let cookie = session_cookie("wheel_session", "abc123");
        assert_eq!(cookie.name(), "wheel_session");
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
