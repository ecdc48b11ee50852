mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use common::{add_prize, services, setup_db};
use serde_json::{Value, json};
use wheel_backend::entities::PrizeKind;
use wheel_backend::handlers;
use wheel_backend::middlewares::IdentityMiddleware;
use wheel_backend::utils::JwtService;
use wheel_backend::wheel::{Lang, messages};

const SECRET: &str = "wheel-test-secret";

macro_rules! wheel_app {
    ($svc:expr) => {
        test::init_service(
            App::new()
                .wrap(IdentityMiddleware::new(
                    JwtService::new(SECRET, 3600),
                    &$svc.config.session_cookie_name,
                ))
                .app_data(web::Data::new($svc.config.clone()))
                .app_data(web::Data::new($svc.catalog.clone()))
                .app_data(web::Data::new($svc.overrides.clone()))
                .app_data(web::Data::new($svc.redemption.clone()))
                .app_data(web::Data::new($svc.wheel.clone()))
                .service(
                    web::scope("/api/v1")
                        .configure(handlers::wheel_config)
                        .configure(handlers::admin_config),
                ),
        )
        .await
    };
}

fn bearer(user_id: i64, is_admin: bool) -> (&'static str, String) {
    let token = JwtService::new(SECRET, 3600)
        .generate_access_token(user_id, is_admin)
        .unwrap();
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_anonymous_spin_mints_session_cookie() {
    let db = setup_db().await;
    let svc = services(&db);
    add_prize(&svc.catalog, "20% off", PrizeKind::Discount, 20, 10).await;
    let app = wheel_app!(svc);

    let req = test::TestRequest::post()
        .uri("/api/v1/wheel/spin")
        .insert_header(("Accept-Language", "en"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session_key = resp
        .response()
        .cookies()
        .find(|c| c.name() == "wheel_session")
        .map(|c| c.value().to_string())
        .expect("session cookie");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["target_index"], 0);
    assert_eq!(body["discount_percentage"], 20);
    assert_eq!(body["message"], "Congratulations! You won 20% off!");

    // 同一会话当天再次转动
    let req = test::TestRequest::post()
        .uri("/api/v1/wheel/spin")
        .insert_header(("Accept-Language", "en"))
        .cookie(Cookie::new("wheel_session", session_key.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().next().is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], messages::already_spun_today(Lang::En));

    let req = test::TestRequest::get()
        .uri("/api/v1/wheel/status")
        .cookie(Cookie::new("wheel_session", session_key))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["can_spin_today"], false);
    assert_eq!(body["data"]["pending"]["discount_percentage"], 20);
}

#[actix_web::test]
async fn test_empty_wheel_returns_localized_failure() {
    let db = setup_db().await;
    let svc = services(&db);
    let app = wheel_app!(svc);

    let req = test::TestRequest::post()
        .uri("/api/v1/wheel/spin")
        .insert_header(("Accept-Language", "he-IL,he;q=0.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().next().is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], messages::no_prizes_available(Lang::He));
}

#[actix_web::test]
async fn test_user_consumes_pending_prize() {
    let db = setup_db().await;
    let svc = services(&db);
    add_prize(&svc.catalog, "Free shipping", PrizeKind::FreeShipping, 0, 10).await;
    let app = wheel_app!(svc);

    let req = test::TestRequest::post()
        .uri("/api/v1/wheel/spin")
        .insert_header(bearer(5, false))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    // 登录用户不需要会话 Cookie
    assert!(resp.response().cookies().next().is_none());

    let req = test::TestRequest::post()
        .uri("/api/v1/wheel/redemption/consume")
        .insert_header(bearer(5, false))
        .set_json(json!({ "order_reference": "ORD-1001" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["free_shipping"], true);

    let req = test::TestRequest::get()
        .uri("/api/v1/wheel/pending")
        .insert_header(bearer(5, false))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["free_shipping"], false);

    let req = test::TestRequest::get()
        .uri("/api/v1/wheel/records")
        .insert_header(bearer(5, false))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["is_used"], true);
}

#[actix_web::test]
async fn test_invalid_token_is_rejected() {
    let db = setup_db().await;
    let svc = services(&db);
    let app = wheel_app!(svc);

    let req = test::TestRequest::get()
        .uri("/api/v1/wheel/status")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("request rejected");
    assert_eq!(
        err.error_response().status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_admin_routes_require_admin_token() {
    let db = setup_db().await;
    let svc = services(&db);
    let app = wheel_app!(svc);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/wheel/stats")
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("anonymous rejected");
    assert_eq!(
        err.error_response().status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/wheel/stats")
        .insert_header(bearer(8, false))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("customer rejected");
    assert_eq!(err.error_response().status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/wheel/stats")
        .insert_header(bearer(1, true))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total_spins"], 0);
}

#[actix_web::test]
async fn test_admin_manages_catalog_and_override() {
    let db = setup_db().await;
    let svc = services(&db);
    let app = wheel_app!(svc);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/wheel/prizes")
        .insert_header(bearer(1, true))
        .set_json(json!({
            "name": "Scented candle",
            "prize_type": "gift",
            "weight": 10,
            "gift_description": "Pick up at the counter"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    let prize_id = body["data"]["id"].as_i64().expect("prize id");
    assert_eq!(body["data"]["color"], "#FF0000");

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/wheel/prizes")
        .insert_header(bearer(1, true))
        .set_json(json!({ "name": "Broken", "prize_type": "discount", "value": 150 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/v1/admin/wheel/override")
        .insert_header(bearer(1, true))
        .set_json(json!({ "mode": "force_prize", "forced_prize_id": prize_id }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["mode"], "force_prize");
    assert_eq!(body["data"]["current_sequence_index"], 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/wheel/prizes")
        .insert_header(("Accept-Language", "en"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["display_text"], "Scented candle");

    let req = test::TestRequest::post()
        .uri("/api/v1/wheel/spin")
        .insert_header(("Accept-Language", "en"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["prize_type"], "gift");
    assert_eq!(body["gift_description"], "Pick up at the counter");

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/wheel/spins?used=false")
        .insert_header(bearer(1, true))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);
}
