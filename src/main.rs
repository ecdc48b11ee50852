use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use wheel_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{IdentityMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);
    let wheel_config = config.wheel.clone();

    // 创建服务
    let prize_catalog_service = PrizeCatalogService::new(pool.clone());
    let override_service = OverrideService::new(pool.clone());
    let redemption_service = RedemptionService::new(pool.clone(), wheel_config.pending_ttl_hours);
    let wheel_service = WheelService::new(
        pool.clone(),
        redemption_service.clone(),
        wheel_config.clone(),
    );

    // 启动后台任务
    tasks::spawn_all(redemption_service.clone(), wheel_config.purge_interval_secs);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::new(
                jwt_service.clone(),
                &wheel_config.session_cookie_name,
            ))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(wheel_config.clone()))
            .app_data(web::Data::new(prize_catalog_service.clone()))
            .app_data(web::Data::new(override_service.clone()))
            .app_data(web::Data::new(redemption_service.clone()))
            .app_data(web::Data::new(wheel_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::wheel_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
