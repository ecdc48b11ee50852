#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use wheel_backend::config::WheelConfig;
use wheel_backend::database::run_migrations;
use wheel_backend::entities::{PrizeKind, prize_entity as prizes};
use wheel_backend::models::UpsertPrizeRequest;
use wheel_backend::services::{
    OverrideService, PrizeCatalogService, RedemptionService, WheelService,
};

/// 单连接内存 SQLite (多连接会各自拥有独立的内存库)
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect in-memory sqlite");
    run_migrations(&db).await.expect("run migrations");
    db
}

pub struct Services {
    pub catalog: PrizeCatalogService,
    pub overrides: OverrideService,
    pub redemption: RedemptionService,
    pub wheel: WheelService,
    pub config: WheelConfig,
}

pub fn services(db: &DatabaseConnection) -> Services {
    let config = WheelConfig::default();
    let redemption = RedemptionService::new(db.clone(), config.pending_ttl_hours);
    Services {
        catalog: PrizeCatalogService::new(db.clone()),
        overrides: OverrideService::new(db.clone()),
        wheel: WheelService::new(db.clone(), redemption.clone(), config.clone()),
        redemption,
        config,
    }
}

/// 固定在中午, 避免本地时区换算跨日
pub fn noon(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
}

pub async fn add_prize(
    catalog: &PrizeCatalogService,
    name: &str,
    kind: PrizeKind,
    value: i32,
    weight: i32,
) -> prizes::Model {
    let req = UpsertPrizeRequest {
        name: name.to_string(),
        prize_type: kind,
        value,
        weight,
        color: "#3366FF".to_string(),
        gift_description: if kind == PrizeKind::Gift {
            format!("{name} (in store)")
        } else {
            String::new()
        },
        is_active: true,
        can_win: true,
    };
    catalog.create(&req).await.expect("create prize")
}
