use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 待兑现奖品 (按身份键存储, 过期后视为空)
/// identity_key 形如 "user:42" / "session:9f0c..."
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wheel_pending_redemptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub identity_key: String,
    pub discount_percentage: i32,
    pub free_shipping: bool,
    pub gift_name: Option<String>,
    pub gift_description: Option<String>,
    /// 当日已转动标记 (无需查询记录表即可拒绝)
    pub last_spin_day: Option<NaiveDate>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
