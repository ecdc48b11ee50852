use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "snake_case")]
pub enum PrizeKind {
    #[sea_orm(string_value = "discount")]
    Discount,
    #[sea_orm(string_value = "free_shipping")]
    FreeShipping,
    #[sea_orm(string_value = "gift")]
    Gift,
    #[sea_orm(string_value = "no_prize")]
    NoPrize,
}

impl std::fmt::Display for PrizeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrizeKind::Discount => write!(f, "discount"),
            PrizeKind::FreeShipping => write!(f, "free_shipping"),
            PrizeKind::Gift => write!(f, "gift"),
            PrizeKind::NoPrize => write!(f, "no_prize"),
        }
    }
}

/// 轮盘奖品配置 (每条即轮盘上的一个扇区)
/// - value: 折扣百分比, 其它类型为 0
/// - weight: 加权随机的权重, 与 is_active / can_win 相互独立
/// - can_win = false 的奖品可以展示, 但永远不会被随机或序列选中
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wheel_prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub prize_type: PrizeKind,
    pub value: i32,
    pub weight: i32,
    pub color: String,
    pub gift_description: String,
    pub is_active: bool,
    pub can_win: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 可参与自动抽取 (随机 / 序列)
    pub fn is_winnable(&self) -> bool {
        self.is_active && self.can_win && self.weight > 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
