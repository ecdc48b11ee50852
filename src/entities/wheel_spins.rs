use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::PrizeKind;

/// 抽奖记录
/// - user_id / session_key 有且仅有一个非空
/// - prize_* 为抽中时的快照; prize_id 为空表示未配置 no_prize 时的兜底结果
/// - spin_day 为服务器本地日期, 与身份组成唯一索引
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wheel_spins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub session_key: Option<String>,
    pub prize_id: Option<i64>,
    pub prize_type: PrizeKind,
    pub prize_name: String,
    pub prize_value: i32,
    pub gift_description: String,
    pub spin_day: NaiveDate,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
