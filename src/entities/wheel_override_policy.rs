use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 单例配置行的主键
pub const SINGLETON_ID: i64 = 1;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    #[sea_orm(string_value = "random")]
    Random,
    #[sea_orm(string_value = "force_prize")]
    ForcePrize,
    #[sea_orm(string_value = "force_no_prize")]
    ForceNoPrize,
    #[sea_orm(string_value = "sequence")]
    Sequence,
}

/// 运营干预策略, 全表至多一行 (id = SINGLETON_ID)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wheel_override_policy")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub name: String,
    pub control_mode: ControlMode,
    pub forced_prize_id: Option<i64>,
    /// JSON 数组文本
    #[sea_orm(column_type = "Text")]
    pub sequence_prize_ids: String,
    pub current_sequence_index: i32,
    pub is_active: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn sequence(&self) -> Vec<i64> {
        match serde_json::from_str::<Vec<i64>>(&self.sequence_prize_ids) {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!(
                    "Malformed wheel override sequence {:?}: {e}",
                    self.sequence_prize_ids
                );
                Vec::new()
            }
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
