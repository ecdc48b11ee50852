use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{
    ControlMode, PrizeKind, override_policy_entity as policy_entity,
    pending_redemption_entity as pending_entity, prize_entity, spin_entity,
};
use crate::wheel::{Lang, messages};

/// 轮盘扇区 (奖品) 展示信息
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WheelPrizeResponse {
    pub id: i64,
    pub name: String,
    pub prize_type: PrizeKind,
    /// 折扣百分比, 其它类型为 0
    pub value: i32,
    pub gift_description: String,
    /// 加权随机的权重
    pub weight: i32,
    /// 扇区颜色 (#RRGGBB)
    pub color: String,
    pub is_active: bool,
    pub can_win: bool,
    /// 扇区文字 (按请求语言)
    pub display_text: String,
}

impl WheelPrizeResponse {
    pub fn localized(m: prize_entity::Model, lang: Lang) -> Self {
        let display_text = messages::display_text(lang, &m);
        WheelPrizeResponse {
            id: m.id,
            name: m.name,
            prize_type: m.prize_type,
            value: m.value,
            gift_description: m.gift_description,
            weight: m.weight,
            color: m.color,
            is_active: m.is_active,
            can_win: m.can_win,
            display_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PendingGift {
    pub name: String,
    pub description: String,
}

/// 待兑现奖品 (下单时使用)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PendingRedemption {
    pub discount_percentage: i32,
    pub free_shipping: bool,
    pub gift: Option<PendingGift>,
}

impl PendingRedemption {
    pub fn is_empty(&self) -> bool {
        self.discount_percentage == 0 && !self.free_shipping && self.gift.is_none()
    }
}

impl From<pending_entity::Model> for PendingRedemption {
    fn from(m: pending_entity::Model) -> Self {
        PendingRedemption {
            discount_percentage: m.discount_percentage,
            free_shipping: m.free_shipping,
            gift: m.gift_name.map(|name| PendingGift {
                name,
                description: m.gift_description.unwrap_or_default(),
            }),
        }
    }
}

/// 轮盘状态 (页面用来决定是否允许转动)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WheelStatusResponse {
    pub can_spin_today: bool,
    pub pending: PendingRedemption,
}

/// 转动成功的响应 (字段平铺, 前端直接使用)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinResponse {
    pub success: bool,
    /// 中奖扇区在展示列表中的下标; 为空时指针停在扇区分界线
    pub target_index: Option<usize>,
    /// 最终绝对旋转角度 (弧度, 顺时针为正)
    pub target_rotation_radians: f64,
    pub segment_text: String,
    pub prize_type: PrizeKind,
    pub prize_name: String,
    pub discount_percentage: i32,
    pub gift_description: String,
    pub message: String,
}

/// 转动失败 (业务拒绝或内部错误)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinFailureResponse {
    pub success: bool,
    pub message: String,
}

impl SpinFailureResponse {
    pub fn new(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// 抽奖记录查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SpinRecordQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
}

/// 管理端抽奖记录查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AdminSpinQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// 是否已兑现
    pub used: Option<bool>,
    /// 转动日期 (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinRecordResponse {
    pub id: i64,
    /// 用户ID (匿名转动为空)
    pub user_id: Option<i64>,
    pub prize_id: Option<i64>,
    pub prize_type: PrizeKind,
    /// 奖品名称 (历史快照)
    pub prize_name: String,
    pub prize_value: i32,
    pub gift_description: String,
    pub spin_day: NaiveDate,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<spin_entity::Model> for SpinRecordResponse {
    fn from(m: spin_entity::Model) -> Self {
        SpinRecordResponse {
            id: m.id,
            user_id: m.user_id,
            prize_id: m.prize_id,
            prize_type: m.prize_type,
            prize_name: m.prize_name,
            prize_value: m.prize_value,
            gift_description: m.gift_description,
            spin_day: m.spin_day,
            is_used: m.is_used,
            used_at: m.used_at,
            created_at: m.created_at,
        }
    }
}

/// 下单完成后消耗待兑现奖品
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ConsumeRedemptionRequest {
    /// 订单号 (仅用于日志)
    pub order_reference: Option<String>,
}

/// 创建 / 更新奖品
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpsertPrizeRequest {
    pub name: String,
    pub prize_type: PrizeKind,
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub weight: i32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub gift_description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub can_win: bool,
}

fn default_color() -> String {
    "#FF0000".to_string()
}

fn default_true() -> bool {
    true
}

/// 替换运营干预策略
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct OverridePolicyRequest {
    #[serde(default = "default_policy_name")]
    pub name: String,
    pub mode: ControlMode,
    pub forced_prize_id: Option<i64>,
    #[serde(default)]
    pub sequence_prize_ids: Vec<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_policy_name() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverridePolicyResponse {
    pub name: String,
    pub mode: ControlMode,
    pub forced_prize_id: Option<i64>,
    pub sequence_prize_ids: Vec<i64>,
    pub current_sequence_index: i32,
    pub is_active: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<policy_entity::Model> for OverridePolicyResponse {
    fn from(m: policy_entity::Model) -> Self {
        let sequence_prize_ids = m.sequence();
        OverridePolicyResponse {
            name: m.name,
            mode: m.control_mode,
            forced_prize_id: m.forced_prize_id,
            sequence_prize_ids,
            current_sequence_index: m.current_sequence_index,
            is_active: m.is_active,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SpinKindBreakdown {
    pub discount: u64,
    pub free_shipping: u64,
    pub gift: u64,
    pub no_prize: u64,
}

/// 管理端统计
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WheelStatsResponse {
    pub total_spins: u64,
    pub spins_today: u64,
    pub redeemed_spins: u64,
    pub by_kind: SpinKindBreakdown,
}
