use crate::entities::{PrizeKind, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::{UpsertPrizeRequest, WheelPrizeResponse};
use crate::wheel::Lang;
use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use std::sync::OnceLock;

const MAX_NAME_LEN: usize = 100;

/// 只编译一次; 模式为常量
fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"))
}

/// 奖品目录: 轮盘展示与管理端维护
#[derive(Clone)]
pub struct PrizeCatalogService {
    pool: DatabaseConnection,
}

impl PrizeCatalogService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 全部奖品 (含停用), 按 id 升序
    pub async fn load_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<prizes::Model>, DbErr> {
        prizes::Entity::find()
            .order_by_asc(prizes::Column::Id)
            .all(conn)
            .await
    }

    /// 轮盘上展示的扇区: 所有启用奖品, 按 id 升序
    pub async fn load_displayed<C: ConnectionTrait>(
        conn: &C,
    ) -> Result<Vec<prizes::Model>, DbErr> {
        prizes::Entity::find()
            .filter(prizes::Column::IsActive.eq(true))
            .order_by_asc(prizes::Column::Id)
            .all(conn)
            .await
    }

    pub async fn list_displayed(&self, lang: Lang) -> AppResult<Vec<WheelPrizeResponse>> {
        let list = Self::load_displayed(&self.pool).await?;
        Ok(list
            .into_iter()
            .map(|m| WheelPrizeResponse::localized(m, lang))
            .collect())
    }

    pub async fn list_all(&self, lang: Lang) -> AppResult<Vec<WheelPrizeResponse>> {
        let list = Self::load_all(&self.pool).await?;
        Ok(list
            .into_iter()
            .map(|m| WheelPrizeResponse::localized(m, lang))
            .collect())
    }

    pub async fn create(&self, req: &UpsertPrizeRequest) -> AppResult<prizes::Model> {
        validate_prize(req)?;
        let now = Utc::now();
        let model = prizes::ActiveModel {
            name: Set(req.name.trim().to_string()),
            prize_type: Set(req.prize_type),
            value: Set(normalized_value(req)),
            weight: Set(req.weight),
            color: Set(req.color.clone()),
            gift_description: Set(req.gift_description.trim().to_string()),
            is_active: Set(req.is_active),
            can_win: Set(req.can_win),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Wheel prize created: id={} type={} weight={}",
            model.id,
            model.prize_type,
            model.weight
        );
        Ok(model)
    }

    pub async fn update(&self, id: i64, req: &UpsertPrizeRequest) -> AppResult<prizes::Model> {
        validate_prize(req)?;
        let existing = prizes::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Prize {id} not found")))?;

        let mut am = existing.into_active_model();
        am.name = Set(req.name.trim().to_string());
        am.prize_type = Set(req.prize_type);
        am.value = Set(normalized_value(req));
        am.weight = Set(req.weight);
        am.color = Set(req.color.clone());
        am.gift_description = Set(req.gift_description.trim().to_string());
        am.is_active = Set(req.is_active);
        am.can_win = Set(req.can_win);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        log::info!("Wheel prize updated: id={}", updated.id);
        Ok(updated)
    }
}

/// 非折扣类奖品的 value 固定为 0
fn normalized_value(req: &UpsertPrizeRequest) -> i32 {
    if req.prize_type == PrizeKind::Discount {
        req.value
    } else {
        0
    }
}

pub fn validate_prize(req: &UpsertPrizeRequest) -> AppResult<()> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError("Prize name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::ValidationError(format!(
            "Prize name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if !(0..=100).contains(&req.weight) {
        return Err(AppError::ValidationError(
            "Weight must be between 0 and 100".into(),
        ));
    }
    if !color_pattern().is_match(&req.color) {
        return Err(AppError::ValidationError(
            "Color must be in #RRGGBB format".into(),
        ));
    }
    match req.prize_type {
        PrizeKind::Discount if !(1..=100).contains(&req.value) => Err(AppError::ValidationError(
            "Discount percentage must be between 1 and 100".into(),
        )),
        PrizeKind::Gift if req.gift_description.trim().is_empty() => Err(
            AppError::ValidationError("Gift prizes require a description".into()),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: PrizeKind) -> UpsertPrizeRequest {
        UpsertPrizeRequest {
            name: "10% off".to_string(),
            prize_type: kind,
            value: 10,
            weight: 20,
            color: "#00AA33".to_string(),
            gift_description: String::new(),
            is_active: true,
            can_win: true,
        }
    }

    #[test]
    fn test_valid_discount() {
        assert!(validate_prize(&request(PrizeKind::Discount)).is_ok());
    }

    #[test]
    fn test_discount_out_of_range() {
        let mut req = request(PrizeKind::Discount);
        req.value = 0;
        assert!(validate_prize(&req).is_err());
        req.value = 101;
        assert!(validate_prize(&req).is_err());
    }

    #[test]
    fn test_gift_requires_description() {
        let mut req = request(PrizeKind::Gift);
        assert!(validate_prize(&req).is_err());
        req.gift_description = "Leather wallet".to_string();
        assert!(validate_prize(&req).is_ok());
    }

    #[test]
    fn test_rejects_bad_color_and_weight() {
        let mut req = request(PrizeKind::FreeShipping);
        req.color = "red".to_string();
        assert!(validate_prize(&req).is_err());

        let mut req = request(PrizeKind::FreeShipping);
        req.weight = -1;
        assert!(validate_prize(&req).is_err());
    }

    #[test]
    fn test_non_discount_value_is_zeroed() {
        let req = request(PrizeKind::FreeShipping);
        assert_eq!(normalized_value(&req), 0);
        assert_eq!(normalized_value(&request(PrizeKind::Discount)), 10);
    }
}
