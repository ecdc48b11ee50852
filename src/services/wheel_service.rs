use crate::config::WheelConfig;
use crate::entities::{PrizeKind, prize_entity as prizes, spin_entity as spins};
use crate::error::{AppError, AppResult};
use crate::models::{
    AdminSpinQuery, PaginatedResponse, PaginationParams, SpinKindBreakdown, SpinRecordPageResponse,
    SpinRecordQuery, SpinRecordResponse, SpinResponse, WheelStatsResponse, WheelStatusResponse,
};
use crate::services::redemption_service::spin_identity;
use crate::services::{OverrideService, PrizeCatalogService, RedemptionService};
use crate::wheel::{Identity, Lang, Outcome, geometry, messages, spin_day, weighted_draw};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

/// 幸运轮盘
///
/// 每个身份 (登录用户或匿名会话) 每个自然日 (服务器本地时间) 只能转动一次。
/// 一次转动在单个事务内完成: 资格复核 → 干预策略 / 加权抽取 → 写记录 → 更新待兑现奖品。
/// (身份, 日期) 上的唯一索引兜底并发重复转动。
#[derive(Clone)]
pub struct WheelService {
    pool: DatabaseConnection,
    redemption_service: RedemptionService,
    config: WheelConfig,
}

impl WheelService {
    pub fn new(
        pool: DatabaseConnection,
        redemption_service: RedemptionService,
        config: WheelConfig,
    ) -> Self {
        Self {
            pool,
            redemption_service,
            config,
        }
    }

    /// 今天是否还能转动。
    ///
    /// 尚未建立身份的匿名访客直接返回 true (不可能存在记录), 不创建任何数据。
    pub async fn can_spin_today(
        &self,
        identity: Option<&Identity>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let Some(identity) = identity else {
            return Ok(true);
        };
        Ok(Self::eligible_in(&self.pool, identity, spin_day(now), now).await?)
    }

    pub async fn status(
        &self,
        identity: Option<&Identity>,
        now: DateTime<Utc>,
    ) -> AppResult<WheelStatusResponse> {
        let can_spin_today = self.can_spin_today(identity, now).await?;
        let pending = match identity {
            Some(identity) => self.redemption_service.pending(identity, now).await?,
            None => Default::default(),
        };
        Ok(WheelStatusResponse {
            can_spin_today,
            pending,
        })
    }

    /// 转动一次, 返回奖品结果。
    ///
    /// 不合资格时返回 `AlreadySpunToday` 且不写任何数据; 任一步持久化失败则整个事务回滚。
    pub async fn spin(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<Outcome> {
        let day = spin_day(now);
        let txn = self.pool.begin().await?;

        if !Self::eligible_in(&txn, identity, day, now).await? {
            return Err(AppError::AlreadySpunToday);
        }

        let catalog = PrizeCatalogService::load_all(&txn).await?;
        let outcome = match OverrideService::draw_in(&txn, &catalog).await? {
            Some(forced) => {
                log::info!("Wheel override selected prize {} for {identity}", forced.id);
                Outcome::from_prize(&forced)
            }
            None => {
                let mut rng = rand::thread_rng();
                weighted_draw(&catalog, &mut rng)
                    .map(Outcome::from_prize)
                    .unwrap_or_else(Outcome::no_prize)
            }
        };

        let inserted = spins::ActiveModel {
            user_id: Set(identity.user_id()),
            session_key: Set(identity.session_key()),
            prize_id: Set(outcome.prize_id),
            prize_type: Set(outcome.kind),
            prize_name: Set(outcome.name.clone()),
            prize_value: Set(outcome.value),
            gift_description: Set(outcome.description.clone()),
            spin_day: Set(day),
            is_used: Set(false),
            used_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        if let Err(e) = inserted {
            // 并发转动: 另一请求已写入当天记录
            if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                log::info!("Concurrent spin rejected for {identity} on {day}");
                return Err(AppError::AlreadySpunToday);
            }
            return Err(e.into());
        }

        self.redemption_service
            .record_spin_in(&txn, identity, &outcome, day, now)
            .await?;

        txn.commit().await?;

        log::info!(
            "Wheel spin for {identity}: type={} prize_id={:?} value={}",
            outcome.kind,
            outcome.prize_id,
            outcome.value
        );
        Ok(outcome)
    }

    /// 转动并计算前端动画所需的目标扇区与角度
    pub async fn spin_wheel(
        &self,
        identity: &Identity,
        lang: Lang,
        now: DateTime<Utc>,
    ) -> AppResult<SpinResponse> {
        if !self.can_spin_today(Some(identity), now).await? {
            return Err(AppError::AlreadySpunToday);
        }

        let displayed = PrizeCatalogService::load_displayed(&self.pool).await?;
        if displayed.is_empty() {
            return Err(AppError::NoWinnablePrizesConfigured);
        }

        let outcome = self.spin(identity, now).await?;
        let target_index = landing_index(&displayed, &outcome);

        let mut rng = rand::thread_rng();
        let target_rotation_radians = match target_index {
            Some(index) => geometry::target_rotation(
                index,
                displayed.len(),
                self.config.extra_turns(),
                &mut rng,
            )?,
            None => geometry::full_turns(self.config.extra_turns(), &mut rng),
        };

        let segment_text = match target_index {
            Some(index) => messages::display_text(lang, &displayed[index]),
            None => String::new(),
        };

        Ok(SpinResponse {
            success: true,
            target_index,
            target_rotation_radians,
            segment_text,
            prize_type: outcome.kind,
            prize_name: outcome.name.clone(),
            discount_percentage: outcome.discount_percentage(),
            gift_description: outcome.description.clone(),
            message: messages::win_message(lang, outcome.kind, &outcome.name),
        })
    }

    /// 当前身份的抽奖记录 (分页, 倒序)
    pub async fn list_records(
        &self,
        identity: &Identity,
        query: &SpinRecordQuery,
    ) -> AppResult<SpinRecordPageResponse> {
        let params = PaginationParams::new(query.page, query.per_page);
        let base_query = spins::Entity::find().filter(spin_identity(identity));
        self.paginate(base_query, &params).await
    }

    /// 管理端: 全部记录, 可按是否已兑现 / 日期过滤
    pub async fn list_all_records(&self, query: &AdminSpinQuery) -> AppResult<SpinRecordPageResponse> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut base_query = spins::Entity::find();
        if let Some(used) = query.used {
            base_query = base_query.filter(spins::Column::IsUsed.eq(used));
        }
        if let Some(date) = query.date {
            base_query = base_query.filter(spins::Column::SpinDay.eq(date));
        }
        self.paginate(base_query, &params).await
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> AppResult<WheelStatsResponse> {
        let total_spins = spins::Entity::find().count(&self.pool).await?;
        let spins_today = spins::Entity::find()
            .filter(spins::Column::SpinDay.eq(spin_day(now)))
            .count(&self.pool)
            .await?;
        let redeemed_spins = spins::Entity::find()
            .filter(spins::Column::IsUsed.eq(true))
            .count(&self.pool)
            .await?;

        let by_kind = SpinKindBreakdown {
            discount: self.count_kind(PrizeKind::Discount).await?,
            free_shipping: self.count_kind(PrizeKind::FreeShipping).await?,
            gift: self.count_kind(PrizeKind::Gift).await?,
            no_prize: self.count_kind(PrizeKind::NoPrize).await?,
        };

        Ok(WheelStatsResponse {
            total_spins,
            spins_today,
            redeemed_spins,
            by_kind,
        })
    }

    // -----------------------------
    // 内部辅助方法
    // -----------------------------

    async fn eligible_in<C: ConnectionTrait>(
        conn: &C,
        identity: &Identity,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        if RedemptionService::spun_on_in(conn, identity, day, now).await? {
            return Ok(false);
        }
        let existing = spins::Entity::find()
            .filter(spin_identity(identity))
            .filter(spins::Column::SpinDay.eq(day))
            .count(conn)
            .await?;
        Ok(existing == 0)
    }

    async fn paginate(
        &self,
        base_query: sea_orm::Select<spins::Entity>,
        params: &PaginationParams,
    ) -> AppResult<SpinRecordPageResponse> {
        let total = base_query.clone().count(&self.pool).await?;

        let items = base_query
            .order_by_desc(spins::Column::CreatedAt)
            .order_by_desc(spins::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?
            .into_iter()
            .map(SpinRecordResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, params, total))
    }

    async fn count_kind(&self, kind: PrizeKind) -> AppResult<u64> {
        Ok(spins::Entity::find()
            .filter(spins::Column::PrizeType.eq(kind))
            .count(&self.pool)
            .await?)
    }
}

/// 结果在展示列表中的落点:
/// - 目录中的奖品 → 其下标
/// - 无目录项的 no_prize → 第一个 no_prize 扇区
/// - 其它 (例如被强制选中但未展示的奖品) → None
pub fn landing_index(displayed: &[prizes::Model], outcome: &Outcome) -> Option<usize> {
    if let Some(id) = outcome.prize_id
        && let Some(index) = displayed.iter().position(|p| p.id == id)
    {
        return Some(index);
    }
    if outcome.kind == PrizeKind::NoPrize {
        return displayed
            .iter()
            .position(|p| p.prize_type == PrizeKind::NoPrize);
    }
    None
}
