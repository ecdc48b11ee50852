use crate::entities::{PrizeKind, pending_redemption_entity as pending, spin_entity as spins};
use crate::error::AppResult;
use crate::models::{PendingGift, PendingRedemption};
use crate::wheel::{Identity, Outcome};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, QueryFilter, Set, TransactionTrait,
};

/// 待兑现奖品账本
///
/// 每个身份至多保存一份折扣 / 免运费 / 礼品, 由下一张订单一次性消耗。
/// 超过 TTL 的数据视为空, 并由后台任务定期清理。
#[derive(Clone)]
pub struct RedemptionService {
    pool: DatabaseConnection,
    ttl: Duration,
}

impl RedemptionService {
    pub fn new(pool: DatabaseConnection, ttl_hours: i64) -> Self {
        Self {
            pool,
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub async fn pending(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<PendingRedemption> {
        Ok(Self::pending_in(&self.pool, identity, now).await?)
    }

    pub async fn pending_discount_percent(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<i32> {
        Ok(self.pending(identity, now).await?.discount_percentage)
    }

    pub async fn pending_free_shipping(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<bool> {
        Ok(self.pending(identity, now).await?.free_shipping)
    }

    pub async fn pending_gift(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> AppResult<Option<PendingGift>> {
        Ok(self.pending(identity, now).await?.gift)
    }

    /// 订单创建成功后调用: 在独立事务中完成消耗
    pub async fn consume(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<PendingRedemption> {
        let txn = self.pool.begin().await?;
        let consumed = Self::consume_in(&txn, identity, now).await?;
        txn.commit().await?;
        Ok(consumed)
    }

    /// 在调用方 (订单创建) 的事务内消耗待兑现奖品:
    /// - 该身份所有未使用的抽奖记录标记为已使用
    /// - 清空待兑现状态
    ///
    /// 返回被消耗的快照; 重复调用返回空快照且不会再次标记记录。
    pub async fn consume_in<C: ConnectionTrait>(
        conn: &C,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<PendingRedemption, DbErr> {
        let snapshot = Self::pending_in(conn, identity, now).await?;

        let marked = spins::Entity::update_many()
            .col_expr(spins::Column::IsUsed, Expr::value(true))
            .col_expr(spins::Column::UsedAt, Expr::value(Some(now)))
            .filter(spin_identity(identity))
            .filter(spins::Column::IsUsed.eq(false))
            .exec(conn)
            .await?;

        // 保留 last_spin_day: 它是当日已转动标记, 不属于奖品状态
        pending::Entity::update_many()
            .col_expr(pending::Column::DiscountPercentage, Expr::value(0))
            .col_expr(pending::Column::FreeShipping, Expr::value(false))
            .col_expr(pending::Column::GiftName, Expr::value(Option::<String>::None))
            .col_expr(pending::Column::GiftDescription, Expr::value(Option::<String>::None))
            .col_expr(pending::Column::UpdatedAt, Expr::value(now))
            .filter(pending::Column::IdentityKey.eq(identity.key()))
            .exec(conn)
            .await?;

        if marked.rows_affected > 0 || !snapshot.is_empty() {
            log::info!(
                "Wheel prizes consumed for {identity}: records={} discount={} free_shipping={} gift={}",
                marked.rows_affected,
                snapshot.discount_percentage,
                snapshot.free_shipping,
                snapshot.gift.is_some()
            );
        }
        Ok(snapshot)
    }

    /// 抽奖成功后在同一事务内更新待兑现状态并写入当日已转动标记
    pub async fn record_spin_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        identity: &Identity,
        outcome: &Outcome,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let expires_at = now + self.ttl;
        let existing = pending::Entity::find_by_id(identity.key()).one(conn).await?;
        let is_new = existing.is_none();

        let mut am = match existing {
            Some(m) if m.is_expired(now) => {
                let mut am = m.into_active_model();
                am.discount_percentage = Set(0);
                am.free_shipping = Set(false);
                am.gift_name = Set(None);
                am.gift_description = Set(None);
                am
            }
            Some(m) => m.into_active_model(),
            None => pending::ActiveModel {
                identity_key: Set(identity.key()),
                discount_percentage: Set(0),
                free_shipping: Set(false),
                gift_name: Set(None),
                gift_description: Set(None),
                last_spin_day: Set(None),
                expires_at: Set(expires_at),
                updated_at: Set(now),
            },
        };

        match outcome.kind {
            PrizeKind::Discount if outcome.value > 0 => {
                am.discount_percentage = Set(outcome.value);
            }
            PrizeKind::FreeShipping => {
                am.free_shipping = Set(true);
            }
            PrizeKind::Gift => {
                am.gift_name = Set(Some(outcome.name.clone()));
                am.gift_description = Set(Some(outcome.description.clone()));
            }
            _ => {}
        }
        am.last_spin_day = Set(Some(day));
        am.expires_at = Set(expires_at);
        am.updated_at = Set(now);

        if is_new {
            am.insert(conn).await?;
        } else {
            am.update(conn).await?;
        }
        Ok(())
    }

    /// 当日已转动标记 (TTL 内有效)
    pub async fn spun_on_in<C: ConnectionTrait>(
        conn: &C,
        identity: &Identity,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let row = pending::Entity::find_by_id(identity.key()).one(conn).await?;
        Ok(matches!(row, Some(m) if !m.is_expired(now) && m.last_spin_day == Some(day)))
    }

    /// 清理过期数据, 返回删除条数
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = pending::Entity::delete_many()
            .filter(pending::Column::ExpiresAt.lte(now))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }

    async fn pending_in<C: ConnectionTrait>(
        conn: &C,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<PendingRedemption, DbErr> {
        let row = pending::Entity::find_by_id(identity.key()).one(conn).await?;
        Ok(match row {
            Some(m) if !m.is_expired(now) => m.into(),
            _ => PendingRedemption::default(),
        })
    }
}

/// 记录表上的身份过滤条件
pub fn spin_identity(identity: &Identity) -> Condition {
    match identity {
        Identity::User(id) => Condition::all().add(spins::Column::UserId.eq(*id)),
        Identity::Session(key) => Condition::all()
            .add(spins::Column::SessionKey.eq(key.clone()))
            .add(spins::Column::UserId.is_null()),
    }
}
