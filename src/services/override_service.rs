use crate::entities::{ControlMode, override_policy_entity as policy, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::{OverridePolicyRequest, OverridePolicyResponse};
use crate::wheel::next_prize;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, Set, TransactionTrait,
};

const MAX_ADVANCE_ATTEMPTS: usize = 5;

/// 运营干预 (单例配置)
#[derive(Clone)]
pub struct OverrideService {
    pool: DatabaseConnection,
}

impl OverrideService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> AppResult<Option<OverridePolicyResponse>> {
        let current = policy::Entity::find_by_id(policy::SINGLETON_ID)
            .one(&self.pool)
            .await?;
        Ok(current.map(Into::into))
    }

    /// 整体替换干预策略, 序列下标归零
    pub async fn replace(&self, req: &OverridePolicyRequest) -> AppResult<OverridePolicyResponse> {
        let txn = self.pool.begin().await?;
        self.validate_in(&txn, req).await?;

        let sequence = serde_json::to_string(&req.sequence_prize_ids)?;
        let forced = match req.mode {
            ControlMode::ForcePrize => req.forced_prize_id,
            _ => None,
        };
        let now = Utc::now();

        let saved = match policy::Entity::find_by_id(policy::SINGLETON_ID)
            .one(&txn)
            .await?
        {
            Some(existing) => {
                let mut am = existing.into_active_model();
                am.name = Set(req.name.clone());
                am.control_mode = Set(req.mode);
                am.forced_prize_id = Set(forced);
                am.sequence_prize_ids = Set(sequence);
                am.current_sequence_index = Set(0);
                am.is_active = Set(req.is_active);
                am.updated_at = Set(Some(now));
                am.update(&txn).await?
            }
            None => {
                policy::ActiveModel {
                    id: Set(policy::SINGLETON_ID),
                    name: Set(req.name.clone()),
                    control_mode: Set(req.mode),
                    forced_prize_id: Set(forced),
                    sequence_prize_ids: Set(sequence),
                    current_sequence_index: Set(0),
                    is_active: Set(req.is_active),
                    updated_at: Set(Some(now)),
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;
        log::info!(
            "Wheel override policy replaced: mode={:?} active={}",
            saved.control_mode,
            saved.is_active
        );
        Ok(saved.into())
    }

    /// 在抽奖事务内向干预策略要下一个奖品。
    ///
    /// 序列模式的下标推进使用乐观并发 (update ... where current_sequence_index = 旧值),
    /// 与抽奖记录一同提交; 冲突时重新读取策略并重试。
    pub async fn draw_in<C: ConnectionTrait>(
        conn: &C,
        catalog: &[prizes::Model],
    ) -> Result<Option<prizes::Model>, DbErr> {
        for _ in 0..MAX_ADVANCE_ATTEMPTS {
            let Some(current) = policy::Entity::find_by_id(policy::SINGLETON_ID)
                .one(conn)
                .await?
            else {
                return Ok(None);
            };

            let draw = next_prize(&current, catalog);
            let Some(next_index) = draw.advance_to else {
                return Ok(draw.prize);
            };

            let result = policy::Entity::update_many()
                .col_expr(policy::Column::CurrentSequenceIndex, Expr::value(next_index))
                .col_expr(policy::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(policy::Column::Id.eq(policy::SINGLETON_ID))
                .filter(policy::Column::CurrentSequenceIndex.eq(current.current_sequence_index))
                .exec(conn)
                .await?;

            if result.rows_affected == 1 {
                return Ok(draw.prize);
            }
            log::debug!("Wheel sequence index moved concurrently, retrying");
        }

        Err(DbErr::Custom(
            "Failed to advance wheel sequence after several attempts".into(),
        ))
    }

    async fn validate_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        req: &OverridePolicyRequest,
    ) -> AppResult<()> {
        if req.name.trim().is_empty() {
            return Err(AppError::ValidationError("Policy name is required".into()));
        }
        match req.mode {
            ControlMode::ForcePrize => {
                let id = req.forced_prize_id.ok_or_else(|| {
                    AppError::ValidationError("force_prize requires forced_prize_id".into())
                })?;
                if prizes::Entity::find_by_id(id).one(conn).await?.is_none() {
                    return Err(AppError::ValidationError(format!(
                        "Forced prize {id} does not exist"
                    )));
                }
            }
            ControlMode::Sequence => {
                if req.sequence_prize_ids.is_empty() {
                    return Err(AppError::ValidationError(
                        "sequence requires at least one prize".into(),
                    ));
                }
                let known: Vec<i64> = prizes::Entity::find()
                    .filter(prizes::Column::Id.is_in(req.sequence_prize_ids.clone()))
                    .all(conn)
                    .await?
                    .into_iter()
                    .map(|p| p.id)
                    .collect();
                if let Some(missing) = req.sequence_prize_ids.iter().find(|id| !known.contains(id))
                {
                    return Err(AppError::ValidationError(format!(
                        "Sequence prize {missing} does not exist"
                    )));
                }
            }
            ControlMode::Random | ControlMode::ForceNoPrize => {}
        }
        Ok(())
    }
}
