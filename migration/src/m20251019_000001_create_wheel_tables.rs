use sea_orm_migration::prelude::*;

/// Wheel prizes (the configured segments)
#[derive(DeriveIden)]
enum WheelPrizes {
    Table,
    Id,
    Name,
    PrizeType,
    Value,
    Weight,
    Color,
    GiftDescription,
    IsActive,
    CanWin,
    CreatedAt,
    UpdatedAt,
}

/// One row per recorded spin
#[derive(DeriveIden)]
enum WheelSpins {
    Table,
    Id,
    UserId,
    SessionKey,
    PrizeId,
    PrizeType,
    PrizeName,
    PrizeValue,
    GiftDescription,
    SpinDay,
    IsUsed,
    UsedAt,
    CreatedAt,
}

/// Operator override, single slot (id = 1)
#[derive(DeriveIden)]
enum WheelOverridePolicy {
    Table,
    Id,
    Name,
    ControlMode,
    ForcedPrizeId,
    SequencePrizeIds,
    CurrentSequenceIndex,
    IsActive,
    UpdatedAt,
}

/// Prizes won but not yet applied to an order
#[derive(DeriveIden)]
enum WheelPendingRedemptions {
    Table,
    IdentityKey,
    DiscountPercentage,
    FreeShipping,
    GiftName,
    GiftDescription,
    LastSpinDay,
    ExpiresAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WheelPrizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WheelPrizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WheelPrizes::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(WheelPrizes::PrizeType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::Value)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::Weight)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::Color)
                            .string_len(7)
                            .not_null()
                            .default("#FF0000"),
                    )
                    .col(ColumnDef::new(WheelPrizes::GiftDescription).text().not_null())
                    .col(
                        ColumnDef::new(WheelPrizes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::CanWin)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WheelPrizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WheelSpins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WheelSpins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WheelSpins::UserId).big_integer().null())
                    .col(ColumnDef::new(WheelSpins::SessionKey).string_len(64).null())
                    // 不加外键: 奖品配置变更后历史记录仍保留快照
                    .col(ColumnDef::new(WheelSpins::PrizeId).big_integer().null())
                    .col(
                        ColumnDef::new(WheelSpins::PrizeType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WheelSpins::PrizeName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WheelSpins::PrizeValue)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(WheelSpins::GiftDescription).text().not_null())
                    .col(ColumnDef::new(WheelSpins::SpinDay).date().not_null())
                    .col(
                        ColumnDef::new(WheelSpins::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(WheelSpins::UsedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WheelSpins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个身份每天只能有一条记录 (NULL 不参与唯一性比较)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wheel_spins_user_day_unique")
                    .table(WheelSpins::Table)
                    .col(WheelSpins::UserId)
                    .col(WheelSpins::SpinDay)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wheel_spins_session_day_unique")
                    .table(WheelSpins::Table)
                    .col(WheelSpins::SessionKey)
                    .col(WheelSpins::SpinDay)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wheel_spins_is_used")
                    .table(WheelSpins::Table)
                    .col(WheelSpins::IsUsed)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WheelOverridePolicy::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WheelOverridePolicy::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WheelOverridePolicy::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WheelOverridePolicy::ControlMode)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WheelOverridePolicy::ForcedPrizeId)
                            .big_integer()
                            .null(),
                    )
                    // JSON 数组文本, 如 "[3,1,2]"
                    .col(
                        ColumnDef::new(WheelOverridePolicy::SequencePrizeIds)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WheelOverridePolicy::CurrentSequenceIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WheelOverridePolicy::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(WheelOverridePolicy::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WheelPendingRedemptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WheelPendingRedemptions::IdentityKey)
                            .string_len(80)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WheelPendingRedemptions::DiscountPercentage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WheelPendingRedemptions::FreeShipping)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(WheelPendingRedemptions::GiftName)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WheelPendingRedemptions::GiftDescription)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WheelPendingRedemptions::LastSpinDay)
                            .date()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WheelPendingRedemptions::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WheelPendingRedemptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wheel_pending_expires_at")
                    .table(WheelPendingRedemptions::Table)
                    .col(WheelPendingRedemptions::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(WheelPendingRedemptions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(WheelOverridePolicy::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(WheelSpins::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(WheelPrizes::Table).to_owned())
            .await?;

        Ok(())
    }
}
