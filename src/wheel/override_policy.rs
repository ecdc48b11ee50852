use crate::entities::{ControlMode, PrizeKind, override_policy_entity as policy, prize_entity as prizes};

/// 干预策略给出的下一次结果
///
/// `advance_to` 为序列模式下需要写回的新下标; 调用方必须与抽奖记录在同一事务中提交,
/// 否则不得推进。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverrideDraw {
    pub prize: Option<prizes::Model>,
    pub advance_to: Option<i32>,
}

impl OverrideDraw {
    fn defer() -> Self {
        Self::default()
    }

    fn prize(prize: &prizes::Model) -> Self {
        Self {
            prize: Some(prize.clone()),
            advance_to: None,
        }
    }
}

/// Decide the next prize under an override policy.
///
/// `catalog` must contain every configured prize (inactive ones included) because
/// `force_prize` deliberately bypasses the active/winnable flags. A `None` prize
/// means the caller falls back to the weighted draw.
pub fn next_prize(policy: &policy::Model, catalog: &[prizes::Model]) -> OverrideDraw {
    if !policy.is_active {
        return OverrideDraw::defer();
    }

    match policy.control_mode {
        ControlMode::Random => OverrideDraw::defer(),
        ControlMode::ForcePrize => policy
            .forced_prize_id
            .and_then(|id| catalog.iter().find(|p| p.id == id))
            .map(OverrideDraw::prize)
            .unwrap_or_default(),
        ControlMode::ForceNoPrize => catalog
            .iter()
            .filter(|p| p.prize_type == PrizeKind::NoPrize && p.is_active)
            .min_by_key(|p| p.id)
            .map(OverrideDraw::prize)
            .unwrap_or_default(),
        ControlMode::Sequence => {
            let sequence = policy.sequence();
            if sequence.is_empty() {
                return OverrideDraw::defer();
            }
            // 列表被缩短时下标可能越界, 取模回到范围内
            let index = policy.current_sequence_index.max(0) as usize % sequence.len();
            let wanted = sequence[index];

            match catalog
                .iter()
                .find(|p| p.id == wanted && p.is_active && p.can_win)
            {
                Some(prize) => OverrideDraw {
                    prize: Some(prize.clone()),
                    advance_to: Some(((index + 1) % sequence.len()) as i32),
                },
                // 查找失败: 本次走随机, 下标不动
                None => OverrideDraw::defer(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::selection::tests::prize;

    fn policy(mode: ControlMode) -> policy::Model {
        policy::Model {
            id: policy::SINGLETON_ID,
            name: "default".to_string(),
            control_mode: mode,
            forced_prize_id: None,
            sequence_prize_ids: "[]".to_string(),
            current_sequence_index: 0,
            is_active: true,
            updated_at: None,
        }
    }

    fn catalog() -> Vec<prizes::Model> {
        let mut locked = prize(4, PrizeKind::Gift, 0, 0);
        locked.can_win = false;
        vec![
            prize(1, PrizeKind::Discount, 10, 5),
            prize(2, PrizeKind::FreeShipping, 0, 5),
            prize(3, PrizeKind::NoPrize, 0, 5),
            locked,
        ]
    }

    #[test]
    fn test_random_and_inactive_defer() {
        assert_eq!(next_prize(&policy(ControlMode::Random), &catalog()), OverrideDraw::default());

        let mut p = policy(ControlMode::ForcePrize);
        p.forced_prize_id = Some(1);
        p.is_active = false;
        assert!(next_prize(&p, &catalog()).prize.is_none());
    }

    #[test]
    fn test_force_prize_bypasses_winnable() {
        let mut p = policy(ControlMode::ForcePrize);
        p.forced_prize_id = Some(4);
        for _ in 0..10 {
            let draw = next_prize(&p, &catalog());
            assert_eq!(draw.prize.map(|m| m.id), Some(4));
            assert_eq!(draw.advance_to, None);
        }

        p.forced_prize_id = Some(99);
        assert!(next_prize(&p, &catalog()).prize.is_none());
    }

    #[test]
    fn test_force_no_prize_uses_catalog_entry() {
        let p = policy(ControlMode::ForceNoPrize);
        assert_eq!(next_prize(&p, &catalog()).prize.map(|m| m.id), Some(3));

        let without: Vec<_> = catalog()
            .into_iter()
            .filter(|m| m.prize_type != PrizeKind::NoPrize)
            .collect();
        assert!(next_prize(&p, &without).prize.is_none());
    }

    #[test]
    fn test_sequence_wraps_around() {
        let mut p = policy(ControlMode::Sequence);
        p.sequence_prize_ids = "[1,2,3]".to_string();

        let mut seen = Vec::new();
        for _ in 0..5 {
            let draw = next_prize(&p, &catalog());
            seen.push(draw.prize.unwrap().id);
            p.current_sequence_index = draw.advance_to.unwrap();
        }
        assert_eq!(seen, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_sequence_miss_does_not_advance() {
        let mut p = policy(ControlMode::Sequence);
        p.sequence_prize_ids = "[4,1]".to_string();

        // 4 不可中奖
        let draw = next_prize(&p, &catalog());
        assert!(draw.prize.is_none());
        assert!(draw.advance_to.is_none());

        p.sequence_prize_ids = "[]".to_string();
        assert!(next_prize(&p, &catalog()).prize.is_none());
    }
}
