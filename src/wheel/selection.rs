use rand::Rng;

use crate::entities::{PrizeKind, prize_entity as prizes};

/// 一次转动的结果 (奖品快照)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// None 表示目录中不存在可用 no_prize 配置时的兜底结果
    pub prize_id: Option<i64>,
    pub kind: PrizeKind,
    pub value: i32,
    pub name: String,
    pub description: String,
}

impl Outcome {
    /// Zero-value terminal outcome used when nothing can be won.
    pub fn no_prize() -> Self {
        Self {
            prize_id: None,
            kind: PrizeKind::NoPrize,
            value: 0,
            name: String::new(),
            description: String::new(),
        }
    }

    /// 折扣值仅对 discount 有意义, 礼品描述仅对 gift 有意义
    pub fn from_prize(prize: &prizes::Model) -> Self {
        Self {
            prize_id: Some(prize.id),
            kind: prize.prize_type,
            value: if prize.prize_type == PrizeKind::Discount {
                prize.value
            } else {
                0
            },
            name: prize.name.clone(),
            description: if prize.prize_type == PrizeKind::Gift {
                prize.gift_description.clone()
            } else {
                String::new()
            },
        }
    }

    pub fn discount_percentage(&self) -> i32 {
        match self.kind {
            PrizeKind::Discount => self.value,
            _ => 0,
        }
    }
}

/// 按权重抽取:
/// 1. 仅保留 is_active && can_win && weight > 0 的奖品, 按 id 升序
/// 2. 在 [1, total] 内取随机数
/// 3. 累加权重, 第一个累计值 >= 随机数的奖品即为结果
///
/// 返回 None 表示没有可抽取的奖品 (调用方应给出 no_prize 兜底)
pub fn weighted_draw<'a, R: Rng + ?Sized>(
    catalog: &'a [prizes::Model],
    rng: &mut R,
) -> Option<&'a prizes::Model> {
    let mut winnable: Vec<&prizes::Model> = catalog.iter().filter(|p| p.is_winnable()).collect();
    winnable.sort_by_key(|p| p.id);

    let total: i64 = winnable.iter().map(|p| p.weight as i64).sum();
    if total <= 0 {
        return None;
    }

    let pick: i64 = rng.gen_range(1..=total);
    let mut acc = 0i64;
    for p in winnable.iter().copied() {
        acc += p.weight as i64;
        if pick <= acc {
            return Some(p);
        }
    }

    // 累计和最终等于 total, 不会到达这里
    winnable.last().copied()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    pub(crate) fn prize(id: i64, kind: PrizeKind, value: i32, weight: i32) -> prizes::Model {
        prizes::Model {
            id,
            name: format!("prize-{id}"),
            prize_type: kind,
            value,
            weight,
            color: "#FF0000".to_string(),
            gift_description: if kind == PrizeKind::Gift {
                "A pair of socks".to_string()
            } else {
                String::new()
            },
            is_active: true,
            can_win: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_single_winnable_prize_always_selected() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut hidden = prize(2, PrizeKind::Gift, 0, 50);
        hidden.can_win = false;
        let catalog = vec![prize(1, PrizeKind::Discount, 20, 5), hidden];

        for _ in 0..1_000 {
            let chosen = weighted_draw(&catalog, &mut rng).unwrap();
            assert_eq!(chosen.id, 1);
        }
    }

    #[test]
    fn test_zero_weights_or_nothing_winnable_yields_none() {
        let mut rng = StdRng::seed_from_u64(7);
        let zero = vec![
            prize(1, PrizeKind::Discount, 10, 0),
            prize(2, PrizeKind::FreeShipping, 0, 0),
        ];
        assert!(weighted_draw(&zero, &mut rng).is_none());

        let mut inactive = prize(3, PrizeKind::Discount, 10, 10);
        inactive.is_active = false;
        let mut locked = prize(4, PrizeKind::Discount, 10, 10);
        locked.can_win = false;
        assert!(weighted_draw(&[inactive, locked], &mut rng).is_none());
        assert!(weighted_draw(&[], &mut rng).is_none());
    }

    #[test]
    fn test_weighted_distribution_three_to_one() {
        let mut rng = StdRng::seed_from_u64(20251019);
        let catalog = vec![
            prize(1, PrizeKind::Discount, 10, 3),
            prize(2, PrizeKind::FreeShipping, 0, 1),
        ];

        let draws = 20_000;
        let mut first = 0;
        for _ in 0..draws {
            if weighted_draw(&catalog, &mut rng).unwrap().id == 1 {
                first += 1;
            }
        }
        let share = first as f64 / draws as f64;
        assert!((share - 0.75).abs() < 0.03, "share was {share}");
    }

    #[test]
    fn test_draw_order_is_independent_of_input_order() {
        let a = vec![
            prize(1, PrizeKind::Discount, 10, 3),
            prize(2, PrizeKind::Gift, 0, 1),
        ];
        let b = vec![a[1].clone(), a[0].clone()];

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            assert_eq!(
                weighted_draw(&a, &mut rng_a).unwrap().id,
                weighted_draw(&b, &mut rng_b).unwrap().id
            );
        }
    }

    #[test]
    fn test_outcome_snapshot_fields() {
        let discount = Outcome::from_prize(&prize(1, PrizeKind::Discount, 20, 1));
        assert_eq!(discount.discount_percentage(), 20);
        assert!(discount.description.is_empty());

        let gift = Outcome::from_prize(&prize(2, PrizeKind::Gift, 5, 1));
        assert_eq!(gift.value, 0);
        assert_eq!(gift.description, "A pair of socks");

        let none = Outcome::no_prize();
        assert_eq!(none.kind, PrizeKind::NoPrize);
        assert_eq!(none.prize_id, None);
        assert_eq!(none.discount_percentage(), 0);
    }
}
