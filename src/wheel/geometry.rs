//! 轮盘角度计算
//!
//! 扇区从正上方 (0 弧度) 开始顺时针排列, 每个扇区跨度 2π/N。
//! 扇区 i 的中心位于 i·2π/N + π/N, 将其转到正上方需要旋转该角度的相反数,
//! 再叠加若干整圈用于动画效果。

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::{AppError, AppResult};

/// Rotation (radians) that brings the center of `segment_index` to the top,
/// without any extra turns.
pub fn base_rotation(segment_index: usize, total_segments: usize) -> AppResult<f64> {
    if total_segments == 0 {
        return Err(AppError::InvalidGeometryInput(
            "total_segments must be positive".into(),
        ));
    }
    if segment_index >= total_segments {
        return Err(AppError::InvalidGeometryInput(format!(
            "segment_index {segment_index} out of range for {total_segments} segments"
        )));
    }

    let segment = 2.0 * PI / total_segments as f64;
    let center = segment_index as f64 * segment + segment / 2.0;
    Ok(-center)
}

/// Final absolute rotation: base rotation plus `k` full turns, `k` drawn from `extra_turns`.
pub fn target_rotation<R: Rng + ?Sized>(
    segment_index: usize,
    total_segments: usize,
    extra_turns: RangeInclusive<u32>,
    rng: &mut R,
) -> AppResult<f64> {
    let base = base_rotation(segment_index, total_segments)?;
    Ok(base + full_turns(extra_turns, rng))
}

/// 没有可对准的扇区时只转整圈, 指针停在扇区分界线上
pub fn full_turns<R: Rng + ?Sized>(extra_turns: RangeInclusive<u32>, rng: &mut R) -> f64 {
    let k = if extra_turns.is_empty() {
        *extra_turns.start()
    } else {
        rng.gen_range(extra_turns)
    };
    k as f64 * 2.0 * PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_base_rotation_for_eight_segments() {
        let first = base_rotation(0, 8).unwrap();
        assert!((first - (-(PI / 8.0))).abs() < EPS);

        // 中心 = 4·2π/8 + π/8 = 9π/8
        let fifth = base_rotation(4, 8).unwrap();
        assert!((fifth - (-(9.0 * PI / 8.0))).abs() < EPS);
    }

    #[test]
    fn test_single_segment_is_half_turn() {
        let r = base_rotation(0, 1).unwrap();
        assert!((r + PI).abs() < EPS);
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(matches!(
            base_rotation(0, 0),
            Err(AppError::InvalidGeometryInput(_))
        ));
        assert!(matches!(
            base_rotation(3, 3),
            Err(AppError::InvalidGeometryInput(_))
        ));
    }

    #[test]
    fn test_target_rotation_adds_whole_turns_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let base = base_rotation(2, 6).unwrap();
        for _ in 0..100 {
            let r = target_rotation(2, 6, 8..=12, &mut rng).unwrap();
            let turns = (r - base) / (2.0 * PI);
            assert!((turns - turns.round()).abs() < 1e-9);
            assert!((8.0..=12.0).contains(&turns.round()));
        }
    }

    #[test]
    fn test_fixed_turn_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let r = full_turns(10..=10, &mut rng);
        assert!((r - 20.0 * PI).abs() < EPS);
    }
}
