//! Pure reward arithmetic.

use qol_types::{QolAmount, RewardParams};

pub fn submission_reward(params: &RewardParams) -> QolAmount {
    params.submission_reward
}

/// Reward for the `verification_number`-th (1-based) verification of an audit.
///
/// The first and the quorum-closing verification earn the multiplier; the
/// multiplier is applied once even when both coincide.
pub fn verification_reward(verification_number: u32, params: &RewardParams) -> QolAmount {
    let base = params.verification_base_reward;
    if verification_number == 1 || verification_number == params.quorum {
        base.mul_bps(params.first_last_multiplier_bps)
    } else {
        base
    }
}

/// Population standard deviation of the ratings, `None` when empty.
pub fn rating_std_dev(ratings: &[u8]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let n = ratings.len() as f64;
    let mean = ratings.iter().map(|&r| r as f64).sum::<f64>() / n;
    let variance = ratings
        .iter()
        .map(|&r| {
            let d = r as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    Some(variance.sqrt())
}

/// Quality bonus for a set of collected ratings.
///
/// The first tier whose `max_std_dev` is strictly above the dispersion wins;
/// otherwise the floor bonus applies. No ratings, no bonus.
pub fn quality_bonus(ratings: &[u8], params: &RewardParams) -> QolAmount {
    let Some(sigma) = rating_std_dev(ratings) else {
        return QolAmount::ZERO;
    };
    params
        .quality_tiers
        .iter()
        .find(|tier| sigma < tier.max_std_dev)
        .map(|tier| tier.bonus)
        .unwrap_or(params.quality_floor_bonus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qol(s: &str) -> QolAmount {
        s.parse().unwrap()
    }

    #[test]
    fn verification_schedule() {
        let p = RewardParams::default();
        assert_eq!(verification_reward(1, &p), qol("7.5"));
        assert_eq!(verification_reward(2, &p), qol("5"));
        assert_eq!(verification_reward(3, &p), qol("7.5"));
    }

    #[test]
    fn single_verifier_quorum_gets_one_multiplier() {
        let p = RewardParams {
            quorum: 1,
            ..Default::default()
        };
        assert_eq!(verification_reward(1, &p), qol("7.5"));
    }

    #[test]
    fn submission_is_flat() {
        assert_eq!(submission_reward(&RewardParams::default()), qol("10"));
    }

    #[test]
    fn std_dev() {
        assert_eq!(rating_std_dev(&[]), None);
        assert_eq!(rating_std_dev(&[5, 5, 5]), Some(0.0));
        assert_eq!(rating_std_dev(&[1, 5]), Some(2.0));
    }

    #[test]
    fn quality_bonus_tiers() {
        let p = RewardParams::default();
        assert_eq!(quality_bonus(&[], &p), QolAmount::ZERO);
        assert_eq!(quality_bonus(&[5, 5, 5], &p), qol("15"));
        // sigma = 0.5
        assert_eq!(quality_bonus(&[4, 5], &p), qol("10"));
        assert_eq!(quality_bonus(&[1, 5], &p), qol("5"));
        // single rating has no dispersion
        assert_eq!(quality_bonus(&[2], &p), qol("15"));
    }
}
