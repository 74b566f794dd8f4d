use rand::Rng;

use crate::state::BonusPolicy;

/// Roll the bonus tickets for one entry.
///
/// Disabled policies never consume randomness. Enabled ones draw a single
/// uniform value in [0, 1) and, if it falls under `chance`, a uniform bonus in
/// `[min, max]`.
pub fn grant_bonus<R: Rng + ?Sized>(policy: &BonusPolicy, rng: &mut R) -> u32 {
    if !policy.enabled {
        return 0;
    }
    if rng.gen::<f64>() < policy.chance {
        rng.gen_range(policy.min..=policy.max.max(policy.min))
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn disabled_policy_grants_nothing() {
        let policy = BonusPolicy {
            enabled: false,
            chance: 1.0,
            ..BonusPolicy::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..100).all(|_| grant_bonus(&policy, &mut rng) == 0));
    }

    #[test]
    fn certain_bonus_stays_in_range() {
        let policy = BonusPolicy {
            enabled: true,
            chance: 1.0,
            min: 2,
            max: 3,
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let bonus = grant_bonus(&policy, &mut rng);
            assert!((2..=3).contains(&bonus), "bonus {bonus} out of range");
        }
    }

    #[test]
    fn zero_chance_never_grants() {
        let policy = BonusPolicy {
            enabled: true,
            chance: 0.0,
            min: 5,
            max: 9,
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..200).all(|_| grant_bonus(&policy, &mut rng) == 0));
    }
}
