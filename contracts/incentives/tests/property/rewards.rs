#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for the pure reward-accounting math.
//!
//! Invariants tested:
//! - The global accumulator never decreases, whatever rollover sequence runs
//! - A participant's earned amount never decreases between checkpoints
//! - Truncation dust only ever favours the pool: distributed ≤ emitted
//! - Folding an unfinished period's leftover into a new rate is additive

use incentives::rewards::{earned, RewardsState, PRECISION};
use proptest::prelude::*;

// Bounds chosen so `rate × elapsed × PRECISION` stays far from i128
// saturation while still covering realistic magnitudes.
const MAX_RATE: i128 = 1_000_000_000_000;
const MAX_STAKE: i128 = 1_000_000_000_000_000;
const MAX_STEP: u64 = 10_000_000;

fn fresh_state(rate: i128, finish: u64) -> RewardsState {
    RewardsState {
        accumulated_reward_per_token: 0,
        reward_per_second: rate,
        period_finish: finish,
        updated_at: 0,
    }
}

proptest! {
    /// Rolling the accumulator forward, with arbitrary gaps and stake levels
    /// (including windows with nothing staked), never lowers it, and
    /// `updated_at` never exceeds the period end.
    #[test]
    fn prop_accumulator_is_monotonic(
        rate in 0i128..MAX_RATE,
        finish in 1u64..MAX_STEP,
        steps in prop::collection::vec((1u64..1_000u64, 0i128..MAX_STAKE), 1..20),
    ) {
        let mut state = fresh_state(rate, finish);
        let mut now = 0u64;
        let mut previous = state.accumulated_reward_per_token;

        for (gap, total_staked) in steps {
            now += gap;
            state.roll(total_staked, now);
            prop_assert!(state.accumulated_reward_per_token >= previous);
            prop_assert!(state.updated_at <= finish);
            prop_assert!(state.updated_at <= now);
            previous = state.accumulated_reward_per_token;
        }
    }

    /// With a fixed stake and no claim, `earned` never decreases as the
    /// accumulator advances.
    #[test]
    fn prop_earned_is_monotonic(
        rate in 0i128..MAX_RATE,
        stake in 0i128..MAX_STAKE,
        extra in 0i128..MAX_STAKE,
        gaps in prop::collection::vec(1u64..1_000u64, 1..20),
    ) {
        let total_staked = stake + extra + 1;
        let mut state = fresh_state(rate, u64::MAX);
        let mut now = 0u64;
        let mut previous = earned(stake, state.accumulated_reward_per_token, 0, 0);

        for gap in gaps {
            now += gap;
            state.roll(total_staked, now);
            let current = earned(stake, state.accumulated_reward_per_token, 0, 0);
            prop_assert!(current >= previous);
            previous = current;
        }
    }

    /// Splitting the total stake between two participants never distributes
    /// more than the pool emitted over the window.
    #[test]
    fn prop_no_over_distribution(
        rate in 1i128..MAX_RATE,
        elapsed in 1u64..MAX_STEP,
        stake_a in 1i128..MAX_STAKE,
        stake_b in 1i128..MAX_STAKE,
    ) {
        let total_staked = stake_a + stake_b;
        let state = fresh_state(rate, u64::MAX);
        let rpt = state.reward_per_token(total_staked, elapsed);

        let distributed = earned(stake_a, rpt, 0, 0) + earned(stake_b, rpt, 0, 0);
        let emitted = rate * elapsed as i128;
        prop_assert!(distributed <= emitted);
    }

    /// Dust from the two truncating divisions stays bounded: the shortfall is
    /// below one unit per participant plus the accumulator's own remainder
    /// spread over the stake.
    #[test]
    fn prop_truncation_dust_is_bounded(
        rate in 1i128..MAX_RATE,
        elapsed in 1u64..1_000u64,
        stake_a in 1i128..1_000_000i128,
        stake_b in 1i128..1_000_000i128,
    ) {
        let total_staked = stake_a + stake_b;
        let state = fresh_state(rate, u64::MAX);
        let rpt = state.reward_per_token(total_staked, elapsed);

        let distributed = earned(stake_a, rpt, 0, 0) + earned(stake_b, rpt, 0, 0);
        let emitted = rate * elapsed as i128;
        let dust_bound = total_staked / PRECISION + 3;
        prop_assert!(emitted - distributed <= dust_bound);
    }

    /// Restarting a running period folds its leftover budget in: the new rate
    /// is always at least what the same funding would buy on a finished
    /// period.
    #[test]
    fn prop_refunding_is_additive(
        rate in 0i128..MAX_RATE,
        finish in 1u64..MAX_STEP,
        now in 0u64..MAX_STEP,
        amount in 1i128..1_000_000_000_000i128,
        duration in 1u64..MAX_STEP,
    ) {
        let state = fresh_state(rate, finish);
        let folded_rate = (amount + state.leftover(now)) / duration as i128;
        let plain_rate = amount / duration as i128;
        prop_assert!(folded_rate >= plain_rate);
    }

    /// A rollover with nothing staked advances the clock without minting:
    /// the skipped window is never replayed once staking resumes.
    #[test]
    fn prop_empty_pool_window_is_dropped(
        rate in 1i128..MAX_RATE,
        idle in 1u64..1_000u64,
        active in 1u64..1_000u64,
        total_staked in 1i128..MAX_STAKE,
    ) {
        let mut state = fresh_state(rate, u64::MAX);

        state.roll(0, idle);
        prop_assert_eq!(state.accumulated_reward_per_token, 0);
        prop_assert_eq!(state.updated_at, idle);

        state.roll(total_staked, idle + active);
        let expected = rate * active as i128 * PRECISION / total_staked;
        prop_assert_eq!(state.accumulated_reward_per_token, expected);
    }
}
