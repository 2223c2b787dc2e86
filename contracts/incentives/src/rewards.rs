//! Pure reward-accounting math.
//!
//! Everything in this module is free of `Env` and storage access so the
//! accumulator arithmetic can be unit- and property-tested on its own. The
//! contract owns persistence and checkpointing; this module only answers
//! "what does the state look like after time passes".

use soroban_sdk::contracttype;

/// Fixed-point scaling factor.
///
/// Accumulated reward-per-token values are multiplied by this constant before
/// storage to preserve sub-unit precision without floating-point arithmetic.
/// 10^12 gives 12 decimal places of precision while keeping the
/// `rate × elapsed × PRECISION` product comfortably inside i128 for realistic
/// emission rates and period lengths.
pub const PRECISION: i128 = 1_000_000_000_000;

/// Global accounting state for one reward period.
///
/// A single instance lives in contract storage and persists across logic
/// upgrades. `accumulated_reward_per_token` is monotonically non-decreasing
/// while anything is staked.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsState {
    /// Running total of reward per staked unit, scaled by [`PRECISION`].
    pub accumulated_reward_per_token: i128,
    /// Current emission rate in reward units per second.
    pub reward_per_second: i128,
    /// Timestamp after which the current rate stops applying.
    pub period_finish: u64,
    /// Timestamp of the last accumulator rollover.
    pub updated_at: u64,
}

impl RewardsState {
    /// Inert state: no rate, no accumulation, period already over.
    pub fn empty() -> Self {
        RewardsState {
            accumulated_reward_per_token: 0,
            reward_per_second: 0,
            period_finish: 0,
            updated_at: 0,
        }
    }

    /// The rollover point actually applied: `min(now, period_finish)`.
    pub fn last_applicable(&self, now: u64) -> u64 {
        now.min(self.period_finish)
    }

    /// Accumulator value as of `now`, without mutating the state.
    ///
    /// ```text
    /// rpt = stored + rate × elapsed × PRECISION / total_staked
    /// ```
    ///
    /// Multiplications happen before the division; the truncated remainder is
    /// accepted dust, bounded per rollover by `total_staked / PRECISION + 1`
    /// reward units in aggregate. With nothing staked the stored value is
    /// returned unchanged — there is nobody to distribute to.
    pub fn reward_per_token(&self, total_staked: i128, now: u64) -> i128 {
        if total_staked <= 0 {
            return self.accumulated_reward_per_token;
        }
        let elapsed = self.last_applicable(now).saturating_sub(self.updated_at);
        let emitted = self
            .reward_per_second
            .saturating_mul(elapsed as i128)
            .saturating_mul(PRECISION);
        self.accumulated_reward_per_token
            .saturating_add(emitted / total_staked)
    }

    /// Rolls the accumulator forward to `min(now, period_finish)`.
    ///
    /// `updated_at` advances unconditionally, even with nothing staked, so a
    /// stale window is never replayed once staking resumes.
    pub fn roll(&mut self, total_staked: i128, now: u64) {
        self.accumulated_reward_per_token = self.reward_per_token(total_staked, now);
        self.updated_at = self.last_applicable(now);
    }

    /// Reward units still scheduled for emission in the running period.
    ///
    /// Zero once the period has finished; folded into the new rate when a
    /// period is restarted early so consecutive fundings are additive.
    pub fn leftover(&self, now: u64) -> i128 {
        let remaining = self.period_finish.saturating_sub(now);
        self.reward_per_second.saturating_mul(remaining as i128)
    }
}

/// Total reward owed to one participant.
///
/// ```text
/// earned = accrued + stake × (current_rpt − rpt_paid) / PRECISION
/// ```
///
/// The subtraction isolates accumulation since the participant's last
/// checkpoint, so prior snapshots are never double-counted. Non-decreasing
/// between checkpoints absent a claim.
pub fn earned(stake: i128, current_rpt: i128, rpt_paid: i128, accrued: i128) -> i128 {
    let delta = stake.saturating_mul(current_rpt.saturating_sub(rpt_paid)) / PRECISION;
    accrued.saturating_add(delta)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.
