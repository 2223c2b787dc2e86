#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired when the distributor funds a reward period.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAddedEvent {
    pub reward_amount: i128,
    pub period_finish: u64,
    pub timestamp: u64,
}

/// Fired when the rewards distributor changes. Suppressed when the new
/// distributor equals the old one.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsDistributorChangedEvent {
    pub old_distributor: Address,
    pub new_distributor: Address,
    pub timestamp: u64,
}

/// Fired when the staking token reference changes. `old_token` is `None` on
/// the first assignment. Suppressed when the value is unchanged.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingTokenChangedEvent {
    pub old_token: Option<Address>,
    pub new_token: Address,
    pub timestamp: u64,
}

/// Fired when the default period length changes. Suppressed when unchanged.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsDurationUpdatedEvent {
    pub new_duration: u64,
    pub timestamp: u64,
}

/// Fired when a balance change checkpoints a depositor with a non-zero newly
/// accrued amount. Carries the delta, not the running total, so indexers can
/// build time series without re-deriving differences.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsAccruedEvent {
    pub depositor: Address,
    pub earned_rewards: i128,
    pub timestamp: u64,
}

/// Fired when a depositor claims their accrued rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub depositor: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired once per successful version transition.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImplementationUpgradedEvent {
    pub new_version: u32,
    pub timestamp: u64,
}

/// Fired when the owner sweeps a stuck asset out of the controller.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveredEvent {
    pub token: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when ownership rotates. Suppressed when the new owner equals the
/// old one.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferredEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_reward_added(env: &Env, reward_amount: i128, period_finish: u64) {
    env.events().publish(
        (symbol_short!("RWD_ADD"),),
        RewardAddedEvent {
            reward_amount,
            period_finish,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_distributor_changed(
    env: &Env,
    old_distributor: Address,
    new_distributor: Address,
) {
    env.events().publish(
        (symbol_short!("DIST_CHG"),),
        RewardsDistributorChangedEvent {
            old_distributor,
            new_distributor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staking_token_changed(env: &Env, old_token: Option<Address>, new_token: Address) {
    env.events().publish(
        (symbol_short!("STK_CHG"),),
        StakingTokenChangedEvent {
            old_token,
            new_token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_duration_updated(env: &Env, new_duration: u64) {
    env.events().publish(
        (symbol_short!("DUR_UPD"),),
        RewardsDurationUpdatedEvent {
            new_duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_accrued(env: &Env, depositor: Address, earned_rewards: i128) {
    env.events().publish(
        (symbol_short!("ACCRUED"), depositor.clone()),
        RewardsAccruedEvent {
            depositor,
            earned_rewards,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, depositor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), depositor.clone()),
        RewardClaimedEvent {
            depositor,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_implementation_upgraded(env: &Env, new_version: u32) {
    env.events().publish(
        (symbol_short!("UPGRADED"),),
        ImplementationUpgradedEvent {
            new_version,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_recovered(env: &Env, token: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RECOVERED"),),
        RecoveredEvent {
            token,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_ownership_transferred(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_XFER"), new_owner.clone()),
        OwnershipTransferredEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}
