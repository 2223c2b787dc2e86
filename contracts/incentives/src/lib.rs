#![no_std]

pub mod events;
pub mod rewards;

use common::{ownable, versioning, VersionError};
use soroban_sdk::{
    contract, contractimpl, symbol_short, token, Address, BytesN, Env, Symbol,
};

use rewards::RewardsState;

// ── Implementation versions ──────────────────────────────────────────────────

/// Inert placeholder behaviour: deployable and ownable, no accounting.
pub const VERSION_STUB: u32 = 1;
/// Full reward accounting.
pub const VERSION_ACTIVE: u32 = 2;

// ── Storage key constants ────────────────────────────────────────────────────

const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const STAKING_TOKEN: Symbol = symbol_short!("STK_TOK");
const DISTRIBUTOR: Symbol = symbol_short!("RWD_DIST");
const DURATION: Symbol = symbol_short!("RWD_DUR");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");
const REWARDS_STATE: Symbol = symbol_short!("RWD_STATE");

// Per-depositor persistent storage uses tuple keys: (prefix, depositor)
const USER_RPT_PAID: Symbol = symbol_short!("RPT_PAID");
const USER_ACCRUED: Symbol = symbol_short!("ACCRUED");
const USER_STAKE: Symbol = symbol_short!("STK_BAL");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    RewardPeriodNotFinished = 5,
    VersionSkip = 6,
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// Distributes a funded reward budget to depositors of an external stake
/// ledger, proportionally to their time-weighted share of the total stake.
///
/// The contract ships in two behaviour sets selected on the stored version
/// slot: version 1 is an inert stub (the address can be wired into the ledger
/// before the accounting logic is final), version 2 activates full
/// accounting. State lives behind the one stable contract address and
/// survives every transition, including wasm swaps for versions beyond 2.
#[contract]
pub struct IncentivesController;

#[contractimpl]
impl IncentivesController {
    // ── Initialisation & upgrades ───────────────────────────────────────────

    /// Bootstrap the version-1 stub: stores the owner and nothing else.
    ///
    /// Accounting stays inert until [`IncentivesController::activate`] moves
    /// the contract to version 2. A second call fails.
    pub fn initialize(env: Env, owner: Address) -> Result<(), ContractError> {
        versioning::advance_to(&env, VERSION_STUB).map_err(|_| ContractError::AlreadyInitialized)?;
        ownable::set_owner(&env, &owner);
        Ok(())
    }

    /// Atomic upgrade-and-initialize for version 1 → 2.
    ///
    /// Installs the active accounting behaviour in the same invocation that
    /// configures it, so no upgraded-but-unconfigured window exists.
    ///
    /// * `reward_token`        – token the budget is paid out in.
    /// * `rewards_distributor` – the only identity allowed to fund periods.
    /// * `rewards_duration`    – default period length in seconds, non-zero.
    pub fn activate(
        env: Env,
        caller: Address,
        reward_token: Address,
        rewards_distributor: Address,
        rewards_duration: u64,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if rewards_duration == 0 {
            return Err(ContractError::InvalidInput);
        }

        versioning::advance_to(&env, VERSION_ACTIVE).map_err(|e| match e {
            VersionError::Replay => ContractError::AlreadyInitialized,
            VersionError::Skip => ContractError::VersionSkip,
        })?;

        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage()
            .instance()
            .set(&DISTRIBUTOR, &rewards_distributor);
        env.storage().instance().set(&DURATION, &rewards_duration);
        env.storage()
            .instance()
            .set(&REWARDS_STATE, &RewardsState::empty());

        events::publish_implementation_upgraded(&env, VERSION_ACTIVE);

        Ok(())
    }

    /// Swap the executable for a future logic version (3, 4, …).
    ///
    /// The version slot moves in the same invocation as the code swap, so a
    /// rerun of the same target or a skipped version is rejected before the
    /// deployer is touched. Storage carries over to the new wasm untouched.
    pub fn upgrade(
        env: Env,
        caller: Address,
        new_wasm_hash: BytesN<32>,
        target_version: u32,
    ) -> Result<(), ContractError> {
        Self::require_active(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        versioning::advance_to(&env, target_version).map_err(|e| match e {
            VersionError::Replay => ContractError::AlreadyInitialized,
            VersionError::Skip => ContractError::VersionSkip,
        })?;

        env.deployer().update_current_contract_wasm(new_wasm_hash);

        events::publish_implementation_upgraded(&env, target_version);

        Ok(())
    }

    /// Current initialized version: 0 before `initialize`, 1 for the stub,
    /// 2 once active. Readable identically across every transition.
    pub fn version(env: Env) -> u32 {
        versioning::current(&env)
    }

    // ── Ownership ───────────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        ownable::owner(&env).ok_or(ContractError::NotInitialized)
    }

    /// Rotate the privileged address. No event when the owner is unchanged.
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if new_owner == caller {
            return Ok(());
        }

        ownable::set_owner(&env, &new_owner);
        events::publish_ownership_transferred(&env, caller, new_owner);

        Ok(())
    }

    // ── Period control ──────────────────────────────────────────────────────

    /// Fund and (re)start a reward period. Distributor-only.
    ///
    /// When the previous period has ended the new rate is simply
    /// `reward_amount / duration`. When a period is still running, its
    /// unspent budget is folded in:
    ///
    /// ```text
    /// rate = (reward_amount + reward_per_second × (period_finish − now)) / duration
    /// ```
    ///
    /// so consecutive fundings are additive and nobody is under-paid. The
    /// accumulator is rolled at the pre-update rate before the new rate is
    /// installed. `source` must hold and authorize the transfer of
    /// `reward_amount` reward tokens.
    pub fn notify_reward_amount(
        env: Env,
        caller: Address,
        reward_amount: i128,
        source: Address,
    ) -> Result<(), ContractError> {
        Self::require_active(&env)?;
        caller.require_auth();

        let distributor: Address = env
            .storage()
            .instance()
            .get(&DISTRIBUTOR)
            .ok_or(ContractError::NotInitialized)?;
        if caller != distributor {
            return Err(ContractError::Unauthorized);
        }

        if reward_amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let duration: u64 = env.storage().instance().get(&DURATION).unwrap_or(0);
        if duration == 0 {
            return Err(ContractError::InvalidInput);
        }

        let now = env.ledger().timestamp();
        let total_staked = Self::total_staked(env.clone());

        // Flush the accumulator at the old rate before adopting the new one.
        let mut state = Self::load_rewards_state(&env);
        state.roll(total_staked, now);

        let new_rate = reward_amount.saturating_add(state.leftover(now)) / duration as i128;
        if new_rate == 0 {
            // Budget too small to emit a single unit per second.
            return Err(ContractError::InvalidInput);
        }

        // Pull the budget in before the new rate takes effect.
        let reward_token: Address = env
            .storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        token::Client::new(&env, &reward_token).transfer(
            &source,
            &env.current_contract_address(),
            &reward_amount,
        );

        state.reward_per_second = new_rate;
        state.period_finish = now.saturating_add(duration);
        state.updated_at = now;
        env.storage().instance().set(&REWARDS_STATE, &state);

        events::publish_reward_added(&env, reward_amount, state.period_finish);

        Ok(())
    }

    /// Change the default period length. Owner-only, rejected while a period
    /// is still running. No event when unchanged.
    pub fn set_rewards_duration(
        env: Env,
        caller: Address,
        new_duration: u64,
    ) -> Result<(), ContractError> {
        Self::require_active(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if new_duration == 0 {
            return Err(ContractError::InvalidInput);
        }

        let state = Self::load_rewards_state(&env);
        if env.ledger().timestamp() < state.period_finish {
            return Err(ContractError::RewardPeriodNotFinished);
        }

        let old_duration: u64 = env.storage().instance().get(&DURATION).unwrap_or(0);
        if new_duration == old_duration {
            return Ok(());
        }

        env.storage().instance().set(&DURATION, &new_duration);
        events::publish_rewards_duration_updated(&env, new_duration);

        Ok(())
    }

    /// Replace the funding identity. Owner-only. No event when unchanged.
    pub fn set_rewards_distributor(
        env: Env,
        caller: Address,
        new_distributor: Address,
    ) -> Result<(), ContractError> {
        Self::require_active(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let old_distributor: Address = env
            .storage()
            .instance()
            .get(&DISTRIBUTOR)
            .ok_or(ContractError::NotInitialized)?;
        if new_distributor == old_distributor {
            return Ok(());
        }

        env.storage().instance().set(&DISTRIBUTOR, &new_distributor);
        events::publish_rewards_distributor_changed(&env, old_distributor, new_distributor);

        Ok(())
    }

    /// Point the hook at the stake ledger whose balance changes drive
    /// accounting. Owner-only; the first assignment and later overrides carry
    /// no extra invariant beyond ownership. No event when unchanged.
    pub fn set_staking_token(
        env: Env,
        caller: Address,
        new_token: Address,
    ) -> Result<(), ContractError> {
        Self::require_active(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let old_token: Option<Address> = env.storage().instance().get(&STAKING_TOKEN);
        if old_token.as_ref() == Some(&new_token) {
            return Ok(());
        }

        env.storage().instance().set(&STAKING_TOKEN, &new_token);
        events::publish_staking_token_changed(&env, old_token, new_token);

        Ok(())
    }

    /// Move the end of the running period. Owner-only.
    ///
    /// Rolls the accumulator first so rewards emitted up to now are locked
    /// in; setting a timestamp in the past stops further emission
    /// immediately.
    pub fn update_period_finish(
        env: Env,
        caller: Address,
        timestamp: u64,
    ) -> Result<(), ContractError> {
        Self::require_active(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let total_staked = Self::total_staked(env.clone());
        let mut state = Self::load_rewards_state(&env);
        state.roll(total_staked, env.ledger().timestamp());
        state.period_finish = timestamp;
        // Keep updated_at <= period_finish so no negative window can form.
        state.updated_at = state.updated_at.min(timestamp);
        env.storage().instance().set(&REWARDS_STATE, &state);

        Ok(())
    }

    /// Sweep `amount` of any token held by the controller to the owner.
    /// Owner-only; used for stuck-asset recovery and orthogonal to the
    /// reward accounting.
    pub fn recover_tokens(
        env: Env,
        caller: Address,
        token: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_active(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &caller,
            &amount,
        );

        events::publish_recovered(&env, token, amount);

        Ok(())
    }

    // ── Stake hook ──────────────────────────────────────────────────────────

    /// Balance-change notification from the stake ledger.
    ///
    /// Checkpoints `depositor` using the pre-change stake and total, then
    /// records the post-change values for later views and claims. Emits
    /// `RewardsAccrued` only when the newly accrued delta is non-zero.
    ///
    /// Callers other than the configured staking token are a silent no-op,
    /// as is the version-1 stub: the hook must never be able to block the
    /// ledger's own transfers. This loud-owner/silent-hook asymmetry is
    /// intentional.
    pub fn handle_action(
        env: Env,
        caller: Address,
        depositor: Address,
        stake_before: i128,
        stake_after: i128,
        total_staked_before: i128,
        total_staked_after: i128,
    ) {
        caller.require_auth();

        if versioning::current(&env) < VERSION_ACTIVE {
            return;
        }
        let staking_token: Option<Address> = env.storage().instance().get(&STAKING_TOKEN);
        if staking_token != Some(caller) {
            return;
        }

        let delta = Self::checkpoint_depositor(&env, &depositor, total_staked_before, stake_before);

        env.storage()
            .instance()
            .set(&TOTAL_STAKED, &total_staked_after);
        Self::write_user_i128(&env, USER_STAKE, &depositor, stake_after);

        if delta > 0 {
            events::publish_rewards_accrued(&env, depositor, delta);
        }
    }

    // ── Claims & views ──────────────────────────────────────────────────────

    /// Pay out everything `depositor` has accrued, up to the instant of the
    /// call, and reset their balance to zero. Returns the amount paid.
    pub fn claim_reward(env: Env, depositor: Address) -> Result<i128, ContractError> {
        Self::require_active(&env)?;
        depositor.require_auth();

        let total_staked = Self::total_staked(env.clone());
        let stake = Self::staked_balance(env.clone(), depositor.clone());
        Self::checkpoint_depositor(&env, &depositor, total_staked, stake);

        let amount = Self::read_user_i128(&env, USER_ACCRUED, &depositor);
        if amount <= 0 {
            // Nothing owed — return without failing.
            return Ok(0);
        }

        Self::write_user_i128(&env, USER_ACCRUED, &depositor, 0);

        let reward_token: Address = env
            .storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        token::Client::new(&env, &reward_token).transfer(
            &env.current_contract_address(),
            &depositor,
            &amount,
        );

        events::publish_reward_claimed(&env, depositor, amount);

        Ok(amount)
    }

    /// Real-time reward owed to `depositor`, without mutating state.
    /// Reports 0 while the contract is still the version-1 stub.
    pub fn earned(env: Env, depositor: Address) -> i128 {
        if versioning::current(&env) < VERSION_ACTIVE {
            return 0;
        }

        let state = Self::load_rewards_state(&env);
        let total_staked = Self::total_staked(env.clone());
        let current_rpt = state.reward_per_token(total_staked, env.ledger().timestamp());

        let stake = Self::read_user_i128(&env, USER_STAKE, &depositor);
        let rpt_paid = Self::read_user_i128(&env, USER_RPT_PAID, &depositor);
        let accrued = Self::read_user_i128(&env, USER_ACCRUED, &depositor);

        rewards::earned(stake, current_rpt, rpt_paid, accrued)
    }

    pub fn rewards_distributor(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&DISTRIBUTOR)
            .ok_or(ContractError::NotInitialized)
    }

    /// The configured stake ledger, `None` while unset.
    pub fn staking_token(env: Env) -> Option<Address> {
        env.storage().instance().get(&STAKING_TOKEN)
    }

    pub fn rewards_duration(env: Env) -> u64 {
        env.storage().instance().get(&DURATION).unwrap_or(0)
    }

    pub fn period_finish(env: Env) -> u64 {
        Self::load_rewards_state(&env).period_finish
    }

    pub fn reward_per_second(env: Env) -> i128 {
        Self::load_rewards_state(&env).reward_per_second
    }

    /// Full accounting snapshot, mainly for off-chain inspection.
    pub fn rewards_state(env: Env) -> RewardsState {
        Self::load_rewards_state(&env)
    }

    pub fn is_period_finished(env: Env) -> bool {
        env.ledger().timestamp() >= Self::load_rewards_state(&env).period_finish
    }

    /// Total stake as last reported by the ledger.
    pub fn total_staked(env: Env) -> i128 {
        env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
    }

    /// `depositor`'s stake as last reported by the ledger.
    pub fn staked_balance(env: Env, depositor: Address) -> i128 {
        Self::read_user_i128(&env, USER_STAKE, &depositor)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: fail unless the active (version >= 2) behaviour is installed.
    fn require_active(env: &Env) -> Result<(), ContractError> {
        if versioning::current(env) < VERSION_ACTIVE {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: fail if `caller` is not the stored owner.
    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        match ownable::owner(env) {
            None => Err(ContractError::NotInitialized),
            Some(owner) if owner == *caller => Ok(()),
            Some(_) => Err(ContractError::Unauthorized),
        }
    }

    fn load_rewards_state(env: &Env) -> RewardsState {
        env.storage()
            .instance()
            .get(&REWARDS_STATE)
            .unwrap_or(RewardsState::empty())
    }

    /// Roll the global accumulator, then fold the depositor's newly earned
    /// amount into their accrued balance and re-snapshot their checkpoint.
    /// Returns the newly accrued delta.
    ///
    /// `total_staked` and `stake` are the values the elapsed window actually
    /// applied to — the pre-change values during a balance change.
    fn checkpoint_depositor(
        env: &Env,
        depositor: &Address,
        total_staked: i128,
        stake: i128,
    ) -> i128 {
        let mut state = Self::load_rewards_state(env);
        state.roll(total_staked, env.ledger().timestamp());
        env.storage().instance().set(&REWARDS_STATE, &state);

        let rpt_paid = Self::read_user_i128(env, USER_RPT_PAID, depositor);
        let accrued = Self::read_user_i128(env, USER_ACCRUED, depositor);

        let new_accrued = rewards::earned(
            stake,
            state.accumulated_reward_per_token,
            rpt_paid,
            accrued,
        );
        let delta = new_accrued.saturating_sub(accrued);

        Self::write_user_i128(env, USER_ACCRUED, depositor, new_accrued);
        Self::write_user_i128(
            env,
            USER_RPT_PAID,
            depositor,
            state.accumulated_reward_per_token,
        );

        delta
    }

    fn read_user_i128(env: &Env, prefix: Symbol, depositor: &Address) -> i128 {
        let key = (prefix, depositor.clone());
        let value: Option<i128> = env.storage().persistent().get(&key);
        match value {
            Some(v) => {
                env.storage()
                    .persistent()
                    .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
                v
            }
            None => 0,
        }
    }

    fn write_user_i128(env: &Env, prefix: Symbol, depositor: &Address, value: i128) {
        let key = (prefix, depositor.clone());
        env.storage().persistent().set(&key, &value);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
