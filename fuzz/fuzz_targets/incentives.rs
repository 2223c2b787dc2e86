#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::{Address, Env};

use incentives::{IncentivesController, IncentivesControllerClient};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, amount: u32 },
    Withdraw { user: u8, amount: u32 },
    Claim { user: u8 },
    Notify { amount: u32 },
    SetDuration { duration: u32 },
    AdvanceTime { seconds: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(IncentivesController, ());
    let client = IncentivesControllerClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    let distributor = Address::generate(&env);
    let staking_token = Address::generate(&env);
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let _ = client.try_initialize(&owner);
    let _ = client.try_activate(&owner, &reward_token, &distributor, &3_600u64);
    let _ = client.try_set_staking_token(&owner, &staking_token);

    let mut users = Vec::new();
    for _ in 0..4 {
        users.push(Address::generate(&env));
    }
    // Mirror of the external ledger: (stake per user, total staked).
    let mut stakes = vec![0i128; users.len()];
    let mut total: i128 = 0;
    let mut now: u64 = 0;

    // Replay arbitrary action sequences looking for unhandled panics
    // (overflow, broken invariants in the accumulator math).
    for action in actions {
        match action {
            FuzzAction::Deposit { user, amount } => {
                let i = user as usize % users.len();
                let amount = amount as i128;
                client.handle_action(
                    &staking_token,
                    &users[i],
                    &stakes[i],
                    &(stakes[i] + amount),
                    &total,
                    &(total + amount),
                );
                stakes[i] += amount;
                total += amount;
            }
            FuzzAction::Withdraw { user, amount } => {
                let i = user as usize % users.len();
                let amount = (amount as i128).min(stakes[i]);
                client.handle_action(
                    &staking_token,
                    &users[i],
                    &stakes[i],
                    &(stakes[i] - amount),
                    &total,
                    &(total - amount),
                );
                stakes[i] -= amount;
                total -= amount;
            }
            FuzzAction::Claim { user } => {
                let i = user as usize % users.len();
                let _ = client.try_claim_reward(&users[i]);
            }
            FuzzAction::Notify { amount } => {
                // The funder holds no tokens; the transfer may fail, the
                // guards before it must not panic.
                let _ = client.try_notify_reward_amount(
                    &distributor,
                    &(amount as i128),
                    &distributor,
                );
            }
            FuzzAction::SetDuration { duration } => {
                let _ = client.try_set_rewards_duration(&owner, &(duration as u64));
            }
            FuzzAction::AdvanceTime { seconds } => {
                now = now.saturating_add(seconds as u64);
                env.ledger().set_timestamp(now);
            }
        }
    }

    // Earned amounts are always reportable without panicking.
    for user in &users {
        let _ = client.earned(user);
    }
});
