use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Storage keys ─────────────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");

// ── Core functions ───────────────────────────────────────────────────────────

/// Stores `owner` as the single privileged address.
/// Only callable internally — callers must verify authorization beforehand.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
}

/// Returns the stored owner, or `None` before initialization.
pub fn owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OWNER)
}

/// Returns true if `who` is the stored owner.
///
/// Returns `false` both for a non-owner caller and for an uninitialized
/// contract; callers that need to distinguish the two should check
/// [`owner`] first.
pub fn is_owner(env: &Env, who: &Address) -> bool {
    match owner(env) {
        Some(current) => current == *who,
        None => false,
    }
}
