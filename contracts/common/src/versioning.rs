use soroban_sdk::{symbol_short, Env, Symbol};

// ── Storage keys ─────────────────────────────────────────────────────────────

const VERSION: Symbol = symbol_short!("VERSION");

// ── Types ────────────────────────────────────────────────────────────────────

/// Why a version transition was refused.
///
/// `Replay` covers both re-initializing the current version and moving
/// backwards; `Skip` covers jumping more than one version ahead.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VersionError {
    Replay,
    Skip,
}

// ── Core functions ───────────────────────────────────────────────────────────

/// Returns the initialized version, 0 when the slot was never written.
pub fn current(env: &Env) -> u32 {
    env.storage().instance().get(&VERSION).unwrap_or(0)
}

/// Moves the version slot to `target`.
///
/// The slot only ever moves forward, by exactly one. A second attempt at the
/// same version fails with [`VersionError::Replay`], a jump past
/// `current + 1` with [`VersionError::Skip`].
pub fn advance_to(env: &Env, target: u32) -> Result<(), VersionError> {
    let cur = current(env);
    if target <= cur {
        return Err(VersionError::Replay);
    }
    if target != cur + 1 {
        return Err(VersionError::Skip);
    }
    env.storage().instance().set(&VERSION, &target);
    Ok(())
}
