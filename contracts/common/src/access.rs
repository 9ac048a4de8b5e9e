use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::ttl;

// ── Storage Keys ─────────────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");
const FEE_RECIPIENT: Symbol = symbol_short!("FEE_ADDR");
const DEV_RECIPIENT: Symbol = symbol_short!("DEV_ADDR");
const OPERATOR: Symbol = symbol_short!("OPERATOR");
const SELF_CALL: Symbol = symbol_short!("SELF_CALL");

// ── Capability Enum ──────────────────────────────────────────────────────────

/// Privileged identities a guarded entry point can demand.
///
/// - `Owner`        – the contract's administrator (a person at bootstrap,
///                    the timelock once ownership has been handed over).
/// - `PendingOwner` – the address nominated by a two-step ownership transfer.
/// - `FeeRecipient` – receives deposit fees; only it may name its successor.
/// - `DevRecipient` – receives the developer share of emissions; only it may
///                    name its successor.
/// - `Operator`     – any address the owner has flagged as an operator.
/// - `SelfCall`     – the contract itself, while it is executing one of its
///                    own queued transactions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Capability {
    Owner,
    PendingOwner,
    FeeRecipient,
    DevRecipient,
    Operator,
    SelfCall,
}

impl Capability {
    /// Instance-storage key holding the single address for this capability.
    ///
    /// `Operator` and `SelfCall` are not single-holder capabilities.
    fn holder_key(&self) -> Option<Symbol> {
        match self {
            Capability::Owner => Some(OWNER),
            Capability::PendingOwner => Some(PENDING_OWNER),
            Capability::FeeRecipient => Some(FEE_RECIPIENT),
            Capability::DevRecipient => Some(DEV_RECIPIENT),
            Capability::Operator | Capability::SelfCall => None,
        }
    }
}

// ── Holders ──────────────────────────────────────────────────────────────────

/// Returns the address currently holding `cap`, if any.
pub fn holder(env: &Env, cap: Capability) -> Option<Address> {
    let key = cap.holder_key()?;
    env.storage().instance().get(&key)
}

/// Assigns `cap` to `who`. Callers must verify authorization beforehand.
pub fn set_holder(env: &Env, cap: Capability, who: &Address) {
    if let Some(key) = cap.holder_key() {
        env.storage().instance().set(&key, who);
    }
}

/// Clears the holder of `cap`.
pub fn clear_holder(env: &Env, cap: Capability) {
    if let Some(key) = cap.holder_key() {
        env.storage().instance().remove(&key);
    }
}

// ── Operators ────────────────────────────────────────────────────────────────

fn operator_key(who: &Address) -> (Symbol, Address) {
    (OPERATOR, who.clone())
}

/// Grants or revokes the operator flag for `who`.
pub fn set_operator(env: &Env, who: &Address, enabled: bool) {
    let key = operator_key(who);
    if enabled {
        env.storage().persistent().set(&key, &true);
        ttl::bump_persistent(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn is_operator(env: &Env, who: &Address) -> bool {
    let key = operator_key(who);
    let flagged: bool = env.storage().persistent().get(&key).unwrap_or(false);
    if flagged {
        ttl::bump_persistent(env, &key);
    }
    flagged
}

// ── Self calls ───────────────────────────────────────────────────────────────

/// Marks the start of a call the contract makes into its own entry points.
///
/// The flag only ever lives for the duration of one invocation: a failing
/// invocation reverts it together with everything else.
pub fn enter_self_call(env: &Env) {
    env.storage().instance().set(&SELF_CALL, &true);
}

pub fn exit_self_call(env: &Env) {
    env.storage().instance().remove(&SELF_CALL);
}

fn self_call_active(env: &Env) -> bool {
    env.storage().instance().get(&SELF_CALL).unwrap_or(false)
}

// ── Guard ────────────────────────────────────────────────────────────────────

/// Returns `true` if `caller` holds `cap`.
///
/// The caller must already have been authenticated via `require_auth()`;
/// this only answers whether the authenticated address is the right one.
pub fn has_capability(env: &Env, caller: &Address, cap: Capability) -> bool {
    match cap {
        Capability::Operator => is_operator(env, caller),
        Capability::SelfCall => {
            *caller == env.current_contract_address() && self_call_active(env)
        }
        _ => holder(env, cap).is_some_and(|h| h == *caller),
    }
}
