use soroban_sdk::{Env, IntoVal, Val};

/// Remaining-ledger threshold below which a touched entry is extended.
pub const TTL_THRESHOLD: u32 = 17_280; // ~1 day
/// Ledger count an entry is extended to once it drops below the threshold.
pub const TTL_EXTEND_TO: u32 = 518_400; // ~30 days

/// Extend the contract instance (and with it every instance-storage key).
pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Extend a persistent entry that is known to exist.
pub fn bump_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
