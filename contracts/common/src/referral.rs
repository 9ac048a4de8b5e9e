use soroban_sdk::{contractclient, Address, Env};

/// Entry points of the referral ledger that the farm calls.
///
/// The farm must be registered as an operator on the ledger; every mutating
/// call passes the farm's own address as `caller`.
#[contractclient(name = "ReferralClient")]
pub trait ReferralInterface {
    /// Records `referrer` for `user` unless `user` already has one, the pair
    /// is a self-referral, or `caller` is not an operator (the latter fails).
    fn record_referral(env: Env, caller: Address, user: Address, referrer: Address);

    /// Adds `amount` to the running commission total of `referrer`.
    fn record_commission(env: Env, caller: Address, referrer: Address, amount: i128);

    /// Returns the referrer recorded for `user`, if any.
    fn get_referrer(env: Env, user: Address) -> Option<Address>;
}
