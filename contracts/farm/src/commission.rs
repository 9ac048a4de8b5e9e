//! Referral attribution and commission payout on top of the external ledger.

use common::{math, referral::ReferralClient};
use soroban_sdk::{symbol_short, token, Address, Env, Symbol};

use crate::{events, ContractError};

const REFERRAL_CONTRACT: Symbol = symbol_short!("REFERRAL");
const REFERRAL_RATE: Symbol = symbol_short!("REF_RATE");

/// Ceiling for the commission rate, in basis points.
pub const MAX_REFERRAL_COMMISSION_BP: u32 = 2_000;
pub const DEFAULT_REFERRAL_COMMISSION_BP: u32 = 200;

pub fn contract(env: &Env) -> Option<Address> {
    env.storage().instance().get(&REFERRAL_CONTRACT)
}

pub fn set_contract(env: &Env, referral: &Address) {
    env.storage().instance().set(&REFERRAL_CONTRACT, referral);
}

pub fn rate(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&REFERRAL_RATE)
        .unwrap_or(DEFAULT_REFERRAL_COMMISSION_BP)
}

pub fn set_rate(env: &Env, rate_bp: u32) -> Result<(), ContractError> {
    if rate_bp > MAX_REFERRAL_COMMISSION_BP {
        return Err(ContractError::InvalidParameter);
    }
    env.storage().instance().set(&REFERRAL_RATE, &rate_bp);
    Ok(())
}

/// Forward a referral claim to the ledger. Self-referrals and missing
/// referrers are dropped here; first-referrer-wins is the ledger's job.
pub fn record(env: &Env, user: &Address, referrer: &Option<Address>) {
    let (Some(ledger), Some(referrer)) = (contract(env), referrer.as_ref()) else {
        return;
    };
    if referrer == user {
        return;
    }
    ReferralClient::new(env, &ledger).record_referral(
        &env.current_contract_address(),
        user,
        referrer,
    );
}

/// Mint the commission owed on `settled` reward to `user`'s referrer.
/// Returns the amount minted.
pub fn pay_commission(
    env: &Env,
    reward_token: &Address,
    user: &Address,
    settled: i128,
) -> Result<i128, ContractError> {
    let rate_bp = rate(env);
    if settled <= 0 || rate_bp == 0 {
        return Ok(0);
    }
    let Some(ledger) = contract(env) else {
        return Ok(0);
    };

    let client = ReferralClient::new(env, &ledger);
    let Some(referrer) = client.get_referrer(user) else {
        return Ok(0);
    };

    let commission = math::bps_of(settled, rate_bp).ok_or(ContractError::Overflow)?;
    if commission <= 0 {
        return Ok(0);
    }

    token::StellarAssetClient::new(env, reward_token).mint(&referrer, &commission);
    client.record_commission(&env.current_contract_address(), &referrer, &commission);
    events::publish_referral_commission_paid(env, user.clone(), referrer, commission);

    Ok(commission)
}
