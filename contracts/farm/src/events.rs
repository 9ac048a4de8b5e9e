#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the farm is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub start_height: u32,
    pub initial_rate: i128,
}

/// Fired when a pool is registered.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pid: u32,
    pub stake_token: Address,
    pub weight: u32,
    pub deposit_fee_bp: u32,
    pub total_weight: u32,
}

/// Fired when a pool's weight or fee changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSetEvent {
    pub pid: u32,
    pub weight: u32,
    pub deposit_fee_bp: u32,
    pub total_weight: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub user: Address,
    pub pid: u32,
    /// Amount the user asked to move.
    pub requested: i128,
    /// Amount the farm actually received.
    pub received: i128,
    pub fee: i128,
    pub harvested: i128,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub user: Address,
    pub pid: u32,
    pub amount: i128,
    pub harvested: i128,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub user: Address,
    pub pid: u32,
    pub amount: i128,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralCommissionEvent {
    pub user: Address,
    pub referrer: Address,
    pub amount: i128,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionRateEvent {
    pub previous_rate: i128,
    pub new_rate: i128,
    pub height: u32,
}

/// Fired when one of the farm's configured addresses changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressSetEvent {
    pub previous: Option<Address>,
    pub new_address: Address,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralRateSetEvent {
    pub rate_bp: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartHeightSetEvent {
    pub previous: u32,
    pub new_start: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub admin: Address,
    pub cancelled_proposed: Address,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_token: Address,
    start_height: u32,
    initial_rate: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            start_height,
            initial_rate,
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pid: u32,
    stake_token: Address,
    weight: u32,
    deposit_fee_bp: u32,
    total_weight: u32,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pid),
        PoolAddedEvent {
            pid,
            stake_token,
            weight,
            deposit_fee_bp,
            total_weight,
        },
    );
}

pub fn publish_pool_set(env: &Env, pid: u32, weight: u32, deposit_fee_bp: u32, total_weight: u32) {
    env.events().publish(
        (symbol_short!("POOL_SET"), pid),
        PoolSetEvent {
            pid,
            weight,
            deposit_fee_bp,
            total_weight,
        },
    );
}

pub fn publish_deposit(
    env: &Env,
    user: Address,
    pid: u32,
    requested: i128,
    received: i128,
    fee: i128,
    harvested: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone()),
        DepositEvent {
            user,
            pid,
            requested,
            received,
            fee,
            harvested,
        },
    );
}

pub fn publish_withdraw(env: &Env, user: Address, pid: u32, amount: i128, harvested: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), user.clone()),
        WithdrawEvent {
            user,
            pid,
            amount,
            harvested,
        },
    );
}

pub fn publish_emergency_withdraw(env: &Env, user: Address, pid: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), user.clone()),
        EmergencyWithdrawEvent { user, pid, amount },
    );
}

pub fn publish_referral_commission_paid(env: &Env, user: Address, referrer: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("REF_PAID"), referrer.clone()),
        ReferralCommissionEvent {
            user,
            referrer,
            amount,
        },
    );
}

pub fn publish_emission_rate_updated(env: &Env, previous_rate: i128, new_rate: i128) {
    env.events().publish(
        (symbol_short!("EMIS_UPD"),),
        EmissionRateEvent {
            previous_rate,
            new_rate,
            height: env.ledger().sequence(),
        },
    );
}

pub fn publish_fee_address_set(env: &Env, previous: Option<Address>, new_address: Address) {
    env.events().publish(
        (symbol_short!("FEE_SET"),),
        AddressSetEvent {
            previous,
            new_address,
        },
    );
}

pub fn publish_dev_address_set(env: &Env, previous: Option<Address>, new_address: Address) {
    env.events().publish(
        (symbol_short!("DEV_SET"),),
        AddressSetEvent {
            previous,
            new_address,
        },
    );
}

pub fn publish_referral_contract_set(env: &Env, previous: Option<Address>, new_address: Address) {
    env.events().publish(
        (symbol_short!("REF_SET"),),
        AddressSetEvent {
            previous,
            new_address,
        },
    );
}

pub fn publish_referral_rate_set(env: &Env, rate_bp: u32) {
    env.events().publish(
        (symbol_short!("REF_RATE"),),
        ReferralRateSetEvent { rate_bp },
    );
}

pub fn publish_start_height_set(env: &Env, previous: u32, new_start: u32) {
    env.events().publish(
        (symbol_short!("START_SET"),),
        StartHeightSetEvent {
            previous,
            new_start,
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, admin: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), admin.clone()),
        AdminTransferCancelledEvent {
            admin,
            cancelled_proposed,
        },
    );
}
