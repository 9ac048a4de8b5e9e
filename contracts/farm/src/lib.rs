#![no_std]

pub mod commission;
pub mod emission;
pub mod events;
pub mod pool;

use common::access::{self, Capability};
use common::{math, ttl};
use soroban_sdk::{contract, contractimpl, log, symbol_short, token, Address, Env, Symbol};

pub use commission::{DEFAULT_REFERRAL_COMMISSION_BP, MAX_REFERRAL_COMMISSION_BP};
pub use emission::{EmissionParams, EmissionState};
pub use pool::{Accrual, PoolRecord, UserStake, DEV_FEE_DIVISOR};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const START_HEIGHT: Symbol = symbol_short!("START");
const LOCKED: Symbol = symbol_short!("LOCKED");

/// Hard ceiling on a pool's deposit fee (10 %).
pub const MAX_DEPOSIT_FEE_BP: u32 = 1_000;

/// How far ahead of the current ledger the start height may be moved
/// (30 days of 5-second ledgers).
pub const MAX_START_LEAD: u32 = 518_400;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Caller is not the owner.
    Unauthorized = 10,
    NotPendingAdmin = 11,
    NotFeeRecipient = 12,
    NotDevRecipient = 13,
    InvalidInput = 30,
    /// A fee, rate or schedule parameter is outside its allowed range.
    InvalidParameter = 31,
    /// No pool exists at the given index.
    OutOfRange = 32,
    PoolExists = 33,
    NoPendingAdmin = 34,
    /// Withdrawal exceeds the recorded stake.
    InsufficientBalance = 40,
    FarmingStarted = 41,
    EmissionFloorReached = 50,
    Reentrancy = 60,
    Overflow = 61,
}

// ── Accrual context ──────────────────────────────────────────────────────────

/// Everything accrual needs besides the pool itself, read once per call.
struct AccrualContext {
    reward_token: Address,
    dev_recipient: Address,
    rate: i128,
    total_weight: u32,
}

impl AccrualContext {
    fn load(env: &Env) -> Result<Self, ContractError> {
        Ok(Self {
            reward_token: env
                .storage()
                .instance()
                .get(&REWARD_TOKEN)
                .ok_or(ContractError::NotInitialized)?,
            dev_recipient: access::holder(env, Capability::DevRecipient)
                .ok_or(ContractError::NotInitialized)?,
            rate: emission::load(env)?.rate,
            total_weight: pool::total_weight(env),
        })
    }

    fn accrue(&self, env: &Env, pool: &mut PoolRecord) -> Result<Accrual, ContractError> {
        pool::accrue(
            env,
            pool,
            &self.reward_token,
            &self.dev_recipient,
            self.rate,
            self.total_weight,
        )
    }
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct FarmContract;

#[contractimpl]
impl FarmContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the farm.
    ///
    /// * `reward_token` – SAC address of the reward asset; the farm must be
    ///   (or become) its admin so it can mint.
    /// * `dev_address`  – receives an extra 10 % of every pool reward.
    /// * `fee_address`  – receives deposit fees.
    /// * `start_height` – first ledger that earns rewards.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        dev_address: Address,
        fee_address: Address,
        start_height: u32,
        params: EmissionParams,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        params.validate()?;

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&START_HEIGHT, &start_height);
        access::set_holder(&env, Capability::Owner, &admin);
        access::set_holder(&env, Capability::DevRecipient, &dev_address);
        access::set_holder(&env, Capability::FeeRecipient, &fee_address);
        emission::store(&env, &EmissionState::new(&params, start_height));
        ttl::bump_instance(&env);

        events::publish_initialized(&env, admin, reward_token, start_height, params.initial_rate);

        Ok(())
    }

    // ── Pool registry ───────────────────────────────────────────────────────

    /// Register a new pool for `stake_token`. Returns its index.
    pub fn add_pool(
        env: Env,
        caller: Address,
        weight: u32,
        stake_token: Address,
        deposit_fee_bp: u32,
        with_update: bool,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_capability(&env, &caller, Capability::Owner)?;

        if deposit_fee_bp > MAX_DEPOSIT_FEE_BP {
            return Err(ContractError::InvalidParameter);
        }
        if pool::has_pool_for(&env, &stake_token) {
            return Err(ContractError::PoolExists);
        }
        if with_update {
            Self::update_all(&env)?;
        }

        let start: u32 = env.storage().instance().get(&START_HEIGHT).unwrap_or(0);
        let total_weight = pool::total_weight(&env)
            .checked_add(weight)
            .ok_or(ContractError::Overflow)?;
        pool::set_total_weight(&env, total_weight);

        let record = PoolRecord {
            stake_token: stake_token.clone(),
            weight,
            last_reward_height: env.ledger().sequence().max(start),
            acc_reward_per_share: 0,
            deposit_fee_bp,
            total_staked: 0,
        };
        let pid = pool::push_pool(&env, &record);
        ttl::bump_instance(&env);

        events::publish_pool_added(&env, pid, stake_token, weight, deposit_fee_bp, total_weight);

        Ok(pid)
    }

    /// Change a pool's weight and deposit fee.
    pub fn set_pool(
        env: Env,
        caller: Address,
        pid: u32,
        weight: u32,
        deposit_fee_bp: u32,
        with_update: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_capability(&env, &caller, Capability::Owner)?;

        if deposit_fee_bp > MAX_DEPOSIT_FEE_BP {
            return Err(ContractError::InvalidParameter);
        }
        // Existence check before any accrual side effects.
        pool::load_pool(&env, pid)?;
        if with_update {
            Self::update_all(&env)?;
        }

        let mut record = pool::load_pool(&env, pid)?;
        let total_weight = pool::total_weight(&env)
            .checked_sub(record.weight)
            .and_then(|rest| rest.checked_add(weight))
            .ok_or(ContractError::Overflow)?;
        pool::set_total_weight(&env, total_weight);

        record.weight = weight;
        record.deposit_fee_bp = deposit_fee_bp;
        pool::store_pool(&env, pid, &record);

        events::publish_pool_set(&env, pid, weight, deposit_fee_bp, total_weight);

        Ok(())
    }

    /// Bring one pool's accumulator up to the current ledger.
    pub fn update_pool(env: Env, pid: u32) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        let ctx = AccrualContext::load(&env)?;
        let mut record = pool::load_pool(&env, pid)?;
        ctx.accrue(&env, &mut record)?;
        pool::store_pool(&env, pid, &record);
        Ok(())
    }

    /// Bring every pool's accumulator up to the current ledger.
    pub fn mass_update_pools(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::update_all(&env)
    }

    // ── Deposits and withdrawals ────────────────────────────────────────────

    /// Stake `amount` of the pool's token, harvesting any pending reward.
    ///
    /// A zero `amount` is a pure harvest. The stake is credited with what the
    /// farm actually received, minus the pool's deposit fee. Returns the
    /// credited amount.
    pub fn deposit(
        env: Env,
        user: Address,
        pid: u32,
        amount: i128,
        referrer: Option<Address>,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        Self::lock(&env)?;
        let credited = Self::deposit_locked(&env, &user, pid, amount, &referrer)?;
        Self::unlock(&env);

        Ok(credited)
    }

    /// Unstake `amount`, harvesting any pending reward. Returns the reward paid.
    pub fn withdraw(
        env: Env,
        user: Address,
        pid: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        Self::lock(&env)?;
        let harvested = Self::withdraw_locked(&env, &user, pid, amount)?;
        Self::unlock(&env);

        Ok(harvested)
    }

    /// Return the whole stake without settling rewards. Pending reward is
    /// forfeited. Returns the amount sent back.
    pub fn emergency_withdraw(env: Env, user: Address, pid: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        Self::lock(&env)?;
        let mut record = pool::load_pool(&env, pid)?;
        let stake = pool::load_user(&env, pid, &user);
        let amount = stake.amount;

        // Zero the position before the tokens leave.
        record.total_staked = record
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::Overflow)?;
        pool::store_pool(&env, pid, &record);
        pool::store_user(&env, pid, &user, &UserStake::default());

        if amount > 0 {
            token::Client::new(&env, &record.stake_token).transfer(
                &env.current_contract_address(),
                &user,
                &amount,
            );
        }
        Self::unlock(&env);

        events::publish_emergency_withdraw(&env, user, pid, amount);

        Ok(amount)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `user` could harvest from `pid` right now.
    ///
    /// Accrual is projected in memory only; repeated queries within a ledger
    /// agree with each other and with what the next real accrual pays.
    pub fn pending_reward(env: Env, pid: u32, user: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        let record = pool::load_pool(&env, pid)?;
        let rate = emission::load(&env)?.rate;
        let (acc, _) = pool::project(
            &record,
            env.ledger().sequence(),
            rate,
            pool::total_weight(&env),
        )?;
        pool::load_user(&env, pid, &user).pending(acc)
    }

    pub fn get_pool(env: Env, pid: u32) -> Result<PoolRecord, ContractError> {
        pool::load_pool(&env, pid)
    }

    pub fn pool_length(env: Env) -> u32 {
        pool::pool_count(&env)
    }

    pub fn get_user_stake(env: Env, pid: u32, user: Address) -> UserStake {
        pool::load_user(&env, pid, &user)
    }

    pub fn total_weight(env: Env) -> u32 {
        pool::total_weight(&env)
    }

    pub fn get_emission(env: Env) -> Result<EmissionState, ContractError> {
        emission::load(&env)
    }

    /// Minted reward still held by the farm for stakers.
    pub fn reward_reserve(env: Env) -> i128 {
        pool::reward_reserve(&env)
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn get_start_height(env: Env) -> Result<u32, ContractError> {
        env.storage()
            .instance()
            .get(&START_HEIGHT)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn get_fee_address(env: Env) -> Result<Address, ContractError> {
        access::holder(&env, Capability::FeeRecipient).ok_or(ContractError::NotInitialized)
    }

    pub fn get_dev_address(env: Env) -> Result<Address, ContractError> {
        access::holder(&env, Capability::DevRecipient).ok_or(ContractError::NotInitialized)
    }

    pub fn get_referral_contract(env: Env) -> Option<Address> {
        commission::contract(&env)
    }

    pub fn get_referral_rate(env: Env) -> u32 {
        commission::rate(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        access::holder(&env, Capability::Owner).ok_or(ContractError::NotInitialized)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_capability(&env, &current_admin, Capability::Owner)?;

        access::set_holder(&env, Capability::PendingOwner, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed new admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        if access::holder(&env, Capability::PendingOwner).is_none() {
            return Err(ContractError::NoPendingAdmin);
        }
        Self::require_capability(&env, &new_admin, Capability::PendingOwner)?;

        let old_admin =
            access::holder(&env, Capability::Owner).ok_or(ContractError::NotInitialized)?;
        access::set_holder(&env, Capability::Owner, &new_admin);
        access::clear_holder(&env, Capability::PendingOwner);

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_capability(&env, &current_admin, Capability::Owner)?;

        let pending = access::holder(&env, Capability::PendingOwner)
            .ok_or(ContractError::NoPendingAdmin)?;
        access::clear_holder(&env, Capability::PendingOwner);

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        access::holder(&env, Capability::PendingOwner)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Hand the deposit-fee role to `new_address`. Only the current fee
    /// recipient may do this.
    pub fn set_fee_address(
        env: Env,
        caller: Address,
        new_address: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_capability(&env, &caller, Capability::FeeRecipient)?;

        access::set_holder(&env, Capability::FeeRecipient, &new_address);

        events::publish_fee_address_set(&env, Some(caller), new_address);

        Ok(())
    }

    /// Hand the dev-fee role to `new_address`. Only the current dev recipient
    /// may do this.
    pub fn set_dev_address(
        env: Env,
        caller: Address,
        new_address: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_capability(&env, &caller, Capability::DevRecipient)?;

        access::set_holder(&env, Capability::DevRecipient, &new_address);

        events::publish_dev_address_set(&env, Some(caller), new_address);

        Ok(())
    }

    /// Point the farm at a referral ledger. The farm must be registered as an
    /// operator there before deposits with a referrer will succeed.
    pub fn set_referral_contract(
        env: Env,
        caller: Address,
        referral_contract: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_capability(&env, &caller, Capability::Owner)?;

        let previous = commission::contract(&env);
        commission::set_contract(&env, &referral_contract);

        events::publish_referral_contract_set(&env, previous, referral_contract);

        Ok(())
    }

    /// Set the share of harvested reward paid to referrers, in basis points.
    pub fn set_referral_rate(env: Env, caller: Address, rate_bp: u32) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_capability(&env, &caller, Capability::Owner)?;

        commission::set_rate(&env, rate_bp)?;

        events::publish_referral_rate_set(&env, rate_bp);

        Ok(())
    }

    /// Move the farming start to `new_start`. Only allowed before farming has
    /// started, and no further out than `MAX_START_LEAD` ledgers.
    pub fn update_start_height(
        env: Env,
        caller: Address,
        new_start: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_capability(&env, &caller, Capability::Owner)?;

        let now = env.ledger().sequence();
        let previous: u32 = env.storage().instance().get(&START_HEIGHT).unwrap_or(0);
        if now >= previous {
            return Err(ContractError::FarmingStarted);
        }
        if new_start <= now || new_start > now.saturating_add(MAX_START_LEAD) {
            return Err(ContractError::InvalidParameter);
        }

        for pid in 0..pool::pool_count(&env) {
            let mut record = pool::load_pool(&env, pid)?;
            record.last_reward_height = new_start;
            pool::store_pool(&env, pid, &record);
        }

        let mut state = emission::load(&env)?;
        state.last_reduction_height = new_start;
        emission::store(&env, &state);
        env.storage().instance().set(&START_HEIGHT, &new_start);

        events::publish_start_height_set(&env, previous, new_start);

        Ok(())
    }

    /// Apply one emission-rate reduction if a full period has elapsed.
    ///
    /// Every pool is accrued at the old rate first. Returns the rate in force
    /// afterwards; fails with `EmissionFloorReached` once the floor is hit.
    pub fn update_emission_rate(env: Env, caller: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_capability(&env, &caller, Capability::Owner)?;

        Self::update_all(&env)?;

        let mut state = emission::load(&env)?;
        let previous = state.rate;
        if state.reduce(env.ledger().sequence())? {
            emission::store(&env, &state);
            log!(&env, "emission rate reduced from {} to {}", previous, state.rate);
            events::publish_emission_rate_updated(&env, previous, state.rate);
        }

        Ok(state.rate)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        ttl::bump_instance(env);
        Ok(())
    }

    /// Guard: revert unless `caller` holds `cap`. Each capability maps to its
    /// own error so the missing role is visible to the caller.
    fn require_capability(
        env: &Env,
        caller: &Address,
        cap: Capability,
    ) -> Result<(), ContractError> {
        if access::has_capability(env, caller, cap) {
            return Ok(());
        }
        Err(match cap {
            Capability::PendingOwner => ContractError::NotPendingAdmin,
            Capability::FeeRecipient => ContractError::NotFeeRecipient,
            Capability::DevRecipient => ContractError::NotDevRecipient,
            _ => ContractError::Unauthorized,
        })
    }

    fn lock(env: &Env) -> Result<(), ContractError> {
        if env.storage().instance().has(&LOCKED) {
            return Err(ContractError::Reentrancy);
        }
        env.storage().instance().set(&LOCKED, &true);
        Ok(())
    }

    fn unlock(env: &Env) {
        env.storage().instance().remove(&LOCKED);
    }

    fn update_all(env: &Env) -> Result<(), ContractError> {
        let ctx = AccrualContext::load(env)?;
        for pid in 0..pool::pool_count(env) {
            let mut record = pool::load_pool(env, pid)?;
            ctx.accrue(env, &mut record)?;
            pool::store_pool(env, pid, &record);
        }
        Ok(())
    }

    /// Deposit body; runs with the reentrancy lock held.
    ///
    /// State is written in full before each external call: the settlement is
    /// persisted before the harvest transfer, and the credited stake before
    /// the fee leaves.
    fn deposit_locked(
        env: &Env,
        user: &Address,
        pid: u32,
        amount: i128,
        referrer: &Option<Address>,
    ) -> Result<i128, ContractError> {
        let ctx = AccrualContext::load(env)?;
        let mut record = pool::load_pool(env, pid)?;
        ctx.accrue(env, &mut record)?;

        let mut stake = pool::load_user(env, pid, user);
        let harvested = stake.pending(record.acc_reward_per_share)?;
        stake.settle(record.acc_reward_per_share)?;
        pool::store_pool(env, pid, &record);
        pool::store_user(env, pid, user, &stake);

        pool::pay_reward(env, &ctx.reward_token, user, harvested)?;

        let mut received = 0;
        let mut fee = 0;
        let mut credited = 0;
        if amount > 0 {
            commission::record(env, user, referrer);

            let this = env.current_contract_address();
            let stake_token = token::Client::new(env, &record.stake_token);
            let before = stake_token.balance(&this);
            stake_token.transfer(user, &this, &amount);
            received = stake_token
                .balance(&this)
                .checked_sub(before)
                .ok_or(ContractError::Overflow)?;
            if received < 0 {
                return Err(ContractError::InvalidInput);
            }

            fee = math::bps_of(received, record.deposit_fee_bp).ok_or(ContractError::Overflow)?;
            credited = received - fee;

            stake.amount = stake
                .amount
                .checked_add(credited)
                .ok_or(ContractError::Overflow)?;
            stake.settle(record.acc_reward_per_share)?;
            record.total_staked = record
                .total_staked
                .checked_add(credited)
                .ok_or(ContractError::Overflow)?;
            pool::store_pool(env, pid, &record);
            pool::store_user(env, pid, user, &stake);

            if fee > 0 {
                let fee_recipient = access::holder(env, Capability::FeeRecipient)
                    .ok_or(ContractError::NotInitialized)?;
                stake_token.transfer(&this, &fee_recipient, &fee);
            }
        }

        commission::pay_commission(env, &ctx.reward_token, user, harvested)?;

        events::publish_deposit(env, user.clone(), pid, amount, received, fee, harvested);

        Ok(credited)
    }

    /// Withdraw body; runs with the reentrancy lock held.
    fn withdraw_locked(
        env: &Env,
        user: &Address,
        pid: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        let mut record = pool::load_pool(env, pid)?;
        let mut stake = pool::load_user(env, pid, user);
        if amount > stake.amount {
            return Err(ContractError::InsufficientBalance);
        }

        let ctx = AccrualContext::load(env)?;
        ctx.accrue(env, &mut record)?;

        let harvested = stake.pending(record.acc_reward_per_share)?;
        stake.amount -= amount;
        stake.settle(record.acc_reward_per_share)?;
        record.total_staked = record
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::Overflow)?;
        pool::store_pool(env, pid, &record);
        pool::store_user(env, pid, user, &stake);

        let paid = pool::pay_reward(env, &ctx.reward_token, user, harvested)?;
        commission::pay_commission(env, &ctx.reward_token, user, harvested)?;

        if amount > 0 {
            token::Client::new(env, &record.stake_token).transfer(
                &env.current_contract_address(),
                user,
                &amount,
            );
        }

        events::publish_withdraw(env, user.clone(), pid, amount, paid);

        Ok(paid)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;


#[cfg(test)]
mod test_referral;
