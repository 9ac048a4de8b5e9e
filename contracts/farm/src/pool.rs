//! Pool registry storage and the per-pool reward accumulator.

use common::{math, ttl};
use soroban_sdk::{contracttype, symbol_short, token, Address, Env, Symbol};

use crate::ContractError;

// ── Storage keys ─────────────────────────────────────────────────────────────

const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");
const TOTAL_WEIGHT: Symbol = symbol_short!("TOT_WGHT");
const REWARD_RESERVE: Symbol = symbol_short!("RWD_RSV");

// Persistent entries use tuple keys: (prefix, pid[, user]).
const POOL: Symbol = symbol_short!("POOL");
const POOL_TOKEN: Symbol = symbol_short!("POOL_TOK");
const USER_STAKE: Symbol = symbol_short!("STK");

/// Share of every pool reward additionally minted to the dev recipient
/// (`reward / 10`, i.e. 10 %).
pub const DEV_FEE_DIVISOR: i128 = 10;

// ── Records ──────────────────────────────────────────────────────────────────

/// One incentivised stake asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolRecord {
    pub stake_token: Address,
    /// Relative share of the global emission.
    pub weight: u32,
    pub last_reward_height: u32,
    /// Reward per staked unit since inception, scaled by `PRECISION`.
    pub acc_reward_per_share: i128,
    pub deposit_fee_bp: u32,
    /// Sum of every depositor's credited amount.
    pub total_staked: i128,
}

/// A depositor's position in one pool.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserStake {
    pub amount: i128,
    /// `amount × acc_reward_per_share / PRECISION` as of the last settlement.
    pub reward_debt: i128,
}

impl UserStake {
    /// Reward accrued since the last settlement against `acc_reward_per_share`.
    pub fn pending(&self, acc_reward_per_share: i128) -> Result<i128, ContractError> {
        if self.amount == 0 {
            return Ok(0);
        }
        math::pending(self.amount, acc_reward_per_share, self.reward_debt)
            .ok_or(ContractError::Overflow)
    }

    /// Re-baselines the debt so that nothing is pending at `acc_reward_per_share`.
    pub fn settle(&mut self, acc_reward_per_share: i128) -> Result<(), ContractError> {
        self.reward_debt = math::accumulated_share(self.amount, acc_reward_per_share)
            .ok_or(ContractError::Overflow)?;
        Ok(())
    }
}

/// Outcome of advancing a pool's accumulator to the current height.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Accrual {
    /// Reward attributed to the pool's stakers.
    pub pool_reward: i128,
    /// Additional reward owed to the dev recipient.
    pub dev_reward: i128,
}

// ── Registry counters ────────────────────────────────────────────────────────

pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

pub fn total_weight(env: &Env) -> u32 {
    env.storage().instance().get(&TOTAL_WEIGHT).unwrap_or(0)
}

pub fn set_total_weight(env: &Env, weight: u32) {
    env.storage().instance().set(&TOTAL_WEIGHT, &weight);
}

pub fn reward_reserve(env: &Env) -> i128 {
    env.storage().instance().get(&REWARD_RESERVE).unwrap_or(0)
}

fn set_reward_reserve(env: &Env, reserve: i128) {
    env.storage().instance().set(&REWARD_RESERVE, &reserve);
}

// ── Pool storage ─────────────────────────────────────────────────────────────

fn pool_key(pid: u32) -> (Symbol, u32) {
    (POOL, pid)
}

fn pool_token_key(token: &Address) -> (Symbol, Address) {
    (POOL_TOKEN, token.clone())
}

pub fn has_pool_for(env: &Env, stake_token: &Address) -> bool {
    env.storage().persistent().has(&pool_token_key(stake_token))
}

/// Appends `pool` to the registry and returns its index.
pub fn push_pool(env: &Env, pool: &PoolRecord) -> u32 {
    let pid = pool_count(env);
    store_pool(env, pid, pool);

    let token_key = pool_token_key(&pool.stake_token);
    env.storage().persistent().set(&token_key, &pid);
    ttl::bump_persistent(env, &token_key);

    env.storage().instance().set(&POOL_COUNT, &(pid + 1));
    pid
}

pub fn load_pool(env: &Env, pid: u32) -> Result<PoolRecord, ContractError> {
    let key = pool_key(pid);
    let pool: PoolRecord = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::OutOfRange)?;
    ttl::bump_persistent(env, &key);
    Ok(pool)
}

pub fn store_pool(env: &Env, pid: u32, pool: &PoolRecord) {
    let key = pool_key(pid);
    env.storage().persistent().set(&key, pool);
    ttl::bump_persistent(env, &key);
}

// ── User storage ─────────────────────────────────────────────────────────────

fn user_key(pid: u32, user: &Address) -> (Symbol, u32, Address) {
    (USER_STAKE, pid, user.clone())
}

pub fn load_user(env: &Env, pid: u32, user: &Address) -> UserStake {
    let key = user_key(pid, user);
    let stake: Option<UserStake> = env.storage().persistent().get(&key);
    match stake {
        Some(stake) => {
            ttl::bump_persistent(env, &key);
            stake
        }
        None => UserStake::default(),
    }
}

pub fn store_user(env: &Env, pid: u32, user: &Address, stake: &UserStake) {
    let key = user_key(pid, user);
    env.storage().persistent().set(&key, stake);
    ttl::bump_persistent(env, &key);
}

// ── Accrual ──────────────────────────────────────────────────────────────────

/// Reward a pool earned over `(last_reward_height, now]` and the accumulator
/// value it would reach, without touching storage.
///
/// Both the real accrual and the read-only pending query go through here so a
/// query always predicts exactly what the next accrual will credit.
pub fn project(
    pool: &PoolRecord,
    now: u32,
    rate: i128,
    total_weight: u32,
) -> Result<(i128, Accrual), ContractError> {
    if now <= pool.last_reward_height
        || pool.total_staked == 0
        || pool.weight == 0
        || total_weight == 0
    {
        return Ok((pool.acc_reward_per_share, Accrual::default()));
    }

    let elapsed = (now - pool.last_reward_height) as i128;
    let emitted = elapsed.checked_mul(rate).ok_or(ContractError::Overflow)?;
    let pool_reward = math::mul_div(emitted, pool.weight as i128, total_weight as i128)
        .ok_or(ContractError::Overflow)?;
    let increment =
        math::acc_increment(pool_reward, pool.total_staked).ok_or(ContractError::Overflow)?;
    let acc = pool
        .acc_reward_per_share
        .checked_add(increment)
        .ok_or(ContractError::Overflow)?;

    Ok((
        acc,
        Accrual {
            pool_reward,
            dev_reward: pool_reward / DEV_FEE_DIVISOR,
        },
    ))
}

/// Advance `pool` to the current height, minting what it earned.
///
/// Idempotent: a second call at the same height changes nothing. An empty or
/// weightless pool only moves its height marker; the reward for that span is
/// never minted.
pub fn accrue(
    env: &Env,
    pool: &mut PoolRecord,
    reward_token: &Address,
    dev_recipient: &Address,
    rate: i128,
    total_weight: u32,
) -> Result<Accrual, ContractError> {
    let now = env.ledger().sequence();
    if now <= pool.last_reward_height {
        return Ok(Accrual::default());
    }

    let (acc, accrual) = project(pool, now, rate, total_weight)?;
    pool.acc_reward_per_share = acc;
    pool.last_reward_height = now;

    if accrual.pool_reward > 0 {
        let minter = token::StellarAssetClient::new(env, reward_token);
        minter.mint(&env.current_contract_address(), &accrual.pool_reward);
        if accrual.dev_reward > 0 {
            minter.mint(dev_recipient, &accrual.dev_reward);
        }

        let reserve = reward_reserve(env)
            .checked_add(accrual.pool_reward)
            .ok_or(ContractError::Overflow)?;
        set_reward_reserve(env, reserve);
    }

    Ok(accrual)
}

/// Pay `amount` of reward out of the reserve, capped by what the reserve
/// actually holds. Returns the amount transferred.
pub fn pay_reward(
    env: &Env,
    reward_token: &Address,
    to: &Address,
    amount: i128,
) -> Result<i128, ContractError> {
    let reserve = reward_reserve(env);
    let paid = amount.min(reserve);
    if paid <= 0 {
        return Ok(0);
    }
    set_reward_reserve(env, reserve - paid);
    token::Client::new(env, reward_token).transfer(&env.current_contract_address(), to, &paid);
    Ok(paid)
}
