//! Stepwise decay of the global per-ledger reward rate.

use common::math;
use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::ContractError;

const EMISSION: Symbol = symbol_short!("EMISSION");

/// Emission settings supplied at initialisation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionParams {
    /// Reward minted per ledger at start.
    pub initial_rate: i128,
    /// The rate never decays below this.
    pub floor_rate: i128,
    /// Ledgers per reduction period.
    pub period: u32,
    /// Cut applied once per elapsed period, in basis points.
    pub reduction_bp: u32,
}

impl EmissionParams {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.floor_rate < 0
            || self.initial_rate < self.floor_rate
            || self.period == 0
            || self.reduction_bp == 0
            || self.reduction_bp as i128 >= math::BPS_DENOMINATOR
        {
            return Err(ContractError::InvalidParameter);
        }
        Ok(())
    }
}

/// Live emission state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionState {
    pub rate: i128,
    pub floor_rate: i128,
    pub period: u32,
    pub reduction_bp: u32,
    /// Height the next period is counted from.
    pub last_reduction_height: u32,
}

impl EmissionState {
    pub fn new(params: &EmissionParams, start_height: u32) -> Self {
        Self {
            rate: params.initial_rate,
            floor_rate: params.floor_rate,
            period: params.period,
            reduction_bp: params.reduction_bp,
            last_reduction_height: start_height,
        }
    }

    /// Applies at most one period's reduction as of height `now`.
    ///
    /// Returns `Ok(true)` if the rate changed and `Ok(false)` if no full period
    /// has elapsed yet. The marker advances by exactly one period, so a late
    /// caller catches up one period per call instead of skipping any.
    pub fn reduce(&mut self, now: u32) -> Result<bool, ContractError> {
        if self.rate <= self.floor_rate {
            return Err(ContractError::EmissionFloorReached);
        }

        let due_at = self
            .last_reduction_height
            .checked_add(self.period)
            .ok_or(ContractError::Overflow)?;
        if now < due_at {
            return Ok(false);
        }

        let keep_bp = (math::BPS_DENOMINATOR as u32) - self.reduction_bp;
        let reduced = math::bps_of(self.rate, keep_bp).ok_or(ContractError::Overflow)?;
        self.rate = reduced.max(self.floor_rate);
        self.last_reduction_height = due_at;
        Ok(true)
    }
}

pub fn load(env: &Env) -> Result<EmissionState, ContractError> {
    env.storage()
        .instance()
        .get(&EMISSION)
        .ok_or(ContractError::NotInitialized)
}

pub fn store(env: &Env, state: &EmissionState) {
    env.storage().instance().set(&EMISSION, state);
}
