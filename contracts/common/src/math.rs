/// Fixed-point scaling factor.
///
/// Every accumulated reward-per-share value is multiplied by this constant
/// before storage so sub-unit precision survives integer division. Using
/// 10^12 leaves ample headroom in `i128` for 7-decimal Stellar amounts.
pub const PRECISION: i128 = 1_000_000_000_000;

/// Denominator for every basis-point rate (fees, commissions, decay).
pub const BPS_DENOMINATOR: i128 = 10_000;

/// `a * b / denominator`, rounded toward zero.
///
/// Returns `None` on overflow, on a non-positive denominator, or when either
/// factor is negative.
pub fn mul_div(a: i128, b: i128, denominator: i128) -> Option<i128> {
    if denominator <= 0 || a < 0 || b < 0 {
        return None;
    }
    a.checked_mul(b)?.checked_div(denominator)
}

/// Accumulator increase produced by distributing `reward` over
/// `total_staked` shares:
///
/// ```text
/// Δacc = reward × PRECISION / total_staked
/// ```
///
/// An empty pool yields zero; its reward is never minted, so there is nothing
/// to distribute.
pub fn acc_increment(reward: i128, total_staked: i128) -> Option<i128> {
    if total_staked <= 0 {
        return Some(0);
    }
    mul_div(reward, PRECISION, total_staked)
}

/// Reward a position of `amount` has earned since the accumulator started:
///
/// ```text
/// share = amount × acc / PRECISION
/// ```
///
/// Immediately after a settlement this is exactly the stored reward debt.
pub fn accumulated_share(amount: i128, acc_per_share: i128) -> Option<i128> {
    mul_div(amount, acc_per_share, PRECISION)
}

/// Reward a position has earned since its last settlement.
///
/// Subtracting `reward_debt` isolates only the accumulation that happened
/// after the position last interacted, so nothing is paid twice.
pub fn pending(amount: i128, acc_per_share: i128, reward_debt: i128) -> Option<i128> {
    accumulated_share(amount, acc_per_share)?.checked_sub(reward_debt)
}

/// `amount × bps / 10_000`, rounded toward zero.
pub fn bps_of(amount: i128, bps: u32) -> Option<i128> {
    mul_div(amount, bps as i128, BPS_DENOMINATOR)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure arithmetic; no Soroban environment needed.
