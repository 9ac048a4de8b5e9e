extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::test::{jump_to, new_token, setup, START};
use crate::{ContractError, MAX_START_LEAD};

// ── Admin transfer ────────────────────────────────────────────────────────────

#[test]
fn test_admin_transfer() {
    let t = setup();
    let new_admin = Address::generate(&t.env);
    let stranger = Address::generate(&t.env);

    match t.client.try_propose_admin(&stranger, &new_admin) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }

    t.client.propose_admin(&t.admin, &new_admin);
    assert_eq!(t.client.get_pending_admin(), Some(new_admin.clone()));
    // Nothing changes until the nominee accepts.
    assert_eq!(t.client.get_admin(), t.admin);

    match t.client.try_accept_admin(&stranger) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotPendingAdmin),
        _ => unreachable!("Expected NotPendingAdmin error"),
    }

    t.client.accept_admin(&new_admin);
    assert_eq!(t.client.get_admin(), new_admin);
    assert_eq!(t.client.get_pending_admin(), None);

    let lp = new_token(&t.env);
    match t.client.try_add_pool(&t.admin, &100, &lp, &0, &false) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    t.client.add_pool(&new_admin, &100, &lp, &0, &false);
}

#[test]
fn test_accept_without_proposal_fails() {
    let t = setup();
    let nobody = Address::generate(&t.env);

    match t.client.try_accept_admin(&nobody) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
    match t.client.try_cancel_admin_transfer(&t.admin) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
}

#[test]
fn test_cancel_admin_transfer() {
    let t = setup();
    let nominee = Address::generate(&t.env);

    t.client.propose_admin(&t.admin, &nominee);
    match t.client.try_cancel_admin_transfer(&nominee) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }

    t.client.cancel_admin_transfer(&t.admin);
    assert_eq!(t.client.get_pending_admin(), None);
    match t.client.try_accept_admin(&nominee) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
}

// ── Fee and dev recipients ────────────────────────────────────────────────────

#[test]
fn test_only_fee_recipient_hands_over_fee_role() {
    let t = setup();
    let next = Address::generate(&t.env);

    // Not even the owner may redirect fees.
    match t.client.try_set_fee_address(&t.admin, &next) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotFeeRecipient),
        _ => unreachable!("Expected NotFeeRecipient error"),
    }

    t.client.set_fee_address(&t.fee, &next);
    assert_eq!(t.client.get_fee_address(), next);

    match t.client.try_set_fee_address(&t.fee, &t.fee) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotFeeRecipient),
        _ => unreachable!("Expected NotFeeRecipient error"),
    }
}

#[test]
fn test_only_dev_recipient_hands_over_dev_role() {
    let t = setup();
    let next = Address::generate(&t.env);

    match t.client.try_set_dev_address(&t.admin, &next) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotDevRecipient),
        _ => unreachable!("Expected NotDevRecipient error"),
    }

    t.client.set_dev_address(&t.dev, &next);
    assert_eq!(t.client.get_dev_address(), next);

    match t.client.try_set_dev_address(&t.dev, &t.dev) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotDevRecipient),
        _ => unreachable!("Expected NotDevRecipient error"),
    }
}

// ── Referral settings ─────────────────────────────────────────────────────────

#[test]
fn test_referral_settings_are_owner_only() {
    let t = setup();
    let stranger = Address::generate(&t.env);
    let ledger = Address::generate(&t.env);

    match t.client.try_set_referral_contract(&stranger, &ledger) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    match t.client.try_set_referral_rate(&stranger, &100) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }

    t.client.set_referral_contract(&t.admin, &ledger);
    assert_eq!(t.client.get_referral_contract(), Some(ledger));
}

#[test]
fn test_referral_rate_is_capped() {
    let t = setup();

    match t.client.try_set_referral_rate(&t.admin, &2_500) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidParameter),
        _ => unreachable!("Expected InvalidParameter error"),
    }
    assert_eq!(t.client.get_referral_rate(), 200);

    t.client.set_referral_rate(&t.admin, &2_000);
    assert_eq!(t.client.get_referral_rate(), 2_000);
    t.client.set_referral_rate(&t.admin, &0);
    assert_eq!(t.client.get_referral_rate(), 0);
}

// ── Start height ──────────────────────────────────────────────────────────────

#[test]
fn test_update_start_height_rebases_pools() {
    let t = setup();
    let lp1 = new_token(&t.env);
    let lp2 = new_token(&t.env);
    t.client.add_pool(&t.admin, &100, &lp1, &0, &false);
    t.client.add_pool(&t.admin, &100, &lp2, &0, &false);

    t.client.update_start_height(&t.admin, &200);
    assert_eq!(t.client.get_start_height(), 200);
    assert_eq!(t.client.get_pool(&0).last_reward_height, 200);
    assert_eq!(t.client.get_pool(&1).last_reward_height, 200);
    assert_eq!(t.client.get_emission().last_reduction_height, 200);

    // Moving it earlier is allowed too, as long as it is still ahead.
    t.client.update_start_height(&t.admin, &50);
    assert_eq!(t.client.get_pool(&0).last_reward_height, 50);
}

#[test]
fn test_update_start_height_bounds() {
    let t = setup();
    let stranger = Address::generate(&t.env);
    // Ledger is at 10.

    match t.client.try_update_start_height(&stranger, &200) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    match t.client.try_update_start_height(&t.admin, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidParameter),
        _ => unreachable!("Expected InvalidParameter error"),
    }
    match t.client.try_update_start_height(&t.admin, &(10 + MAX_START_LEAD + 1)) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidParameter),
        _ => unreachable!("Expected InvalidParameter error"),
    }
    t.client.update_start_height(&t.admin, &(10 + MAX_START_LEAD));

    let t = setup();
    jump_to(&t.env, START);
    match t.client.try_update_start_height(&t.admin, &(START + 50)) {
        Err(Ok(e)) => assert_eq!(e, ContractError::FarmingStarted),
        _ => unreachable!("Expected FarmingStarted error"),
    }
}
