extern crate std;

use referral::{ReferralContract, ReferralContractClient};
use soroban_sdk::{testutils::Address as _, Address};

use crate::test::{balance, funded_user, jump_to, mint, new_token, setup, TestFarm, RATE, START};

/// Farm with one fee-less pool wired to a referral ledger that trusts it.
fn setup_referral() -> (TestFarm, ReferralContractClient<'static>, Address) {
    let t = setup();
    let ledger_id = t.env.register(ReferralContract, ());
    let ledger = ReferralContractClient::new(&t.env, &ledger_id);
    ledger.initialize(&t.admin);
    ledger.update_operator(&t.admin, &t.farm, &true);
    t.client.set_referral_contract(&t.admin, &ledger_id);

    let lp = new_token(&t.env);
    t.client.add_pool(&t.admin, &100, &lp, &0, &false);

    (t, ledger, lp)
}

#[test]
fn test_deposit_records_first_referrer_only() {
    let (t, ledger, lp) = setup_referral();
    let alice = funded_user(&t.env, &lp, 1_000);
    let bob = funded_user(&t.env, &lp, 1_000);
    let carol = Address::generate(&t.env);
    let minter = Address::generate(&t.env);

    t.client.deposit(&alice, &0, &10, &Some(carol.clone()));
    t.client.deposit(&bob, &0, &10, &None);
    t.client.deposit(&alice, &0, &10, &Some(t.dev.clone()));
    t.client.deposit(&bob, &0, &1, &Some(minter.clone()));
    t.client.deposit(&bob, &0, &1, &Some(t.dev.clone()));

    assert_eq!(ledger.get_referrer(&alice), Some(carol.clone()));
    assert_eq!(ledger.get_referrer(&bob), Some(minter.clone()));
    assert_eq!(ledger.referrals_count(&carol), 1);
    assert_eq!(ledger.referrals_count(&minter), 1);
    assert_eq!(ledger.referrals_count(&t.dev), 0);
}

#[test]
fn test_self_and_zero_amount_referrals_are_ignored() {
    let (t, ledger, lp) = setup_referral();
    let dave = funded_user(&t.env, &lp, 1_000);
    let eve = Address::generate(&t.env);
    let carol = Address::generate(&t.env);

    t.client.deposit(&dave, &0, &10, &Some(dave.clone()));
    assert_eq!(ledger.get_referrer(&dave), None);

    // A pure harvest never attributes a referrer.
    t.client.deposit(&eve, &0, &0, &Some(carol.clone()));
    assert_eq!(ledger.get_referrer(&eve), None);
    assert_eq!(ledger.referrals_count(&carol), 0);
}

#[test]
fn test_commission_paid_on_harvest() {
    let (t, ledger, lp) = setup_referral();
    let alice = funded_user(&t.env, &lp, 1_000);
    let carol = Address::generate(&t.env);

    jump_to(&t.env, START);
    t.client.deposit(&alice, &0, &1_000, &Some(carol.clone()));
    jump_to(&t.env, START + 10);
    t.client.deposit(&alice, &0, &0, &None);

    // Default commission is 200 bp of the harvested 10 × RATE.
    assert_eq!(balance(&t.env, &t.reward_token, &alice), 10 * RATE);
    assert_eq!(balance(&t.env, &t.reward_token, &carol), 200_000);
    assert_eq!(ledger.total_commission(&carol), 200_000);

    t.client.set_referral_rate(&t.admin, &1_000);
    jump_to(&t.env, START + 20);
    t.client.withdraw(&alice, &0, &1_000);
    assert_eq!(balance(&t.env, &t.reward_token, &carol), 1_200_000);
    assert_eq!(ledger.total_commission(&carol), 1_200_000);
}

#[test]
fn test_no_commission_without_referrer_or_rate() {
    let (t, ledger, lp) = setup_referral();
    let alice = funded_user(&t.env, &lp, 1_000);
    let bob = funded_user(&t.env, &lp, 1_000);
    let carol = Address::generate(&t.env);

    jump_to(&t.env, START);
    t.client.deposit(&alice, &0, &1_000, &None);
    t.client.deposit(&bob, &0, &1_000, &Some(carol.clone()));

    t.client.set_referral_rate(&t.admin, &0);
    jump_to(&t.env, START + 10);
    t.client.withdraw(&alice, &0, &1_000);
    t.client.withdraw(&bob, &0, &1_000);

    assert_eq!(balance(&t.env, &t.reward_token, &carol), 0);
    assert_eq!(ledger.total_commission(&carol), 0);
}

#[test]
fn test_farm_must_be_a_ledger_operator() {
    let (t, ledger, lp) = setup_referral();
    ledger.update_operator(&t.admin, &t.farm, &false);

    let alice = Address::generate(&t.env);
    mint(&t.env, &lp, &alice, 1_000);
    let carol = Address::generate(&t.env);

    assert!(t
        .client
        .try_deposit(&alice, &0, &10, &Some(carol.clone()))
        .is_err());
    // The failed deposit left nothing behind.
    assert_eq!(t.client.get_user_stake(&0, &alice).amount, 0);
    assert_eq!(balance(&t.env, &lp, &alice), 1_000);

    // Without a referrer the ledger is never consulted for writes.
    t.client.deposit(&alice, &0, &10, &None);
    assert_eq!(t.client.get_user_stake(&0, &alice).amount, 10);
}
