//! End-to-end tests for the full authorization pipeline:
//! custody + identity + compliance chain + supply gates + events.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use aegis_compliance::{AllowAllModule, ComplianceError, CountryRestrictModule, MaxBalanceModule};
use aegis_core::{Address, Amount, ClaimTopic, CountryCode, OperationMode};
use aegis_custody::CustodyError;
use aegis_events::{EventJournal, TokenEvent};
use aegis_gates::{FixedYieldSchedule, GateError};
use aegis_identity::{Claim, IdentityId, MockClaimStore, MockIdentityRegistry};
use aegis_pipeline::{
    EngineError, OperationCategory, StaticAuthorizer, TokenEngine, TokenService,
};

const KYC: ClaimTopic = ClaimTopic::new(1);
const COLLATERAL: ClaimTopic = ClaimTopic::new(42);

const US: CountryCode = CountryCode::new(840);
const KP: CountryCode = CountryCode::new(408);

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn addr(s: &str) -> Address {
    Address::new(s).unwrap()
}

fn amt(d: Decimal) -> Amount {
    Amount::new(d).unwrap()
}

fn registry() -> Arc<MockIdentityRegistry> {
    let registry = Arc::new(MockIdentityRegistry::new());
    for wallet in ["admin", "custodian", "alice", "bob"] {
        registry.register(
            addr(wallet),
            IdentityId::new(format!("id-{wallet}")),
            US,
            vec![KYC],
        );
    }
    // eve is fully verified but registered in a restricted country
    registry.register(addr("eve"), IdentityId::new("id-eve"), KP, vec![KYC]);
    registry
}

fn engine() -> TokenEngine {
    init_tracing();
    TokenEngine::builder(registry())
        .with_required_topics(vec![KYC])
        .build()
}

fn funded_engine(account: &str, balance: Decimal) -> TokenEngine {
    let mut engine = engine();
    engine.mint(&addr("admin"), &addr(account), amt(balance)).unwrap();
    engine
}

// === Custody scenarios ===

#[test]
fn scenario_partial_freeze_limits_standard_transfer() {
    let mut engine = funded_engine("alice", dec!(100));
    let admin = addr("admin");
    let alice = addr("alice");
    let bob = addr("bob");

    engine.freeze_partial(&admin, &alice, amt(dec!(40))).unwrap();
    assert_eq!(engine.frozen_amount(&alice), amt(dec!(40)));

    // available 60 < 70
    let result = engine.transfer(&alice, &bob, amt(dec!(70)));
    assert!(matches!(
        result,
        Err(EngineError::Custody(
            CustodyError::InsufficientUnfrozenBalance { .. }
        ))
    ));

    engine.transfer(&alice, &bob, amt(dec!(50))).unwrap();
    assert_eq!(engine.balance_of(&alice), amt(dec!(50)));
    assert_eq!(engine.frozen_amount(&alice), amt(dec!(40)));
    assert!(engine.frozen_amount(&alice) <= engine.balance_of(&alice));
}

#[test]
fn scenario_full_freeze_blocks_standard_but_not_forced() {
    let mut engine = funded_engine("alice", dec!(100));
    let custodian = addr("custodian");
    let alice = addr("alice");
    let bob = addr("bob");

    engine.set_frozen(&custodian, &alice, true).unwrap();

    let result = engine.transfer(&alice, &bob, amt(dec!(1)));
    assert!(matches!(
        result,
        Err(EngineError::Custody(CustodyError::SenderFrozen { .. }))
    ));

    engine
        .forced_transfer(&custodian, &alice, &bob, amt(dec!(1)))
        .unwrap();
    assert_eq!(engine.balance_of(&bob), amt(dec!(1)));
}

#[test]
fn scenario_forced_transfer_auto_unfreezes_shortfall() {
    let mut engine = funded_engine("alice", dec!(100));
    let custodian = addr("custodian");
    let alice = addr("alice");
    let bob = addr("bob");

    engine.freeze_partial(&custodian, &alice, amt(dec!(90))).unwrap();

    engine
        .forced_transfer(&custodian, &alice, &bob, amt(dec!(95)))
        .unwrap();

    // shortfall 95 - 10 = 85 auto-unfrozen
    assert_eq!(engine.frozen_amount(&alice), amt(dec!(5)));
    assert_eq!(engine.balance_of(&alice), amt(dec!(5)));
    assert_eq!(engine.balance_of(&bob), amt(dec!(95)));

    // the unfreeze notification precedes the transfer event
    let events = engine.journal().read_all().unwrap();
    let unfreeze_pos = events
        .iter()
        .position(|e| matches!(e, TokenEvent::TokensUnfrozen { amount, .. } if *amount == amt(dec!(85))))
        .expect("unfreeze event emitted");
    let transfer_pos = events
        .iter()
        .position(|e| matches!(e, TokenEvent::Transferred { mode: OperationMode::Forced, .. }))
        .expect("forced transfer event emitted");
    assert!(unfreeze_pos < transfer_pos);
}

#[test]
fn scenario_recovery_migrates_freeze_state() {
    init_tracing();
    let custodian = addr("custodian");
    let alice = addr("alice");
    let replacement = addr("alice-new");

    // the replacement wallet resolves to the same identity as alice
    let registry = registry();
    registry.register(
        replacement.clone(),
        IdentityId::new("id-alice"),
        US,
        vec![KYC],
    );
    let mut engine = TokenEngine::builder(registry)
        .with_required_topics(vec![KYC])
        .build();
    engine.mint(&addr("admin"), &alice, amt(dec!(100))).unwrap();

    engine.set_frozen(&custodian, &alice, true).unwrap();
    engine.freeze_partial(&custodian, &alice, amt(dec!(30))).unwrap();

    engine
        .recover(&custodian, &alice, &replacement, &IdentityId::new("id-alice"))
        .unwrap();

    assert!(!engine.is_frozen(&alice));
    assert_eq!(engine.frozen_amount(&alice), Amount::ZERO);
    assert!(engine.is_frozen(&replacement));
    assert_eq!(engine.frozen_amount(&replacement), amt(dec!(30)));

    let events = engine.journal().read_all().unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, TokenEvent::RecoverySucceeded { .. })));
}

#[test]
fn recovery_rejects_mismatched_identities() {
    let mut engine = funded_engine("alice", dec!(100));
    let custodian = addr("custodian");

    // bob resolves to a different identity
    let result = engine.recover(
        &custodian,
        &addr("alice"),
        &addr("bob"),
        &IdentityId::new("id-alice"),
    );
    assert!(matches!(result, Err(EngineError::Verification { .. })));
    assert_eq!(engine.frozen_amount(&addr("bob")), Amount::ZERO);
}

#[test]
fn scenario_single_module_rejection_vetoes_transfer() {
    init_tracing();
    let registry = registry();
    let mut engine = TokenEngine::builder(registry.clone())
        .with_required_topics(vec![KYC])
        .build();
    let admin = addr("admin");
    let alice = addr("alice");
    let eve = addr("eve");

    engine.mint(&admin, &alice, amt(dec!(100))).unwrap();
    engine
        .add_module(&admin, Box::new(AllowAllModule::new("allow-all")), json!(null))
        .unwrap();
    engine
        .add_module(
            &admin,
            Box::new(CountryRestrictModule::new("country-restrict", registry)),
            json!({"blocked_countries": [408]}),
        )
        .unwrap();

    // eve passes identity verification but sits in a blocked country
    let err = engine.transfer(&alice, &eve, amt(dec!(10))).unwrap_err();
    match err {
        EngineError::Compliance(ComplianceError::ModuleRejected { module, .. }) => {
            assert_eq!(module, "country-restrict");
        }
        other => panic!("unexpected error: {other}"),
    }

    // an unrestricted recipient is unaffected
    engine.transfer(&alice, &addr("bob"), amt(dec!(10))).unwrap();
}

// === Invariants and boundaries ===

#[test]
fn frozen_amount_never_exceeds_balance() {
    let mut engine = funded_engine("alice", dec!(100));
    let custodian = addr("custodian");
    let alice = addr("alice");
    let bob = addr("bob");

    engine.freeze_partial(&custodian, &alice, amt(dec!(90))).unwrap();

    // across a mix of operations the invariant must hold
    engine
        .forced_transfer(&custodian, &alice, &bob, amt(dec!(95)))
        .unwrap();
    assert!(engine.frozen_amount(&alice) <= engine.balance_of(&alice));

    engine.mint(&addr("admin"), &alice, amt(dec!(50))).unwrap();
    engine.freeze_partial(&custodian, &alice, amt(dec!(40))).unwrap();
    engine.burn(&addr("admin"), &alice, amt(dec!(55))).unwrap();
    assert!(engine.frozen_amount(&alice) <= engine.balance_of(&alice));
}

#[test]
fn set_frozen_is_idempotent() {
    let mut engine = funded_engine("alice", dec!(10));
    let custodian = addr("custodian");
    let alice = addr("alice");

    engine.set_frozen(&custodian, &alice, true).unwrap();
    engine.set_frozen(&custodian, &alice, true).unwrap();
    assert!(engine.is_frozen(&alice));

    // both calls still notified
    let flags = engine
        .journal()
        .read_all()
        .unwrap()
        .into_iter()
        .filter(|e| matches!(e, TokenEvent::AddressFrozen { frozen: true, .. }))
        .count();
    assert_eq!(flags, 2);
}

#[test]
fn freeze_unfreeze_roundtrip_restores_state() {
    let mut engine = funded_engine("alice", dec!(100));
    let custodian = addr("custodian");
    let alice = addr("alice");

    engine.freeze_partial(&custodian, &alice, amt(dec!(15))).unwrap();
    let before = engine.frozen_amount(&alice);

    engine.freeze_partial(&custodian, &alice, amt(dec!(25))).unwrap();
    engine.unfreeze_partial(&custodian, &alice, amt(dec!(25))).unwrap();

    assert_eq!(engine.frozen_amount(&alice), before);
}

#[test]
fn cap_boundary_exact_and_one_past() {
    init_tracing();
    let mut engine = TokenEngine::builder(registry())
        .with_required_topics(vec![KYC])
        .with_supply_cap(amt(dec!(1000)))
        .build();
    let admin = addr("admin");
    let alice = addr("alice");

    engine.mint(&admin, &alice, amt(dec!(1000))).unwrap();

    let result = engine.mint(&admin, &alice, amt(dec!(1)));
    assert!(matches!(
        result,
        Err(EngineError::Gate(GateError::CapExceeded { .. }))
    ));
    assert_eq!(engine.total_supply(), amt(dec!(1000)));
}

#[test]
fn collateral_boundary_exact_and_one_past() {
    init_tracing();
    let claims = Arc::new(MockClaimStore::new());
    claims.set_claim(Claim::new(
        COLLATERAL,
        amt(dec!(500)),
        "custodian-bank",
        Utc::now() + Duration::hours(1),
    ));

    let mut engine = TokenEngine::builder(registry())
        .with_required_topics(vec![KYC])
        .with_collateral(COLLATERAL, claims.clone())
        .build();
    let admin = addr("admin");
    let alice = addr("alice");

    engine.mint(&admin, &alice, amt(dec!(500))).unwrap();

    let result = engine.mint(&admin, &alice, amt(dec!(1)));
    assert!(matches!(
        result,
        Err(EngineError::Gate(GateError::InsufficientCollateral { .. }))
    ));

    // an expired claim rejects even a minimal mint
    claims.expire_claim(COLLATERAL, Utc::now() - Duration::seconds(1));
    engine.burn(&admin, &alice, amt(dec!(100))).unwrap();
    let result = engine.mint(&admin, &alice, amt(dec!(1)));
    assert!(matches!(
        result,
        Err(EngineError::Gate(GateError::NoCollateralClaim { .. }))
    ));
}

#[test]
fn yield_schedule_freezes_supply_once_started() {
    let mut engine = funded_engine("alice", dec!(100));
    let admin = addr("admin");

    engine
        .set_yield_schedule(
            &admin,
            Arc::new(FixedYieldSchedule::new(Utc::now() - Duration::hours(1))),
        )
        .unwrap();

    let result = engine.mint(&admin, &addr("alice"), amt(dec!(1)));
    assert!(matches!(
        result,
        Err(EngineError::Gate(GateError::YieldActive { .. }))
    ));

    // burning and transferring stay open
    engine.burn(&admin, &addr("alice"), amt(dec!(10))).unwrap();
    engine.transfer(&addr("alice"), &addr("bob"), amt(dec!(10))).unwrap();

    // and the schedule cannot be replaced
    let result = engine.set_yield_schedule(
        &admin,
        Arc::new(FixedYieldSchedule::new(Utc::now() + Duration::days(1))),
    );
    assert!(matches!(
        result,
        Err(EngineError::Gate(GateError::ScheduleAlreadySet))
    ));
}

// === Batch atomicity ===

#[test]
fn failing_batch_element_rolls_back_everything() {
    let mut engine = funded_engine("alice", dec!(100));
    let alice = addr("alice");
    let bob = addr("bob");
    let eve = addr("stranger"); // unverified

    let result = engine.batch_transfer(
        &alice,
        &[bob.clone(), eve.clone()],
        &[amt(dec!(30)), amt(dec!(10))],
    );
    assert!(matches!(result, Err(EngineError::Verification { .. })));

    // first element was staged only; nothing moved
    assert_eq!(engine.balance_of(&alice), amt(dec!(100)));
    assert_eq!(engine.balance_of(&bob), Amount::ZERO);

    // no transfer events leaked into the journal
    let transfers = engine
        .journal()
        .read_all()
        .unwrap()
        .into_iter()
        .filter(|e| matches!(e, TokenEvent::Transferred { .. }))
        .count();
    assert_eq!(transfers, 0);
}

#[test]
fn batch_elements_see_intra_batch_balances() {
    let mut engine = funded_engine("alice", dec!(100));
    let alice = addr("alice");
    let bob = addr("bob");

    // 60 then 40 only works because staging tracks the running balance;
    // a third transfer must push it over
    engine
        .batch_transfer(&alice, &[bob.clone(), bob.clone()], &[amt(dec!(60)), amt(dec!(40))])
        .unwrap();
    assert_eq!(engine.balance_of(&alice), Amount::ZERO);
    assert_eq!(engine.balance_of(&bob), amt(dec!(100)));

    let result = engine.batch_transfer(&bob, &[alice.clone(), alice.clone()], &[amt(dec!(80)), amt(dec!(30))]);
    assert!(matches!(
        result,
        Err(EngineError::Custody(
            CustodyError::InsufficientUnfrozenBalance { .. }
        ))
    ));
    assert_eq!(engine.balance_of(&bob), amt(dec!(100)));
}

#[test]
fn batch_freeze_is_all_or_nothing() {
    let mut engine = funded_engine("alice", dec!(100));
    let custodian = addr("custodian");
    let alice = addr("alice");
    let bob = addr("bob");

    // bob has no balance; his element fails, so alice's freeze must not stick
    let result = engine.batch_freeze_partial(
        &custodian,
        &[alice.clone(), bob.clone()],
        &[amt(dec!(50)), amt(dec!(1))],
    );
    assert!(matches!(
        result,
        Err(EngineError::Custody(CustodyError::ExceedsAvailableBalance { .. }))
    ));
    assert_eq!(engine.frozen_amount(&alice), Amount::ZERO);
}

#[test]
fn batch_forced_transfer_length_mismatch() {
    let mut engine = funded_engine("alice", dec!(100));
    let custodian = addr("custodian");

    let result = engine.batch_forced_transfer(
        &custodian,
        &[addr("alice")],
        &[addr("bob"), addr("bob")],
        &[amt(dec!(1))],
    );
    assert!(matches!(result, Err(EngineError::BatchLengthMismatch { .. })));
    assert_eq!(engine.balance_of(&addr("bob")), Amount::ZERO);
}

// === Authorization boundary ===

#[test]
fn unauthorized_actor_is_rejected_before_core_logic() {
    init_tracing();
    let authorizer = Arc::new(StaticAuthorizer::new());
    authorizer.grant(addr("admin"), OperationCategory::Mint);

    let mut engine = TokenEngine::builder(registry())
        .with_required_topics(vec![KYC])
        .with_authorizer(authorizer.clone())
        .build();

    engine.mint(&addr("admin"), &addr("alice"), amt(dec!(100))).unwrap();

    // admin holds mint only, not freeze
    let err = engine
        .set_frozen(&addr("admin"), &addr("alice"), true)
        .unwrap_err();
    match err {
        EngineError::Authorization { category, .. } => {
            assert_eq!(category, OperationCategory::Freeze);
        }
        other => panic!("unexpected error: {other}"),
    }

    authorizer.grant(addr("custodian"), OperationCategory::Freeze);
    engine
        .set_frozen(&addr("custodian"), &addr("alice"), true)
        .unwrap();
}

// === Stateful module across the pipeline ===

#[test]
fn max_balance_module_tracks_holdings_through_lifecycle() {
    let mut engine = engine();
    let admin = addr("admin");
    let alice = addr("alice");
    let bob = addr("bob");

    engine
        .add_module(
            &admin,
            Box::new(MaxBalanceModule::new("max-balance")),
            json!({"max_balance": "100"}),
        )
        .unwrap();

    engine.mint(&admin, &alice, amt(dec!(100))).unwrap();

    // alice is at the cap; minting one more unit to her fails
    let result = engine.mint(&admin, &alice, amt(dec!(1)));
    assert!(matches!(result, Err(EngineError::Compliance(_))));

    // moving 40 to bob frees headroom on alice
    engine.transfer(&alice, &bob, amt(dec!(40))).unwrap();
    engine.mint(&admin, &alice, amt(dec!(40))).unwrap();

    // bob at 40: burning 10 gives him room for 70 more
    engine.burn(&admin, &bob, amt(dec!(10))).unwrap();
    engine.mint(&admin, &bob, amt(dec!(70))).unwrap();

    let result = engine.mint(&admin, &bob, amt(dec!(1)));
    assert!(matches!(result, Err(EngineError::Compliance(_))));
}

// === Module management ===

#[test]
fn module_registration_lifecycle_events() {
    let mut engine = engine();
    let admin = addr("admin");

    engine
        .add_module(&admin, Box::new(AllowAllModule::new("allow-all")), json!(null))
        .unwrap();
    assert!(engine.has_module("allow-all"));

    let result = engine.add_module(&admin, Box::new(AllowAllModule::new("allow-all")), json!(null));
    assert!(matches!(
        result,
        Err(EngineError::Compliance(ComplianceError::DuplicateModule(_)))
    ));

    engine
        .set_module_parameters(&admin, "allow-all", json!({}))
        .unwrap();
    engine.remove_module(&admin, "allow-all").unwrap();
    assert!(!engine.has_module("allow-all"));

    let kinds: Vec<&str> = engine
        .journal()
        .read_all()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            TokenEvent::ModuleAdded { .. } => Some("added"),
            TokenEvent::ModuleParamsUpdated { .. } => Some("updated"),
            TokenEvent::ModuleRemoved { .. } => Some("removed"),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec!["added", "updated", "removed"]);
}

#[test]
fn invalid_module_params_rejected_on_registration() {
    let mut engine = engine();
    let admin = addr("admin");

    let result = engine.add_module(
        &admin,
        Box::new(MaxBalanceModule::new("max-balance")),
        json!({"unexpected": 1}),
    );
    assert!(matches!(
        result,
        Err(EngineError::Compliance(ComplianceError::InvalidParameters { .. }))
    ));
    assert!(!engine.has_module("max-balance"));
}

// === Journal persistence ===

#[test]
fn file_journal_survives_engine_restart() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("token.jsonl");

    {
        let mut engine = TokenEngine::builder(registry())
            .with_required_topics(vec![KYC])
            .with_journal(EventJournal::new(&path)?)
            .build();
        engine.mint(&addr("admin"), &addr("alice"), amt(dec!(100)))?;
        engine.transfer(&addr("alice"), &addr("bob"), amt(dec!(25)))?;
    }

    let journal = EventJournal::new(&path)?;
    let events = journal.read_all()?;
    assert!(events.iter().any(|e| matches!(e, TokenEvent::Minted { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, TokenEvent::Transferred { mode: OperationMode::Standard, .. })));
    Ok(())
}

// === Serialized shared access ===

#[test]
fn service_serializes_concurrent_operations() {
    let mut engine = engine();
    engine.mint(&addr("admin"), &addr("alice"), amt(dec!(1000))).unwrap();
    let service = TokenService::new(engine);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    service
                        .transfer(&addr("alice"), &addr("bob"), amt(dec!(1)))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(service.balance_of(&addr("alice")), amt(dec!(920)));
    assert_eq!(service.balance_of(&addr("bob")), amt(dec!(80)));
    assert_eq!(service.total_supply(), amt(dec!(1000)));
}
