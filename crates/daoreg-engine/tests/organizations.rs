//! Integration test: organization lifecycle, tokens, attributes, settings.

mod common;

use common::*;
use daoreg_types::asset::fixtures::{asset, symbol, token};
use daoreg_types::*;

#[test]
fn create_assigns_monotonic_ids_and_unique_names() {
    let (mut registry, _clock) = registry();
    let alpha = registry
        .create(&signed("alice"), "alpha", "alice", "QmA")
        .unwrap();
    let beta = registry
        .create(&signed("bob"), "beta", "bob", "QmB")
        .unwrap();
    assert_eq!((alpha, beta), (DaoId(1), DaoId(2)));

    let err = registry
        .create(&signed("carol"), "alpha", "carol", "QmC")
        .unwrap_err();
    assert!(matches!(err, DaoregError::DuplicateOrganization(_)));
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let org = registry.organization_by_name(&"beta".into()).unwrap();
    assert_eq!(org.dao_id, beta);
    assert_eq!(org.creator.as_str(), "bob");
    assert_eq!(org.ipfs, "QmB");
}

#[test]
fn create_requires_creator_signature() {
    let (mut registry, _clock) = registry();
    let err = registry
        .create(&signed("mallory"), "alpha", "alice", "QmA")
        .unwrap_err();
    assert_eq!(err.to_string(), "DR_ERR_102: Missing authority of alice");
    assert!(registry.organization(DaoId(1)).is_none());
}

#[test]
fn create_dispatches_provisioning_from_settings() {
    let (mut registry, _clock) = registry();
    registry
        .set_param(&owner(), "b.rambytes", VariantValue::U64(8192), "RAM per DAO")
        .unwrap();
    registry
        .set_param(&owner(), "d.net", VariantValue::Asset(asset("1.0000 TLOS")), "")
        .unwrap();
    registry
        .set_param(&owner(), "d.cpu", VariantValue::Asset(asset("2.0000 TLOS")), "")
        .unwrap();

    registry
        .create(&signed("alice"), "alpha", "alice", "QmA")
        .unwrap();
    let actions = registry.dispatcher().dispatched();
    assert_eq!(
        actions,
        &[
            OutboundAction::BuyRamBytes {
                payer: REGISTRY.into(),
                receiver: "alpha".into(),
                bytes: 8192,
            },
            OutboundAction::DelegateBandwidth {
                from: REGISTRY.into(),
                receiver: "alpha".into(),
                net: asset("1.0000 TLOS"),
                cpu: asset("2.0000 TLOS"),
                transfer: true,
            },
        ]
    );
}

#[test]
fn failed_provisioning_aborts_create() {
    let (mut registry, _clock) = registry();
    registry
        .set_param(&owner(), "b.rambytes", VariantValue::U64(4096), "")
        .unwrap();
    registry.dispatcher_mut().reject_action("buyrambytes");

    let err = registry
        .create(&signed("alice"), "alpha", "alice", "QmA")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Dispatch);
    assert!(registry.organization_by_name(&"alpha".into()).is_none());
    assert_eq!(registry.state().next_dao_id, DaoId(1));
}

#[test]
fn settings_are_owner_only() {
    let (mut registry, _clock) = registry();
    let err = registry
        .set_param(&signed("alice"), "b.rambytes", VariantValue::U64(1), "")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    registry
        .set_param(&owner(), "b.rambytes", VariantValue::U64(1), "bytes")
        .unwrap();
    assert_eq!(
        registry.setting("b.rambytes").unwrap().value,
        VariantValue::U64(1)
    );

    assert!(registry.reset_settings(&signed("alice")).is_err());
    registry.reset_settings(&owner()).unwrap();
    assert!(registry.setting("b.rambytes").is_none());
}

#[test]
fn update_is_creator_only() {
    let (mut registry, _clock, dao) = alpha();
    let err = registry.update(&signed("bob"), dao, "QmEvil").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    registry.update(&signed("alice"), dao, "QmNew").unwrap();
    assert_eq!(registry.organization(dao).unwrap().ipfs, "QmNew");

    let err = registry
        .update(&signed("alice"), DaoId(7), "Qm")
        .unwrap_err();
    assert_eq!(err.to_string(), "DR_ERR_100: Organization not found: dao:7");
}

#[test]
fn add_token_rules() {
    let (mut registry, _clock, dao) = alpha();

    let err = registry
        .add_token(&signed("alice"), dao, FOO_CONTRACT, &symbol("4,FOO"))
        .unwrap_err();
    assert!(matches!(err, DaoregError::TokenAlreadyRegistered(_)));

    let err = registry
        .add_token(&signed("bob"), dao, "tok2", &symbol("2,BAR"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let id = registry
        .add_token(&signed("alice"), dao, "tok2", &symbol("2,BAR"))
        .unwrap();
    assert_eq!(id, TokenId(2));
    assert_eq!(
        registry.organization(dao).unwrap().tokens,
        vec![foo(), token("tok2", "2,BAR")]
    );
    let ids: Vec<TokenId> = registry.registrations(dao).map(|r| r.token_id).collect();
    assert_eq!(ids, vec![TokenId(1), TokenId(2)]);
}

#[test]
fn attributes_upsert_and_delete() {
    let (mut registry, _clock, dao) = alpha();
    registry
        .upsert_attrs(
            &signed("alice"),
            dao,
            vec![
                ("members".into(), VariantValue::U64(12)),
                ("website".into(), VariantValue::String("alpha.org".into())),
            ],
        )
        .unwrap();
    registry
        .upsert_attrs(
            &signed("alice"),
            dao,
            vec![("members".into(), VariantValue::U64(13))],
        )
        .unwrap();

    let attrs = &registry.organization(dao).unwrap().attributes;
    assert_eq!(attrs.get("members"), Some(&VariantValue::U64(13)));
    assert_eq!(attrs.len(), 2);

    let err = registry
        .del_attrs(&signed("bob"), dao, &["members".into()])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    registry
        .del_attrs(&signed("alice"), dao, &["members".into(), "missing".into()])
        .unwrap();
    let attrs = &registry.organization(dao).unwrap().attributes;
    assert!(attrs.get("members").is_none());
    assert_eq!(attrs.len(), 1);
}

#[test]
fn delorg_cancels_resting_offers() {
    let (mut registry, _clock, dao) = funded_alpha();
    registry
        .create_offer(
            &signed("alice"),
            dao,
            "alice",
            &asset("30.0000 FOO"),
            &asset("1.0000 QUOTE"),
            OfferType::Sell,
        )
        .unwrap();
    registry
        .create_offer(
            &signed("bob"),
            dao,
            "bob",
            &asset("10.0000 FOO"),
            &asset("2.0000 QUOTE"),
            OfferType::Buy,
        )
        .unwrap();

    let err = registry.delorg(&signed("alice"), dao).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    registry.delorg(&owner(), dao).unwrap();
    assert!(registry.organization(dao).is_none());
    assert!(registry.book(dao).is_none());
    assert_eq!(registry.registrations(dao).count(), 0);

    // Reservations went back to their owners; balances survive the DAO.
    assert_eq!(available(&registry, "alice", &foo()), asset("100.0000 FOO"));
    assert_eq!(available(&registry, "bob", &quote()), asset("100.0000 QUOTE"));
    registry
        .withdraw(&signed("alice"), "alice", FOO_CONTRACT, &asset("100.0000 FOO"))
        .unwrap();

    // The name is free again; the id is not reused.
    let again = registry
        .create(&signed("alice"), "alpha", "alice", "QmA2")
        .unwrap();
    assert_eq!(again, DaoId(2));
}

#[test]
fn reset_wipes_everything_but_settings() {
    let (mut registry, _clock, _dao) = funded_alpha();
    registry
        .set_param(&owner(), "b.rambytes", VariantValue::U64(0), "")
        .unwrap();

    assert!(registry.reset(&signed("alice")).is_err());
    registry.reset(&owner()).unwrap();

    let state = registry.state();
    assert!(state.organizations.is_empty());
    assert!(state.books.is_empty());
    assert_eq!(state.ledger.account_count(), 0);
    assert_eq!(state.next_dao_id, DaoId(1));
    assert!(registry.setting("b.rambytes").is_some());

    let dao = registry
        .create(&signed("alice"), "alpha", "alice", "QmA")
        .unwrap();
    assert_eq!(dao, DaoId(1));
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = RegistryConfig::new(REGISTRY, Vec::new());
    let err = daoreg_engine::Registry::new(cfg, daoreg_engine::RecordingDispatcher::new())
        .err()
        .unwrap();
    assert!(matches!(err, DaoregError::Configuration(_)));
}
