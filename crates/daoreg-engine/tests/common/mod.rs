//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use daoreg_engine::{FixedClock, RecordingDispatcher, Registry, Signers};
use daoreg_types::asset::fixtures::{asset, symbol, token};
use daoreg_types::*;
use tracing_subscriber::EnvFilter;

pub const REGISTRY: &str = "daoregistry";
pub const QUOTE_CONTRACT: &str = "quote.tok";
pub const FOO_CONTRACT: &str = "tok1";
pub const GENESIS_SECS: i64 = 1_700_000_000;

pub type TestRegistry = Registry<RecordingDispatcher>;

/// Install a test-writer subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config() -> RegistryConfig {
    RegistryConfig::new(REGISTRY, vec![token(QUOTE_CONTRACT, "4,QUOTE")])
}

pub fn signed(account: &str) -> Signers {
    Signers::of([account])
}

pub fn owner() -> Signers {
    signed(REGISTRY)
}

/// Empty registry on a pinned clock.
pub fn registry() -> (TestRegistry, FixedClock) {
    init_tracing();
    let clock = FixedClock::at(GENESIS_SECS);
    let registry = Registry::new(config(), RecordingDispatcher::new())
        .expect("valid config")
        .with_clock(clock.clone());
    (registry, clock)
}

/// Registry with DAO "alpha" (creator alice) trading `4,FOO` issued by
/// `tok1`.
pub fn alpha() -> (TestRegistry, FixedClock, DaoId) {
    let (mut registry, clock) = registry();
    let dao = registry
        .create(&signed("alice"), "alpha", "alice", "QmAlpha")
        .expect("create alpha");
    registry
        .add_token(&signed("alice"), dao, FOO_CONTRACT, &symbol("4,FOO"))
        .expect("add FOO");
    (registry, clock, dao)
}

pub fn deposit(
    registry: &mut TestRegistry,
    contract: &str,
    from: &str,
    quantity: &str,
    memo: &str,
) -> Result<()> {
    registry.on_transfer(
        contract,
        &TransferNotice {
            from: from.into(),
            to: REGISTRY.into(),
            quantity: asset(quantity),
            memo: memo.to_string(),
        },
    )
}

pub fn foo() -> ExtendedSymbol {
    token(FOO_CONTRACT, "4,FOO")
}

pub fn quote() -> ExtendedSymbol {
    token(QUOTE_CONTRACT, "4,QUOTE")
}

pub fn available(registry: &TestRegistry, account: &str, token: &ExtendedSymbol) -> Asset {
    registry
        .state()
        .ledger
        .available(&AccountName::from(account), token)
}

pub fn locked(registry: &TestRegistry, account: &str, token: &ExtendedSymbol) -> Asset {
    registry
        .state()
        .ledger
        .locked(&AccountName::from(account), token)
}

/// alpha with alice holding 100 FOO and bob holding 100 QUOTE.
pub fn funded_alpha() -> (TestRegistry, FixedClock, DaoId) {
    let (mut registry, clock, dao) = alpha();
    deposit(&mut registry, FOO_CONTRACT, "alice", "100.0000 FOO", "1").expect("alice deposit");
    deposit(&mut registry, QUOTE_CONTRACT, "bob", "100.0000 QUOTE", "0").expect("bob deposit");
    (registry, clock, dao)
}
