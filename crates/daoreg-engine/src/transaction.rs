//! One call's staged view of the registry.
//!
//! A [`Transaction`] owns a copy of the state and an outbox. Command
//! handlers mutate the copy and queue actions; the registry decides
//! afterwards whether the copy replaces the live state.

use chrono::{DateTime, Utc};
use daoreg_types::{AccountName, OutboundAction, RegistryConfig, Result};

use crate::context::Signers;
use crate::state::RegistryState;

pub struct Transaction<'a> {
    pub state: RegistryState,
    pub config: &'a RegistryConfig,
    pub signers: &'a Signers,
    pub now: DateTime<Utc>,
    outbox: Vec<OutboundAction>,
}

impl<'a> Transaction<'a> {
    #[must_use]
    pub fn new(
        state: RegistryState,
        config: &'a RegistryConfig,
        signers: &'a Signers,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            state,
            config,
            signers,
            now,
            outbox: Vec::new(),
        }
    }

    /// The account the registry runs as.
    #[must_use]
    pub fn registry_account(&self) -> &AccountName {
        &self.config.registry_account
    }

    /// Require `account` to have signed the call.
    pub fn require_auth(&self, account: &AccountName) -> Result<()> {
        self.signers.require(account)
    }

    /// Require the registry owner's signature.
    pub fn require_owner(&self) -> Result<()> {
        self.signers.require(&self.config.registry_account)
    }

    /// Queue an action for dispatch after the handler returns.
    pub fn send(&mut self, action: OutboundAction) {
        self.outbox.push(action);
    }

    #[must_use]
    pub fn outbox(&self) -> &[OutboundAction] {
        &self.outbox
    }

    #[must_use]
    pub fn into_parts(self) -> (RegistryState, Vec<OutboundAction>) {
        (self.state, self.outbox)
    }
}
