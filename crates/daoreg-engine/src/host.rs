//! Outbound action dispatch.
//!
//! The registry never performs token transfers or resource purchases
//! itself. It queues [`OutboundAction`]s during a call and hands the whole
//! batch to an [`ActionDispatcher`] right before commit. A rejected batch
//! aborts the call.

use std::collections::BTreeSet;

use daoreg_types::{AccountName, DaoregError, OutboundAction, Result};

/// Executes the outbound actions of one committed call.
pub trait ActionDispatcher {
    /// Run `actions` in order. Must either accept all of them or return an
    /// error having run none.
    fn dispatch(&mut self, actions: &[OutboundAction]) -> Result<()>;
}

/// In-memory dispatcher that records every accepted action.
///
/// Individual token contracts or action names can be marked as rejecting,
/// which makes any batch containing them fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    dispatched: Vec<OutboundAction>,
    rejected_contracts: BTreeSet<AccountName>,
    rejected_actions: BTreeSet<&'static str>,
}

impl RecordingDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every transfer on `contract` from now on.
    pub fn reject_contract(&mut self, contract: impl Into<AccountName>) {
        self.rejected_contracts.insert(contract.into());
    }

    /// Fail every action with this name (`"transfer"`, `"buyrambytes"`, ...).
    pub fn reject_action(&mut self, name: &'static str) {
        self.rejected_actions.insert(name);
    }

    /// Stop rejecting anything.
    pub fn accept_all(&mut self) {
        self.rejected_contracts.clear();
        self.rejected_actions.clear();
    }

    /// Every action accepted so far, in dispatch order.
    #[must_use]
    pub fn dispatched(&self) -> &[OutboundAction] {
        &self.dispatched
    }

    /// Forget the recorded history.
    pub fn take(&mut self) -> Vec<OutboundAction> {
        std::mem::take(&mut self.dispatched)
    }

    fn check(&self, action: &OutboundAction) -> Result<()> {
        if self.rejected_actions.contains(action.name()) {
            return Err(DaoregError::DispatchRejected {
                reason: format!("{} is disabled", action.name()),
            });
        }
        if let OutboundAction::Transfer { contract, .. } = action {
            if self.rejected_contracts.contains(contract) {
                return Err(DaoregError::DispatchRejected {
                    reason: format!("transfer on {contract} failed"),
                });
            }
        }
        Ok(())
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, actions: &[OutboundAction]) -> Result<()> {
        for action in actions {
            self.check(action)?;
        }
        self.dispatched.extend_from_slice(actions);
        Ok(())
    }
}
