//! Messages crossing the registry boundary.
//!
//! [`TransferNotice`] is what a token contract tells the registry when
//! tokens arrive; [`OutboundAction`] is what the registry asks the host to
//! execute once a call commits.

use serde::{Deserialize, Serialize};

use crate::{AccountName, Asset};

/// Notification of a token transfer touching the registry account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferNotice {
    pub from: AccountName,
    pub to: AccountName,
    pub quantity: Asset,
    /// For deposits: the decimal DAO id.
    pub memo: String,
}

/// An action the registry asks the host to run on its behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OutboundAction {
    /// Token transfer on the issuing contract.
    Transfer {
        contract: AccountName,
        from: AccountName,
        to: AccountName,
        quantity: Asset,
        memo: String,
    },
    /// Buy RAM for a new organization account.
    BuyRamBytes {
        payer: AccountName,
        receiver: AccountName,
        bytes: u32,
    },
    /// Delegate NET/CPU stake to a new organization account.
    DelegateBandwidth {
        from: AccountName,
        receiver: AccountName,
        net: Asset,
        cpu: Asset,
        transfer: bool,
    },
}

impl OutboundAction {
    /// Short action name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::BuyRamBytes { .. } => "buyrambytes",
            Self::DelegateBandwidth { .. } => "delegatebw",
        }
    }
}
