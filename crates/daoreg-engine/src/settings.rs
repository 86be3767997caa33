//! Registry-wide settings store.
//!
//! A keyed table of [`VariantValue`]s edited by the registry owner. The
//! provisioning keys are read when an organization is created:
//!
//! | key          | type  | effect                                  |
//! |--------------|-------|-----------------------------------------|
//! | `b.rambytes` | u64   | buy this much RAM for the new account   |
//! | `d.net`      | asset | NET stake delegated to the new account  |
//! | `d.cpu`      | asset | CPU stake delegated to the new account  |
//!
//! Absent keys mean no provisioning.

use std::collections::BTreeMap;

use daoreg_types::{AccountName, Asset, DaoregError, OutboundAction, Result, VariantValue, constants};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: VariantValue,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    entries: BTreeMap<String, Setting>,
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a setting. An empty `description` keeps the
    /// previous one.
    pub fn set(&mut self, key: &str, value: VariantValue, description: &str) {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Setting {
                key: key.to_string(),
                value: VariantValue::None,
                description: String::new(),
            });
        entry.value = value;
        if !description.is_empty() {
            entry.description = description.to_string();
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&VariantValue> {
        self.entries.get(key).map(|s| &s.value)
    }

    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&Setting> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.entries.values()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn u64_of(&self, key: &str) -> Result<Option<u64>> {
        match self.get(key) {
            None | Some(VariantValue::None) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                DaoregError::invalid(format!("setting {key} must be an unsigned integer"))
            }),
        }
    }

    fn asset_of(&self, key: &str) -> Result<Option<&Asset>> {
        match self.get(key) {
            None | Some(VariantValue::None) => Ok(None),
            Some(value) => value
                .as_asset()
                .map(Some)
                .ok_or_else(|| DaoregError::invalid(format!("setting {key} must be an asset"))),
        }
    }

    /// Resource actions for a freshly created organization account.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if a provisioning key holds the wrong type
    /// or the RAM amount does not fit in 32 bits.
    pub fn provisioning(
        &self,
        payer: &AccountName,
        receiver: &AccountName,
    ) -> Result<Vec<OutboundAction>> {
        let mut actions = Vec::new();

        if let Some(bytes) = self.u64_of(constants::SETTING_RAM_BYTES)? {
            if bytes > 0 {
                let bytes = u32::try_from(bytes).map_err(|_| {
                    DaoregError::invalid(format!(
                        "{} = {bytes} exceeds 32 bits",
                        constants::SETTING_RAM_BYTES
                    ))
                })?;
                actions.push(OutboundAction::BuyRamBytes {
                    payer: payer.clone(),
                    receiver: receiver.clone(),
                    bytes,
                });
            }
        }

        let net = self.asset_of(constants::SETTING_DELEGATE_NET)?;
        let cpu = self.asset_of(constants::SETTING_DELEGATE_CPU)?;
        if let (Some(net), Some(cpu)) = (net, cpu) {
            if net.is_positive() && cpu.is_positive() {
                actions.push(OutboundAction::DelegateBandwidth {
                    from: payer.clone(),
                    receiver: receiver.clone(),
                    net: net.clone(),
                    cpu: cpu.clone(),
                    transfer: true,
                });
            }
        }

        Ok(actions)
    }
}
