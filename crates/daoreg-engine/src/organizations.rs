//! Organization lifecycle, attributes, tokens and registry administration.

use daoreg_book::OfferBook;
use daoreg_types::{
    AccountName, DaoId, DaoregError, Organization, Result, Symbol, TokenId, VariantValue,
};

use crate::exchange::release_offer;
use crate::transaction::Transaction;

/// Register a new organization and queue its resource provisioning.
pub fn create(
    tx: &mut Transaction<'_>,
    name: &AccountName,
    creator: &AccountName,
    ipfs: &str,
) -> Result<DaoId> {
    tx.require_auth(creator)?;
    if name.is_empty() {
        return Err(DaoregError::invalid("organization name must not be empty"));
    }
    if tx.state.names.contains_key(name) {
        return Err(DaoregError::DuplicateOrganization(name.clone()));
    }

    let dao_id = tx.state.next_dao_id;
    tx.state.next_dao_id = dao_id.next();
    tx.state.organizations.insert(
        dao_id,
        Organization::new(dao_id, name.clone(), creator.clone(), ipfs.to_string()),
    );
    tx.state.names.insert(name.clone(), dao_id);
    tx.state.books.insert(dao_id, OfferBook::new(dao_id));

    let provisioning = tx
        .state
        .settings
        .provisioning(tx.registry_account(), name)?;
    for action in provisioning {
        tx.send(action);
    }

    tracing::info!(%dao_id, %name, %creator, "Organization created");
    Ok(dao_id)
}

/// Replace the metadata pointer. Creator only.
pub fn update(tx: &mut Transaction<'_>, dao_id: DaoId, ipfs: &str) -> Result<()> {
    let creator = tx.state.organization(dao_id)?.creator.clone();
    tx.require_auth(&creator)?;
    tx.state.organization_mut(dao_id)?.ipfs = ipfs.to_string();
    Ok(())
}

/// Erase an organization. Resting offers are cancelled and their
/// reservations returned before the book and token scope are dropped;
/// balance rows stay with their owners.
pub fn delorg(tx: &mut Transaction<'_>, dao_id: DaoId) -> Result<()> {
    tx.require_owner()?;
    let name = tx.state.organization(dao_id)?.name.clone();

    let resting: Vec<_> = tx.state.book(dao_id)?.active().cloned().collect();
    for offer in &resting {
        release_offer(&mut tx.state, dao_id, offer)?;
    }

    tx.state.books.remove(&dao_id);
    tx.state.tokens.remove_scope(dao_id);
    tx.state.organizations.remove(&dao_id);
    tx.state.names.remove(&name);

    tracing::info!(%dao_id, %name, cancelled = resting.len(), "Organization deleted");
    Ok(())
}

/// Insert or overwrite attributes. Creator only.
pub fn upsert_attrs(
    tx: &mut Transaction<'_>,
    dao_id: DaoId,
    attributes: Vec<(String, VariantValue)>,
) -> Result<()> {
    let creator = tx.state.organization(dao_id)?.creator.clone();
    tx.require_auth(&creator)?;
    if attributes.iter().any(|(key, _)| key.is_empty()) {
        return Err(DaoregError::invalid("attribute keys must not be empty"));
    }
    tx.state
        .organization_mut(dao_id)?
        .attributes
        .extend(attributes);
    Ok(())
}

/// Remove attributes by key. Unknown keys are ignored. Creator only.
pub fn del_attrs(tx: &mut Transaction<'_>, dao_id: DaoId, keys: &[String]) -> Result<()> {
    let creator = tx.state.organization(dao_id)?.creator.clone();
    tx.require_auth(&creator)?;
    let org = tx.state.organization_mut(dao_id)?;
    for key in keys {
        org.attributes.remove(key);
    }
    Ok(())
}

/// Register a token for trading in the DAO. Creator only.
pub fn add_token(
    tx: &mut Transaction<'_>,
    dao_id: DaoId,
    token_account: &AccountName,
    symbol: &Symbol,
) -> Result<TokenId> {
    let creator = tx.state.organization(dao_id)?.creator.clone();
    tx.require_auth(&creator)?;

    let registration = tx.state.tokens.register(dao_id, token_account, symbol)?;
    tx.state
        .organization_mut(dao_id)?
        .tokens
        .push(registration.token());

    tracing::info!(%dao_id, token_id = %registration.token_id, %symbol, %token_account, "Token added");
    Ok(registration.token_id)
}

/// Write a registry setting. Owner only.
pub fn set_param(
    tx: &mut Transaction<'_>,
    key: &str,
    value: VariantValue,
    description: &str,
) -> Result<()> {
    tx.require_owner()?;
    if key.is_empty() {
        return Err(DaoregError::invalid("setting key must not be empty"));
    }
    tx.state.settings.set(key, value, description);
    Ok(())
}

/// Drop every registry setting. Owner only.
pub fn reset_settings(tx: &mut Transaction<'_>) -> Result<()> {
    tx.require_owner()?;
    tx.state.settings.clear();
    Ok(())
}

/// Wipe organizations, token scopes, books and balances. Owner only.
pub fn reset(tx: &mut Transaction<'_>) -> Result<()> {
    tx.require_owner()?;
    tx.state.wipe();
    tracing::warn!("Registry reset");
    Ok(())
}
