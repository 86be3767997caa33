//! System-wide constants for the daoreg registry.

/// Synthetic DAO scope holding the system (quote) tokens.
pub const SYSTEM_DAO_ID: u64 = 0;

/// First identifier handed out to a real organization.
pub const FIRST_DAO_ID: u64 = 1;

/// First identifier handed out to an offer within a DAO.
pub const FIRST_OFFER_ID: u64 = 1;

/// Smallest token registration id. Ids are reused lowest-first.
pub const FIRST_TOKEN_ID: u64 = 1;

/// Account the registry runs under (and the owner for admin commands).
pub const DEFAULT_REGISTRY_ACCOUNT: &str = "daoregistry";

/// Issuer of the default system token.
pub const DEFAULT_SYSTEM_TOKEN_CONTRACT: &str = "eosio.token";

/// Default system token symbol.
pub const DEFAULT_SYSTEM_TOKEN_SYMBOL: &str = "4,TLOS";

/// Maximum decimal precision a token symbol may declare.
pub const MAX_SYMBOL_PRECISION: u8 = 18;

/// Maximum length of a token symbol code.
pub const MAX_SYMBOL_CODE_LEN: usize = 7;

/// Setting: bytes of RAM bought for every new organization account.
pub const SETTING_RAM_BYTES: &str = "b.rambytes";

/// Setting: NET stake delegated to every new organization account.
pub const SETTING_DELEGATE_NET: &str = "d.net";

/// Setting: CPU stake delegated to every new organization account.
pub const SETTING_DELEGATE_CPU: &str = "d.cpu";

/// Memo attached to outbound withdrawal transfers.
pub const WITHDRAW_MEMO: &str = "daoreg withdrawal";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "daoreg";
