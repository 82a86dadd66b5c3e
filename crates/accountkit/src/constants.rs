//! AccountKit API constants
//!
//! Endpoint templates use `{version}`, `{app_id}` and `{account_id}`
//! placeholders. The first two are resolved once per client; `{account_id}`
//! stays in the resolved URL and is filled in per call.

/// Graph API host for AccountKit
pub const DEFAULT_BASE_URL: &str = "https://graph.accountkit.com";

/// API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "v1.1";

/// Page size for `get_accounts_after_removal` when the caller has no preference
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Prefix of the application access token (`AA|{app_id}|{app_secret}`)
pub const APP_ACCESS_TOKEN_PREFIX: &str = "AA";

/// Placeholder left in per-account endpoint URLs after resolution
pub const ACCOUNT_ID_PLACEHOLDER: &str = "{account_id}";

/// Authenticated account lookup
pub const ME_TEMPLATE: &str = "/{version}/me";

/// Authorization code exchange
pub const ACCESS_TOKEN_TEMPLATE: &str = "/{version}/access_token";

/// Single-session logout
pub const LOGOUT_TEMPLATE: &str = "/{version}/logout";

/// Logout of every session belonging to one account
pub const INVALIDATE_ALL_TOKENS_TEMPLATE: &str = "/{version}/{account_id}/invalidate_all_tokens";

/// Account deletion
pub const ACCOUNT_REMOVAL_TEMPLATE: &str = "/{version}/{account_id}";

/// Account listing after the app has been removed
pub const ACCOUNTS_TEMPLATE: &str = "/{version}/{app_id}/accounts/";
