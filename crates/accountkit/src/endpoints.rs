//! Endpoint templates and per-client URL resolution
//!
//! Templates are read-only constants. Each client resolves its own copy
//! once at construction, so clients configured with different API versions
//! or app ids never see each other's URLs.

use reqwest::Method;

use crate::constants::{
    ACCESS_TOKEN_TEMPLATE, ACCOUNT_ID_PLACEHOLDER, ACCOUNT_REMOVAL_TEMPLATE, ACCOUNTS_TEMPLATE,
    INVALIDATE_ALL_TOKENS_TEMPLATE, LOGOUT_TEMPLATE, ME_TEMPLATE,
};
use crate::error::{Error, Result};

/// Logical AccountKit endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Me,
    AccessToken,
    Logout,
    InvalidateAllTokens,
    AccountRemoval,
    Accounts,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Me,
        Endpoint::AccessToken,
        Endpoint::Logout,
        Endpoint::InvalidateAllTokens,
        Endpoint::AccountRemoval,
        Endpoint::Accounts,
    ];

    /// Name used in logs (matches the provider's documentation)
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Me => "me",
            Endpoint::AccessToken => "access_token",
            Endpoint::Logout => "logout",
            Endpoint::InvalidateAllTokens => "invalidate_all_tokens",
            Endpoint::AccountRemoval => "account_removal",
            Endpoint::Accounts => "accounts",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Endpoint::Me => ME_TEMPLATE,
            Endpoint::AccessToken => ACCESS_TOKEN_TEMPLATE,
            Endpoint::Logout => LOGOUT_TEMPLATE,
            Endpoint::InvalidateAllTokens => INVALIDATE_ALL_TOKENS_TEMPLATE,
            Endpoint::AccountRemoval => ACCOUNT_REMOVAL_TEMPLATE,
            Endpoint::Accounts => ACCOUNTS_TEMPLATE,
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::Me | Endpoint::AccessToken | Endpoint::Accounts => Method::GET,
            Endpoint::Logout | Endpoint::InvalidateAllTokens => Method::POST,
            Endpoint::AccountRemoval => Method::DELETE,
        }
    }

    /// Whether the resolved URL still carries `{account_id}`.
    pub fn needs_account_id(self) -> bool {
        matches!(self, Endpoint::InvalidateAllTokens | Endpoint::AccountRemoval)
    }
}

/// Endpoint URLs resolved for one client.
#[derive(Debug, Clone)]
pub struct Endpoints {
    me: String,
    access_token: String,
    logout: String,
    invalidate_all_tokens: String,
    account_removal: String,
    accounts: String,
}

impl Endpoints {
    /// Substitute `version` and `app_id` into every template.
    ///
    /// `base_url` is joined without a trailing slash; `{account_id}` is left
    /// in place for `account_url`.
    pub fn resolve(base_url: &str, version: &str, app_id: &str) -> Self {
        let base = base_url.trim().trim_end_matches('/');
        let build = |endpoint: Endpoint| {
            let path = endpoint
                .template()
                .replace("{version}", version)
                .replace("{app_id}", app_id);
            format!("{base}{path}")
        };

        Self {
            me: build(Endpoint::Me),
            access_token: build(Endpoint::AccessToken),
            logout: build(Endpoint::Logout),
            invalidate_all_tokens: build(Endpoint::InvalidateAllTokens),
            account_removal: build(Endpoint::AccountRemoval),
            accounts: build(Endpoint::Accounts),
        }
    }

    /// Resolved URL for an endpoint. Per-account endpoints still contain
    /// the `{account_id}` placeholder.
    pub fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Me => &self.me,
            Endpoint::AccessToken => &self.access_token,
            Endpoint::Logout => &self.logout,
            Endpoint::InvalidateAllTokens => &self.invalidate_all_tokens,
            Endpoint::AccountRemoval => &self.account_removal,
            Endpoint::Accounts => &self.accounts,
        }
    }

    /// URL for a per-account endpoint with `account_id` filled in.
    ///
    /// Rejects ids that would change which resource the URL addresses.
    pub fn account_url(&self, endpoint: Endpoint, account_id: &str) -> Result<String> {
        if !endpoint.needs_account_id() {
            return Err(Error::InvalidArgument(format!(
                "endpoint {} does not take an account id",
                endpoint.name()
            )));
        }
        validate_account_id(account_id)?;
        Ok(self
            .url(endpoint)
            .replacen(ACCOUNT_ID_PLACEHOLDER, account_id, 1))
    }
}

fn validate_account_id(account_id: &str) -> Result<()> {
    if account_id.is_empty() {
        return Err(Error::InvalidArgument("account id is empty".into()));
    }
    if let Some(c) = account_id
        .chars()
        .find(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace())
    {
        return Err(Error::InvalidArgument(format!(
            "account id contains {c:?}: {account_id}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_BASE_URL;

    fn endpoints() -> Endpoints {
        Endpoints::resolve(DEFAULT_BASE_URL, "v1.1", "123456")
    }

    #[test]
    fn resolves_every_template_with_version() {
        let endpoints = endpoints();
        for endpoint in Endpoint::ALL {
            let url = endpoints.url(endpoint);
            assert!(url.starts_with("https://graph.accountkit.com/v1.1/"), "got: {url}");
            assert_eq!(url.matches("v1.1").count(), 1, "version substituted once: {url}");
            assert!(!url.contains("{version}"));
            assert!(!url.contains("{app_id}"));
        }
    }

    #[test]
    fn resolves_known_urls() {
        let endpoints = endpoints();
        assert_eq!(
            endpoints.url(Endpoint::Me),
            "https://graph.accountkit.com/v1.1/me"
        );
        assert_eq!(
            endpoints.url(Endpoint::AccessToken),
            "https://graph.accountkit.com/v1.1/access_token"
        );
        assert_eq!(
            endpoints.url(Endpoint::Accounts),
            "https://graph.accountkit.com/v1.1/123456/accounts/"
        );
        assert_eq!(
            endpoints.url(Endpoint::InvalidateAllTokens),
            "https://graph.accountkit.com/v1.1/{account_id}/invalidate_all_tokens"
        );
    }

    #[test]
    fn clients_with_different_versions_are_independent() {
        let a = Endpoints::resolve(DEFAULT_BASE_URL, "v1.0", "1");
        let b = Endpoints::resolve(DEFAULT_BASE_URL, "v1.3", "2");
        assert!(a.url(Endpoint::Me).contains("/v1.0/"));
        assert!(b.url(Endpoint::Me).contains("/v1.3/"));
        // Templates themselves are untouched
        assert_eq!(Endpoint::Me.template(), "/{version}/me");
    }

    #[test]
    fn trailing_slash_on_base_url_is_ignored() {
        let endpoints = Endpoints::resolve("http://127.0.0.1:9000/", "v1.1", "1");
        assert_eq!(endpoints.url(Endpoint::Me), "http://127.0.0.1:9000/v1.1/me");
    }

    #[test]
    fn account_url_substitutes_id() {
        let endpoints = endpoints();
        assert_eq!(
            endpoints
                .account_url(Endpoint::InvalidateAllTokens, "acct42")
                .unwrap(),
            "https://graph.accountkit.com/v1.1/acct42/invalidate_all_tokens"
        );
        assert_eq!(
            endpoints
                .account_url(Endpoint::AccountRemoval, "acct42")
                .unwrap(),
            "https://graph.accountkit.com/v1.1/acct42"
        );
    }

    #[test]
    fn account_url_rejects_path_breaking_ids() {
        let endpoints = endpoints();
        for bad in ["", "a/b", "a?b", "a#b", "a b", "%2F"] {
            let result = endpoints.account_url(Endpoint::AccountRemoval, bad);
            assert!(
                matches!(result, Err(Error::InvalidArgument(_))),
                "id {bad:?} must be rejected"
            );
        }
    }

    #[test]
    fn account_url_rejects_endpoints_without_placeholder() {
        let result = endpoints().account_url(Endpoint::Me, "acct42");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn methods_match_provider_api() {
        assert_eq!(Endpoint::AccessToken.method(), Method::GET);
        assert_eq!(Endpoint::Me.method(), Method::GET);
        assert_eq!(Endpoint::Accounts.method(), Method::GET);
        assert_eq!(Endpoint::Logout.method(), Method::POST);
        assert_eq!(Endpoint::InvalidateAllTokens.method(), Method::POST);
        assert_eq!(Endpoint::AccountRemoval.method(), Method::DELETE);
    }
}
