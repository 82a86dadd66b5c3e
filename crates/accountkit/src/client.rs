//! AccountKit Graph API client
//!
//! One `AccountKitClient` per application identity. The app access token and
//! endpoint URLs are derived once in `new`; the only state that changes
//! afterwards is the user access token stored by
//! `retrieve_user_access_token`.
//!
//! Every operation funnels through `call`, which fails on any non-2xx status
//! with the status code and body.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::constants::{APP_ACCESS_TOKEN_PREFIX, DEFAULT_PAGE_SIZE};
use crate::endpoints::{Endpoint, Endpoints};
use crate::error::{Error, Result};
use crate::proof::app_secret_proof;
use crate::secret::SecretString;
use crate::sink::{DebugSink, StdoutSink};

/// Decoded body of `access_token` and `me` responses.
pub type SessionData = Value;

/// Decoded body of the post-removal `accounts` listing.
pub type PagedAccounts = Value;

/// Decoded body of logout and removal responses.
pub type Confirmation = Value;

type Params = Vec<(&'static str, String)>;

/// AccountKit client for one application.
///
/// Holds the app identity, the derived `AA|{app_id}|{app_secret}` token, the
/// endpoint URLs resolved for this client, and the user access token from the
/// last code exchange. Operations that change the user token take `&mut self`.
pub struct AccountKitClient {
    http: reqwest::Client,
    app_id: String,
    app_secret: SecretString,
    api_version: String,
    app_access_token: SecretString,
    endpoints: Endpoints,
    user_access_token: Option<SecretString>,
    debug: bool,
    sink: Arc<dyn DebugSink>,
}

impl AccountKitClient {
    /// Build a client from `config`.
    ///
    /// Credentials are not checked locally; the provider rejects bad ones on
    /// the first call. A zero timeout or a non-http(s) `base_url` is rejected.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Http(format!("building HTTP client: {}", e.without_url())))?;

        let app_access_token = SecretString::new(format!(
            "{APP_ACCESS_TOKEN_PREFIX}|{}|{}",
            config.app_id,
            config.app_secret.expose()
        ));
        let endpoints = Endpoints::resolve(&config.base_url, &config.api_version, &config.app_id);

        Ok(Self {
            http,
            app_id: config.app_id.clone(),
            app_secret: config.app_secret.clone(),
            api_version: config.api_version.clone(),
            app_access_token,
            endpoints,
            user_access_token: None,
            debug: config.debug,
            sink: Arc::new(StdoutSink),
        })
    }

    /// Send debug lines to `sink` instead of stdout.
    pub fn with_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Use a preconfigured HTTP client (proxies, custom TLS roots).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Application id the client was built for.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Graph API version baked into every endpoint URL.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// `AA|{app_id}|{app_secret}`
    pub fn app_access_token(&self) -> &SecretString {
        &self.app_access_token
    }

    /// Endpoint URLs resolved at construction.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// User access token from the last code exchange, if any.
    pub fn user_access_token(&self) -> Option<&str> {
        self.user_access_token.as_ref().map(SecretString::expose)
    }

    /// Restore a user access token obtained earlier (e.g. from a session store).
    pub fn set_user_access_token(&mut self, token: impl Into<SecretString>) {
        self.user_access_token = Some(token.into());
    }

    /// Forget the stored user access token. `logout` does not do this itself.
    pub fn clear_user_access_token(&mut self) {
        self.user_access_token = None;
    }

    /// Exchange an authorization code from the client SDK for a user access token.
    ///
    /// The response's `access_token` replaces the stored user token (and
    /// clears it if the field is missing). The decoded body is returned as is.
    pub async fn retrieve_user_access_token(&mut self, auth_code: &str) -> Result<SessionData> {
        let params: Params = vec![
            ("grant_type", "authorization_code".to_owned()),
            ("code", auth_code.to_owned()),
            ("access_token", self.app_access_token.expose().to_owned()),
        ];
        let url = self.endpoints.url(Endpoint::AccessToken).to_owned();
        let data = self.call(Endpoint::AccessToken, &url, &params).await?;

        self.user_access_token = data
            .get("access_token")
            .and_then(Value::as_str)
            .map(SecretString::new);
        if self.user_access_token.is_some() {
            let account_id = data.get("id").and_then(Value::as_str).unwrap_or_default();
            info!(account_id, "stored user access token");
        } else {
            warn!("access_token response carried no access_token field");
        }

        Ok(data)
    }

    /// HMAC-SHA256 proof of `access_token`, or of the stored user token when
    /// `access_token` is `None` or empty.
    pub fn get_app_secret_proof(&self, access_token: Option<&str>) -> Result<String> {
        let token = access_token
            .filter(|t| !t.is_empty())
            .or_else(|| self.user_access_token())
            .ok_or(Error::MissingAccessToken)?;
        app_secret_proof(self.app_secret.expose(), token)
    }

    /// Account behind the stored user access token.
    pub async fn get_user_session(&self) -> Result<SessionData> {
        let params = self.user_params()?;
        self.call(Endpoint::Me, self.endpoints.url(Endpoint::Me), &params)
            .await
    }

    /// List accounts once the app has been removed by the user.
    ///
    /// Only meaningful inside the provider's data-deletion callback flow.
    /// `page_size` defaults to 100.
    pub async fn get_accounts_after_removal(
        &self,
        page_size: Option<u32>,
    ) -> Result<PagedAccounts> {
        let params: Params = vec![
            ("access_token", self.app_access_token.expose().to_owned()),
            ("limit", page_size.unwrap_or(DEFAULT_PAGE_SIZE).to_string()),
        ];
        self.call(
            Endpoint::Accounts,
            self.endpoints.url(Endpoint::Accounts),
            &params,
        )
        .await
    }

    /// End the session of the stored user access token.
    pub async fn logout(&self) -> Result<Confirmation> {
        let params = self.user_params()?;
        self.call(Endpoint::Logout, self.endpoints.url(Endpoint::Logout), &params)
            .await
    }

    /// End every session of `account_id`.
    pub async fn logout_all_sessions(&self, account_id: &str) -> Result<Confirmation> {
        let url = self
            .endpoints
            .account_url(Endpoint::InvalidateAllTokens, account_id)?;
        let params = self.app_params();
        self.call(Endpoint::InvalidateAllTokens, &url, &params).await
    }

    /// Delete `account_id` from the provider's account store.
    pub async fn remove_account(&self, account_id: &str) -> Result<Confirmation> {
        let url = self
            .endpoints
            .account_url(Endpoint::AccountRemoval, account_id)?;
        let params = self.app_params();
        self.call(Endpoint::AccountRemoval, &url, &params).await
    }

    fn app_params(&self) -> Params {
        vec![("access_token", self.app_access_token.expose().to_owned())]
    }

    /// User token and its proof. Empty when no token is stored; the provider
    /// rejects such requests, not the client.
    fn user_params(&self) -> Result<Params> {
        match self.user_access_token() {
            Some(token) => Ok(vec![
                ("access_token", token.to_owned()),
                ("appsecret_proof", app_secret_proof(self.app_secret.expose(), token)?),
            ]),
            None => Ok(Vec::new()),
        }
    }

    async fn call(
        &self,
        endpoint: Endpoint,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value> {
        let method: Method = endpoint.method();

        if self.debug && !params.is_empty() {
            self.sink.record(&format!("PARAMS {}", redacted(params)));
        }

        let response = self
            .http
            .request(method.clone(), url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the access token in its query string
                Error::Http(format!(
                    "{} request failed: {}",
                    endpoint.name(),
                    e.without_url()
                ))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                Error::Http(format!(
                    "reading {} response: {}",
                    endpoint.name(),
                    e.without_url()
                ))
            })?;

        debug!(
            endpoint = endpoint.name(),
            %method,
            url,
            status = status.as_u16(),
            "accountkit response"
        );
        if self.debug {
            self.sink
                .record(&format!("{method} {} {url}", status.as_u16()));
            self.sink.record(&redacted_body(&body));
        }

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("{} response is not JSON: {e}", endpoint.name())))
    }
}

impl fmt::Debug for AccountKitClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountKitClient")
            .field("app_id", &self.app_id)
            .field("api_version", &self.api_version)
            .field("endpoints", &self.endpoints)
            .field("has_user_access_token", &self.user_access_token.is_some())
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

/// `key=value&...` with access token values masked. The app access token
/// embeds the app secret.
fn redacted(params: &[(&'static str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| match *key {
            "access_token" => format!("{key}=[REDACTED]"),
            _ => format!("{key}={value}"),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Response body with a top-level `access_token` masked. Bodies that are not
/// JSON objects are returned unchanged.
fn redacted_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut fields)) if fields.contains_key("access_token") => {
            fields.insert("access_token".into(), Value::from("[REDACTED]"));
            Value::Object(fields).to_string()
        }
        _ => body.to_owned(),
    }
}
