//! AccountKit server-side client
//!
//! Wraps the AccountKit Graph API for the server half of the login flow.
//! Every public operation issues exactly one HTTP request and returns the
//! decoded JSON body, failing on any non-2xx response.
//!
//! Session flow:
//! 1. Client SDK hands the server an authorization code
//! 2. Server calls `AccountKitClient::retrieve_user_access_token()`
//! 3. Server calls `AccountKitClient::get_user_session()` to read the account
//! 4. `logout()` / `logout_all_sessions()` end sessions remotely
//! 5. `remove_account()` and `get_accounts_after_removal()` serve the
//!    provider's data-deletion flow

pub mod client;
pub mod config;
pub mod constants;
pub mod endpoints;
pub mod error;
pub mod proof;
pub mod secret;
pub mod sink;

pub use client::{AccountKitClient, Confirmation, PagedAccounts, SessionData};
pub use config::ClientConfig;
pub use constants::*;
pub use endpoints::{Endpoint, Endpoints};
pub use error::{Error, Result};
pub use proof::app_secret_proof;
pub use secret::SecretString;
pub use sink::{DebugSink, StdoutSink, TracingSink};
