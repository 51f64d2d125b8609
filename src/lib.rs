//! tokengate - bearer-credential attachment with transparent refresh.
//!
//! For every outgoing HTTP request the [`RequestAuthenticator`] decides
//! whether a valid bearer credential can be attached, refreshes an expired
//! one against the auth service, or forces a logout when nothing usable
//! remains. It is constructed once with three injected collaborators:
//!
//! - a [`CredentialStore`] holding the access/refresh token pair and the
//!   temporary token used by partial login flows,
//! - a [`SessionController`] owning the authenticated user,
//! - a [`Navigator`] that can redirect the user to the login view.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokengate::{
//!     Config, KeyringCredentialStore, LoginRedirect, Navigator,
//!     RequestAuthenticator, Session,
//! };
//!
//! struct AppNavigator;
//!
//! impl Navigator for AppNavigator {
//!     fn current_path(&self) -> String {
//!         "/orders".to_string()
//!     }
//!     fn redirect_to_login(&self, redirect: LoginRedirect) {
//!         println!("redirecting to {}", redirect.target());
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let authenticator = RequestAuthenticator::new(
//!     Config::default(),
//!     Arc::new(KeyringCredentialStore::new()),
//!     Arc::new(Session::new()),
//!     Arc::new(AppNavigator),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod navigation;

pub use api::{AuthError, RequestAuthenticator};
pub use auth::credentials::{
    CredentialStore, KeyringCredentialStore, MemoryCredentialStore, StoredCredentials,
};
pub use auth::session::{Session, SessionController, UserData};
pub use auth::token::{decode_claims, Claims, TokenError};
pub use config::Config;
pub use navigation::{LoginRedirect, Navigator};
