//! Authentication primitives for the request authenticator.
//!
//! This module provides:
//! - `CredentialStore`: access/refresh/temporary token storage (keychain or in-memory)
//! - `Session`: holds the authenticated user, optionally persisted to disk
//! - `token`: unverified JWT expiry decoding

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::{
    CredentialStore, KeyringCredentialStore, MemoryCredentialStore, StoredCredentials,
};
pub use session::{Session, SessionController, UserData};
pub use token::{decode_claims, Claims, TokenError};
