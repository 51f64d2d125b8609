//! Request authentication middleware.
//!
//! `RequestAuthenticator` composes around the HTTP transport's send
//! operation: authenticate a request, then dispatch it. Every failure path
//! converges on logout.

pub mod authenticator;
pub mod error;

pub use authenticator::RequestAuthenticator;
pub use error::AuthError;
