//! HTTP transport with transparent authentication
//!
//! - [`HttpRequest`] / [`HttpResponse`]: backend-neutral messages
//! - [`HttpBackend`]: one HTTP exchange; [`ReqwestBackend`] is the real one
//! - [`AuthenticatingTransport`]: detects form, token-realm and Basic
//!   challenges, authenticates once and replays the original request

mod auth;
mod backend;
mod message;

pub use auth::{
    security_check_url, AuthChallenge, AuthState, AuthenticatingTransport, RequestContext,
    WEB_AUTH_MSG_HEADER,
};
pub use backend::{HttpBackend, ReqwestBackend};
pub use message::{Credentials, HttpRequest, HttpResponse};
