//! Authentication-challenge handling
//!
//! Every request goes through a small state machine:
//!
//! ```text
//! Initial ──► ChallengeDetected ──► Authenticating ──► Retried ──► Done
//!    │               │
//!    └───────────────┴──────────────────────────────────────────► Done
//! ```
//!
//! The initial response is classified as one of three challenges (JEE form
//! login, a `jauth` token realm, or a plain 401 answered with Basic) or as no
//! challenge at all. A challenge is resolved once, the original request is
//! replayed once, and whatever the replay returns is final. The one-shot
//! guard lives in the per-request [`RequestContext`], never on shared state.
//!
//! Session cookies land in the backend's cookie jar and bearer tokens in the
//! transport session, so later requests reuse them until the server issues
//! a fresh challenge.

use super::{Credentials, HttpBackend, HttpRequest, HttpResponse};
use crate::config::ClientConfig;
use crate::error::{OslcError, OslcResult};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Header Jazz servers set when a JEE form login is required
pub const WEB_AUTH_MSG_HEADER: &str = "x-com-ibm-team-repository-web-auth-msg";

static TOKEN_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"token_uri="([^"]+)""#).expect("token_uri pattern must compile"));

/// Authentication challenge carried by a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChallenge {
    /// JEE form-based login wall
    FormAuthRequired,
    /// `WWW-Authenticate: jauth realm=... token_uri="..."`
    TokenRealm { token_uri: String },
    /// Any other 401
    Basic,
    /// Not a challenge
    None,
}

impl AuthChallenge {
    /// Classify a response, checking form, token realm, then Basic
    pub fn classify(response: &HttpResponse) -> Self {
        if response
            .header(WEB_AUTH_MSG_HEADER)
            .is_some_and(|v| v.trim() == "authrequired")
        {
            return AuthChallenge::FormAuthRequired;
        }

        if response.status != 401 {
            return AuthChallenge::None;
        }

        let token_uri = response
            .header("www-authenticate")
            .filter(|v| v.contains("jauth realm"))
            .and_then(|v| {
                TOKEN_URI
                    .captures(v)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
            });

        match token_uri {
            Some(token_uri) => AuthChallenge::TokenRealm { token_uri },
            None => AuthChallenge::Basic,
        }
    }

    /// Strategy name used in errors and logs
    pub fn strategy(&self) -> &'static str {
        match self {
            AuthChallenge::FormAuthRequired => "form",
            AuthChallenge::TokenRealm { .. } => "token",
            AuthChallenge::Basic => "basic",
            AuthChallenge::None => "none",
        }
    }
}

/// State of one logical request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Initial,
    ChallengeDetected(AuthChallenge),
    Authenticating(AuthChallenge),
    Retried,
    Done,
}

/// Per-request context carrying the one-shot retry guard
#[derive(Debug)]
pub struct RequestContext {
    state: AuthState,
    retried: bool,
    trail: Vec<AuthState>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            state: AuthState::Initial,
            retried: false,
            trail: vec![AuthState::Initial],
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Every state visited, in order
    pub fn trail(&self) -> &[AuthState] {
        &self.trail
    }

    pub fn has_retried(&self) -> bool {
        self.retried
    }

    fn transition(&mut self, next: AuthState) {
        self.trail.push(next.clone());
        self.state = next;
    }

    /// Claim the single replay; false if it was already used
    fn claim_retry(&mut self) -> bool {
        !std::mem::replace(&mut self.retried, true)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Authentication state shared by every request of one transport
#[derive(Debug, Default)]
struct Session {
    bearer_token: Option<String>,
    basic: bool,
}

/// HTTP transport that survives one authentication challenge per request
///
/// One instance belongs to one (server, credentials) pair; do not share it
/// across credentials.
pub struct AuthenticatingTransport {
    backend: Arc<dyn HttpBackend>,
    config: ClientConfig,
    session: RwLock<Session>,
}

impl AuthenticatingTransport {
    pub fn new(backend: Arc<dyn HttpBackend>, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            session: RwLock::new(Session::default()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.config
            .credentials()
            .map(|(user, password)| Credentials::new(user, password))
    }

    /// True once a bearer token has been obtained
    pub async fn has_authorization(&self) -> bool {
        self.session.read().await.bearer_token.is_some()
    }

    /// `X-Jazz-CSRF-Prevent` value: the JSESSIONID cookie, or `1`
    pub fn csrf_token(&self, url: &str) -> String {
        self.backend
            .cookie(url, "JSESSIONID")
            .unwrap_or_else(|| "1".to_string())
    }

    /// Send with challenge handling; 2xx and unresolved 401s are returned,
    /// anything else is `RequestFailed`
    pub async fn request(&self, request: HttpRequest) -> OslcResult<HttpResponse> {
        let url = request.url.clone();
        let response = self.send(request).await?;

        if response.is_success() || (response.status == 401 && self.credentials().is_none()) {
            return Ok(response);
        }

        Err(OslcError::RequestFailed {
            status: response.status,
            url,
            body: response.text(),
        })
    }

    /// Send with challenge handling, whatever the final status
    pub async fn send(&self, request: HttpRequest) -> OslcResult<HttpResponse> {
        self.send_with_context(request, &mut RequestContext::new())
            .await
    }

    /// Send with challenge handling, recording the states in `ctx`
    pub async fn send_with_context(
        &self,
        request: HttpRequest,
        ctx: &mut RequestContext,
    ) -> OslcResult<HttpResponse> {
        let mut request = self.with_defaults(request).await;
        let mut response = self.backend.execute(request.clone()).await?;

        loop {
            match ctx.state.clone() {
                AuthState::Initial => match AuthChallenge::classify(&response) {
                    AuthChallenge::None => ctx.transition(AuthState::Done),
                    challenge => {
                        debug!(
                            "{} challenge from {} (status {})",
                            challenge.strategy(),
                            request.url,
                            response.status
                        );
                        ctx.transition(AuthState::ChallengeDetected(challenge));
                    }
                },
                AuthState::ChallengeDetected(challenge) => {
                    if self.credentials().is_none() {
                        debug!("no credentials configured, returning challenge to caller");
                        ctx.transition(AuthState::Done);
                    } else if !ctx.claim_retry() {
                        ctx.transition(AuthState::Done);
                    } else {
                        ctx.transition(AuthState::Authenticating(challenge));
                    }
                }
                AuthState::Authenticating(challenge) => {
                    request = self.authenticate(&challenge, request).await?;
                    response = self.backend.execute(request.clone()).await?;
                    debug!("replayed {} -> {}", request.url, response.status);
                    ctx.transition(AuthState::Retried);
                }
                AuthState::Retried => {
                    if response.status == 401 {
                        warn!("{} still unauthorized after authenticating", request.url);
                    }
                    ctx.transition(AuthState::Done);
                }
                AuthState::Done => return Ok(response),
            }
        }
    }

    /// Send without challenge handling (session defaults still apply)
    pub async fn send_direct(&self, request: HttpRequest) -> OslcResult<HttpResponse> {
        let request = self.with_defaults(request).await;
        self.backend.execute(request).await
    }

    async fn with_defaults(&self, mut request: HttpRequest) -> HttpRequest {
        request.default_header("OSLC-Core-Version", self.config.oslc_version.as_str());
        request.default_header("Accept", self.config.accept.as_str());
        if let Some(context) = &self.config.configuration_context {
            request.default_header("Configuration-Context", context.as_str());
        }

        let session = self.session.read().await;
        if let Some(token) = &session.bearer_token {
            request.default_header("Authorization", format!("Bearer {}", token));
        }
        if session.basic && request.basic_auth.is_none() && request.header_value("authorization").is_none() {
            request.basic_auth = self.credentials();
        }
        request
    }

    /// Resolve a challenge and return the request to replay
    async fn authenticate(
        &self,
        challenge: &AuthChallenge,
        mut request: HttpRequest,
    ) -> OslcResult<HttpRequest> {
        let credentials = self.credentials().ok_or_else(|| {
            OslcError::InvalidArgument("credentials required to answer a challenge".to_string())
        })?;

        match challenge {
            AuthChallenge::FormAuthRequired => {
                self.form_login(&request.url, &credentials).await?;
            }
            AuthChallenge::TokenRealm { token_uri } => {
                let token = self.exchange_token(token_uri, &credentials).await?;
                request.set_header("Authorization", format!("Bearer {}", token));
                self.session.write().await.bearer_token = Some(token);
            }
            AuthChallenge::Basic => {
                request.basic_auth = Some(credentials);
                self.session.write().await.basic = true;
            }
            AuthChallenge::None => {}
        }

        Ok(request)
    }

    /// POST `j_username`/`j_password` to `{origin}/{first-segment}/j_security_check`
    async fn form_login(&self, url: &str, credentials: &Credentials) -> OslcResult<()> {
        let login_url = security_check_url(url)?;
        debug!("form login at {}", login_url);

        let login = HttpRequest::post(login_url.as_str())
            .form(&[
                ("j_username", credentials.user.as_str()),
                ("j_password", credentials.password.as_str()),
            ])
            .map_err(|e| OslcError::InvalidArgument(e.to_string()))?
            .no_redirects();

        let response = self.backend.execute(login).await?;
        if response.is_redirect() {
            Ok(())
        } else {
            Err(OslcError::AuthenticationFailed {
                strategy: "form",
                url: login_url,
                status: response.status,
            })
        }
    }

    /// POST username/password to the token URI; the plain-text body is the token
    async fn exchange_token(&self, token_uri: &str, credentials: &Credentials) -> OslcResult<String> {
        debug!("token exchange at {}", token_uri);

        let exchange = HttpRequest::post(token_uri)
            .form(&[
                ("username", credentials.user.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .map_err(|e| OslcError::InvalidArgument(e.to_string()))?
            .header("Accept", "text/plain");

        let response = self.backend.execute(exchange).await?;
        let token = response.text().trim().to_string();
        if !response.is_success() || token.is_empty() {
            return Err(OslcError::AuthenticationFailed {
                strategy: "token",
                url: token_uri.to_string(),
                status: response.status,
            });
        }
        Ok(token)
    }
}

/// `{origin}/{first-path-segment}/j_security_check`, or `{origin}/j_security_check`
pub fn security_check_url(url: &str) -> OslcResult<String> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| OslcError::InvalidArgument(format!("invalid URL {}: {}", url, e)))?;
    let origin = parsed.origin().ascii_serialization();
    let first_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|s| !s.is_empty());

    Ok(match first_segment {
        Some(segment) => format!("{}/{}/j_security_check", origin, segment),
        None => format!("{}/j_security_check", origin),
    })
}
