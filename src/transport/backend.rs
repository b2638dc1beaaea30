//! The seam between the protocol logic and the HTTP stack
//!
//! [`AuthenticatingTransport`](super::AuthenticatingTransport) only talks to
//! an [`HttpBackend`], which makes the challenge handling testable against a
//! scripted backend. [`ReqwestBackend`] is the real one.

use super::{HttpRequest, HttpResponse};
use crate::config::ClientConfig;
use crate::error::OslcResult;
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{redirect, Client, Url};
use std::sync::Arc;
use tracing::debug;

/// Executes one HTTP exchange, without interpreting the status
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> OslcResult<HttpResponse>;

    /// Value of a session cookie the backend holds for `url`
    fn cookie(&self, _url: &str, _name: &str) -> Option<String> {
        None
    }
}

/// reqwest-based backend with a shared cookie jar
///
/// Two clients share the jar: one follows redirects, the other does not
/// (JEE form login answers with a redirect that must be seen, not followed).
pub struct ReqwestBackend {
    client: Client,
    no_redirect_client: Client,
    jar: Arc<Jar>,
}

impl ReqwestBackend {
    pub fn new(config: &ClientConfig) -> OslcResult<Self> {
        let jar = Arc::new(Jar::default());

        let client = Client::builder()
            .timeout(config.timeout())
            .cookie_provider(jar.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let no_redirect_client = Client::builder()
            .timeout(config.timeout())
            .cookie_provider(jar.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            no_redirect_client,
            jar,
        })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: HttpRequest) -> OslcResult<HttpResponse> {
        let client = if request.follow_redirects {
            &self.client
        } else {
            &self.no_redirect_client
        };

        debug!("{} {}", request.method, request.url);

        let mut builder = client.request(request.method.clone(), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = &request.basic_auth {
            builder = builder.basic_auth(&credentials.user, Some(&credentials.password));
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let url = response.url().to_string();
        let mut headers = indexmap::IndexMap::new();
        for (name, value) in response.headers() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing: &mut String| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        let body = response.bytes().await?;

        debug!("{} {} -> {}", request.method, request.url, status);

        Ok(HttpResponse {
            status,
            url,
            headers,
            body,
        })
    }

    fn cookie(&self, url: &str, name: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let cookies = self.jar.cookies(&url)?;
        let cookies = cookies.to_str().ok()?;
        cookie_value(cookies, name)
    }
}

/// Find one cookie in a `Cookie` header value (`a=1; b=2`)
pub(crate) fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
