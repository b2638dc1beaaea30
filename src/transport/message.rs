//! Backend-neutral HTTP request and response values

use bytes::Bytes;
use indexmap::IndexMap;
use reqwest::Method;
use serde::Serialize;

/// User id and password used to answer authentication challenges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

/// An outgoing request
///
/// Header names are stored lower-cased.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub body: Option<Bytes>,
    /// HTTP Basic credentials to attach
    pub basic_auth: Option<Credentials>,
    /// Follow 3xx responses (off for form login, which expects the redirect itself)
    pub follow_redirects: bool,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: IndexMap::new(),
            body: None,
            basic_auth: None,
            follow_redirects: true,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Set a header, replacing any previous value
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Set a header only when the request does not carry one already
    pub fn default_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| value.into());
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// URL-encoded form body, fields in the given order
    pub fn form<T: Serialize + ?Sized>(self, fields: &T) -> Result<Self, serde_urlencoded::ser::Error> {
        let encoded = serde_urlencoded::to_string(fields)?;
        Ok(self
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encoded))
    }

    pub fn basic_auth(mut self, credentials: Credentials) -> Self {
        self.basic_auth = Some(credentials);
        self
    }

    pub fn no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Body as text, for logging
    pub fn body_text(&self) -> String {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}

/// A received response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Final URL after redirects
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, url: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            headers: IndexMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Content-Type, or an empty string
    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or_default()
    }

    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}
