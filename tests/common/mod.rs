//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use oslc_client::{HttpBackend, HttpRequest, HttpResponse, OslcResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Handler = Box<dyn Fn(&HttpRequest, usize) -> HttpResponse + Send + Sync>;

/// Backend that answers from a closure and records every request
///
/// The handler gets the request and how many earlier requests went to the
/// same method and URL.
pub struct ScriptedBackend {
    handler: Handler,
    requests: Mutex<Vec<HttpRequest>>,
    cookies: Mutex<HashMap<String, String>>,
}

impl ScriptedBackend {
    pub fn new(
        handler: impl Fn(&HttpRequest, usize) -> HttpResponse + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            cookies: Mutex::new(HashMap::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent to exactly this method and URL
    pub fn count(&self, method: &str, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == method && r.url == url)
            .count()
    }

    pub fn set_cookie(&self, name: &str, value: &str) {
        self.cookies
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }
}

#[async_trait]
impl HttpBackend for ScriptedBackend {
    async fn execute(&self, request: HttpRequest) -> OslcResult<HttpResponse> {
        let seen = {
            let mut requests = self.requests.lock().unwrap();
            let seen = requests
                .iter()
                .filter(|r| r.method == request.method && r.url == request.url)
                .count();
            requests.push(request.clone());
            seen
        };
        Ok((self.handler)(&request, seen))
    }

    fn cookie(&self, _url: &str, name: &str) -> Option<String> {
        self.cookies.lock().unwrap().get(name).cloned()
    }
}

pub fn turtle(url: &str, status: u16, body: impl Into<String>) -> HttpResponse {
    HttpResponse::new(status, url)
        .with_header("Content-Type", "text/turtle")
        .with_body(body.into())
}

pub fn not_found(url: &str) -> HttpResponse {
    HttpResponse::new(404, url).with_body("not found")
}
