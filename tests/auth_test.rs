//! Authentication challenge handling against a scripted backend

mod common;

use common::{not_found, turtle, ScriptedBackend};
use oslc_client::{
    AuthChallenge, AuthState, AuthenticatingTransport, ClientConfig, CoreAccessors, Credentials,
    HttpRequest, HttpResponse, OslcClient, OslcError,
};
use oslc_client::transport::RequestContext;

const WORK_ITEM: &str = "https://jazz.example.com/ccm/resource/itemName/WorkItem/42";
const LOGIN: &str = "https://jazz.example.com/ccm/j_security_check";
const TOKEN: &str = "https://jas.example.com/oidc/endpoint/jazzop/token";

fn token_challenge(url: &str) -> HttpResponse {
    HttpResponse::new(401, url).with_header(
        "WWW-Authenticate",
        format!(r#"jauth realm="https://jas.example.com/oidc", token_uri="{}""#, TOKEN),
    )
}

#[tokio::test]
async fn test_token_realm_retries_exactly_once() {
    let backend = ScriptedBackend::new(|request, _| {
        if request.url == TOKEN {
            HttpResponse::new(200, TOKEN).with_body("tok-123\n")
        } else {
            token_challenge(&request.url)
        }
    });
    let transport = AuthenticatingTransport::new(backend.clone(), ClientConfig::new("alice", "secret"));

    let response = transport.send(HttpRequest::get(WORK_ITEM)).await.unwrap();

    assert_eq!(response.status, 401);
    assert_eq!(backend.count("GET", WORK_ITEM), 2);
    assert_eq!(backend.count("POST", TOKEN), 1);

    let requests = backend.requests();
    let exchange = &requests[1];
    assert_eq!(exchange.body_text(), "username=alice&password=secret");
    assert_eq!(exchange.header_value("accept"), Some("text/plain"));

    let replay = &requests[2];
    assert_eq!(replay.header_value("authorization"), Some("Bearer tok-123"));
    assert!(transport.has_authorization().await);
}

#[tokio::test]
async fn test_request_gives_up_when_everything_is_401() {
    let backend = ScriptedBackend::new(|request, _| token_challenge(&request.url));
    let transport = AuthenticatingTransport::new(backend.clone(), ClientConfig::new("alice", "secret"));

    let err = transport.request(HttpRequest::get(WORK_ITEM)).await.unwrap_err();

    match err {
        OslcError::AuthenticationFailed { strategy, url, status } => {
            assert_eq!(strategy, "token");
            assert_eq!(url, TOKEN);
            assert_eq!(status, 401);
        }
        other => panic!("expected AuthenticationFailed, got {:?}", other),
    }
    assert_eq!(backend.requests().len(), 2);
    assert_eq!(backend.count("GET", WORK_ITEM), 1);
    assert_eq!(backend.count("POST", TOKEN), 1);
}

#[tokio::test]
async fn test_request_reports_401_after_single_replay() {
    let backend = ScriptedBackend::new(|request, _| {
        if request.url == TOKEN {
            HttpResponse::new(200, TOKEN).with_body("tok-123")
        } else {
            token_challenge(&request.url)
        }
    });
    let transport = AuthenticatingTransport::new(backend.clone(), ClientConfig::new("alice", "secret"));

    let err = transport.request(HttpRequest::get(WORK_ITEM)).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(backend.count("GET", WORK_ITEM), 2);
    assert_eq!(backend.count("POST", TOKEN), 1);
}

#[tokio::test]
async fn test_bearer_token_is_reused() {
    let backend = ScriptedBackend::new(|request, _| {
        if request.url == TOKEN {
            return HttpResponse::new(200, TOKEN).with_body("tok-9");
        }
        if request.header_value("authorization") == Some("Bearer tok-9") {
            turtle(&request.url, 200, "<> <http://purl.org/dc/terms/title> \"ok\" .")
        } else {
            token_challenge(&request.url)
        }
    });
    let transport = AuthenticatingTransport::new(backend.clone(), ClientConfig::new("alice", "secret"));

    assert_eq!(transport.send(HttpRequest::get(WORK_ITEM)).await.unwrap().status, 200);
    let other = "https://jazz.example.com/ccm/resource/itemName/WorkItem/43";
    assert_eq!(transport.send(HttpRequest::get(other)).await.unwrap().status, 200);

    assert_eq!(backend.count("POST", TOKEN), 1);
    assert_eq!(backend.count("GET", other), 1);
}

#[tokio::test]
async fn test_form_login_then_replay() {
    let backend = ScriptedBackend::new(|request, seen| match (request.method.as_str(), request.url.as_str()) {
        ("GET", WORK_ITEM) if seen == 0 => HttpResponse::new(401, WORK_ITEM)
            .with_header("X-com-ibm-team-repository-web-auth-msg", "authrequired"),
        ("GET", WORK_ITEM) => turtle(
            WORK_ITEM,
            200,
            "<> <http://purl.org/dc/terms/title> \"Login page is broken\" .",
        ),
        ("POST", LOGIN) => HttpResponse::new(302, LOGIN)
            .with_header("Location", "https://jazz.example.com/ccm/authenticated/identity"),
        _ => not_found(&request.url),
    });
    let client = OslcClient::with_backend(ClientConfig::new("alice", "p@ss word"), backend.clone());

    let resource = client.get_rdf_resource(WORK_ITEM).await.unwrap();
    assert_eq!(resource.title(), Some("Login page is broken"));

    let requests = backend.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].url, LOGIN);
    assert!(!requests[1].follow_redirects);
    assert_eq!(requests[1].body_text(), "j_username=alice&j_password=p%40ss+word");
    assert_eq!(
        requests[1].header_value("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(backend.count("GET", WORK_ITEM), 2);
}

#[tokio::test]
async fn test_form_login_rejected() {
    let backend = ScriptedBackend::new(|request, _| match request.method.as_str() {
        "POST" => HttpResponse::new(200, LOGIN).with_body("<html>login form</html>"),
        _ => HttpResponse::new(200, WORK_ITEM)
            .with_header("x-com-ibm-team-repository-web-auth-msg", "authrequired"),
    });
    let transport = AuthenticatingTransport::new(backend.clone(), ClientConfig::new("alice", "wrong"));

    let err = transport.send(HttpRequest::get(WORK_ITEM)).await.unwrap_err();
    match err {
        OslcError::AuthenticationFailed { strategy, url, status } => {
            assert_eq!(strategy, "form");
            assert_eq!(url, LOGIN);
            assert_eq!(status, 200);
        }
        other => panic!("expected AuthenticationFailed, got {:?}", other),
    }
    assert_eq!(backend.count("GET", WORK_ITEM), 1);
}

#[tokio::test]
async fn test_basic_challenge_sets_credentials_for_later_requests() {
    let backend = ScriptedBackend::new(|request, _| {
        if request.basic_auth.is_some() {
            HttpResponse::new(200, request.url.as_str())
        } else {
            HttpResponse::new(401, request.url.as_str()).with_header("WWW-Authenticate", "Basic realm=\"jazz\"")
        }
    });
    let transport = AuthenticatingTransport::new(backend.clone(), ClientConfig::new("alice", "secret"));

    let mut ctx = RequestContext::new();
    let response = transport
        .send_with_context(HttpRequest::get(WORK_ITEM), &mut ctx)
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(
        ctx.trail()[1],
        AuthState::ChallengeDetected(AuthChallenge::Basic)
    );

    let second = "https://jazz.example.com/ccm/rootservices";
    assert_eq!(transport.send(HttpRequest::get(second)).await.unwrap().status, 200);
    assert_eq!(backend.count("GET", second), 1);
    assert_eq!(
        backend.requests().last().and_then(|r| r.basic_auth.clone()),
        Some(Credentials::new("alice", "secret"))
    );
}

#[tokio::test]
async fn test_challenge_without_credentials_returns_401() {
    let backend = ScriptedBackend::new(|request, _| token_challenge(&request.url));
    let transport = AuthenticatingTransport::new(backend.clone(), ClientConfig::default());

    let response = transport.request(HttpRequest::get(WORK_ITEM)).await.unwrap();
    assert_eq!(response.status, 401);
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_default_headers() {
    let backend = ScriptedBackend::new(|request, _| HttpResponse::new(200, request.url.as_str()));
    let config = ClientConfig::default()
        .with_configuration_context("https://jazz.example.com/gc/configuration/17");
    let transport = AuthenticatingTransport::new(backend.clone(), config);

    transport
        .send(HttpRequest::get(WORK_ITEM).header("Accept", "application/rdf+xml"))
        .await
        .unwrap();

    let request = &backend.requests()[0];
    assert_eq!(request.header_value("OSLC-Core-Version"), Some("2.0"));
    assert_eq!(request.header_value("Accept"), Some("application/rdf+xml"));
    assert_eq!(
        request.header_value("Configuration-Context"),
        Some("https://jazz.example.com/gc/configuration/17")
    );
    assert!(request.basic_auth.is_none());
}

#[tokio::test]
async fn test_csrf_token_from_session_cookie() {
    let backend = ScriptedBackend::new(|request, _| HttpResponse::new(204, request.url.as_str()));
    let transport = AuthenticatingTransport::new(backend.clone(), ClientConfig::default());
    assert_eq!(transport.csrf_token(WORK_ITEM), "1");

    backend.set_cookie("JSESSIONID", "0000abc:1");
    assert_eq!(transport.csrf_token(WORK_ITEM), "0000abc:1");
}
