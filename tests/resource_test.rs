//! Resource property semantics and the create/read/update/delete cycle

mod common;

use common::{not_found, turtle, ScriptedBackend};
use oslc_client::rdf::{vocab, Graph, RdfObject};
use oslc_client::{ClientConfig, CoreAccessors, Domain, HttpResponse, OslcClient, Resource};
use std::collections::HashSet;

const SERVER: &str = "https://jazz.example.com/ccm";
const ROOTSERVICES: &str = "https://jazz.example.com/ccm/rootservices";
const CATALOG: &str = "https://jazz.example.com/ccm/oslc/workitems/catalog";
const PROVIDER: &str = "https://jazz.example.com/ccm/oslc/contexts/_jke/workitems/services.xml";
const FACTORY: &str = "https://jazz.example.com/ccm/oslc/contexts/_jke/drafts/workitems";
const CREATED: &str = "https://jazz.example.com/ccm/resource/itemName/WorkItem/300";
const CHANGE_REQUEST: &str = "http://open-services.net/ns/cm#ChangeRequest";
const SUBJECT: &str = "http://purl.org/dc/terms/subject";

fn work_item() -> Resource {
    Resource::new("https://jazz.example.com/ccm/resource/itemName/WorkItem/257", Graph::new()).unwrap()
}

#[test]
fn test_set_overwrites_previous_values() {
    let properties = [vocab::DCTERMS_TITLE, vocab::DCTERMS_DESCRIPTION, SUBJECT];
    let mut wi = work_item();

    for property in properties {
        wi.set(property, [RdfObject::literal("first"), RdfObject::literal("second")])
            .unwrap();
        wi.set_literal(property, "third").unwrap();

        assert_eq!(wi.get_values(property), vec!["third"]);
        assert!(!wi.get(property).to_vec().contains(&"first"));
    }

    wi.set_link(SUBJECT, "https://jazz.example.com/ccm/category/1").unwrap();
    wi.set(SUBJECT, [RdfObject::literal("ui")]).unwrap();
    assert_eq!(wi.get_values(SUBJECT), vec!["ui"]);
    assert!(wi.link_types().is_empty());

    // other properties untouched
    assert_eq!(wi.title(), Some("third"));
}

#[test]
fn test_multi_valued_round_trip() {
    let mut wi = work_item();
    wi.set(
        SUBJECT,
        [
            RdfObject::literal("auth"),
            RdfObject::iri("https://jazz.example.com/ccm/category/7").unwrap(),
        ],
    )
    .unwrap();

    let got = wi.get(SUBJECT);
    let values: HashSet<&str> = got.to_vec().into_iter().collect();
    let expected: HashSet<&str> = ["auth", "https://jazz.example.com/ccm/category/7"]
        .into_iter()
        .collect();
    assert_eq!(values, expected);
    assert_eq!(wi.link_types().len(), 1);
}

fn discovery(url: &str) -> Option<HttpResponse> {
    let body = match url {
        ROOTSERVICES => format!(
            "<> <{}> <{}> .",
            vocab::CM_SERVICE_PROVIDERS,
            CATALOG
        ),
        CATALOG => format!(
            "<> <http://open-services.net/ns/core#serviceProvider> <{sp}> .\n\
             <{sp}> <http://purl.org/dc/terms/title> \"JKE Banking\"^^<{xml}> .",
            sp = PROVIDER,
            xml = vocab::RDF_XML_LITERAL,
        ),
        PROVIDER => format!(
            "@prefix oslc: <http://open-services.net/ns/core#> .\n\
             <> oslc:service [ oslc:creationFactory [ oslc:creation <{}> ; oslc:usage <{}> ] ] .",
            FACTORY, CHANGE_REQUEST
        ),
        _ => return None,
    };
    Some(turtle(url, 200, body))
}

#[tokio::test]
async fn test_create_update_delete() {
    let backend = ScriptedBackend::new(|request, seen| {
        if let Some(response) = discovery(&request.url) {
            return response;
        }
        match (request.method.as_str(), request.url.as_str()) {
            ("POST", FACTORY) => HttpResponse::new(201, FACTORY).with_header("Location", CREATED),
            ("GET", CREATED) => turtle(
                CREATED,
                200,
                "<> <http://purl.org/dc/terms/title> \"Crash on save\" ; \
                 <http://purl.org/dc/terms/identifier> \"300\" .",
            )
            .with_header("ETag", format!("\"{}\"", seen + 1)),
            ("PUT", CREATED) => HttpResponse::new(200, CREATED).with_header("ETag", "\"2\""),
            ("DELETE", CREATED) => HttpResponse::new(204, CREATED),
            _ => not_found(&request.url),
        }
    });
    backend.set_cookie("JSESSIONID", "0000abc:1");

    let mut client = OslcClient::with_backend(ClientConfig::default(), backend.clone());
    client
        .use_service_provider(SERVER, "JKE Banking", Domain::CM)
        .await
        .unwrap();

    let mut draft = Resource::anonymous();
    draft.set_title("Crash on save").unwrap();
    let mut created = client.create_resource(CHANGE_REQUEST, &draft).await.unwrap();

    assert_eq!(created.uri(), CREATED);
    assert_eq!(created.identifier(), Some("300"));
    assert_eq!(created.etag(), Some("\"1\""));

    let requests = backend.requests();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    assert_eq!(
        post.header_value("content-type"),
        Some("application/rdf+xml; charset=utf-8")
    );
    assert_eq!(post.header_value("x-jazz-csrf-prevent"), Some("0000abc:1"));
    assert!(post.body_text().contains("Crash on save"));

    created.set_title("Crash on save as").unwrap();
    let etag = created.etag().map(String::from);
    let updated = client.put_resource(&created, etag.as_deref()).await.unwrap();
    assert_eq!(updated.etag(), Some("\"2\""));
    assert_eq!(updated.title(), Some("Crash on save as"));

    let put = backend
        .requests()
        .into_iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    assert_eq!(put.header_value("if-match"), Some("\"1\""));
    assert!(put.body_text().contains("Crash on save as"));

    client.delete_resource(&updated).await.unwrap();
    let delete = backend
        .requests()
        .into_iter()
        .find(|r| r.method.as_str() == "DELETE")
        .unwrap();
    assert_eq!(delete.header_value("x-jazz-csrf-prevent"), Some("0000abc:1"));
}

#[tokio::test]
async fn test_update_conflict_is_reported() {
    let backend = ScriptedBackend::new(|request, _| match request.method.as_str() {
        "PUT" => HttpResponse::new(412, request.url.as_str()).with_body("ETag mismatch"),
        _ => not_found(&request.url),
    });
    let client = OslcClient::with_backend(ClientConfig::default(), backend);

    let err = client
        .put_resource(&work_item(), Some("\"stale\""))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(412));
    assert_eq!(err.body(), Some("ETag mismatch"));
}

#[tokio::test]
async fn test_anonymous_resource_cannot_be_deleted() {
    let backend = ScriptedBackend::new(|request, _| not_found(&request.url));
    let client = OslcClient::with_backend(ClientConfig::default(), backend.clone());

    assert!(client.delete_resource(&Resource::anonymous()).await.is_err());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_create_without_provider() {
    let backend = ScriptedBackend::new(|request, _| not_found(&request.url));
    let client = OslcClient::with_backend(ClientConfig::default(), backend);

    let err = client
        .create_resource(CHANGE_REQUEST, &Resource::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, oslc_client::OslcError::NoServiceProvider));
}

#[tokio::test]
async fn test_owner_name_is_cached() {
    const USER: &str = "https://jazz.example.com/jts/users/alice";
    let backend = ScriptedBackend::new(|request, _| match request.url.as_str() {
        USER => turtle(USER, 200, "<> <http://xmlns.com/foaf/0.1/name> \"Alice Liddell\" ."),
        _ => not_found(&request.url),
    });
    let client = OslcClient::with_backend(ClientConfig::default(), backend.clone());

    assert_eq!(client.get_owner(USER).await, "Alice Liddell");
    assert_eq!(client.get_owner(USER).await, "Alice Liddell");
    assert_eq!(backend.count("GET", USER), 1);

    assert_eq!(
        client.get_owner("https://jazz.example.com/jts/users/nobody").await,
        "Unknown"
    );
}
