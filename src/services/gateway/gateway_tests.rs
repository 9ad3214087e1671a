use super::*;
use crate::dish::wire::{WireBase, WireDish};
use mockito::Matcher;
use serde_json::json;
use std::sync::mpsc;

fn soup() -> WireDish {
    WireDish::Soup {
        base: WireBase {
            name: "So".into(),
            preparation_time: "00:12:00".into(),
        },
        spiciness_scale: 4.into(),
    }
}

fn gateway_for(server: &mockito::ServerGuard) -> HttpGateway {
    HttpGateway::new(format!("{}/dishes/", server.url()), Duration::from_secs(5)).unwrap()
}

#[test]
fn success_returns_server_payload() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/dishes/")
        .match_body(Matcher::Json(json!({
            "name": "So",
            "preparation_time": "00:12:00",
            "type": "soup",
            "spiciness_scale": 4
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 17, "name": "So"}"#)
        .create();
    let outcome = gateway_for(&server).submit(&soup());
    mock.assert();
    assert_eq!(
        outcome,
        SubmitOutcome::Success(json!({"id": 17, "name": "So"}))
    );
}

#[test]
fn bad_request_carries_wire_field_errors() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/dishes/")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"no_of_slices": ["must be positive", "must be an integer"], "detail": "oops"}"#,
        )
        .create();
    let outcome = gateway_for(&server).submit(&soup());
    let mut expected = WireErrors::new();
    expected.insert(
        "no_of_slices".into(),
        vec!["must be positive".into(), "must be an integer".into()],
    );
    expected.insert("detail".into(), vec!["oops".into()]);
    assert_eq!(outcome, SubmitOutcome::ValidationFailure(expected));
}

#[test]
fn bad_request_without_error_map_is_generic() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/dishes/")
        .with_status(400)
        .with_body("<html>bad request</html>")
        .create();
    assert_eq!(
        gateway_for(&server).submit(&soup()),
        SubmitOutcome::GenericFailure
    );
}

#[test]
fn server_error_is_generic() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/dishes/")
        .with_status(503)
        .with_body(r#"{"name": ["ignored on non-400"]}"#)
        .create();
    assert_eq!(
        gateway_for(&server).submit(&soup()),
        SubmitOutcome::GenericFailure
    );
}

#[test]
fn unreachable_endpoint_is_generic() {
    let gw = HttpGateway::new("http://127.0.0.1:1/dishes/", Duration::from_secs(2)).unwrap();
    assert_eq!(gw.submit(&soup()), SubmitOutcome::GenericFailure);
}

#[test]
fn empty_success_body_is_null() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", "/dishes/").with_status(204).create();
    assert_eq!(
        gateway_for(&server).submit(&soup()),
        SubmitOutcome::Success(JsonValue::Null)
    );
}

#[test]
fn plain_text_success_body_is_kept_as_string() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/dishes/")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("created")
        .create();
    assert_eq!(
        gateway_for(&server).submit(&soup()),
        SubmitOutcome::Success(JsonValue::String("created".into()))
    );
}

#[test]
fn parse_wire_errors_coerces_scalars() {
    let v = json!({"name": "Too long", "diameter": [12, "bad"]});
    let errs = parse_wire_errors(&v).unwrap();
    assert_eq!(errs["name"], vec!["Too long".to_string()]);
    assert_eq!(errs["diameter"], vec!["12".to_string(), "bad".to_string()]);
    assert!(parse_wire_errors(&json!(["not", "a", "map"])).is_none());
}

struct FixedGateway(SubmitOutcome);

impl SubmissionGateway for FixedGateway {
    fn submit(&self, _dish: &WireDish) -> SubmitOutcome {
        self.0.clone()
    }
}

#[test]
fn spawn_submit_reports_on_channel() {
    let (tx, rx) = mpsc::channel();
    let gw: Arc<dyn SubmissionGateway> = Arc::new(FixedGateway(SubmitOutcome::GenericFailure));
    spawn_submit(gw, soup(), tx);
    let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(outcome, SubmitOutcome::GenericFailure);
}
