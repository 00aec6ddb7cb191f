//! End-to-end workflow tests against a wiremock store and relay.

use kiosk_core::locale::{Lang, MessageKey};
use kiosk_core::AppConfig;
use kiosk_flow::{Outcome, Registrar, RegistrationError, RegistrationRequest};
use kiosk_sheets::{ScriptClient, SheetsClient, WriteMode};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MASTER_GID: u64 = 10;
const OFFERS_GID: u64 = 20;
const REGS_GID: u64 = 30;

fn config(server_uri: &str) -> AppConfig {
    AppConfig {
        script_url: format!("{server_uri}/exec"),
        sheet_id: "sheet-1".into(),
        offers_gid: OFFERS_GID,
        registrations_gid: REGS_GID,
        master_list_gid: MASTER_GID,
        read_timeout_secs: 5,
        verify_attempts: 3,
        verify_base_delay_ms: 0,
        log_level: "info".into(),
        lang: Lang::En,
    }
}

fn registrar(server: &MockServer) -> Registrar {
    let cfg = config(&server.uri());
    let sheets =
        SheetsClient::with_base_url(5, &server.uri()).expect("sheets client should construct");
    let relay = ScriptClient::new(&cfg.script_url, 5, WriteMode::Verifiable)
        .expect("relay client should construct");
    Registrar::with_clients(cfg, sheets, relay)
}

fn request() -> RegistrationRequest {
    RegistrationRequest {
        code: "654321".into(),
        mobile: "9876543210".into(),
        name: "Asha Kumar".into(),
    }
}

fn gviz(payload: &serde_json::Value) -> String {
    format!("/*O_o*/\ngoogle.visualization.Query.setResponse({payload});")
}

fn sheet_mock(gid: u64, payload: &serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/sheet-1/gviz/tq"))
        .and(query_param("gid", gid.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(gviz(payload)))
}

fn master_list_with_code() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "table": {
            "cols": [{"label": "QR Code"}],
            "rows": [{"c": [{"v": "111111"}]}, {"c": [{"v": "654321"}]}]
        }
    })
}

fn active_offer() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "table": {
            "cols": [
                {"label": "Type"}, {"label": "Status"}, {"label": "Start Date"},
                {"label": "End Date"}, {"label": "Qr Codes"}
            ],
            "rows": [{"c": [
                {"v": "Free Coffee"}, {"v": "Active"}, {"v": "01-01-2020"},
                {"v": "31-12-2099"}, {"v": "654321, 700001"}
            ]}]
        }
    })
}

fn empty_registrations() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "table": {
            "cols": [
                {"label": "QR Code"}, {"label": "Mobile"}, {"label": "Name"},
                {"label": "Status"}, {"label": "OfferType"}, {"label": "RegisteredDate"}
            ],
            "rows": []
        }
    })
}

fn registrations_with_row() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "table": {
            "cols": [
                {"label": "QR Code"}, {"label": "Mobile"}, {"label": "Name"},
                {"label": "Status"}, {"label": "OfferType"}, {"label": "RegisteredDate"}
            ],
            "rows": [{"c": [
                {"v": "654321"}, {"v": "9876543210"}, {"v": "Asha"},
                {"v": "Assigned"}, {"v": "Free Coffee"}, {"v": "2026-08-25T10:00:00.000Z"}
            ]}]
        }
    })
}

fn relay_success() -> Mock {
    Mock::given(method("POST"))
        .and(path("/exec"))
        .and(body_partial_json(serde_json::json!({
            "action": "append",
            "sheetId": "sheet-1",
            "gid": REGS_GID
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
}

#[tokio::test]
async fn unregistered_eligible_code_registers_and_confirms() {
    let server = MockServer::start().await;

    sheet_mock(MASTER_GID, &master_list_with_code()).mount(&server).await;
    sheet_mock(OFFERS_GID, &active_offer()).mount(&server).await;
    // Duplicate checks and the header read see an empty region; the
    // verification poll afterwards observes the appended row.
    sheet_mock(REGS_GID, &empty_registrations())
        .up_to_n_times(3)
        .mount(&server)
        .await;
    sheet_mock(REGS_GID, &registrations_with_row()).mount(&server).await;
    relay_success().expect(1).mount(&server).await;

    let outcome = registrar(&server).register(&request()).await;
    match outcome {
        Outcome::Succeeded { ref offer_type } => assert_eq!(offer_type, "Free Coffee"),
        other => panic!("expected success, got: {other:?}"),
    }
    assert_eq!(outcome.message_key(), MessageKey::Registered);
}

#[tokio::test]
async fn already_registered_code_fails_without_writing() {
    let server = MockServer::start().await;

    sheet_mock(MASTER_GID, &master_list_with_code()).mount(&server).await;
    sheet_mock(OFFERS_GID, &active_offer()).mount(&server).await;
    sheet_mock(REGS_GID, &registrations_with_row()).mount(&server).await;
    relay_success().expect(0).mount(&server).await;

    let outcome = registrar(&server).register(&request()).await;
    match outcome {
        Outcome::Failed(RegistrationError::DuplicateCode { ref registered_to }) => {
            assert!(registered_to.contains("Asha"));
        }
        other => panic!("expected duplicate-code failure, got: {other:?}"),
    }
    assert_eq!(outcome.message_key(), MessageKey::DuplicateCode);
}

#[tokio::test]
async fn duplicate_mobile_is_detected_for_a_fresh_code() {
    let server = MockServer::start().await;

    let master = serde_json::json!({
        "status": "ok",
        "table": {
            "cols": [{"label": "QR Code"}],
            "rows": [{"c": [{"v": "654321"}]}, {"c": [{"v": "999999"}]}]
        }
    });
    let offers = serde_json::json!({
        "status": "ok",
        "table": {
            "cols": [
                {"label": "Type"}, {"label": "Status"}, {"label": "Start Date"},
                {"label": "End Date"}, {"label": "Qr Codes"}
            ],
            "rows": [{"c": [
                {"v": "Free Coffee"}, {"v": "Active"}, {"v": "01-01-2020"},
                {"v": "31-12-2099"}, {"v": "654321, 999999"}
            ]}]
        }
    });
    sheet_mock(MASTER_GID, &master).mount(&server).await;
    sheet_mock(OFFERS_GID, &offers).mount(&server).await;
    sheet_mock(REGS_GID, &registrations_with_row()).mount(&server).await;
    relay_success().expect(0).mount(&server).await;

    let req = RegistrationRequest {
        code: "999999".into(),
        ..request()
    };
    let outcome = registrar(&server).register(&req).await;
    match outcome {
        Outcome::Failed(RegistrationError::DuplicateMobile { ref registered_to }) => {
            assert!(registered_to.contains("654321"));
        }
        other => panic!("expected duplicate-mobile failure, got: {other:?}"),
    }
}

#[tokio::test]
async fn numeric_cells_match_typed_code_and_mobile() {
    let server = MockServer::start().await;

    // Sheets stores digit-only codes and mobiles as numbers; the snapshot
    // must render them as plain digits or every comparison misses.
    let master = serde_json::json!({
        "status": "ok",
        "table": {
            "cols": [{"label": "QR Code"}],
            "rows": [{"c": [{"v": 654321.0, "f": "654321"}]}]
        }
    });
    let registered = serde_json::json!({
        "status": "ok",
        "table": {
            "cols": [
                {"label": "QR Code"}, {"label": "Mobile"}, {"label": "Name"},
                {"label": "Status"}, {"label": "OfferType"}, {"label": "RegisteredDate"}
            ],
            "rows": [{"c": [
                {"v": 654321.0, "f": "654321"}, {"v": 9_876_543_210_i64, "f": "9876543210"},
                {"v": "Asha"}, {"v": "Assigned"}, {"v": "Free Coffee"},
                {"v": "2026-08-25T10:00:00.000Z"}
            ]}]
        }
    });
    sheet_mock(MASTER_GID, &master).mount(&server).await;
    sheet_mock(OFFERS_GID, &active_offer()).mount(&server).await;
    sheet_mock(REGS_GID, &registered).mount(&server).await;
    relay_success().expect(0).mount(&server).await;

    let outcome = registrar(&server).register(&request()).await;
    match outcome {
        Outcome::Failed(RegistrationError::DuplicateCode { ref registered_to }) => {
            assert!(registered_to.contains("9876543210"));
        }
        other => panic!("expected duplicate-code failure, got: {other:?}"),
    }
}

#[tokio::test]
async fn code_missing_from_master_list_stops_before_other_checks() {
    let server = MockServer::start().await;

    let master = serde_json::json!({
        "status": "ok",
        "table": { "cols": [{"label": "QR Code"}], "rows": [{"c": [{"v": "111111"}]}] }
    });
    sheet_mock(MASTER_GID, &master).mount(&server).await;
    relay_success().expect(0).mount(&server).await;

    let outcome = registrar(&server).register(&request()).await;
    assert!(matches!(
        outcome,
        Outcome::Failed(RegistrationError::CodeNotFound)
    ));

    // Only the master list was consulted.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn master_list_read_failure_fails_closed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/sheet-1/gviz/tq"))
        .and(query_param("gid", MASTER_GID.to_string()))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    relay_success().expect(0).mount(&server).await;

    let outcome = registrar(&server).register(&request()).await;
    assert!(matches!(
        outcome,
        Outcome::Failed(RegistrationError::CodeNotFound)
    ));
}

#[tokio::test]
async fn inactive_offer_blocks_registration() {
    let server = MockServer::start().await;

    let offers = serde_json::json!({
        "status": "ok",
        "table": {
            "cols": [
                {"label": "Type"}, {"label": "Status"}, {"label": "Start Date"},
                {"label": "End Date"}, {"label": "Qr Codes"}
            ],
            "rows": [{"c": [
                {"v": "Old Promo"}, {"v": "Inactive"}, {"v": "01-01-2020"},
                {"v": "31-12-2099"}, {"v": "654321"}
            ]}]
        }
    });
    sheet_mock(MASTER_GID, &master_list_with_code()).mount(&server).await;
    sheet_mock(OFFERS_GID, &offers).mount(&server).await;
    relay_success().expect(0).mount(&server).await;

    let outcome = registrar(&server).register(&request()).await;
    assert!(matches!(
        outcome,
        Outcome::Failed(RegistrationError::OfferNotActive)
    ));
}

#[tokio::test]
async fn unconfirmed_write_ends_ambiguous_without_resubmission() {
    let server = MockServer::start().await;

    sheet_mock(MASTER_GID, &master_list_with_code()).mount(&server).await;
    sheet_mock(OFFERS_GID, &active_offer()).mount(&server).await;
    // The appended row never becomes visible.
    sheet_mock(REGS_GID, &empty_registrations()).mount(&server).await;
    relay_success().expect(1).mount(&server).await;

    let outcome = registrar(&server).register(&request()).await;
    assert!(matches!(outcome, Outcome::Ambiguous));
    assert_eq!(outcome.message_key(), MessageKey::VerifyAmbiguous);
}

#[tokio::test]
async fn registrations_read_failure_fails_open_and_ends_ambiguous() {
    let server = MockServer::start().await;

    sheet_mock(MASTER_GID, &master_list_with_code()).mount(&server).await;
    sheet_mock(OFFERS_GID, &active_offer()).mount(&server).await;
    Mock::given(method("GET"))
        .and(path("/spreadsheets/d/sheet-1/gviz/tq"))
        .and(query_param("gid", REGS_GID.to_string()))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    // Duplicate checks fail open, so the write still goes out; verification
    // can never confirm it.
    relay_success().expect(1).mount(&server).await;

    let outcome = registrar(&server).register(&request()).await;
    assert!(matches!(outcome, Outcome::Ambiguous));
}

#[tokio::test]
async fn relay_rejection_surfaces_as_write_failure() {
    let server = MockServer::start().await;

    sheet_mock(MASTER_GID, &master_list_with_code()).mount(&server).await;
    sheet_mock(OFFERS_GID, &active_offer()).mount(&server).await;
    sheet_mock(REGS_GID, &empty_registrations()).mount(&server).await;
    Mock::given(method("POST"))
        .and(path("/exec"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"success": false, "error": "sheet is protected"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = registrar(&server).register(&request()).await;
    assert!(matches!(
        outcome,
        Outcome::Failed(RegistrationError::WriteFailed(_))
    ));
}

#[tokio::test]
async fn short_code_is_rejected_before_any_network_call() {
    let server = MockServer::start().await;

    let req = RegistrationRequest {
        code: "12345".into(),
        ..request()
    };
    let outcome = registrar(&server).register(&req).await;
    match outcome {
        Outcome::Failed(RegistrationError::Format(_)) => {}
        other => panic!("expected format failure, got: {other:?}"),
    }
    assert_eq!(outcome.message_key(), MessageKey::CodeFormat);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "no request should have been sent");
}

#[tokio::test]
async fn inspect_reports_standing_without_writing() {
    let server = MockServer::start().await;

    sheet_mock(MASTER_GID, &master_list_with_code()).mount(&server).await;
    sheet_mock(OFFERS_GID, &active_offer()).mount(&server).await;
    sheet_mock(REGS_GID, &registrations_with_row()).mount(&server).await;
    relay_success().expect(0).mount(&server).await;

    let report = registrar(&server)
        .inspect("654321")
        .await
        .expect("inspect should run");
    assert!(report.exists);
    assert_eq!(report.offer.as_deref().unwrap(), "Free Coffee");
    assert!(report.assignment.is_some());
}
