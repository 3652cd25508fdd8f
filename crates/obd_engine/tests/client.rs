use std::time::Duration;

use obd_core::{
    AuthToken, CampaignSchedule, ChunkSize, Credentials, Failure, FilterCounts, LaunchRequest,
    ReferenceCount, RemoteService, ScrubOptions, ScrubOutcome,
};
use obd_engine::{ClientSettings, ObdService, ReqwestObdService};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> ReqwestObdService {
    let settings = ClientSettings::new(&server.uri()).unwrap();
    ReqwestObdService::new(settings).unwrap()
}

fn token() -> AuthToken {
    AuthToken::new("token-1").unwrap()
}

#[tokio::test]
async fn login_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "username": "analyst", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let token = service_for(&server)
        .login(&Credentials {
            username: "analyst".into(),
            password: "pw".into(),
        })
        .await
        .expect("login ok");
    assert_eq!(token.expose(), "abc");
}

#[tokio::test]
async fn login_rejection_surfaces_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let err = service_for(&server)
        .login(&Credentials {
            username: "analyst".into(),
            password: "nope".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Failure::ServiceRejected {
            service: RemoteService::Auth,
            status: 401,
            detail: "Invalid credentials".into(),
        }
    );
}

#[tokio::test]
async fn upload_sends_multipart_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "total": 2,
            "msisdns": ["2348011111111", "2348022222222"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list = service_for(&server)
        .upload(&token(), "leads.csv", b"msisdn\n2348011111111\n2348022222222\n".to_vec())
        .await
        .expect("upload ok");
    assert_eq!(list.total, 2);
    assert_eq!(list.msisdns.len(), 2);
}

#[tokio::test]
async fn oversized_upload_is_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(413))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .upload(&token(), "huge.xlsx", vec![0; 16])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Failure::OversizedPayload {
            service: RemoteService::Intake
        }
    );
}

#[tokio::test]
async fn scrub_sends_all_four_filters_and_target_operator() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrub"))
        .and(body_json(json!({
            "msisdn_list": ["1", "2", "3"],
            "options": { "dnd": true, "sub": false, "unsub": true, "operator": true },
            "operator": "MTN"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "final_base_count": 2,
            "final_base": ["1", "3"],
            "report": {
                "dnd_removed": 1,
                "stages": [{ "stage": "After DND", "count": 2, "removed": 1 }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = ScrubOptions {
        sub: false,
        target_operator: Some("MTN".into()),
        ..ScrubOptions::default()
    };
    let numbers = vec!["1".to_string(), "2".to_string(), "3".to_string()];
    let report = service_for(&server)
        .scrub(&token(), &numbers, &options)
        .await
        .expect("scrub ok");

    assert_eq!(report.outcome.total_input(), 3);
    assert_eq!(report.outcome.final_list(), ["1", "3"]);
    assert_eq!(report.outcome.per_filter_removed().dnd, 1);
    assert_eq!(report.outcome.stages()[0].stage, "After DND");
}

#[tokio::test]
async fn scrub_413_and_500_map_to_different_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrub"))
        .respond_with(ResponseTemplate::new(413))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/scrub"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "db down" })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let numbers = vec!["1".to_string()];
    let first = service
        .scrub(&token(), &numbers, &ScrubOptions::default())
        .await
        .unwrap_err();
    let second = service
        .scrub(&token(), &numbers, &ScrubOptions::default())
        .await
        .unwrap_err();

    assert_eq!(
        first,
        Failure::OversizedPayload {
            service: RemoteService::Scrub
        }
    );
    assert_eq!(
        second,
        Failure::ServiceRejected {
            service: RemoteService::Scrub,
            status: 500,
            detail: "db down".into(),
        }
    );
    assert_ne!(first.to_string(), second.to_string());
}

#[tokio::test]
async fn unreachable_service_is_reported_as_connectivity_failure() {
    let server = MockServer::start().await;
    let service = service_for(&server);
    drop(server);

    let err = service.fetch_history(&token()).await.unwrap_err();
    assert!(matches!(
        err,
        Failure::Unreachable {
            service: RemoteService::History,
            ..
        }
    ));
}

#[tokio::test]
async fn optional_request_timeout_is_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/db-stats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..ClientSettings::new(&server.uri()).unwrap()
    };
    let err = ReqwestObdService::new(settings)
        .unwrap()
        .db_stats(&token())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Failure::Unreachable {
            service: RemoteService::ReferenceStats,
            reason: "request timed out".into(),
        }
    );
}

#[tokio::test]
async fn db_stats_keep_service_diagnostics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/db-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dnd_count": 5000,
            "sub_count": "ERR",
            "unsub_count": 12
        })))
        .mount(&server)
        .await;

    let stats = service_for(&server).db_stats(&token()).await.unwrap();
    assert_eq!(stats.dnd_count, ReferenceCount::Known(5000));
    assert_eq!(stats.sub_count, ReferenceCount::Unavailable("ERR".into()));
    assert_eq!(stats.unsub_count, ReferenceCount::Known(12));
}

#[tokio::test]
async fn health_check_returns_alerts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health-check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Monitoring",
            "database": "Connected",
            "connected_to": "db.internal",
            "database_type": "postgresql",
            "alerts": ["CRITICAL: Success rate dropped to 25.0%"]
        })))
        .mount(&server)
        .await;

    let report = service_for(&server).health_check(&token()).await.unwrap();
    assert_eq!(report.database, "Connected");
    assert_eq!(report.alerts.len(), 1);
}

#[tokio::test]
async fn history_entries_are_returned_in_service_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scrub-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "timestamp": "2024-06-02T10:00:00",
                    "total_input": 100,
                    "final_count": 80,
                    "report": { "dnd_removed": 10, "sub_removed": 5, "unsub_removed": 3, "operator_removed": 2 },
                    "results_summary": "80 numbers kept"
                },
                { "timestamp": "2024-06-01T09:00:00", "total_input": 5, "final_count": 5 }
            ]
        })))
        .mount(&server)
        .await;

    let entries = service_for(&server).fetch_history(&token()).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].timestamp, "2024-06-02T10:00:00");
    assert_eq!(
        entries[0].per_filter_removed,
        FilterCounts {
            dnd: 10,
            sub: 5,
            unsub: 3,
            operator: 2
        }
    );
    assert_eq!(entries[1].results_summary, "");
}

#[tokio::test]
async fn append_history_posts_outcome_and_stats() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/log-scrub"))
        .and(body_json(json!({
            "total_input": 3,
            "final_count": 1,
            "report": { "dnd_removed": 2, "sub_removed": 0, "unsub_removed": 0, "operator_removed": 0 },
            "session_stats": { "dnd": 2, "sub": 0, "unsub": 0, "operator": 0 },
            "final_base": ["3"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Logged" })))
        .expect(1)
        .mount(&server)
        .await;

    let counts = FilterCounts {
        dnd: 2,
        ..FilterCounts::default()
    };
    let outcome = ScrubOutcome::new(3, counts, vec!["3".into()], Vec::new()).unwrap();
    let message = service_for(&server)
        .append_history(&token(), &outcome, &counts)
        .await
        .unwrap();
    assert_eq!(message, "Logged");
}

#[tokio::test]
async fn schedule_and_launch_bodies_match_backend_contract() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/schedule-promotion"))
        .and(body_json(json!({
            "obd_name": "Summer_2024",
            "flow_name": "promo",
            "msc_ip": "10.0.0.1",
            "cli": "123456"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Promotion scheduled successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/launch-campaign"))
        .and(body_json(json!({ "msisdn_list": ["1", "2"], "chunk_size": 5000 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Launched 2 numbers" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    service
        .submit_schedule(
            &token(),
            &CampaignSchedule {
                project_name: " Summer_2024 ".into(),
                flow_name: "promo".into(),
                msc_ip: "10.0.0.1".into(),
                cli_mask: "123456".into(),
            },
        )
        .await
        .expect("schedule ok");
    let message = service
        .launch_campaign(
            &token(),
            &LaunchRequest {
                number_list: vec!["1".into(), "2".into()],
                chunk_size: ChunkSize::new(5000),
            },
        )
        .await
        .expect("launch ok");
    assert_eq!(message, "Launched 2 numbers");
}

#[tokio::test]
async fn malformed_success_body_is_not_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/launch-campaign"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .launch_campaign(
            &token(),
            &LaunchRequest {
                number_list: vec!["1".into()],
                chunk_size: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Failure::MalformedResponse {
            service: RemoteService::Launch,
            ..
        }
    ));
}
