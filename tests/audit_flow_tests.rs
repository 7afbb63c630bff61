use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use subject_audit::broker::mock::MockBroker;
use subject_audit::{
    run_audit, AuditError, Broker, EchoHandler, EndpointSpec, Handler, ReplyOutcome, ServiceSpec,
};

#[tokio::test]
async fn faithful_broker_passes_every_check() {
    let broker = MockBroker::new();
    let checks = run_audit(&broker).await.unwrap();

    assert_eq!(checks.len(), 4);
    assert!(checks.iter().all(|check| check.passed), "{checks:?}");
    assert_eq!(checks[0].actual, "acme.echo");
    assert_eq!(checks[1].actual, "acme.echo");
    assert_eq!(checks[2].actual, "acme.echo");
    assert_eq!(checks[3].actual, "Echo: Hello");
}

#[tokio::test]
async fn bare_metadata_fails_info_and_discovery_checks_only() {
    let broker = MockBroker::new().with_bare_metadata_subjects();
    let checks = run_audit(&broker).await.unwrap();

    let outcomes: Vec<bool> = checks.iter().map(|check| check.passed).collect();
    assert_eq!(outcomes, [true, false, false, true]);

    // The metadata views drop the group prefix; routing still works.
    assert_eq!(checks[1].actual, "echo");
    assert_eq!(checks[1].expected, "acme.echo");
    assert_eq!(checks[2].actual, "echo");
    assert_eq!(checks[2].expected, "acme.echo");
}

#[tokio::test]
async fn empty_discovery_is_fatal() {
    let broker = MockBroker::new().with_muted_discovery();
    let err = run_audit(&broker).await.unwrap_err();
    assert!(matches!(err, AuditError::DiscoveryFailed(_)), "{err}");
}

#[tokio::test]
async fn discovery_returns_the_registered_service() {
    let broker = MockBroker::new();
    let spec = ServiceSpec::new("EchoService", "1.0.0").with_endpoint(
        EndpointSpec::new("Echo", "echo", Arc::new(EchoHandler)).with_group("acme"),
    );
    let _running = broker.start_service(&spec).await.unwrap();

    let records = broker
        .discover("EchoService", Duration::from_millis(10), 0)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "EchoService");
    assert_eq!(records[0].version, "1.0.0");
    assert_eq!(records[0].endpoints[0].subject, "acme.echo");

    let other = broker
        .discover("OtherService", Duration::from_millis(10), 0)
        .await
        .unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn requests_route_on_the_effective_subject() {
    let broker = MockBroker::new().with_bare_metadata_subjects();
    let spec = ServiceSpec::new("EchoService", "1.0.0").with_endpoint(
        EndpointSpec::new("Echo", "echo", Arc::new(EchoHandler)).with_group("acme"),
    );
    let _running = broker.start_service(&spec).await.unwrap();

    // Grouped subject reaches the handler even though metadata misreports it.
    let outcome = broker
        .request("acme.echo", Bytes::from_static(b"Hello"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ReplyOutcome::Replied(Bytes::from_static(b"Echo: Hello"))
    );

    // The bare subject the metadata advertises has no subscription.
    let outcome = broker
        .request("echo", Bytes::from_static(b"Hello"))
        .await
        .unwrap();
    assert_eq!(outcome, ReplyOutcome::NoResponders);
}

#[tokio::test]
async fn unserved_subject_reports_no_responders() {
    let broker = MockBroker::new();
    let outcome = broker
        .request("nobody.home", Bytes::from_static(b"Hello"))
        .await
        .unwrap();
    assert_eq!(outcome, ReplyOutcome::NoResponders);
}

#[tokio::test]
async fn wrong_reply_body_fails_the_probe_check() {
    struct StaticHandler(&'static str);

    impl Handler for StaticHandler {
        fn handle(&self, _request: &[u8]) -> Vec<u8> {
            self.0.as_bytes().to_vec()
        }
    }

    let broker = MockBroker::new();
    // Claim the grouped subject before the audit registers its own service;
    // the first matching endpoint wins routing.
    let spec = ServiceSpec::new("Squatter", "0.0.1").with_endpoint(
        EndpointSpec::new("Echo", "echo", Arc::new(StaticHandler("nope"))).with_group("acme"),
    );
    let _running = broker.start_service(&spec).await.unwrap();

    let checks = run_audit(&broker).await.unwrap();
    assert!(!checks[3].passed);
    assert_eq!(checks[3].actual, "nope");
    assert_eq!(checks[3].expected, "Echo: Hello");
}

#[tokio::test]
async fn repeated_runs_complete_against_one_broker() {
    let broker = MockBroker::new();
    let first = run_audit(&broker).await.unwrap();
    let second = run_audit(&broker).await.unwrap();

    assert!(first.iter().all(|check| check.passed));
    assert!(second.iter().all(|check| check.passed));
}
