//! The audit sequence.
//!
//! Registers a grouped echo endpoint, starts its service, queries
//! discovery, and compares three views of the endpoint's subject against
//! the grouped subject the registration computed. A live request then
//! confirms that delivery works on that subject regardless of what the
//! metadata claims. All checks run; none aborts the sequence.

use crate::broker::{Broker, ReplyOutcome};
use crate::error::{AuditError, AuditResult};
use crate::report::CheckResult;
use crate::service::{EchoHandler, EndpointSpec, ServiceSpec};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Service name registered with the broker.
pub const SERVICE_NAME: &str = "EchoService";
/// Service version registered with the broker.
pub const SERVICE_VERSION: &str = "1.0.0";
/// Group prefix the endpoint is registered under.
pub const GROUP_PREFIX: &str = "acme";
/// Bare endpoint subject.
pub const ENDPOINT_SUBJECT: &str = "echo";
/// Fully-qualified subject the endpoint must listen on.
pub const EXPECTED_SUBJECT: &str = "acme.echo";

/// Probe request body.
const PROBE_BODY: &[u8] = b"Hello";
/// Reply the echo handler must produce for the probe body.
const PROBE_REPLY: &str = "Echo: Hello";
/// How long the discovery query waits for records.
const DISCOVERY_WAIT: Duration = Duration::from_millis(500);

/// Runs the full audit sequence against `broker`, returning one
/// [`CheckResult`] per metadata view plus one for the delivery probe.
///
/// Errors only on the fatal conditions: registration rejected, broker
/// i/o failure, or discovery returning no usable record.
pub async fn run_audit<B: Broker + ?Sized>(broker: &B) -> AuditResult<Vec<CheckResult>> {
    let endpoint = EndpointSpec::new("Echo", ENDPOINT_SUBJECT, Arc::new(EchoHandler))
        .with_group(GROUP_PREFIX);
    let spec = ServiceSpec::new(SERVICE_NAME, SERVICE_VERSION).with_endpoint(endpoint.clone());

    info!(
        "registering {SERVICE_NAME} v{SERVICE_VERSION} with endpoint {}",
        endpoint.effective_subject()
    );
    let running = broker.start_service(&spec).await?;

    let records = broker.discover(SERVICE_NAME, DISCOVERY_WAIT, 0).await?;
    info!("discovery returned {} record(s)", records.len());
    let discovered_subject = records
        .first()
        .and_then(|record| record.endpoints.first())
        .map(|endpoint| endpoint.subject.clone())
        .ok_or_else(|| AuditError::DiscoveryFailed(SERVICE_NAME.to_string()))?;

    let local_subject = running
        .info()
        .await
        .endpoints
        .first()
        .map(|endpoint| endpoint.subject.clone())
        .unwrap_or_default();

    let mut checks = vec![
        CheckResult::compare(
            "endpoint registration subject",
            EXPECTED_SUBJECT,
            endpoint.effective_subject(),
        ),
        CheckResult::compare("service local info subject", EXPECTED_SUBJECT, local_subject),
        CheckResult::compare(
            "discovered remote subject",
            EXPECTED_SUBJECT,
            discovered_subject,
        ),
    ];
    checks.push(probe(broker).await?);

    Ok(checks)
}

/// Sends the live probe request on the grouped subject and converts the
/// outcome into a check. Delivery anomalies become failed checks, never
/// errors.
async fn probe<B: Broker + ?Sized>(broker: &B) -> AuditResult<CheckResult> {
    let description = format!("live request on {EXPECTED_SUBJECT}");
    let outcome = broker
        .request(EXPECTED_SUBJECT, Bytes::from_static(PROBE_BODY))
        .await?;
    Ok(match outcome {
        ReplyOutcome::Replied(payload) => {
            CheckResult::compare(description, PROBE_REPLY, String::from_utf8_lossy(&payload))
        }
        ReplyOutcome::NoResponders => {
            CheckResult::compare(description, PROBE_REPLY, "no responders")
        }
        ReplyOutcome::Failed(error) => {
            CheckResult::compare(description, PROBE_REPLY, format!("delivery error: {error}"))
        }
    })
}
