//! Audits a messaging service's advertised subjects against its live
//! subscription.
//!
//! A service endpoint registered under a group prefix must listen on
//! `<group>.<subject>`, and every metadata view of that endpoint should
//! report the same grouped subject. This crate registers one grouped echo
//! endpoint on a broker and compares three views of its subject:
//!
//! 1. the endpoint registration itself (ground truth),
//! 2. the running service's own info structure,
//! 3. a remote service-discovery query,
//!
//! then sends a live request on the grouped subject to confirm delivery
//! works regardless of what the metadata claims. Each comparison yields a
//! [`CheckResult`]; rendering them as ✅/❌ console lines is the binary's
//! concern, so the same sequence backs automated tests through the mock
//! broker in [`broker::mock`].

pub mod audit;
pub mod broker;
mod error;
pub mod nats;
pub mod protocol;
pub mod report;
pub mod service;

pub use audit::{
    run_audit, ENDPOINT_SUBJECT, EXPECTED_SUBJECT, GROUP_PREFIX, SERVICE_NAME, SERVICE_VERSION,
};
pub use broker::{Broker, ReplyOutcome, RunningService};
pub use error::{AuditError, AuditResult};
pub use nats::NatsBroker;
pub use protocol::{EndpointInfo, ServiceInfo};
pub use report::CheckResult;
pub use service::{EchoHandler, EndpointSpec, Handler, ServiceSpec};
