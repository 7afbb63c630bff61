//! Broker abstraction.
//!
//! Defines the operations the audit sequence needs from a message broker,
//! allowing the same sequence to run against a live NATS server or the
//! in-memory [`mock`].

use crate::error::AuditResult;
use crate::protocol::ServiceInfo;
use crate::service::ServiceSpec;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Outcome of a single request/reply exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// A reply arrived with the given payload.
    Replied(Bytes),
    /// The broker reported that nothing subscribes to the subject.
    NoResponders,
    /// The exchange failed for another reason (timeout, transport error).
    Failed(String),
}

/// A message broker the audit sequence can drive.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Registers and starts a service; the broker begins routing requests
    /// on each endpoint's effective subject to its handler.
    async fn start_service(&self, spec: &ServiceSpec) -> AuditResult<Box<dyn RunningService>>;

    /// Queries service discovery for `service_name`, collecting records
    /// until `wait` elapses. A positive `min_responders` permits returning
    /// early once that many records arrived; zero collects until the
    /// deadline.
    async fn discover(
        &self,
        service_name: &str,
        wait: Duration,
        min_responders: usize,
    ) -> AuditResult<Vec<ServiceInfo>>;

    /// Sends a request and awaits a single reply.
    async fn request(&self, subject: &str, payload: Bytes) -> AuditResult<ReplyOutcome>;
}

/// Handle to a started service.
#[async_trait]
pub trait RunningService: Send + Sync {
    /// The service's own view of its registration metadata.
    async fn info(&self) -> ServiceInfo;
}

/// An in-memory broker for testing.
pub mod mock {
    use super::*;
    use crate::protocol::{EndpointInfo, INFO_RESPONSE_TYPE};
    use std::sync::{Arc, Mutex};

    /// In-memory broker that routes requests directly to registered
    /// handlers.
    ///
    /// Routing always uses each endpoint's effective subject. Metadata
    /// reporting is configurable so tests can cover both a faithful
    /// broker library and one that advertises bare subjects for grouped
    /// endpoints while still subscribing correctly.
    #[derive(Default)]
    pub struct MockBroker {
        services: Arc<Mutex<Vec<ServiceSpec>>>,
        bare_metadata: bool,
        muted_discovery: bool,
    }

    impl MockBroker {
        /// Creates a broker whose metadata reports effective subjects.
        pub fn new() -> Self {
            Self::default()
        }

        /// Info and discovery records report each endpoint's bare subject,
        /// even though routing still uses the grouped subject.
        pub fn with_bare_metadata_subjects(mut self) -> Self {
            self.bare_metadata = true;
            self
        }

        /// Discovery returns no records, as if no instance replied in time.
        pub fn with_muted_discovery(mut self) -> Self {
            self.muted_discovery = true;
            self
        }

        fn info_for(&self, spec: &ServiceSpec, instance: usize) -> ServiceInfo {
            ServiceInfo {
                kind: INFO_RESPONSE_TYPE.to_string(),
                name: spec.name.clone(),
                id: format!("{}-{instance}", spec.name),
                version: spec.version.clone(),
                description: String::new(),
                endpoints: spec
                    .endpoints
                    .iter()
                    .map(|endpoint| EndpointInfo {
                        name: endpoint.name.clone(),
                        subject: if self.bare_metadata {
                            endpoint.subject.clone()
                        } else {
                            endpoint.effective_subject()
                        },
                        queue_group: "q".to_string(),
                    })
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl Broker for MockBroker {
        async fn start_service(&self, spec: &ServiceSpec) -> AuditResult<Box<dyn RunningService>> {
            let instance = {
                let mut services = self.services.lock().unwrap();
                services.push(spec.clone());
                services.len()
            };
            Ok(Box::new(MockRunningService {
                info: self.info_for(spec, instance),
            }))
        }

        async fn discover(
            &self,
            service_name: &str,
            _wait: Duration,
            _min_responders: usize,
        ) -> AuditResult<Vec<ServiceInfo>> {
            if self.muted_discovery {
                return Ok(Vec::new());
            }
            let services = self.services.lock().unwrap();
            Ok(services
                .iter()
                .enumerate()
                .filter(|(_, spec)| spec.name == service_name)
                .map(|(index, spec)| self.info_for(spec, index + 1))
                .collect())
        }

        async fn request(&self, subject: &str, payload: Bytes) -> AuditResult<ReplyOutcome> {
            let services = self.services.lock().unwrap();
            for spec in services.iter() {
                for endpoint in &spec.endpoints {
                    if endpoint.effective_subject() == subject {
                        let reply = endpoint.handler.handle(&payload);
                        return Ok(ReplyOutcome::Replied(reply.into()));
                    }
                }
            }
            Ok(ReplyOutcome::NoResponders)
        }
    }

    struct MockRunningService {
        info: ServiceInfo,
    }

    #[async_trait]
    impl RunningService for MockRunningService {
        async fn info(&self) -> ServiceInfo {
            self.info.clone()
        }
    }
}
