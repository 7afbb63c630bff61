//! NATS broker implementation.
//!
//! Talks to a NATS server via async-nats: the micro service API for
//! registration, a scatter-gather `$SRV.INFO` query for discovery, and
//! core request/reply for the functional probe. Each endpoint's request
//! stream is driven on its own task, so handlers run independently of
//! the audit sequence.

use crate::broker::{Broker, ReplyOutcome, RunningService};
use crate::error::{AuditError, AuditResult};
use crate::protocol::{self, EndpointInfo, ServiceInfo};
use crate::service::ServiceSpec;
use async_nats::client::RequestErrorKind;
use async_nats::service::ServiceExt;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, warn};

/// A connection to a NATS server.
pub struct NatsBroker {
    client: async_nats::Client,
}

impl NatsBroker {
    /// Connects to the server at `url`.
    pub async fn connect(url: &str) -> AuditResult<Self> {
        let client = async_nats::ConnectOptions::new()
            .name("subject-audit")
            .connect(url)
            .await
            .map_err(|e| AuditError::Connect(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Broker for NatsBroker {
    async fn start_service(&self, spec: &ServiceSpec) -> AuditResult<Box<dyn RunningService>> {
        let service = self
            .client
            .service_builder()
            .description("subject metadata audit target")
            .start(&spec.name, &spec.version)
            .await
            .map_err(|e| AuditError::Registration(e.to_string()))?;

        for endpoint in &spec.endpoints {
            let mut requests = match &endpoint.group {
                Some(prefix) => service.group(prefix).endpoint(endpoint.subject.clone()).await,
                None => service.endpoint(endpoint.subject.clone()).await,
            }
            .map_err(|e| AuditError::Registration(e.to_string()))?;

            let handler = endpoint.handler.clone();
            let subject = endpoint.effective_subject();
            tokio::spawn(async move {
                while let Some(request) = requests.next().await {
                    let reply = handler.handle(&request.message.payload);
                    if let Err(e) = request.respond(Ok(reply.into())).await {
                        warn!("failed to reply on {subject}: {e}");
                    }
                }
            });
        }

        Ok(Box::new(NatsRunningService { service }))
    }

    async fn discover(
        &self,
        service_name: &str,
        wait: Duration,
        min_responders: usize,
    ) -> AuditResult<Vec<ServiceInfo>> {
        let inbox = self.client.new_inbox();
        let mut replies = self
            .client
            .subscribe(inbox.clone())
            .await
            .map_err(|e| AuditError::Broker(e.to_string()))?;
        self.client
            .publish_with_reply(protocol::info_subject(service_name), inbox, Bytes::new())
            .await
            .map_err(|e| AuditError::Broker(e.to_string()))?;
        self.client
            .flush()
            .await
            .map_err(|e| AuditError::Broker(e.to_string()))?;

        let deadline = tokio::time::Instant::now() + wait;
        let mut records = Vec::new();
        while let Ok(Some(message)) = tokio::time::timeout_at(deadline, replies.next()).await {
            match serde_json::from_slice::<ServiceInfo>(&message.payload) {
                Ok(info) => {
                    debug!("discovery reply from {} ({})", info.name, info.id);
                    records.push(info);
                    if min_responders > 0 && records.len() >= min_responders {
                        break;
                    }
                }
                Err(e) => warn!("discarding malformed discovery reply: {e}"),
            }
        }
        Ok(records)
    }

    async fn request(&self, subject: &str, payload: Bytes) -> AuditResult<ReplyOutcome> {
        match self.client.request(subject.to_string(), payload).await {
            Ok(message) => Ok(ReplyOutcome::Replied(message.payload)),
            Err(e) => match e.kind() {
                RequestErrorKind::NoResponders => Ok(ReplyOutcome::NoResponders),
                _ => Ok(ReplyOutcome::Failed(e.to_string())),
            },
        }
    }
}

struct NatsRunningService {
    service: async_nats::service::Service,
}

#[async_trait]
impl RunningService for NatsRunningService {
    async fn info(&self) -> ServiceInfo {
        let info = self.service.info().await;
        ServiceInfo {
            kind: protocol::INFO_RESPONSE_TYPE.to_string(),
            name: info.name,
            id: info.id,
            version: info.version,
            description: info.description,
            endpoints: info
                .endpoints
                .into_iter()
                .map(|endpoint| EndpointInfo {
                    name: endpoint.name,
                    subject: endpoint.subject,
                    queue_group: endpoint.queue_group,
                })
                .collect(),
        }
    }
}
