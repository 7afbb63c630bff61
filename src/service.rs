//! Service and endpoint model.
//!
//! An endpoint registered under a group prefix listens on
//! `<group>.<subject>`; without a group it listens on the bare subject.
//! Handlers are dynamically dispatched so the same specs drive both the
//! live broker and the in-memory mock.

use std::fmt;
use std::sync::Arc;

/// Handles a single request, producing the reply payload.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &[u8]) -> Vec<u8>;
}

/// Replies with `Echo: ` followed by the UTF-8-decoded request body.
pub struct EchoHandler;

impl Handler for EchoHandler {
    fn handle(&self, request: &[u8]) -> Vec<u8> {
        format!("Echo: {}", String::from_utf8_lossy(request)).into_bytes()
    }
}

/// A single request/reply endpoint registration.
#[derive(Clone)]
pub struct EndpointSpec {
    /// Endpoint name.
    pub name: String,
    /// Bare subscription subject.
    pub subject: String,
    /// Optional subject-namespace group prefix.
    pub group: Option<String>,
    /// Handler invoked for each request.
    pub handler: Arc<dyn Handler>,
}

impl EndpointSpec {
    /// Creates an ungrouped endpoint.
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            group: None,
            handler,
        }
    }

    /// Places the endpoint under a subject-namespace group.
    pub fn with_group(mut self, prefix: impl Into<String>) -> Self {
        self.group = Some(prefix.into());
        self
    }

    /// The subject the endpoint actually listens on: `<group>.<subject>`
    /// when grouped, the bare subject otherwise.
    pub fn effective_subject(&self) -> String {
        match &self.group {
            Some(prefix) => format!("{prefix}.{}", self.subject),
            None => self.subject.clone(),
        }
    }
}

impl fmt::Debug for EndpointSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointSpec")
            .field("name", &self.name)
            .field("subject", &self.subject)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

/// A named, versioned service with its endpoints.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    /// Service name.
    pub name: String,
    /// Service version.
    pub version: String,
    /// Endpoints registered when the service starts.
    pub endpoints: Vec<EndpointSpec>,
}

impl ServiceSpec {
    /// Creates a service with no endpoints.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            endpoints: Vec::new(),
        }
    }

    /// Adds an endpoint to the service.
    pub fn with_endpoint(mut self, endpoint: EndpointSpec) -> Self {
        self.endpoints.push(endpoint);
        self
    }
}
