//! # Transport
//!
//! The boundary between the resource clients and the gateway. A [`Transport`] carries one
//! [`GatewayRequest`] document out and one [`GatewayResponse`] document back. It never
//! retries.
//!
//! [`InProcessTransport`] serves the gateway on its own Tokio task and talks to it through
//! JSON text over a channel, so every call goes through the same encode/decode path a
//! network transport would.

use crate::gateway::{GatewayRequest, GatewayResponse, GatewayService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("gateway closed")]
    Closed,
    #[error("undecodable document: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse, TransportError>;
}

struct Envelope {
    body: String,
    respond_to: oneshot::Sender<String>,
}

/// Transport to a gateway served inside this process.
///
/// Cheap to clone. The gateway task stops once every clone is dropped.
#[derive(Clone)]
pub struct InProcessTransport {
    sender: mpsc::Sender<Envelope>,
    timeout: Duration,
}

impl InProcessTransport {
    /// Spawns `service` on a new task and returns a transport connected to it.
    pub fn serve(
        service: GatewayService,
        buffer_size: usize,
        timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let handle = tokio::spawn(run_gateway(Arc::new(service), receiver));
        (Self { sender, timeout }, handle)
    }

    async fn exchange(&self, body: String) -> Result<String, TransportError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(Envelope { body, respond_to })
            .await
            .map_err(|_| TransportError::Closed)?;
        response.await.map_err(|_| TransportError::Closed)
    }
}

#[async_trait]
impl Transport for InProcessTransport {
    async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse, TransportError> {
        let body =
            serde_json::to_string(&request).map_err(|e| TransportError::Decode(e.to_string()))?;
        let reply = tokio::time::timeout(self.timeout, self.exchange(body))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;
        serde_json::from_str(&reply).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Gateway task. Each request is answered on its own task; the actors behind the service
/// still apply writes one at a time.
async fn run_gateway(service: Arc<GatewayService>, mut receiver: mpsc::Receiver<Envelope>) {
    info!("Gateway started");
    while let Some(Envelope { body, respond_to }) = receiver.recv().await {
        let service = service.clone();
        tokio::spawn(async move {
            match service.handle_json(&body).await {
                Ok(reply) => {
                    if respond_to.send(reply).is_err() {
                        debug!("Caller went away before the response");
                    }
                }
                Err(e) => warn!(error = %e, "Response could not be encoded"),
            }
        });
    }
    info!("Gateway shutdown");
}
