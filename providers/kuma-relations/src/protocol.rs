//! Host protocol
//!
//! The host talks to the provider over line-delimited JSON: one request per
//! line on stdin, one response per line on stdout. Logs go to stderr.

use crate::error::{Diagnostic, ProviderError};
use crate::provider::Provider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Lifecycle verb requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleOperation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleOperation::Create => write!(f, "create"),
            LifecycleOperation::Read => write!(f, "read"),
            LifecycleOperation::Update => write!(f, "update"),
            LifecycleOperation::Delete => write!(f, "delete"),
            LifecycleOperation::Import => write!(f, "import"),
        }
    }
}

/// One lifecycle call from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub operation: LifecycleOperation,
    pub resource_type: String,
    /// Planned configuration (create, update)
    #[serde(default)]
    pub config: Option<Value>,
    /// Prior applied state (read, update, delete)
    #[serde(default)]
    pub state: Option<Value>,
    /// Parent id to adopt (import)
    #[serde(default)]
    pub import_id: Option<String>,
    /// Set by the host when it created the parent in the same run
    #[serde(default)]
    pub parent_known_empty: bool,
}

/// Result of one lifecycle call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub state: Option<Value>,
    pub removed: bool,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    pub fn applied(state: Value) -> Self {
        Self {
            state: Some(state),
            removed: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn removed() -> Self {
        Self {
            state: None,
            removed: true,
            diagnostics: Vec::new(),
        }
    }

    /// Failure response; the prior state, if any, is kept unchanged
    pub fn failed(prior: Option<Value>, error: &ProviderError) -> Self {
        Self {
            state: prior,
            removed: false,
            diagnostics: Vec::new(),
        }
        .with_diagnostic(Diagnostic::from(error))
    }

    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }
}

/// Serve host requests until the input closes or `shutdown` fires.
///
/// Requests are handled one at a time. Cancelling `shutdown` also cancels the
/// gateway call in flight.
pub async fn serve<R, W>(
    provider: &Provider,
    shutdown: CancellationToken,
    reader: R,
    mut writer: W,
) -> Result<(), ProviderError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, no longer accepting requests");
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            debug!("Host closed the request channel");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let request_id = Uuid::new_v4();
        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                let span = info_span!(
                    "request",
                    request_id = %request_id,
                    resource_type = %request.resource_type,
                    operation = %request.operation,
                );
                let ctx = provider.call_context(shutdown.child_token());
                provider.handle(&ctx, &request).instrument(span).await
            }
            Err(e) => {
                warn!("Request {} is not valid JSON: {}", request_id, e);
                Response::failed(None, &ProviderError::Serialization(e))
            }
        };

        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }
    Ok(())
}
