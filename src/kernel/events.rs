//! Event-exchange subscription and the diagnostic output channel.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::context::Exchange;
use crate::kernel::error::KernelResult;

/// Destination for human-readable diagnostic lines.
pub trait OutputSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Output sink that forwards every line to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOutput;

impl OutputSink for TracingOutput {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "kernel_bridge::output", "{}", line);
    }
}

/// Capability a kernel registers (as `Arc<dyn EventBusSubscriber>`) to
/// listen on external event exchanges.
#[async_trait]
pub trait EventBusSubscriber: Send + Sync {
    async fn subscribe_to_exchanges(
        &self,
        exchanges: &[Exchange],
        output: Arc<dyn OutputSink>,
    ) -> KernelResult<()>;
}
