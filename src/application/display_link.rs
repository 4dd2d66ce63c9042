// Display link trait - The only path between the core and the panel
use crate::domain::widget::{GaugeEventRecord, WidgetAddress};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("can't open display link on {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported baud rate {0}")]
    UnsupportedBaud(u32),

    #[error("widget write failed: {0}")]
    Write(#[from] std::io::Error),
}

#[async_trait]
pub trait DisplayLink: Send + Sync {
    /// Push a rendered value to one widget; no acknowledgement is awaited
    async fn write_widget_value(
        &self,
        address: WidgetAddress,
        value: u16,
    ) -> Result<(), LinkError>;

    /// Non-blocking check for a queued incoming event
    fn poll_event_available(&self) -> bool;

    /// Wait for the next incoming event, in arrival order.
    /// Returns `None` once the link has shut down.
    async fn read_next_event(&self) -> Option<GaugeEventRecord>;
}
