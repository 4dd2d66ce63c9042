// Genie serial link - DisplayLink adapter over the panel's serial port
use crate::application::display_link::{DisplayLink, LinkError};
use crate::domain::widget::{GaugeEventRecord, WidgetAddress};
use crate::infrastructure::genie_codec::{GenieCodec, WriteObject};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tokio_util::codec::{FramedRead, FramedWrite};

/// Rates the panel's serial port can be configured for
pub const SUPPORTED_BAUD_RATES: [u32; 7] =
    [9600, 19200, 38400, 57600, 115_200, 200_000, 256_000];

/// Decoded events held before the reader stops pulling bytes off the line
pub const EVENT_QUEUE_DEPTH: usize = 64;

type BoxedWriter = Pin<Box<dyn AsyncWrite + Send>>;

pub struct GenieLink {
    writer: Mutex<FramedWrite<BoxedWriter, GenieCodec>>,
    events: Mutex<mpsc::Receiver<GaugeEventRecord>>,
    pending: Arc<AtomicUsize>,
    reader: JoinHandle<()>,
}

impl GenieLink {
    /// Open the serial device in raw 8N1 mode at `baud_rate`
    pub async fn open(device: &str, baud_rate: u32) -> Result<Self, LinkError> {
        if !SUPPORTED_BAUD_RATES.contains(&baud_rate) {
            return Err(LinkError::UnsupportedBaud(baud_rate));
        }

        let stream = tokio_serial::new(device, baud_rate)
            .open_native_async()
            .map_err(|e| LinkError::Open {
                device: device.to_string(),
                source: e.into(),
            })?;

        tracing::info!("Display link open on {} at {} baud", device, baud_rate);
        Ok(Self::from_serial(stream))
    }

    pub fn from_serial(stream: SerialStream) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self::from_io(read_half, write_half)
    }

    /// Build a link over any byte stream pair; spawns the reader task
    pub fn from_io<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let pending = Arc::new(AtomicUsize::new(0));
        let reader = tokio::spawn(pump_events(reader, tx, pending.clone()));
        let writer: BoxedWriter = Box::pin(writer);

        Self {
            writer: Mutex::new(FramedWrite::new(writer, GenieCodec)),
            events: Mutex::new(rx),
            pending,
            reader,
        }
    }
}

impl Drop for GenieLink {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl DisplayLink for GenieLink {
    async fn write_widget_value(
        &self,
        address: WidgetAddress,
        value: u16,
    ) -> Result<(), LinkError> {
        tracing::trace!("write {:?} #{} = {}", address.class, address.index, value);
        self.writer
            .lock()
            .await
            .send(WriteObject { address, value })
            .await?;
        Ok(())
    }

    fn poll_event_available(&self) -> bool {
        self.pending.load(Ordering::Acquire) > 0
    }

    async fn read_next_event(&self) -> Option<GaugeEventRecord> {
        let record = self.events.lock().await.recv().await?;
        self.pending.fetch_sub(1, Ordering::AcqRel);
        Some(record)
    }
}

/// Decode incoming frames and queue them in arrival order
async fn pump_events<R>(
    reader: R,
    tx: mpsc::Sender<GaugeEventRecord>,
    pending: Arc<AtomicUsize>,
) where
    R: AsyncRead + Unpin,
{
    let mut frames = FramedRead::new(reader, GenieCodec);
    while let Some(frame) = frames.next().await {
        match frame {
            Ok(record) => {
                pending.fetch_add(1, Ordering::AcqRel);
                if tx.send(record).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Display link read failed: {}", e);
                break;
            }
        }
    }
    tracing::debug!("Display link reader finished");
}
