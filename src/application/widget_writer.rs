// Widget writer - Fire-and-forget widget pushes with counted failures
use crate::application::display_link::{DisplayLink, LinkError};
use crate::domain::widget::WidgetAddress;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A warning is emitted for the first failure of a streak and then every
/// `WARN_EVERY` failures overall.
const WARN_EVERY: u64 = 100;

/// Tracks widget-write failures so they are visible without flooding the log
#[derive(Debug, Default)]
pub struct WriteMonitor {
    failures: AtomicU64,
    streak: AtomicU64,
}

impl WriteMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Returns true if this failure was logged
    pub fn record_failure(&self, address: WidgetAddress, error: &LinkError) -> bool {
        let total = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
        let streak = self.streak.fetch_add(1, Ordering::Relaxed) + 1;
        if streak == 1 || total % WARN_EVERY == 0 {
            tracing::warn!(
                "Widget write to {:?} #{} failed: {} ({} failures so far)",
                address.class,
                address.index,
                error,
                total
            );
            return true;
        }
        false
    }

    pub fn record_success(&self) {
        let streak = self.streak.swap(0, Ordering::Relaxed);
        if streak > 0 {
            tracing::info!("Display writes recovered after {} failures", streak);
        }
    }
}

/// Shared handle used by every task that renders to the panel
#[derive(Clone)]
pub struct WidgetWriter {
    link: Arc<dyn DisplayLink>,
    monitor: Arc<WriteMonitor>,
}

impl WidgetWriter {
    pub fn new(link: Arc<dyn DisplayLink>, monitor: Arc<WriteMonitor>) -> Self {
        Self { link, monitor }
    }

    pub async fn write(&self, address: WidgetAddress, value: u16) {
        match self.link.write_widget_value(address, value).await {
            Ok(()) => self.monitor.record_success(),
            Err(e) => {
                self.monitor.record_failure(address, &e);
            }
        }
    }

    /// Write a contiguous run of slots starting at `base`, oldest first
    pub async fn write_run(&self, base: WidgetAddress, levels: impl IntoIterator<Item = u16>) {
        for (offset, level) in levels.into_iter().enumerate() {
            self.write(base.slot(offset), level).await;
        }
    }
}
