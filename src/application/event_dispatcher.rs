// Event dispatcher - Routes panel events to state-changing requests
use crate::application::display_link::DisplayLink;
use crate::domain::telemetry::Extremum;
use crate::domain::widget::{
    CommandKind, GaugeEventRecord, RESET_MAX_BUTTON, RESET_MIN_BUTTON, WidgetClass,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What happened to one dispatched record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a report-event frame
    Ignored,
    /// A reset request was handed to the temperature simulator
    ResetRequested(Extremum),
    /// The reset request could not be queued
    ResetDropped(Extremum),
    UnknownButton(u8),
    Unhandled,
}

pub struct EventDispatcher {
    link: Arc<dyn DisplayLink>,
    resets: mpsc::Sender<Extremum>,
}

impl EventDispatcher {
    pub fn new(link: Arc<dyn DisplayLink>, resets: mpsc::Sender<Extremum>) -> Self {
        Self { link, resets }
    }

    /// Decode one record and act on it. Emits at most one log line.
    pub fn dispatch(&self, record: &GaugeEventRecord) -> DispatchOutcome {
        if record.command != CommandKind::ReportEvent {
            tracing::warn!(
                "Invalid event from the display: 0x{:02X}",
                record.command.to_byte()
            );
            return DispatchOutcome::Ignored;
        }

        match record.class {
            WidgetClass::WinButton => match record.index {
                RESET_MIN_BUTTON => self.request_reset(Extremum::Minimum),
                RESET_MAX_BUTTON => self.request_reset(Extremum::Maximum),
                other => {
                    tracing::warn!("Unknown button: {}", other);
                    DispatchOutcome::UnknownButton(other)
                }
            },
            class => {
                let object = class.to_byte();
                tracing::warn!(
                    "Unhandled event: object: {:2}, index: {} data: {} [{:02X} {:02X} {:04X}]",
                    object,
                    record.index,
                    record.payload,
                    object,
                    record.index,
                    record.payload
                );
                DispatchOutcome::Unhandled
            }
        }
    }

    fn request_reset(&self, which: Extremum) -> DispatchOutcome {
        match self.resets.try_send(which) {
            Ok(()) => DispatchOutcome::ResetRequested(which),
            Err(e) => {
                tracing::warn!("Dropped {:?} reset request: {}", which, e);
                DispatchOutcome::ResetDropped(which)
            }
        }
    }

    /// Handle events in arrival order until cancelled or the link closes
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!("Event dispatcher started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = self.link.read_next_event() => match event {
                    Some(record) => {
                        self.dispatch(&record);
                    }
                    None => {
                        tracing::warn!("Display link closed, dispatcher exiting");
                        return;
                    }
                },
            }
        }

        // Events already queued when shutdown was requested are still handled
        let mut drained = 0usize;
        while self.link.poll_event_available() {
            match self.link.read_next_event().await {
                Some(record) => {
                    self.dispatch(&record);
                    drained += 1;
                }
                None => break,
            }
        }
        tracing::info!("Event dispatcher stopped ({} queued events drained)", drained);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::display_link::testing::RecordingLink;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts every event emitted while installed
    struct CountingLayer(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for CountingLayer {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn count_logs<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountingLayer(count.clone()));
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, count.load(Ordering::SeqCst))
    }

    fn dispatcher() -> (EventDispatcher, mpsc::Receiver<Extremum>, Arc<RecordingLink>) {
        let link = Arc::new(RecordingLink::new());
        let (tx, rx) = mpsc::channel(4);
        (EventDispatcher::new(link.clone(), tx), rx, link)
    }

    #[test]
    fn test_reset_buttons_queue_requests() {
        let (dispatcher, mut rx, _link) = dispatcher();

        assert_eq!(
            dispatcher.dispatch(&GaugeEventRecord::button_press(RESET_MIN_BUTTON)),
            DispatchOutcome::ResetRequested(Extremum::Minimum)
        );
        assert_eq!(
            dispatcher.dispatch(&GaugeEventRecord::button_press(RESET_MAX_BUTTON)),
            DispatchOutcome::ResetRequested(Extremum::Maximum)
        );
        assert_eq!(rx.try_recv().unwrap(), Extremum::Minimum);
        assert_eq!(rx.try_recv().unwrap(), Extremum::Maximum);
    }

    #[test]
    fn test_slider_event_is_logged_once_and_changes_nothing() {
        let (dispatcher, mut rx, link) = dispatcher();
        let record = GaugeEventRecord::new(CommandKind::ReportEvent, WidgetClass::Slider, 0, 42);

        let (outcome, logs) = count_logs(|| dispatcher.dispatch(&record));

        assert_eq!(outcome, DispatchOutcome::Unhandled);
        assert_eq!(logs, 1);
        assert!(rx.try_recv().is_err());
        assert!(link.writes().is_empty());
    }

    #[test]
    fn test_unknown_button_and_foreign_command_are_ignored() {
        let (dispatcher, mut rx, _link) = dispatcher();

        let press = GaugeEventRecord::button_press(3);
        let (outcome, logs) = count_logs(|| dispatcher.dispatch(&press));
        assert_eq!(outcome, DispatchOutcome::UnknownButton(3));
        assert_eq!(logs, 1);

        let reply = GaugeEventRecord::new(
            CommandKind::ReportObject,
            WidgetClass::WinButton,
            RESET_MIN_BUTTON,
            0,
        );
        let (outcome, logs) = count_logs(|| dispatcher.dispatch(&reply));
        assert_eq!(outcome, DispatchOutcome::Ignored);
        assert_eq!(logs, 1);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_full_reset_queue_drops_request() {
        let link = Arc::new(RecordingLink::new());
        let (tx, _rx) = mpsc::channel(1);
        let dispatcher = EventDispatcher::new(link, tx);

        let press = GaugeEventRecord::button_press(RESET_MIN_BUTTON);
        assert_eq!(
            dispatcher.dispatch(&press),
            DispatchOutcome::ResetRequested(Extremum::Minimum)
        );
        assert_eq!(
            dispatcher.dispatch(&press),
            DispatchOutcome::ResetDropped(Extremum::Minimum)
        );
    }

    #[tokio::test]
    async fn test_run_preserves_arrival_order_and_exits_on_close() {
        let (dispatcher, mut rx, link) = dispatcher();
        link.push_event(GaugeEventRecord::button_press(RESET_MAX_BUTTON));
        link.push_event(GaugeEventRecord::button_press(RESET_MIN_BUTTON));
        link.push_event(GaugeEventRecord::button_press(RESET_MAX_BUTTON));
        link.close();

        dispatcher.run(CancellationToken::new()).await;

        assert_eq!(rx.recv().await, Some(Extremum::Maximum));
        assert_eq!(rx.recv().await, Some(Extremum::Minimum));
        assert_eq!(rx.recv().await, Some(Extremum::Maximum));
        assert!(!link.poll_event_available());
    }

    #[tokio::test]
    async fn test_cancel_drains_queued_events() {
        let (dispatcher, mut rx, link) = dispatcher();
        let cancel = CancellationToken::new();
        cancel.cancel();
        link.push_event(GaugeEventRecord::button_press(RESET_MIN_BUTTON));

        dispatcher.run(cancel).await;

        assert_eq!(rx.recv().await, Some(Extremum::Minimum));
        assert!(!link.poll_event_available());
    }
}
