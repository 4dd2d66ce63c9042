// Pressure simulator - Live dial plus eight days of history
use crate::application::widget_writer::WidgetWriter;
use crate::domain::render::{pressure_dial_level, pressure_gauge_level};
use crate::domain::telemetry::{PressureState, TickOutcome};
use crate::domain::waveform::Waveform;
use crate::domain::widget::{PRESSURE_HISTORY_BASE, PRESSURE_LIVE_DIAL};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct PressureSimulator {
    writer: WidgetWriter,
    waveform: Waveform,
    state: PressureState,
    tick_period: Duration,
}

impl PressureSimulator {
    pub fn new(writer: WidgetWriter, tick_period: Duration) -> Self {
        Self::with_waveform(writer, tick_period, Waveform::pressure())
    }

    pub fn with_waveform(writer: WidgetWriter, tick_period: Duration, waveform: Waveform) -> Self {
        Self {
            writer,
            waveform,
            state: PressureState::new(),
            tick_period,
        }
    }

    pub fn state(&self) -> &PressureState {
        &self.state
    }

    pub async fn tick(&mut self) -> TickOutcome {
        let hpa = self.waveform.next_sample();
        let outcome = self.state.record_sample(hpa);
        self.writer
            .write(PRESSURE_LIVE_DIAL, pressure_dial_level(hpa))
            .await;

        if let TickOutcome::DayRolled(average) = outcome {
            tracing::debug!("Pressure day closed: avg={} hPa", average);
            self.writer
                .write_run(
                    PRESSURE_HISTORY_BASE,
                    self.state.history.iter().map(pressure_gauge_level),
                )
                .await;
        }
        outcome
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!("Pressure simulator started ({:?} per tick)", self.tick_period);
        loop {
            self.tick().await;
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.tick_period) => {}
            }
        }
        tracing::info!("Pressure simulator stopped at {} hPa", self.state().current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::display_link::testing::RecordingLink;
    use crate::application::widget_writer::WriteMonitor;
    use crate::domain::telemetry::{PRESSURE_DAYS, SAMPLES_PER_DAY};
    use crate::domain::widget::WidgetClass;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_day_roll_renders_eight_history_gauges() {
        let link = Arc::new(RecordingLink::new());
        let writer = WidgetWriter::new(link.clone(), Arc::new(WriteMonitor::new()));
        let mut sim = PressureSimulator::new(writer, Duration::from_millis(100));

        for _ in 0..SAMPLES_PER_DAY - 1 {
            assert_eq!(sim.tick().await, TickOutcome::Sampled);
        }
        assert!(matches!(sim.tick().await, TickOutcome::DayRolled(_)));

        let writes = link.writes();
        assert_eq!(writes.len(), SAMPLES_PER_DAY + PRESSURE_DAYS);
        assert_eq!(
            link.last_value(PRESSURE_LIVE_DIAL),
            Some(pressure_dial_level(sim.state().current))
        );
        // Older slots are still zero and render empty
        assert_eq!(link.last_value(PRESSURE_HISTORY_BASE.slot(0)), Some(0));
        assert_eq!(
            link.last_value(PRESSURE_HISTORY_BASE.slot(7)),
            Some(pressure_gauge_level(sim.state().history.newest()))
        );
    }

    #[tokio::test]
    async fn test_gauge_inputs_stay_clamped() {
        let link = Arc::new(RecordingLink::new());
        let writer = WidgetWriter::new(link.clone(), Arc::new(WriteMonitor::new()));
        // Swings from 800 to 1200 hPa
        let mut sim = PressureSimulator::with_waveform(
            writer,
            Duration::from_millis(100),
            Waveform::new(200.0, 800.0),
        );
        for _ in 0..(SAMPLES_PER_DAY * 20) {
            sim.tick().await;
        }

        let writes = link.writes();
        assert!(writes.iter().any(|(a, v)| *a == PRESSURE_LIVE_DIAL && *v == 120));
        assert!(writes.iter().any(|(a, v)| *a == PRESSURE_LIVE_DIAL && *v == 0));
        assert!(
            writes
                .iter()
                .filter(|(a, _)| *a == PRESSURE_LIVE_DIAL)
                .all(|(_, v)| *v <= 120)
        );
        assert!(
            writes
                .iter()
                .filter(|(a, _)| a.class == WidgetClass::Gauge)
                .all(|(_, v)| *v <= 100)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_at_fixed_delay_until_cancelled() {
        let link = Arc::new(RecordingLink::new());
        let writer = WidgetWriter::new(link.clone(), Arc::new(WriteMonitor::new()));
        let sim = PressureSimulator::new(writer, Duration::from_millis(100));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(sim.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(450)).await;
        cancel.cancel();
        handle.await.unwrap();

        // Ticks at 0, 100, 200, 300 and 400 ms
        assert_eq!(link.writes().len(), 5);
    }
}
