// Temperature simulator - Owns the temperature state and renders it each tick
use crate::application::widget_writer::WidgetWriter;
use crate::domain::history::RollingHistory;
use crate::domain::render::{temperature_gauge_level, thermometer_level};
use crate::domain::telemetry::{Extremum, TEMPERATURE_DAYS, TemperatureState, TickOutcome};
use crate::domain::waveform::Waveform;
use crate::domain::widget::{
    TEMP_HISTORY_BASE, TEMP_LIVE_THERMOMETER, TEMP_MAX_HISTORY_BASE, TEMP_MAX_THERMOMETER,
    TEMP_MIN_HISTORY_BASE, TEMP_MIN_THERMOMETER, WidgetAddress,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Capacity of the reset-request queue between dispatcher and simulator
pub const RESET_QUEUE_DEPTH: usize = 16;

/// Single owner of [`TemperatureState`].
///
/// Other tasks never touch the state directly; extremum resets arrive over
/// an mpsc channel and are applied between ticks.
pub struct TemperatureSimulator {
    writer: WidgetWriter,
    waveform: Waveform,
    state: TemperatureState,
    tick_period: Duration,
}

impl TemperatureSimulator {
    pub fn new(writer: WidgetWriter, tick_period: Duration) -> Self {
        Self::with_waveform(writer, tick_period, Waveform::temperature())
    }

    pub fn with_waveform(writer: WidgetWriter, tick_period: Duration, waveform: Waveform) -> Self {
        Self {
            writer,
            waveform,
            state: TemperatureState::new(),
            tick_period,
        }
    }

    pub fn state(&self) -> &TemperatureState {
        &self.state
    }

    /// Take one sample and render it
    pub async fn tick(&mut self) -> TickOutcome {
        let celsius = self.waveform.next_sample();
        self.record(celsius).await
    }

    /// Fold an already-synthesised sample into the state and render it
    pub async fn record(&mut self, celsius: i32) -> TickOutcome {
        let outcome = self.state.record_sample(celsius);
        self.writer
            .write(TEMP_LIVE_THERMOMETER, thermometer_level(celsius))
            .await;

        if let TickOutcome::DayRolled(average) = outcome {
            tracing::debug!(
                "Temperature day closed: avg={} min={} max={}",
                average,
                self.state.min,
                self.state.max
            );
            render_history(&self.writer, TEMP_HISTORY_BASE, &self.state.averages).await;
            self.render_extremum(Extremum::Minimum).await;
            self.render_extremum(Extremum::Maximum).await;
        }
        outcome
    }

    pub async fn apply_reset(&mut self, which: Extremum) {
        if self.state.reset(which) {
            tracing::info!("Temperature {:?} reset to {}", which, self.state.current);
        }
        self.render_extremum(which).await;
    }

    async fn render_extremum(&self, which: Extremum) {
        let (history, value, base, thermometer) = match which {
            Extremum::Minimum => (
                &self.state.minimums,
                self.state.min,
                TEMP_MIN_HISTORY_BASE,
                TEMP_MIN_THERMOMETER,
            ),
            Extremum::Maximum => (
                &self.state.maximums,
                self.state.max,
                TEMP_MAX_HISTORY_BASE,
                TEMP_MAX_THERMOMETER,
            ),
        };
        render_history(&self.writer, base, history).await;
        self.writer.write(thermometer, thermometer_level(value)).await;
    }

    /// Tick at a fixed delay until cancelled, applying resets as they arrive
    pub async fn run(mut self, mut resets: mpsc::Receiver<Extremum>, cancel: CancellationToken) {
        tracing::info!("Temperature simulator started ({:?} per tick)", self.tick_period);
        loop {
            self.tick().await;

            let delay = tokio::time::sleep(self.tick_period);
            tokio::pin!(delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!(
                            "Temperature simulator stopped at {} C",
                            self.state().current
                        );
                        return;
                    }
                    _ = &mut delay => break,
                    Some(which) = resets.recv() => self.apply_reset(which).await,
                }
            }
        }
    }
}

async fn render_history(
    writer: &WidgetWriter,
    base: WidgetAddress,
    history: &RollingHistory<TEMPERATURE_DAYS>,
) {
    writer
        .write_run(base, history.iter().map(temperature_gauge_level))
        .await;
}
