// Main entry point - Dependency injection and task startup
mod application;
mod domain;
mod infrastructure;

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::application::display_link::DisplayLink;
use crate::application::event_dispatcher::EventDispatcher;
use crate::application::pressure_service::PressureSimulator;
use crate::application::temperature_service::{RESET_QUEUE_DEPTH, TemperatureSimulator};
use crate::application::widget_writer::{WidgetWriter, WriteMonitor};
use crate::domain::widget::{WidgetAddress, WidgetClass};
use crate::infrastructure::config::load_weather_config;
use crate::infrastructure::genie_link::GenieLink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_weather_config()?;
    tracing::info!(
        "Genie weather station starting on {} at {} baud",
        config.link.device,
        config.link.baud_rate
    );

    // Fatal if the panel can't be reached
    let link: Arc<dyn DisplayLink> =
        Arc::new(GenieLink::open(&config.link.device, config.link.baud_rate).await?);
    let monitor = Arc::new(WriteMonitor::new());
    let writer = WidgetWriter::new(link.clone(), monitor.clone());

    writer
        .write(
            WidgetAddress::new(WidgetClass::Form, config.display.initial_page),
            0,
        )
        .await;

    let cancel = CancellationToken::new();
    let (reset_tx, reset_rx) = mpsc::channel(RESET_QUEUE_DEPTH);
    let tick_period = config.simulator.tick_period();

    let temperature = tokio::spawn(
        TemperatureSimulator::new(writer.clone(), tick_period).run(reset_rx, cancel.clone()),
    );
    let pressure =
        tokio::spawn(PressureSimulator::new(writer.clone(), tick_period).run(cancel.clone()));

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown requested");
        signal_cancel.cancel();
    });

    // The dispatcher runs on the main task until shutdown or link loss
    EventDispatcher::new(link, reset_tx).run(cancel.clone()).await;
    cancel.cancel();

    let (temperature, pressure) = tokio::join!(temperature, pressure);
    temperature?;
    pressure?;

    tracing::info!("Stopped ({} widget writes failed)", monitor.failures());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Can't listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Can't listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
