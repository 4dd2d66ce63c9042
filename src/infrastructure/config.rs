use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    pub link: LinkSettings,
    pub simulator: SimulatorSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LinkSettings {
    pub device: String,
    pub baud_rate: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorSettings {
    pub tick_ms: u64,
}

impl SimulatorSettings {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    pub initial_page: u8,
}

/// Defaults, then `config/weather.*` if present, then `WEATHER__*` env vars
pub fn load_weather_config() -> anyhow::Result<WeatherConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/weather").required(false))
        .add_source(config::Environment::with_prefix("WEATHER").separator("__"))
        .build()?;

    let config: WeatherConfig = settings.try_deserialize()?;
    if config.simulator.tick_ms == 0 {
        anyhow::bail!("simulator.tick_ms must be greater than zero");
    }
    Ok(config)
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(builder
        .set_default("link.device", "/dev/ttyAMA0")?
        .set_default("link.baud_rate", 115_200)?
        .set_default("simulator.tick_ms", 100)?
        .set_default("display.initial_page", 0)?)
}
