pub mod history;
pub mod render;
pub mod telemetry;
pub mod waveform;
pub mod widget;
