// Gauge mapping - Converts engineering values into widget input levels

pub const TEMP_FLOOR: i32 = -10;
pub const TEMP_CEILING: i32 = 40;
pub const PRESSURE_BASELINE: i32 = 940;
pub const PRESSURE_SPAN: i32 = 120;

/// Thermometer level: degrees above the floor, clamped to 0..=50
pub fn thermometer_level(celsius: i32) -> u16 {
    (celsius.clamp(TEMP_FLOOR, TEMP_CEILING) - TEMP_FLOOR) as u16
}

/// Percent gauge level (0..=100) for a temperature history slot
pub fn temperature_gauge_level(celsius: i32) -> u16 {
    thermometer_level(celsius) * 2
}

/// Cool-gauge input: hPa above the 940 baseline, clamped to 0..=120
pub fn pressure_dial_level(hpa: i32) -> u16 {
    (hpa - PRESSURE_BASELINE).clamp(0, PRESSURE_SPAN) as u16
}

/// Percent gauge level (0..=100) for a pressure history slot
pub fn pressure_gauge_level(hpa: i32) -> u16 {
    pressure_dial_level(hpa) * 100 / PRESSURE_SPAN as u16
}
