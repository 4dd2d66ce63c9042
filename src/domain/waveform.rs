// Synthetic waveform - Deterministic sine source standing in for a sensor

/// Shifted sine wave sampled once per degree of phase.
///
/// Produces `round(scale * (sin(phase) + 1) + offset)`, so the output spans
/// `[offset, offset + 2 * scale]`.
#[derive(Debug, Clone)]
pub struct Waveform {
    phase_deg: u16,
    scale: f64,
    offset: f64,
}

impl Waveform {
    pub fn new(scale: f64, offset: f64) -> Self {
        Self {
            phase_deg: 0,
            scale,
            offset,
        }
    }

    /// Outdoor temperature in degrees Celsius, -10..=40
    pub fn temperature() -> Self {
        Self::new(25.0, -10.0)
    }

    /// Atmospheric pressure in hPa, 940..=1060
    pub fn pressure() -> Self {
        Self::new(60.0, 940.0)
    }

    /// Value at the current phase
    pub fn sample(&self) -> i32 {
        let radians = f64::from(self.phase_deg).to_radians();
        (self.scale * (radians.sin() + 1.0) + self.offset).round_ties_even() as i32
    }

    /// Sample the current phase, then advance by one degree
    pub fn next_sample(&mut self) -> i32 {
        let value = self.sample();
        self.phase_deg = (self.phase_deg + 1) % 360;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_landmarks() {
        let mut wave = Waveform::temperature();
        let samples: Vec<i32> = (0..360).map(|_| wave.next_sample()).collect();
        assert_eq!(samples[0], 15);
        assert_eq!(samples[90], 40);
        assert_eq!(samples[270], -10);
        assert!(samples.iter().all(|v| (-10..=40).contains(v)));
    }

    #[test]
    fn test_pressure_range() {
        let mut wave = Waveform::pressure();
        let samples: Vec<i32> = (0..360).map(|_| wave.next_sample()).collect();
        assert_eq!(*samples.iter().min().unwrap(), 940);
        assert_eq!(*samples.iter().max().unwrap(), 1060);
    }

    #[test]
    fn test_phase_wraps_at_full_turn() {
        let mut wave = Waveform::temperature();
        let first_turn: Vec<i32> = (0..360).map(|_| wave.next_sample()).collect();
        let second_turn: Vec<i32> = (0..360).map(|_| wave.next_sample()).collect();
        assert_eq!(first_turn, second_turn);
    }
}
