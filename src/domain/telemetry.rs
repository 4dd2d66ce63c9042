// Telemetry domain models - Live readings, extrema and daily roll-ups
use super::history::RollingHistory;

/// Samples folded into one daily aggregate
pub const SAMPLES_PER_DAY: usize = 24;
pub const TEMPERATURE_DAYS: usize = 7;
pub const PRESSURE_DAYS: usize = 8;

/// Running sum over the samples of the current simulated day
#[derive(Debug, Clone, Default)]
struct DayAccumulator {
    sum: i64,
    samples: usize,
}

impl DayAccumulator {
    /// Add a sample; returns the day's mean once the day is complete
    fn add(&mut self, value: i32) -> Option<i32> {
        self.sum += i64::from(value);
        self.samples += 1;
        if self.samples < SAMPLES_PER_DAY {
            return None;
        }
        let average = rounded_mean(self.sum, self.samples);
        *self = Self::default();
        Some(average)
    }
}

/// Arithmetic mean rounded to nearest, halves away from zero
pub fn rounded_mean(sum: i64, count: usize) -> i32 {
    (sum as f64 / count as f64).round() as i32
}

/// Result of one simulator tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still inside the current day
    Sampled,
    /// The tick closed a day; carries the appended aggregate
    DayRolled(i32),
}

/// Which running extremum a reset targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Minimum,
    Maximum,
}

#[derive(Debug, Clone)]
pub struct TemperatureState {
    pub current: i32,
    pub min: i32,
    pub max: i32,
    pub averages: RollingHistory<TEMPERATURE_DAYS>,
    pub minimums: RollingHistory<TEMPERATURE_DAYS>,
    pub maximums: RollingHistory<TEMPERATURE_DAYS>,
    day: DayAccumulator,
}

impl TemperatureState {
    /// Extrema start inverted so the first sample claims both
    pub fn new() -> Self {
        Self {
            current: 0,
            min: 40,
            max: -10,
            averages: RollingHistory::new(),
            minimums: RollingHistory::new(),
            maximums: RollingHistory::new(),
            day: DayAccumulator::default(),
        }
    }

    pub fn record_sample(&mut self, celsius: i32) -> TickOutcome {
        self.current = celsius;
        self.min = self.min.min(celsius);
        self.max = self.max.max(celsius);

        match self.day.add(celsius) {
            Some(average) => {
                self.averages.push(average);
                self.minimums.push(self.min);
                self.maximums.push(self.max);
                TickOutcome::DayRolled(average)
            }
            None => TickOutcome::Sampled,
        }
    }

    /// Collapse an extremum onto the live value; true if it moved
    pub fn reset(&mut self, which: Extremum) -> bool {
        let slot = match which {
            Extremum::Minimum => &mut self.min,
            Extremum::Maximum => &mut self.max,
        };
        let changed = *slot != self.current;
        *slot = self.current;
        changed
    }
}

impl Default for TemperatureState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PressureState {
    pub current: i32,
    pub history: RollingHistory<PRESSURE_DAYS>,
    day: DayAccumulator,
}

impl PressureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sample(&mut self, hpa: i32) -> TickOutcome {
        self.current = hpa;
        match self.day.add(hpa) {
            Some(average) => {
                self.history.push(average);
                TickOutcome::DayRolled(average)
            }
            None => TickOutcome::Sampled,
        }
    }
}
