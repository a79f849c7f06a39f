//! Analysis configuration.

use crate::error::{Result, SpiceletError};

/// Requested analysis mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// DC operating point only.
    #[default]
    OperatingPoint,
    /// Fixed-step transient analysis.
    Transient,
}

/// Configuration for a simulation run, as collected from directives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationOptions {
    /// Analysis to run.
    pub mode: Mode,
    /// Transient step size in seconds.
    pub step_size: Option<f64>,
    /// Transient end time in seconds.
    pub end_time: Option<f64>,
    /// Conductance from every voltage node to ground (0 disables it).
    pub gmin: f64,
}

impl SimulationOptions {
    /// Create options for a DC operating point.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to transient analysis with the given step and end time.
    pub fn with_transient(mut self, step_size: f64, end_time: f64) -> Self {
        self.mode = Mode::Transient;
        self.step_size = Some(step_size);
        self.end_time = Some(end_time);
        self
    }

    /// Set the analysis mode without touching the time parameters.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the minimum conductance to ground.
    pub fn with_gmin(mut self, gmin: f64) -> Self {
        self.gmin = gmin;
        self
    }

    /// Validate the options into a runnable [`Analysis`].
    pub fn analysis(&self) -> Result<Analysis> {
        if !self.gmin.is_finite() || self.gmin < 0.0 {
            return Err(SpiceletError::invalid_param(format!(
                "gmin must be finite and non-negative (got {})",
                self.gmin
            )));
        }

        match self.mode {
            Mode::OperatingPoint => Ok(Analysis::OperatingPoint),
            Mode::Transient => {
                let step_size = self
                    .step_size
                    .ok_or(SpiceletError::MissingTransientParam { missing: "a step size" })?;
                let end_time = self
                    .end_time
                    .ok_or(SpiceletError::MissingTransientParam { missing: "an end time" })?;

                if !(step_size > 0.0) || !step_size.is_finite() {
                    return Err(SpiceletError::invalid_param(format!(
                        "step size must be positive and finite (got {step_size})"
                    )));
                }
                if !(end_time > 0.0) || !end_time.is_finite() {
                    return Err(SpiceletError::invalid_param(format!(
                        "end time must be positive and finite (got {end_time})"
                    )));
                }
                if step_size > end_time {
                    return Err(SpiceletError::invalid_param(format!(
                        "step size {step_size} exceeds end time {end_time}"
                    )));
                }

                Ok(Analysis::Transient {
                    step_size,
                    end_time,
                })
            }
        }
    }
}

/// A validated analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Analysis {
    OperatingPoint,
    Transient { step_size: f64, end_time: f64 },
}

/// Absorbs rounding in `end_time / step_size` so that e.g. 1e-3 / 1e-4
/// yields 10 intervals rather than 9.
const GRID_EPSILON: f64 = 1e-9;

impl Analysis {
    /// Number of recorded points, including the operating point at t = 0.
    pub fn step_count(&self) -> usize {
        match *self {
            Analysis::OperatingPoint => 1,
            Analysis::Transient {
                step_size,
                end_time,
            } => (end_time / step_size + GRID_EPSILON).floor() as usize + 1,
        }
    }

    /// Time of every recorded point.
    pub fn time_grid(&self) -> Vec<f64> {
        let step_size = match *self {
            Analysis::OperatingPoint => 0.0,
            Analysis::Transient { step_size, .. } => step_size,
        };
        (0..self.step_count())
            .map(|k| k as f64 * step_size)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_is_operating_point() {
        assert_eq!(
            SimulationOptions::new().analysis().unwrap(),
            Analysis::OperatingPoint
        );
    }

    #[test]
    fn test_transient_step_count() {
        let analysis = SimulationOptions::new()
            .with_transient(1e-4, 1e-3)
            .analysis()
            .unwrap();
        assert_eq!(analysis.step_count(), 11);

        let grid = analysis.time_grid();
        assert_eq!(grid[0], 0.0);
        assert_relative_eq!(grid[10], 1e-3);

        let analysis = SimulationOptions::new()
            .with_transient(0.3, 1.0)
            .analysis()
            .unwrap();
        assert_eq!(analysis.step_count(), 4);
    }

    #[test]
    fn test_missing_transient_params() {
        let err = SimulationOptions::new()
            .with_mode(Mode::Transient)
            .analysis()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_invalid_transient_params() {
        for (step, end) in [(0.0, 1.0), (-1.0, 1.0), (2.0, 1.0), (f64::NAN, 1.0)] {
            let err = SimulationOptions::new()
                .with_transient(step, end)
                .analysis()
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }
}
