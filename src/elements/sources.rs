//! Independent voltage sources.
//!
//! Every voltage source owns a branch-current terminal (its third terminal)
//! and stamps the constraint `V+ - V- = v(t)`. The time-varying sources keep
//! a time cursor equal to the last accepted time point, and their transient
//! stamp evaluates the waveform at that cursor.

use std::f64::consts::PI;

use num_complex::Complex64;

use super::stamp::{AcStamp, Stamp, StampValue};

/// Stamp a voltage source whose terminals are `[n+, n-, branch]`.
fn constraint_stamp<T: StampValue>(value: T) -> Stamp<T> {
    let mut stamp = Stamp::zeros(3);
    stamp.stamp_voltage_constraint(0, 1, 2, value);
    stamp
}

/// A constant voltage source.
#[derive(Debug, Clone)]
pub struct DcSource {
    pub id: String,
    pub nodes: [String; 3], // [positive, negative, branch]
    pub voltage: f64,
}

impl DcSource {
    /// Create a new constant source.
    pub fn new(id: String, nodes: [String; 3], voltage: f64) -> Self {
        Self { id, nodes, voltage }
    }

    /// Constraint stamp, identical for DC and transient analysis.
    pub fn stamp(&self) -> Stamp {
        constraint_stamp(self.voltage)
    }

    pub fn stamp_ac(&self) -> AcStamp {
        constraint_stamp(Complex64::from(self.voltage))
    }
}

/// Parameters of a trapezoidal pulse train.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseParams {
    pub init_v: f64,
    pub final_v: f64,
    pub init_delay: f64,
    pub rise_time: f64,
    pub fall_time: f64,
    pub pulse_width: f64,
    /// Repetition period; zero or negative means a single pulse
    pub period: f64,
}

impl PulseParams {
    /// Evaluate the waveform at time `t`.
    pub fn voltage_at(&self, t: f64) -> f64 {
        if t < self.init_delay {
            return self.init_v;
        }

        let mut t_cyc = t - self.init_delay;
        if self.period > 0.0 {
            t_cyc %= self.period;
        }

        let fall_start = self.rise_time + self.pulse_width;
        let fall_end = fall_start + self.fall_time;

        if t_cyc < self.rise_time {
            self.init_v + (self.final_v - self.init_v) * t_cyc / self.rise_time
        } else if t_cyc < fall_start {
            self.final_v
        } else if t_cyc < fall_end {
            self.final_v + (self.init_v - self.final_v) * (t_cyc - fall_start) / self.fall_time
        } else {
            self.init_v
        }
    }
}

/// A pulse voltage source: `PULSE(v1 v2 td tr tf pw per)`.
#[derive(Debug, Clone)]
pub struct PulseSource {
    pub id: String,
    pub nodes: [String; 3],
    pub params: PulseParams,
    /// Last accepted time point
    pub time: f64,
}

impl PulseSource {
    pub fn new(id: String, nodes: [String; 3], params: PulseParams) -> Self {
        Self {
            id,
            nodes,
            params,
            time: 0.0,
        }
    }

    pub fn voltage_at(&self, t: f64) -> f64 {
        self.params.voltage_at(t)
    }

    /// The operating point sees the initial level.
    pub fn stamp_dc(&self) -> Stamp {
        constraint_stamp(self.params.init_v)
    }

    pub fn stamp_ac(&self) -> AcStamp {
        constraint_stamp(Complex64::from(self.params.init_v))
    }

    pub fn stamp_trans(&self) -> Stamp {
        constraint_stamp(self.voltage_at(self.time))
    }

    pub fn update_state(&mut self, time: f64) {
        self.time = time;
    }
}

/// A piecewise-linear voltage source: `PWL(t1 v1 t2 v2 ...)`.
///
/// Breakpoint times are non-decreasing. Lookup is a binary search over the
/// table, so queries may arrive in any order.
#[derive(Debug, Clone)]
pub struct PwlSource {
    pub id: String,
    pub nodes: [String; 3],
    /// (time, value) breakpoints, never empty
    pub points: Vec<(f64, f64)>,
    /// Last accepted time point
    pub time: f64,
}

impl PwlSource {
    pub fn new(id: String, nodes: [String; 3], points: Vec<(f64, f64)>) -> Self {
        debug_assert!(!points.is_empty(), "PWL table must not be empty");
        Self {
            id,
            nodes,
            points,
            time: 0.0,
        }
    }

    /// Evaluate the waveform at time `t`, clamping outside the table.
    pub fn voltage_at(&self, t: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };

        // First breakpoint at or after t
        let idx = self.points.partition_point(|&(time, _)| time < t);
        if idx == 0 {
            return first.1;
        }
        if idx == self.points.len() {
            return last.1;
        }

        let (t0, v0) = self.points[idx - 1];
        let (t1, v1) = self.points[idx];
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }

    /// The operating point sees the first breakpoint's value.
    pub fn initial_voltage(&self) -> f64 {
        self.points.first().map(|&(_, v)| v).unwrap_or(0.0)
    }

    pub fn stamp_dc(&self) -> Stamp {
        constraint_stamp(self.initial_voltage())
    }

    pub fn stamp_ac(&self) -> AcStamp {
        constraint_stamp(Complex64::from(self.initial_voltage()))
    }

    pub fn stamp_trans(&self) -> Stamp {
        constraint_stamp(self.voltage_at(self.time))
    }

    pub fn update_state(&mut self, time: f64) {
        self.time = time;
    }
}

/// Parameters of a damped sinusoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinParams {
    pub offset: f64,
    pub amplitude: f64,
    /// Frequency in Hz
    pub frequency: f64,
    pub init_delay: f64,
    /// Exponential factor in 1/s (negative values decay)
    pub damping: f64,
    /// Phase in degrees
    pub phase: f64,
}

impl SinParams {
    /// Evaluate the waveform at time `t`.
    pub fn voltage_at(&self, t: f64) -> f64 {
        let t_shift = if t < self.init_delay {
            0.0
        } else {
            t - self.init_delay
        };

        let envelope = (self.damping * t_shift).exp();
        let angle = 2.0 * PI * self.frequency * t_shift + self.phase.to_radians();
        self.offset + self.amplitude * envelope * angle.sin()
    }
}

/// A sinusoidal voltage source: `SIN(vo va freq td damp phase)`.
#[derive(Debug, Clone)]
pub struct SinSource {
    pub id: String,
    pub nodes: [String; 3],
    pub params: SinParams,
    /// Last accepted time point
    pub time: f64,
}

impl SinSource {
    pub fn new(id: String, nodes: [String; 3], params: SinParams) -> Self {
        Self {
            id,
            nodes,
            params,
            time: 0.0,
        }
    }

    pub fn voltage_at(&self, t: f64) -> f64 {
        self.params.voltage_at(t)
    }

    pub fn stamp_dc(&self) -> Stamp {
        constraint_stamp(self.voltage_at(0.0))
    }

    /// Small-signal excitation is the amplitude.
    pub fn stamp_ac(&self) -> AcStamp {
        constraint_stamp(Complex64::from(self.params.amplitude))
    }

    pub fn stamp_trans(&self) -> Stamp {
        constraint_stamp(self.voltage_at(self.time))
    }

    pub fn update_state(&mut self, time: f64) {
        self.time = time;
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn terminals(id: &str) -> [String; 3] {
        [
            "a".to_string(),
            "0".to_string(),
            crate::circuit::branch_node_name(id),
        ]
    }

    fn pulse(period: f64) -> PulseParams {
        PulseParams {
            init_v: 0.0,
            final_v: 5.0,
            init_delay: 0.0,
            rise_time: 2.0,
            fall_time: 1.0,
            pulse_width: 3.0,
            period,
        }
    }

    #[test]
    fn test_pulse_rise_midpoint() {
        assert_relative_eq!(pulse(10.0).voltage_at(1.0), 2.5);
    }

    #[test]
    fn test_pulse_shape() {
        let p = pulse(10.0);
        assert_eq!(p.voltage_at(-1.0), 0.0);
        assert_eq!(p.voltage_at(3.0), 5.0);
        // Halfway down the fall ramp
        assert_relative_eq!(p.voltage_at(5.5), 2.5);
        assert_eq!(p.voltage_at(7.0), 0.0);
        // Second period repeats the first
        assert_relative_eq!(p.voltage_at(11.0), 2.5);
    }

    #[test]
    fn test_pulse_without_period_does_not_repeat() {
        let p = pulse(0.0);
        assert_eq!(p.voltage_at(11.0), 0.0);
    }

    #[test]
    fn test_pulse_delay_holds_initial_level() {
        let mut p = pulse(10.0);
        p.init_delay = 1.0;
        assert_eq!(p.voltage_at(0.5), 0.0);
        assert_relative_eq!(p.voltage_at(2.0), 2.5);
    }

    #[test]
    fn test_pwl_interpolation_and_clamping() {
        let src = PwlSource::new(
            "V1".to_string(),
            terminals("V1"),
            vec![(0.0, 0.0), (1.0, 10.0)],
        );
        assert_eq!(src.voltage_at(0.5), 5.0);
        assert_eq!(src.voltage_at(-1.0), 0.0);
        assert_eq!(src.voltage_at(2.0), 10.0);
    }

    #[test]
    fn test_pwl_queries_in_any_order() {
        let src = PwlSource::new(
            "V1".to_string(),
            terminals("V1"),
            vec![(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)],
        );
        assert_relative_eq!(src.voltage_at(1.5), 5.0);
        assert_relative_eq!(src.voltage_at(0.25), 2.5);
        assert_relative_eq!(src.voltage_at(1.5), 5.0);
    }

    #[test]
    fn test_pwl_vertical_step() {
        let src = PwlSource::new(
            "V1".to_string(),
            terminals("V1"),
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 3.0), (2.0, 3.0)],
        );
        assert_eq!(src.voltage_at(1.0), 0.0);
        assert_eq!(src.voltage_at(1.5), 3.0);
    }

    #[test]
    fn test_sin_waveform() {
        let params = SinParams {
            offset: 1.0,
            amplitude: 2.0,
            frequency: 1.0,
            init_delay: 0.5,
            damping: 0.0,
            phase: 0.0,
        };
        assert_eq!(params.voltage_at(0.25), 1.0);
        assert_abs_diff_eq!(params.voltage_at(0.75), 3.0, epsilon = 1e-12);

        let shifted = SinParams { phase: 90.0, ..params };
        assert_abs_diff_eq!(shifted.voltage_at(0.0), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sin_damping() {
        let params = SinParams {
            offset: 0.0,
            amplitude: 1.0,
            frequency: 0.25,
            init_delay: 0.0,
            damping: -1.0,
            phase: 0.0,
        };
        assert_abs_diff_eq!(params.voltage_at(1.0), (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_transient_stamp_uses_time_cursor() {
        let mut src = PulseSource::new("V1".to_string(), terminals("V1"), pulse(10.0));
        assert_eq!(src.stamp_dc().rhs(2), 0.0);
        assert_eq!(src.stamp_trans().rhs(2), 0.0);

        src.update_state(1.0);
        assert_relative_eq!(src.stamp_trans().rhs(2), 2.5);
        // Idempotent for repeated identical updates
        src.update_state(1.0);
        assert_relative_eq!(src.stamp_trans().rhs(2), 2.5);
    }

    #[test]
    fn test_pwl_transient_stamp_lags_one_step() {
        let mut src = PwlSource::new(
            "V2".to_string(),
            terminals("V2"),
            vec![(0.0, 0.0), (1e-3, 1.0)],
        );
        src.update_state(0.0);
        assert_eq!(src.stamp_trans().rhs(2), 0.0);
        src.update_state(5e-4);
        assert_relative_eq!(src.stamp_trans().rhs(2), 0.5);
    }
}
