//! Analysis engine.

use crate::circuit::{validate_environment, Environment, StampKind};
use crate::error::{Result, SpiceletError};

use super::mna::SystemMatrix;
use super::options::{Analysis, SimulationOptions};
use super::probe::{resolve_probes, ProbeRequest};
use super::results::{DcResult, SimulationResult, TransientResult};

/// Where the engine is in its current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    OperatingPoint,
    Transient,
    Done,
    Failed,
}

/// Runs one analysis on environment variants.
#[derive(Debug, Clone)]
pub struct Engine {
    analysis: Analysis,
    probes: Vec<ProbeRequest>,
    gmin: f64,
    state: EngineState,
}

impl Engine {
    /// Create an engine for a validated analysis.
    pub fn new(analysis: Analysis, probes: Vec<ProbeRequest>) -> Self {
        Self {
            analysis,
            probes,
            gmin: 0.0,
            state: EngineState::Idle,
        }
    }

    /// Validate `options` and build an engine from them.
    pub fn from_options(options: &SimulationOptions, probes: Vec<ProbeRequest>) -> Result<Self> {
        let mut engine = Self::new(options.analysis()?, probes);
        engine.gmin = options.gmin;
        Ok(engine)
    }

    pub fn analysis(&self) -> Analysis {
        self.analysis
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Run the analysis on one variant, advancing its element state.
    pub fn run(&mut self, variant: usize, env: &mut Environment) -> Result<SimulationResult> {
        self.state = EngineState::Idle;
        let result = self.run_inner(variant, env);
        self.state = match result {
            Ok(_) => EngineState::Done,
            Err(_) => EngineState::Failed,
        };
        result
    }

    fn run_inner(&mut self, variant: usize, env: &mut Environment) -> Result<SimulationResult> {
        validate_environment(env, variant)?;

        match self.analysis {
            Analysis::OperatingPoint => {
                self.state = EngineState::OperatingPoint;
                log::info!(
                    "variant {}: operating point, {} unknowns",
                    variant,
                    env.unknown_count()
                );
                let mut matrix = SystemMatrix::new(env.unknown_count());
                self.operating_point(variant, env, &mut matrix)?;
                Ok(SimulationResult::OperatingPoint(DcResult::new(
                    unknown_names(env),
                    matrix.x.as_slice(),
                )))
            }
            Analysis::Transient { step_size, .. } => {
                self.state = EngineState::Transient;
                let grid = self.analysis.time_grid();
                log::info!(
                    "variant {}: transient, {} unknowns, {} steps of {:e}s",
                    variant,
                    env.unknown_count(),
                    grid.len(),
                    step_size
                );
                self.transient(variant, env, step_size, &grid)
                    .map(SimulationResult::Transient)
            }
        }
    }

    fn operating_point(
        &self,
        variant: usize,
        env: &mut Environment,
        matrix: &mut SystemMatrix,
    ) -> Result<()> {
        env.assemble_into(StampKind::Dc, self.gmin, matrix);
        let solution = matrix.factor_and_solve().map_err(|_| singular(variant, 0, 0.0))?;
        env.apply_solution(0.0, solution);
        Ok(())
    }

    fn transient(
        &self,
        variant: usize,
        env: &mut Environment,
        step_size: f64,
        grid: &[f64],
    ) -> Result<TransientResult> {
        let probes = resolve_probes(&self.probes, env);
        let mut result = TransientResult::new(unknown_names(env), probes, grid.len());
        let mut matrix = SystemMatrix::new(env.unknown_count());

        self.operating_point(variant, env, &mut matrix)?;
        result.push(0.0, &matrix.x);

        let kind = StampKind::Transient { step_size };
        for (step, &time) in grid.iter().enumerate().skip(1) {
            env.assemble_into(kind, self.gmin, &mut matrix);
            let solution = matrix
                .factor_and_solve()
                .map_err(|_| singular(variant, step, time))?;
            result.push(time, solution);
            env.apply_solution(time, solution);
            log::debug!("variant {}: step {} at t = {:e}s", variant, step, time);
        }

        Ok(result)
    }
}

/// Names of the unknowns, i.e. every node but ground.
fn unknown_names(env: &Environment) -> &[String] {
    &env.node_names()[1..]
}

fn singular(variant: usize, step: usize, time: f64) -> SpiceletError {
    SpiceletError::SingularMatrix {
        variant,
        step,
        time,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::elements::Element;
    use crate::error::ErrorKind;

    fn env(lines: &[&str]) -> Environment {
        let mut env = Environment::new();
        for (i, line) in lines.iter().enumerate() {
            env.register(Element::from_text(line, i + 1).unwrap()).unwrap();
        }
        env
    }

    #[test]
    fn test_voltage_divider_operating_point() {
        let mut env = env(&["V1 in 0 10", "R1 in out 1k", "R2 out 0 1k"]);
        let mut engine = Engine::new(Analysis::OperatingPoint, Vec::new());

        let result = engine.run(0, &mut env).unwrap();
        let dc = result.as_dc().unwrap();
        assert_relative_eq!(dc.value("out").unwrap(), 5.0, epsilon = 1e-12);
        // Ground is not an unknown
        assert_eq!(dc.value("0"), None);
        assert_eq!(dc.values.len(), env.unknown_count());
        // 5 mA flows out of the source's positive terminal
        assert_relative_eq!(dc.value("V1#branch").unwrap(), -5e-3, epsilon = 1e-12);
        assert_eq!(engine.state(), EngineState::Done);
    }

    #[test]
    fn test_high_impedance_divider_is_not_singular() {
        let mut env = env(&["V1 a 0 1", "R1 a b 1e16", "R2 b 0 1e16"]);
        let mut engine = Engine::new(Analysis::OperatingPoint, Vec::new());

        let result = engine.run(0, &mut env).unwrap();
        let dc = result.as_dc().unwrap();
        assert_relative_eq!(dc.value("b").unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(dc.value("V1#branch").unwrap(), -5e-17, max_relative = 1e-9);
    }

    #[test]
    fn test_floating_node_is_structural_error() {
        let mut env = env(&["V1 a 0 5", "R1 b c 1k"]);
        let mut engine = Engine::new(Analysis::OperatingPoint, Vec::new());

        let err = engine.run(3, &mut env).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert!(matches!(err, SpiceletError::SingularMatrix { variant: 3, step: 0, .. }));
        assert_eq!(engine.state(), EngineState::Failed);
    }

    #[test]
    fn test_gmin_rescues_floating_capacitor_node() {
        // The capacitor midpoint has no DC path to ground
        let mut env = env(&["V1 a 0 5", "C1 a b 1u", "C2 b 0 1u"]);
        let options = SimulationOptions::new().with_gmin(1e-12);
        let mut engine = Engine::from_options(&options, Vec::new()).unwrap();

        let result = engine.run(0, &mut env).unwrap();
        assert_relative_eq!(result.as_dc().unwrap().value("b").unwrap(), 0.0);
    }

    #[test]
    fn test_transient_grid_and_probe_columns() {
        let mut env = env(&["V1 a 0 PWL(0 0 1m 1)", "R1 a 0 1k"]);
        let options = SimulationOptions::new().with_transient(1e-4, 1e-3);
        let probes = vec!["V(a)".parse().unwrap(), "V(nope)".parse().unwrap()];
        let mut engine = Engine::from_options(&options, probes).unwrap();

        let result = engine.run(0, &mut env).unwrap();
        let tran = result.as_transient().unwrap();
        assert_eq!(tran.len(), 11);
        assert_eq!(tran.probes.len(), 1);

        assert_relative_eq!(tran.time[10], 1e-3);
        // Rows hold the unknowns only
        assert!(tran.solutions.iter().all(|row| row.len() == env.unknown_count()));
        assert!(!tran.node_names.iter().any(|name| name == "0"));

        let va = tran.probe_column("V(a)").unwrap();
        assert_eq!(va[0], 0.0);
        // Each step sees the source at the last accepted time
        assert_eq!(va[1], 0.0);
        assert_relative_eq!(va[2], 0.1, epsilon = 1e-12);
        assert_relative_eq!(va[10], 0.9, epsilon = 1e-12);
    }
}
