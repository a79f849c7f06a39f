//! Simulation session: the queue of environment variants and their shared
//! analysis settings.

use crate::circuit::Environment;
use crate::elements::Element;
use crate::error::Result;
use crate::solver::{Engine, ProbeRequest, SimulationOptions, SimulationResult};

/// Everything a netlist describes, ready to run.
///
/// The first variant is the base circuit. Each `.alter` appends a deep copy
/// of the latest variant; element lines after that edit only the copy.
#[derive(Debug, Clone)]
pub struct Session {
    variants: Vec<Environment>,
    options: SimulationOptions,
    probes: Vec<ProbeRequest>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with one empty variant.
    pub fn new() -> Self {
        Self {
            variants: vec![Environment::new()],
            options: SimulationOptions::default(),
            probes: Vec::new(),
        }
    }

    /// Parse netlist text into a session.
    pub fn from_netlist(input: &str) -> Result<Self> {
        crate::netlist::parse(input)
    }

    /// The variant new elements go into.
    pub fn current_mut(&mut self) -> &mut Environment {
        let last = self.variants.len() - 1;
        &mut self.variants[last]
    }

    /// Add an element to the current variant.
    ///
    /// In the base circuit an existing id is an error; in an altered
    /// variant it replaces the element.
    pub fn add_element(&mut self, element: Element) -> Result<()> {
        let altered = self.variants.len() > 1;
        let env = self.current_mut();
        if altered {
            env.replace(element)
        } else {
            env.register(element)
        }
    }

    /// Append a copy of the latest variant.
    pub fn alter(&mut self) {
        let copy = self.current_mut().clone();
        self.variants.push(copy);
        log::debug!("created variant {}", self.variants.len() - 1);
    }

    pub fn add_probe(&mut self, probe: ProbeRequest) {
        self.probes.push(probe);
    }

    pub fn probes(&self) -> &[ProbeRequest] {
        &self.probes
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SimulationOptions {
        &mut self.options
    }

    pub fn variants(&self) -> &[Environment] {
        &self.variants
    }

    /// Run one variant.
    pub fn run_variant(&mut self, idx: usize) -> Result<SimulationResult> {
        let mut engine = Engine::from_options(&self.options, self.probes.clone())?;
        engine.run(idx, &mut self.variants[idx])
    }

    /// Run every variant in order.
    ///
    /// A configuration error stops everything before any solve. Structural
    /// failures are reported per variant and do not affect the others.
    pub fn run_all(&mut self) -> Result<Vec<Result<SimulationResult>>> {
        let mut engine = Engine::from_options(&self.options, self.probes.clone())?;

        Ok(self
            .variants
            .iter_mut()
            .enumerate()
            .map(|(idx, env)| {
                let result = engine.run(idx, env);
                if let Err(err) = &result {
                    log::warn!("variant {} failed: {}", idx, err);
                }
                result
            })
            .collect())
    }
}
