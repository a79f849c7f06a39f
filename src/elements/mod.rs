//! Element models for circuit simulation.
//!
//! This module provides models for all supported circuit elements:
//! - Linear: Resistor, Capacitor
//! - Independent sources: DC, Pulse, PWL and Sinusoidal voltage sources
//! - Controlled sources: VCCS
//!
//! Each element produces local [`Stamp`]s in its own terminal order for
//! DC, AC and transient analysis, and may carry state that is refreshed by
//! [`Element::update_state`] after every accepted solve.

mod controlled;
mod linear;
mod sources;
mod stamp;

pub use controlled::Vccs;
pub use linear::{Capacitor, Resistor};
pub use sources::{DcSource, PulseParams, PulseSource, PwlSource, SinParams, SinSource};
pub use stamp::{AcStamp, Stamp, StampValue};

use crate::circuit::{branch_node_name, NodeValues};
use crate::error::{Result, SpiceletError};
use crate::netlist::{parse_element_line, ElementKind, ElementLine};

/// A circuit element.
#[derive(Debug, Clone)]
pub enum Element {
    Resistor(Resistor),
    Capacitor(Capacitor),
    DcSource(DcSource),
    PulseSource(PulseSource),
    PwlSource(PwlSource),
    SinSource(SinSource),
    Vccs(Vccs),
}

impl Element {
    /// Build an element from one comment-free netlist line.
    pub fn from_text(text: &str, line: usize) -> Result<Self> {
        let parsed = parse_element_line(text, line)?;
        Self::from_line(parsed, text, line)
    }

    /// Build an element from an already split line.
    pub fn from_line(parsed: ElementLine, text: &str, line: usize) -> Result<Self> {
        let ElementLine {
            kind,
            id,
            nodes,
            args,
        } = parsed;
        let invalid = |message: &str| SpiceletError::invalid_element(line, &id, text, message);

        let element = match kind {
            ElementKind::Resistor => {
                let resistance = args[0];
                if resistance == 0.0 || !resistance.is_finite() {
                    return Err(invalid("resistance must be finite and non-zero"));
                }
                Element::Resistor(Resistor::new(id.clone(), two(nodes), resistance))
            }

            ElementKind::Capacitor => {
                Element::Capacitor(Capacitor::new(id.clone(), two(nodes), args[0]))
            }

            ElementKind::DcSource => {
                let terminals = with_branch(&id, nodes);
                Element::DcSource(DcSource::new(id.clone(), terminals, args[0]))
            }

            ElementKind::PulseSource => {
                let params = PulseParams {
                    init_v: args[0],
                    final_v: args[1],
                    init_delay: args[2],
                    rise_time: args[3],
                    fall_time: args[4],
                    pulse_width: args[5],
                    period: args[6],
                };
                if params.rise_time < 0.0 || params.fall_time < 0.0 || params.pulse_width < 0.0 {
                    return Err(invalid("pulse rise, fall and width must not be negative"));
                }
                let terminals = with_branch(&id, nodes);
                Element::PulseSource(PulseSource::new(id.clone(), terminals, params))
            }

            ElementKind::PwlSource => {
                let points: Vec<(f64, f64)> =
                    args.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
                if points.windows(2).any(|w| w[1].0 < w[0].0) {
                    return Err(invalid("PWL breakpoint times must be non-decreasing"));
                }
                let terminals = with_branch(&id, nodes);
                Element::PwlSource(PwlSource::new(id.clone(), terminals, points))
            }

            ElementKind::SinSource => {
                let params = SinParams {
                    offset: args[0],
                    amplitude: args[1],
                    frequency: args[2],
                    init_delay: args[3],
                    damping: args[4],
                    phase: args[5],
                };
                let terminals = with_branch(&id, nodes);
                Element::SinSource(SinSource::new(id.clone(), terminals, params))
            }

            ElementKind::Vccs => {
                let [a, b, c, d]: [String; 4] = nodes
                    .try_into()
                    .map_err(|_| invalid("expected four terminals"))?;
                Element::Vccs(Vccs::new(id.clone(), [a, b, c, d], args[0]))
            }
        };

        Ok(element)
    }

    /// Get the element id.
    pub fn id(&self) -> &str {
        match self {
            Element::Resistor(r) => &r.id,
            Element::Capacitor(c) => &c.id,
            Element::DcSource(v) => &v.id,
            Element::PulseSource(v) => &v.id,
            Element::PwlSource(v) => &v.id,
            Element::SinSource(v) => &v.id,
            Element::Vccs(g) => &g.id,
        }
    }

    /// Terminal node names, in stamp order. Voltage sources end with their
    /// branch-current node.
    pub fn terminals(&self) -> &[String] {
        match self {
            Element::Resistor(r) => &r.nodes[..],
            Element::Capacitor(c) => &c.nodes[..],
            Element::DcSource(v) => &v.nodes[..],
            Element::PulseSource(v) => &v.nodes[..],
            Element::PwlSource(v) => &v.nodes[..],
            Element::SinSource(v) => &v.nodes[..],
            Element::Vccs(g) => &g.nodes[..],
        }
    }

    /// DC stamp: capacitors open, sources at their t = 0 level.
    pub fn stamp_dc(&self) -> Stamp {
        match self {
            Element::Resistor(r) => r.stamp(),
            Element::Capacitor(c) => c.stamp_dc(),
            Element::DcSource(v) => v.stamp(),
            Element::PulseSource(v) => v.stamp_dc(),
            Element::PwlSource(v) => v.stamp_dc(),
            Element::SinSource(v) => v.stamp_dc(),
            Element::Vccs(g) => g.stamp(),
        }
    }

    /// Frequency-domain stamp at angular frequency `omega`.
    pub fn stamp_ac(&self, omega: f64) -> AcStamp {
        match self {
            Element::Resistor(r) => r.stamp_ac(),
            Element::Capacitor(c) => c.stamp_ac(omega),
            Element::DcSource(v) => v.stamp_ac(),
            Element::PulseSource(v) => v.stamp_ac(),
            Element::PwlSource(v) => v.stamp_ac(),
            Element::SinSource(v) => v.stamp_ac(),
            Element::Vccs(g) => g.stamp_ac(),
        }
    }

    /// Transient stamp for a step of size `h` past the last accepted time.
    /// Time-varying sources use their value at the last accepted time.
    pub fn stamp_trans(&self, h: f64) -> Stamp {
        match self {
            Element::Resistor(r) => r.stamp(),
            Element::Capacitor(c) => c.stamp_trans(h),
            Element::DcSource(v) => v.stamp(),
            Element::PulseSource(v) => v.stamp_trans(),
            Element::PwlSource(v) => v.stamp_trans(),
            Element::SinSource(v) => v.stamp_trans(),
            Element::Vccs(g) => g.stamp(),
        }
    }

    /// Refresh element state from an accepted solution at `time`.
    pub fn update_state(&mut self, time: f64, values: &NodeValues<'_>) {
        match self {
            Element::Capacitor(c) => c.update_state(values),
            Element::PulseSource(v) => v.update_state(time),
            Element::PwlSource(v) => v.update_state(time),
            Element::SinSource(v) => v.update_state(time),
            Element::Resistor(_) | Element::DcSource(_) | Element::Vccs(_) => {}
        }
    }
}

fn two(nodes: Vec<String>) -> [String; 2] {
    let mut it = nodes.into_iter();
    [
        it.next().unwrap_or_default(),
        it.next().unwrap_or_default(),
    ]
}

fn with_branch(id: &str, nodes: Vec<String>) -> [String; 3] {
    let [pos, neg] = two(nodes);
    [pos, neg, branch_node_name(id)]
}
