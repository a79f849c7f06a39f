//! Controlled sources.

use num_complex::Complex64;

use super::stamp::{AcStamp, Stamp, StampValue};

/// A voltage-controlled current source.
///
/// Drives `I = g * (V[ctrl+] - V[ctrl-])` from `out+` through the source to
/// `out-`. Terminal order follows SPICE: `[out+, out-, ctrl+, ctrl-]`.
#[derive(Debug, Clone)]
pub struct Vccs {
    pub id: String,
    pub nodes: [String; 4],
    pub transconductance: f64,
}

impl Vccs {
    pub fn new(id: String, nodes: [String; 4], transconductance: f64) -> Self {
        Self {
            id,
            nodes,
            transconductance,
        }
    }

    fn build<T: StampValue>(g: T) -> Stamp<T> {
        let mut stamp = Stamp::zeros(4);
        stamp.add(0, 2, g);
        stamp.add(0, 3, -g);
        stamp.add(1, 2, -g);
        stamp.add(1, 3, g);
        stamp
    }

    /// Stamp shared by DC and transient analysis.
    pub fn stamp(&self) -> Stamp {
        Self::build(self.transconductance)
    }

    pub fn stamp_ac(&self) -> AcStamp {
        Self::build(Complex64::from(self.transconductance))
    }
}
