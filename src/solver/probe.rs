//! Output probes: `V(node)` and `I(element)`.

use std::fmt;
use std::str::FromStr;

use crate::circuit::{branch_node_name, Environment, NodeId};
use crate::error::SpiceletError;

/// A requested output quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeRequest {
    /// Voltage of a node.
    Voltage(String),
    /// Branch current of a voltage source.
    Current(String),
}

impl ProbeRequest {
    /// Name of the node that carries the probed value.
    pub fn node_name(&self) -> String {
        match self {
            ProbeRequest::Voltage(node) => node.clone(),
            ProbeRequest::Current(element) => branch_node_name(element),
        }
    }

    /// Column label, e.g. `V(out)`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProbeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeRequest::Voltage(node) => write!(f, "V({node})"),
            ProbeRequest::Current(element) => write!(f, "I({element})"),
        }
    }
}

impl FromStr for ProbeRequest {
    type Err = SpiceletError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || SpiceletError::InvalidProbe {
            text: text.to_string(),
        };
        let trimmed = text.trim();

        let mut chars = trimmed.chars();
        let tag = chars.next().ok_or_else(invalid)?;
        let inner = chars
            .as_str()
            .trim_start()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.contains(char::is_whitespace))
            .ok_or_else(invalid)?;
        let inner = crate::netlist::fold_ground(inner);

        match tag {
            'V' | 'v' => Ok(ProbeRequest::Voltage(inner)),
            'I' | 'i' => Ok(ProbeRequest::Current(inner)),
            _ => Err(invalid()),
        }
    }
}

/// A probe bound to a node of one environment variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProbe {
    pub label: String,
    pub node: NodeId,
}

/// Bind probes to nodes of `env`, dropping the ones that do not resolve.
pub fn resolve_probes(requests: &[ProbeRequest], env: &Environment) -> Vec<ResolvedProbe> {
    requests
        .iter()
        .filter_map(|request| match env.node_index(&request.node_name()) {
            Some(node) => Some(ResolvedProbe {
                label: request.label(),
                node,
            }),
            None => {
                log::warn!("dropping probe {}: no such node in the circuit", request);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Element;

    #[test]
    fn test_parse_probe() {
        assert_eq!(
            "V(out)".parse::<ProbeRequest>().unwrap(),
            ProbeRequest::Voltage("out".to_string())
        );
        assert_eq!(
            "i( V1 )".parse::<ProbeRequest>().unwrap(),
            ProbeRequest::Current("V1".to_string())
        );
        assert_eq!(
            "v(gnd)".parse::<ProbeRequest>().unwrap(),
            ProbeRequest::Voltage("0".to_string())
        );
    }

    #[test]
    fn test_parse_probe_rejects_malformed() {
        for text in ["", "X(a)", "V(a", "Va)", "V()", "V(a b)"] {
            assert!(matches!(
                text.parse::<ProbeRequest>(),
                Err(SpiceletError::InvalidProbe { .. })
            ));
        }
    }

    #[test]
    fn test_resolve_drops_unknown_nodes() {
        let mut env = Environment::new();
        env.register(Element::from_text("V1 a 0 5", 1).unwrap()).unwrap();

        let requests = vec![
            ProbeRequest::Voltage("a".to_string()),
            ProbeRequest::Voltage("missing".to_string()),
            ProbeRequest::Current("V1".to_string()),
            ProbeRequest::Current("R9".to_string()),
        ];
        let resolved = resolve_probes(&requests, &env);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].label, "V(a)");
        assert_eq!(resolved[1].label, "I(V1)");
        assert_eq!(resolved[1].node, NodeId(2));
    }
}
