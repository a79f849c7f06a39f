//! Environment validation.

use crate::error::{Result, SpiceletError};

use super::Environment;

/// Check that an environment variant has something to solve.
///
/// Floating nodes and source loops are left to the factorization, which
/// reports them as a singular matrix.
pub fn validate_environment(env: &Environment, variant: usize) -> Result<()> {
    if env.unknown_count() == 0 {
        return Err(SpiceletError::EmptyCircuit { variant });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_environment_is_structural_error() {
        let err = validate_environment(&Environment::new(), 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert!(matches!(err, SpiceletError::EmptyCircuit { variant: 2 }));
    }
}
