//! Error types for objective construction, lookup and batch evaluation.

/// Objective construction failure.
///
/// Construction either succeeds with a fully initialized objective or fails
/// with one of these; there is no partially built state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjectiveError {
    /// The configuration's output count does not match the objective family.
    #[error("{objective} requires {expected} output(s), config has {got}")]
    ParamMismatch {
        objective: &'static str,
        expected: usize,
        got: usize,
    },

    /// Differential privacy was requested for an objective not proven safe under it.
    #[error("{objective} is not supported under differential privacy")]
    NonPrivate { objective: &'static str },

    /// A hyperparameter is outside its valid domain.
    #[error("{objective}: {name} {reason}, got {value}")]
    InvalidParameter {
        objective: &'static str,
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Failure to resolve an objective string into an instance.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown objective: {0:?}")]
    UnknownObjective(String),

    #[error("objective {objective} has no parameter {name:?}")]
    UnknownParameter {
        objective: &'static str,
        name: String,
    },

    /// The registration declares no parameter the constructor needs.
    #[error("objective {objective} declares no parameter {name:?}")]
    MissingParameter {
        objective: &'static str,
        name: &'static str,
    },

    #[error("parameter {0:?} given more than once")]
    DuplicateParameter(String),

    #[error("malformed parameter: {0:?}")]
    MalformedParameter(String),

    #[error(transparent)]
    Objective(#[from] ObjectiveError),
}

/// Batch evaluation failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("invalid target {value} at row {row}")]
    InvalidTarget { row: usize, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_objective() {
        let err = ObjectiveError::ParamMismatch {
            objective: "negative_binomial",
            expected: 1,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "negative_binomial requires 1 output(s), config has 3"
        );

        let err = ObjectiveError::NonPrivate {
            objective: "negative_binomial",
        };
        assert!(err.to_string().contains("differential privacy"));
    }

    #[test]
    fn registry_wraps_construction_errors() {
        let inner = ObjectiveError::NonPrivate { objective: "x" };
        let err: RegistryError = inner.clone().into();
        assert_eq!(err, RegistryError::Objective(inner.clone()));
        assert_eq!(err.to_string(), inner.to_string());
    }
}
