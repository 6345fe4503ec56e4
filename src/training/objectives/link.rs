//! Link functions between raw boosting scores and the target's natural scale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Link function identifier.
///
/// Objectives declare their link once in their [`ObjectiveInfo`]; engines use
/// it to turn raw scores into predictions.
///
/// [`ObjectiveInfo`]: super::ObjectiveInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkFunction {
    /// Supplied by the caller; no built-in inverse.
    Custom,
    Identity,
    Log,
    Logit,
    Cloglog,
    Loglog,
    Inverse,
    InverseSquare,
    Sqrt,
    /// `score = prediction^p`, with `p` taken from the objective's link parameter.
    Power,
}

impl LinkFunction {
    /// All link functions, in declaration order.
    pub const ALL: [LinkFunction; 10] = [
        Self::Custom,
        Self::Identity,
        Self::Log,
        Self::Logit,
        Self::Cloglog,
        Self::Loglog,
        Self::Inverse,
        Self::InverseSquare,
        Self::Sqrt,
        Self::Power,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Identity => "identity",
            Self::Log => "log",
            Self::Logit => "logit",
            Self::Cloglog => "cloglog",
            Self::Loglog => "loglog",
            Self::Inverse => "inverse",
            Self::InverseSquare => "inverse_square",
            Self::Sqrt => "sqrt",
            Self::Power => "power",
        }
    }

    /// Whether this link consumes the objective's link parameter.
    #[inline]
    pub fn uses_param(self) -> bool {
        matches!(self, Self::Power)
    }

    /// Map a raw score to the natural scale.
    ///
    /// `link_param` is ignored unless [`uses_param`](Self::uses_param).
    /// Returns `None` for [`LinkFunction::Custom`].
    #[inline]
    pub fn inverse(self, score: f64, link_param: f64) -> Option<f64> {
        let value = match self {
            Self::Custom => return None,
            Self::Identity => score,
            Self::Log => score.exp(),
            Self::Logit => 1.0 / (1.0 + (-score).exp()),
            Self::Cloglog => 1.0 - (-score.exp()).exp(),
            Self::Loglog => (-(-score).exp()).exp(),
            Self::Inverse => 1.0 / score,
            Self::InverseSquare => 1.0 / score.sqrt(),
            Self::Sqrt => score * score,
            Self::Power => score.powf(1.0 / link_param),
        };
        Some(value)
    }
}

impl fmt::Display for LinkFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown link name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown link function: {0:?}")]
pub struct ParseLinkError(pub String);

impl FromStr for LinkFunction {
    type Err = ParseLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|link| link.name() == s)
            .ok_or_else(|| ParseLinkError(s.to_string()))
    }
}
