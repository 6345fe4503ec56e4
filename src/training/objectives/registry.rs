//! Name-based objective lookup and construction.
//!
//! Objective strings have the form `name` or `name:key=value,key=value`:
//!
//! ```
//! use boosters_objectives::training::{registry, Objective, ObjectiveConfig};
//!
//! let config = ObjectiveConfig::default();
//! let objective = registry::create::<f64>("negative_binomial:alpha=0.5", &config).unwrap();
//! assert_eq!(objective.info().name, "negative_binomial");
//! ```
//!
//! Name resolution happens once, here. The resulting [`AnyObjective`] holds
//! the concrete objective, so nothing on the per-sample path looks at strings.

use std::str::FromStr;

use super::{
    GradientHessian, NegativeBinomialLoss, Objective, ObjectiveConfig, ObjectiveInfo,
    RegistryError,
};
use crate::numeric::Numeric;

// =============================================================================
// Manifest
// =============================================================================

/// Identifies a registered objective family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveId {
    NegativeBinomial,
}

/// A named hyperparameter with its default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: f64,
}

/// Manifest entry for one objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Registration {
    pub id: ObjectiveId,
    pub info: ObjectiveInfo,
    /// Declared hyperparameters. Constructors look them up by name.
    pub params: &'static [ParamSpec],
}

impl Registration {
    /// Resolve user-supplied parameters against this entry, filling defaults.
    pub fn resolve(&self, given: &[(String, f64)]) -> Result<ResolvedParams, RegistryError> {
        for (name, _) in given {
            if !self.params.iter().any(|p| p.name == name.as_str()) {
                return Err(RegistryError::UnknownParameter {
                    objective: self.info.name,
                    name: name.clone(),
                });
            }
        }

        let values = self
            .params
            .iter()
            .map(|p| {
                let value = given
                    .iter()
                    .find(|(name, _)| name.as_str() == p.name)
                    .map_or(p.default, |&(_, value)| value);
                (p.name, value)
            })
            .collect();

        Ok(ResolvedParams {
            objective: self.info.name,
            values,
        })
    }

    /// Construct this objective on backend `T`.
    pub fn build<T: Numeric>(
        &self,
        given: &[(String, f64)],
        config: &ObjectiveConfig,
    ) -> Result<AnyObjective<T>, RegistryError> {
        let params = self.resolve(given)?;

        let objective = match self.id {
            ObjectiveId::NegativeBinomial => AnyObjective::NegativeBinomial(
                NegativeBinomialLoss::new(config, params.get("alpha")?)?,
            ),
        };

        log::debug!("resolved objective {} with params {:?}", self.info.name, params.values);
        Ok(objective)
    }
}

/// Parameter values after defaults are filled, keyed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    objective: &'static str,
    values: Vec<(&'static str, f64)>,
}

impl ResolvedParams {
    /// Value bound to `name`.
    pub fn get(&self, name: &'static str) -> Result<f64, RegistryError> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, value)| value)
            .ok_or(RegistryError::MissingParameter {
                objective: self.objective,
                name,
            })
    }
}

static REGISTRY: &[Registration] = &[Registration {
    id: ObjectiveId::NegativeBinomial,
    info: NegativeBinomialLoss::<f64>::INFO,
    params: &[ParamSpec {
        name: "alpha",
        default: 1.0,
    }],
}];

/// All registered objectives.
pub fn registered() -> &'static [Registration] {
    REGISTRY
}

/// Find a registration by name.
pub fn lookup(name: &str) -> Option<&'static Registration> {
    REGISTRY.iter().find(|r| r.info.name == name)
}

// =============================================================================
// ObjectiveSpec
// =============================================================================

/// A parsed objective string.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveSpec {
    pub name: String,
    pub params: Vec<(String, f64)>,
}

impl FromStr for ObjectiveSpec {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = match s.split_once(':') {
            Some((name, rest)) => (name.trim(), rest),
            None => (s.trim(), ""),
        };
        if name.is_empty() {
            return Err(RegistryError::UnknownObjective(s.to_string()));
        }

        let mut params: Vec<(String, f64)> = Vec::new();
        for piece in rest.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = piece
                .split_once('=')
                .ok_or_else(|| RegistryError::MalformedParameter(piece.to_string()))?;
            let key = key.trim();
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| RegistryError::MalformedParameter(piece.to_string()))?;
            if key.is_empty() {
                return Err(RegistryError::MalformedParameter(piece.to_string()));
            }
            if params.iter().any(|(k, _)| k == key) {
                return Err(RegistryError::DuplicateParameter(key.to_string()));
            }
            params.push((key.to_string(), value));
        }

        Ok(Self {
            name: name.to_string(),
            params,
        })
    }
}

impl ObjectiveSpec {
    /// Construct the objective on backend `T`.
    pub fn build<T: Numeric>(
        &self,
        config: &ObjectiveConfig,
    ) -> Result<AnyObjective<T>, RegistryError> {
        lookup(&self.name)
            .ok_or_else(|| RegistryError::UnknownObjective(self.name.clone()))?
            .build(&self.params, config)
    }
}

/// Parse `objective` and construct it on backend `T`.
pub fn create<T: Numeric>(
    objective: &str,
    config: &ObjectiveConfig,
) -> Result<AnyObjective<T>, RegistryError> {
    objective.parse::<ObjectiveSpec>()?.build(config)
}

// =============================================================================
// AnyObjective
// =============================================================================

/// Any registered objective on backend `T`.
///
/// Implements [`Objective`] by delegating to the wrapped instance.
#[derive(Debug, Clone)]
pub enum AnyObjective<T: Numeric> {
    NegativeBinomial(NegativeBinomialLoss<T>),
}

impl<T: Numeric> Objective for AnyObjective<T> {
    type Value = T;

    fn info(&self) -> ObjectiveInfo {
        match self {
            Self::NegativeBinomial(inner) => inner.info(),
        }
    }

    fn check_target(&self, target: f64) -> bool {
        match self {
            Self::NegativeBinomial(inner) => inner.check_target(target),
        }
    }

    fn link_param(&self) -> f64 {
        match self {
            Self::NegativeBinomial(inner) => inner.link_param(),
        }
    }

    fn learning_rate_adjustment_differential_privacy(&self) -> f64 {
        match self {
            Self::NegativeBinomial(inner) => inner.learning_rate_adjustment_differential_privacy(),
        }
    }

    fn learning_rate_adjustment_gradient_boosting(&self) -> f64 {
        match self {
            Self::NegativeBinomial(inner) => inner.learning_rate_adjustment_gradient_boosting(),
        }
    }

    fn learning_rate_adjustment_hessian_boosting(&self) -> f64 {
        match self {
            Self::NegativeBinomial(inner) => inner.learning_rate_adjustment_hessian_boosting(),
        }
    }

    fn gain_adjustment_gradient_boosting(&self) -> f64 {
        match self {
            Self::NegativeBinomial(inner) => inner.gain_adjustment_gradient_boosting(),
        }
    }

    fn gain_adjustment_hessian_boosting(&self) -> f64 {
        match self {
            Self::NegativeBinomial(inner) => inner.gain_adjustment_hessian_boosting(),
        }
    }

    fn gradient_constant(&self) -> f64 {
        match self {
            Self::NegativeBinomial(inner) => inner.gradient_constant(),
        }
    }

    fn hessian_constant(&self) -> f64 {
        match self {
            Self::NegativeBinomial(inner) => inner.hessian_constant(),
        }
    }

    fn finish_metric(&self, metric_sum: f64) -> f64 {
        match self {
            Self::NegativeBinomial(inner) => inner.finish_metric(metric_sum),
        }
    }

    #[inline]
    fn calc_metric(&self, score: T, target: T) -> T {
        match self {
            Self::NegativeBinomial(inner) => inner.calc_metric(score, target),
        }
    }

    #[inline]
    fn calc_gradient(&self, score: T, target: T) -> T {
        match self {
            Self::NegativeBinomial(inner) => inner.calc_gradient(score, target),
        }
    }

    #[inline]
    fn calc_gradient_hessian(&self, score: T, target: T) -> GradientHessian<T> {
        match self {
            Self::NegativeBinomial(inner) => inner.calc_gradient_hessian(score, target),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::ObjectiveError;

    #[test]
    fn parse_bare_name() {
        let spec: ObjectiveSpec = "negative_binomial".parse().unwrap();
        assert_eq!(spec.name, "negative_binomial");
        assert!(spec.params.is_empty());
    }

    #[test]
    fn parse_params_with_whitespace() {
        let spec: ObjectiveSpec = " negative_binomial : alpha = 0.25 ,".parse().unwrap();
        assert_eq!(spec.name, "negative_binomial");
        assert_eq!(spec.params, vec![("alpha".to_string(), 0.25)]);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "negative_binomial:alpha".parse::<ObjectiveSpec>(),
            Err(RegistryError::MalformedParameter("alpha".into()))
        );
        assert_eq!(
            "negative_binomial:alpha=abc".parse::<ObjectiveSpec>(),
            Err(RegistryError::MalformedParameter("alpha=abc".into()))
        );
        assert_eq!(
            "negative_binomial:alpha=1,alpha=2".parse::<ObjectiveSpec>(),
            Err(RegistryError::DuplicateParameter("alpha".into()))
        );
        assert!(matches!(
            ":alpha=1".parse::<ObjectiveSpec>(),
            Err(RegistryError::UnknownObjective(_))
        ));
    }

    #[test]
    fn resolve_fills_defaults() {
        let registration = lookup("negative_binomial").unwrap();
        assert_eq!(registration.resolve(&[]).unwrap().get("alpha"), Ok(1.0));
        assert_eq!(
            registration
                .resolve(&[("alpha".into(), 0.3)])
                .unwrap()
                .get("alpha"),
            Ok(0.3)
        );
    }

    #[test]
    fn params_bind_by_name_not_position() {
        let registration = Registration {
            params: &[
                ParamSpec {
                    name: "shape",
                    default: 9.0,
                },
                ParamSpec {
                    name: "alpha",
                    default: 1.0,
                },
            ],
            ..*lookup("negative_binomial").unwrap()
        };
        let objective = registration
            .build::<f64>(&[("alpha".into(), 0.25)], &ObjectiveConfig::default())
            .unwrap();
        let AnyObjective::NegativeBinomial(inner) = &objective;
        assert_eq!(inner.alpha(), 0.25);
    }

    #[test]
    fn undeclared_constructor_param_is_reported() {
        let registration = Registration {
            params: &[ParamSpec {
                name: "shape",
                default: 9.0,
            }],
            ..*lookup("negative_binomial").unwrap()
        };
        assert_eq!(
            registration
                .build::<f64>(&[], &ObjectiveConfig::default())
                .unwrap_err(),
            RegistryError::MissingParameter {
                objective: "negative_binomial",
                name: "alpha",
            }
        );
    }

    #[test]
    fn manifest_lists_negative_binomial() {
        let names: Vec<_> = registered().iter().map(|r| r.info.name).collect();
        assert_eq!(names, vec!["negative_binomial"]);
        assert!(!registered()[0].info.dp_eligible);
    }

    #[test]
    fn create_uses_alpha() {
        let objective = create::<f64>("negative_binomial:alpha=0.5", &ObjectiveConfig::default())
            .unwrap();
        let AnyObjective::NegativeBinomial(inner) = &objective;
        assert_eq!(inner.alpha(), 0.5);
        assert_eq!(objective.calc_gradient_hessian(0.0, 1.0).hessian, 1.5);
    }

    #[test]
    fn create_rejects_unknown() {
        let config = ObjectiveConfig::default();
        assert_eq!(
            create::<f64>("tweedie", &config).unwrap_err(),
            RegistryError::UnknownObjective("tweedie".into())
        );
        assert!(matches!(
            create::<f64>("negative_binomial:beta=1", &config),
            Err(RegistryError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn create_passes_construction_errors_through() {
        let config = ObjectiveConfig::builder().differential_privacy(true).build();
        assert!(matches!(
            create::<f64>("negative_binomial", &config),
            Err(RegistryError::Objective(ObjectiveError::NonPrivate { .. }))
        ));
    }
}
