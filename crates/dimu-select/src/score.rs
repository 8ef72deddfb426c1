//! Classifier-score collaborator.
//!
//! Selection stage 3 may cut on a scalar discriminant computed from
//! engineered event features. The model behind that scalar is external
//! to this pipeline; here it is a trait with two configurable stand-in
//! implementations, invoked exactly once per candidate.

use dimu_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::state::EventState;

/// Scalar discriminant over a finalized event state. Pure: no side
/// effects visible to the pipeline.
pub trait ScoreModel: Send {
    /// Compute the score for one candidate state.
    fn score(&self, state: &EventState) -> f64;

    /// Model name for logs and summaries.
    fn name(&self) -> &str;
}

/// Declarative score-model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScoreSpec {
    /// Fixed score for every candidate.
    Constant {
        /// The score value.
        value: f64,
    },
    /// Weighted sum of named features plus a bias term.
    Linear {
        /// Feature name → weight.
        weights: Vec<(String, f64)>,
        /// Additive bias.
        #[serde(default)]
        bias: f64,
    },
}

impl Default for ScoreSpec {
    fn default() -> Self {
        ScoreSpec::Constant { value: 0.0 }
    }
}

impl ScoreSpec {
    /// Build the model this spec describes. Rejects `score` as an
    /// input feature, which would be circular.
    pub fn build(&self) -> Result<Box<dyn ScoreModel>> {
        match self {
            ScoreSpec::Constant { value } => Ok(Box::new(ConstantScore { value: *value })),
            ScoreSpec::Linear { weights, bias } => {
                if weights.iter().any(|(name, _)| name == "score") {
                    return Err(Error::Config(
                        "linear score model cannot take 'score' as an input feature".into(),
                    ));
                }
                Ok(Box::new(LinearScore { weights: weights.clone(), bias: *bias }))
            }
        }
    }
}

struct ConstantScore {
    value: f64,
}

impl ScoreModel for ConstantScore {
    fn score(&self, _state: &EventState) -> f64 {
        self.value
    }

    fn name(&self) -> &str {
        "constant"
    }
}

struct LinearScore {
    weights: Vec<(String, f64)>,
    bias: f64,
}

impl ScoreModel for LinearScore {
    fn score(&self, state: &EventState) -> f64 {
        let mut total = self.bias;
        for (feature, weight) in &self.weights {
            total += weight * state.feature(feature).unwrap_or(0.0);
        }
        total
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::state;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_score() {
        let model = ScoreSpec::Constant { value: 0.5 }.build().unwrap();
        let s = state("A", 125.0, 3, None);
        assert_relative_eq!(model.score(&s), 0.5);
    }

    #[test]
    fn test_linear_score() {
        let spec = ScoreSpec::Linear {
            weights: vec![("n_jets".into(), 0.1), ("dimu_mass".into(), 0.01)],
            bias: -1.0,
        };
        let model = spec.build().unwrap();
        let s = state("A", 125.0, 2, None);
        assert_relative_eq!(model.score(&s), -1.0 + 0.2 + 1.25, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_score_rejects_score_input() {
        let spec = ScoreSpec::Linear { weights: vec![("score".into(), 1.0)], bias: 0.0 };
        assert!(spec.build().is_err());
    }

    #[test]
    fn test_score_spec_json() {
        let spec: ScoreSpec =
            serde_json::from_str(r#"{"type": "linear", "weights": [["n_jets", 0.3]]}"#).unwrap();
        let model = spec.build().unwrap();
        assert_eq!(model.name(), "linear");
    }
}
