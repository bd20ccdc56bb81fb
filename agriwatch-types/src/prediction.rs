//! Leaf-disease prediction result returned by the classification service.

use std::fmt;

/// The four labels the classification service distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PredictionLabel {
    Healthy,
    MultipleDiseases,
    /// Leaf rust.
    Rust,
    Scab,
}

impl PredictionLabel {
    /// All labels, in the order the service reports probabilities.
    pub const ALL: [PredictionLabel; 4] = [
        PredictionLabel::Healthy,
        PredictionLabel::MultipleDiseases,
        PredictionLabel::Rust,
        PredictionLabel::Scab,
    ];

    /// The wire spelling of this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Healthy => "healthy",
            PredictionLabel::MultipleDiseases => "multiple_diseases",
            PredictionLabel::Rust => "rust",
            PredictionLabel::Scab => "scab",
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-label probabilities, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Probabilities {
    pub healthy: f64,
    pub multiple_diseases: f64,
    pub rust: f64,
    pub scab: f64,
}

impl Probabilities {
    /// Probability for a given label.
    pub fn get(&self, label: PredictionLabel) -> f64 {
        match label {
            PredictionLabel::Healthy => self.healthy,
            PredictionLabel::MultipleDiseases => self.multiple_diseases,
            PredictionLabel::Rust => self.rust,
            PredictionLabel::Scab => self.scab,
        }
    }

    /// The label with the highest probability.
    pub fn top(&self) -> PredictionLabel {
        PredictionLabel::ALL
            .into_iter()
            .reduce(|best, label| if self.get(label) > self.get(best) { label } else { best })
            .unwrap_or(PredictionLabel::Healthy)
    }
}

/// A completed classification result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prediction {
    /// The winning label.
    pub predict: PredictionLabel,

    /// Per-label probabilities backing the verdict.
    pub probs: Probabilities,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_wire_spelling() {
        assert_eq!(PredictionLabel::MultipleDiseases.as_str(), "multiple_diseases");
        assert_eq!(PredictionLabel::Rust.to_string(), "rust");
    }

    #[test]
    fn probabilities_top() {
        let probs = Probabilities {
            healthy: 0.1,
            multiple_diseases: 0.05,
            rust: 0.8,
            scab: 0.05,
        };
        assert_eq!(probs.top(), PredictionLabel::Rust);
        assert_eq!(probs.get(PredictionLabel::Healthy), 0.1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_prediction() {
        let json = r#"{
            "predict": "scab",
            "probs": {
                "healthy": 0.02,
                "multiple_diseases": 0.01,
                "rust": 0.03,
                "scab": 0.94
            }
        }"#;

        let prediction: Prediction = serde_json::from_str(json).unwrap();
        assert_eq!(prediction.predict, PredictionLabel::Scab);
        assert_eq!(prediction.probs.scab, 0.94);
        assert_eq!(prediction.probs.top(), PredictionLabel::Scab);
    }
}
