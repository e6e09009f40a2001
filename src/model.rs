use thiserror::Error;

use crate::dataset;
use crate::knowledge::StressLevel;
use crate::models::{Drivers, PredictionInput, PredictionOutput, TrainingRecord, TrainingSummary};
use crate::tree::{argmax, StressTree, TrainError, TreeParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    pub samples: usize,
    pub seed: u64,
    pub tree: TreeParams,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            samples: 400,
            seed: 42,
            tree: TreeParams::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("classifier failed: {0}")]
    Classifier(String),
}

/// Trained classifier plus the summary captured while fitting it. Immutable
/// once built; share it behind an `Arc`.
#[derive(Debug)]
pub struct Predictor {
    tree: StressTree,
    summary: TrainingSummary,
}

impl Predictor {
    pub fn train(config: &ModelConfig) -> Result<Self, TrainError> {
        let records = dataset::generate(config.seed, config.samples);
        Self::fit(&records, config.tree)
    }

    pub fn fit(records: &[TrainingRecord], params: TreeParams) -> Result<Self, TrainError> {
        let (features, labels) = dataset::feature_matrix(records);
        let tree = StressTree::fit(&features, &labels, StressLevel::ALL.len(), params)?;

        let mut correct = 0usize;
        for (sample, &label) in features.iter().zip(labels.iter()) {
            let predicted = tree
                .predict(sample)
                .map_err(|err| TrainError::Fit(err.to_string()))?;
            if predicted == label {
                correct += 1;
            }
        }

        let summary = TrainingSummary {
            samples: records.len(),
            class_counts: dataset::class_counts(records),
            depth: tree.depth(),
            feature_importances: tree.feature_importances(),
            training_accuracy: correct as f64 / records.len() as f64,
        };

        Ok(Self { tree, summary })
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    pub fn predict(&self, input: &PredictionInput) -> Result<PredictionOutput, PredictError> {
        if !input.hours_studied.is_finite() {
            return Err(PredictError::NonFinite {
                field: "hours_studied",
            });
        }
        if !input.sleep_hours.is_finite() {
            return Err(PredictError::NonFinite {
                field: "sleep_hours",
            });
        }

        let mood_score = input.mood().score();
        let features = [input.hours_studied, input.sleep_hours, f64::from(mood_score)];
        let proba = self
            .tree
            .predict_proba(&features)
            .map_err(|err| PredictError::Classifier(err.to_string()))?;
        let class = argmax(&proba).unwrap_or(0);
        // The tree is fitted over StressLevel::ALL, so every index maps.
        let level = StressLevel::from_index(class).unwrap_or(StressLevel::Low);
        let confidence = round3(proba[class]);

        tracing::debug!(
            hours_studied = input.hours_studied,
            sleep_hours = input.sleep_hours,
            mood_score,
            class,
            confidence,
            "prediction"
        );

        Ok(PredictionOutput {
            stress_level: level as u8,
            label: level.label().to_string(),
            emoji: level.emoji().to_string(),
            confidence,
            drivers: Drivers {
                hours_studied: input.hours_studied,
                sleep_hours: input.sleep_hours,
                mood_score,
            },
            tip: level.primary_tip().to_string(),
        })
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(hours_studied: f64, sleep_hours: f64, mood: Option<&str>) -> PredictionInput {
        PredictionInput {
            hours_studied,
            sleep_hours,
            mood: mood.map(str::to_string),
        }
    }

    fn predictor() -> Predictor {
        Predictor::train(&ModelConfig::default()).unwrap()
    }

    #[test]
    fn exhausted_student_is_high_stress() {
        let output = predictor().predict(&input(8.0, 4.0, Some("sad"))).unwrap();
        assert_eq!(output.stress_level, 2);
        assert_eq!(output.label, "High");
        assert_eq!(output.emoji, "🔴");
        assert_eq!(
            output.drivers,
            Drivers {
                hours_studied: 8.0,
                sleep_hours: 4.0,
                mood_score: 1
            }
        );
        assert_eq!(output.tip, StressLevel::High.primary_tip());
    }

    #[test]
    fn rested_student_is_low_stress() {
        let output = predictor().predict(&input(2.0, 9.0, Some("happy"))).unwrap();
        assert_eq!(output.stress_level, 0);
        assert_eq!(output.label, "Low");
        assert_eq!(output.emoji, "🟢");
        assert_eq!(output.drivers.mood_score, 3);
    }

    #[test]
    fn outputs_match_static_tables() {
        let predictor = predictor();
        for hours in [0.0, 2.5, 4.5, 6.5, 9.5, 14.0, -3.0] {
            for sleep in [1.0, 3.5, 4.9, 5.1, 8.0, 12.0] {
                for mood in ["sad", "neutral", "happy", "meh"] {
                    let output = predictor.predict(&input(hours, sleep, Some(mood))).unwrap();
                    let level = StressLevel::from_index(usize::from(output.stress_level))
                        .expect("known class");
                    assert_eq!(output.label, level.label());
                    assert_eq!(output.emoji, level.emoji());
                    assert_eq!(output.tip, level.tips()[0]);
                    assert!((0.0..=1.0).contains(&output.confidence));
                    assert!((1..=3).contains(&output.drivers.mood_score));
                }
            }
        }
    }

    #[test]
    fn independent_trainings_agree() {
        let first = predictor();
        let second = predictor();
        for hours in [0.5, 3.0, 5.0, 7.0, 9.0] {
            for sleep in [3.5, 4.5, 6.0, 9.0] {
                let sample = input(hours, sleep, Some("neutral"));
                assert_eq!(first.predict(&sample), second.predict(&sample));
            }
        }
    }

    #[test]
    fn mood_variants_encode_as_neutral() {
        let predictor = predictor();
        let reference = predictor.predict(&input(5.0, 6.0, Some("neutral"))).unwrap();
        for mood in [Some("NEUTRAL"), Some(""), Some("unknown"), None] {
            let output = predictor.predict(&input(5.0, 6.0, mood)).unwrap();
            assert_eq!(output.drivers.mood_score, 2);
            assert_eq!(output, reference);
        }
    }

    #[test]
    fn mood_case_does_not_change_prediction() {
        let predictor = predictor();
        let upper = predictor.predict(&input(5.0, 6.0, Some("Happy"))).unwrap();
        let lower = predictor.predict(&input(5.0, 6.0, Some("happy"))).unwrap();
        assert_eq!(upper.drivers.mood_score, 3);
        assert_eq!(upper, lower);
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let predictor = predictor();
        assert_eq!(
            predictor.predict(&input(f64::NAN, 6.0, None)),
            Err(PredictError::NonFinite {
                field: "hours_studied"
            })
        );
        assert_eq!(
            predictor.predict(&input(1.0, f64::INFINITY, None)),
            Err(PredictError::NonFinite {
                field: "sleep_hours"
            })
        );
    }

    #[test]
    fn summary_reflects_training_run() {
        let predictor = predictor();
        let summary = predictor.summary();
        assert_eq!(summary.samples, 400);
        assert_eq!(summary.class_counts.iter().sum::<usize>(), 400);
        assert!(summary.depth >= 1 && summary.depth <= 4);
        assert_eq!(summary.feature_importances.len(), 3);
        let total: f64 = summary.feature_importances.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(summary.training_accuracy > 0.9, "{summary:?}");
    }

    #[test]
    fn degenerate_training_fails_fast() {
        let records: Vec<TrainingRecord> = (0..10)
            .map(|i| TrainingRecord {
                hours_studied: i as f64,
                sleep_hours: 8.0,
                mood_score: 2,
                stress_level: 0,
            })
            .collect();
        assert_eq!(
            Predictor::fit(&records, TreeParams::default()).err(),
            Some(TrainError::SingleClass)
        );
    }

    #[test]
    fn confidence_is_rounded_to_three_places() {
        assert_eq!(round3(0.123456), 0.123);
        assert_eq!(round3(0.9996), 1.0);
        assert_eq!(round3(2.0 / 3.0), 0.667);
    }
}
