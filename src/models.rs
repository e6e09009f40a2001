use serde::{Deserialize, Serialize};

/// Number of features fed to the classifier, in `FEATURE_NAMES` order.
pub const FEATURE_COUNT: usize = 3;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["hours_studied", "sleep_hours", "mood_score"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingRecord {
    pub hours_studied: f64,
    pub sleep_hours: f64,
    pub mood_score: u8,
    pub stress_level: u8,
}

impl TrainingRecord {
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [self.hours_studied, self.sleep_hours, f64::from(self.mood_score)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    Sad,
    #[default]
    Neutral,
    Happy,
}

impl Mood {
    pub fn score(self) -> u8 {
        match self {
            Mood::Sad => 1,
            Mood::Neutral => 2,
            Mood::Happy => 3,
        }
    }
}

/// Case-insensitive; anything unrecognised is treated as neutral.
pub fn parse_mood(raw: &str) -> Mood {
    if raw.eq_ignore_ascii_case("sad") {
        Mood::Sad
    } else if raw.eq_ignore_ascii_case("happy") {
        Mood::Happy
    } else {
        Mood::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionInput {
    pub hours_studied: f64,
    pub sleep_hours: f64,
    #[serde(default)]
    pub mood: Option<String>,
}

impl PredictionInput {
    pub fn mood(&self) -> Mood {
        self.mood.as_deref().map(parse_mood).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Drivers {
    pub hours_studied: f64,
    pub sleep_hours: f64,
    pub mood_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutput {
    pub stress_level: u8,
    pub label: String,
    pub emoji: String,
    pub confidence: f64,
    pub drivers: Drivers,
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub samples: usize,
    pub class_counts: [usize; 3],
    pub depth: usize,
    /// Normalised, in `FEATURE_NAMES` order.
    pub feature_importances: Vec<f64>,
    pub training_accuracy: f64,
}
