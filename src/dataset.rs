use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::knowledge::{classify_rule, StressLevel};
use crate::models::{TrainingRecord, FEATURE_COUNT};

pub fn generate(seed: u64, count: usize) -> Vec<TrainingRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(count);

    for _ in 0..count {
        let hours_studied = rng.random_range(0.0..10.0);
        let sleep_hours = rng.random_range(3.0..10.0);
        let mood_score = rng.random_range(1..=3u8);
        let stress_level = classify_rule(hours_studied, sleep_hours) as u8;

        records.push(TrainingRecord {
            hours_studied,
            sleep_hours,
            mood_score,
            stress_level,
        });
    }

    records
}

pub fn feature_matrix(records: &[TrainingRecord]) -> (Vec<[f64; FEATURE_COUNT]>, Vec<usize>) {
    records
        .iter()
        .map(|record| (record.features(), usize::from(record.stress_level)))
        .unzip()
}

pub fn class_counts(records: &[TrainingRecord]) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for record in records {
        if let Some(level) = StressLevel::from_index(usize::from(record.stress_level)) {
            counts[level.index()] += 1;
        }
    }
    counts
}

pub fn export_csv(records: &[TrainingRecord], path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
