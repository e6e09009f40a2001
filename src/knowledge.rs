#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StressLevel {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl StressLevel {
    pub const ALL: [StressLevel; 3] = [StressLevel::Low, StressLevel::Medium, StressLevel::High];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            StressLevel::Low => "Low",
            StressLevel::Medium => "Medium",
            StressLevel::High => "High",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            StressLevel::Low => "🟢",
            StressLevel::Medium => "🟡",
            StressLevel::High => "🔴",
        }
    }

    /// Never empty. Only the first entry is surfaced today.
    pub fn tips(self) -> &'static [&'static str] {
        match self {
            StressLevel::Low => &["Nice balance! Keep a consistent sleep schedule."],
            StressLevel::Medium => &["Aim for 7–8 hours of sleep tonight."],
            StressLevel::High => &["Take a 5-minute breathing break and prioritize sleep."],
        }
    }

    pub fn primary_tip(self) -> &'static str {
        self.tips()[0]
    }
}

/// Labelling rule for the synthetic training table.
pub fn classify_rule(hours_studied: f64, sleep_hours: f64) -> StressLevel {
    if sleep_hours < 5.0 && hours_studied > 6.0 {
        StressLevel::High
    } else if sleep_hours >= 5.0 && hours_studied > 4.0 {
        StressLevel::Medium
    } else {
        StressLevel::Low
    }
}
