//! The six-step curriculum table

use serde::{Serialize, Serializer};
use std::fmt;

/// Name reported for step numbers outside the curriculum
pub const UNKNOWN_STEP_NAME: &str = "Unknown Step";

/// One stage of the club registration form curriculum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    BasicForm,
    Styling,
    FormProcessing,
    Validation,
    ArrayStorage,
    EnhancedFeatures,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::BasicForm,
        Step::Styling,
        Step::FormProcessing,
        Step::Validation,
        Step::ArrayStorage,
        Step::EnhancedFeatures,
    ];

    pub const TOTAL: u32 = Self::ALL.len() as u32;

    pub fn number(self) -> u32 {
        match self {
            Step::BasicForm => 1,
            Step::Styling => 2,
            Step::FormProcessing => 3,
            Step::Validation => 4,
            Step::ArrayStorage => 5,
            Step::EnhancedFeatures => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::BasicForm => "Basic HTML Form Structure",
            Step::Styling => "CSS Styling and Layout",
            Step::FormProcessing => "PHP Form Processing",
            Step::Validation => "Data Validation",
            Step::ArrayStorage => "Array Storage and Display",
            Step::EnhancedFeatures => "Enhanced Features",
        }
    }

    /// The git tag a student creates once this step passes
    pub fn tag(self) -> String {
        format!("step-{}", self.number())
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.number() == number)
    }

    /// Clamps any number into the curriculum range
    pub fn clamped(number: u32) -> Self {
        let n = number.clamp(1, Self::TOTAL);
        Self::from_number(n).unwrap_or(Step::BasicForm)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.number(), self.name())
    }
}

impl Serialize for Step {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.number())
    }
}
