/**
This module holds the result of a single evaluation and the lines it is logged as.
*/
use crate::metrics::TokenCounts;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;

/// Result of evaluating one dataset. Only `accuracy` is recorded by the evaluator; the report itself
/// is handed back to the caller.
///
/// # Example
///
/// ```rust
/// use tokacc::{AccuracyReport, TokenCounts};
///
/// let counts = TokenCounts { total: 4, correct: 3, total_oov: 2, correct_oov: 1 };
/// let report = AccuracyReport::new("dev", 0.75, 0.5, counts);
///
/// assert_eq!(report.to_string(), "dev accuracy=0.75\ndev OOV accuracy=0.5\n");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccuracyReport {
    /// Description of the evaluated dataset, e.g. "train" or "test"
    pub description: String,
    /// Fraction of tokens correctly labeled
    #[serde(serialize_with = "serialize_nan_as_null")]
    #[serde(deserialize_with = "deserialize_null_as_nan")]
    pub accuracy: f64,
    /// Fraction of out-of-vocabulary tokens correctly labeled
    #[serde(serialize_with = "serialize_nan_as_null")]
    #[serde(deserialize_with = "deserialize_null_as_nan")]
    pub oov_accuracy: f64,
    /// Counts the accuracies were computed from
    pub counts: TokenCounts,
}

// JSON has no NaN: an undefined accuracy is written as `null` and read back as `NaN`.
fn serialize_nan_as_null<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_nan() {
        serializer.serialize_none()
    } else {
        serializer.serialize_some(value)
    }
}

fn deserialize_null_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl AccuracyReport {
    pub fn new<S: Into<String>>(
        description: S,
        accuracy: f64,
        oov_accuracy: f64,
        counts: TokenCounts,
    ) -> Self {
        Self {
            description: description.into(),
            accuracy,
            oov_accuracy,
            counts,
        }
    }

    pub fn accuracy_line(&self) -> String {
        format!("{} accuracy={}", self.description, self.accuracy)
    }

    pub fn oov_accuracy_line(&self) -> String {
        format!("{} OOV accuracy={}", self.description, self.oov_accuracy)
    }

    /// Writes both accuracy lines to the `log` facade at the info level.
    pub fn log(&self) {
        log::info!("{}", self.accuracy_line());
        log::info!("{}", self.oov_accuracy_line());
    }
}

/// The report is displayed as the two lines it is logged as.
impl Display for AccuracyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.accuracy_line())?;
        writeln!(f, "{}", self.oov_accuracy_line())
    }
}
