/*
 * This module contains the `EvaluatorConfig` struct and its builder. The defaults reproduce the
 * plain behavior of the evaluator: undefined ratios are `NaN`, the vocabulary is seeded from the
 * first dataset evaluated and every training iteration is evaluated.
*/
use crate::metrics::ZeroDivision;
use std::fmt::Display;

/// Which dataset seeds the vocabulary on the first call to `evaluate`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum VocabularySeed {
    /// Whatever dataset the first `evaluate` call receives, even a test set.
    #[default]
    FirstEvaluated,
    /// The registered eval set with this description, whatever dataset is evaluated first.
    Registered(String),
}

impl Display for VocabularySeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstEvaluated => write!(f, "first evaluated instance list"),
            Self::Registered(description) => write!(f, "instance list \"{}\"", description),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
/// Config struct of the `TokenAccuracyEvaluator`. It implements the default trait.
pub struct EvaluatorConfig {
    /// What to return when a ratio has no denominator, such as the OOV accuracy of a dataset
    /// without any OOV token.
    zero_division: ZeroDivision,
    /// Where the vocabulary comes from.
    vocabulary_seed: VocabularySeed,
    /// `evaluate_all` only runs on iterations that are a multiple of this value.
    evaluation_interval: usize,
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        EvaluatorConfigBuilder::new().build()
    }
    pub fn zero_division(&self) -> ZeroDivision {
        self.zero_division
    }
    pub fn vocabulary_seed(&self) -> &VocabularySeed {
        &self.vocabulary_seed
    }
    pub fn evaluation_interval(&self) -> usize {
        self.evaluation_interval
    }
    /// Should the training iteration `iteration` be evaluated? An interval of `0` counts as `1`.
    pub fn is_evaluation_iteration(&self, iteration: usize) -> bool {
        iteration % self.evaluation_interval.max(1) == 0
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<EvaluatorConfigBuilder> for EvaluatorConfig {
    fn from(value: EvaluatorConfigBuilder) -> Self {
        Self {
            zero_division: value.zero_division,
            vocabulary_seed: value.vocabulary_seed,
            evaluation_interval: value.evaluation_interval,
        }
    }
}

impl Display for EvaluatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = format!("Strategy when encountering a division by zero: {:?}\n Vocabulary seeded from the {}\n Evaluating every {} iteration(s)", self.zero_division, self.vocabulary_seed, self.evaluation_interval.max(1));
        write!(f, "{}", string)
    }
}

/// This builder can be used to build and customize an `EvaluatorConfig` stucture.
#[derive(Clone, Debug)]
pub struct EvaluatorConfigBuilder {
    zero_division: ZeroDivision,
    vocabulary_seed: VocabularySeed,
    evaluation_interval: usize,
}

impl Default for EvaluatorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluatorConfigBuilder {
    pub fn division_by_zero(mut self, division_by_zero: ZeroDivision) -> Self {
        self.zero_division = division_by_zero;
        self
    }
    pub fn vocabulary_seed(mut self, vocabulary_seed: VocabularySeed) -> Self {
        self.vocabulary_seed = vocabulary_seed;
        self
    }
    /// Shortcut for `vocabulary_seed(VocabularySeed::Registered(description))`.
    pub fn seed_vocabulary_from<S: Into<String>>(self, description: S) -> Self {
        self.vocabulary_seed(VocabularySeed::Registered(description.into()))
    }
    pub fn evaluation_interval(mut self, evaluation_interval: usize) -> Self {
        self.evaluation_interval = evaluation_interval;
        self
    }
    pub fn new() -> Self {
        Self {
            zero_division: ZeroDivision::Nan,
            vocabulary_seed: VocabularySeed::FirstEvaluated,
            evaluation_interval: 1,
        }
    }
    pub fn build(self) -> EvaluatorConfig {
        EvaluatorConfig::from(self)
    }
}
