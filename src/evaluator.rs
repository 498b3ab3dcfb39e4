/*!
The `TokenAccuracyEvaluator` scores a sequence labeling model token by token. It keeps the overall
accuracy of every evaluated dataset, keyed by the dataset description, and logs the accuracy on
out-of-vocabulary tokens next to it.
*/
use crate::config::{EvaluatorConfig, VocabularySeed};
use crate::metrics::{
    count_tokens, AccuracyNotFoundError, EvaluatorError, InconsistentLengthError,
    UnknownEvalSetError,
};
use crate::model::{EvalSet, Instance, Transducer, TransducerTrainer};
use crate::reporter::AccuracyReport;
use crate::vocabulary::{LazyVocabulary, Vocabulary};
use ahash::HashMap as AHashMap;
use std::fmt::Display;

/// Evaluates a transducer on the accuracy of its individual token predictions.
///
/// The vocabulary used to tell out-of-vocabulary tokens apart is built once, on the first call to
/// `evaluate`, from the dataset that call receives (or from a registered eval set, see
/// `VocabularySeed`). It is never rebuilt afterwards.
#[derive(Debug)]
pub struct TokenAccuracyEvaluator<'a, T, L> {
    eval_sets: Vec<EvalSet<'a, T, L>>,
    config: EvaluatorConfig,
    vocabulary: LazyVocabulary,
    accuracies: AHashMap<String, f64>,
}

impl<'a, T, L> TokenAccuracyEvaluator<'a, T, L>
where
    T: Display,
    L: PartialEq,
{
    pub fn new(eval_sets: Vec<EvalSet<'a, T, L>>) -> Self {
        Self {
            eval_sets,
            config: EvaluatorConfig::default(),
            vocabulary: LazyVocabulary::default(),
            accuracies: AHashMap::default(),
        }
    }

    pub fn with_one(instances: &'a [Instance<T, L>], description: &'a str) -> Self {
        Self::new(vec![EvalSet::new(instances, description)])
    }

    pub fn with_two(
        instances1: &'a [Instance<T, L>],
        description1: &'a str,
        instances2: &'a [Instance<T, L>],
        description2: &'a str,
    ) -> Self {
        Self::new(vec![
            EvalSet::new(instances1, description1),
            EvalSet::new(instances2, description2),
        ])
    }

    pub fn with_three(
        instances1: &'a [Instance<T, L>],
        description1: &'a str,
        instances2: &'a [Instance<T, L>],
        description2: &'a str,
        instances3: &'a [Instance<T, L>],
        description3: &'a str,
    ) -> Self {
        Self::new(vec![
            EvalSet::new(instances1, description1),
            EvalSet::new(instances2, description2),
            EvalSet::new(instances3, description3),
        ])
    }

    /// Pairs every dataset with the description at the same position. Both slices must have the
    /// same length.
    pub fn from_parts(
        datasets: &[&'a [Instance<T, L>]],
        descriptions: &[&'a str],
    ) -> Result<Self, EvaluatorError> {
        if datasets.len() != descriptions.len() {
            return Err(InconsistentLengthError(datasets.len(), descriptions.len()).into());
        }
        let eval_sets = datasets
            .iter()
            .zip(descriptions)
            .map(|(&instances, &description)| EvalSet::new(instances, description))
            .collect();
        Ok(Self::new(eval_sets))
    }

    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Computes the token accuracy of `model` over `instances`, records it under `description`
    /// (replacing any previous value) and logs it along with the out-of-vocabulary accuracy.
    ///
    /// The first call builds the vocabulary. With the default `ZeroDivision::Nan` strategy an empty
    /// dataset, or a dataset without out-of-vocabulary tokens, yields a `NaN` accuracy instead of an
    /// error. When an error is returned, nothing is recorded.
    pub fn evaluate<M>(
        &mut self,
        model: &M,
        instances: &[Instance<T, L>],
        description: &str,
    ) -> Result<AccuracyReport, EvaluatorError>
    where
        M: Transducer<Token = T, Label = L>,
    {
        let seed = self.config.vocabulary_seed();
        let eval_sets = &self.eval_sets;
        let vocabulary = self.vocabulary.get_or_try_seed(|| {
            let vocabulary = seed_vocabulary(seed, eval_sets, instances)?;
            log::debug!(
                "Built a vocabulary of {} tokens from the {}",
                vocabulary.len(),
                seed
            );
            Ok::<_, EvaluatorError>(vocabulary)
        })?;

        let counts = count_tokens(model, instances, vocabulary);
        let zero_division = self.config.zero_division();
        let report = AccuracyReport::new(
            description,
            counts.accuracy(zero_division)?,
            counts.oov_accuracy(zero_division)?,
            counts,
        );

        self.accuracies
            .insert(String::from(description), report.accuracy);
        report.log();
        Ok(report)
    }

    /// Evaluates every registered eval set, in registration order, with the model of `trainer`.
    /// Iterations that are not a multiple of the configured evaluation interval are skipped and
    /// return no report.
    ///
    /// The first error stops the pass: the eval sets before it stay recorded, the ones after it
    /// are not evaluated. With `ZeroDivision::ReturnError` and the default vocabulary seed, the
    /// first registered set seeds the vocabulary and so has no OOV token. Every pass then fails on
    /// that set; pick another `ZeroDivision` strategy to evaluate the remaining sets.
    pub fn evaluate_all<Tr, M>(
        &mut self,
        trainer: &Tr,
    ) -> Result<Vec<AccuracyReport>, EvaluatorError>
    where
        Tr: TransducerTrainer<Model = M>,
        M: Transducer<Token = T, Label = L>,
    {
        let iteration = trainer.iteration();
        if !self.config.is_evaluation_iteration(iteration) {
            log::debug!("Skipping token accuracy evaluation at iteration {}", iteration);
            return Ok(Vec::new());
        }
        let eval_sets = self.eval_sets.clone();
        let mut reports = Vec::with_capacity(eval_sets.len());
        for eval_set in eval_sets {
            reports.push(self.evaluate(
                trainer.transducer(),
                eval_set.instances,
                eval_set.description,
            )?);
        }
        Ok(reports)
    }

    /// Returns the accuracy recorded by the last evaluation of `description`.
    pub fn accuracy(&self, description: &str) -> Result<f64, EvaluatorError> {
        self.accuracies
            .get(description)
            .copied()
            .ok_or_else(|| AccuracyNotFoundError(String::from(description)).into())
    }

    /// Every recorded accuracy, in no particular order.
    pub fn recorded_accuracies(&self) -> impl Iterator<Item = (&str, f64)> {
        self.accuracies
            .iter()
            .map(|(description, accuracy)| (description.as_str(), *accuracy))
    }

    /// `None` until the first call to `evaluate`.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.get()
    }

    pub fn is_vocabulary_built(&self) -> bool {
        self.vocabulary.is_seeded()
    }

    /// Descriptions of the registered eval sets, in registration order.
    pub fn descriptions(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.eval_sets.iter().map(|eval_set| eval_set.description)
    }
}

fn seed_vocabulary<T: Display, L>(
    seed: &VocabularySeed,
    eval_sets: &[EvalSet<'_, T, L>],
    evaluated: &[Instance<T, L>],
) -> Result<Vocabulary, UnknownEvalSetError> {
    match seed {
        VocabularySeed::FirstEvaluated => Ok(Vocabulary::from_instances(evaluated)),
        VocabularySeed::Registered(description) => eval_sets
            .iter()
            .find(|eval_set| eval_set.description == description.as_str())
            .map(|eval_set| Vocabulary::from_instances(eval_set.instances))
            .ok_or_else(|| UnknownEvalSetError(description.clone())),
    }
}
