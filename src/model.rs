/*!
This module holds the types shared with the training loop: the labeled `Instance`, the named
`EvalSet`, and the two traits the evaluator uses to reach the model being trained.
*/
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A model able to label a sequence of tokens. The predicted sequence must have the same length as
/// the input sequence.
pub trait Transducer {
    /// Input token. Its `Display` output is the surface form used for the vocabulary.
    type Token: Display;
    /// Output label, compared by value against the target label.
    type Label: PartialEq;

    fn transduce(&self, input: &[Self::Token]) -> Vec<Self::Label>;
}

/// A training loop driving a `Transducer`. The evaluator calls it once per iteration through
/// `TokenAccuracyEvaluator::evaluate_all`.
pub trait TransducerTrainer {
    type Model: Transducer;

    /// The model in its current state of training.
    fn transducer(&self) -> &Self::Model;
    /// Number of completed training iterations.
    fn iteration(&self) -> usize;
}

/// A labeled sequence: one target label for every input token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance<T, L> {
    pub input: Vec<T>,
    pub target: Vec<L>,
}

impl<T, L> Instance<T, L> {
    pub fn new(input: Vec<T>, target: Vec<L>) -> Self {
        Self { input, target }
    }
    /// Number of tokens in the instance.
    pub fn len(&self) -> usize {
        self.input.len()
    }
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}

impl<T, L> From<(Vec<T>, Vec<L>)> for Instance<T, L> {
    fn from(value: (Vec<T>, Vec<L>)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// A borrowed dataset and the description under which its accuracy is recorded, such as `"train"`
/// or `"test"`.
#[derive(Debug)]
pub struct EvalSet<'a, T, L> {
    pub description: &'a str,
    pub instances: &'a [Instance<T, L>],
}

impl<'a, T, L> EvalSet<'a, T, L> {
    pub fn new(instances: &'a [Instance<T, L>], description: &'a str) -> Self {
        Self {
            description,
            instances,
        }
    }
}

// Derives would require `T: Clone` and `L: Clone`, but only references are copied.
impl<T, L> Clone for EvalSet<'_, T, L> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, L> Copy for EvalSet<'_, T, L> {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_instance_from_tuple() {
        let instance: Instance<&str, &str> = (vec!["the", "dog"], vec!["DT", "NN"]).into();
        assert_eq!(instance.len(), 2);
        assert!(!instance.is_empty());
        assert_eq!(instance.target, vec!["DT", "NN"]);
    }

    #[test]
    fn test_eval_set_is_copy() {
        let instances = vec![Instance::new(vec![String::from("a")], vec![String::from("X")])];
        let eval_set = EvalSet::new(&instances, "train");
        let copied = eval_set;
        assert_eq!(eval_set.description, copied.description);
        assert_eq!(copied.instances.len(), 1);
    }
}
