/*!
This library tracks the token-level accuracy of a sequence labeling model, such as a part-of-speech
tagger or a CRF, over the course of its training. Next to the overall accuracy it reports the
accuracy on out-of-vocabulary (OOV) tokens, which is usually where taggers struggle.

# Terminology
* A token is an element of the input sequence, such as a word. Its surface form is its `Display`
    output.
* A label is the tag given to a token, such as `NN` or `B-PER`. Labels are compared by value.
* An instance is an input sequence of tokens and the target sequence of labels, of the same length.
* The vocabulary is the set of token surface forms seen in the first dataset evaluated. Tokens
    missing from it are OOV tokens.
* A description names a dataset, e.g. "train" or "test". Accuracies are recorded by description.

# Undefined accuracies
A dataset without any token, or without any OOV token, has an undefined accuracy. By default it is
reported as `NaN`; the `ZeroDivision` strategy of the `EvaluatorConfig` can replace it by 0, by 1,
or turn it into an error.

# Example
```rust
use tokacc::{Instance, TokenAccuracyEvaluator, Transducer};

/// Tags everything as a noun.
struct NounTagger;

impl Transducer for NounTagger {
    type Token = &'static str;
    type Label = &'static str;
    fn transduce(&self, input: &[&'static str]) -> Vec<&'static str> {
        vec!["NN"; input.len()]
    }
}

let train = vec![Instance::new(vec!["the", "dog"], vec!["DT", "NN"])];
let test = vec![Instance::new(vec!["the", "cat"], vec!["DT", "NN"])];

let mut evaluator = TokenAccuracyEvaluator::with_two(&train, "train", &test, "test");
evaluator.evaluate(&NounTagger, &train, "train").unwrap();
let report = evaluator.evaluate(&NounTagger, &test, "test").unwrap();

assert_eq!(evaluator.accuracy("test").unwrap(), 0.5);
// "cat" was never seen in the training set, and was correctly tagged.
assert_eq!(report.oov_accuracy, 1.0);
assert!(evaluator.accuracy("dev").is_err());
```
*/

mod config;
mod evaluator;
mod metrics;
mod model;
mod reporter;
mod vocabulary;

// The public api starts here
pub use evaluator::TokenAccuracyEvaluator;

pub use model::{EvalSet, Instance, Transducer, TransducerTrainer};

pub use metrics::{
    AccuracyNotFoundError, DivisionByZeroError, EvaluatorError, InconsistentLengthError,
    ParsingZeroDivisionError, TokenCounts, UnknownEvalSetError, ZeroDivision,
};

pub use reporter::AccuracyReport;

pub use vocabulary::Vocabulary;

pub use config::{EvaluatorConfig, EvaluatorConfigBuilder, VocabularySeed};
