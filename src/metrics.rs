/**
This module counts the correctly labeled tokens of a dataset and turns the counts into the overall
and out-of-vocabulary accuracies.
*/
use crate::model::{Instance, Transducer};
use crate::vocabulary::Vocabulary;
use core::fmt;
use itertools::multizip;
use num::{Float, NumCast};
use serde::{Deserialize, Serialize};
use std::{
    error::Error,
    fmt::Display,
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
/// What do we return when a ratio has a zero denominator, i.e. when the dataset has no token or
/// when no token is out of the vocabulary? By default the ratio is left undefined (`NaN`), which
/// is then logged and recorded as is.
pub enum ZeroDivision {
    /// Returns `NaN` when the denominator is 0
    #[default]
    Nan,
    /// Returns 0 when the denominator is 0
    ReplaceBy0,
    /// Returns 1 when the denominator is 0
    ReplaceBy1,
    /// Returns an error
    ReturnError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingZeroDivisionError(String);

impl Display for ParsingZeroDivisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse the {} into a `ZeroDivision`", self.0)
    }
}
impl Error for ParsingZeroDivisionError {}

impl FromStr for ZeroDivision {
    type Err = ParsingZeroDivisionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "nan" => Ok(ZeroDivision::Nan),
            "replaceby0" | "replacebyzero" => Ok(ZeroDivision::ReplaceBy0),
            "replaceby1" | "replacebyone" => Ok(ZeroDivision::ReplaceBy1),
            "returnerror" | "error" => Ok(ZeroDivision::ReturnError),
            _ => Err(ParsingZeroDivisionError(String::from(s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Raised by the `ZeroDivision::ReturnError` strategy. Holds the name of the undefined ratio.
pub struct DivisionByZeroError(pub(crate) &'static str);

impl Display for DivisionByZeroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encountered division by zero while computing the {}", self.0)
    }
}
impl Error for DivisionByZeroError {}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Error type to represent when the datasets and the descriptions given to the evaluator are not
/// of the same length.
pub struct InconsistentLengthError(pub(crate) usize, pub(crate) usize);

impl Display for InconsistentLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Inconsistent length between two lists. `datasets` is length {}, `descriptions` is length {}",
            self.0, self.1
        )
    }
}
impl Error for InconsistentLengthError {}

#[derive(Debug, PartialEq, Eq, Clone)]
/// No accuracy was ever recorded under this description.
pub struct AccuracyNotFoundError(pub(crate) String);

impl Display for AccuracyNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No accuracy available for instance list \"{}\"", self.0)
    }
}
impl Error for AccuracyNotFoundError {}

#[derive(Debug, PartialEq, Eq, Clone)]
/// The vocabulary must be seeded from an eval set that was never registered.
pub struct UnknownEvalSetError(pub(crate) String);

impl Display for UnknownEvalSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No instance list registered under \"{}\" to build the vocabulary from",
            self.0
        )
    }
}
impl Error for UnknownEvalSetError {}

#[derive(Debug, Clone, PartialEq)]
/// Enum error encompassing the failures of the evaluator.
pub enum EvaluatorError {
    AccuracyNotFound(AccuracyNotFoundError),
    DivisionByZero(DivisionByZeroError),
    InconsistentLength(InconsistentLengthError),
    UnknownEvalSet(UnknownEvalSetError),
}

impl Display for EvaluatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccuracyNotFound(not_found) => Display::fmt(not_found, f),
            Self::DivisionByZero(div_err) => Display::fmt(div_err, f),
            Self::InconsistentLength(length_err) => Display::fmt(length_err, f),
            Self::UnknownEvalSet(unknown) => Display::fmt(unknown, f),
        }
    }
}

impl Error for EvaluatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AccuracyNotFound(e) => Some(e),
            Self::DivisionByZero(e) => Some(e),
            Self::InconsistentLength(e) => Some(e),
            Self::UnknownEvalSet(e) => Some(e),
        }
    }
}

impl From<AccuracyNotFoundError> for EvaluatorError {
    fn from(value: AccuracyNotFoundError) -> Self {
        Self::AccuracyNotFound(value)
    }
}
impl From<DivisionByZeroError> for EvaluatorError {
    fn from(value: DivisionByZeroError) -> Self {
        Self::DivisionByZero(value)
    }
}
impl From<InconsistentLengthError> for EvaluatorError {
    fn from(value: InconsistentLengthError) -> Self {
        Self::InconsistentLength(value)
    }
}
impl From<UnknownEvalSetError> for EvaluatorError {
    fn from(value: UnknownEvalSetError) -> Self {
        Self::UnknownEvalSet(value)
    }
}

/// Raw tallies of a scoring pass over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenCounts {
    /// Number of scored tokens
    pub total: usize,
    /// Number of tokens whose predicted label equals the target label
    pub correct: usize,
    /// Number of tokens absent from the vocabulary
    pub total_oov: usize,
    /// Number of tokens absent from the vocabulary and correctly labeled
    pub correct_oov: usize,
}

impl TokenCounts {
    #[inline]
    pub(crate) fn tally(&mut self, is_correct: bool, is_oov: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
        if is_oov {
            self.total_oov += 1;
            if is_correct {
                self.correct_oov += 1;
            }
        }
    }

    /// `correct / total`
    pub fn accuracy<F: Float>(
        &self,
        zero_division: ZeroDivision,
    ) -> Result<F, DivisionByZeroError> {
        ratio(self.correct, self.total, zero_division, "accuracy")
    }

    /// `correct_oov / total_oov`
    pub fn oov_accuracy<F: Float>(
        &self,
        zero_division: ZeroDivision,
    ) -> Result<F, DivisionByZeroError> {
        ratio(self.correct_oov, self.total_oov, zero_division, "OOV accuracy")
    }
}

fn ratio<F: Float>(
    numerator: usize,
    denominator: usize,
    zero_division: ZeroDivision,
    metric: &'static str,
) -> Result<F, DivisionByZeroError> {
    if denominator == 0 {
        return match zero_division {
            ZeroDivision::Nan => Ok(F::nan()),
            ZeroDivision::ReplaceBy0 => Ok(F::zero()),
            ZeroDivision::ReplaceBy1 => Ok(F::one()),
            ZeroDivision::ReturnError => Err(DivisionByZeroError(metric)),
        };
    }
    // usize always fits a float, possibly with rounding
    let numerator = <F as NumCast>::from(numerator).unwrap_or_else(F::nan);
    let denominator = <F as NumCast>::from(denominator).unwrap_or_else(F::nan);
    Ok(numerator / denominator)
}

/// Runs the model over every instance and counts the correct predictions, overall and for the
/// tokens missing from `vocabulary`. The input, target and predicted sequences of an instance are
/// expected to have the same length; this is only checked in debug builds.
pub(crate) fn count_tokens<M>(
    model: &M,
    instances: &[Instance<M::Token, M::Label>],
    vocabulary: &Vocabulary,
) -> TokenCounts
where
    M: Transducer,
{
    let mut counts = TokenCounts::default();
    for instance in instances {
        debug_assert_eq!(instance.input.len(), instance.target.len());
        let predicted = model.transduce(&instance.input);
        debug_assert_eq!(predicted.len(), instance.target.len());
        for (token, target, prediction) in
            multizip((instance.input.iter(), instance.target.iter(), predicted.iter()))
        {
            counts.tally(target == prediction, !vocabulary.contains_token(token));
        }
    }
    counts
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::{QuickCheck, TestResult};
    use rstest::rstest;

    /// Labels a number with its remainder modulo 3, shifted by `offset`.
    struct ModuloTagger {
        offset: u8,
    }

    impl Transducer for ModuloTagger {
        type Token = u8;
        type Label = u8;
        fn transduce(&self, input: &[u8]) -> Vec<u8> {
            input.iter().map(|t| (t % 3 + self.offset) % 3).collect()
        }
    }

    fn modulo_instances(sequences: Vec<Vec<u8>>) -> Vec<Instance<u8, u8>> {
        sequences
            .into_iter()
            .map(|input| {
                let target = input.iter().map(|t| t % 3).collect();
                Instance::new(input, target)
            })
            .collect()
    }

    #[rstest]
    #[case("nan", ZeroDivision::Nan)]
    #[case("NaN", ZeroDivision::Nan)]
    #[case("ReplaceBy0", ZeroDivision::ReplaceBy0)]
    #[case("replacebyzero", ZeroDivision::ReplaceBy0)]
    #[case("replaceby1", ZeroDivision::ReplaceBy1)]
    #[case("ReplaceByOne", ZeroDivision::ReplaceBy1)]
    #[case("error", ZeroDivision::ReturnError)]
    #[case("ReturnError", ZeroDivision::ReturnError)]
    fn test_parse_zero_division(#[case] input: &str, #[case] expected: ZeroDivision) {
        assert_eq!(input.parse::<ZeroDivision>(), Ok(expected))
    }

    #[test]
    fn test_parse_zero_division_err() {
        let res = "ignore".parse::<ZeroDivision>();
        assert_eq!(res, Err(ParsingZeroDivisionError(String::from("ignore"))));
    }

    #[rstest]
    #[case(ZeroDivision::ReplaceBy0, 0.0)]
    #[case(ZeroDivision::ReplaceBy1, 1.0)]
    fn test_ratio_zero_denominator(#[case] strat: ZeroDivision, #[case] expected: f64) {
        let actual: f64 = ratio(0, 0, strat, "accuracy").unwrap();
        assert_eq!(actual, expected)
    }

    #[test]
    fn test_ratio_zero_denominator_nan() {
        let actual: f64 = ratio(0, 0, ZeroDivision::Nan, "accuracy").unwrap();
        assert!(actual.is_nan());
    }

    #[test]
    fn test_ratio_zero_denominator_error() {
        let actual = ratio::<f64>(0, 0, ZeroDivision::ReturnError, "OOV accuracy");
        assert_eq!(actual, Err(DivisionByZeroError("OOV accuracy")));
        assert_eq!(
            actual.unwrap_err().to_string(),
            "Encountered division by zero while computing the OOV accuracy"
        );
    }

    #[rstest]
    #[case(2, 3, 2.0 / 3.0)]
    #[case(0, 5, 0.0)]
    #[case(7, 7, 1.0)]
    fn test_ratio(#[case] numerator: usize, #[case] denominator: usize, #[case] expected: f64) {
        for strat in [
            ZeroDivision::Nan,
            ZeroDivision::ReplaceBy0,
            ZeroDivision::ReplaceBy1,
            ZeroDivision::ReturnError,
        ] {
            let actual: f64 = ratio(numerator, denominator, strat, "accuracy").unwrap();
            assert_eq!(actual, expected)
        }
    }

    #[test]
    fn test_ratio_f32() {
        let actual: f32 = ratio(1, 4, ZeroDivision::Nan, "accuracy").unwrap();
        assert_eq!(actual, 0.25)
    }

    #[rstest]
    #[case(true, false, TokenCounts { total: 1, correct: 1, total_oov: 0, correct_oov: 0 })]
    #[case(false, false, TokenCounts { total: 1, correct: 0, total_oov: 0, correct_oov: 0 })]
    #[case(true, true, TokenCounts { total: 1, correct: 1, total_oov: 1, correct_oov: 1 })]
    #[case(false, true, TokenCounts { total: 1, correct: 0, total_oov: 1, correct_oov: 0 })]
    fn test_tally_single_token(
        #[case] is_correct: bool,
        #[case] is_oov: bool,
        #[case] expected: TokenCounts,
    ) {
        let mut counts = TokenCounts::default();
        counts.tally(is_correct, is_oov);
        assert_eq!(counts, expected)
    }

    #[test]
    fn test_tally() {
        let mut counts = TokenCounts::default();
        counts.tally(true, false);
        counts.tally(false, true);
        counts.tally(true, true);
        let expected = TokenCounts {
            total: 3,
            correct: 2,
            total_oov: 2,
            correct_oov: 1,
        };
        assert_eq!(counts, expected)
    }

    #[test]
    fn test_count_tokens() {
        let instances = modulo_instances(vec![vec![1, 2, 3], vec![4, 5]]);
        let vocabulary = Vocabulary::from_iter([String::from("1"), String::from("4")]);
        let counts = count_tokens(&ModuloTagger { offset: 0 }, &instances, &vocabulary);
        let expected = TokenCounts {
            total: 5,
            correct: 5,
            total_oov: 3,
            correct_oov: 3,
        };
        assert_eq!(counts, expected);
        let counts = count_tokens(&ModuloTagger { offset: 1 }, &instances, &vocabulary);
        assert_eq!(counts.correct, 0);
        assert_eq!(counts.correct_oov, 0);
        assert_eq!(counts.total_oov, 3);
    }

    #[test]
    fn test_count_tokens_empty_dataset() {
        let counts = count_tokens(&ModuloTagger { offset: 0 }, &[], &Vocabulary::new());
        assert_eq!(counts, TokenCounts::default());
        assert!(counts.accuracy::<f64>(ZeroDivision::Nan).unwrap().is_nan());
        assert!(counts.oov_accuracy::<f64>(ZeroDivision::Nan).unwrap().is_nan());
    }

    #[test]
    fn test_propertie_perfect_and_wrong_models() {
        fn perfect_and_wrong(sequences: Vec<Vec<u8>>) -> TestResult {
            let instances = modulo_instances(sequences);
            if instances.iter().all(|i| i.is_empty()) {
                return TestResult::discard();
            }
            let vocabulary = Vocabulary::new();
            let perfect = count_tokens(&ModuloTagger { offset: 0 }, &instances, &vocabulary);
            let wrong = count_tokens(&ModuloTagger { offset: 2 }, &instances, &vocabulary);
            let perfect_acc: f64 = perfect.accuracy(ZeroDivision::Nan).unwrap();
            let wrong_acc: f64 = wrong.accuracy(ZeroDivision::Nan).unwrap();
            TestResult::from_bool(perfect_acc == 1.0 && wrong_acc == 0.0)
        }
        let mut qc = QuickCheck::new().tests(500);
        qc.quickcheck(perfect_and_wrong as fn(Vec<Vec<u8>>) -> TestResult)
    }

    #[test]
    fn test_propertie_accuracy_is_bounded() {
        fn bounded(pairs: Vec<(u8, u8)>, seen: Vec<u8>) -> TestResult {
            if pairs.is_empty() {
                return TestResult::discard();
            }
            let (input, target): (Vec<u8>, Vec<u8>) = pairs.into_iter().unzip();
            let instances = vec![Instance::new(input, target)];
            let vocabulary = Vocabulary::from_iter(seen.iter().map(|t| t.to_string()));
            let counts = count_tokens(&ModuloTagger { offset: 0 }, &instances, &vocabulary);
            let acc: f64 = counts.accuracy(ZeroDivision::ReturnError).unwrap();
            let oov_acc: f64 = counts.oov_accuracy(ZeroDivision::ReplaceBy0).unwrap();
            TestResult::from_bool(
                (0.0..=1.0).contains(&acc)
                    && (0.0..=1.0).contains(&oov_acc)
                    && counts.correct_oov <= counts.total_oov
                    && counts.total_oov <= counts.total,
            )
        }
        let mut qc = QuickCheck::new().tests(500);
        qc.quickcheck(bounded as fn(Vec<(u8, u8)>, Vec<u8>) -> TestResult)
    }
}
