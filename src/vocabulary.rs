/*!
The vocabulary is the set of token surface forms seen in a reference dataset. Tokens missing from it
are out-of-vocabulary (OOV).
*/
use crate::model::Instance;
use ahash::HashSet as AHashSet;
use std::fmt::Display;

/// Set of token surface forms. The surface form of a token is its `Display` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: AHashSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the surface form of every input token of every instance. Duplicates collapse.
    pub fn from_instances<'i, T, L, I>(instances: I) -> Self
    where
        T: Display + 'i,
        L: 'i,
        I: IntoIterator<Item = &'i Instance<T, L>>,
    {
        let mut vocabulary = Self::new();
        for instance in instances {
            for token in instance.input.iter() {
                vocabulary.insert(token);
            }
        }
        vocabulary
    }

    /// Returns `true` if the surface form was not already present.
    pub fn insert<T: Display + ?Sized>(&mut self, token: &T) -> bool {
        self.tokens.insert(token.to_string())
    }

    pub fn contains(&self, surface_form: &str) -> bool {
        self.tokens.contains(surface_form)
    }

    pub fn contains_token<T: Display + ?Sized>(&self, token: &T) -> bool {
        self.contains(&token.to_string())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates over the surface forms in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl FromIterator<String> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// Vocabulary that is seeded at most once and never rebuilt afterwards.
#[derive(Debug, Clone, Default)]
pub(crate) struct LazyVocabulary(Option<Vocabulary>);

impl LazyVocabulary {
    pub(crate) fn get(&self) -> Option<&Vocabulary> {
        self.0.as_ref()
    }

    pub(crate) fn is_seeded(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the vocabulary, running `seed` first if it was never built. A failed `seed` leaves
    /// the vocabulary unset.
    pub(crate) fn get_or_try_seed<E, F>(&mut self, seed: F) -> Result<&Vocabulary, E>
    where
        F: FnOnce() -> Result<Vocabulary, E>,
    {
        let vocabulary = match self.0.take() {
            Some(vocabulary) => vocabulary,
            None => seed()?,
        };
        Ok(self.0.insert(vocabulary))
    }
}
