//! The locate-transform-write-back pattern shared by every values rule.

use serde::Serialize;
use serde_yaml::Value;

use crate::error::DocumentError;

use super::path::YamlPath;

/// Rule-specific statistics accumulated across entries and files.
pub trait Tally: Default + Clone + Serialize {
    /// Folds another tally into this one.
    fn merge(&mut self, other: &Self);
}

impl Tally for () {
    fn merge(&mut self, _other: &Self) {}
}

/// A transformation applied to one value located in a document.
pub trait Rule {
    /// Statistics produced per modified entry.
    type Tally: Tally;

    /// Short rule name used in logs.
    fn name(&self) -> &'static str;

    /// Applies the rule to a located value.
    ///
    /// Returns `Ok(None)` when the value was left untouched and
    /// `Ok(Some(tally))` when it was modified.
    ///
    /// # Errors
    ///
    /// Returns an error when the value has a shape the rule cannot work with
    /// and the file should be reported as failed.
    fn apply(&self, target: &mut Value, at: &YamlPath) -> Result<Option<Self::Tally>, DocumentError>;
}

/// Outcome of transforming one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transformed<T> {
    /// Number of entries that were modified.
    pub modified: usize,
    /// Accumulated rule statistics for the modified entries.
    pub tally: T,
}

impl<T> Transformed<T> {
    /// Returns true if nothing in the document changed.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.modified == 0
    }
}

/// Applies a rule to one document through a selector.
///
/// # Errors
///
/// Propagates the first error returned by the rule. Entries modified before
/// the error remain modified in `document`; callers discard it in that case.
pub fn transform<R: Rule>(
    document: &mut Value,
    selector: &YamlPath,
    rule: &R,
) -> Result<Transformed<R::Tally>, DocumentError> {
    let mut result = Transformed::<R::Tally>::default();

    for target in selector.select_mut(document) {
        if let Some(tally) = rule.apply(target, selector)? {
            result.modified += 1;
            result.tally.merge(&tally);
        }
    }

    Ok(result)
}

/// A rule bound to the selectors it is applied through.
#[derive(Debug, Clone)]
pub struct Transformer<R> {
    selectors: Vec<YamlPath>,
    rule: R,
}

impl<R: Rule> Transformer<R> {
    /// Creates a transformer applying `rule` at every selector.
    #[must_use]
    pub const fn new(rule: R, selectors: Vec<YamlPath>) -> Self {
        Self { selectors, rule }
    }

    /// Creates a transformer from selector strings such as `jobs[0]`.
    ///
    /// # Errors
    ///
    /// Returns an error if a selector cannot be parsed.
    pub fn parse(rule: R, selectors: &[&str]) -> Result<Self, DocumentError> {
        let selectors = selectors
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<YamlPath>, _>>()?;
        Ok(Self::new(rule, selectors))
    }

    /// Returns the wrapped rule.
    #[must_use]
    pub const fn rule(&self) -> &R {
        &self.rule
    }

    /// Returns the selectors the rule is applied through.
    #[must_use]
    pub fn selectors(&self) -> &[YamlPath] {
        &self.selectors
    }

    /// Applies the rule through every selector and sums the results.
    ///
    /// # Errors
    ///
    /// Returns the first rule error.
    pub fn apply(&self, document: &mut Value) -> Result<Transformed<R::Tally>, DocumentError> {
        let mut total = Transformed::<R::Tally>::default();

        for selector in &self.selectors {
            let result = transform(document, selector, &self.rule)?;
            total.modified += result.modified;
            total.tally.merge(&result.tally);
        }

        Ok(total)
    }
}
