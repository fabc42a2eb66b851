//! Difference between two line-delimited sets.

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

use super::lines::read_lines;

/// Elements of a first set absent from a second one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetDifference {
    /// Missing elements, in first-seen order of the first set.
    pub elements: Vec<String>,
}

impl SetDifference {
    /// Number of elements in the difference.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the first set is contained in the second.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Computes `first - second`, deduplicating the first set.
#[must_use]
pub fn set_difference<I, J>(first: I, second: J) -> SetDifference
where
    I: IntoIterator<Item = String>,
    J: IntoIterator<Item = String>,
{
    let exclude: HashSet<String> = second.into_iter().collect();
    let mut seen = HashSet::new();

    let elements = first
        .into_iter()
        .filter(|item| !exclude.contains(item) && seen.insert(item.clone()))
        .collect();

    SetDifference { elements }
}

/// Loads two files and computes the difference of their line sets.
///
/// # Errors
///
/// Returns an error if either file is missing or unreadable.
pub fn file_set_difference(first: &Path, second: &Path) -> Result<SetDifference> {
    Ok(set_difference(read_lines(first)?, read_lines(second)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_difference() {
        let diff = set_difference(strings(&["a", "b", "c"]), strings(&["b", "c"]));
        assert_eq!(diff.elements, vec!["a"]);
        assert_eq!(diff.len(), 1);
    }

    #[test]
    fn test_difference_deduplicates_and_keeps_order() {
        let diff = set_difference(strings(&["z", "a", "z", "b", "a"]), strings(&["b"]));
        assert_eq!(diff.elements, vec!["z", "a"]);
    }

    #[test]
    fn test_subset_is_empty() {
        assert!(set_difference(strings(&["a"]), strings(&["a", "b"])).is_empty());
    }

    #[test]
    fn test_file_set_difference() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let first = temp.path().join("set1.txt");
        let second = temp.path().join("set2.txt");
        std::fs::write(&first, "a\nb\nc\n").unwrap();
        std::fs::write(&second, "b\nc\n").unwrap();

        let diff = file_set_difference(&first, &second).unwrap();
        assert_eq!(diff.elements, vec!["a"]);
    }
}
