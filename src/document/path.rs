//! Structural path selectors over YAML documents.
//!
//! A selector such as `deployments[0].deploy.command` is a list of steps,
//! each naming a mapping key and optionally indexing into the sequence stored
//! under that key. `[*]` selects every element of the sequence.

use serde_yaml::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::DocumentError;

/// Index applied to the sequence found under a step's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepIndex {
    /// A single element.
    At(usize),
    /// Every element.
    All,
}

/// One step of a [`YamlPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    /// Mapping key to descend into.
    pub key: String,
    /// Optional sequence index applied after the key lookup.
    pub index: Option<StepIndex>,
}

/// A fixed structural path into a YAML document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YamlPath {
    steps: Vec<PathStep>,
}

impl YamlPath {
    /// Creates a path from explicit steps.
    #[must_use]
    pub const fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    /// Returns the steps of this path.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Returns every value matched by this path.
    ///
    /// A missing key, a non-mapping parent or an out-of-range index yields no
    /// match for that branch rather than an error.
    pub fn select_mut<'a>(&self, root: &'a mut Value) -> Vec<&'a mut Value> {
        let mut matches = Vec::new();
        collect_mut(root, &self.steps, &mut matches);
        matches
    }

    /// Returns the first value matched by this path, if any.
    #[must_use]
    pub fn select<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for step in &self.steps {
            current = current.as_mapping()?.get(step.key.as_str())?;
            current = match step.index {
                None => current,
                Some(StepIndex::At(i)) => current.as_sequence()?.get(i)?,
                Some(StepIndex::All) => current.as_sequence()?.first()?,
            };
        }
        Some(current)
    }
}

fn collect_mut<'a>(node: &'a mut Value, steps: &[PathStep], out: &mut Vec<&'a mut Value>) {
    let Some((step, rest)) = steps.split_first() else {
        out.push(node);
        return;
    };

    let Some(child) = node
        .as_mapping_mut()
        .and_then(|map| map.get_mut(step.key.as_str()))
    else {
        return;
    };

    match step.index {
        None => collect_mut(child, rest, out),
        Some(StepIndex::At(i)) => {
            if let Some(item) = child.as_sequence_mut().and_then(|seq| seq.get_mut(i)) {
                collect_mut(item, rest, out);
            }
        }
        Some(StepIndex::All) => {
            if let Some(seq) = child.as_sequence_mut() {
                for item in seq.iter_mut() {
                    collect_mut(item, rest, out);
                }
            }
        }
    }
}

impl FromStr for YamlPath {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| DocumentError::InvalidPath {
            selector: s.to_string(),
            message: message.to_string(),
        };

        if s.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut steps = Vec::new();
        for segment in s.split('.') {
            let (key, index) = match segment.find('[') {
                Some(open) => {
                    let Some(inner) = segment[open + 1..].strip_suffix(']') else {
                        return Err(invalid("unterminated index"));
                    };
                    let index = if inner == "*" {
                        StepIndex::All
                    } else {
                        inner
                            .parse::<usize>()
                            .map(StepIndex::At)
                            .map_err(|_| invalid("index must be a number or '*'"))?
                    };
                    (&segment[..open], Some(index))
                }
                None => (segment, None),
            };

            if key.is_empty() {
                return Err(invalid("empty key"));
            }

            steps.push(PathStep {
                key: key.to_string(),
                index,
            });
        }

        Ok(Self { steps })
    }
}

impl fmt::Display for YamlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&step.key)?;
            match step.index {
                Some(StepIndex::At(n)) => write!(f, "[{n}]")?,
                Some(StepIndex::All) => f.write_str("[*]")?,
                None => {}
            }
        }
        Ok(())
    }
}
