//! Memory resource injection from JVM `-Xmx` flags.
//!
//! For every deployment whose command carries `-Xmx<N><unit>` at a fixed
//! position, `resources.requests.memory` is set to the heap size and
//! `resources.limits.memory` to the heap size scaled by a factor.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use tracing::debug;

use crate::document::{Rule, Tally, YamlPath};
use crate::error::DocumentError;

/// Prefix of the JVM maximum heap flag.
pub const XMX_PREFIX: &str = "-Xmx";

/// Default position of the `-Xmx` token in a deployment command.
pub const DEFAULT_XMX_POSITION: usize = 3;

/// Default ratio between the memory limit and the memory request.
pub const DEFAULT_LIMIT_FACTOR: f64 = 1.5;

/// Selector for every deployment's `deploy` block.
pub const DEPLOY_SELECTOR: &str = "deployments[*].deploy";

const MIB_PER_GIB: f64 = 1024.0;

/// Unit of a JVM memory quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemoryUnit {
    /// `m`, rendered as `Mi`.
    Mebibytes,
    /// `g`, rendered as `Gi`.
    Gibibytes,
}

impl MemoryUnit {
    /// Parses a JVM unit suffix.
    #[must_use]
    pub const fn from_suffix(c: char) -> Option<Self> {
        match c {
            'm' => Some(Self::Mebibytes),
            'g' => Some(Self::Gibibytes),
            _ => None,
        }
    }

    /// Returns the Kubernetes quantity suffix.
    #[must_use]
    pub const fn k8s_suffix(self) -> &'static str {
        match self {
            Self::Mebibytes => "Mi",
            Self::Gibibytes => "Gi",
        }
    }

    /// Converts a magnitude in this unit to gibibytes.
    #[must_use]
    pub fn to_gi(self, magnitude: f64) -> f64 {
        match self {
            Self::Mebibytes => magnitude / MIB_PER_GIB,
            Self::Gibibytes => magnitude,
        }
    }
}

/// A positive memory size parsed from a JVM flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemoryQuantity {
    /// Numeric part, always finite and greater than zero.
    pub magnitude: f64,
    /// Unit suffix.
    pub unit: MemoryUnit,
}

impl MemoryQuantity {
    /// Parses the value part of an `-Xmx` flag, e.g. `4g` or `512m`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let unit = MemoryUnit::from_suffix(value.chars().last()?)?;
        let magnitude: f64 = value[..value.len() - 1].parse().ok()?;

        if !magnitude.is_finite() || magnitude <= 0.0 {
            return None;
        }

        Some(Self { magnitude, unit })
    }

    /// Parses a full `-Xmx<N><unit>` token.
    #[must_use]
    pub fn from_xmx_token(token: &str) -> Option<Self> {
        Self::parse(token.strip_prefix(XMX_PREFIX)?)
    }

    /// Returns this quantity scaled by `factor` and rounded to a whole number.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            magnitude: (self.magnitude * factor).round(),
            unit: self.unit,
        }
    }

    /// Returns the size in gibibytes.
    #[must_use]
    pub fn as_gi(self) -> f64 {
        self.unit.to_gi(self.magnitude)
    }
}

impl fmt::Display for MemoryQuantity {
    /// Formats as a Kubernetes quantity, e.g. `4Gi` or `1.5Gi`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.k8s_suffix())
    }
}

/// Memory totals in gibibytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemoryTally {
    /// Sum of the heap sizes found.
    pub original_gi: f64,
    /// Sum of the heap sizes multiplied by the limit factor.
    pub limit_gi: f64,
}

impl MemoryTally {
    /// Absolute increase in gibibytes.
    #[must_use]
    pub fn increase_gi(&self) -> f64 {
        self.limit_gi - self.original_gi
    }

    /// Relative increase in percent, rounded to the nearest integer.
    ///
    /// Returns `None` when no memory was counted.
    #[must_use]
    pub fn increase_percent(&self) -> Option<f64> {
        (self.original_gi > 0.0).then(|| ((self.limit_gi / self.original_gi - 1.0) * 100.0).round())
    }
}

impl Tally for MemoryTally {
    fn merge(&mut self, other: &Self) {
        self.original_gi += other.original_gi;
        self.limit_gi += other.limit_gi;
    }
}

/// Injects memory requests and limits into a `deploy` block.
#[derive(Debug, Clone, Copy)]
pub struct ResourceLimits {
    xmx_position: usize,
    limit_factor: f64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self::new(DEFAULT_XMX_POSITION, DEFAULT_LIMIT_FACTOR)
    }
}

impl ResourceLimits {
    /// Creates the rule.
    #[must_use]
    pub const fn new(xmx_position: usize, limit_factor: f64) -> Self {
        Self {
            xmx_position,
            limit_factor,
        }
    }

    /// Finds the heap size in a `deploy` block, if present and well-formed.
    #[must_use]
    pub fn find_heap(&self, deploy: &Mapping) -> Option<MemoryQuantity> {
        let command = deploy.get("command")?.as_sequence()?;
        let token = command.get(self.xmx_position)?.as_str()?;
        MemoryQuantity::from_xmx_token(token)
    }
}

impl Rule for ResourceLimits {
    type Tally = MemoryTally;

    fn name(&self) -> &'static str {
        "add-limits"
    }

    fn apply(&self, target: &mut Value, at: &YamlPath) -> Result<Option<MemoryTally>, DocumentError> {
        let Some(deploy) = target.as_mapping_mut() else {
            return Ok(None);
        };
        let Some(heap) = self.find_heap(deploy) else {
            return Ok(None);
        };

        let limit = heap.scaled(self.limit_factor);
        let at = at.to_string();

        let resources = child_mapping(deploy, "resources", &at)?;
        child_mapping(resources, "requests", &at)?
            .insert(Value::from("memory"), Value::from(heap.to_string()));
        child_mapping(resources, "limits", &at)?
            .insert(Value::from("memory"), Value::from(limit.to_string()));

        debug!("Set memory request {heap} and limit {limit} at {at}");

        Ok(Some(MemoryTally {
            original_gi: heap.as_gi(),
            limit_gi: heap.unit.to_gi(heap.magnitude * self.limit_factor),
        }))
    }
}

/// Returns the mapping stored under `key`, creating it when absent or null.
fn child_mapping<'a>(
    parent: &'a mut Mapping,
    key: &str,
    at: &str,
) -> Result<&'a mut Mapping, DocumentError> {
    let slot = parent.entry(Value::from(key)).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Mapping(Mapping::new());
    }
    slot.as_mapping_mut()
        .ok_or_else(|| DocumentError::shape(format!("{at}.{key}"), "expected a mapping"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::transform;

    fn deploy_doc(command: &str) -> Value {
        serde_yaml::from_str(&format!(
            "deployments:\n  - name: api\n    deploy:\n      command: {command}\n"
        ))
        .unwrap()
    }

    fn memory_at(doc: &Value, section: &str) -> Option<String> {
        let path: YamlPath = format!("deployments[0].deploy.resources.{section}.memory")
            .parse()
            .unwrap();
        path.select(doc).and_then(Value::as_str).map(str::to_string)
    }

    fn selector() -> YamlPath {
        DEPLOY_SELECTOR.parse().unwrap()
    }

    #[test]
    fn test_parse_memory_quantity() {
        let q = MemoryQuantity::from_xmx_token("-Xmx4g").unwrap();
        assert_eq!(q.unit, MemoryUnit::Gibibytes);
        assert!((q.magnitude - 4.0).abs() < f64::EPSILON);

        let q = MemoryQuantity::from_xmx_token("-Xmx512m").unwrap();
        assert_eq!(q.unit, MemoryUnit::Mebibytes);
        assert!((q.as_gi() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for token in ["-Xmx", "-Xmxg", "-Xmx4k", "-Xmx4G", "-Xms4g", "-Xmx0g", "-Xmx-2g", "-Xmxabcm"] {
            assert!(MemoryQuantity::from_xmx_token(token).is_none(), "{token}");
        }
    }

    #[test]
    fn test_gigabyte_limits() {
        let mut doc = deploy_doc("[java, -jar, app.jar, -Xmx4g]");
        let result = transform(&mut doc, &selector(), &ResourceLimits::default()).unwrap();

        assert_eq!(result.modified, 1);
        assert_eq!(memory_at(&doc, "requests").as_deref(), Some("4Gi"));
        assert_eq!(memory_at(&doc, "limits").as_deref(), Some("6Gi"));
        assert!((result.tally.original_gi - 4.0).abs() < f64::EPSILON);
        assert!((result.tally.limit_gi - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_megabyte_limits_round() {
        let mut doc = deploy_doc("[java, -jar, app.jar, -Xmx333m]");
        transform(&mut doc, &selector(), &ResourceLimits::default()).unwrap();

        assert_eq!(memory_at(&doc, "requests").as_deref(), Some("333Mi"));
        // 333 * 1.5 = 499.5
        assert_eq!(memory_at(&doc, "limits").as_deref(), Some("500Mi"));
    }

    #[test]
    fn test_skips_short_or_missing_command() {
        let rule = ResourceLimits::default();
        for command in ["[java, -Xmx4g]", "[java, -jar, app.jar, -Xms4g]", "[java, -jar, app.jar, 42]", "null"] {
            let mut doc = deploy_doc(command);
            let before = doc.clone();
            let result = transform(&mut doc, &selector(), &rule).unwrap();
            assert!(result.is_unchanged(), "{command}");
            assert_eq!(doc, before);
        }
    }

    #[test]
    fn test_preserves_existing_resources() {
        let mut doc: Value = serde_yaml::from_str(
            r"
deployments:
  - deploy:
      command: [java, -jar, app.jar, -Xmx2g]
      resources:
        requests:
          cpu: 500m
",
        )
        .unwrap();
        transform(&mut doc, &selector(), &ResourceLimits::default()).unwrap();

        let cpu: YamlPath = "deployments[0].deploy.resources.requests.cpu".parse().unwrap();
        assert_eq!(cpu.select(&doc).and_then(Value::as_str), Some("500m"));
        assert_eq!(memory_at(&doc, "limits").as_deref(), Some("3Gi"));
    }

    #[test]
    fn test_non_mapping_resources_is_an_error() {
        let mut doc: Value = serde_yaml::from_str(
            "deployments:\n  - deploy:\n      command: [java, -jar, app.jar, -Xmx2g]\n      resources: none\n",
        )
        .unwrap();
        assert!(transform(&mut doc, &selector(), &ResourceLimits::default()).is_err());
    }

    #[test]
    fn test_every_deployment_is_visited() {
        let mut doc: Value = serde_yaml::from_str(
            r"
deployments:
  - deploy:
      command: [java, -jar, a.jar, -Xmx1g]
  - deploy:
      command: [java, -jar, b.jar, -Xmx512m]
  - name: no-deploy
",
        )
        .unwrap();
        let result = transform(&mut doc, &selector(), &ResourceLimits::default()).unwrap();
        assert_eq!(result.modified, 2);
        assert!((result.tally.original_gi - 1.5).abs() < f64::EPSILON);
        assert!((result.tally.limit_gi - 2.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_increase_percent() {
        let tally = MemoryTally {
            original_gi: 10.0,
            limit_gi: 15.0,
        };
        assert_eq!(tally.increase_percent(), Some(50.0));
        assert!((tally.increase_gi() - 5.0).abs() < f64::EPSILON);
        assert_eq!(MemoryTally::default().increase_percent(), None);
    }

    #[test]
    fn test_fractional_request_is_kept() {
        let q = MemoryQuantity::from_xmx_token("-Xmx1.5g").unwrap();
        assert_eq!(q.to_string(), "1.5Gi");
        assert_eq!(q.scaled(1.5).to_string(), "2Gi");
    }
}
