//! Replacing a `${NAME}` placeholder command with the value from an env file.

use serde_yaml::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::document::{Rule, YamlPath};
use crate::error::DocumentError;

/// Selector for the first deployment's command array.
pub const COMMAND_SELECTOR: &str = "deployments[0].deploy.command";

/// Returns `NAME` for a token of the form `${NAME}`.
#[must_use]
pub fn placeholder_name(token: &str) -> Option<&str> {
    token
        .strip_prefix("${")?
        .strip_suffix('}')
        .filter(|name| !name.is_empty())
}

/// Splits a command line on whitespace, dropping empty tokens.
#[must_use]
pub fn tokenize(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

/// Substitutes placeholder commands from an environment map.
#[derive(Debug, Clone, Default)]
pub struct CommandFromEnv {
    env: HashMap<String, String>,
}

impl CommandFromEnv {
    /// Creates the rule over an environment map.
    #[must_use]
    pub const fn new(env: HashMap<String, String>) -> Self {
        Self { env }
    }

    /// Number of variables available for substitution.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.env.len()
    }
}

impl Rule for CommandFromEnv {
    type Tally = ();

    fn name(&self) -> &'static str {
        "fix-command"
    }

    fn apply(&self, target: &mut Value, at: &YamlPath) -> Result<Option<()>, DocumentError> {
        let Some(first) = target
            .as_sequence()
            .and_then(|command| command.first())
            .and_then(Value::as_str)
        else {
            return Ok(None);
        };
        let Some(name) = placeholder_name(first) else {
            return Ok(None);
        };
        let Some(replacement) = self.env.get(name) else {
            debug!("No value for ${{{name}}} at {at}");
            return Ok(None);
        };

        let tokens = tokenize(replacement);
        debug!("Replacing ${{{name}}} at {at} with {} tokens", tokens.len());
        *target = Value::Sequence(tokens.into_iter().map(Value::String).collect());
        Ok(Some(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::transform;

    fn rule() -> CommandFromEnv {
        CommandFromEnv::new(HashMap::from([(
            String::from("FOO"),
            String::from("  java   -jar app.jar "),
        )]))
    }

    fn selector() -> YamlPath {
        COMMAND_SELECTOR.parse().unwrap()
    }

    fn command_of(doc: &Value) -> Vec<String> {
        selector()
            .select(doc)
            .and_then(Value::as_sequence)
            .map(|s| s.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_placeholder_name() {
        assert_eq!(placeholder_name("${FOO}"), Some("FOO"));
        assert_eq!(placeholder_name("FOO"), None);
        assert_eq!(placeholder_name("${FOO"), None);
        assert_eq!(placeholder_name("${}"), None);
    }

    #[test]
    fn test_substitutes_known_placeholder() {
        let mut doc: Value =
            serde_yaml::from_str("deployments:\n  - deploy:\n      command: ['${FOO}']\n").unwrap();
        let result = transform(&mut doc, &selector(), &rule()).unwrap();

        assert_eq!(result.modified, 1);
        assert_eq!(command_of(&doc), vec!["java", "-jar", "app.jar"]);
    }

    #[test]
    fn test_unknown_placeholder_is_untouched() {
        let mut doc: Value =
            serde_yaml::from_str("deployments:\n  - deploy:\n      command: ['${BAR}', x]\n").unwrap();
        let before = doc.clone();
        let result = transform(&mut doc, &selector(), &rule()).unwrap();

        assert!(result.is_unchanged());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_only_first_deployment_is_considered() {
        let mut doc: Value = serde_yaml::from_str(
            "deployments:\n  - deploy:\n      command: [java]\n  - deploy:\n      command: ['${FOO}']\n",
        )
        .unwrap();
        let result = transform(&mut doc, &selector(), &rule()).unwrap();
        assert!(result.is_unchanged());
    }

    #[test]
    fn test_empty_or_non_string_command_is_skipped() {
        for command in ["[]", "[42]", "java"] {
            let mut doc: Value = serde_yaml::from_str(&format!(
                "deployments:\n  - deploy:\n      command: {command}\n"
            ))
            .unwrap();
            assert!(transform(&mut doc, &selector(), &rule()).unwrap().is_unchanged());
        }
    }
}
