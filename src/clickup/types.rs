//! ClickUp API types.

use serde::{Deserialize, Serialize};

/// Body of `POST /list/{list_id}/task`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTaskRequest {
    /// Task name.
    pub name: String,
    /// Description in markdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_content: Option<String>,
    /// Assigned user ids.
    #[serde(default)]
    pub assignees: Vec<u64>,
    /// Sprint points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    /// Tag names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Parent task id, making this a subtask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with only a name and assignees.
    #[must_use]
    pub fn new(name: impl Into<String>, assignees: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            markdown_content: None,
            assignees,
            points: None,
            tags: Vec::new(),
            parent: None,
        }
    }

    /// Sets the markdown description.
    #[must_use]
    pub fn with_markdown(mut self, content: impl Into<String>) -> Self {
        self.markdown_content = Some(content.into());
        self
    }

    /// Sets the sprint points.
    #[must_use]
    pub const fn with_points(mut self, points: u32) -> Self {
        self.points = Some(points);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Makes this request a subtask of `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// A created task, as far as helmfix needs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Task id.
    pub id: String,
    /// Task name.
    #[serde(default)]
    pub name: Option<String>,
    /// Link to the task in the ClickUp UI.
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let request = CreateTaskRequest::new("Deploy", vec![7]).with_parent("abc");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "name": "Deploy", "assignees": [7], "parent": "abc" })
        );
    }

    #[test]
    fn test_markdown_is_escaped() {
        let request = CreateTaskRequest::new("Setup", vec![])
            .with_markdown("Before:\n* \"quoted\"")
            .with_points(3)
            .with_tags(vec![String::from("drop-in")]);
        let body = serde_json::to_string(&request).unwrap();

        assert!(body.contains(r#""markdown_content":"Before:\n* \"quoted\"""#));
        assert!(body.contains(r#""points":3"#));
        assert!(body.contains(r#""tags":["drop-in"]"#));
    }
}
