//! Onboarding checklist for a new deployment environment.
//!
//! One parent task describes the before/after state of the environment; the
//! fixed list of subtasks is created under it, in order, once the parent id
//! is known. The first failed request stops the run.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ClickUpConfig;
use crate::error::Result;

use super::client::{task_endpoint, ClickUpClient};
use super::types::{CreateTaskRequest, Task};

/// Parent id shown in previews, before the parent task exists.
pub const PENDING_PARENT_ID: &str = "<main-task-id>";

/// Onboarding task set for one environment.
#[derive(Debug, Clone)]
pub struct OnboardingPlan {
    environment_code: String,
    player_ui_url: String,
    admin_ui_url: String,
    assignees: Vec<u64>,
    points: u32,
    tags: Vec<String>,
}

/// Tasks created by [`OnboardingPlan::execute`].
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingReport {
    /// Environment code the tasks were created for.
    pub environment_code: String,
    /// The parent task.
    pub main_task: Task,
    /// The subtasks, in creation order.
    pub subtasks: Vec<Task>,
}

/// Request bodies a run would send, for `--dry-run`.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingPreview {
    /// Endpoint the requests would be posted to.
    pub endpoint: String,
    /// The parent task body.
    pub main_task: CreateTaskRequest,
    /// The subtask bodies, parented to [`PENDING_PARENT_ID`].
    pub subtasks: Vec<CreateTaskRequest>,
}

impl OnboardingPlan {
    /// Builds the plan from the `clickup` configuration section.
    #[must_use]
    pub fn from_config(config: &ClickUpConfig) -> Self {
        Self {
            environment_code: config.environment_code.clone(),
            player_ui_url: config.player_ui_url.clone(),
            admin_ui_url: config.admin_ui_url.clone(),
            assignees: config.assignees.clone(),
            points: config.points,
            tags: config.tags.clone(),
        }
    }

    /// Name of the parent task.
    #[must_use]
    pub fn main_task_name(&self) -> String {
        format!("DevOps - New Deploy Environment - {} - Setup", self.environment_code)
    }

    /// Markdown description of the parent task.
    #[must_use]
    pub fn main_task_description(&self) -> String {
        let env = &self.environment_code;
        format!(
            "Before:\n\
             * No {env} environment\n\
             \n\
             After:\n\
             * {env} is available for deploy in DM\n\
             * {env} player UI is accessible via {player}\n\
             * {env} admin UI is accessible via {admin}",
            player = self.player_ui_url,
            admin = self.admin_ui_url,
        )
    }

    /// Request body of the parent task.
    #[must_use]
    pub fn main_task(&self) -> CreateTaskRequest {
        CreateTaskRequest::new(self.main_task_name(), self.assignees.clone())
            .with_markdown(self.main_task_description())
            .with_points(self.points)
            .with_tags(self.tags.clone())
    }

    /// Names of the subtasks, in creation order.
    #[must_use]
    pub fn subtask_names(&self) -> Vec<String> {
        let env = &self.environment_code;
        vec![
            String::from("Install Ubuntu 24.04 on a dedicated server via Kotlin script"),
            String::from("Install PostgreSQL 18 on the dedicated server via Kotlin script"),
            String::from("Add newly configured server to Inventory"),
            String::from("Run the Kotlin script to sync UFW rules"),
            format!("Set up {env} env code in mono repository (with merge request)"),
            format!("Set up {env} env code in mono-devops repository (with merge request)"),
            format!("Upload GitLab variables for {env} in mono-devops repository"),
            String::from("Deploy delivery-manager from master"),
            format!("Deploy {env} from DM"),
            String::from("Deploy auth-service from current release"),
            String::from("Add system-services in mono-manifests repository (without merge request)"),
            String::from("Configure DNS in Cloudflare for Player UI and Admin UI"),
            String::from("Enable environment in Kubernetes configuration"),
        ]
    }

    /// Request bodies of the subtasks under `parent_id`.
    #[must_use]
    pub fn subtasks(&self, parent_id: &str) -> Vec<CreateTaskRequest> {
        self.subtask_names()
            .into_iter()
            .map(|name| CreateTaskRequest::new(name, self.assignees.clone()).with_parent(parent_id))
            .collect()
    }

    /// Builds the request bodies without sending them.
    #[must_use]
    pub fn preview(&self, api_url: &str, list_id: &str) -> OnboardingPreview {
        OnboardingPreview {
            endpoint: task_endpoint(api_url, list_id),
            main_task: self.main_task(),
            subtasks: self.subtasks(PENDING_PARENT_ID),
        }
    }

    /// Creates the parent task, then every subtask under it.
    ///
    /// # Errors
    ///
    /// Returns the first request failure; tasks created before it are kept
    /// on the ClickUp side.
    pub async fn execute(&self, client: &ClickUpClient, list_id: &str) -> Result<OnboardingReport> {
        info!("Creating onboarding tasks for {}", self.environment_code);

        let main_task = client.create_task(list_id, &self.main_task()).await?;
        info!("Created main task {}", main_task.id);

        let requests = self.subtasks(&main_task.id);
        let mut subtasks = Vec::with_capacity(requests.len());
        for request in &requests {
            let task = client.create_task(list_id, request).await?;
            debug!("Created subtask {} '{}'", task.id, request.name);
            subtasks.push(task);
        }

        info!("Created {} subtasks", subtasks.len());
        Ok(OnboardingReport {
            environment_code: self.environment_code.clone(),
            main_task,
            subtasks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn plan() -> OnboardingPlan {
        OnboardingPlan::from_config(&ClickUpConfig {
            list_id: String::from("42"),
            environment_code: String::from("SHOP__PRD"),
            player_ui_url: String::from("https://shop.example.com/"),
            admin_ui_url: String::from("https://admin.shop.example.com/"),
            assignees: vec![94_689_332],
            ..ClickUpConfig::default()
        })
    }

    #[test]
    fn test_main_task() {
        let task = plan().main_task();

        assert_eq!(task.name, "DevOps - New Deploy Environment - SHOP__PRD - Setup");
        assert_eq!(task.points, Some(3));
        assert_eq!(task.tags, vec!["drop-in", "sprint goal"]);
        assert_eq!(task.assignees, vec![94_689_332]);
        assert!(task.parent.is_none());

        let markdown = task.markdown_content.unwrap();
        assert!(markdown.starts_with("Before:\n* No SHOP__PRD environment\n\nAfter:\n"));
        assert!(markdown.ends_with("* SHOP__PRD admin UI is accessible via https://admin.shop.example.com/"));
    }

    #[test]
    fn test_subtasks() {
        let subtasks = plan().subtasks("86abc");

        assert_eq!(subtasks.len(), 13);
        assert!(subtasks.iter().all(|t| t.parent.as_deref() == Some("86abc")));
        assert!(subtasks.iter().all(|t| t.points.is_none() && t.tags.is_empty()));
        assert_eq!(subtasks[8].name, "Deploy SHOP__PRD from DM");
        assert_eq!(subtasks[12].name, "Enable environment in Kubernetes configuration");
    }

    #[tokio::test]
    async fn test_execute_parents_subtasks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list/42/task"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "86abc" })))
            .expect(14)
            .mount(&server)
            .await;

        let client = ClickUpClient::with_base_url("tok", &server.uri()).unwrap();
        let report = plan().execute(&client, "42").await.unwrap();

        assert_eq!(report.main_task.id, "86abc");
        assert_eq!(report.subtasks.len(), 13);

        let requests = server.received_requests().await.unwrap();
        let first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert!(first.get("parent").is_none());
        assert_eq!(second["parent"], "86abc");
    }

    #[tokio::test]
    async fn test_execute_stops_at_first_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "parent": "86abc" })))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "86abc" })))
            .mount(&server)
            .await;

        let client = ClickUpClient::with_base_url("tok", &server.uri()).unwrap();
        assert!(plan().execute(&client, "42").await.is_err());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn test_preview_sends_nothing() {
        let preview = plan().preview("http://127.0.0.1:9/", "42");

        assert_eq!(preview.endpoint, "http://127.0.0.1:9/list/42/task");
        assert_eq!(preview.subtasks[0].parent.as_deref(), Some(PENDING_PARENT_ID));
    }
}
