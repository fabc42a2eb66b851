//! ClickUp API integration module.
//!
//! This module creates the onboarding task set for a new deployment
//! environment through the ClickUp REST API.

mod client;
mod onboarding;
mod types;

pub use client::{task_endpoint, ClickUpClient};
pub use onboarding::{OnboardingPlan, OnboardingPreview, OnboardingReport, PENDING_PARENT_ID};
pub use types::{CreateTaskRequest, Task};
