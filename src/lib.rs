// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Helmfix
//!
//! Batch fixes for directories of Helm values files, plus the ClickUp
//! onboarding checklist for a new deployment environment.
//!
//! ## Overview
//!
//! Every values command follows the same shape:
//!
//! 1. **Load**: read each `.yaml`/`.yml` file of a directory, in name order
//! 2. **Transform**: locate fields by structural path and apply one rule
//! 3. **Write back**: rewrite only the files that changed, then summarise
//!
//! A file that cannot be parsed or has an unexpected structure is reported
//! and skipped; the remaining files are still processed.
//!
//! ## Modules
//!
//! - [`config`]: Configuration parsing, env files and validation
//! - [`document`]: Path selectors, the `Rule` trait and the batch runner
//! - [`rules`]: The concrete values rules and the set difference
//! - [`clickup`]: ClickUp API client and onboarding plan
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! deployments:
//!   - deploy:
//!       command: ["java", "-jar", "app.jar", "-Xmx4g"]
//! ```
//!
//! `helmfix add-limits` turns this into:
//!
//! ```yaml
//! deployments:
//!   - deploy:
//!       command: ["java", "-jar", "app.jar", "-Xmx4g"]
//!       resources:
//!         requests:
//!           memory: 4Gi
//!         limits:
//!           memory: 6Gi
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod clickup;
pub mod config;
pub mod document;
pub mod error;
pub mod rules;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use clickup::{ClickUpClient, OnboardingPlan};
pub use config::{ConfigParser, ConfigValidator, HelmfixConfig};
pub use document::{run_batch, BatchReport, Rule, Transformer, ValuesDir, YamlPath};
pub use error::{HelmfixError, Result};
pub use rules::{CommandFromEnv, CommentKeys, JobMetadata, ResourceLimits, SetDifference};
