// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
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
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # adc changes
//!
//! Describe and apply declarative configuration changes to an APISIX gateway.
//!
//! ## Overview
//!
//! A diff between locally declared resources and the gateway's current state
//! produces a list of [`Change`] records. Each record can be:
//!
//! - **described**: rendered as a one-line message, or for updates as a
//!   unified diff between the remote and local JSON representations
//! - **applied**: sent to the gateway through the sub-client for its
//!   resource kind
//!
//! ## Modules
//!
//! - [`resource`]: Resource kinds and the named-resource trait
//! - [`change`]: Change records, description and application
//! - [`client`]: Gateway client traits
//! - [`apisix`]: APISIX resource types and admin API client
//! - [`changeset`]: Change-set document loading
//! - [`executor`]: Sequential execution of change lists
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```
//! use adc_changes::apisix::Route;
//! use adc_changes::Change;
//!
//! let old = Route::new("r1").with_uri("/get").with_upstream_id("1");
//! let new = Route::new("r1").with_uri("/get").with_upstream_id("2");
//!
//! let text = Change::update(old, new).describe()?;
//! assert!(text.starts_with("updating route: \"r1\"\n--- remote\n+++ local\n"));
//! # Ok::<(), adc_changes::AdcError>(())
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod apisix;
pub mod change;
pub mod changeset;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod resource;

// ============================================================================
// Re-exports
// ============================================================================

pub use apisix::ApisixClient;
pub use change::{Change, Operation, OperationKind};
pub use changeset::{ChangeSet, ChangeSetParser};
pub use cli::{Cli, Commands, OutputFormatter};
pub use client::{Cluster, ResourceClient};
pub use config::ClusterConfig;
pub use error::{AdcError, Result};
pub use executor::{ChangeExecutor, ExecutionResult};
pub use resource::{Resource, ResourceKind};
