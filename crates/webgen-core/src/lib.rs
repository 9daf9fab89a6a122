//! Webgen Core - Composition engine for the `tryout` web-app generator
//!
//! This library scaffolds a web-application skeleton from a small set of
//! feature toggles (module loader, CSS framework, view library). The hard
//! part is the conditional composition engine:
//!
//! - **Layer 1: Resolution** - Pure mapping from feature flags to the ordered
//!   set of template files to materialize
//! - **Layer 2: Composition** - Structural HTML injection, nested config
//!   assembly, and surgical patching of the generated build script
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts
//!   (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use webgen_core::{FeatureFlags, GenerateOptions, pipeline};
//!
//! let opts = GenerateOptions {
//!     project_name: "demo".to_string(),
//!     flags: FeatureFlags { module_loader: true, styling: false, view_library: false },
//! };
//! let report = pipeline::generate(std::path::Path::new("demo"), &opts)?;
//! ```

pub mod build_script;
pub mod config;
pub mod error;
pub mod features;
pub mod html;
pub mod install;
pub mod pipeline;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::GenerateError;
pub use features::{Feature, FeatureFlags};
pub use pipeline::{generate, GenerateOptions, GenerateReport};
pub use templates::{resolve_templates, TemplateMapping};

#[cfg(feature = "tui")]
pub use tui::run;
