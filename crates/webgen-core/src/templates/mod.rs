//! Template catalog, resolution, and materialization
//!
//! This module provides:
//! - The static catalog of embedded template content (stable ids)
//! - Resolution of feature flags into an ordered copy list
//! - Rendering and writing of the resolved set

pub mod catalog;
pub mod copier;
pub mod resolver;

pub use catalog::Template;
pub use copier::materialize;
pub use resolver::{resolve_templates, TemplateMapping};
