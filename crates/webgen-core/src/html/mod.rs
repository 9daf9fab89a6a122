//! Structural HTML handling
//!
//! This module provides:
//! - A minimal owned document tree (parse, locate, insert, serialize)
//! - The per-feature augmentation passes over the generated document

pub mod augment;
pub mod document;

pub use augment::{inject_feature, run_pass};
pub use document::{Document, Element, Node};
