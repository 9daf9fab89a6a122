//! Feature-driven configuration composition
//!
//! Builds the two structural config trees consumed elsewhere in the
//! pipeline: the module-loader bootstrap config (rendered into
//! `app/js/init.js`) and the build-task config (patched into
//! `Gruntfile.js`).

pub mod compose;

pub use compose::{build_tasks, loader_config, BuildTasks};
