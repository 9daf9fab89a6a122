//! The one-shot generation pipeline
//!
//! Strictly sequential: resolve the template set, materialize it, run the
//! document passes in canonical feature order, then patch the build script
//! with the composed task config. Any failure aborts the remaining steps;
//! already-written files stay on disk and a re-run is the recovery path.

use crate::build_script;
use crate::config;
use crate::error::GenerateError;
use crate::features::{Feature, FeatureFlags};
use crate::html;
use crate::templates::{copier, resolver};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the prompt collector hands to the core, immutable afterwards
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub project_name: String,
    pub flags: FeatureFlags,
}

/// What a generation run produced
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Files written from templates, in materialization order
    pub files: Vec<PathBuf>,
    /// Document passes that actually changed the HTML file
    pub document_passes: usize,
    /// Task names registered in the build script
    pub load_tasks: Vec<&'static str>,
}

/// Generate the project skeleton into `project_dir`
pub fn generate(
    project_dir: &Path,
    opts: &GenerateOptions,
) -> Result<GenerateReport, GenerateError> {
    // Resolution validates every template id before anything is written
    let mappings = resolver::resolve_templates(&opts.flags, &opts.project_name)?;

    fs::create_dir_all(project_dir)?;
    let files = copier::materialize(&mappings, project_dir)?;

    let index = project_dir.join("app/index.html");
    let mut document_passes = 0;
    for feature in opts.flags.enabled_features() {
        // Only two features contribute markup; each pass is an atomic
        // read-modify-write of the file the previous pass completed
        if matches!(feature, Feature::ModuleLoader | Feature::Styling)
            && html::augment::run_pass(&index, feature)?
        {
            document_passes += 1;
        }
    }

    let tasks = config::build_tasks(&opts.flags);
    let gruntfile = project_dir.join("Gruntfile.js");
    let source = fs::read_to_string(&gruntfile)?;
    let patched = build_script::patch_init_config(&source, &tasks.config)?;
    fs::write(&gruntfile, patched)?;

    Ok(GenerateReport {
        files,
        document_passes,
        load_tasks: tasks.load_tasks,
    })
}
