//! Template materialization into the target directory
//!
//! Thin collaborator around the resolver: renders each mapping through
//! minijinja with its context and writes the result synchronously. The
//! pipeline relies on this running to completion before any document pass
//! or build-script patch, so the base files are guaranteed to exist.

use crate::error::GenerateError;
use crate::templates::catalog;
use crate::templates::resolver::TemplateMapping;
use minijinja::Environment;
use std::fs;
use std::path::{Path, PathBuf};

/// Render and write every mapping, returning the written paths in order
pub fn materialize(
    mappings: &[TemplateMapping],
    target_dir: &Path,
) -> Result<Vec<PathBuf>, GenerateError> {
    let env = environment();
    let mut written = Vec::with_capacity(mappings.len());

    for mapping in mappings {
        let template = catalog::require(mapping.source_id)?;
        let rendered = env
            .render_str(template.content, &mapping.context)
            .map_err(|source| GenerateError::Render {
                id: mapping.source_id.to_string(),
                source,
            })?;

        let destination = target_dir.join(mapping.destination);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&destination, rendered)?;
        written.push(destination);
    }

    Ok(written)
}

/// Substitution environment: plain text templates, no HTML escaping
fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureFlags;
    use crate::templates::resolver::resolve_templates;
    use serde_json::json;

    #[test]
    fn materialize_writes_base_files_with_substitution() {
        let dir = tempfile::tempdir().unwrap();
        let flags = FeatureFlags::default();
        let mappings = resolve_templates(&flags, "Sample App").unwrap();

        let written = materialize(&mappings, dir.path()).unwrap();
        assert_eq!(written.len(), mappings.len());

        let html = fs::read_to_string(dir.path().join("app/index.html")).unwrap();
        assert!(html.contains("<title>Sample App</title>"));

        let manifest = fs::read_to_string(dir.path().join("bower.json")).unwrap();
        assert!(manifest.contains("\"name\": \"Sample App\""));
    }

    #[test]
    fn materialize_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let flags = FeatureFlags {
            view_library: true,
            ..FeatureFlags::default()
        };
        let mappings = resolve_templates(&flags, "demo").unwrap();

        materialize(&mappings, dir.path()).unwrap();
        assert!(dir
            .path()
            .join("app/js/common/base-item-view.js")
            .exists());
    }

    #[test]
    fn unknown_source_id_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mappings = vec![TemplateMapping {
            source_id: "no-such-template",
            destination: "out.txt",
            context: json!({}),
        }];

        let err = materialize(&mappings, dir.path()).unwrap_err();
        assert!(matches!(err, GenerateError::MissingTemplate { .. }));
        assert!(!dir.path().join("out.txt").exists());
    }
}
