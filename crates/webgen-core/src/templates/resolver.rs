//! Resolution of feature flags into the ordered template set
//!
//! Pure function of the flags and the static catalog: no side effects, no
//! filesystem access. Base mappings come first, then per-feature mappings
//! in canonical feature order, so later passes can assume earlier artifacts
//! exist.

use crate::config;
use crate::error::GenerateError;
use crate::features::{Feature, FeatureFlags};
use crate::templates::catalog;
use serde_json::{json, Value};

/// One template to materialize
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMapping {
    /// Stable catalog id
    pub source_id: &'static str,
    /// Project-relative destination path
    pub destination: &'static str,
    /// Name/value substitutions applied when rendering
    pub context: Value,
}

/// Unconditional files, materialized for every flag combination
const BASE_RULES: &[(&str, &str)] = &[
    ("bowerrc", ".bowerrc"),
    ("bower-manifest", "bower.json"),
    ("package-manifest", "package.json"),
    ("index-html", "app/index.html"),
    ("dev-server", "server.js"),
    ("css-main", "app/css/main.css"),
    ("gruntfile", "Gruntfile.js"),
];

/// Files gated behind a single feature
const FEATURE_RULES: &[(Feature, &[(&str, &str)])] = &[
    (
        Feature::ModuleLoader,
        &[
            ("loader-init", "app/js/init.js"),
            ("loader-main", "app/js/main.js"),
        ],
    ),
    (
        Feature::Styling,
        &[
            ("scss-foundation", "app/scss/foundation.scss"),
            ("scss-settings", "app/scss/settings.scss"),
            ("scss-app", "app/scss/app.scss"),
        ],
    ),
    (
        Feature::ViewLibrary,
        &[
            ("base-item-view", "app/js/common/base-item-view.js"),
            ("base-composite-view", "app/js/common/base-composite-view.js"),
        ],
    ),
];

/// Resolve the ordered template set for a flag combination
///
/// Fails only if a rule references an id missing from the catalog, before
/// any file is written.
pub fn resolve_templates(
    flags: &FeatureFlags,
    project_name: &str,
) -> Result<Vec<TemplateMapping>, GenerateError> {
    let mut mappings = Vec::new();

    for &(source_id, destination) in BASE_RULES {
        mappings.push(mapping(source_id, destination, flags, project_name)?);
    }

    for feature in Feature::CANONICAL {
        if !flags.enabled(feature) {
            continue;
        }
        let rules = FEATURE_RULES
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, rules)| *rules)
            .unwrap_or(&[]);
        for &(source_id, destination) in rules {
            mappings.push(mapping(source_id, destination, flags, project_name)?);
        }
    }

    Ok(mappings)
}

fn mapping(
    source_id: &'static str,
    destination: &'static str,
    flags: &FeatureFlags,
    project_name: &str,
) -> Result<TemplateMapping, GenerateError> {
    catalog::require(source_id)?;
    Ok(TemplateMapping {
        source_id,
        destination,
        context: context_for(source_id, flags, project_name),
    })
}

/// Build the substitution context for one template
///
/// Every template sees the project name. The loader bootstrap additionally
/// receives the serialized loader config, and the build script receives its
/// task registration lines; both are pure functions of the flags, so the
/// whole mapping stays deterministic.
fn context_for(source_id: &str, flags: &FeatureFlags, project_name: &str) -> Value {
    let mut context = json!({ "name": project_name });

    match source_id {
        "loader-init" => {
            let rendered = serde_json::to_string_pretty(&config::loader_config(flags))
                .unwrap_or_else(|_| "{}".to_string());
            context["config"] = Value::String(rendered);
        }
        "gruntfile" => {
            let load = config::build_tasks(flags)
                .load_tasks
                .iter()
                .map(|task| format!("  grunt.loadNpmTasks('{}');\n", task))
                .collect::<String>();
            context["load"] = Value::String(load);
        }
        _ => {}
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(module_loader: bool, styling: bool, view_library: bool) -> FeatureFlags {
        FeatureFlags {
            module_loader,
            styling,
            view_library,
        }
    }

    fn destinations(flags: &FeatureFlags) -> Vec<&'static str> {
        resolve_templates(flags, "demo")
            .unwrap()
            .iter()
            .map(|m| m.destination)
            .collect()
    }

    #[test]
    fn base_files_resolve_for_every_combination() {
        for bits in 0..8u8 {
            let flags = flags(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let dests = destinations(&flags);
            for (_, base) in BASE_RULES {
                assert!(dests.contains(base), "missing {} for {:?}", base, flags);
            }
        }
    }

    #[test]
    fn output_is_union_of_base_and_enabled_features() {
        for bits in 0..8u8 {
            let flags = flags(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let dests = destinations(&flags);

            let mut expected = BASE_RULES.len();
            for (feature, rules) in FEATURE_RULES {
                let gated_present = rules.iter().all(|(_, d)| dests.contains(d));
                assert_eq!(gated_present, flags.enabled(*feature));
                if flags.enabled(*feature) {
                    expected += rules.len();
                }
            }
            assert_eq!(dests.len(), expected);

            // No duplicates
            let mut unique = dests.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), dests.len());
        }
    }

    #[test]
    fn base_files_come_before_feature_files_in_priority_order() {
        let dests = destinations(&flags(true, true, true));
        let idx = |d: &str| dests.iter().position(|x| *x == d).unwrap();
        assert!(idx("Gruntfile.js") < idx("app/js/init.js"));
        assert!(idx("app/js/init.js") < idx("app/scss/foundation.scss"));
        assert!(idx("app/scss/app.scss") < idx("app/js/common/base-item-view.js"));
    }

    #[test]
    fn loader_init_context_carries_serialized_config() {
        let mappings = resolve_templates(&flags(true, false, true), "demo").unwrap();
        let init = mappings
            .iter()
            .find(|m| m.source_id == "loader-init")
            .unwrap();
        let config = init.context["config"].as_str().unwrap();
        assert!(config.contains("\"baseUrl\": \"js\""));
        assert!(config.contains("backbone.wreqr"));
    }

    #[test]
    fn gruntfile_context_registers_tasks_in_order() {
        let mappings = resolve_templates(&flags(true, true, false), "demo").unwrap();
        let gruntfile = mappings.iter().find(|m| m.source_id == "gruntfile").unwrap();
        let load = gruntfile.context["load"].as_str().unwrap();
        let watch = load.find("grunt-contrib-watch").unwrap();
        let sass = load.find("grunt-sass").unwrap();
        let requirejs = load.find("grunt-contrib-requirejs").unwrap();
        assert!(watch < sass && sass < requirejs);
    }

    #[test]
    fn every_mapping_context_names_the_project() {
        for mapping in resolve_templates(&flags(true, true, true), "My App").unwrap() {
            assert_eq!(mapping.context["name"], "My App");
        }
    }
}
