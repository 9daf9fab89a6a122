//! Piecewise assembly of the loader and build-task config trees
//!
//! Each feature contributes a fragment that is merged into a fixed base
//! skeleton. Merges are explicit (base and fragment in, new tree out),
//! applied in canonical feature order, and idempotent: merging a fragment
//! that is already present changes nothing. serde_json is built with
//! `preserve_order`, so key order is insertion order and the serialized
//! form is deterministic for a fixed flag set.

use crate::features::FeatureFlags;
use serde_json::{json, Value};

/// Build-task configuration plus the task names the build script must load
#[derive(Debug, Clone, PartialEq)]
pub struct BuildTasks {
    /// Structural config tree patched into the build script
    pub config: Value,
    /// Required task names, in registration order
    pub load_tasks: Vec<&'static str>,
}

/// Compose the module-loader bootstrap config
///
/// Skeleton: base path plus the two base path aliases. The styling feature
/// contributes one shim entry; the view library contributes its six path
/// aliases in a single merge step, never partially.
pub fn loader_config(flags: &FeatureFlags) -> Value {
    let mut config = json!({
        "baseUrl": "js",
        "shim": {},
        "paths": {
            "jquery": "vendor/jquery/dist/jquery",
            "underscore": "vendor/underscore/underscore"
        }
    });

    if flags.styling {
        merge_object(
            &mut config["shim"],
            &json!({
                "foundation": {
                    "deps": ["jquery"],
                    "exports": "jQuery.fn.foundation"
                }
            }),
        );
    }

    if flags.view_library {
        merge_object(
            &mut config["paths"],
            &json!({
                "backbone": "vendor/backbone/backbone",
                "Marionette": "vendor/marionette/lib/core/marionette",
                "backbone.wreqr": "vendor/backbone.wreqr/lib/backbone.wreqr",
                "backbone.babysitter": "vendor/backbone.babysitter/lib/backbone.babysitter",
                "handlebars": "vendor/handlebars/handlebars",
                "hbs": "vendor/requirejs-hbs/hbs"
            }),
        );
    }

    config
}

/// Compose the build-task config and required task names
///
/// Skeleton: a file-watch task with no targets. The styling feature adds a
/// Sass compilation task with a vendor target and an application target and
/// registers `grunt-sass`; the module loader registers
/// `grunt-contrib-requirejs` with no task body.
pub fn build_tasks(flags: &FeatureFlags) -> BuildTasks {
    let mut config = json!({
        "watch": {}
    });
    let mut load_tasks = vec!["grunt-contrib-watch"];

    if flags.styling {
        merge_object(
            &mut config,
            &json!({
                "sass": {
                    "options": {
                        "includePaths": ["app/js/vendor/foundation/scss"]
                    },
                    "foundation": {
                        "options": {
                            "outputStyle": "compressed",
                            "sourceMap": false
                        },
                        "files": {
                            "app/css/foundation.css": "app/scss/foundation.scss"
                        }
                    },
                    "app": {
                        "options": {
                            "outputStyle": "compressed",
                            "sourceMap": true
                        },
                        "files": {
                            "app/css/app.css": "app/scss/app.scss"
                        }
                    }
                }
            }),
        );
        push_task(&mut load_tasks, "grunt-sass");
    }

    if flags.module_loader {
        push_task(&mut load_tasks, "grunt-contrib-requirejs");
    }

    BuildTasks { config, load_tasks }
}

/// Merge `fragment` into `base`, key by key
///
/// Existing keys are left untouched, so the merge is idempotent and never
/// destroys what an earlier fragment contributed.
fn merge_object(base: &mut Value, fragment: &Value) {
    let (Some(base), Some(fragment)) = (base.as_object_mut(), fragment.as_object()) else {
        return;
    };
    for (key, value) in fragment {
        base.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

fn push_task(tasks: &mut Vec<&'static str>, task: &'static str) {
    if !tasks.contains(&task) {
        tasks.push(task);
    }
}
