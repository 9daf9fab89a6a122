//! Static catalog of embedded template content
//!
//! Template ids are stable handles independent of the on-disk layout of the
//! `templates/` directory; resolver rules and tests refer to ids only.

use crate::error::GenerateError;

/// A piece of embedded boilerplate content
#[derive(Debug, Clone, Copy)]
pub struct Template {
    /// Stable identifier used by resolver rules
    pub id: &'static str,
    /// Raw template text (minijinja syntax)
    pub content: &'static str,
}

static CATALOG: &[Template] = &[
    Template {
        id: "bowerrc",
        content: include_str!("../../templates/_bowerrc"),
    },
    Template {
        id: "bower-manifest",
        content: include_str!("../../templates/_bower.json"),
    },
    Template {
        id: "package-manifest",
        content: include_str!("../../templates/_package.json"),
    },
    Template {
        id: "index-html",
        content: include_str!("../../templates/_index.html"),
    },
    Template {
        id: "dev-server",
        content: include_str!("../../templates/_server.js"),
    },
    Template {
        id: "css-main",
        content: include_str!("../../templates/css/main.css"),
    },
    Template {
        id: "gruntfile",
        content: include_str!("../../templates/_Gruntfile.js"),
    },
    Template {
        id: "loader-init",
        content: include_str!("../../templates/_init.js"),
    },
    Template {
        id: "loader-main",
        content: include_str!("../../templates/_main.js"),
    },
    Template {
        id: "scss-foundation",
        content: include_str!("../../templates/scss/_foundation.scss"),
    },
    Template {
        id: "scss-settings",
        content: include_str!("../../templates/scss/_settings.scss"),
    },
    Template {
        id: "scss-app",
        content: include_str!("../../templates/scss/_app.scss"),
    },
    Template {
        id: "base-item-view",
        content: include_str!("../../templates/js/_base-item-view.js"),
    },
    Template {
        id: "base-composite-view",
        content: include_str!("../../templates/js/_base-composite-view.js"),
    },
];

/// Look up a template by id
pub fn lookup(id: &str) -> Option<&'static Template> {
    CATALOG.iter().find(|t| t.id == id)
}

/// Look up a template by id, failing with a `MissingTemplate` error
///
/// A miss here is a programmer error in the resolver rules, caught before
/// any file is written.
pub fn require(id: &str) -> Result<&'static Template, GenerateError> {
    lookup(id).ok_or_else(|| GenerateError::MissingTemplate { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate template id");
            }
        }
    }

    #[test]
    fn lookup_finds_known_template() {
        let tpl = lookup("index-html").unwrap();
        assert!(tpl.content.contains("<title>"));
    }

    #[test]
    fn require_reports_missing_template() {
        let err = require("no-such-template").unwrap_err();
        assert!(matches!(
            err,
            GenerateError::MissingTemplate { ref id } if id == "no-such-template"
        ));
    }
}
