//! Feature-keyed structural edits to the generated HTML document
//!
//! Each contributing feature gets one pass over `app/index.html`: load the
//! current file, locate the anchor, inject, serialize, write. Passes run in
//! canonical feature order and each pass is an atomic read-modify-write, so
//! a later pass always sees the previous pass's insertions. A pass whose
//! element is already present is a no-op, which makes double invocation
//! harmless.

use crate::error::GenerateError;
use crate::features::Feature;
use crate::html::document::{Document, Element, Node};
use std::fs;
use std::path::Path;

/// Loader bootstrap script injected after the document title
pub const LOADER_SCRIPT_SRC: &str = "js/vendor/requirejs/require.js";
const LOADER_DATA_MAIN: &str = "js/init.js";

/// Stylesheets appended to the document head, vendor first
pub const VENDOR_STYLESHEET: &str = "css/foundation.css";
pub const APP_STYLESHEET: &str = "css/app.css";

/// Run one feature's pass against the HTML file on disk
///
/// The file is only rewritten after the whole edit succeeds; on any error
/// it is left in its pre-pass state. Returns whether anything changed.
pub fn run_pass(path: &Path, feature: Feature) -> Result<bool, GenerateError> {
    let file = path.display().to_string();
    let raw = fs::read_to_string(path)?;
    let mut doc = Document::parse(&raw).map_err(|e| GenerateError::MalformedMarkup {
        file: file.clone(),
        detail: e.detail,
    })?;

    let changed = inject_feature(&mut doc, feature, &file)?;
    if changed {
        fs::write(path, doc.render())?;
    }
    Ok(changed)
}

/// Apply a feature's structural edits to an in-memory document
pub fn inject_feature(
    doc: &mut Document,
    feature: Feature,
    file: &str,
) -> Result<bool, GenerateError> {
    match feature {
        Feature::ModuleLoader => inject_loader_script(doc, file),
        Feature::Styling => inject_stylesheets(doc, file),
        // The view library contributes files and config, never markup
        Feature::ViewLibrary => Ok(false),
    }
}

fn inject_loader_script(doc: &mut Document, file: &str) -> Result<bool, GenerateError> {
    if doc.contains_element("script", "src", LOADER_SCRIPT_SRC) {
        return Ok(false);
    }

    let script = Element::new("script")
        .attr("type", "text/javascript")
        .attr("src", LOADER_SCRIPT_SRC)
        .attr("data-main", LOADER_DATA_MAIN);

    if !doc.insert_after("title", Node::Element(script)) {
        return Err(GenerateError::AnchorNotFound {
            anchor: "title",
            file: file.to_string(),
        });
    }
    Ok(true)
}

fn inject_stylesheets(doc: &mut Document, file: &str) -> Result<bool, GenerateError> {
    let mut changed = false;
    // Vendor stylesheet first so application rules win the cascade
    for href in [VENDOR_STYLESHEET, APP_STYLESHEET] {
        if doc.contains_element("link", "href", href) {
            continue;
        }
        let link = Element::new("link")
            .attr("rel", "stylesheet")
            .attr("type", "text/css")
            .attr("href", href);
        if !doc.append_child("head", Node::Element(link)) {
            return Err(GenerateError::AnchorNotFound {
                anchor: "head",
                file: file.to_string(),
            });
        }
        changed = true;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASE: &str = "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\">\n    <title>demo</title>\n  </head>\n  <body>\n    <div id=\"app\"></div>\n  </body>\n</html>\n";

    fn base_doc() -> Document {
        Document::parse(BASE).unwrap()
    }

    #[test]
    fn loader_script_lands_after_title() {
        let mut doc = base_doc();
        assert!(inject_feature(&mut doc, Feature::ModuleLoader, "index.html").unwrap());

        let rendered = doc.render();
        let title = rendered.find("</title>").unwrap();
        let script = rendered.find("<script").unwrap();
        assert!(script > title);
        assert!(rendered.contains("data-main=\"js/init.js\""));
    }

    #[test]
    fn stylesheets_append_vendor_then_app() {
        let mut doc = base_doc();
        assert!(inject_feature(&mut doc, Feature::Styling, "index.html").unwrap());

        let rendered = doc.render();
        let vendor = rendered.find(VENDOR_STYLESHEET).unwrap();
        let app = rendered.find(APP_STYLESHEET).unwrap();
        assert!(vendor < app);
    }

    #[test]
    fn repeated_pass_is_a_no_op() {
        let mut doc = base_doc();
        assert!(inject_feature(&mut doc, Feature::ModuleLoader, "index.html").unwrap());
        assert!(!inject_feature(&mut doc, Feature::ModuleLoader, "index.html").unwrap());

        let rendered = doc.render();
        assert_eq!(rendered.matches("<script").count(), 1);
    }

    #[test]
    fn passes_are_cumulative_in_either_order() {
        let mut a = base_doc();
        inject_feature(&mut a, Feature::ModuleLoader, "a").unwrap();
        inject_feature(&mut a, Feature::Styling, "a").unwrap();

        let mut b = base_doc();
        inject_feature(&mut b, Feature::Styling, "b").unwrap();
        inject_feature(&mut b, Feature::ModuleLoader, "b").unwrap();

        for doc in [&a, &b] {
            assert!(doc.contains_element("script", "src", LOADER_SCRIPT_SRC));
            assert!(doc.contains_element("link", "href", VENDOR_STYLESHEET));
            assert!(doc.contains_element("link", "href", APP_STYLESHEET));
        }
    }

    #[test]
    fn view_library_contributes_no_markup() {
        let mut doc = base_doc();
        assert!(!inject_feature(&mut doc, Feature::ViewLibrary, "index.html").unwrap());
        assert_eq!(doc, base_doc());
    }

    #[test]
    fn missing_anchor_fails_and_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        let original = "<html><body><p>no head here</p></body></html>";
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(original.as_bytes()).unwrap();
        drop(f);

        let err = run_pass(&path, Feature::ModuleLoader).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::AnchorNotFound { anchor: "title", .. }
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn run_pass_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, BASE).unwrap();

        assert!(run_pass(&path, Feature::ModuleLoader).unwrap());
        assert!(run_pass(&path, Feature::Styling).unwrap());
        // Second module-loader pass reloads from disk and changes nothing
        assert!(!run_pass(&path, Feature::ModuleLoader).unwrap());

        let rendered = fs::read_to_string(&path).unwrap();
        assert_eq!(rendered.matches("<script").count(), 1);
        assert_eq!(rendered.matches("<link").count(), 2);
    }
}
