//! Error taxonomy for the generation pipeline
//!
//! Every variant here is fatal: generation aborts and already-written files
//! are left in place. Re-running the generator is the recovery strategy.

use thiserror::Error;

/// Errors raised by the composition engine
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A resolver rule referenced a template id that is not in the catalog.
    /// Raised before any file is written.
    #[error("template '{id}' is not in the catalog")]
    MissingTemplate { id: String },

    /// A document pass could not locate its insertion anchor. The target
    /// file is left in its pre-pass state.
    #[error("anchor element <{anchor}> not found in {file}")]
    AnchorNotFound { anchor: &'static str, file: String },

    /// The markup could not be parsed into a document tree.
    #[error("malformed markup in {file}: {detail}")]
    MalformedMarkup { file: String, detail: String },

    /// The build script did not contain exactly one patchable call
    /// expression with the expected arity.
    #[error("expected exactly one '{callee}' call with one argument, found {matches}")]
    PatchTarget { callee: &'static str, matches: usize },

    /// Template text substitution failed.
    #[error("failed to render template '{id}'")]
    Render {
        id: String,
        #[source]
        source: minijinja::Error,
    },

    /// Filesystem errors are propagated unchanged, never retried.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
