//! Feature toggles driving the conditional composition engine

use std::fmt;

/// The named boolean toggles collected once before generation begins.
///
/// Immutable after collection: every component takes this by shared
/// reference and composes in the canonical [`Feature::CANONICAL`] order,
/// never in iteration order over a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Include RequireJS and generate its bootstrap config
    pub module_loader: bool,
    /// Include Foundation with Sass compilation tasks
    pub styling: bool,
    /// Include Marionette base views and loader path aliases
    pub view_library: bool,
}

impl FeatureFlags {
    pub fn enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::ModuleLoader => self.module_loader,
            Feature::Styling => self.styling,
            Feature::ViewLibrary => self.view_library,
        }
    }

    /// Enabled features in canonical priority order
    pub fn enabled_features(&self) -> Vec<Feature> {
        Feature::CANONICAL
            .iter()
            .copied()
            .filter(|f| self.enabled(*f))
            .collect()
    }
}

/// The composable features, ordered by priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    ModuleLoader,
    Styling,
    ViewLibrary,
}

impl Feature {
    /// Canonical composition order. The stylesheet framework composes before
    /// the view library so later passes can assume earlier artifacts exist.
    pub const CANONICAL: [Feature; 3] = [
        Feature::ModuleLoader,
        Feature::Styling,
        Feature::ViewLibrary,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::ModuleLoader => "RequireJS",
            Feature::Styling => "Foundation",
            Feature::ViewLibrary => "Marionette",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
