//! Collection options.

use std::collections::{BTreeMap, BTreeSet};

/// Options recognized by the closure engine.
///
/// Loaded from the driver's options file or built in code:
///
/// ```
/// use mpgen_schema::CollectorOptions;
///
/// let options = CollectorOptions::new()
///     .with_force_map_mode(true)
///     .ignore_type("Demo.External");
/// assert!(options.force_map_mode);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct CollectorOptions {
    /// Key every eligible member by name instead of requiring explicit keys.
    pub force_map_mode: bool,
    /// Type signatures excluded from the closure; their codecs are
    /// supplied elsewhere.
    pub ignored_type_names: BTreeSet<String>,
    /// Type signature to hand-written codec reference. Listed types are
    /// never classified.
    pub custom_formatter_catalog: BTreeMap<String, String>,
}

impl CollectorOptions {
    pub fn new() -> Self {
        CollectorOptions::default()
    }

    #[must_use]
    pub fn with_force_map_mode(mut self, force: bool) -> Self {
        self.force_map_mode = force;
        self
    }

    #[must_use]
    pub fn ignore_type(mut self, signature: impl Into<String>) -> Self {
        self.ignored_type_names.insert(signature.into());
        self
    }

    #[must_use]
    pub fn with_custom_formatter(
        mut self,
        signature: impl Into<String>,
        codec: impl Into<String>,
    ) -> Self {
        self.custom_formatter_catalog
            .insert(signature.into(), codec.into());
        self
    }
}
