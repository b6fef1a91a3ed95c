//! Binding configuration - server-wide static settings.
//!
//! Set once at startup and shared by every request through
//! [`QueryBindingLayer`](crate::QueryBindingLayer).

use std::sync::Arc;

use gateway_query_core::ExclusionFilter;

/// Server-wide configuration for query parameter binding.
///
/// # Example
///
/// ```rust
/// use gateway_query::QueryBindingConfig;
///
/// // Default: path-template variables are excluded, nothing else is
/// let config = QueryBindingConfig::default();
///
/// // Also ignore tracking parameters set by a proxy
/// let config = QueryBindingConfig::new()
///     .with_reserved("utm")
///     .with_reserved("trace.id");
/// ```
#[derive(Clone, Debug)]
pub struct QueryBindingConfig {
    /// Prefixes that are never bound.
    reserved: Arc<ExclusionFilter>,
    /// Whether path-template variable names are excluded.
    exclude_path_params: bool,
}

impl Default for QueryBindingConfig {
    fn default() -> Self {
        Self {
            reserved: Arc::new(ExclusionFilter::new()),
            exclude_path_params: true,
        }
    }
}

impl QueryBindingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a dot-separated prefix; matching keys are never bound.
    pub fn with_reserved(mut self, prefix: impl AsRef<str>) -> Self {
        Arc::make_mut(&mut self.reserved).insert_dotted(prefix.as_ref());
        self
    }

    /// Set whether keys starting with a path-template variable name are skipped.
    ///
    /// Enabled by default, so a handler for `/books/{book.id}` never has the
    /// path value overwritten by `?book.id=...`.
    pub fn with_path_params_excluded(mut self, exclude: bool) -> Self {
        self.exclude_path_params = exclude;
        self
    }

    /// Get the filter of reserved prefixes.
    pub fn reserved(&self) -> &ExclusionFilter {
        &self.reserved
    }

    pub fn excludes_path_params(&self) -> bool {
        self.exclude_path_params
    }
}
