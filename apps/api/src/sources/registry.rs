use std::sync::Arc;

use crate::sources::JobSource;
use crate::sources::providers::{ArbeitnowProvider, MockProvider, RemoteOkProvider};

/// Holds all known job source providers, in registration order.
///
/// Constructed once at startup and injected where needed (no process-wide
/// singleton). `get_by_ids` silently drops unknown or unavailable ids so a
/// search referencing a since-removed provider degrades gracefully instead
/// of failing the whole fetch.
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn JobSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every built-in provider.
    pub fn with_default_providers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MockProvider::new()));
        registry.register(Arc::new(RemoteOkProvider::new()));
        registry.register(Arc::new(ArbeitnowProvider::new()));
        registry
    }

    pub fn register(&mut self, source: Arc<dyn JobSource>) {
        self.sources.push(source);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn JobSource>> {
        self.sources.iter().find(|s| s.id() == id).cloned()
    }

    pub fn get_all(&self) -> Vec<Arc<dyn JobSource>> {
        self.sources.clone()
    }

    pub fn get_available(&self) -> Vec<Arc<dyn JobSource>> {
        self.sources
            .iter()
            .filter(|s| s.is_available())
            .cloned()
            .collect()
    }

    /// Resolves the requested ids in the caller's order. An empty request
    /// means "all available providers".
    pub fn get_by_ids(&self, ids: &[String]) -> Vec<Arc<dyn JobSource>> {
        if ids.is_empty() {
            return self.get_available();
        }
        ids.iter()
            .filter_map(|id| self.get(id))
            .filter(|s| s.is_available())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{JobSearchQuery, JobSourceResult};
    use async_trait::async_trait;

    struct StubSource {
        id: &'static str,
        available: bool,
    }

    #[async_trait]
    impl JobSource for StubSource {
        fn id(&self) -> &'static str {
            self.id
        }
        fn name(&self) -> &'static str {
            "Stub"
        }
        fn is_available(&self) -> bool {
            self.available
        }
        async fn fetch_jobs(&self, _query: &JobSearchQuery) -> JobSourceResult {
            JobSourceResult::default()
        }
    }

    fn registry() -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubSource {
            id: "alpha",
            available: true,
        }));
        registry.register(Arc::new(StubSource {
            id: "beta",
            available: false,
        }));
        registry.register(Arc::new(StubSource {
            id: "gamma",
            available: true,
        }));
        registry
    }

    #[test]
    fn test_get_by_id() {
        let registry = registry();
        assert!(registry.get("alpha").is_some());
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_get_available_filters_unavailable() {
        let registry = registry();
        let ids: Vec<_> = registry.get_available().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["alpha", "gamma"]);
    }

    #[test]
    fn test_get_by_ids_empty_means_all_available() {
        let registry = registry();
        let ids: Vec<_> = registry.get_by_ids(&[]).iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["alpha", "gamma"]);
    }

    #[test]
    fn test_get_by_ids_preserves_requested_order() {
        let registry = registry();
        let requested = vec!["gamma".to_string(), "alpha".to_string()];
        let ids: Vec<_> = registry
            .get_by_ids(&requested)
            .iter()
            .map(|s| s.id())
            .collect();
        assert_eq!(ids, vec!["gamma", "alpha"]);
    }

    #[test]
    fn test_get_by_ids_silently_drops_unknown_and_unavailable() {
        let registry = registry();
        let requested = vec![
            "unknown-id".to_string(),
            "beta".to_string(),
            "alpha".to_string(),
        ];
        let ids: Vec<_> = registry
            .get_by_ids(&requested)
            .iter()
            .map(|s| s.id())
            .collect();
        assert_eq!(ids, vec!["alpha"]);
    }

    #[test]
    fn test_get_by_ids_all_unknown_returns_empty_not_error() {
        let registry = registry();
        assert!(registry.get_by_ids(&["unknown-id".to_string()]).is_empty());
    }

    #[test]
    fn test_default_providers_registered_in_order() {
        let registry = SourceRegistry::with_default_providers();
        let ids: Vec<_> = registry.get_all().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["mock", "remoteok", "arbeitnow"]);
    }
}
