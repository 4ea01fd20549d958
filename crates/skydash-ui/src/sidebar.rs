use std::sync::Arc;

use skydash_core::{AppError, KeyValueStore};

pub const SIDEBAR_EXPANDED_KEY: &str = "sidebarExpanded";

/// Expanded/collapsed sidebar, persisted as a JSON boolean.
pub struct SidebarState {
    expanded: bool,
    store: Arc<dyn KeyValueStore>,
}

impl SidebarState {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let expanded = match store.get(SIDEBAR_EXPANDED_KEY) {
            Some(raw) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring saved sidebar state {:?}: {}", raw, e);
                true
            }),
            None => true,
        };
        Self { expanded, store }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) -> Result<bool, AppError> {
        self.set_expanded(!self.expanded)?;
        Ok(self.expanded)
    }

    /// The new state applies even when it cannot be saved.
    pub fn set_expanded(&mut self, expanded: bool) -> Result<(), AppError> {
        self.expanded = expanded;
        let value = if expanded { "true" } else { "false" };
        self.store.set(SIDEBAR_EXPANDED_KEY, value).map_err(|e| {
            tracing::warn!("Failed to save sidebar state: {}", e);
            AppError::from(e)
        })
    }
}

impl std::fmt::Debug for SidebarState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidebarState")
            .field("expanded", &self.expanded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skydash_core::{FilePreferences, MemoryPreferences};

    #[test]
    fn test_defaults_to_expanded() {
        let sidebar = SidebarState::load(Arc::new(MemoryPreferences::new()));
        assert!(sidebar.is_expanded());
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryPreferences::new();
        let mut sidebar = SidebarState::load(Arc::new(store.clone()));

        assert!(!sidebar.toggle().unwrap());
        assert_eq!(store.get(SIDEBAR_EXPANDED_KEY).as_deref(), Some("false"));

        let reloaded = SidebarState::load(Arc::new(store));
        assert!(!reloaded.is_expanded());
    }

    #[test]
    fn test_unsaved_collapse_still_applies() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = FilePreferences::open(blocker.join("preferences.json"));
        let mut sidebar = SidebarState::load(Arc::new(store));

        let err = sidebar.set_expanded(false).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(!sidebar.is_expanded());
    }

    #[test]
    fn test_corrupted_value_defaults_to_expanded() {
        let store = MemoryPreferences::with(SIDEBAR_EXPANDED_KEY, "maybe");
        let sidebar = SidebarState::load(Arc::new(store));
        assert!(sidebar.is_expanded());
    }
}
