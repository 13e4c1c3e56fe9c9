//! Active display locale.

use std::sync::Arc;

use bazaar_core::Locale;
use tokio::sync::watch;
use tracing::info;

use crate::storage::{self, Storage, keys};

/// Holds the active locale and persists changes.
#[derive(Clone)]
pub struct LocaleStore {
    inner: Arc<LocaleStoreInner>,
}

struct LocaleStoreInner {
    storage: Arc<dyn Storage>,
    state: watch::Sender<Locale>,
}

impl LocaleStore {
    /// Create the store, reading the persisted locale. Missing or unsupported
    /// values start as the default locale.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let initial = Locale::normalize(storage.get(keys::LOCALE).as_deref());
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(LocaleStoreInner { storage, state }),
        }
    }

    /// Current locale.
    #[must_use]
    pub fn locale(&self) -> Locale {
        *self.inner.state.borrow()
    }

    /// Watch for locale changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.inner.state.subscribe()
    }

    /// Switch to the locale named by `tag`; unsupported tags select the
    /// default locale. Returns the locale now active.
    pub fn set_locale(&self, tag: &str) -> Locale {
        let locale = Locale::normalize(Some(tag));
        self.set(locale);
        locale
    }

    /// Switch to `locale`. Does nothing when it is already active.
    pub fn set(&self, locale: Locale) {
        let changed = self.inner.state.send_if_modified(|current| {
            if *current == locale {
                return false;
            }
            *current = locale;
            true
        });

        if changed {
            storage::persist(self.inner.storage.as_ref(), keys::LOCALE, locale.as_str());
            info!(locale = %locale, "Locale changed");
        }
    }
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("locale", &self.locale())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_reads_persisted_locale() {
        let storage = Arc::new(MemoryStorage::with_values([(keys::LOCALE, "en")]));
        assert_eq!(LocaleStore::new(storage).locale(), Locale::En);
    }

    #[test]
    fn test_invalid_persisted_locale_is_default() {
        let storage = Arc::new(MemoryStorage::with_values([(keys::LOCALE, "fr")]));
        assert_eq!(LocaleStore::new(storage).locale(), Locale::Ru);
    }

    #[test]
    fn test_set_locale_persists_and_notifies() {
        let storage = Arc::new(MemoryStorage::new());
        let store = LocaleStore::new(storage.clone());
        let mut rx = store.subscribe();

        assert_eq!(store.set_locale("en"), Locale::En);
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), Locale::En);
        assert_eq!(storage.get(keys::LOCALE).as_deref(), Some("en"));
    }

    #[test]
    fn test_set_same_locale_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let store = LocaleStore::new(storage.clone());
        let rx = store.subscribe();

        store.set(Locale::Ru);
        assert!(!rx.has_changed().unwrap_or(true));
        assert!(storage.get(keys::LOCALE).is_none());
    }

    #[test]
    fn test_set_unsupported_tag_selects_default() {
        let storage = Arc::new(MemoryStorage::with_values([(keys::LOCALE, "en")]));
        let store = LocaleStore::new(storage.clone());
        assert_eq!(store.set_locale("de"), Locale::Ru);
        assert_eq!(storage.get(keys::LOCALE).as_deref(), Some("ru"));
    }
}
