use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use super::collection::{Collection, Document, RepositoryError};
use super::object_id::ObjectId;
use crate::query::{Filter, SortOrder, Window};

/// Mutex-guarded collection held in process memory.
///
/// Cloning shares the underlying documents, so one instance can back several
/// services at once.
pub struct MemoryCollection<T> {
    documents: Arc<Mutex<BTreeMap<ObjectId, T>>>,
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self {
            documents: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl<T> Clone for MemoryCollection<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
        }
    }
}

impl<T: Document> MemoryCollection<T> {
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<ObjectId, T>>, RepositoryError> {
        self.documents
            .lock()
            .map_err(|_| RepositoryError::Unavailable(format!("{} store lock poisoned", T::KIND)))
    }

    fn matching<'a>(
        documents: impl Iterator<Item = &'a T>,
        filter: &Filter,
    ) -> Result<Vec<(&'a T, Value)>, RepositoryError> {
        let mut matched = Vec::new();
        for document in documents {
            let encoded = serde_json::to_value(document)
                .map_err(|err| RepositoryError::Encoding(err.to_string()))?;
            if filter.matches(&encoded) {
                matched.push((document, encoded));
            }
        }
        Ok(matched)
    }

    fn clashes(
        documents: &BTreeMap<ObjectId, T>,
        candidate: &T,
        key: &Filter,
    ) -> Result<bool, RepositoryError> {
        let others = documents.values().filter(|existing| existing.id() != candidate.id());
        Ok(!Self::matching(others, key)?.is_empty())
    }
}

impl<T: Document> Collection<T> for MemoryCollection<T> {
    fn insert(&self, document: T) -> Result<T, RepositoryError> {
        let mut guard = self.lock()?;
        let id = document.id();
        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(id, document.clone());
        Ok(document)
    }

    fn insert_unique(&self, document: T, key: &Filter) -> Result<T, RepositoryError> {
        let mut guard = self.lock()?;
        let id = document.id();
        if guard.contains_key(&id) || Self::clashes(&guard, &document, key)? {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(id, document.clone());
        Ok(document)
    }

    fn replace(&self, document: T) -> Result<T, RepositoryError> {
        let mut guard = self.lock()?;
        match guard.get_mut(&document.id()) {
            Some(slot) => {
                *slot = document.clone();
                Ok(document)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn replace_unique(&self, document: T, key: &Filter) -> Result<T, RepositoryError> {
        let mut guard = self.lock()?;
        if !guard.contains_key(&document.id()) {
            return Err(RepositoryError::NotFound);
        }
        if Self::clashes(&guard, &document, key)? {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(document.id(), document.clone());
        Ok(document)
    }

    fn get(&self, id: &ObjectId) -> Result<Option<T>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn find(
        &self,
        filter: &Filter,
        sort: SortOrder,
        window: Window,
    ) -> Result<Vec<T>, RepositoryError> {
        let guard = self.lock()?;
        let mut matched = Self::matching(guard.values(), filter)?;
        matched.sort_by(|left, right| sort.compare((left.0, &left.1), (right.0, &right.1)));

        let limit = window.limit.unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(window.skip)
            .take(limit)
            .map(|(document, _)| document.clone())
            .collect())
    }

    fn count(&self, filter: &Filter) -> Result<u64, RepositoryError> {
        let guard = self.lock()?;
        Ok(Self::matching(guard.values(), filter)?.len() as u64)
    }

    fn delete(&self, id: &ObjectId) -> Result<Option<T>, RepositoryError> {
        let mut guard = self.lock()?;
        Ok(guard.remove(id))
    }

    fn delete_many(&self, filter: &Filter) -> Result<u64, RepositoryError> {
        let mut guard = self.lock()?;
        let doomed: Vec<ObjectId> = Self::matching(guard.values(), filter)?
            .into_iter()
            .map(|(document, _)| document.id())
            .collect();
        for id in &doomed {
            guard.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Note {
        id: ObjectId,
        position: String,
        owner_id: String,
        created_at: DateTime<Utc>,
    }

    impl Document for Note {
        const KIND: &'static str = "Note";

        fn id(&self) -> ObjectId {
            self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
    }

    fn note(position: &str, owner: &str, minutes: i64) -> Note {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single().expect("valid");
        Note {
            id: ObjectId::new(),
            position: position.to_string(),
            owner_id: owner.to_string(),
            created_at: base + Duration::minutes(minutes),
        }
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let store = MemoryCollection::default();
        let first = note("Welder", "a", 0);
        store.insert(first.clone()).expect("first insert");
        assert!(matches!(store.insert(first), Err(RepositoryError::Conflict)));
    }

    #[test]
    fn replace_requires_existing_document() {
        let store: MemoryCollection<Note> = MemoryCollection::default();
        assert!(matches!(
            store.replace(note("Welder", "a", 0)),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn find_sorts_then_windows() {
        let store = MemoryCollection::default();
        for minutes in 0..6 {
            store.insert(note("Welder", "a", minutes)).expect("insert");
        }

        let window = Window {
            skip: 2,
            limit: Some(2),
        };
        let page = store
            .find(&Filter::default(), SortOrder::Oldest, window)
            .expect("find");
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single().expect("valid");
        let minutes: Vec<i64> = page
            .iter()
            .map(|note| (note.created_at - base).num_minutes())
            .collect();
        assert_eq!(minutes, vec![2, 3]);
    }

    #[test]
    fn delete_many_removes_only_matching_documents() {
        let store = MemoryCollection::default();
        store.insert(note("Welder", "a", 0)).expect("insert");
        store.insert(note("Baker", "a", 1)).expect("insert");
        store.insert(note("Baker", "b", 2)).expect("insert");

        let removed = store
            .delete_many(&Filter::default().with_equal("ownerId", "a"))
            .expect("delete");
        assert_eq!(removed, 2);
        assert_eq!(store.count(&Filter::default()).expect("count"), 1);

        let again = store
            .delete_many(&Filter::default().with_equal("ownerId", "a"))
            .expect("delete twice");
        assert_eq!(again, 0);
    }

    #[test]
    fn unique_writes_refuse_a_clashing_key() {
        let store = MemoryCollection::default();
        let welder = store.insert(note("Welder", "a", 0)).expect("insert");
        let key = |n: &Note| Filter::default().with_equal("position", n.position.as_str());

        let twin = note("Welder", "b", 1);
        assert!(matches!(
            store.insert_unique(twin.clone(), &key(&twin)),
            Err(RepositoryError::Conflict)
        ));

        let baker = note("Baker", "b", 2);
        let baker = store.insert_unique(baker.clone(), &key(&baker)).expect("distinct key");

        let renamed = Note {
            position: "Welder".to_string(),
            ..baker.clone()
        };
        assert!(matches!(
            store.replace_unique(renamed.clone(), &key(&renamed)),
            Err(RepositoryError::Conflict)
        ));

        let touched = Note {
            owner_id: "c".to_string(),
            ..welder.clone()
        };
        store
            .replace_unique(touched.clone(), &key(&touched))
            .expect("a document never clashes with itself");
        assert_eq!(store.count(&Filter::default()).expect("count"), 2);
    }

    #[test]
    fn concurrent_unique_inserts_store_one_document() {
        use std::sync::Barrier;
        use std::thread;

        let store: MemoryCollection<Note> = MemoryCollection::default();
        let key = Filter::default().with_equal("position", "Welder");
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = store.clone();
                let key = key.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.insert_unique(note("Welder", "a", n), &key).is_ok()
                })
            })
            .collect();

        let stored = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .filter(|ok| *ok)
            .count();
        assert_eq!(stored, 1);
        assert_eq!(store.count(&key).expect("count"), 1);
    }

    #[test]
    fn clones_share_documents() {
        let store = MemoryCollection::default();
        let shared = store.clone();
        let saved = store.insert(note("Welder", "a", 0)).expect("insert");
        assert!(shared.get(&saved.id).expect("get").is_some());
    }
}
