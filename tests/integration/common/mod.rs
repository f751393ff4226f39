//! Shared fixtures for integration tests

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use book_catalog::{
    api::create_router,
    error::AppResult,
    models::Book,
    repository::{CrudRepository, Entity, Repository, UpdateOutcome},
    services::Services,
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

/// What another writer does to a record between an update's read and write
#[derive(Debug, Clone, Copy)]
pub enum Interference {
    Modify,
    Delete,
}

struct Store<T> {
    next_id: i32,
    /// id -> (version, record)
    rows: BTreeMap<i32, (i32, T)>,
    interference: HashMap<i32, Interference>,
}

/// Store-in-a-map repository with server-assigned, increasing identifiers
/// and version-checked updates
pub struct InMemoryRepository<T> {
    inner: Mutex<Store<T>>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Store {
                next_id: 0,
                rows: BTreeMap::new(),
                interference: HashMap::new(),
            }),
        }
    }
}

impl<T> InMemoryRepository<T> {
    /// Make the next update of `id` race with another writer
    pub fn interfere(&self, id: i32, interference: Interference) {
        self.inner.lock().unwrap().interference.insert(id, interference);
    }
}

#[async_trait]
impl<T: Entity> CrudRepository<T> for InMemoryRepository<T> {
    async fn get_all(&self) -> AppResult<Vec<T>> {
        let store = self.inner.lock().unwrap();
        Ok(store.rows.values().map(|(_, row)| row.clone()).collect())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<T>> {
        let store = self.inner.lock().unwrap();
        Ok(store.rows.get(&id).map(|(_, row)| row.clone()))
    }

    async fn save(&self, mut entity: T) -> AppResult<T> {
        let mut store = self.inner.lock().unwrap();
        store.next_id += 1;
        let id = store.next_id;
        entity.set_id(id);
        store.rows.insert(id, (0, entity.clone()));
        Ok(entity)
    }

    async fn update(&self, id: i32, mut entity: T) -> AppResult<UpdateOutcome<T>> {
        let mut store = self.inner.lock().unwrap();
        let Some(read_version) = store.rows.get(&id).map(|(version, _)| *version) else {
            return Ok(UpdateOutcome::NotFound);
        };

        match store.interference.remove(&id) {
            Some(Interference::Modify) => {
                if let Some((version, _)) = store.rows.get_mut(&id) {
                    *version += 1;
                }
            }
            Some(Interference::Delete) => {
                store.rows.remove(&id);
            }
            None => {}
        }

        match store.rows.get_mut(&id) {
            Some((version, existing)) if *version == read_version => {
                entity.set_id(id);
                *version += 1;
                *existing = entity.clone();
                Ok(UpdateOutcome::Updated(entity))
            }
            _ => Ok(UpdateOutcome::Conflict),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<Option<T>> {
        let mut store = self.inner.lock().unwrap();
        Ok(store.rows.remove(&id).map(|(_, row)| row))
    }
}

/// Router over an in-memory book store, with a handle on the store
pub fn app_with_store() -> (Router, Arc<InMemoryRepository<Book>>) {
    let books: Arc<InMemoryRepository<Book>> = Arc::new(InMemoryRepository::default());
    let services = Services::new(Repository::with_books(books.clone()));
    let app = create_router(AppState {
        services: Arc::new(services),
    });
    (app, books)
}

/// Router backed by a fresh in-memory book store
pub fn app() -> Router {
    app_with_store().0
}

/// Send a JSON request and decode the JSON response (`Null` when empty)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
