use std::collections::HashMap;
use std::convert::TryFrom;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use log::debug;
use mongodb::bson::oid::ObjectId;

use crate::core::{Movie, MovieChangeset};
use crate::core::error::Error;
use crate::db::MovieStore;
use crate::db::schema::MovieDocument;

/// In-process movie store.
///
/// Intended for tests and local runs without a database. Documents go through the
/// same conversions as the mongo store so limits on stored values match.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    movies: RwLock<HashMap<ObjectId, MovieDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<ObjectId, MovieDocument>>, Error> {
        self.movies.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<ObjectId, MovieDocument>>, Error> {
        self.movies.write().map_err(poisoned)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::StoreUnavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl MovieStore for InMemoryStore {
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, Error> {
        let document = MovieDocument::try_from(&movie)?;
        let mut movies = self.write()?;

        if movies.contains_key(&document.id) {
            return Err(Error::DuplicateId(document.id.to_hex()));
        }

        debug!("inserting {:?}", document);
        movies.insert(document.id, document);
        Ok(movie)
    }

    async fn find_one_movie(&self, movie_id: ObjectId) -> Result<Option<Movie>, Error> {
        let movies = self.read()?;
        Ok(movies.get(&movie_id).cloned().map(Movie::from))
    }

    async fn update_movie(&self, movie_id: ObjectId, changes: MovieChangeset) -> Result<bool, Error> {
        let mut movies = self.write()?;

        match movies.get(&movie_id) {
            None => Ok(false),
            Some(existing) => {
                let mut updated = existing.clone();
                updated.apply(&changes)?;

                debug!("updating {:?}", updated);
                movies.insert(movie_id, updated);
                Ok(true)
            }
        }
    }

    async fn delete_movie(&self, movie_id: ObjectId) -> Result<bool, Error> {
        let mut movies = self.write()?;
        Ok(movies.remove(&movie_id).is_some())
    }

    async fn close(&self) {
        if let Ok(movies) = self.read() {
            debug!("dropping {} in-memory movies", movies.len());
        }
    }
}
