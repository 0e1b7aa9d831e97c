use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::core::{Movie, MovieChangeset};
use crate::core::error::Error;

pub mod memory;
pub mod mongo;
pub mod schema;

pub type StoreHandle = Arc<dyn MovieStore>;

/// Storage for movies. Every operation is a single call against the backing collection.
///
/// Implementations are shared across all server workers and must be safe for concurrent use.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, Error>;

    async fn find_one_movie(&self, movie_id: ObjectId) -> Result<Option<Movie>, Error>;

    /// Returns false when no movie has the given id.
    async fn update_movie(&self, movie_id: ObjectId, changes: MovieChangeset) -> Result<bool, Error>;

    /// Returns false when no movie has the given id.
    async fn delete_movie(&self, movie_id: ObjectId) -> Result<bool, Error>;

    /// Releases the connection. Called once after the server stops.
    async fn close(&self);
}
