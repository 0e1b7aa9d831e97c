use std::convert::TryFrom;

use async_trait::async_trait;
use log::{debug, info};
use mongodb::{Client, Collection};
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;

use crate::core::{Movie, MovieChangeset};
use crate::core::error::Error;
use crate::db::MovieStore;
use crate::db::schema::{id_filter, set_document, MovieDocument};

/// A movie store backed by one long lived MongoDB client.
///
/// The driver keeps its own connection pool, so clones of the collection handle
/// are shared freely between workers.
pub struct MongoStore {
    client: Client,
    movies: Collection<MovieDocument>,
}

impl MongoStore {
    /// Connects and pings the server. The driver connects lazily, so the ping is
    /// what surfaces an unreachable database before any requests are served.
    pub async fn connect(url: &str, database: &str, collection: &str) -> Result<Self, Error> {
        let client = Client::with_uri_str(url).await?;

        client.database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;

        info!("connected to mongodb database={} collection={}", database, collection);

        let movies = client.database(database).collection::<MovieDocument>(collection);
        Ok(MongoStore { client, movies })
    }
}

#[async_trait]
impl MovieStore for MongoStore {
    async fn insert_movie(&self, movie: Movie) -> Result<Movie, Error> {
        let document = MovieDocument::try_from(&movie)?;

        debug!("inserting {:?}", document);

        self.movies.insert_one(&document, None).await?;
        Ok(movie)
    }

    async fn find_one_movie(&self, movie_id: ObjectId) -> Result<Option<Movie>, Error> {
        let filter = id_filter(movie_id);

        debug!("find one {}", filter);

        let found = self.movies.find_one(filter, None).await?;
        Ok(found.map(Movie::from))
    }

    async fn update_movie(&self, movie_id: ObjectId, changes: MovieChangeset) -> Result<bool, Error> {
        let filter = id_filter(movie_id);
        let update = set_document(&changes)?;

        debug!("update {} {}", filter, update);

        let result = self.movies.update_one(filter, update, None).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_movie(&self, movie_id: ObjectId) -> Result<bool, Error> {
        let filter = id_filter(movie_id);

        debug!("delete {}", filter);

        let result = self.movies.delete_one(filter, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn close(&self) {
        info!("closing mongodb client");
        self.client.clone().shutdown().await;
    }
}
