use log::{debug, info};

use crate::core::{parse_movie_id, CreateMovieParams, Movie, UpdateMovieParams};
use crate::core::error::Error;
use crate::db::MovieStore;

pub async fn create_movie(store: &dyn MovieStore, movie: CreateMovieParams) -> Result<Movie, Error> {
    info!("creating movie {:?}", movie);
    store.insert_movie(movie.create()).await
}

pub async fn find_one_movie(store: &dyn MovieStore, id: &str) -> Result<Movie, Error> {
    info!("finding movie id={}", id);
    let movie_id = parse_movie_id(id)?;

    store.find_one_movie(movie_id)
        .await?
        .ok_or_else(|| Error::MovieNotFound(id.to_string()))
}

pub async fn update_movie(store: &dyn MovieStore, id: &str, movie: UpdateMovieParams) -> Result<(), Error> {
    info!("updating movie id={} {:?}", id, movie);
    let movie_id = parse_movie_id(id)?;
    let changes = movie.update()?;

    if store.update_movie(movie_id, changes).await? {
        Ok(())
    } else {
        Err(Error::MovieNotFound(id.to_string()))
    }
}

pub async fn delete_movie(store: &dyn MovieStore, id: &str) -> Result<(), Error> {
    debug!("deleting movie id={}", id);
    let movie_id = parse_movie_id(id)?;

    if store.delete_movie(movie_id).await? {
        info!("deleted movie id={}", id);
        Ok(())
    } else {
        Err(Error::MovieNotFound(id.to_string()))
    }
}
