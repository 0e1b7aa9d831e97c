use log::debug;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CatalogError::{ServerError, UnexpectedStatusCode};

pub struct CatalogConfig {
    pub url: String,
}

impl CatalogConfig {
    fn movies_url(&self) -> String {
        format!("{}/v1/movies", self.url.trim_end_matches('/'))
    }

    fn movie_url(&self, id: &str) -> String {
        format!("{}/{}", self.movies_url(), id)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxOffice {
    pub budget: u64,
    pub gross: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub name: String,
    pub year: String,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub box_office: BoxOffice,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub name: String,
    pub year: String,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub box_office: BoxOffice,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoxOfficeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_office: Option<UpdateBoxOfficeRequest>,
}

/// The body the server sends with every non-success status.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("error calling server: {0}")]
    ClientError(#[from] reqwest::Error),
    #[error("server returned {status} {kind}: {message}")]
    ServerError { status: StatusCode, kind: String, message: String },
    #[error("unexpected status code {0}")]
    UnexpectedStatusCode(StatusCode),
}

fn error_from_body(status: StatusCode, body: &str) -> CatalogError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(e) => ServerError { status, kind: e.kind, message: e.error },
        Err(_) => UnexpectedStatusCode(status),
    }
}

async fn unexpected(res: Response) -> CatalogError {
    let status = res.status();
    match res.text().await {
        Ok(body) => error_from_body(status, &body),
        Err(_) => UnexpectedStatusCode(status),
    }
}

pub async fn get_movie(
    cfg: &CatalogConfig,
    id: &str,
) -> Result<Option<Movie>, CatalogError> {
    debug!("getting movie id={}", id);
    let res = reqwest::Client::new()
        .get(cfg.movie_url(id))
        .header("Accept", "application/json")
        .send()
        .await?;

    match res.status() {
        StatusCode::OK => {
            let m: Movie = res.json().await?;
            Ok(Some(m))
        }
        StatusCode::NOT_FOUND => Ok(None),
        _ => Err(unexpected(res).await)
    }
}

pub async fn create_movie(
    cfg: &CatalogConfig,
    req: &CreateMovieRequest,
) -> Result<Movie, CatalogError> {
    debug!("creating movie {:?}", req);
    let res = reqwest::Client::new()
        .post(cfg.movies_url())
        .json(req)
        .header("Accept", "application/json")
        .send()
        .await?;

    match res.status() {
        StatusCode::OK => {
            let m: Movie = res.json().await?;
            Ok(m)
        }
        _ => Err(unexpected(res).await)
    }
}

/// Returns false when the server has no movie with the given id.
pub async fn update_movie(
    cfg: &CatalogConfig,
    id: &str,
    req: &UpdateMovieRequest,
) -> Result<bool, CatalogError> {
    debug!("updating movie id={} {:?}", id, req);
    let res = reqwest::Client::new()
        .put(cfg.movie_url(id))
        .json(req)
        .send()
        .await?;

    match res.status() {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        _ => Err(unexpected(res).await)
    }
}

/// Returns false when the server has no movie with the given id.
pub async fn delete_movie(
    cfg: &CatalogConfig,
    id: &str,
) -> Result<bool, CatalogError> {
    debug!("deleting movie id={}", id);
    let res = reqwest::Client::new()
        .delete(cfg.movie_url(id))
        .send()
        .await?;

    match res.status() {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        _ => Err(unexpected(res).await)
    }
}
