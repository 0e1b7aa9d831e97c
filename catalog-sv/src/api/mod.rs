use actix_web::{delete, Error, get, HttpResponse, post, put, Responder, web};
use actix_web::http::header::ContentType;
use actix_web::web::{Json, scope};

use crate::core::{CreateMovieParams, UpdateMovieParams};
use crate::core::action;
use crate::core::error::Error as CatalogError;
use crate::db::MovieStore;

pub mod error;

/// Registers the health check and the `/v1` movie routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health)
        .service(scope("/v1")
            .service(post_movie)
            .service(get_movie)
            .service(put_movie)
            .service(delete_movie)
        );
}

// bodies are parsed whatever their content type; malformed ones get the same
// structured error as every other failure
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| CatalogError::InvalidRequest(err.to_string()).into())
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok()
}

#[post("/movies")]
pub async fn post_movie(
    store: web::Data<dyn MovieStore>,
    req: Json<CreateMovieParams>,
) -> Result<HttpResponse, Error> {
    let movie = action::create_movie(store.get_ref(), req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(movie))
}

#[get("/movies/{movie_id:[a-zA-Z0-9]+}")]
pub async fn get_movie(
    store: web::Data<dyn MovieStore>,
    movie_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let movie = action::find_one_movie(store.get_ref(), &movie_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(movie))
}

#[put("/movies/{movie_id:[a-zA-Z0-9]+}")]
pub async fn put_movie(
    store: web::Data<dyn MovieStore>,
    movie_id: web::Path<String>,
    req: Json<UpdateMovieParams>,
) -> Result<HttpResponse, Error> {
    let id = movie_id.into_inner();
    action::update_movie(store.get_ref(), &id, req.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(format!("movie {} updated", id)))
}

#[delete("/movies/{movie_id:[a-zA-Z0-9]+}")]
pub async fn delete_movie(
    store: web::Data<dyn MovieStore>,
    movie_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = movie_id.into_inner();
    action::delete_movie(store.get_ref(), &id).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(format!("movie {} deleted", id)))
}
