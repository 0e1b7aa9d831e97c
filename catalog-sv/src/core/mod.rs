use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::serialize_object_id_as_hex_string;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::Error;

pub mod action;
pub mod error;

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BoxOffice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gross: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub name: String,
    pub year: String,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub box_office: BoxOffice,
}

/// Fields that may be set on an existing movie. `None` leaves the stored value alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieChangeset {
    pub name: Option<String>,
    pub year: Option<String>,
    pub directors: Option<Vec<String>>,
    pub writers: Option<Vec<String>>,
    pub budget: Option<u64>,
    pub gross: Option<u64>,
}

impl MovieChangeset {
    pub fn is_empty(&self) -> bool {
        self == &MovieChangeset::default()
    }
}

// a `null` field reads the same as an absent one
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// unknown fields (including a client supplied `id`) are ignored
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieParams {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub directors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub writers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub box_office: BoxOffice,
}

impl CreateMovieParams {
    fn create(&self) -> Movie {
        Movie {
            id: ObjectId::new(),
            name: self.name.clone(),
            year: self.year.clone(),
            directors: self.directors.clone(),
            writers: self.writers.clone(),
            box_office: self.box_office.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoxOfficeParams {
    pub budget: Option<u64>,
    pub gross: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieParams {
    pub name: Option<String>,
    pub year: Option<String>,
    pub directors: Option<Vec<String>>,
    pub writers: Option<Vec<String>>,
    pub box_office: Option<UpdateBoxOfficeParams>,
}

impl UpdateMovieParams {
    fn update(&self) -> Result<MovieChangeset, Error> {
        let box_office = self.box_office.clone().unwrap_or_default();
        let changeset = MovieChangeset {
            name: self.name.clone(),
            year: self.year.clone(),
            directors: self.directors.clone(),
            writers: self.writers.clone(),
            budget: box_office.budget,
            gross: box_office.gross,
        };

        if changeset.is_empty() {
            return Err(Error::InvalidRequest("no fields to update".to_string()));
        }

        Ok(changeset)
    }
}

/// Parses a path identifier. Anything that isn't an ObjectId can't name a stored movie.
pub fn parse_movie_id(raw: &str) -> Result<ObjectId, Error> {
    ObjectId::parse_str(raw).map_err(|_| Error::MovieNotFound(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_params_ignore_client_id_and_default_missing_fields() {
        let params: CreateMovieParams = serde_json::from_str(
            r#"{"id":"5f1d7f0e9d3b2a0001a1b2c3","name":"Heat"}"#
        ).unwrap();

        let movie = params.create();
        assert_ne!(movie.id.to_hex(), "5f1d7f0e9d3b2a0001a1b2c3");
        assert_eq!(movie.name, "Heat");
        assert_eq!(movie.year, "");
        assert!(movie.directors.is_empty());
        assert_eq!(movie.box_office, BoxOffice::default());
    }

    #[test]
    fn create_params_read_null_as_empty() {
        let params: CreateMovieParams = serde_json::from_str(
            r#"{"name":null,"directors":null,"writers":["Mann"],"boxOffice":{"budget":null,"gross":7}}"#
        ).unwrap();

        assert_eq!(params.name, "");
        assert!(params.directors.is_empty());
        assert_eq!(params.writers, vec!["Mann".to_string()]);
        assert_eq!(params.box_office, BoxOffice { budget: 0, gross: 7 });

        let params: CreateMovieParams = serde_json::from_str(r#"{"boxOffice":null}"#).unwrap();
        assert_eq!(params.box_office, BoxOffice::default());
    }

    #[test]
    fn create_params_reject_wrong_types() {
        let parsed = serde_json::from_str::<CreateMovieParams>(r#"{"boxOffice":{"budget":"lots"}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn movie_serializes_id_as_hex() {
        let movie = CreateMovieParams { name: "Heat".to_string(), ..Default::default() }.create();
        let json = serde_json::to_value(&movie).unwrap();

        assert_eq!(json["id"], movie.id.to_hex());
        assert_eq!(json["boxOffice"]["budget"], 0);
    }

    #[test]
    fn update_flattens_partial_box_office() {
        let params: UpdateMovieParams = serde_json::from_str(r#"{"boxOffice":{"gross":42}}"#).unwrap();
        let changeset = params.update().unwrap();

        assert_eq!(changeset.gross, Some(42));
        assert_eq!(changeset.budget, None);
        assert_eq!(changeset.name, None);
    }

    #[test]
    fn empty_update_is_invalid() {
        let params: UpdateMovieParams = serde_json::from_str(r#"{"id":"abc","boxOffice":{}}"#).unwrap();
        assert!(matches!(params.update(), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn malformed_ids_are_not_found() {
        assert!(matches!(parse_movie_id("doesnotexist123"), Err(Error::MovieNotFound(_))));
        assert!(parse_movie_id("5f1d7f0e9d3b2a0001a1b2c3").is_ok());
    }
}
