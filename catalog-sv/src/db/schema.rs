use std::convert::TryFrom;

use log::warn;
use mongodb::bson::{doc, Document};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::core::{BoxOffice, Movie, MovieChangeset};
use crate::core::error::Error;

pub const DEFAULT_DATABASE: &str = "appdb";
pub const DEFAULT_COLLECTION: &str = "movies";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoxOfficeDocument {
    #[serde(default)]
    pub budget: i64,
    #[serde(default)]
    pub gross: i64,
}

/// A movie as stored in the `movies` collection.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub box_office: BoxOfficeDocument,
}

fn stored_amount(field: &str, amount: u64) -> Result<i64, Error> {
    i64::try_from(amount)
        .map_err(|_| Error::InvalidRequest(format!("{} {} is too large to store", field, amount)))
}

// negative amounts can only come from writes made outside this service
fn loaded_amount(id: &ObjectId, field: &str, amount: i64) -> u64 {
    u64::try_from(amount).unwrap_or_else(|_| {
        warn!("movie id={} has negative {} {}, reading it as 0", id, field, amount);
        0
    })
}

impl TryFrom<&Movie> for MovieDocument {
    type Error = Error;

    fn try_from(movie: &Movie) -> Result<Self, Error> {
        Ok(MovieDocument {
            id: movie.id,
            name: movie.name.clone(),
            year: movie.year.clone(),
            directors: movie.directors.clone(),
            writers: movie.writers.clone(),
            box_office: BoxOfficeDocument {
                budget: stored_amount("budget", movie.box_office.budget)?,
                gross: stored_amount("gross", movie.box_office.gross)?,
            },
        })
    }
}

impl From<MovieDocument> for Movie {
    fn from(d: MovieDocument) -> Self {
        Movie {
            id: d.id,
            name: d.name,
            year: d.year,
            directors: d.directors,
            writers: d.writers,
            box_office: BoxOffice {
                budget: loaded_amount(&d.id, "budget", d.box_office.budget),
                gross: loaded_amount(&d.id, "gross", d.box_office.gross),
            },
        }
    }
}

impl MovieDocument {
    pub fn apply(&mut self, changes: &MovieChangeset) -> Result<(), Error> {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(year) = &changes.year {
            self.year = year.clone();
        }
        if let Some(directors) = &changes.directors {
            self.directors = directors.clone();
        }
        if let Some(writers) = &changes.writers {
            self.writers = writers.clone();
        }
        if let Some(budget) = changes.budget {
            self.box_office.budget = stored_amount("budget", budget)?;
        }
        if let Some(gross) = changes.gross {
            self.box_office.gross = stored_amount("gross", gross)?;
        }
        Ok(())
    }
}

pub fn id_filter(movie_id: ObjectId) -> Document {
    doc! { "_id": movie_id }
}

/// Builds the `$set` update for a changeset. Box office fields use dotted paths
/// so a partial box office leaves its sibling untouched.
pub fn set_document(changes: &MovieChangeset) -> Result<Document, Error> {
    let mut set = Document::new();

    if let Some(name) = &changes.name {
        set.insert("name", name.clone());
    }
    if let Some(year) = &changes.year {
        set.insert("year", year.clone());
    }
    if let Some(directors) = &changes.directors {
        set.insert("directors", directors.clone());
    }
    if let Some(writers) = &changes.writers {
        set.insert("writers", writers.clone());
    }
    if let Some(budget) = changes.budget {
        set.insert("boxOffice.budget", stored_amount("budget", budget)?);
    }
    if let Some(gross) = changes.gross {
        set.insert("boxOffice.gross", stored_amount("gross", gross)?);
    }

    Ok(doc! { "$set": set })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie {
            id: ObjectId::new(),
            name: "Inception".to_string(),
            year: "2010".to_string(),
            directors: vec!["Nolan".to_string()],
            writers: vec!["Nolan".to_string()],
            box_office: BoxOffice { budget: 160_000_000, gross: 829_000_000 },
        }
    }

    #[test]
    fn document_uses_mongo_field_names() {
        let m = movie();
        let d = MovieDocument::try_from(&m).unwrap();
        let bson = mongodb::bson::to_document(&d).unwrap();

        assert_eq!(bson.get_object_id("_id").unwrap(), m.id);
        assert_eq!(bson.get_document("boxOffice").unwrap().get_i64("gross").unwrap(), 829_000_000);
        assert_eq!(Movie::from(d), m);
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        let mut m = movie();
        m.box_office.gross = u64::MAX;

        assert!(matches!(MovieDocument::try_from(&m), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn negative_stored_amounts_read_as_zero() {
        let mut d = MovieDocument::try_from(&movie()).unwrap();
        d.box_office.budget = -5;

        let m = Movie::from(d);
        assert_eq!(m.box_office.budget, 0);
        assert_eq!(m.box_office.gross, 829_000_000);
    }

    #[test]
    fn set_document_only_names_changed_fields() {
        let changes = MovieChangeset {
            year: Some("2011".to_string()),
            gross: Some(1),
            ..Default::default()
        };

        let update = set_document(&changes).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get_str("year").unwrap(), "2011");
        assert_eq!(set.get_i64("boxOffice.gross").unwrap(), 1);
    }

    #[test]
    fn apply_keeps_untouched_fields() {
        let mut d = MovieDocument::try_from(&movie()).unwrap();
        d.apply(&MovieChangeset { budget: Some(5), ..Default::default() }).unwrap();

        assert_eq!(d.box_office.budget, 5);
        assert_eq!(d.box_office.gross, 829_000_000);
        assert_eq!(d.name, "Inception");
    }
}
