//! lyric-minder - a typed client for the Genius music-metadata/lyrics
//! service.
//!
//! The service answers with heterogeneous, loosely-typed JSON and HTML.
//! This crate converts those payloads into a graph of strongly-typed
//! entities (tracks, albums, artists, users, annotations, comments,
//! questions, answers, pyongs) through a pure, synchronous materialization
//! engine ([`materialize`]); a thin async HTTP layer ([`api`]) feeds it.
//!
//! # Usage
//!
//! ```ignore
//! use lyric_minder::{Genius, config::ClientConfig};
//!
//! let genius = Genius::new(ClientConfig::default())?;
//! let track = genius.track(378195, None, true).await?;
//! if let Some(track) = track {
//!     println!("{}", track); // serialized with absent fields omitted
//! }
//! ```
//!
//! The engine can also be driven directly with payloads obtained
//! elsewhere:
//!
//! ```
//! use lyric_minder::{Context, EntityKind, materialize};
//! use serde_json::json;
//!
//! let payload = json!([{"id": 1, "title": "Song"}]);
//! let result = materialize(&payload, EntityKind::Track, &Context::detached()).unwrap();
//! // a one-element list collapses to the entity itself
//! assert!(matches!(result, lyric_minder::Materialized::One(_)));
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod lyrics;
pub mod materialize;
pub mod model;
pub mod payload;
pub mod serialize;
pub mod text;

pub use api::{Context, Genius};
pub use error::{Error, MaterializeError, Result};
pub use lyrics::{ExtractOptions, ExtractedLyrics};
pub use materialize::{
    Entity, EntityKind, FromEntity, Materialized, OneOrMany, Subject, SubjectKind, materialize,
};
pub use model::{
    Album, Annotation, Answer, Artist, Comment, CoverArt, Genre, Lyrics, PhotoFields, Pyong,
    Question, Role, Sort, Stats, TextColor, TextFormat, Track, User,
};
