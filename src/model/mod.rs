//! Domain entities materialized from service payloads.
//!
//! One file per entity. Every entity is a plain value: construction happens
//! exactly once (in its `from_payload` constructor), nothing is mutated
//! after the materializer hands it out. Each entity keeps the raw payload
//! it was built from (`raw`, never serialized) and a non-owning handle to
//! the client that produced it (`ctx`, never serialized) so follow-up
//! fetches stay possible without owning the session.
//!
//! Shared capabilities are composed by value ([`PhotoFields`]) rather than
//! inherited; paired back-references (track/lyrics, album/cover-art) keep
//! exactly one direction, see the constructors for the pruning rule.

pub mod album;
pub mod annotation;
pub mod answer;
pub mod artist;
pub mod comment;
pub mod cover_art;
pub mod enums;
pub mod genre;
pub mod lyrics;
pub mod photo;
pub mod pyong;
pub mod question;
pub mod stats;
pub mod track;
pub mod user;

pub use album::Album;
pub use annotation::Annotation;
pub use answer::Answer;
pub use artist::Artist;
pub use comment::Comment;
pub use cover_art::CoverArt;
pub use enums::{Role, Sort, TextColor, TextFormat};
pub use genre::Genre;
pub use lyrics::Lyrics;
pub use photo::PhotoFields;
pub use pyong::Pyong;
pub use question::Question;
pub use stats::Stats;
pub use track::Track;
pub use user::User;

/// Entities print as the pretty JSON of their serialized form, which
/// already applies the omission contract.
macro_rules! impl_display_as_json {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl std::fmt::Display for $entity {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    match serde_json::to_string_pretty(self) {
                        Ok(json) => f.write_str(&json),
                        Err(_) => f.write_str("{}"),
                    }
                }
            }
        )+
    };
}

impl_display_as_json!(
    Album, Annotation, Answer, Artist, Comment, CoverArt, Genre, Lyrics, Pyong, Question, Stats,
    Track, User,
);
