//! The response materialization engine.
//!
//! A raw payload plus a target [`EntityKind`] go in; a typed entity, a
//! sequence of them, or absent comes out. The engine is pure and
//! synchronous: it never touches the network, holds no shared state, and
//! may be called concurrently from independent contexts.
//!
//! Three conventions apply at this boundary:
//! - **Absence**: `null`, empty containers and empty strings materialize to
//!   absent. Boolean `false` is a real value and does not.
//! - **Collapse**: a list that materializes to exactly one entity is
//!   returned as that entity, not a one-element sequence. This applies only
//!   here at the outer boundary; nested list fields stay true collections.
//! - **Unknown tags**: discriminator tags we have never seen resolve to
//!   [`EntityKind::Unresolved`] and the element is skipped, never an error.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::api::Context;
use crate::error::MaterializeError;
use crate::model::{
    Album, Annotation, Answer, Artist, Comment, CoverArt, Genre, Lyrics, Pyong, Question, Track,
    User,
};

/// Target kind for a materialization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Track,
    Album,
    Artist,
    User,
    Annotation,
    Comment,
    Pyong,
    Question,
    Answer,
    Genre,
    CoverArt,
    Lyrics,
    /// A discriminator tag we do not recognize. Materializes to absent.
    Unresolved,
}

impl EntityKind {
    /// Resolve a contribution-type tag (`"song"`, `"annotation"`, ...).
    pub fn from_contribution_tag(tag: &str) -> Self {
        match tag {
            "song" => Self::Track,
            "annotation" => Self::Annotation,
            "comment" => Self::Comment,
            "pyong" => Self::Pyong,
            "question" => Self::Question,
            "answer" => Self::Answer,
            _ => Self::Unresolved,
        }
    }

    /// Resolve a subject tag (`commentable_type`, `pyongable_type`,
    /// `questionable_type`). The wire is inconsistent about casing
    /// (`"Song"` vs `"song"`), so matching ignores it.
    pub fn from_subject_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("song") {
            Self::Track
        } else if tag.eq_ignore_ascii_case("annotation") {
            Self::Annotation
        } else if tag.eq_ignore_ascii_case("album") {
            Self::Album
        } else {
            Self::Unresolved
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Track => "Track",
            Self::Album => "Album",
            Self::Artist => "Artist",
            Self::User => "User",
            Self::Annotation => "Annotation",
            Self::Comment => "Comment",
            Self::Pyong => "Pyong",
            Self::Question => "Question",
            Self::Answer => "Answer",
            Self::Genre => "Genre",
            Self::CoverArt => "CoverArt",
            Self::Lyrics => "Lyrics",
            Self::Unresolved => "Unresolved",
        }
    }
}

/// A materialized entity of any kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Track(Box<Track>),
    Album(Box<Album>),
    Artist(Box<Artist>),
    User(Box<User>),
    Annotation(Box<Annotation>),
    Comment(Box<Comment>),
    Pyong(Box<Pyong>),
    Question(Box<Question>),
    Answer(Box<Answer>),
    Genre(Box<Genre>),
    CoverArt(Box<CoverArt>),
    Lyrics(Box<Lyrics>),
}

/// Extraction of a concrete type back out of an [`Entity`].
pub trait FromEntity: Sized {
    fn from_entity(entity: Entity) -> Option<Self>;
}

macro_rules! impl_from_entity {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl FromEntity for $ty {
                fn from_entity(entity: Entity) -> Option<Self> {
                    match entity {
                        Entity::$variant(inner) => Some(*inner),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_from_entity!(
    Track => Track,
    Album => Album,
    Artist => Artist,
    User => User,
    Annotation => Annotation,
    Comment => Comment,
    Pyong => Pyong,
    Question => Question,
    Answer => Answer,
    Genre => Genre,
    CoverArt => CoverArt,
    Lyrics => Lyrics,
);

impl FromEntity for Entity {
    fn from_entity(entity: Entity) -> Option<Self> {
        Some(entity)
    }
}

/// One entity or a sequence of them, after the collapse convention.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Flatten into a plain vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(one) => vec![one],
            Self::Many(many) => many,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(many) => many.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a materialization call.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Materialized {
    Absent,
    One(Entity),
    Many(Vec<Entity>),
}

impl Materialized {
    /// Apply the collapse convention to a finished entity list.
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        match entities.len() {
            0 => Self::Absent,
            1 => Self::One(entities.into_iter().next().unwrap()),
            _ => Self::Many(entities),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Convert into a typed one-or-many, dropping entities of other kinds.
    pub fn into_typed<T: FromEntity>(self) -> Option<OneOrMany<T>> {
        match self {
            Self::Absent => None,
            Self::One(entity) => T::from_entity(entity).map(OneOrMany::One),
            Self::Many(entities) => {
                let typed: Vec<T> = entities.into_iter().filter_map(T::from_entity).collect();
                (!typed.is_empty()).then_some(OneOrMany::Many(typed))
            }
        }
    }

    /// Convert into a single typed entity; sequences yield their first
    /// element.
    pub fn into_single<T: FromEntity>(self) -> Option<T> {
        match self {
            Self::Absent => None,
            Self::One(entity) => T::from_entity(entity),
            Self::Many(entities) => entities.into_iter().find_map(T::from_entity),
        }
    }
}

/// Materialize `payload` into `kind`.
///
/// A list payload is materialized element-wise; the collapse convention
/// applies to the result. Elements that are absent or of unresolved kind
/// are skipped. Construction errors (malformed identity) propagate.
pub fn materialize(
    payload: &Value,
    kind: EntityKind,
    ctx: &Context,
) -> Result<Materialized, MaterializeError> {
    if crate::payload::is_absent(payload) {
        return Ok(Materialized::Absent);
    }

    match payload {
        Value::Array(items) => {
            let mut entities = Vec::new();
            for item in items {
                if let Some(entity) = materialize_one(item, kind, ctx)? {
                    entities.push(entity);
                }
            }
            Ok(Materialized::from_entities(entities))
        }
        _ => Ok(match materialize_one(payload, kind, ctx)? {
            Some(entity) => Materialized::One(entity),
            None => Materialized::Absent,
        }),
    }
}

fn materialize_one(
    payload: &Value,
    kind: EntityKind,
    ctx: &Context,
) -> Result<Option<Entity>, MaterializeError> {
    if crate::payload::is_absent(payload) {
        return Ok(None);
    }

    if !payload.is_object() {
        return Err(MaterializeError::UnexpectedPayload {
            kind: kind.name(),
            found: value_kind(payload),
        });
    }

    let entity = match kind {
        EntityKind::Track => Entity::Track(Box::new(Track::from_payload(payload, ctx)?)),
        EntityKind::Album => Entity::Album(Box::new(Album::from_payload(payload, ctx)?)),
        EntityKind::Artist => Entity::Artist(Box::new(Artist::from_payload(payload, ctx)?)),
        EntityKind::User => Entity::User(Box::new(User::from_payload(payload, ctx)?)),
        EntityKind::Annotation => {
            Entity::Annotation(Box::new(Annotation::from_payload(payload, ctx)?))
        }
        EntityKind::Comment => Entity::Comment(Box::new(Comment::from_payload(payload, ctx)?)),
        EntityKind::Pyong => Entity::Pyong(Box::new(Pyong::from_payload(payload, ctx)?)),
        EntityKind::Question => Entity::Question(Box::new(Question::from_payload(payload, ctx)?)),
        EntityKind::Answer => Entity::Answer(Box::new(Answer::from_payload(payload, ctx)?)),
        EntityKind::Genre => Entity::Genre(Box::new(Genre::from_payload(payload, ctx)?)),
        EntityKind::CoverArt => Entity::CoverArt(Box::new(CoverArt::from_payload(payload, ctx)?)),
        EntityKind::Lyrics => Entity::Lyrics(Box::new(Lyrics::from_payload(payload, ctx)?)),
        EntityKind::Unresolved => {
            debug!("skipping payload with unresolved entity kind");
            return Ok(None);
        }
    };

    Ok(Some(entity))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Subject kind of a polymorphic contribution target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubjectKind {
    Track,
    Album,
    Annotation,
}

impl SubjectKind {
    /// Resolve a subject discriminator tag; unknown tags yield `None` and
    /// the caller skips the subject.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match EntityKind::from_subject_tag(tag) {
            EntityKind::Track => Some(Self::Track),
            EntityKind::Album => Some(Self::Album),
            EntityKind::Annotation => Some(Self::Annotation),
            _ => {
                debug!(tag, "unknown subject tag");
                None
            }
        }
    }
}

/// The polymorphic target of a comment, pyong or question.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Subject {
    Track(Box<Track>),
    Album(Box<Album>),
    Annotation(Box<Annotation>),
}

impl Subject {
    /// Materialize a subject payload as the given kind.
    pub(crate) fn materialize(
        kind: SubjectKind,
        payload: Option<&Value>,
        ctx: &Context,
    ) -> Result<Option<Self>, MaterializeError> {
        let Some(payload) = payload.filter(|p| !crate::payload::is_absent(p)) else {
            return Ok(None);
        };

        let subject = match kind {
            SubjectKind::Track => Self::Track(Box::new(Track::from_payload(payload, ctx)?)),
            SubjectKind::Album => Self::Album(Box::new(Album::from_payload(payload, ctx)?)),
            SubjectKind::Annotation => {
                Self::Annotation(Box::new(Annotation::from_payload(payload, ctx)?))
            }
        };

        Ok(Some(subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> Context {
        Context::detached()
    }

    #[test]
    fn test_contribution_dispatch() {
        assert_eq!(EntityKind::from_contribution_tag("song"), EntityKind::Track);
        assert_eq!(EntityKind::from_contribution_tag("pyong"), EntityKind::Pyong);
        assert_eq!(
            EntityKind::from_contribution_tag("answer"),
            EntityKind::Answer
        );
        assert_eq!(
            EntityKind::from_contribution_tag("poll"),
            EntityKind::Unresolved
        );
    }

    #[test]
    fn test_subject_dispatch_ignores_case() {
        assert_eq!(EntityKind::from_subject_tag("Song"), EntityKind::Track);
        assert_eq!(EntityKind::from_subject_tag("song"), EntityKind::Track);
        assert_eq!(EntityKind::from_subject_tag("Album"), EntityKind::Album);
        assert_eq!(EntityKind::from_subject_tag("poll"), EntityKind::Unresolved);
    }

    #[test]
    fn test_absent_payloads() {
        assert!(
            materialize(&Value::Null, EntityKind::Track, &ctx())
                .unwrap()
                .is_absent()
        );
        assert!(
            materialize(&json!([]), EntityKind::Track, &ctx())
                .unwrap()
                .is_absent()
        );
        assert!(
            materialize(&json!({}), EntityKind::Track, &ctx())
                .unwrap()
                .is_absent()
        );
    }

    #[test]
    fn test_false_is_not_absent() {
        // `false` is a real signal; it just cannot become an entity.
        let err = materialize(&json!(false), EntityKind::Track, &ctx()).unwrap_err();
        assert!(matches!(
            err,
            MaterializeError::UnexpectedPayload {
                found: "boolean",
                ..
            }
        ));
    }

    #[test]
    fn test_single_element_list_collapses() {
        let payload = json!([{"id": 1, "title": "Only"}]);
        let track: Track = materialize(&payload, EntityKind::Track, &ctx())
            .unwrap()
            .into_single()
            .unwrap();
        assert_eq!(track.id, 1);
    }

    #[test]
    fn test_two_element_list_stays_a_sequence() {
        let payload = json!([{"id": 1}, {"id": 2}]);
        let tracks = materialize(&payload, EntityKind::Track, &ctx())
            .unwrap()
            .into_typed::<Track>()
            .unwrap();
        assert!(matches!(tracks, OneOrMany::Many(_)));
        assert_eq!(tracks.len(), 2);
    }

    #[test]
    fn test_unresolved_kind_skips_in_list() {
        let payload = json!([{"id": 1}]);
        let result = materialize(&payload, EntityKind::Unresolved, &ctx()).unwrap();
        assert!(result.is_absent());
    }

    #[test]
    fn test_null_elements_skipped_in_list() {
        let payload = json!([null, {"id": 5}, null]);
        let track: Track = materialize(&payload, EntityKind::Track, &ctx())
            .unwrap()
            .into_single()
            .unwrap();
        assert_eq!(track.id, 5);
    }

    #[test]
    fn test_missing_identity_propagates() {
        let payload = json!([{"title": "no id"}]);
        assert!(materialize(&payload, EntityKind::Track, &ctx()).is_err());
    }

    #[test]
    fn test_into_typed_drops_mismatches() {
        let payload = json!({"id": 3, "name": "Artist"});
        let materialized = materialize(&payload, EntityKind::Artist, &ctx()).unwrap();
        assert!(materialized.into_typed::<Track>().is_none());
    }
}
