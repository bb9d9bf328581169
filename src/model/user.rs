//! User entity.

use serde::Serialize;
use serde_json::Value;

use crate::api::Context;
use crate::config::WEB_BASE;
use crate::error::MaterializeError;
use crate::model::{Artist, PhotoFields, Role, Stats};
use crate::payload::{
    arr_field, bool_field, collapse_stats, f64_field, obj_field, one_of, require_id, str_field,
    u64_field,
};
use crate::text::{clean_artists, parse_photo};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_nicknames: Option<Vec<String>>,
    #[serde(flatten)]
    pub photo: PhotoFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meme_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
    /// Attribution share when this user appears as an annotation author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_impact: Option<f64>,
    /// Attribution share when this user appears as an answer author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_impact: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<Box<Artist>>,
    #[serde(skip_serializing_if = "crate::serialize::stats_is_sparse")]
    pub stats: Option<Stats>,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    pub raw: Value,
    #[serde(skip)]
    pub(crate) ctx: Context,
}

impl User {
    pub fn from_payload(payload: &Value, ctx: &Context) -> Result<Self, MaterializeError> {
        let role_tags: Option<Vec<&str>> = arr_field(payload, "roles_for_display")
            .map(|tags| tags.iter().filter_map(Value::as_str).collect());
        let artist = one_of(payload, "artist", |v| Artist::from_payload(v, ctx))?;

        // An artist-backed account is verified exactly when its display
        // roles include the verified-artist role; otherwise trust the
        // payload's own flags.
        let (verified, meme_verified) = match (&role_tags, &artist) {
            (Some(tags), Some(_)) => {
                let verified_artist = tags.contains(&"verified_artist");
                (Some(verified_artist), Some(!verified_artist))
            }
            _ => (
                bool_field(payload, "is_verified"),
                bool_field(payload, "is_meme_verified"),
            ),
        };

        let roles: Option<Vec<Role>> = role_tags.as_ref().map(|tags| {
            tags.iter()
                .copied()
                .filter_map(Role::from_tag)
                .collect::<Vec<_>>()
        });
        let roles = roles.filter(|roles| !roles.is_empty());

        let avatar_url = obj_field(payload, "avatar").and_then(|avatar| {
            ["medium", "small", "thumb", "tiny"]
                .into_iter()
                .find_map(|size| obj_field(avatar, size))
                .and_then(|variant| str_field(variant, "url"))
        });
        let photo = PhotoFields {
            photo: parse_photo(str_field(payload, "photo_url").as_deref()).or(avatar_url),
            header: parse_photo(str_field(payload, "header_image_url").as_deref()),
        };

        let alternative_nicknames = arr_field(payload, "alternate_names").map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|name| clean_artists(Some(name)))
                .collect::<Vec<_>>()
        });

        let counters = obj_field(payload, "stats");
        let stats = collapse_stats(Stats {
            iq: f64_field(payload, "iq"),
            followed_users: u64_field(payload, "followed_users_count"),
            followers: u64_field(payload, "followers_count"),
            roles: roles.as_ref().map(|roles| roles.len() as u64),
            annotations: counters.and_then(|c| u64_field(c, "annotations_count")),
            transcribes: counters.and_then(|c| u64_field(c, "transcriptions_count")),
            questions: counters.and_then(|c| u64_field(c, "questions_count")),
            answers: counters.and_then(|c| u64_field(c, "answers_count")),
            forum_posts: counters.and_then(|c| u64_field(c, "forum_posts_count")),
            comments: counters.and_then(|c| u64_field(c, "comments_count")),
            pyongs: counters.and_then(|c| u64_field(c, "pyongs_count")),
            ..Stats::default()
        });

        let login = str_field(payload, "login");
        let url = login.as_ref().map(|login| format!("{WEB_BASE}{login}"));

        Ok(Self {
            nickname: clean_artists(str_field(payload, "name").as_deref()),
            login,
            alternative_nicknames: alternative_nicknames.filter(|names| !names.is_empty()),
            photo,
            description: str_field(payload, "about_me_summary"),
            meme_verified,
            verified,
            roles,
            annotation_impact: f64_field(payload, "annotationImpact"),
            answer_impact: f64_field(payload, "answerImpact"),
            artist: artist.map(Box::new),
            stats,
            id: require_id(payload, "/users/", "User")?,
            url,
            raw: payload.clone(),
            ctx: ctx.clone(),
        })
    }
}
