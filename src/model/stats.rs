//! Aggregate counters attached to most entities.
//!
//! Every counter is optional; which subset is populated depends entirely on
//! the entity the aggregate belongs to. An aggregate whose counters are all
//! absent is replaced by absent as a whole - enforced at construction by
//! [`crate::payload::collapse_stats`] and again at serialization time.

use serde::Serialize;

/// Pure aggregate of optional counters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
    #[serde(rename = "IQ", skip_serializing_if = "Option::is_none")]
    pub iq: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followed_users: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrents: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_arts: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_edits: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<u64>,
    #[serde(rename = "IQEarners", skip_serializing_if = "Option::is_none")]
    pub iq_earners: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcribers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcribes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum_posts: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_annotations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_annotations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreviewed_annotations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pyongs: Option<u64>,
}

impl Stats {
    /// Number of populated counters.
    pub fn populated(&self) -> usize {
        [
            self.tracks.is_some(),
            self.votes.is_some(),
            self.iq.is_some(),
            self.followed_users.is_some(),
            self.followers.is_some(),
            self.roles.is_some(),
            self.views.is_some(),
            self.concurrents.is_some(),
            self.cover_arts.is_some(),
            self.pending_edits.is_some(),
            self.verified_by.is_some(),
            self.contributors.is_some(),
            self.iq_earners.is_some(),
            self.transcribers.is_some(),
            self.annotations.is_some(),
            self.transcribes.is_some(),
            self.questions.is_some(),
            self.answers.is_some(),
            self.forum_posts.is_some(),
            self.verified_annotations.is_some(),
            self.accepted_annotations.is_some(),
            self.unreviewed_annotations.is_some(),
            self.comments.is_some(),
            self.pyongs.is_some(),
        ]
        .into_iter()
        .filter(|populated| *populated)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(Stats::default().is_empty());
        assert_eq!(Stats::default().populated(), 0);
    }

    #[test]
    fn test_populated_counts() {
        let stats = Stats {
            views: Some(100),
            pyongs: Some(2),
            iq: Some(50.0),
            ..Stats::default()
        };
        assert_eq!(stats.populated(), 3);
        assert!(!stats.is_empty());
    }

    #[test]
    fn test_serializes_only_present_counters() {
        let stats = Stats {
            views: Some(100),
            iq_earners: Some(4),
            ..Stats::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"views":100,"IQEarners":4}"#);
    }
}
