//! Serialization contract helpers.
//!
//! Entities serialize to plain ordered mappings: absent fields are omitted,
//! timestamps render in the service's `DD/MM/YYYY[ HH:MM:SS]` form, and
//! sparse embedded aggregates are dropped wholesale rather than surfacing
//! as near-empty objects. The per-aggregate thresholds are hand-tuned
//! values carried over from the serving side, kept as named constants so
//! they can be adjusted independently.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serializer;

use crate::model::{Lyrics, Stats};

/// An embedded [`Stats`] is dropped below this many populated counters.
pub const STATS_MIN_POPULATED: usize = 2;

/// An embedded [`Lyrics`] on a track is dropped below this many populated
/// fields.
pub const EMBEDDED_LYRICS_MIN_POPULATED: usize = 4;

pub(crate) fn opt_date<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&date.format("%d/%m/%Y").to_string()),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn opt_datetime<S: Serializer>(
    datetime: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match datetime {
        Some(datetime) => {
            serializer.serialize_str(&datetime.format("%d/%m/%Y %H:%M:%S").to_string())
        }
        None => serializer.serialize_none(),
    }
}

/// Skip predicate for `Option<Stats>` fields.
pub(crate) fn stats_is_sparse(stats: &Option<Stats>) -> bool {
    match stats {
        Some(stats) => stats.populated() < STATS_MIN_POPULATED,
        None => true,
    }
}

/// Skip predicate for the `lyrics` field embedded on a track.
pub(crate) fn lyrics_is_sparse(lyrics: &Option<Box<Lyrics>>) -> bool {
    match lyrics {
        Some(lyrics) => lyrics.populated() < EMBEDDED_LYRICS_MIN_POPULATED,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Dated {
        #[serde(serialize_with = "opt_date")]
        date: Option<NaiveDate>,
        #[serde(serialize_with = "opt_datetime")]
        datetime: Option<NaiveDateTime>,
    }

    #[test]
    fn test_date_rendering() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let dated = Dated {
            date: Some(date),
            datetime: Some(date.and_hms_opt(9, 5, 0).unwrap()),
        };
        let json = serde_json::to_string(&dated).unwrap();
        assert!(json.contains("\"07/03/2024\""));
        assert!(json.contains("\"07/03/2024 09:05:00\""));
    }

    #[test]
    fn test_stats_sparse_below_threshold() {
        assert!(stats_is_sparse(&None));

        let one = Stats {
            views: Some(10),
            ..Stats::default()
        };
        assert!(stats_is_sparse(&Some(one)));

        let two = Stats {
            views: Some(10),
            pyongs: Some(1),
            ..Stats::default()
        };
        assert!(!stats_is_sparse(&Some(two)));
    }
}
