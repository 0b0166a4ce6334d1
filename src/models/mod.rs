use serde::{Deserialize, Serialize};

/// One fixture as listed on the schedule page.
///
/// The JSON field names are the on-disk exchange format between the scrape,
/// reconcile and publish stages; `match_title` is stored as `match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub league: String,
    pub time: String,
    #[serde(rename = "match")]
    pub match_title: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Comma-and-space separated channel names, or `None` when the listing had none
    #[serde(default)]
    pub channels: Option<String>,
}

impl MatchRecord {
    pub fn new<L: Into<String>, T: Into<String>, M: Into<String>>(
        league: L,
        time: T,
        match_title: M,
    ) -> Self {
        Self {
            league: league.into(),
            time: time.into(),
            match_title: match_title.into(),
            url: None,
            channels: None,
        }
    }

    pub fn with_url<U: Into<String>>(mut self, url: U) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_channels<C: Into<String>>(mut self, channels: C) -> Self {
        self.channels = Some(channels.into());
        self
    }
}

/// A channel name as scraped from a match page, not yet checked against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawChannelMention {
    pub name: String,
    /// Country tag from the row the channel was listed under
    pub country: Option<String>,
}

impl RawChannelMention {
    pub fn new<N: Into<String>>(name: N, country: Option<&str>) -> Self {
        Self {
            name: name.into(),
            country: country.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_record_json_field_names() {
        let record = MatchRecord::new("England - Premier League", "19:30", "Arsenal vs Chelsea")
            .with_url("https://www.livesoccertv.com/match/1/")
            .with_channels("Sky Sports Main Event");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["match"], "Arsenal vs Chelsea");
        assert_eq!(json["league"], "England - Premier League");
        assert_eq!(json["channels"], "Sky Sports Main Event");
        assert!(json.get("match_title").is_none());
    }

    #[test]
    fn test_match_record_tolerates_missing_optional_fields() {
        let json = r#"{"league": "Serie A", "time": "LIVE", "match": "Roma vs Lazio"}"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.url, None);
        assert_eq!(record.channels, None);
    }

    #[test]
    fn test_match_record_null_channels_round_trip() {
        let json = r#"{"league": "Serie A", "time": "20:45", "match": "Roma vs Lazio", "url": null, "channels": null}"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();
        let back = serde_json::to_string(&record).unwrap();

        assert!(back.contains(r#""channels":null"#));
    }
}
