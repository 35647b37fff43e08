use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{Error, ErrorKind, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One day of upstream activity. `color` and `intensity` are presentation
/// hints some backends attach; levels are always re-derived from `count`
/// via an [`IntensityScale`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContributionRecord {
    pub date: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub intensity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct YearTotal {
    pub year: String,
    pub total: u64,
    pub range: DateRange,
}

/// Envelope as served by the contribution API (`contributions` plus
/// per-year totals).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub contributions: Vec<ContributionRecord>,
    #[serde(default, alias = "totalsByYear")]
    pub years: Vec<YearTotal>,
}

impl ChartData {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(input, DATE_FORMAT)?)
}

/// Builds the date-keyed lookup used while bucketing. Record order does not
/// matter; later duplicates win.
pub fn index_records(records: &[ContributionRecord]) -> Result<HashMap<NaiveDate, u32>> {
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        map.insert(parse_date(&record.date)?, record.count);
    }
    Ok(map)
}

/// Ordered count breakpoints classifying a raw count into a discrete
/// intensity level. Breakpoint `i` is the smallest count that reaches
/// level `i`; counts beyond the last breakpoint clamp to the top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityScale {
    breakpoints: Vec<u32>,
}

impl Default for IntensityScale {
    fn default() -> Self {
        IntensityScale {
            breakpoints: vec![0, 1, 10, 20, 30],
        }
    }
}

impl IntensityScale {
    pub fn new(breakpoints: Vec<u32>) -> Result<Self> {
        if breakpoints.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "intensity scale needs at least one breakpoint",
            ));
        }
        if breakpoints.first() != Some(&0) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "first intensity breakpoint must be 0",
            ));
        }
        if !breakpoints.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "intensity breakpoints must be strictly ascending",
            ));
        }
        Ok(IntensityScale { breakpoints })
    }

    pub fn level_for(&self, count: u32) -> u8 {
        self.breakpoints
            .iter()
            .rposition(|&breakpoint| count >= breakpoint)
            .unwrap_or(0) as u8
    }

    pub fn max_level(&self) -> u8 {
        (self.breakpoints.len() - 1) as u8
    }
}

/// Raw GitHub palette color to intensity level. Kept separate from any
/// rendering scheme so payloads carrying colors instead of counts can
/// still be classified.
static COLOR_LEVELS: phf::Map<&'static str, u8> = phf::phf_map! {
    "#ebedf0" => 0u8,
    "#9be9a8" => 1u8,
    "#40c463" => 2u8,
    "#30a14e" => 3u8,
    "#216e39" => 4u8,
};

pub fn level_from_color(color: &str) -> Option<u8> {
    COLOR_LEVELS.get(color).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_payload_envelope() {
        let input = r##"{
            "contributions": [
                { "date": "2024-01-10", "count": 37, "color": "#216e39", "intensity": "4" },
                { "date": "2024-01-11", "count": 2 }
            ],
            "years": [
                {
                    "year": "2024",
                    "total": 39,
                    "range": { "start": "2024-01-01", "end": "2024-12-31" }
                }
            ]
        }"##;

        let data = ChartData::from_json(input).unwrap();
        assert_eq!(data.contributions.len(), 2);
        assert_eq!(data.contributions[0].count, 37);
        assert_eq!(data.contributions[1].color, None);
        assert_eq!(data.years[0].total, 39);
        assert_eq!(data.years[0].range.start, "2024-01-01");
    }

    #[test]
    fn index_rejects_malformed_date() {
        let records = vec![ContributionRecord {
            date: "01/10/2024".to_owned(),
            count: 1,
            color: None,
            intensity: None,
        }];

        let err = index_records(&records).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedDate));
    }

    #[test]
    fn index_ignores_record_order() {
        let record = |date: &str, count| ContributionRecord {
            date: date.to_owned(),
            count,
            color: None,
            intensity: None,
        };

        let sorted = index_records(&[record("2024-01-01", 1), record("2024-01-02", 2)]).unwrap();
        let shuffled = index_records(&[record("2024-01-02", 2), record("2024-01-01", 1)]).unwrap();
        assert_eq!(sorted, shuffled);
    }

    #[test]
    fn scale_clamps_to_top_level() {
        let scale = IntensityScale::new(vec![0, 1, 10, 20, 30]).unwrap();
        assert_eq!(scale.level_for(37), 4);
        assert_eq!(scale.level_for(1_000_000), 4);
    }

    #[test]
    fn scale_is_monotonic() {
        let scale = IntensityScale::default();
        let mut last = 0;
        for count in 0..100 {
            let level = scale.level_for(count);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn scale_level_zero_for_no_activity() {
        let scale = IntensityScale::default();
        assert_eq!(scale.level_for(0), 0);
    }

    #[test]
    fn scale_rejects_unordered_breakpoints() {
        assert!(IntensityScale::new(vec![0, 10, 5]).is_err());
        assert!(IntensityScale::new(vec![]).is_err());
        assert!(IntensityScale::new(vec![1, 2]).is_err());
    }

    #[test]
    fn color_table_matches_palette_order() {
        let palette = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];
        for (level, color) in palette.iter().enumerate() {
            assert_eq!(level_from_color(color), Some(level as u8));
        }
        assert_eq!(level_from_color("#ffffff"), None);
    }
}
