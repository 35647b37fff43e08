use chrono::{DateTime, Duration, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use itertools::Itertools;

use crate::contrib::{self, ContributionRecord, IntensityScale};
use crate::error::{Error, ErrorKind, Result};

/// The most week columns a 12-month span can straddle.
pub const MAX_WEEKS: usize = 53;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub count: u32,
    pub level: u8,
}

/// One day of the dense grid. `activity` is `None` for days after the
/// anchor date, which keeps a future placeholder distinguishable from a
/// real zero-count day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub activity: Option<Activity>,
}

impl DayCell {
    pub fn is_future(&self) -> bool {
        self.activity.is_none()
    }

    pub fn count(&self) -> Option<u32> {
        self.activity.map(|activity| activity.count)
    }

    pub fn level(&self) -> Option<u8> {
        self.activity.map(|activity| activity.level)
    }
}

pub type Week = Vec<DayCell>;

/// Chronological weeks, oldest first, each exactly 7 cells with the
/// flattened dates increasing by one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    weeks: Vec<Week>,
}

impl Grid {
    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flatten()
    }

    pub fn total_count(&self) -> u64 {
        self.days()
            .filter_map(|day| day.count())
            .map(u64::from)
            .sum()
    }

    #[cfg(test)]
    pub(crate) fn from_weeks(weeks: Vec<Week>) -> Self {
        Grid { weeks }
    }
}

/// Buckets a sparse contribution list into the dense week grid. Pure and
/// deterministic for fixed inputs; the anchor instant and zone are
/// explicit so "today" is a testable input.
#[derive(Debug, Clone)]
pub struct GridBuilder {
    week_start: Weekday,
    scale: IntensityScale,
}

impl Default for GridBuilder {
    fn default() -> Self {
        GridBuilder {
            week_start: Weekday::Sun,
            scale: IntensityScale::default(),
        }
    }
}

impl GridBuilder {
    pub fn week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn scale(mut self, scale: IntensityScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn build(
        &self,
        records: &[ContributionRecord],
        anchor_now: DateTime<Utc>,
        tz: Tz,
        span_months: u32,
    ) -> Result<Grid> {
        if span_months == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "span must cover at least one month",
            ));
        }

        let lookup = contrib::index_records(records)?;

        let anchor_date = anchor_now.with_timezone(&tz).date_naive();
        let span_begin = anchor_date
            .checked_sub_months(Months::new(span_months))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidInput,
                    &format!("span of {} months is out of range", span_months),
                )
            })?;

        let mut start = span_begin.week(self.week_start).first_day();
        let anchor_week = anchor_date.week(self.week_start).first_day();
        let mut num_weeks =
            (anchor_week.signed_duration_since(start).num_days() / 7 + 1) as usize;

        // A 12-month span can straddle one week column more than the cap
        // allows; drop the oldest week(s) rather than the newest.
        if num_weeks > MAX_WEEKS {
            let overflow = num_weeks - MAX_WEEKS;
            start = start + Duration::weeks(overflow as i64);
            num_weeks = MAX_WEEKS;
        }

        let cells = (0..(num_weeks * DAYS_PER_WEEK) as i64).map(|offset| {
            let date = start + Duration::days(offset);
            let activity = if date > anchor_date {
                None
            } else {
                let count = lookup.get(&date).copied().unwrap_or(0);
                Some(Activity {
                    count,
                    level: self.scale.level_for(count),
                })
            };
            DayCell { date, activity }
        });

        let week_chunks = cells.chunks(DAYS_PER_WEEK);
        let weeks: Vec<Week> = week_chunks
            .into_iter()
            .map(|chunk| chunk.collect())
            .collect();

        log::debug!(
            "bucketed {} records into {} weeks starting {}",
            records.len(),
            weeks.len(),
            start
        );

        Ok(Grid { weeks })
    }
}
