use chrono::{Datelike, Month, NaiveDate};
use num_traits::FromPrimitive;

use crate::error::{Error, ErrorKind, Result};
use crate::grid::Grid;

/// Vertical offset of the month label baseline inside the top text row.
const MONTH_BASELINE: u32 = 10;

/// Extra baseline offset for the weekday column.
const WEEKDAY_BASELINE: u32 = 8;

/// Chart geometry. Defaults match the 10px cells with 3px gutters of the
/// GitHub graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub cell_size: u32,
    pub cell_gap: u32,
    pub canvas_margin: u32,
    pub text_height: u32,
    pub weekday_width: u32,
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics {
            cell_size: 10,
            cell_gap: 3,
            canvas_margin: 3,
            text_height: 13,
            weekday_width: 28,
        }
    }
}

impl Metrics {
    pub fn step(&self) -> u32 {
        self.cell_size + self.cell_gap
    }

    pub fn left_margin(&self) -> u32 {
        self.weekday_width + self.cell_gap
    }

    pub fn top_margin(&self) -> u32 {
        self.text_height + self.cell_gap
    }
}

/// Presentation bucket of a cell. Placeholders and zero-count days share
/// the base fill; active days carry their clamped intensity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFill {
    Base,
    Level(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedCell {
    pub x: u32,
    pub y: u32,
    pub week: usize,
    pub day: usize,
    pub date: NaiveDate,
    pub count: Option<u32>,
    pub fill: CellFill,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabel {
    pub week_index: usize,
    pub text: String,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayLabel {
    pub row: usize,
    pub text: String,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub metrics: Metrics,
    pub cells: Vec<PositionedCell>,
    pub month_labels: Vec<MonthLabel>,
    pub weekday_labels: Vec<WeekdayLabel>,
}

/// Clamps an intensity level to the highest configured bucket.
pub fn clamp_level(level: u8, max_level: u8) -> u8 {
    level.min(max_level)
}

fn short_month_name(month: u32) -> String {
    Month::from_u32(month)
        .map(|m| m.name()[..3].to_owned())
        .unwrap_or_default()
}

/// Turns a grid into drawable primitives: positioned cells, the
/// de-duplicated month labels and the alternating weekday labels.
#[derive(Debug, Clone)]
pub struct LayoutRenderer {
    metrics: Metrics,
    max_level: u8,
}

impl Default for LayoutRenderer {
    fn default() -> Self {
        LayoutRenderer {
            metrics: Metrics::default(),
            max_level: 4,
        }
    }
}

impl LayoutRenderer {
    pub fn metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn max_level(mut self, max_level: u8) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn layout(&self, grid: &Grid) -> Result<ChartLayout> {
        if grid.is_empty() {
            return Err(Error::new(
                ErrorKind::EmptyGrid,
                "cannot lay out a grid with no weeks",
            ));
        }

        let m = &self.metrics;
        let origin_x = m.canvas_margin + m.left_margin();
        let origin_y = m.canvas_margin + m.top_margin();

        let width = grid.len() as u32 * m.step() + m.canvas_margin + m.left_margin();
        let height = m.text_height + m.step() * 7 + 3 * m.canvas_margin;

        let cells = grid
            .weeks()
            .iter()
            .enumerate()
            .flat_map(|(week, days)| {
                days.iter().enumerate().map(move |(day, cell)| {
                    let fill = match cell.level() {
                        Some(level) if cell.count().unwrap_or(0) > 0 => {
                            CellFill::Level(clamp_level(level, self.max_level))
                        }
                        _ => CellFill::Base,
                    };
                    PositionedCell {
                        x: origin_x + week as u32 * m.step(),
                        y: origin_y + day as u32 * m.step(),
                        week,
                        day,
                        date: cell.date,
                        count: cell.count(),
                        fill,
                    }
                })
            })
            .collect();

        Ok(ChartLayout {
            width,
            height,
            metrics: *m,
            cells,
            month_labels: self.month_labels(grid),
            weekday_labels: self.weekday_labels(grid),
        })
    }

    /// One label per genuine month transition. A transition whose column
    /// is clipped by the grid boundary (a "sliver" at the very first or
    /// very last column) is suppressed.
    fn month_labels(&self, grid: &Grid) -> Vec<MonthLabel> {
        let m = &self.metrics;
        let weeks = grid.weeks();
        let mut last_labeled: Option<u32> = None;
        let mut labels = Vec::new();

        for (x, week) in weeks.iter().enumerate() {
            let month = week[0].date.month();
            let next_month = weeks.get(x + 1).map(|next| next[0].date.month());

            let changed = last_labeled != Some(month);
            let leading_sliver = x == 0 && next_month.map_or(true, |next| next != month);
            let trailing_sliver = x + 1 == weeks.len() && changed;

            if changed && !leading_sliver && !trailing_sliver {
                last_labeled = Some(month);
                labels.push(MonthLabel {
                    week_index: x,
                    text: short_month_name(month),
                    x: m.canvas_margin + m.left_margin() + x as u32 * m.step(),
                    y: m.canvas_margin + MONTH_BASELINE,
                });
            }
        }

        labels
    }

    /// Fixed weekday texts down the left edge; only every other row is
    /// emitted to avoid crowding.
    fn weekday_labels(&self, grid: &Grid) -> Vec<WeekdayLabel> {
        let m = &self.metrics;
        let first_week = &grid.weeks()[0];

        first_week
            .iter()
            .enumerate()
            .filter(|(row, _)| row % 2 == 1)
            .map(|(row, cell)| WeekdayLabel {
                row,
                text: cell.date.format("%a").to_string(),
                x: m.canvas_margin,
                y: m.canvas_margin
                    + m.top_margin()
                    + WEEKDAY_BASELINE
                    + row as u32 * m.text_height,
            })
            .collect()
    }
}
