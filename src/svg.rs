use std::fmt::Write;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};
use crate::layout::{CellFill, ChartLayout};

const BORDER_RADIUS: u32 = 2;
const FONT_SIZE: &str = "10px";

/// Color scheme of the emitted document. The cell fills reference CSS
/// variables so an embedding page can still override them; the variables
/// themselves are defined in an embedded style block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::new(
                ErrorKind::InvalidInput,
                &format!("unknown color scheme '{}'", other),
            )),
        }
    }
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Level 0 (base) through level 4 fills.
    fn palette(&self) -> [&'static str; 5] {
        match self {
            Theme::Light => ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"],
            Theme::Dark => ["#161b22", "#0e4429", "#006d32", "#26a641", "#39d353"],
        }
    }

    fn border(&self) -> &'static str {
        match self {
            Theme::Light => "rgba(27, 31, 35, 0.06)",
            Theme::Dark => "rgba(255, 255, 255, 0.05)",
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Theme::Light => "#24292f",
            Theme::Dark => "#c9d1d9",
        }
    }
}

fn fill_var(fill: CellFill) -> String {
    match fill {
        CellFill::Level(level) if level > 0 => {
            format!("--color-calendar-graph-day-L{}", level)
        }
        _ => "--color-calendar-graph-day".to_owned(),
    }
}

fn style_block(theme: Theme) -> String {
    let mut out = String::new();
    let palette = theme.palette();

    let _ = write!(
        out,
        "svg {{ --color-calendar-graph-day-bg: {}; --color-calendar-graph-day-border: {};",
        palette[0],
        theme.border()
    );
    for (level, color) in palette.iter().enumerate().skip(1) {
        let _ = write!(
            out,
            " --color-calendar-graph-day-L{level}-bg: {color}; \
             --color-calendar-graph-day-L{level}-border: {border};",
            level = level,
            color = color,
            border = theme.border()
        );
    }
    let _ = write!(out, " --color-text-default: {}; }}", theme.text());
    out
}

/// Writes the chart as a complete SVG document.
pub fn render_svg(chart: &ChartLayout, theme: Theme) -> String {
    let mut out = String::new();

    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" data-color-mode=\"{}\" \
         width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" \
         style=\"background: transparent\">\n",
        theme.as_str(),
        chart.width,
        chart.height,
        chart.width,
        chart.height
    );

    let _ = write!(out, "<style>{}</style>\n", style_block(theme));

    for cell in &chart.cells {
        let var = fill_var(cell.fill);
        let title = match cell.count {
            Some(count) => format!("{} / {}", cell.date, count),
            None => cell.date.to_string(),
        };
        let _ = write!(
            out,
            "<rect width=\"{size}\" height=\"{size}\" x=\"{x}\" y=\"{y}\" \
             rx=\"{r}\" ry=\"{r}\" fill=\"var({var}-bg)\" stroke=\"var({var}-border)\">\
             <title>{title}</title></rect>\n",
            size = chart.metrics.cell_size,
            x = cell.x,
            y = cell.y,
            r = BORDER_RADIUS,
            var = var,
            title = title
        );
    }

    for label in &chart.month_labels {
        let _ = write!(
            out,
            "<text x=\"{}\" y=\"{}\" fill=\"var(--color-text-default)\" \
             style=\"font-size: {}\">{}</text>\n",
            label.x, label.y, FONT_SIZE, label.text
        );
    }

    for label in &chart.weekday_labels {
        let _ = write!(
            out,
            "<text x=\"{}\" y=\"{}\" fill=\"var(--color-text-default)\" \
             style=\"font-size: {}\">{}</text>\n",
            label.x, label.y, FONT_SIZE, label.text
        );
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrib::ContributionRecord;
    use crate::grid::GridBuilder;
    use crate::layout::LayoutRenderer;
    use chrono::{TimeZone, Utc};

    fn chart_with(records: &[ContributionRecord]) -> ChartLayout {
        let grid = GridBuilder::default()
            .build(
                records,
                Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
                "UTC".parse().unwrap(),
                12,
            )
            .unwrap();
        LayoutRenderer::default().layout(&grid).unwrap()
    }

    fn record(date: &str, count: u32) -> ContributionRecord {
        ContributionRecord {
            date: date.to_owned(),
            count,
            color: None,
            intensity: None,
        }
    }

    #[test]
    fn document_carries_scheme_and_one_rect_per_cell() {
        let chart = chart_with(&[]);
        let svg = render_svg(&chart, Theme::Light);

        assert!(svg.contains("data-color-mode=\"light\""));
        assert_eq!(svg.matches("<rect").count(), chart.cells.len());
        assert!(svg.contains("#ebedf0"));
    }

    #[test]
    fn zero_count_cells_never_use_a_level_variable() {
        let svg = render_svg(&chart_with(&[]), Theme::Light);
        assert!(!svg.contains("day-L1-bg)"));
        assert!(!svg.contains("day-L4-bg)"));
    }

    #[test]
    fn active_cells_reference_their_level() {
        let svg = render_svg(&chart_with(&[record("2024-01-10", 37)]), Theme::Light);
        assert!(svg.contains("fill=\"var(--color-calendar-graph-day-L4-bg)\""));
        assert!(svg.contains("<title>2024-01-10 / 37</title>"));
    }

    #[test]
    fn dark_theme_swaps_the_palette() {
        let svg = render_svg(&chart_with(&[]), Theme::Dark);
        assert!(svg.contains("data-color-mode=\"dark\""));
        assert!(svg.contains("#161b22"));
        assert!(svg.contains("#39d353"));
        assert!(!svg.contains("#ebedf0"));
    }

    #[test]
    fn scheme_parsing_rejects_unknown_names() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
