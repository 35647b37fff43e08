extern crate sprig as lib;

use chrono::{DateTime, Utc};
use flexi_logger::{FileSpec, Logger};
use lib::contrib::ChartData;
use lib::error::{Error, ErrorKind};
use lib::grid::GridBuilder;
use lib::layout::LayoutRenderer;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "sprig",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Sprig - renders a contribution calendar as SVG."
)]
pub struct Args {
    #[structopt(
        help = "contribution payload (JSON), read from stdin when omitted",
        parse(from_os_str)
    )]
    pub input: Option<PathBuf>,

    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "o",
        long = "output",
        help = "write the SVG here instead of stdout",
        parse(from_os_str)
    )]
    pub output: Option<PathBuf>,

    #[structopt(long = "scheme", help = "color scheme (light|dark)")]
    pub scheme: Option<String>,

    #[structopt(long = "timezone", help = "IANA time zone the anchor date is taken in")]
    pub timezone: Option<String>,

    #[structopt(
        long = "now",
        help = "anchor instant (RFC 3339), defaults to the current time"
    )]
    pub now: Option<String>,

    #[structopt(long = "span-months", help = "number of months the grid spans")]
    pub span_months: Option<u32>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn anchor_from(arg: Option<&str>) -> Result<DateTime<Utc>, Error> {
    match arg {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                Error::new(
                    ErrorKind::InvalidInput,
                    &format!("bad anchor timestamp '{}': {}", raw, e),
                )
            }),
        None => Ok(Utc::now()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let raw = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let data = ChartData::from_json(&raw)?;

    let tz = match args.timezone {
        Some(name) => name
            .parse()
            .map_err(|e: String| Error::new(ErrorKind::InvalidInput, &e))?,
        None => config.tz()?,
    };
    let theme = match args.scheme {
        Some(name) => name.parse()?,
        None => config.theme()?,
    };
    let anchor = anchor_from(args.now.as_deref())?;
    let span_months = args.span_months.unwrap_or(config.span_months);

    let grid = GridBuilder::default()
        .week_start(config.week_start_day()?)
        .scale(config.scale()?)
        .build(&data.contributions, anchor, tz, span_months)?;

    log::info!(
        "{} contributions across {} weeks (anchor {}, {})",
        grid.total_count(),
        grid.len(),
        anchor.with_timezone(&tz).date_naive(),
        tz
    );

    let chart = LayoutRenderer::default()
        .metrics(config.metrics())
        .max_level(config.scale()?.max_level())
        .layout(&grid)?;

    let document = lib::svg::render_svg(&chart, theme);

    match args.output {
        Some(path) => fs::write(path, document)?,
        None => io::stdout().write_all(document.as_bytes())?,
    }

    Ok(())
}
