use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use mrlens_series::AverageKind;
use mrlens_series::SeriesKind;
use mrlens_series::XAxisMode;
use mrlens_series::matchup::Column;
use mrlens_series::settings::LINE_COUNT;

use crate::error::CliError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Chart the rating history of a saved ranked history page with moving
    /// average overlays.
    View(ViewArgs),
    /// Aggregate and sort the matchup table of a saved matchup chart page.
    Matchup(MatchupArgs),
    /// Show or reset the stored overlay settings.
    Settings(SettingsArgs),
    /// Download a ranked history or matchup chart page.
    Fetch(FetchArgs),
}

#[derive(Args)]
pub(crate) struct ViewArgs {
    /// Specify the path of the saved ranked history page.
    #[arg(short, long, value_parser(parse_file))]
    pub(crate) input: PathBuf,

    /// Specify the path where the generated output will be created.
    /// If the output path is not specified then the current working
    /// directory is used.
    #[arg(short, long, value_parser(parse_path))]
    pub(crate) output_path: Option<PathBuf>,

    /// Specify the file the overlay settings are stored in.
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,

    /// Configure and enable an overlay line, as `SLOT:KIND:PERIOD`.
    /// For example, `2:SMA:50`. The change is saved like the update button
    /// of the settings panel does.
    #[arg(long = "line", value_parser(parse_line))]
    pub(crate) lines: Vec<LineOverride>,

    /// Disable the overlay line in the given slot.
    #[arg(long, value_parser(parse_slot))]
    pub(crate) disable: Vec<usize>,

    /// Select the layout of the X axis.
    #[arg(long, value_enum)]
    pub(crate) x_axis: Option<XAxisArg>,

    /// Restart the averages wherever the rating jumps by at least this much.
    #[arg(long)]
    pub(crate) season_threshold: Option<f64>,

    /// Hide the raw rating line and chart the overlays only.
    #[arg(long)]
    pub(crate) hide_raw: bool,

    /// Only chart the matches played on or after this day.
    #[arg(long)]
    pub(crate) from: Option<NaiveDate>,

    /// Only chart the matches played on or before this day.
    #[arg(long)]
    pub(crate) to: Option<NaiveDate>,

    /// Select the rating series to chart.
    #[arg(long, value_enum, default_value_t = MetricArg::Mr)]
    pub(crate) metric: MetricArg,

    /// Keep redrawing the chart whenever the input page changes.
    #[arg(short, long)]
    pub(crate) watch: bool,

    /// Specify how often the input page is checked for changes, in
    /// milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub(crate) interval: u64,
}

#[derive(Args)]
pub(crate) struct MatchupArgs {
    /// Specify the path of the saved matchup chart page.
    #[arg(short, long, value_parser(parse_file))]
    pub(crate) input: PathBuf,

    /// Specify the path where the generated output will be created.
    /// If the output path is not specified then the current working
    /// directory is used.
    #[arg(short, long, value_parser(parse_path))]
    pub(crate) output_path: Option<PathBuf>,

    /// Keep the control types of every character apart.
    #[arg(long)]
    pub(crate) separate: bool,

    /// Sort by the given column, either its index or its header.
    /// The losses are sorted in descending order by default.
    #[arg(long)]
    pub(crate) sort: Option<Column>,

    /// Sort in ascending order.
    #[arg(long)]
    pub(crate) asc: bool,

    /// Also save the rows, combined and sorted as displayed, to this CSV
    /// file.
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,

    /// Specify how many times the page is read again while its table is
    /// still empty.
    #[arg(long, default_value_t = 10)]
    pub(crate) retries: u32,

    /// Specify the delay between two reads, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub(crate) interval: u64,
}

#[derive(Args)]
pub(crate) struct SettingsArgs {
    #[command(subcommand)]
    pub(crate) action: SettingsAction,

    /// Specify the file the overlay settings are stored in.
    #[arg(long, global = true)]
    pub(crate) store: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Copy)]
pub(crate) enum SettingsAction {
    /// Print the stored settings.
    Show,
    /// Restore the default settings.
    Reset,
}

#[derive(Args)]
pub(crate) struct FetchArgs {
    /// The fighter id of the player, or the full URL of the page.
    pub(crate) player_or_url: String,

    /// Specify the page to download.
    #[arg(long, value_enum, default_value_t = PageArg::History)]
    pub(crate) page: PageArg,

    /// Specify the character the player played.
    #[arg(short, long)]
    pub(crate) character: Option<u32>,

    /// Specify the control type the player used. Matchup chart only.
    #[arg(long)]
    pub(crate) input_type: Option<u32>,

    /// Specify the battle type. Matchup chart only.
    #[arg(long, default_value_t = 1)]
    pub(crate) battle_type: u32,

    /// Specify the first day of the matches.
    #[arg(long)]
    pub(crate) from: Option<NaiveDate>,

    /// Specify the last day of the matches.
    #[arg(long)]
    pub(crate) to: Option<NaiveDate>,

    /// Specify the time zone the page shows the match times in.
    #[arg(long, default_value = "Asia/Tokyo")]
    pub(crate) timezone: String,

    /// Specify the file the page is saved to.
    /// By default, the page is saved as `<page>.html` in the current
    /// working directory.
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub(crate) enum XAxisArg {
    Date,
    Count,
}

impl From<XAxisArg> for XAxisMode {
    fn from(arg: XAxisArg) -> Self {
        match arg {
            XAxisArg::Date => XAxisMode::Date,
            XAxisArg::Count => XAxisMode::SequenceIndex,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub(crate) enum MetricArg {
    Mr,
    Lp,
}

impl From<MetricArg> for SeriesKind {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Mr => SeriesKind::MatchRating,
            MetricArg::Lp => SeriesKind::LeaguePoints,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub(crate) enum PageArg {
    History,
    Matchup,
}

/// An overlay line given on the command line. The slot counts from 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LineOverride {
    pub(crate) slot: usize,
    pub(crate) kind: AverageKind,
    pub(crate) period: String,
}

fn parse_line(line: &str) -> Result<LineOverride, String> {
    let mut parts = line.splitn(3, ':');
    let (Some(slot), Some(kind), Some(period)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("`{line}` is not of the form SLOT:KIND:PERIOD."));
    };

    Ok(LineOverride {
        slot: parse_slot(slot)?,
        kind: kind.parse()?,
        period: period.to_owned(),
    })
}

fn parse_slot(slot: &str) -> Result<usize, String> {
    match slot.trim().parse::<usize>() {
        Ok(slot) if (1..=LINE_COUNT).contains(&slot) => Ok(slot - 1),
        _ => Err(format!("The line slot must be between 1 and {LINE_COUNT}, not `{slot}`.")),
    }
}

fn parse_path(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);

    if !path.exists() {
        return Err(format!("The `{}` path does not exist.", path.display()));
    }

    if !path.is_dir() {
        return Err(format!(
            "The `{}` path must point to a directory.",
            path.display()
        ));
    }

    Ok(path)
}

fn parse_file(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);

    if !path.is_file() {
        return Err(format!("The `{}` path must point to a file.", path.display()));
    }

    Ok(path)
}

pub(crate) trait PathExt {
    fn or_current_dir(self) -> Result<PathBuf, CliError>;
}

impl PathExt for Option<PathBuf> {
    fn or_current_dir(self) -> Result<PathBuf, CliError> {
        if let Some(path) = self {
            Ok(path)
        } else {
            env::current_dir().map_err(|e| CliError::Path(e.to_string()))
        }
    }
}
