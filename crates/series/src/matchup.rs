//! The matchup table: one row per opponent character and control type, with
//! the match counts and the win ratio against it.

use std::cmp::Ordering;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Serialize;

/// Rows that summarize the table rather than describe an opponent.
const SUMMARY_ROW_NAMES: [&str; 3] = ["合計", "Σ", "Random"];

/// The control type tags appended to character names, such as `Ryu[C]`.
const CONTROL_TAGS: [&str; 2] = ["[C]", "[M]"];

/// The number of cells a matchup row carries before the chart cell.
pub const COUNTED_CELLS: usize = 8;

/// A row of the matchup table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupRecord {
    /// The opponent character, possibly tagged with its control type.
    pub name: String,
    /// The opponent control type.
    pub input_type: String,
    /// The number of matches played.
    pub total: i64,
    /// The number of matches won.
    pub wins: i64,
    /// The number of matches lost.
    pub losses: i64,
    /// The number of draws.
    pub draws: i64,
    /// Wins minus losses.
    pub diff: i64,
    /// The win ratio in percent.
    pub ratio: f64,
    /// The markup of the trailing chart cell, kept verbatim.
    pub aux_html: String,
}

impl MatchupRecord {
    /// Reads a record from the inner texts of a table row and the markup of
    /// its chart cell.
    ///
    /// Returns `None` for rows that are too short and for summary rows.
    pub fn from_cells<S: AsRef<str>>(cells: &[S], aux_html: Option<&str>) -> Option<MatchupRecord> {
        if cells.len() < COUNTED_CELLS {
            return None;
        }

        let text = |i: usize| cells[i].as_ref().trim();

        let name = text(0);
        if SUMMARY_ROW_NAMES.contains(&name) {
            return None;
        }

        Some(Self {
            name: name.to_owned(),
            input_type: text(1).to_owned(),
            total: parse_count(text(2)),
            wins: parse_count(text(3)),
            losses: parse_count(text(4)),
            draws: parse_count(text(5)),
            diff: parse_count(text(6)),
            ratio: parse_ratio(text(7)),
            aux_html: aux_html.unwrap_or_default().to_owned(),
        })
    }

    fn compare(&self, other: &MatchupRecord, column: Column) -> Ordering {
        match column {
            Column::Name => compare_text(&self.name, &other.name),
            Column::InputType => compare_text(&self.input_type, &other.input_type),
            Column::Total => self.total.cmp(&other.total),
            Column::Wins => self.wins.cmp(&other.wins),
            Column::Losses => self.losses.cmp(&other.losses),
            Column::Draws => self.draws.cmp(&other.draws),
            Column::Diff => self.diff.cmp(&other.diff),
            Column::Ratio => self.ratio.total_cmp(&other.ratio),
        }
    }
}

/// Strips the control type tags from a character name.
pub fn base_name(name: &str) -> String {
    CONTROL_TAGS
        .iter()
        .fold(name.to_owned(), |name, tag| name.replace(tag, ""))
        .trim()
        .to_owned()
}

/// Combines the records of the same character across control types.
///
/// Counts are summed and the ratio is recomputed as `wins / total * 100`,
/// rounded to two decimals. Characters keep the order they first appear in.
pub fn combine(records: &[MatchupRecord]) -> Vec<MatchupRecord> {
    let mut combined: Vec<MatchupRecord> = Vec::new();

    for record in records {
        let name = base_name(&record.name);

        let entry = match combined.iter().position(|c| c.name == name) {
            Some(i) => &mut combined[i],
            None => {
                combined.push(MatchupRecord {
                    name,
                    total: 0,
                    wins: 0,
                    losses: 0,
                    draws: 0,
                    diff: 0,
                    ..record.clone()
                });
                let last = combined.len() - 1;
                &mut combined[last]
            }
        };

        entry.total += record.total;
        entry.wins += record.wins;
        entry.losses += record.losses;
        entry.draws += record.draws;
        entry.diff += record.diff;
        entry.ratio = win_ratio(entry.wins, entry.total);
    }

    combined
}

fn win_ratio(wins: i64, total: i64) -> f64 {
    if total > 0 {
        (wins as f64 / total as f64 * 10_000.0).round() / 100.0
    } else {
        0.0
    }
}

/// A sortable column of the matchup table, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// The opponent character.
    Name,
    /// The opponent control type.
    InputType,
    /// Matches played.
    Total,
    /// Matches won.
    Wins,
    /// Matches lost.
    Losses,
    /// Draws.
    Draws,
    /// Wins minus losses.
    Diff,
    /// Win ratio.
    Ratio,
}

impl Column {
    /// All sortable columns, in table order.
    pub const ALL: [Column; COUNTED_CELLS] = [
        Column::Name,
        Column::InputType,
        Column::Total,
        Column::Wins,
        Column::Losses,
        Column::Draws,
        Column::Diff,
        Column::Ratio,
    ];

    /// The position of the column in the table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The column at position `index`, if it is sortable.
    pub fn from_index(index: usize) -> Option<Column> {
        Self::ALL.get(index).copied()
    }

    /// The column header.
    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "VS",
            Column::InputType => "Control",
            Column::Total => "Total",
            Column::Wins => "Wins",
            Column::Losses => "Losses",
            Column::Draws => "Draws",
            Column::Diff => "Diff",
            Column::Ratio => "Ratio",
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Column::from_index(index).ok_or_else(|| format!("no sortable column at {index}"));
        }

        Column::ALL
            .into_iter()
            .find(|column| column.title().eq_ignore_ascii_case(s))
            .or(match s.to_ascii_lowercase().as_str() {
                "name" => Some(Column::Name),
                "input" | "input-type" | "control-type" => Some(Column::InputType),
                _ => None,
            })
            .ok_or_else(|| format!("unknown column: `{s}`"))
    }
}

/// The column the table is sorted by and the direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    /// The sort column.
    pub column: Column,
    /// `true` for ascending order.
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: Column::Losses,
            ascending: false,
        }
    }
}

impl SortState {
    /// Applies a click on the header of `column`: the current column flips its
    /// direction, another column becomes the sort column in descending order.
    pub fn select(&mut self, column: Column) {
        if self.column == column {
            self.ascending = !self.ascending;
        } else {
            self.column = column;
            self.ascending = false;
        }
    }

    /// Sorts `records` in place. The sort is stable.
    pub fn sort(&self, records: &mut [MatchupRecord]) {
        records.sort_by(|a, b| {
            let ordering = a.compare(b, self.column);
            if self.ascending { ordering } else { ordering.reverse() }
        });
    }
}

/// The state of the interactive matchup table of one page view.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupTable {
    records: Vec<MatchupRecord>,
    combined: bool,
    sort: SortState,
}

impl MatchupTable {
    /// Creates the table over the records scraped from the page. Control
    /// types start combined.
    pub fn new(records: Vec<MatchupRecord>) -> MatchupTable {
        Self {
            records,
            combined: true,
            sort: SortState::default(),
        }
    }

    /// Whether the control types are combined.
    pub fn is_combined(&self) -> bool {
        self.combined
    }

    /// The current sort.
    pub fn sort(&self) -> SortState {
        self.sort
    }

    /// The records scraped from the page, as they were scraped.
    pub fn records(&self) -> &[MatchupRecord] {
        &self.records
    }

    /// Combines or separates the control types.
    pub fn set_combined(&mut self, combined: bool) {
        self.combined = combined;
    }

    /// Sorts by the given column and direction.
    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Applies a click on a column header.
    pub fn select_column(&mut self, column: Column) {
        self.sort.select(column);
    }

    /// Replaces the records after a navigation, keeping the view options.
    pub fn reset(&mut self, records: Vec<MatchupRecord>) {
        self.records = records;
    }

    /// The rows to display, combined and sorted as configured.
    pub fn rows(&self) -> Vec<MatchupRecord> {
        let mut rows = if self.combined {
            combine(&self.records)
        } else {
            self.records.clone()
        };

        self.sort.sort(&mut rows);
        rows
    }
}

fn parse_count(text: &str) -> i64 {
    let text = text.replace(',', "");
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(text.len(), |(i, _)| i);

    text[..end].parse().unwrap_or(0)
}

fn parse_ratio(text: &str) -> f64 {
    let text = text.replace(',', "");
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(text.len(), |(i, _)| i);

    text[..end].parse().unwrap_or(0.0)
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
