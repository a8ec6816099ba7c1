use std::path::Path;
use std::thread;
use std::time::Duration;

use mrlens_series::matchup::Column;
use mrlens_series::matchup::MatchupRecord;
use mrlens_series::matchup::MatchupTable;
use mrlens_series::matchup::SortState;
use mrlens_vis::layout::VisLayout;
use mrlens_vis::render::page::write_matchup_page;
use tracing::debug;
use tracing::info;

use crate::cli::MatchupArgs;
use crate::cli::PathExt;
use crate::error::CliError;
use crate::page::SavedPage;

pub(crate) fn matchup(args: MatchupArgs) -> Result<(), CliError> {
    let output_path = args.output_path.clone().or_current_dir()?;
    let page = SavedPage::new(&args.input);

    let records = wait_for_rows(&page, args.retries, Duration::from_millis(args.interval))?;

    let mut table = MatchupTable::new(records);
    table.set_combined(!args.separate);
    table.set_sort(SortState {
        column: args.sort.unwrap_or(Column::Losses),
        ascending: args.asc,
    });

    let layout = VisLayout::init(&output_path)?;
    write_matchup_page(layout.matchup_file_path(), "Matchups", &table)?;

    if let Some(path) = &args.csv {
        let rows = write_csv(path, &table)?;
        info!(rows, path = %path.display(), "saved the matchup rows");
    }

    println!(
        "mrlens aggregated {} matchups of `{}` in: `{}`",
        table.rows().len(),
        args.input.display(),
        layout.matchup_file_path().display()
    );

    Ok(())
}

/// Saves the displayed rows of `table` to the CSV file at `path` and returns
/// the number of rows written.
fn write_csv(path: &Path, table: &MatchupTable) -> Result<usize, CliError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(Column::ALL.map(Column::title))?;

    let rows = table.rows();
    for row in &rows {
        let input_type = if table.is_combined() { "-" } else { row.input_type.as_str() };

        writer.write_record([
            row.name.clone(),
            input_type.to_owned(),
            row.total.to_string(),
            row.wins.to_string(),
            row.losses.to_string(),
            row.draws.to_string(),
            row.diff.to_string(),
            format!("{:.2}", row.ratio),
        ])?;
    }

    writer.flush()?;
    Ok(rows.len())
}

/// Reads the rows of the matchup table, reading the page again while the
/// table is still empty.
fn wait_for_rows(page: &SavedPage, retries: u32, interval: Duration) -> Result<Vec<MatchupRecord>, CliError> {
    for attempt in 0..=retries {
        if attempt > 0 {
            thread::sleep(interval);
        }

        let records = page.matchup_records()?;
        if !records.is_empty() {
            info!(rows = records.len(), attempt, "read the matchup table");
            return Ok(records);
        }

        debug!(attempt, path = %page.path().display(), "the matchup table is empty");
    }

    Err(CliError::NotFound(format!(
        "the `{}` page has no matchup table",
        page.path().display()
    )))
}
