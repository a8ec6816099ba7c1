//! The markup of the matchup table.

use mrlens_series::matchup::Column;
use mrlens_series::matchup::MatchupRecord;
use mrlens_series::matchup::MatchupTable;

use crate::error::VisError;
use crate::render::OutputStream;
use crate::render::Render;
use crate::render::write_escaped;

const FAVORABLE_COLOR: &str = "#36a2eb";
const UNFAVORABLE_COLOR: &str = "#ff6384";

/// A matchup table as it is currently combined and sorted.
pub struct MatchupView<'a> {
    table: &'a MatchupTable,
}

impl<'a> MatchupView<'a> {
    /// Creates the view of `table`.
    pub fn new(table: &'a MatchupTable) -> MatchupView<'a> {
        Self { table }
    }
}

impl Render for MatchupView<'_> {
    fn render<O>(&self, output: &mut O) -> Result<(), VisError>
    where
        O: OutputStream,
    {
        let sort = self.table.sort();
        let combined = self.table.is_combined();

        output.write(r#"<table class="mrlens-matchup"><thead><tr>"#)?;
        for column in Column::ALL {
            let indicator = match (column == sort.column, sort.ascending) {
                (false, _) => "",
                (true, true) => " ▲",
                (true, false) => " ▼",
            };

            output.write(&format!(
                r#"<th data-column="{}">{}{indicator}</th>"#,
                column.index(),
                column.title()
            ))?;
        }
        output.write("<th></th></tr></thead><tbody>")?;

        for record in self.table.rows() {
            render_row(output, &record, combined)?;
        }

        output.write("</tbody></table>")
    }
}

fn render_row<O: OutputStream>(
    output: &mut O,
    record: &MatchupRecord,
    combined: bool,
) -> Result<(), VisError> {
    output.write("<tr><td>")?;
    write_escaped(output, &record.name)?;
    output.write("</td><td>")?;
    if combined {
        output.write("-")?;
    } else {
        write_escaped(output, &record.input_type)?;
    }
    output.write("</td>")?;

    for count in [record.total, record.wins, record.losses, record.draws] {
        output.write(&format!("<td>{count}</td>"))?;
    }

    output.write(&format!(
        "<td{}>{}</td>",
        style(record.diff.signum() as f64),
        record.diff
    ))?;
    output.write(&format!(
        "<td{}>{:.2}%</td>",
        style(record.ratio - 50.0),
        record.ratio
    ))?;

    output.write("<td>")?;
    output.write(&record.aux_html)?;
    output.write("</td></tr>")
}

/// The color of a value by how favorable its sign is.
fn style(balance: f64) -> String {
    let color = if balance > 0.0 {
        FAVORABLE_COLOR
    } else if balance < 0.0 {
        UNFAVORABLE_COLOR
    } else {
        return String::new();
    };

    format!(r#" style="color: {color}""#)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::render::render_to_string;

    fn record(name: &str, input_type: &str, total: i64, wins: i64) -> MatchupRecord {
        let losses = total - wins;

        MatchupRecord {
            name: name.to_owned(),
            input_type: input_type.to_owned(),
            total,
            wins,
            losses,
            draws: 0,
            diff: wins - losses,
            ratio: wins as f64 / total as f64 * 100.0,
            aux_html: String::from(r#"<a href="/chart">chart</a>"#),
        }
    }

    fn table() -> MatchupTable {
        MatchupTable::new(vec![
            record("Ryu[C]", "C", 100, 60),
            record("Ryu[M]", "M", 50, 20),
            record("Ken<&>", "C", 10, 2),
        ])
    }

    #[test]
    fn combined_rows_hide_the_control_type() -> Result<(), VisError> {
        let table = table();

        let html = render_to_string(&MatchupView::new(&table))?;

        assert!(html.contains("<tr><td>Ryu</td><td>-</td><td>150</td><td>80</td><td>70</td><td>0</td>"));
        assert!(html.contains(r#"<td style="color: #36a2eb">10</td><td style="color: #36a2eb">53.33%</td>"#));
        assert!(html.contains(r#"<td><a href="/chart">chart</a></td>"#));
        assert!(html.contains("Ken&lt;&amp;&gt;"));
        Ok(())
    }

    #[test]
    fn sorted_column_shows_its_direction() -> Result<(), VisError> {
        let mut table = table();

        let html = render_to_string(&MatchupView::new(&table))?;
        assert!(html.contains(r#"<th data-column="4">Losses ▼</th>"#));

        table.select_column(Column::Losses);
        let html = render_to_string(&MatchupView::new(&table))?;
        assert!(html.contains(r#"<th data-column="4">Losses ▲</th>"#));
        assert!(html.contains(r#"<th data-column="0">VS</th>"#));
        Ok(())
    }

    #[test]
    fn separated_rows_keep_the_control_type() -> Result<(), VisError> {
        let mut table = table();
        table.set_combined(false);

        let html = render_to_string(&MatchupView::new(&table))?;

        assert!(html.contains("<tr><td>Ryu[M]</td><td>M</td><td>50</td>"));
        assert!(html.contains(r#"<td style="color: #ff6384">-10</td><td style="color: #ff6384">40.00%</td>"#));
        Ok(())
    }
}
