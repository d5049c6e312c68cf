//! `rca-reviewer issues` command.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Config;
use crate::model::IssueRecord;
use crate::store::IssueStore;

/// Execute the `issues` command.
///
/// Displays a table of every comment applied to the document, with the
/// anchor it was placed on and when.
///
/// # Errors
///
/// Returns an error string if the document's state cannot be read.
pub fn run(config: &Config, document: &Path) -> Result<(), String> {
    let ctx = super::live_context(config, document)?;
    let records = IssueStore::new(&ctx).get().map_err(|e| e.to_string())?;
    print!("{}", format_table(&records));
    Ok(())
}

fn format_table(records: &BTreeMap<String, IssueRecord>) -> String {
    if records.is_empty() {
        return "No comments applied yet.\n".to_string();
    }

    let mut rows: Vec<(&str, &str, String, String)> = records
        .iter()
        .map(|(id, record)| {
            (
                id.as_str(),
                record.comment.issue_type.as_str(),
                shorten(&record.comment.anchor_text, 48),
                record.applied_at.format("%Y-%m-%d %H:%M").to_string(),
            )
        })
        .collect();
    rows.sort_by(|a, b| a.3.cmp(&b.3).then_with(|| a.0.cmp(b.0)));

    let id_width = column_width(rows.iter().map(|r| r.0), "ID");
    let type_width = column_width(rows.iter().map(|r| r.1), "TYPE");
    let anchor_width = column_width(rows.iter().map(|r| r.2.as_str()), "ANCHOR");

    let mut out = format!(
        "{:<id_width$}  {:<type_width$}  {:<anchor_width$}  APPLIED\n",
        "ID", "TYPE", "ANCHOR"
    );
    out.push_str(&format!(
        "{:-<id_width$}  {:-<type_width$}  {:-<anchor_width$}  {:-<16}\n",
        "", "", "", ""
    ));
    for (id, issue_type, anchor, applied) in &rows {
        out.push_str(&format!(
            "{id:<id_width$}  {issue_type:<type_width$}  {anchor:<anchor_width$}  {applied}\n"
        ));
    }
    out.push_str(&format!("\n{} comment(s) applied.\n", rows.len()));
    out
}

fn column_width<'a>(cells: impl Iterator<Item = &'a str>, header: &str) -> usize {
    cells.fold(header.len(), |width, cell| width.max(cell.chars().count()))
}

/// Single-line form of `text`, cut to at most `max` characters.
fn shorten(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}
