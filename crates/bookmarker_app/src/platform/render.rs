use bookmarker_core::{AppViewModel, Notice, Phase, RecordRowView, Severity};

/// Status line for the current view, prefixed with run progress when a run
/// is active.
pub fn status_line(view: &AppViewModel) -> String {
    match (view.phase, view.progress) {
        (Phase::Running, Some(progress)) => format!(
            "[{}/{}] {}",
            progress.done, progress.total, view.status_text
        ),
        _ => view.status_text.clone(),
    }
}

pub fn notice_line(notice: &Notice) -> String {
    let prefix = match notice.severity {
        Severity::Info => "note",
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    format!("{prefix}: {}", notice.text)
}

/// Two lines per record, numbered from 1, with the URL under the checkbox.
pub fn record_lines(view: &AppViewModel) -> Vec<String> {
    let width = view.rows.len().to_string().len();
    view.rows
        .iter()
        .enumerate()
        .flat_map(|(index, row)| format_row(index + 1, width, row))
        .collect()
}

pub fn summary_line(view: &AppViewModel) -> String {
    format!(
        "{} of {} shortcuts opened",
        view.bookmarked_count, view.record_count
    )
}

fn format_row(number: usize, width: usize, row: &RecordRowView) -> [String; 2] {
    let mark = if row.bookmarked { 'x' } else { ' ' };
    [
        format!("{number:>width$}. [{mark}] {} ({})", row.title, row.domain),
        format!("{:indent$}{}", "", row.url, indent = width + 2),
    ]
}
