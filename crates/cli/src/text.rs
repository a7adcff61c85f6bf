use crate::json::{
    JsonComparison, JsonDiffRow, JsonDocumentMax, JsonLoadStats, JsonNormalizedLine,
};

pub(crate) fn format_load_stats(stats: &JsonLoadStats) -> String {
    let mut out = String::new();
    out.push_str("== load stats ==\n");
    out.push_str(&format!(
        "candidates={} loaded={} bytes={}\n",
        stats.candidate_files, stats.loaded_files, stats.loaded_bytes
    ));

    let mut skips: Vec<(&str, u64)> = vec![
        ("extension", stats.skipped_extension),
        ("not_found", stats.skipped_not_found),
        ("permission_denied", stats.skipped_permission_denied),
        ("too_large", stats.skipped_too_large),
        ("binary", stats.skipped_binary),
        ("walk_errors", stats.skipped_walk_errors),
    ];
    skips.retain(|(_, v)| *v > 0);
    if !skips.is_empty() {
        out.push_str("skipped:\n");
        for (k, v) in skips {
            out.push_str(&format!("- {k}={v}\n"));
        }
    }
    out.push('\n');
    out
}

pub(crate) fn format_ranked(pairs: &[JsonComparison], threshold: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "similar pairs (>= {threshold:.2}%): {}\n",
        pairs.len()
    ));
    for pair in pairs {
        out.push_str(&format!("score={:6.2} - {} / {}\n", pair.score, pair.a, pair.b));
    }
    out.push('\n');
    out
}

pub(crate) fn format_summary(maxima: &[JsonDocumentMax]) -> String {
    let mut out = String::new();
    out.push_str(&format!("documents: {}\n", maxima.len()));
    for entry in maxima {
        out.push_str(&format!("max={:6.2} - {}\n", entry.max_similarity, entry.id));
    }
    out.push('\n');
    out
}

fn row_marker(class: &str) -> char {
    match class {
        "match" => '=',
        "change" => '~',
        "insert" => '+',
        "delete" => '-',
        _ => ' ',
    }
}

fn line_no(n: Option<usize>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}

pub(crate) fn format_diff(a: &str, b: &str, score: f64, rows: &[JsonDiffRow]) -> String {
    let width = rows
        .iter()
        .map(|row| row.left_text.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("{a} <> {b} score={score:.2}\n"));
    for row in rows {
        out.push_str(&format!(
            "{} {:>5} {:<width$} | {:>5} {}\n",
            row_marker(row.class),
            line_no(row.left_line),
            row.left_text,
            line_no(row.right_line),
            row.right_text,
        ));
    }
    out.push('\n');
    out
}

pub(crate) fn format_normalized(id: &str, lines: &[JsonNormalizedLine]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{id}\n"));
    for line in lines {
        let flag = if line.boilerplate {
            'b'
        } else if line.significant {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!("{:>5} {flag} {}\n", line.line, line.canonical));
    }
    out.push('\n');
    out
}
