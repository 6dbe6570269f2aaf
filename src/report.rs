use crate::calc;
use crate::store::ClassRecord;
use std::path::{Path, PathBuf};

/// Report files are named after the record they describe. Names are
/// letters-only by the time they get here, so the file name is safe.
pub fn report_file_name(name: &str) -> String {
    format!("{}_grades.csv", name)
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn joined_scores(scores: &[i64]) -> String {
    scores
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Three-row report for one student: header, the student's statistics,
/// and the full score list. None when there are no scores to report.
pub fn individual_report(student_name: &str, scores: &[i64]) -> Option<String> {
    let stats = calc::score_stats(scores)?;
    let mut csv = String::from("Name,Highest,Lowest,Average\n");
    csv.push_str(&format!(
        "{},{},{},{:.2}\n",
        csv_quote(student_name),
        stats.highest,
        stats.lowest,
        stats.average
    ));
    csv.push_str(&format!(
        "{}\n",
        csv_quote(&format!("All grades: {}", joined_scores(scores)))
    ));
    Some(csv)
}

/// Class report: one row per student in roster order, then aggregate
/// rows. Rows carry each student's first score; the aggregates cover
/// every score of every student. None when the class holds no scores.
pub fn class_report(class: &ClassRecord) -> Option<String> {
    let stats = calc::score_stats(&class.all_scores())?;
    let mut csv = String::from("Class,Student,Score\n");
    for student in &class.students {
        let first = student.scores.first().copied().unwrap_or(0);
        csv.push_str(&format!(
            "{},{},{}\n",
            csv_quote(&class.name),
            csv_quote(&student.name),
            first
        ));
    }
    csv.push_str(&format!("Highest: {}\n", stats.highest));
    csv.push_str(&format!("Lowest: {}\n", stats.lowest));
    csv.push_str(&format!("Average: {:.2}\n", stats.average));
    Some(csv)
}

/// Whole-file write; an existing report of the same name is overwritten.
pub fn write_report(dir: &Path, file_name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents)?;
    Ok(path)
}
