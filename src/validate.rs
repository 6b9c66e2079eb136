use std::collections::HashSet;

use crate::schema::{self, METADATA_COLUMNS};

// Errors gate the whole import; warnings are informational only.
#[derive(Debug, Default)]
pub struct HeaderReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl HeaderReport {
    pub fn is_blocking(&self) -> bool {
        !self.errors.is_empty()
    }
}

// All rules are evaluated; nothing short-circuits, so one report names
// every structural problem in the file.
pub fn validate_header(header: &[String]) -> HeaderReport {
    let mut report = HeaderReport::default();

    // Rule 1: the metadata block is verbatim and positional. This is a
    // bit-exact comparison; normalization applies to rules 2-5 only.
    for (i, expected) in METADATA_COLUMNS.iter().enumerate() {
        let found = header.get(i).map(String::as_str).unwrap_or("");
        if found != *expected {
            report.errors.push(format!(
                "metadata column {i}: expected \"{expected}\", found \"{found}\""
            ));
        }
    }

    // Rule 2: at least one identifier column must survive normalization.
    let norm_at = |i: usize| header.get(i).map(|s| schema::normalize_header(s));
    let has_user_id = norm_at(0) == Some(schema::normalize_header(METADATA_COLUMNS[0]));
    let has_email = norm_at(1) == Some(schema::normalize_header(METADATA_COLUMNS[1]));
    if !has_user_id && !has_email {
        report.errors.push(
            "no respondent identifier column: neither UserID (column 0) nor Email (column 1) is present"
                .to_string(),
        );
    }

    // Rule 3: low question-column count is a warning, not a gate.
    let question_columns = header.len().saturating_sub(METADATA_COLUMNS.len());
    if question_columns < 90 {
        report.warnings.push(format!(
            "only {question_columns} question columns found (expected at least 90)"
        ));
    }

    // Rule 4: every registered question must appear somewhere after
    // normalization.
    let normalized: HashSet<String> = header
        .iter()
        .map(|h| schema::normalize_header(h))
        .collect();
    for question in schema::questions() {
        if !normalized.contains(&schema::normalize_header(question.canonical_text)) {
            report.errors.push(format!(
                "missing question column: \"{}\"",
                schema::short_label(question.canonical_text)
            ));
        }
    }

    // Rule 5: total width.
    let expected_len = METADATA_COLUMNS.len() + schema::question_count();
    if header.len() < expected_len {
        report.errors.push(format!(
            "expected at least {expected_len} columns (8 metadata + {} questions), found {}",
            schema::question_count(),
            header.len()
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn full_header() -> Vec<String> {
        METADATA_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(
                schema::questions()
                    .iter()
                    .map(|q| q.canonical_text.to_string()),
            )
            .collect()
    }

    #[test]
    fn complete_header_passes() {
        let report = validate_header(&full_header());
        assert!(report.errors.is_empty(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn header_with_glyph_drift_still_passes() {
        let mut header = full_header();
        // Curly quotes and doubled spaces in a question column are folded
        // away by normalization.
        header[10] = header[10]
            .replace(' ', "  ")
            .replace('\'', "\u{2019}");
        let report = validate_header(&header);
        assert!(report.errors.is_empty(), "errors: {:?}", report.errors);
    }

    #[test]
    fn renamed_metadata_column_is_an_error() {
        let mut header = full_header();
        header[3] = "Organização".to_string();
        let report = validate_header(&header);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("metadata column 3") && e.contains("Empresa")));
    }

    #[test]
    fn padded_metadata_cell_is_an_error() {
        let mut header = full_header();
        header[0] = " UserID".to_string();
        header[4] = "Setor ".to_string();
        let report = validate_header(&header);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("metadata column 0") && e.contains("\" UserID\"")));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("metadata column 4") && e.contains("\"Setor \"")));
    }

    #[test]
    fn missing_both_identifier_columns_is_an_error() {
        let mut header = full_header();
        header[0] = "Matrícula".to_string();
        header[1] = "Contato".to_string();
        let report = validate_header(&header);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("no respondent identifier column")));
    }

    #[test]
    fn one_identifier_column_is_enough_for_rule_two() {
        let mut header = full_header();
        header[0] = "Matrícula".to_string();
        let report = validate_header(&header);
        // Rule 1 still flags the renamed cell, but rule 2 stays quiet.
        assert!(!report
            .errors
            .iter()
            .any(|e| e.contains("no respondent identifier column")));
    }

    #[test]
    fn missing_question_column_is_named() {
        let mut header = full_header();
        let dropped = header.remove(8 + 5);
        let report = validate_header(&header);
        let label = schema::short_label(&dropped);
        assert!(
            report.errors.iter().any(|e| e.contains(&label)),
            "expected an error naming {label:?}, got {:?}",
            report.errors
        );
        // Rule 5 fires too: the header is now one column short.
        assert!(report.errors.iter().any(|e| e.contains("expected at least 99")));
    }

    #[test]
    fn short_header_warns_about_question_count() {
        let header: Vec<String> = full_header().into_iter().take(50).collect();
        let report = validate_header(&header);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("42 question columns")));
        assert!(report.is_blocking());
    }
}
