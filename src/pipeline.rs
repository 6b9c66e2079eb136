use tracing::debug;

use crate::aggregate::aggregate;
use crate::models::ImportResult;
use crate::rows::process_row;
use crate::validate::validate_header;
use crate::workbook::Cell;

// Structural gate, per-row processing, aggregation. Pure function of the
// grid; every call builds a fresh result.
pub fn run_import(grid: &[Vec<Cell>]) -> ImportResult {
    let Some((header_cells, data_rows)) = grid.split_first() else {
        return ImportResult {
            total_rows: 0,
            valid_respondents: 0,
            invalid_rows: 0,
            errors: vec!["spreadsheet is empty (no header row)".to_string()],
            warnings: Vec::new(),
            respondents: Vec::new(),
            aggregates: aggregate(&[]),
        };
    };

    let header: Vec<String> = header_cells.iter().map(Cell::as_text).collect();
    let report = validate_header(&header);

    // Fully blank rows (padding in hand-edited sheets) are not data and
    // are not counted, but they keep their sheet position so row numbers
    // in messages stay accurate.
    let is_blank_row = |row: &Vec<Cell>| row.iter().all(Cell::is_blank);
    let total_rows = data_rows.iter().filter(|row| !is_blank_row(row)).count();

    // Structural errors gate the whole import: no row is processed.
    if report.is_blocking() {
        return ImportResult {
            total_rows,
            valid_respondents: 0,
            invalid_rows: 0,
            errors: report.errors,
            warnings: report.warnings,
            respondents: Vec::new(),
            aggregates: aggregate(&[]),
        };
    }

    let mut errors = report.errors;
    let warnings = report.warnings;
    let mut respondents = Vec::new();
    let mut invalid_rows = 0;

    for (i, row) in data_rows.iter().enumerate() {
        if is_blank_row(row) {
            continue;
        }
        // Row numbers in messages are sheet positions; the header is row 0.
        match process_row(&header, row.as_slice(), i + 1) {
            Ok(respondent) => respondents.push(respondent),
            Err(mut row_errors) => {
                debug!(row = i + 1, problems = row_errors.len(), "row rejected");
                invalid_rows += 1;
                errors.append(&mut row_errors);
            }
        }
    }

    let aggregates = aggregate(&respondents);
    ImportResult {
        total_rows,
        valid_respondents: respondents.len(),
        invalid_rows,
        errors,
        warnings,
        respondents,
        aggregates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{self, Pillar, QuestionDefinition, METADATA_COLUMNS};

    fn header_row() -> Vec<Cell> {
        METADATA_COLUMNS
            .iter()
            .map(|c| Cell::Text(c.to_string()))
            .chain(
                schema::questions()
                    .iter()
                    .map(|q| Cell::Text(q.canonical_text.to_string())),
            )
            .collect()
    }

    fn data_row(name: &str, score_for: impl Fn(&QuestionDefinition) -> Cell) -> Vec<Cell> {
        let mut row = vec![
            Cell::Text(format!("id-{name}")),
            Cell::Text(format!("{name}@example.com")),
            Cell::Text(name.to_string()),
            Cell::Text("Acme".to_string()),
            Cell::Text("Varejo".to_string()),
            Cell::Text("Sim".to_string()),
            Cell::Text("2 QAs".to_string()),
            Cell::Text("Produto".to_string()),
        ];
        for question in schema::questions() {
            row.push(score_for(question));
        }
        row
    }

    fn uniform_data_row(name: &str, score: u8) -> Vec<Cell> {
        data_row(name, |q| {
            if q.is_textual {
                Cell::Text("Funcional".to_string())
            } else {
                Cell::Number(f64::from(score))
            }
        })
    }

    #[test]
    fn missing_question_column_blocks_all_rows() {
        let mut header = header_row();
        let dropped = match header.remove(20) {
            Cell::Text(s) => s,
            other => panic!("unexpected header cell {other:?}"),
        };
        let mut row = uniform_data_row("ana", 3);
        row.remove(20);

        let result = run_import(&[header, row]);
        assert_eq!(result.valid_respondents, 0);
        assert_eq!(result.invalid_rows, 0);
        assert!(result.respondents.is_empty());
        let label = schema::short_label(&dropped);
        assert!(
            result.errors.iter().any(|e| e.contains(&label)),
            "expected an error naming {label:?}"
        );
    }

    #[test]
    fn one_bad_row_never_discards_its_neighbors() {
        let mut bad = uniform_data_row("bruno", 3);
        bad[8] = Cell::Number(7.0);
        let grid = vec![
            header_row(),
            uniform_data_row("ana", 4),
            bad,
            uniform_data_row("carla", 2),
        ];

        let result = run_import(&grid);
        assert_eq!(result.total_rows, 3);
        assert_eq!(result.valid_respondents, 2);
        assert_eq!(result.invalid_rows, 1);
        assert!(result.errors.iter().any(|e| e.contains("\"7\"")));
        let names: Vec<&str> = result
            .respondents
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["ana", "carla"]);
    }

    #[test]
    fn full_import_scores_pillars_end_to_end() {
        let respondent_row = |name: &str| {
            data_row(name, |q| {
                if q.is_textual {
                    return Cell::Text("Funcional;API".to_string());
                }
                match q.pillar {
                    Pillar::Lideranca => Cell::Number(5.0),
                    Pillar::TestesAutomatizados => Cell::Number(0.0),
                    _ => Cell::Number(3.0),
                }
            })
        };
        let grid = vec![
            header_row(),
            respondent_row("ana"),
            respondent_row("bruno"),
            respondent_row("carla"),
        ];

        let result = run_import(&grid);
        assert_eq!(result.valid_respondents, 3);
        assert!(result.errors.is_empty());

        let aggregates = &result.aggregates;
        assert_eq!(aggregates.mean_by_pillar[&Pillar::Lideranca], 5.0);
        assert_eq!(aggregates.mean_by_pillar[&Pillar::TestesAutomatizados], 0.0);
        assert_eq!(aggregates.top_strong_pillars[0], Pillar::Lideranca);
        assert_eq!(aggregates.top_weak_pillars[0], Pillar::TestesAutomatizados);

        for respondent in &result.respondents {
            assert!(respondent.strengths.contains(&Pillar::Lideranca));
            assert!(respondent.weaknesses.contains(&Pillar::TestesAutomatizados));
        }

        let funcional = aggregates
            .top_testing_modalities
            .iter()
            .find(|m| m.modality == "Funcional")
            .expect("Funcional should be counted");
        assert_eq!(funcional.count, 3);
        assert_eq!(funcional.percentage, 100);
    }

    #[test]
    fn header_only_file_is_a_valid_empty_result() {
        let result = run_import(&[header_row()]);
        assert_eq!(result.total_rows, 0);
        assert_eq!(result.valid_respondents, 0);
        assert_eq!(result.invalid_rows, 0);
        assert!(result.errors.is_empty());
        for pillar in Pillar::ALL {
            assert_eq!(result.aggregates.mean_by_pillar[&pillar], 0.0);
        }
    }

    #[test]
    fn blank_padding_rows_are_ignored() {
        let blank = vec![Cell::Empty; 99];
        let grid = vec![header_row(), uniform_data_row("ana", 3), blank];
        let result = run_import(&grid);
        assert_eq!(result.total_rows, 1);
        assert_eq!(result.valid_respondents, 1);
    }

    #[test]
    fn row_numbers_stay_sheet_accurate_across_blank_rows() {
        let blank = vec![Cell::Empty; 99];
        let mut bad = uniform_data_row("bruno", 3);
        bad[8] = Cell::Number(7.0);
        // Sheet layout: header = 0, ana = 1, blank = 2, bruno = 3.
        let grid = vec![header_row(), uniform_data_row("ana", 3), blank, bad];

        let result = run_import(&grid);
        assert_eq!(result.total_rows, 2);
        assert_eq!(result.valid_respondents, 1);
        assert_eq!(result.invalid_rows, 1);
        assert!(
            result.errors.iter().any(|e| e.contains("row 3")),
            "{:?}",
            result.errors
        );
    }

    #[test]
    fn empty_grid_reports_missing_header() {
        let result = run_import(&[]);
        assert_eq!(result.total_rows, 0);
        assert!(result.errors.iter().any(|e| e.contains("no header row")));
    }

    #[test]
    fn import_result_serializes_pillars_as_names() {
        let grid = vec![header_row(), uniform_data_row("ana", 4)];
        let result = run_import(&grid);
        let json = serde_json::to_value(&result).unwrap();
        let means = json["aggregates"]["mean_by_pillar"]
            .as_object()
            .expect("mean_by_pillar should be an object");
        assert!(means.contains_key("Liderança"));
        assert!(means.contains_key("Testes Automatizados"));
    }
}
