use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use crate::models::{Answer, Respondent};
use crate::schema::{self, Pillar, QuestionDefinition};
use crate::workbook::Cell;

// Normalized prefix length for the fallback match when a question has no
// exact header match.
const PARTIAL_MATCH_PREFIX: usize = 20;

// A row is atomic: any failure discards it wholesale.
pub fn process_row(
    header: &[String],
    row: &[Cell],
    row_index: usize,
) -> Result<Respondent, Vec<String>> {
    let mut errors = Vec::new();

    // Metadata is positional; the structural gate already guaranteed the
    // block's names, so matched headers are not consulted here.
    let meta: Vec<String> = (0..schema::METADATA_COLUMNS.len())
        .map(|i| {
            row.get(i)
                .map(|c| c.as_text().trim().to_string())
                .unwrap_or_default()
        })
        .collect();

    if meta[0].is_empty() && meta[1].is_empty() {
        errors.push(format!(
            "row {row_index}: missing respondent identifier (UserID and Email both blank)"
        ));
    }
    if meta[2].is_empty() {
        errors.push(format!("row {row_index}: missing respondent name"));
    }

    let normalized_header: Vec<String> = header
        .iter()
        .map(|h| schema::normalize_header(h))
        .collect();

    let mut answers: BTreeMap<String, Answer> = BTreeMap::new();
    let mut testing_modalities: Vec<String> = Vec::new();
    let mut claimed: HashSet<usize> = HashSet::new();

    for question in schema::questions() {
        let Some(col) = resolve_column(question, &normalized_header, &claimed, row_index, &mut errors)
        else {
            continue;
        };

        // A question resolving into the metadata block means the header row
        // is corrupt; reading it would pull data from the wrong slot.
        if col < schema::METADATA_COLUMNS.len() {
            errors.push(format!(
                "row {row_index}: question \"{}\" matched metadata column {col}",
                schema::short_label(question.canonical_text)
            ));
            continue;
        }
        claimed.insert(col);

        let cell = row.get(col).unwrap_or(&Cell::Empty);
        if question.is_textual {
            let tokens = split_tokens(&cell.as_text());
            testing_modalities = tokens.clone();
            answers.insert(question.id.to_string(), Answer::Text(tokens));
        } else {
            match parse_score(cell) {
                Ok(score) => {
                    answers.insert(question.id.to_string(), Answer::Score(score));
                }
                Err(ScoreError::Blank) => {
                    errors.push(format!(
                        "row {row_index}: empty answer for question {}",
                        question.id
                    ));
                }
                Err(ScoreError::Invalid(literal)) => {
                    let header_text = header.get(col).map(String::as_str).unwrap_or("");
                    errors.push(format!(
                        "row {row_index}: invalid answer \"{literal}\" for question {} \
                         (column {col}, header \"{header_text}\"): expected an integer 0-5",
                        question.id
                    ));
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mean_by_pillar = pillar_means(&answers);
    let strengths: Vec<Pillar> = Pillar::ALL
        .into_iter()
        .filter(|p| mean_by_pillar[p] >= 4.0)
        .collect();
    let weaknesses: Vec<Pillar> = Pillar::ALL
        .into_iter()
        .filter(|p| mean_by_pillar[p] <= 2.0)
        .collect();

    let mut meta = meta.into_iter();
    let respondent_id = meta.next().unwrap_or_default();
    let email = meta.next().unwrap_or_default();
    Ok(Respondent {
        respondent_id: if respondent_id.is_empty() {
            email.clone()
        } else {
            respondent_id
        },
        email,
        display_name: meta.next().unwrap_or_default(),
        company_name: meta.next().unwrap_or_default(),
        sector: meta.next().unwrap_or_default(),
        has_dedicated_team: meta.next().unwrap_or_default(),
        team_composition: meta.next().unwrap_or_default(),
        professional_area: meta.next().unwrap_or_default(),
        answers,
        mean_by_pillar,
        strengths,
        weaknesses,
        testing_modalities,
    })
}

// Exact normalized match first, then a unique partial match over unclaimed
// columns. An ambiguous partial match is an error, not a guess.
fn resolve_column(
    question: &QuestionDefinition,
    normalized_header: &[String],
    claimed: &HashSet<usize>,
    row_index: usize,
    errors: &mut Vec<String>,
) -> Option<usize> {
    let target = schema::normalize_header(question.canonical_text);
    if let Some(col) = normalized_header.iter().position(|h| *h == target) {
        return Some(col);
    }

    let prefix: String = target.chars().take(PARTIAL_MATCH_PREFIX).collect();
    let candidates: Vec<usize> = normalized_header
        .iter()
        .enumerate()
        .filter(|(i, h)| {
            !claimed.contains(i)
                && h.chars().take(PARTIAL_MATCH_PREFIX).collect::<String>() == prefix
        })
        .map(|(i, _)| i)
        .collect();

    match candidates.as_slice() {
        [] => {
            errors.push(format!(
                "row {row_index}: no column found for question \"{}\"",
                schema::short_label(question.canonical_text)
            ));
            None
        }
        [col] => {
            warn!(
                question = question.id,
                column = col,
                "resolved question by prefix fallback"
            );
            Some(*col)
        }
        many => {
            errors.push(format!(
                "row {row_index}: ambiguous column match for question \"{}\" ({} candidates)",
                schema::short_label(question.canonical_text),
                many.len()
            ));
            None
        }
    }
}

enum ScoreError {
    Blank,
    Invalid(String),
}

fn parse_score(cell: &Cell) -> Result<u8, ScoreError> {
    if cell.is_blank() {
        return Err(ScoreError::Blank);
    }
    let value = match cell {
        Cell::Number(f) => *f,
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ScoreError::Invalid(s.trim().to_string()))?,
        other => return Err(ScoreError::Invalid(other.as_text())),
    };
    if value.fract() == 0.0 && (0.0..=5.0).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ScoreError::Invalid(cell.as_text()))
    }
}

// A blank cell is an empty list, never an error.
pub fn split_tokens(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// Round half-up to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn pillar_means(answers: &BTreeMap<String, Answer>) -> BTreeMap<Pillar, f64> {
    let mut sums: BTreeMap<Pillar, (f64, usize)> = BTreeMap::new();
    for question in schema::questions() {
        if question.is_textual {
            continue;
        }
        if let Some(score) = answers.get(question.id).and_then(Answer::score) {
            let entry = sums.entry(question.pillar).or_insert((0.0, 0));
            entry.0 += f64::from(score);
            entry.1 += 1;
        }
    }

    Pillar::ALL
        .into_iter()
        .map(|pillar| {
            let mean = match sums.get(&pillar) {
                Some((sum, count)) if *count > 0 => round1(sum / *count as f64),
                _ => 0.0,
            };
            (pillar, mean)
        })
        .collect()
}
