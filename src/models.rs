use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::Pillar;

// A 0-5 score, or the textual question's token list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Score(u8),
    Text(Vec<String>),
}

impl Answer {
    pub fn score(&self) -> Option<u8> {
        match self {
            Answer::Score(v) => Some(*v),
            Answer::Text(_) => None,
        }
    }
}

// Exists only if every question on the row validated; rejected rows leave
// no partial record behind.
#[derive(Debug, Clone, Serialize)]
pub struct Respondent {
    pub respondent_id: String,
    pub display_name: String,
    pub email: String,
    pub company_name: String,
    pub sector: String,
    pub has_dedicated_team: String,
    pub team_composition: String,
    pub professional_area: String,
    pub answers: BTreeMap<String, Answer>,
    // Half-up, one decimal; 0.0 when the pillar has no numeric data.
    pub mean_by_pillar: BTreeMap<Pillar, f64>,
    pub strengths: Vec<Pillar>,
    pub weaknesses: Vec<Pillar>,
    pub testing_modalities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalityCount {
    pub modality: String,
    pub count: usize,
    // round(count / total respondents * 100)
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Aggregates {
    pub mean_by_pillar: BTreeMap<Pillar, f64>,
    // Raw answer counts per score 0..=5.
    pub response_distribution: BTreeMap<Pillar, [usize; 6]>,
    pub top_weak_pillars: Vec<Pillar>,
    pub top_strong_pillars: Vec<Pillar>,
    pub top_testing_modalities: Vec<ModalityCount>,
}

// Terminal output of one import; never mutated after being handed out.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub total_rows: usize,
    pub valid_respondents: usize,
    pub invalid_rows: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub respondents: Vec<Respondent>,
    pub aggregates: Aggregates,
}

#[derive(Debug, Clone)]
pub struct AssessmentVersion {
    pub version: i32,
    pub imported_at: DateTime<Utc>,
    pub valid_respondents: i32,
    pub invalid_rows: i32,
}
