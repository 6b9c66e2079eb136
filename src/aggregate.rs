use std::collections::{BTreeMap, HashMap};

use crate::models::{Aggregates, ModalityCount, Respondent};
use crate::rows::{round1, split_tokens};
use crate::schema::{self, Pillar};

// An empty input is a valid terminal state ("file parsed, no rows passed")
// and yields all-zero aggregates.
pub fn aggregate(respondents: &[Respondent]) -> Aggregates {
    let mean_by_pillar: BTreeMap<Pillar, f64> = Pillar::ALL
        .into_iter()
        .map(|pillar| (pillar, corpus_pillar_mean(respondents, pillar)))
        .collect();

    let (top_weak_pillars, top_strong_pillars) = if respondents.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        rank_pillars(&mean_by_pillar)
    };

    Aggregates {
        response_distribution: response_distribution(respondents),
        top_testing_modalities: top_modalities(respondents),
        mean_by_pillar,
        top_weak_pillars,
        top_strong_pillars,
    }
}

// A zero pillar mean signals "no data" and leaves the denominator; it is
// not averaged in as a zero contribution.
fn corpus_pillar_mean(respondents: &[Respondent], pillar: Pillar) -> f64 {
    let values: Vec<f64> = respondents
        .iter()
        .map(|r| r.mean_by_pillar[&pillar])
        .filter(|v| *v > 0.0)
        .collect();
    if values.is_empty() {
        0.0
    } else {
        round1(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn response_distribution(respondents: &[Respondent]) -> BTreeMap<Pillar, [usize; 6]> {
    let mut distribution: BTreeMap<Pillar, [usize; 6]> =
        Pillar::ALL.into_iter().map(|p| (p, [0; 6])).collect();

    for respondent in respondents {
        for question in schema::questions() {
            if question.is_textual {
                continue;
            }
            if let Some(score) = respondent
                .answers
                .get(question.id)
                .and_then(crate::models::Answer::score)
            {
                if let Some(counts) = distribution.get_mut(&question.pillar) {
                    counts[usize::from(score)] += 1;
                }
            }
        }
    }
    distribution
}

// Stable sorts, so equal means fall back to pillar declaration order.
fn rank_pillars(mean_by_pillar: &BTreeMap<Pillar, f64>) -> (Vec<Pillar>, Vec<Pillar>) {
    let ranked: Vec<(Pillar, f64)> = Pillar::ALL
        .into_iter()
        .map(|p| (p, mean_by_pillar[&p]))
        .collect();

    let mut ascending = ranked.clone();
    ascending.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let weak = ascending.iter().take(3).map(|(p, _)| *p).collect();

    let mut descending = ranked;
    descending.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let strong = descending.iter().take(3).map(|(p, _)| *p).collect();

    (weak, strong)
}

fn top_modalities(respondents: &[Respondent]) -> Vec<ModalityCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for respondent in respondents {
        for token in &respondent.testing_modalities {
            // Upstream tokens may still carry an un-split delimiter, so
            // re-split defensively before counting. Counting is
            // case-sensitive.
            for part in split_tokens(token) {
                *counts.entry(part).or_insert(0) += 1;
            }
        }
    }

    let total = respondents.len();
    let mut modalities: Vec<ModalityCount> = counts
        .into_iter()
        .map(|(modality, count)| ModalityCount {
            percentage: (count as f64 / total as f64 * 100.0).round() as u32,
            modality,
            count,
        })
        .collect();
    modalities.sort_by(|a, b| b.count.cmp(&a.count).then(a.modality.cmp(&b.modality)));
    modalities.truncate(10);
    modalities
}
