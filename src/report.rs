use std::fmt::Write;

use crate::models::ImportResult;
use crate::schema::Pillar;

pub fn maturity_band(mean: f64) -> &'static str {
    if mean < 1.0 {
        "Agnóstico"
    } else if mean < 2.0 {
        "Inicialização"
    } else if mean < 3.0 {
        "Consciência"
    } else if mean < 4.0 {
        "Experiência"
    } else {
        "Domínio"
    }
}

pub fn build_report(source: &str, result: &ImportResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# QualityScore Import Report");
    let _ = writeln!(
        output,
        "Source: {} ({} rows, {} valid, {} rejected)",
        source, result.total_rows, result.valid_respondents, result.invalid_rows
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Pillar Maturity");
    if result.valid_respondents == 0 {
        let _ = writeln!(output, "No valid respondents in this file.");
    } else {
        for pillar in Pillar::ALL {
            let mean = result.aggregates.mean_by_pillar[&pillar];
            let _ = writeln!(output, "- {pillar}: {mean:.1} ({})", maturity_band(mean));
        }
    }

    if !result.aggregates.top_strong_pillars.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Strengths and Weaknesses");
        let strong: Vec<String> = result
            .aggregates
            .top_strong_pillars
            .iter()
            .map(|p| p.to_string())
            .collect();
        let weak: Vec<String> = result
            .aggregates
            .top_weak_pillars
            .iter()
            .map(|p| p.to_string())
            .collect();
        let _ = writeln!(output, "- Strongest pillars: {}", strong.join(", "));
        let _ = writeln!(output, "- Weakest pillars: {}", weak.join(", "));
    }

    if !result.aggregates.top_testing_modalities.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Testing Modalities");
        for modality in &result.aggregates.top_testing_modalities {
            // count is token mentions, not distinct respondents.
            let _ = writeln!(
                output,
                "- {}: {} mentions ({}%)",
                modality.modality, modality.count, modality.percentage
            );
        }
    }

    if !result.respondents.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Respondents");
        for respondent in &result.respondents {
            let overall: f64 = respondent.mean_by_pillar.values().sum::<f64>()
                / respondent.mean_by_pillar.len() as f64;
            let _ = writeln!(
                output,
                "- {} ({}, {}): overall {:.1}, {} strengths, {} weaknesses",
                respondent.display_name,
                respondent.email,
                respondent.company_name,
                overall,
                respondent.strengths.len(),
                respondent.weaknesses.len()
            );
        }
    }

    if !result.errors.is_empty() || !result.warnings.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Problems");
        for warning in &result.warnings {
            let _ = writeln!(output, "- warning: {warning}");
        }
        for error in &result.errors {
            let _ = writeln!(output, "- error: {error}");
        }
    }

    output
}
