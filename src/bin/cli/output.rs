//! Output rendering for match outcomes and classifications.

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use docoracle_rs::MatchOutcome;

/// Row type for the outcomes table.
#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Comment")]
    comment: String,
    #[tabled(rename = "Best match")]
    best: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Retained")]
    retained: usize,
    #[tabled(rename = "Threshold")]
    threshold: String,
}

/// Print outcomes as a console table followed by a summary line.
pub fn print_outcomes_table(outcomes: &[MatchOutcome]) {
    let rows: Vec<OutcomeRow> = outcomes
        .iter()
        .map(|outcome| OutcomeRow {
            method: outcome.method.clone(),
            comment: truncate(&outcome.comment, 48),
            best: outcome.best.clone().unwrap_or_else(|| "-".to_string()),
            distance: outcome
                .ranked
                .first()
                .map(|entry| format!("{:.3}", entry.distance))
                .unwrap_or_else(|| "-".to_string()),
            retained: outcome.ranked.len(),
            threshold: format!(
                "{:.1}{}",
                outcome.threshold,
                if outcome.threshold_raised { " (long)" } else { "" }
            ),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    let matched = outcomes.iter().filter(|o| o.is_matched()).count();
    println!();
    println!(
        "{} {}/{}",
        "Matched comments:".bright_blue().bold(),
        matched.to_string().bright_green(),
        outcomes.len()
    );
}

/// Print outcomes as pretty JSON.
pub fn print_outcomes_json(outcomes: &[MatchOutcome]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(outcomes)?);
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long comment text", 10), "a long ...");
    }
}
