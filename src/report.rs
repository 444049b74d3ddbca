//! Console rendering of the season summary, recent results and points progression.
use crate::matches::{DerivedMatch, SeasonSummary, SeasonTable};
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

/// Width of the longest bar in [`progression_chart`].
pub const CHART_WIDTH: usize = 50;

pub fn summary_table(club: &str, summary: &SeasonSummary) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(16)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec![club.into(), "".into()],
        ));

    let goal_difference = format!("{:+}", summary.goal_difference);
    for (label, value) in [
        ("Matches", summary.matches.to_string()),
        ("Wins", summary.wins.to_string()),
        ("Draws", summary.draws.to_string()),
        ("Losses", summary.losses.to_string()),
        ("Points", summary.points.to_string()),
        ("Goals scored", summary.goals_scored.to_string()),
        ("Goals conceded", summary.goals_conceded.to_string()),
        ("Goal difference", goal_difference),
    ] {
        table.push_row(Row::new(Styles::default(), vec![label.into(), value.into()]));
    }
    table
}

pub fn recent_table(matches: &[DerivedMatch]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(20)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(3)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec![
                "Date".into(),
                "Matchday".into(),
                "Opponent".into(),
                "Venue".into(),
                "Score".into(),
                "".into(),
                "Points".into(),
            ],
        ));

    for row in matches {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                row.date.to_string().into(),
                row.matchday.clone().into(),
                row.opponent.clone().into(),
                row.venue.to_string().into(),
                row.scoreline().into(),
                row.outcome.to_string().into(),
                row.cumulative_points.to_string().into(),
            ],
        ));
    }
    table
}

/// Horizontal bars of cumulative points, one line per match.
pub fn progression_chart(table: &SeasonTable) -> String {
    let progression = table.progression();
    let max_points = progression.iter().map(|&(_, points)| points).max().unwrap_or(0);
    let label_width = progression
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut chart = String::new();
    for (label, points) in progression {
        let bar = if max_points == 0 {
            0
        } else {
            points as usize * CHART_WIDTH / max_points as usize
        };
        chart.push_str(&format!(
            "{label:<label_width$} | {} {points}\n",
            "#".repeat(bar)
        ));
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::derive_match_statistics;
    use crate::testing::{fixture, season};
    use stanza::renderer::console::Console;
    use stanza::renderer::Renderer;

    #[test]
    fn test_summary_table_lists_totals() {
        let table = season(&[(3, 0), (1, 1), (0, 2)]);
        let rendered = Console::default()
            .render(&summary_table(table.club(), &table.summary()))
            .to_string();

        assert!(rendered.contains("Milan"));
        assert!(rendered.contains("Goal difference"));
        assert!(rendered.contains("+1"));
    }

    #[test]
    fn test_recent_table_has_a_row_per_match() {
        let table = season(&[(3, 0), (1, 1), (0, 2)]);
        let rendered = Console::default()
            .render(&recent_table(table.recent(2)))
            .to_string();

        assert!(!rendered.contains("Opponent 1"));
        assert!(rendered.contains("Opponent 2"));
        assert!(rendered.contains("Opponent 3"));
        assert!(rendered.contains("0-2"));
    }

    #[test]
    fn test_progression_chart() {
        let table = season(&[(1, 0), (0, 1), (0, 0)]);
        let chart = progression_chart(&table);
        let lines: Vec<_> = chart.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" 3"));
        assert!(lines[2].ends_with(" 4"));
        assert_eq!(lines[2].matches('#').count(), CHART_WIDTH);
    }

    #[test]
    fn test_progression_chart_aligns_non_ascii_labels() {
        let mut first = fixture(1, "Milan", "Roma", (1, 0));
        first.round = "Giornata 1ª".into();
        let mut second = fixture(2, "Milan", "Lazio", (0, 0));
        second.round = "Round 2".into();
        let table = derive_match_statistics(&[first, second], "Milan").unwrap();
        let chart = progression_chart(&table);
        let bars: Vec<_> = chart.lines().map(|line| line.chars().position(|c| c == '|')).collect();

        assert_eq!(bars, vec![Some(12), Some(12)]);
    }

    #[test]
    fn test_progression_chart_without_points() {
        let chart = progression_chart(&season(&[(0, 1)]));
        assert_eq!(chart, "Matchday 1 |  0\n");
    }
}
