//! Season trivia templates, the template registry and the quiz question generator.
//!
//! Each template reads one statistic off the derived season table, phrases a question around it
//! and synthesises three wrong answers close enough to the right one to be tempting.
use crate::error::QuizError;
use crate::matches::{SeasonTable, Venue};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, IntoStaticStr};
use tracing::debug;

/// Number of wrong answers accompanying every question.
pub const DISTRACTORS: usize = 3;

/// Random draws allowed when perturbing a value into distractors.
pub const MAX_DISTRACTOR_ATTEMPTS: usize = 100;

/// Distinct opponents needed to ask who was played on a matchday.
pub const MIN_OPPONENTS: usize = DISTRACTORS + 1;

/// Matches needed before asking about points after N matches.
pub const MIN_MATCHES_FOR_POINTS: usize = 5;

/// Matches needed before asking about points per match after N matches.
pub const MIN_MATCHES_FOR_AVERAGE: usize = 10;

/// Types of trivia questions available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, IntoStaticStr)]
pub enum Template {
    #[strum(serialize = "opponent_matchday")]
    OpponentOnMatchday,
    #[strum(serialize = "points_after")]
    PointsAfterMatches,
    #[strum(serialize = "biggest_win")]
    BiggestWin,
    #[strum(serialize = "win_streak")]
    LongestWinningStreak,
    #[strum(serialize = "clean_sheets")]
    CleanSheets,
    #[strum(serialize = "match_goals")]
    MatchGoals,
    #[strum(serialize = "points_per_game")]
    PointsPerGame,
}

impl Template {
    /// Short code used to request this template from the command line.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Runs this template alone against `table`.
    pub fn apply<R: Rng + ?Sized>(
        self,
        table: &SeasonTable,
        rng: &mut R,
    ) -> Result<QuizQuestion, QuizError> {
        let draft = match self {
            Template::OpponentOnMatchday => opponent_on_matchday(table, rng),
            Template::PointsAfterMatches => points_after_matches(table, rng),
            Template::BiggestWin => biggest_win(table, rng),
            Template::LongestWinningStreak => longest_winning_streak(table, rng),
            Template::CleanSheets => clean_sheets(table, rng),
            Template::MatchGoals => match_goals(table, rng),
            Template::PointsPerGame => points_per_game(table, rng),
        }?;
        draft.finish(self, rng)
    }
}

/// A multiple-choice question with one correct answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub template: Template,
    pub text: String,
    pub correct_answer: String,
    pub wrong_answers: [String; DISTRACTORS],
    /// All four answers in presentation order.
    pub options: Vec<String>,
}

impl QuizQuestion {
    /// Position of the correct answer within [`QuizQuestion::options`].
    pub fn correct_option(&self) -> usize {
        self.options
            .iter()
            .position(|option| *option == self.correct_answer)
            .unwrap_or_default()
    }
}

/// Template output before validation and shuffling.
struct Draft {
    text: String,
    correct: String,
    wrong: Vec<String>,
}

impl Draft {
    fn finish<R: Rng + ?Sized>(self, template: Template, rng: &mut R) -> Result<QuizQuestion, QuizError> {
        // no draws happen here, so a rejected draft reports zero attempts
        let failure = || QuizError::DistractorSynthesisFailure {
            template,
            attempts: 0,
        };
        let distinct: HashSet<&str> = std::iter::once(self.correct.as_str())
            .chain(self.wrong.iter().map(String::as_str))
            .collect();
        if distinct.len() != DISTRACTORS + 1 {
            return Err(failure());
        }
        let wrong_answers: [String; DISTRACTORS] = self.wrong.try_into().map_err(|_| failure())?;

        let mut options = Vec::with_capacity(DISTRACTORS + 1);
        options.push(self.correct.clone());
        options.extend(wrong_answers.iter().cloned());
        options.shuffle(rng);

        Ok(QuizQuestion {
            template,
            text: self.text,
            correct_answer: self.correct,
            wrong_answers,
            options,
        })
    }
}

/// Metadata for a template including its description
#[derive(Debug, Clone, Copy)]
pub struct TemplateMeta {
    pub description: &'static str,
    pub template: Template,
}

/// Builds registry mapping template codes to their metadata
pub fn build_registry() -> HashMap<String, TemplateMeta> {
    Template::iter()
        .map(|template| {
            let description = match template {
                Template::OpponentOnMatchday => "Which opponent was played on a given matchday",
                Template::PointsAfterMatches => "Points collected after the first N matches",
                Template::BiggestWin => "Score of the biggest win of the season",
                Template::LongestWinningStreak => "Longest run of consecutive wins",
                Template::CleanSheets => "Number of matches without conceding",
                Template::MatchGoals => "Total goals scored in a given match",
                Template::PointsPerGame => "Average points per match after N matches",
            };
            (
                template.code().to_string(),
                TemplateMeta {
                    description,
                    template,
                },
            )
        })
        .collect()
}

/// Looks up a template by its code, ignoring case and surrounding whitespace.
pub fn parse_code(input: &str, registry: &HashMap<String, TemplateMeta>) -> Option<Template> {
    let code = input.trim().to_ascii_lowercase();
    registry
        .iter()
        .find(|(key, _)| key.to_ascii_lowercase() == code)
        .map(|(_, meta)| meta.template)
}

/// Generates a question from a template chosen uniformly at random.
///
/// When the chosen template cannot be applied to `table`, the remaining templates are tried in
/// random order, each at most once.
pub fn generate_quiz_question<R: Rng + ?Sized>(
    table: &SeasonTable,
    rng: &mut R,
) -> Result<QuizQuestion, QuizError> {
    let mut order: Vec<Template> = Template::iter().collect();
    order.shuffle(rng);

    let mut saw_insufficient = false;
    let mut last_error = None;
    for template in order {
        match template.apply(table, rng) {
            Ok(question) => return Ok(question),
            Err(err) => {
                debug!("skipping template {template}: {err}");
                saw_insufficient |= err.is_insufficient_data();
                last_error = Some(err);
            }
        }
    }
    match last_error {
        Some(err) if !saw_insufficient => Err(err),
        _ => Err(QuizError::NoApplicableTemplate {
            matches: table.len(),
        }),
    }
}

/// Three distinct values from `range`, none equal to `correct`.
fn neighbours<R: Rng + ?Sized>(
    template: Template,
    rng: &mut R,
    correct: u32,
    range: RangeInclusive<u32>,
) -> Result<Vec<String>, QuizError> {
    let pool: Vec<u32> = range.filter(|&value| value != correct).collect();
    if pool.len() < DISTRACTORS {
        return Err(QuizError::DistractorSynthesisFailure {
            template,
            attempts: 0,
        });
    }
    Ok(pool
        .choose_multiple(rng, DISTRACTORS)
        .map(u32::to_string)
        .collect())
}

/// Draws candidates until three distinct ones other than `correct` are found.
///
/// `draw` returns `None` for a rejected candidate. Gives up after [`MAX_DISTRACTOR_ATTEMPTS`] draws.
fn perturb<R, T, F>(template: Template, rng: &mut R, correct: &T, mut draw: F) -> Result<Vec<T>, QuizError>
where
    R: Rng + ?Sized,
    T: PartialEq,
    F: FnMut(&mut R) -> Option<T>,
{
    let mut picked = Vec::with_capacity(DISTRACTORS);
    for _ in 0..MAX_DISTRACTOR_ATTEMPTS {
        let Some(candidate) = draw(&mut *rng) else {
            continue;
        };
        if candidate != *correct && !picked.contains(&candidate) {
            picked.push(candidate);
            if picked.len() == DISTRACTORS {
                return Ok(picked);
            }
        }
    }
    Err(QuizError::DistractorSynthesisFailure {
        template,
        attempts: MAX_DISTRACTOR_ATTEMPTS,
    })
}

fn require_matches(template: Template, table: &SeasonTable, min: usize) -> Result<(), QuizError> {
    if table.len() < min {
        return Err(QuizError::insufficient(
            template,
            format!("{} matches played, need {min}", table.len()),
        ));
    }
    Ok(())
}

fn opponent_on_matchday<R: Rng + ?Sized>(table: &SeasonTable, rng: &mut R) -> Result<Draft, QuizError> {
    let template = Template::OpponentOnMatchday;
    let opponents = table.distinct_opponents();
    if opponents.len() < MIN_OPPONENTS {
        return Err(QuizError::insufficient(
            template,
            format!("{} distinct opponents, need {MIN_OPPONENTS}", opponents.len()),
        ));
    }
    let row = table
        .matches()
        .choose(rng)
        .ok_or_else(|| QuizError::insufficient(template, "no matches played"))?;
    let others: Vec<&str> = opponents
        .into_iter()
        .filter(|opponent| *opponent != row.opponent)
        .collect();

    Ok(Draft {
        text: format!(
            "Who did {} play on {} ({})?",
            table.club(),
            row.matchday,
            row.date
        ),
        correct: row.opponent.clone(),
        wrong: others
            .choose_multiple(rng, DISTRACTORS)
            .map(|opponent| opponent.to_string())
            .collect(),
    })
}

fn points_after_matches<R: Rng + ?Sized>(table: &SeasonTable, rng: &mut R) -> Result<Draft, QuizError> {
    let template = Template::PointsAfterMatches;
    require_matches(template, table, MIN_MATCHES_FOR_POINTS)?;

    let n = rng.gen_range(MIN_MATCHES_FOR_POINTS..=table.len());
    let correct = i64::from(table.matches()[n - 1].cumulative_points);
    let wrong = perturb(template, rng, &correct, |rng| {
        let delta = rng.gen_range(-6..=6);
        let candidate = correct + delta;
        (delta != 0 && candidate > 0).then_some(candidate)
    })?;

    Ok(Draft {
        text: format!(
            "How many points had {} collected after {n} matches?",
            table.club()
        ),
        correct: correct.to_string(),
        wrong: wrong.iter().map(i64::to_string).collect(),
    })
}

fn biggest_win<R: Rng + ?Sized>(table: &SeasonTable, rng: &mut R) -> Result<Draft, QuizError> {
    let template = Template::BiggestWin;
    let best = table
        .biggest_win()
        .ok_or_else(|| QuizError::insufficient(template, "no wins this season"))?;
    let margin = best.goal_difference();
    let correct = best.scoreline();

    // other wins by the same margin would also be right answers
    let tied: HashSet<String> = table
        .matches()
        .iter()
        .filter(|row| row.goal_difference() == margin)
        .map(|row| row.scoreline())
        .collect();
    let wrong = perturb(template, rng, &correct, |rng| {
        let candidate_margin = rng.gen_range((margin - 2).max(1)..=margin + 2);
        let conceded = rng.gen_range(0..=2);
        let candidate = format!("{}-{conceded}", conceded + candidate_margin);
        (!tied.contains(&candidate)).then_some(candidate)
    })?;

    Ok(Draft {
        text: format!(
            "What was the score when {} recorded their biggest win of the season?",
            table.club()
        ),
        correct,
        wrong,
    })
}

fn longest_winning_streak<R: Rng + ?Sized>(table: &SeasonTable, rng: &mut R) -> Result<Draft, QuizError> {
    let template = Template::LongestWinningStreak;
    require_matches(template, table, 1)?;

    let correct = table.longest_winning_streak() as u32;
    let wrong = neighbours(template, rng, correct, 1..=(correct + 2).max(4))?;

    Ok(Draft {
        text: format!(
            "What was {}'s longest run of consecutive wins?",
            table.club()
        ),
        correct: correct.to_string(),
        wrong,
    })
}

fn clean_sheets<R: Rng + ?Sized>(table: &SeasonTable, rng: &mut R) -> Result<Draft, QuizError> {
    let template = Template::CleanSheets;
    require_matches(template, table, 1)?;

    let correct = table.clean_sheets() as u32;
    let wrong = neighbours(template, rng, correct, correct.saturating_sub(3)..=correct + 3)?;

    Ok(Draft {
        text: format!(
            "In how many of their {} matches did {} keep a clean sheet?",
            table.len(),
            table.club()
        ),
        correct: correct.to_string(),
        wrong,
    })
}

fn match_goals<R: Rng + ?Sized>(table: &SeasonTable, rng: &mut R) -> Result<Draft, QuizError> {
    let template = Template::MatchGoals;
    let row = table
        .matches()
        .choose(rng)
        .ok_or_else(|| QuizError::insufficient(template, "no matches played"))?;

    let correct = row.total_goals();
    let wrong = neighbours(template, rng, correct, correct.saturating_sub(3)..=correct + 3)?;
    let venue = match row.venue {
        Venue::Home => "at home",
        Venue::Away => "away",
    };

    Ok(Draft {
        text: format!(
            "How many goals were scored in total when {} played {} {venue} on {}?",
            table.club(),
            row.opponent,
            row.matchday
        ),
        correct: correct.to_string(),
        wrong,
    })
}

fn points_per_game<R: Rng + ?Sized>(table: &SeasonTable, rng: &mut R) -> Result<Draft, QuizError> {
    let template = Template::PointsPerGame;
    require_matches(template, table, MIN_MATCHES_FOR_AVERAGE)?;

    // averages are handled in hundredths so that rounding and comparisons stay exact
    let n = rng.gen_range(MIN_MATCHES_FOR_AVERAGE..=table.len());
    let points = f64::from(table.matches()[n - 1].cumulative_points);
    // f64::round breaks ties away from zero: 2/16 gives 0.13, not the banker's 0.12
    let correct = (points * 100.0 / n as f64).round() as i64;
    let wrong = perturb(template, rng, &correct, |rng| {
        let delta = rng.gen_range(21..=80) * if rng.gen_bool(0.5) { 1 } else { -1 };
        let candidate = correct + delta;
        (0..=300).contains(&candidate).then_some(candidate)
    })?;

    Ok(Draft {
        text: format!(
            "How many points per match had {} averaged after {n} matches?",
            table.club()
        ),
        correct: hundredths(correct),
        wrong: wrong.into_iter().map(hundredths).collect(),
    })
}

fn hundredths(value: i64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}
