use anyhow::{anyhow, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use season_quiz::matches::derive_match_statistics;
use season_quiz::questions::{build_registry, generate_quiz_question, parse_code, QuizQuestion};
use season_quiz::report::{progression_chart, recent_table, summary_table};
use season_quiz::season::{load_season, Season};
use season_quiz::store::SeasonStore;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const RECENT_MATCHES: usize = 5;
const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// season file (openfootball JSON) to read the fixtures from
    #[clap(short, long)]
    season: Option<PathBuf>,

    /// SQLite database to read the fixtures from
    #[clap(long)]
    db: Option<PathBuf>,

    /// SQLite database to copy the loaded fixtures into
    #[clap(long)]
    import: Option<PathBuf>,

    /// club to build the statistics for
    #[clap(short, long, default_value = "AC Milan")]
    club: String,

    /// seed for a reproducible question sequence
    #[clap(long)]
    seed: Option<u64>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        match (&self.season, &self.db) {
            (None, None) => Err(anyhow!("a season file or database must be specified")),
            (Some(_), Some(_)) => Err(anyhow!("only one of --season and --db may be given")),
            _ if self.club.trim().is_empty() => Err(anyhow!("club name must not be empty")),
            _ => Ok(()),
        }
    }

    fn load(&self) -> anyhow::Result<Season> {
        if let Some(db) = &self.db {
            let store = SeasonStore::open(db)
                .with_context(|| format!("opening database {}", db.display()))?;
            return Ok(store.load()?);
        }
        let path = self.season.as_ref().ok_or(anyhow!("season file must be specified"))?;
        load_season(path).with_context(|| format!("reading season from {}", path.display()))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let season = args.load()?;
    if let Some(path) = &args.import {
        let mut store = SeasonStore::open(path)
            .with_context(|| format!("opening database {}", path.display()))?;
        store.import(&season)?;
    }
    let table = derive_match_statistics(&season.matches, &args.club)?;
    if table.is_empty() {
        warn!("no fixtures found for {}", args.club);
        eprintln!("No fixtures for '{}'. Clubs in this season:", args.club);
        for club in season.clubs() {
            eprintln!("  {club}");
        }
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let registry = build_registry();
    let mut questions_asked = 0u32;

    println!("Welcome to the {} season quiz", table.club());
    println!("Commands:");
    println!("  start  -> random question");
    println!("  list   -> show all question codes");
    println!("  stats  -> season summary");
    println!("  recent -> last {RECENT_MATCHES} matches");
    println!("  chart  -> points progression");
    println!("  <code> -> a question of a specific kind (e.g., win_streak)");
    println!("  quit   -> exit");
    println!();

    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                eprintln!("Error reading input, try again.");
                continue;
            }
        }

        let raw = input.trim().to_string();
        if raw.is_empty() {
            continue;
        }

        match raw.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "list" => {
                println!("Available question codes:");
                let mut codes: Vec<_> = registry.iter().collect();
                codes.sort_by_key(|(code, _)| *code);
                for (code, meta) in codes {
                    println!(" - {code}: {}", meta.description);
                }
                println!();
            }
            "stats" => {
                let summary = summary_table(table.club(), &table.summary());
                println!("{}", Console::default().render(&summary));
            }
            "recent" => {
                let recent = recent_table(table.recent(RECENT_MATCHES));
                println!("{}", Console::default().render(&recent));
            }
            "chart" => {
                println!("Points progression");
                print!("{}", progression_chart(&table));
                println!();
            }
            "start" => match generate_quiz_question(&table, &mut rng) {
                Ok(question) => {
                    ask(&question);
                    questions_asked += 1;
                }
                Err(e) => eprintln!("Could not build a question: {e}"),
            },
            other => match parse_code(other, &registry) {
                Some(template) => match template.apply(&table, &mut rng) {
                    Ok(question) => {
                        ask(&question);
                        questions_asked += 1;
                    }
                    Err(e) => eprintln!("Could not build a question: {e}"),
                },
                None => {
                    println!("Unknown command or code: '{other}'");
                    println!("Type 'list' to see available codes.\n");
                }
            },
        }
    }

    println!("\n=== SESSION SUMMARY ===");
    println!("Questions asked: {questions_asked}");
    println!("Goodbye!");
    Ok(())
}

/// Prints a question with lettered options, waits for a line and reveals the answer.
fn ask(question: &QuizQuestion) {
    println!("--- QUIZ ({}) ---", question.template);
    println!("Question: {}", question.text);
    for (label, option) in OPTION_LABELS.iter().zip(&question.options) {
        println!("  {label}) {option}");
    }
    print!("Your pick (Enter to reveal): ");
    io::stdout().flush().ok();

    let mut pick = String::new();
    io::stdin().read_line(&mut pick).ok();

    let correct = question.correct_option();
    println!(
        "Answer: {}) {}",
        OPTION_LABELS[correct], question.correct_answer
    );
    println!();
}
