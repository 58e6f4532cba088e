use anyhow::{bail, Context, Result};
use std::env;
use tracing_subscriber::EnvFilter;

use character_ranking::{
    generation_breakdown, latest_changes, load_repository, parse_year, validate_and_report,
    vote_growth, vote_summary, CharacterId, Config, RankingRepository, VERSION,
};
use character_ranking::statistics::LATEST_CHANGES_LIMIT;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut config = Config::from_env();

    // `validate` reports the findings itself
    if args.first().map(String::as_str) == Some("validate") {
        config.validate_on_load = false;
    }

    let repo = load_repository(&config)?;

    match args.first().map(String::as_str) {
        None | Some("years") => print_years(&repo),
        Some("characters") => print_characters(&repo),
        Some("top") => {
            let year = year_arg(&args, 1)?;
            let top_n = match args.get(2) {
                Some(n) => n.parse().with_context(|| format!("Invalid count: {}", n))?,
                None => config.top_n,
            };
            print_top(&repo, year, top_n);
        }
        Some("history") => {
            let raw = args.get(1).context("Usage: history <character-id>")?;
            let id: u32 = raw
                .parse()
                .with_context(|| format!("Invalid character id: {}", raw))?;
            print_history(&repo, CharacterId(id));
        }
        Some("changes") => match changes_years(&args) {
            Ok(Some((current, previous))) => print_changes(&repo, current, previous),
            Ok(None) => print_latest_changes(&repo),
            Err(e) => {
                print_usage();
                return Err(e);
            }
        },
        Some("totals") => print_totals(&repo),
        Some("summary") => print_summary(&repo),
        Some("generations") => {
            let year = year_arg(&args, 1)?;
            let top_n = match args.get(2) {
                Some(n) => n.parse().with_context(|| format!("Invalid count: {}", n))?,
                None => 30,
            };
            print_generations(&repo, year, top_n);
        }
        Some("validate") => run_validate(&config, &repo),
        Some(other) => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    }

    Ok(())
}

/// Years of `changes`: none for the latest pair, or current and previous
fn changes_years(args: &[String]) -> Result<Option<(i32, i32)>> {
    match args.len() {
        1 => Ok(None),
        3 => Ok(Some((year_arg(args, 1)?, year_arg(args, 2)?))),
        _ => bail!("Usage: changes [<current-year> <previous-year>]"),
    }
}

fn year_arg(args: &[String], index: usize) -> Result<i32> {
    let raw = args
        .get(index)
        .with_context(|| format!("Missing year argument at position {}", index))?;
    parse_year(raw).with_context(|| format!("Invalid year: {}", raw))
}

fn print_usage() {
    eprintln!("character-ranking {}", VERSION);
    eprintln!("Usage: character-ranking <command>");
    eprintln!("  years                        List available years");
    eprintln!("  characters                   List the character catalog");
    eprintln!("  top <year> [n]               Top n characters of a year");
    eprintln!("  history <id>                 Ranking history of a character");
    eprintln!("  changes [current previous]   Rank changes between two years");
    eprintln!("  totals                       Total votes and growth per year");
    eprintln!("  summary                      Vote growth summary");
    eprintln!("  generations <year> [n]       Top n split by generation");
    eprintln!("  validate                     Run the data quality check");
}

fn print_years(repo: &RankingRepository) {
    let years = repo.available_years();
    println!("📅 Available years: {}", years.len());
    for year in years {
        println!("  {}", year);
    }
}

fn print_characters(repo: &RankingRepository) {
    println!("🎀 Characters: {}", repo.characters().len());
    for character in repo.characters() {
        println!(
            "  {:>4}  {:<30} debut {}",
            character.id, character.name, character.debut_year
        );
    }
}

fn print_top(repo: &RankingRepository, year: i32, top_n: usize) {
    let top = repo.top_characters(year, top_n);
    if top.is_empty() {
        println!("No ranking for {}", year);
        return;
    }

    println!("🏆 Top {} in {}", top.len(), year);
    for item in top {
        let name = item
            .character
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(character_ranking::UNKNOWN_CHARACTER_NAME);
        println!("  {:>3}. {:<30} {:>10} votes", item.entry.rank, name, item.entry.votes);
    }
}

fn print_history(repo: &RankingRepository, id: CharacterId) {
    let history = repo.character_ranking_history(id);
    println!("📈 {} ({} years charted)", repo.character_name(id), history.len());
    for point in history {
        println!("  {}  rank {:>3}  {:>10} votes", point.year, point.rank, point.votes);
    }
}

fn print_change_rows(repo: &RankingRepository, changes: &[character_ranking::RankingChange]) {
    for change in changes {
        let delta = match change.change {
            Some(c) if c != 0 => format!("{} {}", change.direction().symbol(), c.abs()),
            _ => change.direction().symbol().to_string(),
        };
        let previous = change
            .previous_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>3}. {:<30} prev {:>3}  {}",
            change.entry.rank,
            repo.character_name(change.entry.character_id),
            previous,
            delta
        );
    }
}

fn print_changes(repo: &RankingRepository, current: i32, previous: i32) {
    let changes = repo.ranking_changes(current, previous);
    if changes.is_empty() {
        println!("No comparison available for {} vs {}", current, previous);
        return;
    }

    println!("🔀 Rank changes {} vs {}", current, previous);
    print_change_rows(repo, &changes);
}

fn print_latest_changes(repo: &RankingRepository) {
    let changes = latest_changes(repo, LATEST_CHANGES_LIMIT);
    if changes.is_empty() {
        println!("Need at least two years to compare");
        return;
    }

    println!("🔀 Rank changes (latest two years)");
    print_change_rows(repo, &changes);
}

fn print_totals(repo: &RankingRepository) {
    println!("🗳️  Total votes by year");
    for row in vote_growth(repo) {
        let total = row
            .total_votes
            .map(|t| t.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        let growth = row
            .growth_rate
            .map(|g| format!("{:+.1}%", g))
            .unwrap_or_else(|| "-".to_string());
        println!("  {}  {:>12}  {:>8}", row.year, total, growth);
    }
}

fn print_summary(repo: &RankingRepository) {
    let summary = vote_summary(repo);
    let pct = |v: Option<f64>| v.map(|g| format!("{:.1}%", g)).unwrap_or_else(|| "undefined".to_string());
    let votes = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_else(|| "n/a".to_string());

    println!("📊 Vote summary");
    println!("  Total growth:    {}", pct(summary.total_growth));
    println!("  Average growth:  {}", pct(summary.average_growth));
    println!("  Max growth:      {}", pct(summary.max_growth_rate));
    println!("  Min growth:      {}", pct(summary.min_growth_rate));
    println!("  Max votes:       {}", votes(summary.max_votes));
    println!("  Min votes:       {}", votes(summary.min_votes));
}

fn print_generations(repo: &RankingRepository, year: i32, top_n: usize) {
    println!("👶👵 Generations in the top {} of {}", top_n, year);
    for stats in generation_breakdown(repo, year, top_n) {
        let average = stats
            .average_rank
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<26} {:>3} characters  avg rank {:>5}  {:>10} votes",
            stats.generation.label(),
            stats.members.len(),
            average,
            stats.total_votes
        );
    }
}

fn run_validate(config: &Config, repo: &RankingRepository) {
    let report = validate_and_report(config, repo.catalog(), repo.dataset());

    println!("🔍 {}", report.summary());
    for issue in &report.issues {
        let year = issue.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:?} {:<28} {:>5}  {}",
            issue.severity,
            issue.rule.as_str(),
            year,
            issue.message
        );
    }
    if report.is_clean() {
        println!("✅ No issues found");
    } else if report.has_critical_issues() {
        println!("❌ Critical issues found: rankings may be misattributed");
    }
}
