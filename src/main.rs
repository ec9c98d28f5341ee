use std::io::Read;
use std::path::PathBuf;

use ad_copy_guard::config::Config;
use ad_copy_guard::store::{CopyStore, JsonFileStore};
use ad_copy_guard::{
    band_for_score, score, AdAnalyzer, AnalysisRequest, Scorecard, Strategy, Target, Tone,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ad-copy-guard",
    about = "Score Facebook ad copy and request an optimized rewrite",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze ad copy from files (reads stdin if none provided)
    Analyze {
        files: Vec<PathBuf>,
        #[command(flatten)]
        opts: AnalyzeOpts,
    },
    /// List the available tones, strategies and audience targets
    Options,
    /// Manage saved ad copies
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },
}

#[derive(Subcommand)]
enum SavedCommand {
    /// List saved copies, newest first
    List,
    /// Save copy from a file (or stdin) under a name
    Save {
        #[arg(long)]
        name: String,
        file: Option<PathBuf>,
    },
    /// Print a saved copy
    Show { id: u64 },
    /// Delete a saved copy
    Delete { id: u64 },
    /// Analyze a saved copy
    Analyze {
        id: u64,
        #[command(flatten)]
        opts: AnalyzeOpts,
    },
}

#[derive(Args)]
struct AnalyzeOpts {
    #[arg(long, value_enum, default_value_t = Tone::Professional)]
    tone: Tone,
    #[arg(long, value_enum, default_value_t = Strategy::DirectResponse)]
    strategy: Strategy,
    #[arg(long, value_enum, default_value_t = Target::General)]
    target: Target,
    /// Skip the rewrite and only run the rule-based scoring
    #[arg(long)]
    score_only: bool,
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ad_copy_guard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Command::Analyze { files, opts } => {
            if files.is_empty() {
                let mut input = String::new();
                std::io::stdin()
                    .read_to_string(&mut input)
                    .context("Failed to read stdin")?;
                run_analysis(&config, input, &opts).await?;
            } else {
                for path in &files {
                    let text = std::fs::read_to_string(path)
                        .with_context(|| format!("Error reading {}", path.display()))?;
                    run_analysis(&config, text, &opts).await?;
                }
            }
        }
        Command::Options => print_options(),
        Command::Saved { command } => run_saved(&config, command).await?,
    }
    Ok(())
}

async fn run_analysis(config: &Config, copy: String, opts: &AnalyzeOpts) -> Result<()> {
    let request = AnalysisRequest {
        copy,
        tone: opts.tone,
        strategy: opts.strategy,
        target: opts.target,
    };

    if opts.score_only {
        let card = score(&request);
        match opts.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&card)?),
            Format::Text => print!("{}", render_scorecard(&card)),
        }
        return Ok(());
    }

    let analyzer = AdAnalyzer::from_config(&config.generator)?;
    let result = analyzer.analyze(&request).await?;
    match opts.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => {
            print!("{}", render_scorecard(&result.scorecard));
            println!("\nOptimized copy:\n{}", result.optimized_copy);
        }
    }
    Ok(())
}

async fn run_saved(config: &Config, command: SavedCommand) -> Result<()> {
    let mut store = JsonFileStore::open(&config.store.path)?;
    match command {
        SavedCommand::List => {
            for saved in store.list() {
                println!(
                    "{:>4}  {}  {}",
                    saved.id,
                    saved.saved_at.format("%Y-%m-%d %H:%M"),
                    saved.name
                );
            }
        }
        SavedCommand::Save { name, file } => {
            let copy = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Error reading {}", path.display()))?,
                None => {
                    let mut input = String::new();
                    std::io::stdin()
                        .read_to_string(&mut input)
                        .context("Failed to read stdin")?;
                    input
                }
            };
            let saved = store.create(&name, copy.trim())?;
            println!("Saved as {}", saved.id);
        }
        SavedCommand::Show { id } => {
            let saved = store
                .get(id)
                .with_context(|| format!("No saved copy with id {}", id))?;
            println!("{}", saved.copy);
        }
        SavedCommand::Delete { id } => {
            store.delete(id)?;
            println!("Deleted {}", id);
        }
        SavedCommand::Analyze { id, opts } => {
            let saved = store
                .get(id)
                .with_context(|| format!("No saved copy with id {}", id))?;
            run_analysis(config, saved.copy, &opts).await?;
        }
    }
    Ok(())
}

fn print_options() {
    println!("Tones:");
    for tone in Tone::ALL {
        println!("  {:<16} {}", tone.as_str(), tone.label());
    }
    println!("Strategies:");
    for strategy in Strategy::ALL {
        println!("  {:<16} {}", strategy.as_str(), strategy.label());
    }
    println!("Targets:");
    for target in Target::ALL {
        println!("  {:<16} {}", target.as_str(), target.label());
    }
}

fn render_scorecard(card: &Scorecard) -> String {
    let mut out = String::new();
    for (label, value) in [
        ("Performance", card.viral_score),
        ("Policy", card.policy_score),
        ("Audience", card.target_audience_score),
        ("Overall", card.overall_score),
    ] {
        out.push_str(&format!(
            "{:<12} {:>3}%  ({:?})\n",
            label,
            value,
            band_for_score(value)
        ));
    }
    out.push_str(&format!(
        "Engagement   {:?}\n",
        card.engagement_prediction
    ));
    out.push_str(&format!("Positioning  {}\n", card.competitive_analysis));

    for (heading, items) in [
        ("Policy violations", &card.policy_violations),
        ("Warnings", &card.warnings),
        ("Suggestions", &card.suggestions),
        ("Replacements", &card.replacements),
        ("Keywords to consider", &card.keyword_suggestions),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}:\n", heading));
        for item in items {
            out.push_str(&format!("  - {}\n", item));
        }
    }
    out
}
