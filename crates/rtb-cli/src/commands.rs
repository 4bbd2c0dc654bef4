use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;

use rtb_engine::{Leaderboard, Submission};
use rtb_server::{BoardServer, EntryView, ServerConfig, TracingDropObserver};
use rtb_store::FileStore;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::List(args) => cmd_list(&config, &cli.format, args).await,
        Command::Reserve => cmd_reserve(&config, &cli.format).await,
        Command::Submit(args) => cmd_submit(&config, &cli.format, args).await,
        Command::Rank(args) => cmd_rank(&config, &cli.format, args).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    config.apply_env()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn open_board(config: &ServerConfig) -> anyhow::Result<Leaderboard> {
    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?
        .with_observer(Arc::new(TracingDropObserver));
    tracing::debug!(dir = %config.data_dir.display(), "opened board store");
    Ok(Leaderboard::new(Arc::new(store)))
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = Some(dir);
    }
    println!(
        "{} Leaderboard on {} (data: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.data_dir.display()
    );
    BoardServer::open(config)?.serve().await?;
    Ok(())
}

async fn cmd_list(config: &ServerConfig, format: &OutputFormat, args: ListArgs) -> anyhow::Result<()> {
    let board = open_board(config)?;
    let mut entries = board.list().await?;
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    match format {
        OutputFormat::Json => {
            let views: Vec<EntryView> = entries.iter().map(EntryView::from).collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("Leaderboard is empty.");
                return Ok(());
            }
            println!("{:>5}  {:>10}  {:<8}  {:<24}  {}", "rank", "time (ms)", "code", "submitted", "info");
            for e in &entries {
                let rank = format!("{:>5}", e.rank);
                let rank = if e.rank <= 5 { rank.yellow().bold() } else { rank.normal() };
                println!(
                    "{}  {:>10}  {:<8}  {:<24}  {}",
                    rank,
                    e.reaction_time,
                    e.code.as_str().cyan(),
                    e.timestamp.to_iso().dimmed(),
                    e.info
                );
            }
        }
    }
    Ok(())
}

async fn cmd_reserve(config: &ServerConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let code = open_board(config)?.reserve_code().await?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "code": code.as_str() })),
        OutputFormat::Text => println!("{} Reserved code {}", "✓".green().bold(), code.as_str().cyan().bold()),
    }
    Ok(())
}

async fn cmd_submit(config: &ServerConfig, format: &OutputFormat, args: SubmitArgs) -> anyhow::Result<()> {
    let board = open_board(config)?;
    let submission = Submission {
        reaction_time: args.reaction_time,
        info: args.info,
        code: args.code,
    };
    let outcome = board.submit(submission).await?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "rank": outcome.entry.rank,
                    "code": outcome.entry.code.as_str(),
                    "entry": EntryView::from(&outcome.entry),
                })
            );
        }
        OutputFormat::Text => {
            println!("{} Result recorded", "✓".green().bold());
            println!("  Rank: {} of {}", outcome.entry.rank.to_string().yellow().bold(), outcome.leaderboard.len());
            println!("  Code: {}", outcome.entry.code.as_str().cyan().bold());
            println!("  Time: {} ms", outcome.entry.reaction_time);
        }
    }
    Ok(())
}

async fn cmd_rank(config: &ServerConfig, format: &OutputFormat, args: RankArgs) -> anyhow::Result<()> {
    let rank = open_board(config)?.estimated_rank(args.reaction_time).await?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "estimatedRank": rank })),
        OutputFormat::Text => println!("{} ms would rank {}", args.reaction_time, rank.to_string().yellow().bold()),
    }
    Ok(())
}
