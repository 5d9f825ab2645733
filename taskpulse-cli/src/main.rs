use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use taskpulse_core::{
    AiScoreEstimator, PriorityScorer, TaskAnalytics, TaskRanker, optimal_schedule,
    time::parse_instant,
};

mod config;
mod snapshot;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "taskpulse", version, about = "Deterministic task prioritization")]
struct Cli {
    /// Config file (default: ~/.taskpulse/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by commands that score against a point in time.
#[derive(clap::Args, Debug)]
struct NowArgs {
    /// Reference time: RFC3339, or "YYYY-MM-DD HH:MM" in --tz (default: now)
    #[arg(long)]
    now: Option<String>,

    /// IANA timezone for --now (default: config time.timezone)
    #[arg(long)]
    tz: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the smart queue for a task snapshot
    Queue {
        /// JSON array of task records
        #[arg(long)]
        tasks: PathBuf,

        /// Max entries (default: config queue.limit)
        #[arg(long)]
        limit: Option<usize>,

        #[command(flatten)]
        at: NowArgs,

        #[arg(long)]
        json: bool,
    },

    /// Show how one task's score is made up
    Explain {
        #[arg(long)]
        tasks: PathBuf,

        /// Task id
        #[arg(long)]
        id: String,

        #[command(flatten)]
        at: NowArgs,
    },

    /// Estimate the stored ai_score for every task not yet completed
    Prioritize {
        #[arg(long)]
        tasks: PathBuf,

        #[command(flatten)]
        at: NowArgs,

        #[arg(long)]
        json: bool,
    },

    /// Snapshot analytics over all tasks
    Stats {
        #[arg(long)]
        tasks: PathBuf,

        #[command(flatten)]
        at: NowArgs,

        #[arg(long)]
        json: bool,
    },

    /// Suggested order for predictive tasks
    Schedule {
        /// JSON array of {id, title, priority, complexity}
        #[arg(long)]
        file: PathBuf,

        /// Max entries (default: config schedule.limit)
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Manage the config file (--config, or ~/.taskpulse/config.toml)
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    init_tracing(&cfg);

    let config_path = cli.config;

    match cli.command {
        Command::Queue {
            tasks,
            limit,
            at,
            json,
        } => {
            let now = resolve_now(&at, &cfg)?;
            let tasks = snapshot::load_tasks(&tasks)?;
            let ranker = TaskRanker::new(
                PriorityScorer::new(cfg.scoring_policy()),
                limit.unwrap_or(cfg.queue.limit),
            );
            let queue = ranker.rank(&tasks, now);

            if json {
                println!("{}", serde_json::to_string_pretty(&queue)?);
                return Ok(());
            }

            println!("# Smart queue ({})\n", now.to_rfc3339());
            if queue.is_empty() {
                println!("(no open tasks)");
            }
            for (i, e) in queue.entries.iter().enumerate() {
                println!(
                    "{:>2}. [{:>3}] {} | {} | {:?} | progress={}% | due={}",
                    i + 1,
                    e.priority_score,
                    e.task.id,
                    e.task.title,
                    e.task.priority,
                    e.task.progress(),
                    e.task
                        .due_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }

            let s = queue.stats;
            println!(
                "\nranked={} mean_score={} high_priority={} urgent={} mean_base_quality={}",
                s.ranked, s.mean_score, s.high_priority, s.urgent, s.mean_base_quality
            );
        }

        Command::Explain { tasks, id, at } => {
            let now = resolve_now(&at, &cfg)?;
            let tasks = snapshot::load_tasks(&tasks)?;
            let Some(task) = tasks.iter().find(|t| t.id == id) else {
                bail!("no task with id {id}");
            };

            let b = PriorityScorer::new(cfg.scoring_policy()).breakdown(task, now);
            println!("{} | {}", task.id, task.title);
            println!("  priority      {:>3}  ({:?})", b.priority, task.priority);
            match b.days_until_due {
                Some(d) => println!("  due           {:>3}  ({d} day(s) until due)", b.due),
                None => println!("  due           {:>3}  (no due date)", b.due),
            }
            println!("  progress      {:>3}  ({}%)", b.progress, task.progress());
            println!("  base quality  {:>3}  (ai_score {})", b.base_quality, task.base_quality());
            println!("  total         {:>3}", b.total());
            if !task.is_open() {
                println!("\n(status {:?}: not eligible for the smart queue)", task.status);
            }
        }

        Command::Prioritize { tasks, at, json } => {
            let now = resolve_now(&at, &cfg)?;
            let tasks = snapshot::load_tasks(&tasks)?;
            let report = AiScoreEstimator::new(cfg.scoring_policy()).estimate_all(&tasks, now);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("# AI score estimates ({})\n", now.to_rfc3339());
            for (i, e) in report.tasks.iter().enumerate() {
                println!(
                    "{:>2}. [{:>3}] {} | {} | {:?}",
                    i + 1,
                    e.priority_score,
                    e.task.id,
                    e.task.title,
                    e.task.status
                );
            }
            println!(
                "\ntotal_tasks={} avg_priority_score={} overdue={}",
                report.total_tasks, report.avg_priority_score, report.overdue
            );
        }

        Command::Stats { tasks, at, json } => {
            let now = resolve_now(&at, &cfg)?;
            let tasks = snapshot::load_tasks(&tasks)?;
            let a = TaskAnalytics::compute(&tasks, now, cfg.scoring_policy());

            if json {
                println!("{}", serde_json::to_string_pretty(&a)?);
                return Ok(());
            }

            println!("# Task analytics ({})\n", now.to_rfc3339());
            println!(
                "total={} completed={} in_progress={} pending={}",
                a.total, a.completed, a.in_progress, a.pending
            );
            println!(
                "priority: high={} medium={} low={}",
                a.high_priority, a.medium_priority, a.low_priority
            );
            println!("overdue={} due_soon={}", a.overdue, a.due_soon);
            println!("assigned={} unassigned={}", a.assigned, a.unassigned);
            println!(
                "avg_progress={}% avg_base_quality={} completion_rate={}%",
                a.avg_progress, a.avg_base_quality, a.completion_rate
            );
            for (cat, n) in &a.categories {
                println!("  {cat}: {n}");
            }
            println!("trend (updated_at, UTC):");
            for d in &a.productivity_trend {
                println!(
                    "  {} completed={} touched={} avg_progress={}%",
                    d.date, d.completed, d.created, d.avg_progress
                );
            }
            if !a.team_performance.is_empty() {
                println!("team:");
                for m in &a.team_performance {
                    println!("  {}: {}% of {} task(s) done", m.member, m.score, m.tasks);
                }
            }
            println!(
                "insights: productivity={:?} workload={:?} prioritization={:?}",
                a.insights.productivity, a.insights.workload, a.insights.prioritization
            );
        }

        Command::Schedule { file, limit, json } => {
            let tasks = snapshot::load_predictive_tasks(&file)?;
            let order = optimal_schedule(
                &tasks,
                limit.unwrap_or(cfg.schedule.limit),
                cfg.scoring_policy(),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&order)?);
                return Ok(());
            }

            println!("# Optimal schedule\n");
            for (i, t) in order.iter().enumerate() {
                println!(
                    "{:>2}. {} | {} | {:?} | complexity={}%",
                    i + 1,
                    t.id,
                    t.title,
                    t.priority,
                    t.complexity
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                config::init_config(config_path.as_deref())?;
            }
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// Logs go to stderr so --json output stays clean.
fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The wall clock is read here and nowhere in the core.
fn resolve_now(args: &NowArgs, cfg: &Config) -> Result<DateTime<Utc>> {
    let tz = args.tz.as_deref().unwrap_or(&cfg.time.timezone);
    match args.now.as_deref() {
        Some(raw) => parse_instant(raw, tz).with_context(|| format!("parsing --now {raw}")),
        None => Ok(Utc::now()),
    }
}
