//! TradeLog CLI — trading journal commands.
//!
//! Commands:
//! - `add` — create and commit a trade in one shot
//! - `list` — show the ledger for a journal key
//! - `remove` / `clear` — ledger maintenance
//! - `stats` — win rate, R-multiple, capital summary
//! - `curve` — equity-curve points plus an ASCII sketch
//! - `export` — CSV/JSON dump of the ledger
//! - `principle add/list/rm` — remote principle authoring

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tradelog_core::config::JournalConfig;
use tradelog_core::curve::EquityCurve;
use tradelog_core::domain::{OpenState, Outcome, PrincipleCategory, Side};
use tradelog_core::stats::JournalStats;
use tradelog_journal::{export, CommitOutcome, HttpBackend, Journal, PrincipleBook};

#[derive(Parser)]
#[command(name = "tradelog", about = "TradeLog CLI — trading journal")]
struct Cli {
    /// Journal key (scopes the ledger, e.g. per fund).
    #[arg(long, global = true, default_value = "main")]
    journal: String,

    /// Directory for journal snapshots.
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Path to a TOML config (starting capital, canvas dimensions).
    #[arg(long, global = true, default_value = "tradelog.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and commit a trade.
    Add {
        #[arg(long)]
        symbol: String,

        /// long or short.
        #[arg(long, default_value = "long")]
        side: String,

        #[arg(long)]
        entry: String,

        #[arg(long)]
        exit: String,

        #[arg(long)]
        size: String,

        /// Signed dollar return (authored, not derived from prices).
        #[arg(long, default_value = "")]
        ret: String,

        /// Mark the trade closed.
        #[arg(long, default_value_t = false)]
        closed: bool,

        /// Close date (YYYY-MM-DD); implies --closed.
        #[arg(long)]
        date_closed: Option<String>,

        /// Principle ids to attach (max 10).
        #[arg(long, value_delimiter = ',')]
        principles: Vec<u64>,

        /// Uncorrelated-asset ids to attach (max 20).
        #[arg(long, value_delimiter = ',')]
        assets: Vec<u64>,
    },
    /// Edit an existing trade; unset flags keep the stored values.
    Edit {
        id: u64,

        #[arg(long)]
        symbol: Option<String>,

        /// long or short.
        #[arg(long)]
        side: Option<String>,

        #[arg(long)]
        entry: Option<String>,

        #[arg(long)]
        exit: Option<String>,

        #[arg(long)]
        size: Option<String>,

        /// Signed dollar return (authored, not derived from prices).
        #[arg(long)]
        ret: Option<String>,

        /// Mark the trade closed.
        #[arg(long, default_value_t = false)]
        closed: bool,

        /// Close date (YYYY-MM-DD); implies --closed.
        #[arg(long)]
        date_closed: Option<String>,

        /// Replace the attached principle ids (max 10).
        #[arg(long, value_delimiter = ',')]
        principles: Option<Vec<u64>>,

        /// Replace the attached uncorrelated-asset ids (max 20).
        #[arg(long, value_delimiter = ',')]
        assets: Option<Vec<u64>>,
    },
    /// Show the ledger, newest first.
    List,
    /// Delete one trade by id.
    Remove {
        id: u64,
    },
    /// Delete every trade in the journal.
    Clear {
        /// Actually delete (without this flag, only reports what would go).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
    /// Print the statistics block.
    Stats,
    /// Print equity-curve points and an ASCII sketch.
    Curve,
    /// Export the ledger.
    Export {
        /// Output path; format from extension (.csv or .json).
        path: PathBuf,
    },
    /// Principle authoring against the portal backend.
    Principle {
        /// Portal base URL.
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        server: String,

        #[command(subcommand)]
        action: PrincipleAction,
    },
}

#[derive(Subcommand)]
enum PrincipleAction {
    /// Author a new principle.
    Add {
        text: String,

        /// Economic or Investing.
        #[arg(long)]
        category: String,
    },
    /// List principles from the backend.
    List,
    /// Delete a principle by id (trade refs are left dangling by design).
    Rm {
        id: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = JournalConfig::load(&cli.config)?;

    match cli.command {
        Commands::Add {
            symbol,
            side,
            entry,
            exit,
            size,
            ret,
            closed,
            date_closed,
            principles,
            assets,
        } => run_add(
            &cli.journal,
            &cli.data_dir,
            config,
            AddArgs {
                symbol,
                side,
                entry,
                exit,
                size,
                ret,
                closed,
                date_closed,
                principles,
                assets,
            },
        ),
        Commands::Edit {
            id,
            symbol,
            side,
            entry,
            exit,
            size,
            ret,
            closed,
            date_closed,
            principles,
            assets,
        } => run_edit(
            &cli.journal,
            &cli.data_dir,
            config,
            id,
            EditArgs {
                symbol,
                side,
                entry,
                exit,
                size,
                ret,
                closed,
                date_closed,
                principles,
                assets,
            },
        ),
        Commands::List => run_list(&cli.journal, &cli.data_dir, config),
        Commands::Remove { id } => run_remove(&cli.journal, &cli.data_dir, config, id),
        Commands::Clear { confirm } => run_clear(&cli.journal, &cli.data_dir, config, confirm),
        Commands::Stats => run_stats(&cli.journal, &cli.data_dir, config),
        Commands::Curve => run_curve(&cli.journal, &cli.data_dir, config),
        Commands::Export { path } => run_export(&cli.journal, &cli.data_dir, config, &path),
        Commands::Principle { server, action } => run_principle(&server, action),
    }
}

struct AddArgs {
    symbol: String,
    side: String,
    entry: String,
    exit: String,
    size: String,
    ret: String,
    closed: bool,
    date_closed: Option<String>,
    principles: Vec<u64>,
    assets: Vec<u64>,
}

struct EditArgs {
    symbol: Option<String>,
    side: Option<String>,
    entry: Option<String>,
    exit: Option<String>,
    size: Option<String>,
    ret: Option<String>,
    closed: bool,
    date_closed: Option<String>,
    principles: Option<Vec<u64>>,
    assets: Option<Vec<u64>>,
}

fn parse_side(raw: &str) -> Result<Side> {
    match raw.to_lowercase().as_str() {
        "long" => Ok(Side::Long),
        "short" => Ok(Side::Short),
        other => bail!("unknown side '{other}' (expected long or short)"),
    }
}

fn parse_date_closed(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --date-closed (expected YYYY-MM-DD)")
}

fn open_journal(key: &str, data_dir: &PathBuf, config: JournalConfig) -> Result<Journal> {
    Journal::open(key, data_dir, config)
        .with_context(|| format!("failed to open journal '{key}'"))
}

fn run_add(key: &str, data_dir: &PathBuf, config: JournalConfig, args: AddArgs) -> Result<()> {
    let side = parse_side(&args.side)?;
    let date_closed = parse_date_closed(args.date_closed.as_deref())?;

    let mut journal = open_journal(key, data_dir, config)?;
    journal.begin_create()?;
    {
        let draft = journal.draft_mut().expect("session just opened");
        draft.symbol = args.symbol;
        draft.entry_price = args.entry;
        draft.exit_price = args.exit;
        draft.size = args.size;
        draft.return_amount = args.ret;
        draft.side = side;
        if args.closed || date_closed.is_some() {
            draft.open_state = OpenState::Closed;
            draft.date_closed = date_closed;
        }
    }
    for id in args.principles {
        if !journal.toggle_principle(id) {
            eprintln!("principle {id} not attached (selection cap reached)");
        }
    }
    for id in args.assets {
        if !journal.toggle_asset(id) {
            eprintln!("asset {id} not attached (selection cap reached)");
        }
    }

    let outcome = journal.commit()?;
    report_commit(key, outcome);
    Ok(())
}

fn run_edit(
    key: &str,
    data_dir: &PathBuf,
    config: JournalConfig,
    id: u64,
    args: EditArgs,
) -> Result<()> {
    let side = args.side.as_deref().map(parse_side).transpose()?;
    let date_closed = parse_date_closed(args.date_closed.as_deref())?;

    let mut journal = open_journal(key, data_dir, config)?;
    journal.begin_edit(id)?;
    {
        let draft = journal.draft_mut().expect("session just opened");
        if let Some(symbol) = args.symbol {
            draft.symbol = symbol;
        }
        if let Some(side) = side {
            draft.side = side;
        }
        if let Some(entry) = args.entry {
            draft.entry_price = entry;
        }
        if let Some(exit) = args.exit {
            draft.exit_price = exit;
        }
        if let Some(size) = args.size {
            draft.size = size;
        }
        if let Some(ret) = args.ret {
            draft.return_amount = ret;
        }
        if args.closed || date_closed.is_some() {
            draft.open_state = OpenState::Closed;
            if date_closed.is_some() {
                draft.date_closed = date_closed;
            }
        }
    }
    if let Some(ids) = args.principles {
        replace_selection(&mut journal, true, &ids);
    }
    if let Some(ids) = args.assets {
        replace_selection(&mut journal, false, &ids);
    }

    let outcome = journal.commit()?;
    report_commit(key, outcome);
    Ok(())
}

/// Swap the restored selection for an explicit id list.
fn replace_selection(journal: &mut Journal, principles: bool, ids: &[u64]) {
    let current: Vec<u64> = if principles {
        journal.principle_selection().to_vec()
    } else {
        journal.asset_selection().to_vec()
    };
    for id in current {
        if principles {
            journal.toggle_principle(id);
        } else {
            journal.toggle_asset(id);
        }
    }
    for &id in ids {
        let attached = if principles {
            journal.toggle_principle(id)
        } else {
            journal.toggle_asset(id)
        };
        if !attached {
            eprintln!("id {id} not attached (selection cap reached)");
        }
    }
}

fn report_commit(key: &str, outcome: CommitOutcome) {
    println!(
        "Committed trade #{} {} ({:?})",
        outcome.record.id, outcome.record.symbol, outcome.record.outcome
    );
    match outcome.persisted {
        Ok(()) => println!("Saved to journal '{key}'."),
        // The in-memory ledger keeps the trade; the user must know the save
        // did not durably succeed.
        Err(err) => eprintln!("WARNING: trade committed but not durably saved: {err}"),
    }
    print_stats(&outcome.stats);
}

fn run_list(key: &str, data_dir: &PathBuf, config: JournalConfig) -> Result<()> {
    let journal = open_journal(key, data_dir, config)?;
    if journal.trades().is_empty() {
        println!("Journal '{key}' is empty.");
        return Ok(());
    }
    println!(
        "{:>5}  {:<10} {:<10} {:<8} {:<6} {:<7} {:>10} {:>10} {:>6} {:>12}",
        "id", "opened", "closed", "symbol", "side", "state", "entry", "exit", "size", "return"
    );
    for trade in journal.trades() {
        println!(
            "{:>5}  {:<10} {:<10} {:<8} {:<6} {:<7} {:>10.2} {:>10.2} {:>6} {:>12.2}",
            trade.id,
            trade.date_opened.to_string(),
            trade
                .date_closed
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
            trade.symbol,
            format!("{:?}", trade.side),
            format!("{:?}", trade.open_state),
            trade.entry_price,
            trade.exit_price,
            trade.size,
            trade.return_amount
        );
    }
    Ok(())
}

fn run_remove(key: &str, data_dir: &PathBuf, config: JournalConfig, id: u64) -> Result<()> {
    let mut journal = open_journal(key, data_dir, config)?;
    match journal.remove(id) {
        None => bail!("trade {id} not found in journal '{key}'"),
        Some(Ok(())) => {
            println!("Removed trade {id}.");
            Ok(())
        }
        Some(Err(err)) => {
            eprintln!("WARNING: trade removed in memory but not durably saved: {err}");
            Ok(())
        }
    }
}

fn run_clear(key: &str, data_dir: &PathBuf, config: JournalConfig, confirm: bool) -> Result<()> {
    let mut journal = open_journal(key, data_dir, config)?;
    if !confirm {
        println!(
            "Would delete {} trade(s) from journal '{key}'. Re-run with --confirm.",
            journal.trades().len()
        );
        return Ok(());
    }
    journal.clear()?;
    println!("Journal '{key}' cleared.");
    Ok(())
}

fn run_stats(key: &str, data_dir: &PathBuf, config: JournalConfig) -> Result<()> {
    let journal = open_journal(key, data_dir, config)?;
    print_stats(&journal.stats());
    Ok(())
}

fn print_stats(stats: &JournalStats) {
    println!(
        "Trades:        {} total / {} closed / {} valid",
        stats.total_trades, stats.closed_trades, stats.valid_trades
    );
    println!(
        "Win rate:      {:.1}%  ({} W / {} L)",
        stats.win_rate * 100.0,
        stats.win_count,
        stats.loss_count
    );
    println!("R-multiple:    {:.2}", stats.r_multiple);
    println!("Avg return:    ${:.2}", stats.avg_return);
    println!(
        "Total return:  ${:.2}  ({:+.2}%)",
        stats.total_return, stats.return_percent
    );
    println!(
        "Capital:       ${:.2} -> ${:.2}",
        stats.starting_capital, stats.current_capital
    );
}

fn run_curve(key: &str, data_dir: &PathBuf, config: JournalConfig) -> Result<()> {
    let journal = open_journal(key, data_dir, config)?;
    let curve = journal.curve();
    if curve.is_flat() {
        println!("No closed trades; flat line at y = {:.1}.", curve.baseline_y);
        return Ok(());
    }
    println!("{:>4} {:>10} {:>10} {:>14}  outcome", "i", "x", "y", "capital");
    for (i, point) in curve.points.iter().enumerate() {
        println!(
            "{:>4} {:>10.1} {:>10.1} {:>14.2}  {:?}",
            i, point.x, point.y, point.running_capital, point.outcome
        );
    }
    println!();
    print_sketch(&curve, &journal.config().canvas);
    Ok(())
}

/// Down-sample the logical canvas onto a small character grid.
fn print_sketch(curve: &EquityCurve, canvas: &tradelog_core::curve::CanvasSpec) {
    const COLS: usize = 64;
    const ROWS: usize = 16;
    let mut grid = vec![[' '; COLS]; ROWS];

    let baseline_row = ((curve.baseline_y / canvas.height) * (ROWS - 1) as f64).round() as usize;
    for col in grid[baseline_row.min(ROWS - 1)].iter_mut() {
        *col = '-';
    }

    for point in &curve.points {
        let col = ((point.x / canvas.width) * (COLS - 1) as f64).round() as usize;
        let row = ((point.y / canvas.height) * (ROWS - 1) as f64).round() as usize;
        let marker = match point.outcome {
            Outcome::Win => 'o',
            Outcome::Loss => 'x',
            Outcome::NotApplicable => '.',
        };
        grid[row.min(ROWS - 1)][col.min(COLS - 1)] = marker;
    }

    for row in &grid {
        println!("{}", row.iter().collect::<String>());
    }
    println!("o = win, x = loss, baseline = starting capital");
}

fn run_export(key: &str, data_dir: &PathBuf, config: JournalConfig, path: &PathBuf) -> Result<()> {
    let journal = open_journal(key, data_dir, config)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => export::write_trades_csv(path, journal.trades())?,
        Some("json") => export::write_trades_json(path, journal.trades())?,
        _ => bail!("unsupported export extension (expected .csv or .json)"),
    }
    println!("Exported {} trade(s) to {}.", journal.trades().len(), path.display());
    Ok(())
}

fn run_principle(server: &str, action: PrincipleAction) -> Result<()> {
    let mut book = PrincipleBook::new(HttpBackend::new(server));

    match action {
        PrincipleAction::Add { text, category } => {
            let category: PrincipleCategory = category
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            let entry = book.create(&text, category)?;
            println!("Saved principle {} [{}]: {}", entry.sequence_number, entry.id, entry.text);
        }
        PrincipleAction::List => {
            book.refresh()?;
            if book.entries().is_empty() {
                println!("No principles recorded.");
            }
            for entry in book.entries() {
                println!("{:>5}  [{}] {} - {}", entry.sequence_number, entry.id, entry.category, entry.text);
            }
        }
        PrincipleAction::Rm { id } => {
            book.refresh()?;
            book.delete(id)?;
            println!("Deleted principle {id}.");
        }
    }
    Ok(())
}
