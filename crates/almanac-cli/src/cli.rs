use std::io::IsTerminal;
use std::path::PathBuf;

use almanac_core::filter::{TaskFilter, TimeWindow};
use almanac_core::task::Category;
use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::{DEFAULT_CELL_WIDTH, MAX_CELL_WIDTH, MIN_CELL_WIDTH};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "almanac",
    version,
    about = "Almanac: month-view task planner",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the month grid with task bars.
    Month {
        /// Any date inside the month to show (defaults to today).
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Terminal columns per day.
        #[arg(
            long,
            default_value_t = DEFAULT_CELL_WIDTH,
            value_parser = parse_cell_width
        )]
        cell_width: usize,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List tasks matching the filter.
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Create a task.
    Add {
        #[arg(long)]
        title: String,

        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,

        /// Last day of the task (defaults to the start day).
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,

        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Change a task's title, category or description.
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, conflicts_with = "no_category")]
        category: Option<Category>,

        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the task's category.
        #[arg(long)]
        no_category: bool,

        /// Remove the task's description.
        #[arg(long)]
        clear_description: bool,
    },
    /// Move one edge of a task.
    Resize {
        id: String,

        #[arg(long, value_parser = parse_date_arg, conflicts_with = "end", required_unless_present = "end")]
        start: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,
    },
    /// Delete a task.
    Delete { id: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive title search.
    #[arg(long)]
    pub search: Option<String>,

    /// Restrict to a category (repeatable).
    #[arg(long = "category", action = ArgAction::Append)]
    pub categories: Vec<Category>,

    /// Only tasks starting or ending within N weeks from today.
    #[arg(long = "within-weeks")]
    pub within_weeks: Option<u32>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> TaskFilter {
        TaskFilter {
            search: self.search.clone().unwrap_or_default(),
            categories: self.categories.iter().copied().collect(),
            window: match self.within_weeks {
                Some(weeks) if weeks > 0 => TimeWindow::Weeks(weeks),
                _ => TimeWindow::All,
            },
        }
    }
}

fn parse_cell_width(raw: &str) -> anyhow::Result<usize> {
    let width: usize = raw
        .trim()
        .parse()
        .map_err(|e| anyhow!("invalid cell width '{raw}': {e}"))?;
    if !(MIN_CELL_WIDTH..=MAX_CELL_WIDTH).contains(&width) {
        return Err(anyhow!(
            "cell width must be between {MIN_CELL_WIDTH} and {MAX_CELL_WIDTH}"
        ));
    }
    Ok(width)
}

fn parse_date_arg(raw: &str) -> anyhow::Result<NaiveDate> {
    almanac_core::datetime::parse_date(raw)
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
