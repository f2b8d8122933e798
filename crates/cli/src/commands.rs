use clap::{Parser, Subcommand, ValueEnum};
use financeapp_core::models::entry::{Entry, EntryId, EntryInput, EntryType};
use financeapp_core::models::month::Month;
use financeapp_core::services::confirm::AlwaysConfirm;
use financeapp_core::storage::store::FileStore;
use financeapp_core::{FinanceLedger, Removal};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{AppConfig, Overrides};
use crate::error::{CliError, Result};
use crate::prompt::TerminalConfirm;

/// FinanceApp - record income and expenses, see monthly totals
#[derive(Debug, Parser)]
#[command(name = "financeapp", version)]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Override the data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Income,
    Expense,
}

impl From<Kind> for EntryType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Income => EntryType::Income,
            Kind::Expense => EntryType::Expense,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a new entry
    Add {
        description: String,

        /// Amount as typed, e.g. "8.500,00"
        amount: String,

        #[arg(short = 't', long = "type", value_enum, default_value = "expense")]
        kind: Kind,

        #[arg(short, long, default_value = "")]
        category: String,

        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long)]
        payment_method: Option<String>,
    },

    /// Edit an entry; omitted fields keep their current value
    Edit {
        id: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<Kind>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long)]
        payment_method: Option<String>,
    },

    /// Delete an entry
    Remove {
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List entries, newest first
    List {
        /// Only entries of this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Case-insensitive text filter on description and category
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Monthly totals
    Summary {
        /// Reference month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Move the reference month by this many months
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        shift: i32,
    },

    /// Show how the masked amount field renders a raw keystroke stream
    Mask { raw: String },

    /// Write all entries to stdout
    Export {
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
    },

    /// Import entries from an exported file
    Import { path: PathBuf },
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            data_dir: self.data_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }

    pub async fn run(self, config: AppConfig) -> Result<()> {
        let store = Arc::new(FileStore::new(&config.data_dir));
        let mut ledger = FinanceLedger::open(store, config.ledger.clone()).await;
        tracing::debug!(data_dir = %config.data_dir.display(), "ledger ready");

        let result = run_command(&mut ledger, self.command);
        ledger.flush().await;
        result
    }
}

fn run_command(ledger: &mut FinanceLedger, command: Command) -> Result<()> {
    match command {
        Command::Add {
            description,
            amount,
            kind,
            category,
            subcategory,
            payment_method,
        } => {
            let input = EntryInput {
                description,
                amount,
                entry_type: kind.into(),
                category,
                subcategory,
                payment_method,
            };
            let entry = ledger.submit(&input)?;
            println!("Added {}", entry.id);
            print_entry(ledger, &entry);
        }

        Command::Edit {
            id,
            description,
            amount,
            kind,
            category,
            subcategory,
            payment_method,
        } => {
            let id = EntryId::from(id);
            let mut input = ledger.begin_edit(&id)?;
            if let Some(description) = description {
                input.description = description;
            }
            if let Some(amount) = amount {
                input.amount = amount;
            }
            if let Some(kind) = kind {
                input.entry_type = kind.into();
            }
            if let Some(category) = category {
                input.category = category;
            }
            if subcategory.is_some() {
                input.subcategory = subcategory;
            }
            if payment_method.is_some() {
                input.payment_method = payment_method;
            }
            let entry = ledger.submit(&input)?;
            println!("Updated {}", entry.id);
            print_entry(ledger, &entry);
        }

        Command::Remove { id, yes } => {
            let id = EntryId::from(id);
            let removal = if yes {
                ledger.remove_entry(&id, &AlwaysConfirm)
            } else {
                ledger.remove_entry(&id, &TerminalConfirm)
            };
            match removal {
                Removal::Removed(entry) => println!("Removed {} ({})", entry.id, entry.description),
                Removal::Declined => println!("Kept {id}"),
                Removal::NotFound => println!("No entry with id {id}"),
            }
        }

        Command::List { month, search } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            let matches = match &search {
                Some(query) => ledger.search_entries(query),
                None => ledger.entries().iter().collect(),
            };
            let offset = ledger.settings().utc_offset();
            let mut shown = 0;
            for entry in matches {
                if month.is_some_and(|m| !m.contains(entry.created_at, offset)) {
                    continue;
                }
                print_entry(ledger, entry);
                shown += 1;
            }
            if shown == 0 {
                println!("No entries.");
            }
        }

        Command::Summary { month, shift } => {
            let base = match month.as_deref() {
                Some(raw) => parse_month(raw)?,
                None => ledger.current_month(),
            };
            let month = base.shift(shift);
            let summary = ledger.summary(month);

            println!("Summary for {}", summary.month);
            println!("  Income:          {}", ledger.format_currency(summary.total_income));
            println!("  Expenses:        {}", ledger.format_currency(summary.total_expense));
            println!("  Balance:         {}", ledger.format_currency(summary.balance));
            println!("  Average expense: {}", ledger.format_currency(summary.average_expense));

            let breakdown = ledger.category_breakdown(month, EntryType::Expense);
            if !breakdown.is_empty() {
                println!("  Expenses by category:");
                for slice in breakdown {
                    println!(
                        "    {:<20} {:>16} {:>6}%",
                        slice.category,
                        ledger.format_currency(slice.total),
                        slice.percentage
                    );
                }
            }
        }

        Command::Mask { raw } => {
            println!("{}", ledger.normalize_amount_input(&raw));
        }

        Command::Export { format } => match format {
            ExportFormat::Json => println!("{}", ledger.export_entries_to_json()?),
            ExportFormat::Csv => print!("{}", ledger.export_entries_to_csv()),
        },

        Command::Import { path } => {
            let json = std::fs::read_to_string(&path)?;
            let count = ledger.import_entries_from_json(&json)?;
            println!("Imported {count} entries from {}", path.display());
        }
    }
    Ok(())
}

fn parse_month(raw: &str) -> Result<Month> {
    Month::parse(raw).ok_or_else(|| CliError::InvalidArgument(format!("'{raw}' is not a YYYY-MM month")))
}

fn print_entry(ledger: &FinanceLedger, entry: &Entry) {
    let sign = match entry.entry_type {
        EntryType::Income => "+",
        EntryType::Expense => "-",
    };
    println!(
        "{}  {}  {}{:>14}  {:<24} {}",
        entry.id,
        entry.created_at.with_timezone(&ledger.settings().utc_offset()).format("%Y-%m-%d"),
        sign,
        ledger.format_currency(entry.amount),
        entry.description,
        entry.category,
    );
}
