//! Khata main entry point

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use khata_config::{Config, ConfigError};
use khata_core::{
    AuthError, CoreError, CoreResult, Ledger, MonthFilter, Notice, PinMode, TransactionInput,
};
use khata_store::{FileStore, TransactionType};
use khata_utils::format_amount;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "khata")]
#[command(version = "0.1.0")]
#[command(about = "Credit ledger for a small restaurant", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "khata.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the default configuration file
    Config,
    /// Create the ledger document if it does not exist yet
    Init,
    /// Check the operator ID and password
    Login { id: String, password: String },
    /// List customers with their balances
    Customers {
        /// YYYY-MM or "all"
        #[arg(short, long, default_value = "all")]
        month: String,
    },
    /// List months that have transactions
    Months,
    /// Whole-ledger credit, paid and outstanding totals
    Summary {
        #[arg(short, long, default_value = "all")]
        month: String,
    },
    /// Register a customer
    AddCustomer {
        name: String,
        #[arg(short, long)]
        password: String,
        /// Four-digit PIN; generated when omitted
        #[arg(long)]
        pin: Option<String>,
    },
    /// Remove a customer and all their transactions
    DeleteCustomer {
        name: String,
        #[arg(short, long)]
        password: String,
    },
    /// Show a customer's ledger
    Ledger {
        name: String,
        #[arg(long)]
        pin: String,
        #[arg(short, long, default_value = "all")]
        month: String,
    },
    /// Record food taken on credit
    Credit {
        name: String,
        #[arg(long)]
        pin: String,
        #[arg(short, long)]
        amount: String,
        /// YYYY-MM-DD, today when omitted
        #[arg(short, long)]
        date: Option<String>,
        /// HH:MM, now when omitted
        #[arg(short, long)]
        time: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Record a payment
    Payment {
        name: String,
        #[arg(long)]
        pin: String,
        #[arg(short, long)]
        amount: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        time: Option<String>,
    },
    /// Delete a transaction by its position in the full list or by its id
    DeleteEntry {
        name: String,
        #[arg(short, long)]
        password: String,
        /// 1-based position as shown by `ledger`
        #[arg(
            long,
            conflicts_with = "id",
            required_unless_present = "id",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        number: Option<u64>,
        #[arg(long)]
        id: Option<String>,
    },
    /// Change the shared password
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Change a customer's PIN
    ChangePin {
        name: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        new_pin: String,
    },
    /// Export the whole ledger to a text report
    Export {
        /// Output file or directory, current directory when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = Config::load(&args.config);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    match loaded {
        Ok(_) => log::debug!("Config loaded from {}", args.config.display()),
        Err(ConfigError::FileNotFound { path }) => {
            log::warn!("Config file not found: {}, using defaults", path)
        }
        Err(e) => {
            eprintln!("{}", e.to_details());
            std::process::exit(1);
        }
    }

    if let Command::Config = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let store = Arc::new(FileStore::new(config.ledger_path(), config.store.backup));
    let ledger = Ledger::new(config, store);
    log::debug!("Using ledger at {}", ledger.location());

    let rt = Runtime::new().context("Failed to start runtime")?;
    let outcome = rt.block_on(run(&ledger, args.command))?;

    match outcome {
        Ok(Some(notice)) => println!("{}", notice),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{}", ledger.error_notice(&e));
            if !e.is_recoverable() {
                eprintln!("{}", e.to_details());
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Run one command. The outer error is for plumbing failures, the inner
/// result is the operation outcome shown as a notice.
async fn run(ledger: &Ledger, command: Command) -> anyhow::Result<CoreResult<Option<Notice>>> {
    let outcome = match command {
        Command::Config => Ok(None),
        Command::Init => ledger.initialize().await.map(|_| {
            Some(ledger.success_notice(format!("Ledger ready at {}", ledger.location())))
        }),
        Command::Login { id, password } => match ledger.login(&id, &password).await {
            Ok(true) => Ok(Some(ledger.success_notice("Login successful!"))),
            Ok(false) => Err(CoreError::from(AuthError::InvalidLogin)),
            Err(e) => Err(e),
        },
        Command::Customers { month } => list_customers(ledger, &month).await,
        Command::Months => ledger.available_months().await.map(|months| {
            if months.is_empty() {
                println!("No transactions yet.");
            }
            for month in months {
                println!("{}  {}", month.key(), month.label());
            }
            None
        }),
        Command::Summary { month } => summary(ledger, &month).await,
        Command::AddCustomer { name, password, pin } => {
            let mode = pin.map_or(PinMode::Auto, PinMode::Custom);
            ledger.add_customer(&name, &password, mode).await.map(|customer| {
                println!("PIN for {}: {}", name.trim(), customer.pin);
                Some(ledger.success_notice("Customer added successfully!"))
            })
        }
        Command::DeleteCustomer { name, password } => ledger
            .delete_customer(&name, &password)
            .await
            .map(|_| Some(ledger.success_notice("Customer deleted successfully!"))),
        Command::Ledger { name, pin, month } => show_ledger(ledger, &name, &pin, &month).await,
        Command::Credit { name, pin, amount, date, time, notes } => {
            let mut input = transaction_input(TransactionType::Credit, amount, date, time);
            input.notes = notes;
            add_transaction(ledger, &name, &pin, input).await
        }
        Command::Payment { name, pin, amount, date, time } => {
            let input = transaction_input(TransactionType::Payment, amount, date, time);
            add_transaction(ledger, &name, &pin, input).await
        }
        Command::DeleteEntry { name, password, number, id } => {
            let removed = match (id, number) {
                (Some(id), _) => ledger.delete_transaction_by_id(&name, &password, &id).await,
                (None, Some(number)) => {
                    let index = usize::try_from(number - 1).context("Entry number too large")?;
                    ledger.delete_transaction(&name, &password, index).await
                }
                (None, None) => anyhow::bail!("Either --number or --id is required"),
            };
            removed.map(|_| Some(ledger.success_notice("Transaction deleted successfully!")))
        }
        Command::ChangePassword { current, new, confirm } => ledger
            .change_password(&current, &new, Some(&confirm))
            .await
            .map(|_| Some(ledger.success_notice("Password changed successfully!"))),
        Command::ChangePin { name, password, new_pin } => ledger
            .change_pin(&password, &name, &new_pin)
            .await
            .map(|_| Some(ledger.success_notice(format!("PIN changed successfully for {}!", name)))),
        Command::Export { output } => return export(ledger, output).await,
    };
    Ok(outcome)
}

fn transaction_input(
    kind: TransactionType,
    amount: String,
    date: Option<String>,
    time: Option<String>,
) -> TransactionInput {
    let now = Local::now();
    TransactionInput {
        kind,
        amount,
        date: date.unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
        time: time.unwrap_or_else(|| now.format("%H:%M").to_string()),
        notes: None,
    }
}

async fn add_transaction(
    ledger: &Ledger,
    name: &str,
    pin: &str,
    input: TransactionInput,
) -> CoreResult<Option<Notice>> {
    let label = match input.kind {
        TransactionType::Credit => "Credit",
        TransactionType::Payment => "Payment",
    };
    let transaction = ledger.add_transaction(name, pin, input).await?;
    println!("Recorded {} ({})", transaction.datetime(), transaction.id);
    Ok(Some(ledger.success_notice(format!("{} added successfully!", label))))
}

async fn list_customers(ledger: &Ledger, month: &str) -> CoreResult<Option<Notice>> {
    let filter: MonthFilter = month.parse()?;
    let symbol = ledger.config().report.currency_symbol.clone();
    let rows = ledger.customer_balances(&filter).await?;

    if rows.is_empty() {
        println!("No customers yet. Add your first customer!");
        return Ok(None);
    }

    println!("Customers ({})", filter.description());
    for row in rows {
        println!(
            "  {:<24} {:>14} {:<9} {} entries",
            row.name,
            format_amount(&symbol, row.balance.abs()),
            row.status.label(),
            row.transaction_count
        );
    }
    Ok(None)
}

async fn summary(ledger: &Ledger, month: &str) -> CoreResult<Option<Notice>> {
    let filter: MonthFilter = month.parse()?;
    let symbol = ledger.config().report.currency_symbol.clone();
    let summary = ledger.summary(&filter).await?;

    println!("{}", filter.description());
    println!("  Total Credit:  {}", format_amount(&symbol, summary.total_credit));
    println!("  Total Paid:    {}", format_amount(&symbol, summary.total_paid));
    println!("  Outstanding:   {}", format_amount(&symbol, summary.outstanding));
    println!("  Customers:     {}", summary.customer_count);
    Ok(None)
}

async fn show_ledger(ledger: &Ledger, name: &str, pin: &str, month: &str) -> CoreResult<Option<Notice>> {
    let filter: MonthFilter = month.parse()?;
    let symbol = ledger.config().report.currency_symbol.clone();
    let view = ledger.customer_ledger(name, pin, &filter).await?;

    println!("{} ({})", view.name, filter.description());
    println!("  Balance: {} ({})", format_amount(&symbol, view.balance.abs()), view.status.label());
    println!("  Credit: {}  Paid: {}", format_amount(&symbol, view.totals.credit), format_amount(&symbol, view.totals.payment));

    if view.entries.is_empty() {
        if filter.is_all() {
            println!("No transactions yet. Add your first entry!");
        } else {
            println!("No transactions in this month.");
        }
    }
    for entry in &view.entries {
        let t = &entry.transaction;
        let sign = if t.is_credit() { '+' } else { '-' };
        print!(
            "  #{:<4} {:<17} {:<8} {}{}",
            entry.index + 1,
            t.datetime(),
            t.kind.label(),
            sign,
            format_amount(&symbol, t.amount)
        );
        if let Some(notes) = &t.notes {
            print!("  {}", notes);
        }
        println!("  [{}]", t.id);
    }

    if !view.months.is_empty() {
        let months: Vec<String> = view.months.iter().map(|m| m.key()).collect();
        println!("  Months: {}", months.join(", "));
    }
    Ok(None)
}

async fn export(ledger: &Ledger, output: Option<PathBuf>) -> anyhow::Result<CoreResult<Option<Notice>>> {
    let now = Local::now().naive_local();
    let report = match ledger.export_report_at(now).await {
        Ok(report) => report,
        Err(e) => return Ok(Err(e)),
    };

    let file_name = ledger.export_file_name(&now.date());
    let path = match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path,
        None => PathBuf::from(file_name),
    };

    tokio::fs::write(&path, report)
        .await
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    log::info!("Report written to {}", path.display());

    Ok(Ok(Some(ledger.success_notice("Database exported to TXT file successfully!"))))
}
