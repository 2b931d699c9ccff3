use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use receipt_book::config::Config;
use receipt_book::core::summary::recent;
use receipt_book::core::utils::embed_image_file;
use receipt_book::core::{
    Branding, MethodFilter, Payment, PaymentMethod, Receipt, ReceiptFilter, Summary,
    cumulative_paid, remaining, to_words,
};
use receipt_book::export::Exporter;
use receipt_book::presentation::{ReceiptView, TextRenderer, format_amount};
use receipt_book::store::{FileStore, ReceiptStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "receipt-book", about = "Issue and track payment receipts")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a new receipt
    New(ReceiptArgs),
    /// Change an existing receipt
    Edit {
        /// Receipt id or number
        receipt: String,
        #[command(flatten)]
        fields: ReceiptArgs,
    },
    /// Collect a new installment against a receipt's chain
    Collect {
        /// Receipt id or number of the root or any installment
        receipt: String,
        #[command(flatten)]
        fields: ReceiptArgs,
    },
    /// List receipts grouped by chain
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        method: MethodFilter,
    },
    /// Print a receipt
    Show { receipt: String },
    /// Delete a receipt
    Delete {
        receipt: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Write a receipt document to the export directory
    Export {
        receipt: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show collection totals
    Summary,
    /// Write a number in Arabic words
    Words {
        #[arg(allow_negative_numbers = true)]
        number: i64,
    },
    /// Show or change the company branding
    Branding {
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        logo: Option<PathBuf>,
        #[arg(long)]
        stamp: Option<PathBuf>,
        /// Forget the stored branding
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args)]
struct ReceiptArgs {
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    client: Option<String>,
    #[arg(long)]
    total: Option<f64>,
    #[arg(long)]
    paid: Option<f64>,
    #[arg(long)]
    purpose: Option<String>,
    #[arg(long)]
    method: Option<PaymentMethod>,
    #[arg(long)]
    cheque_number: Option<String>,
    #[arg(long)]
    bank: Option<String>,
    #[arg(long)]
    due_date: Option<NaiveDate>,
    #[arg(long)]
    reference: Option<String>,
    #[arg(long)]
    transfer_date: Option<NaiveDate>,
    #[arg(long)]
    company: Option<String>,
    /// Image file used as the signature
    #[arg(long)]
    signature: Option<PathBuf>,
}

#[derive(Debug)]
enum CliError {
    FieldMismatch(&'static str, PaymentMethod),
    InheritedField(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::FieldMismatch(field, method) => {
                write!(f, "--{field} does not apply to {method} payments")
            }
            CliError::InheritedField(field) => {
                write!(f, "--{field} is inherited from the root receipt")
            }
        }
    }
}

impl std::error::Error for CliError {}

impl ReceiptArgs {
    fn apply(self, receipt: &mut Receipt) -> Result<(), Box<dyn std::error::Error>> {
        if !receipt.is_root() {
            if self.total.is_some() {
                return Err(Box::new(CliError::InheritedField("total")));
            }
            if self.purpose.is_some() {
                return Err(Box::new(CliError::InheritedField("purpose")));
            }
        }
        if let Some(number) = self.number {
            receipt.receipt_number = number;
        }
        if let Some(date) = self.date {
            receipt.receipt_date = date;
        }
        if let Some(client) = self.client {
            receipt.client_name = client;
        }
        if let Some(total) = self.total {
            receipt.total_price = Some(total);
        }
        if let Some(paid) = self.paid {
            receipt.paid_amount = Some(paid);
        }
        if let Some(purpose) = self.purpose {
            receipt.purpose = purpose;
        }
        if let Some(company) = self.company {
            receipt.company_name = company;
        }
        if let Some(path) = self.signature {
            receipt.signature = Some(embed_image_file(&path)?);
        }
        if let Some(method) = self.method {
            if method != receipt.method() {
                receipt.payment = Payment::blank(method);
            }
        }

        let method = receipt.method();
        match &mut receipt.payment {
            Payment::Cheque {
                cheque_number,
                bank_name,
                due_date,
            } => {
                if self.reference.is_some() {
                    return Err(Box::new(CliError::FieldMismatch("reference", method)));
                }
                if self.transfer_date.is_some() {
                    return Err(Box::new(CliError::FieldMismatch("transfer-date", method)));
                }
                if self.cheque_number.is_some() {
                    *cheque_number = self.cheque_number;
                }
                if self.bank.is_some() {
                    *bank_name = self.bank;
                }
                if self.due_date.is_some() {
                    *due_date = self.due_date;
                }
            }
            Payment::Transfer {
                reference,
                transfer_date,
            } => {
                if self.cheque_number.is_some() || self.bank.is_some() || self.due_date.is_some() {
                    return Err(Box::new(CliError::FieldMismatch("cheque-number", method)));
                }
                if self.reference.is_some() {
                    *reference = self.reference;
                }
                if self.transfer_date.is_some() {
                    *transfer_date = self.transfer_date;
                }
            }
            Payment::Cash => {
                if self.cheque_number.is_some() || self.bank.is_some() || self.due_date.is_some() {
                    return Err(Box::new(CliError::FieldMismatch("cheque-number", method)));
                }
                if self.reference.is_some() || self.transfer_date.is_some() {
                    return Err(Box::new(CliError::FieldMismatch("reference", method)));
                }
            }
        }
        Ok(())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn confirm_delete(receipt: &Receipt) -> bool {
    print!(
        "Delete receipt {} for {}? It will be removed permanently [y/N] ",
        receipt.receipt_number, receipt.client_name
    );
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_row(receipt: &Receipt, indent: &str) {
    println!(
        "{indent}{} | {} | {} | {} | {}",
        receipt.receipt_number,
        receipt.client_name,
        format_amount(receipt.paid_amount.unwrap_or(0.0)),
        receipt.method().label(),
        receipt.receipt_date
    );
}

fn print_saved(receipt: &Receipt) {
    println!("{} ({})", receipt.receipt_number, receipt.id);
    println!("  paid so far: {}", format_amount(cumulative_paid(receipt)));
    if let Some(left) = remaining(receipt) {
        println!("  remaining:   {}", format_amount(left));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    let today = Local::now().date_naive();

    let mut store = ReceiptStore::open(FileStore::new(&cfg.storage.data_dir))?;

    match cli.command {
        Commands::New(fields) => {
            let mut receipt = store.new_receipt(today);
            fields.apply(&mut receipt)?;
            store.save_receipt(receipt.clone())?;
            print_saved(&receipt);
        }
        Commands::Edit { receipt, fields } => {
            let mut receipt = store.find(&receipt)?.clone();
            fields.apply(&mut receipt)?;
            store.save_receipt(receipt.clone())?;
            print_saved(&receipt);
        }
        Commands::Collect { receipt, fields } => {
            let source = store.find(&receipt)?.id;
            let mut draft = store.collect_installment(source, today)?;
            fields.apply(&mut draft)?;
            store.save_receipt(draft.clone())?;
            print_saved(&draft);
        }
        Commands::List { search, method } => {
            let filter = ReceiptFilter::new(search, method);
            let groups = filter.visible_groups(store.receipts());
            if groups.is_empty() {
                println!("No receipts");
            }
            for group in groups {
                print_row(group.root, "");
                for child in &group.chain {
                    print_row(child, "    ↳ ");
                }
            }
        }
        Commands::Show { receipt } => {
            let receipt = store.find(&receipt)?;
            print!("{}", TextRenderer.render_string(&ReceiptView::new(receipt)));
        }
        Commands::Delete { receipt, yes } => {
            let id = store.find(&receipt)?.id;
            match store.delete(id, |r| yes || confirm_delete(r))? {
                Some(r) => println!("Deleted {}", r.receipt_number),
                None => println!("Nothing deleted"),
            }
        }
        Commands::Export { receipt, out } => {
            let receipt = store.find(&receipt)?;
            let dir = out.unwrap_or(cfg.export.output_dir);
            let path = Exporter::new(TextRenderer).export(receipt, &dir)?;
            println!("{}", path.display());
        }
        Commands::Summary => {
            let summary = Summary::from_receipts(store.receipts());
            println!("Collected:        {}", format_amount(summary.total_collected));
            println!("Receipts:         {}", summary.receipt_count);
            println!("Clients:          {}", summary.distinct_clients);
            println!("Cash:             {:.0}%", summary.cash_share());
            println!("Cheque/transfer:  {:.0}%", summary.bank_share());
            println!(
                "Average receipt:  {}",
                format_amount(summary.average_per_receipt().round())
            );
            println!("Recent:");
            for r in recent(store.receipts(), 5) {
                print_row(r, "  ");
            }
        }
        Commands::Branding {
            company,
            logo,
            stamp,
            clear,
        } => {
            if clear {
                store.clear_branding()?;
            } else {
                let mut branding: Branding = store.branding().clone();
                if let Some(name) = company {
                    branding.company_name = name;
                }
                if let Some(path) = logo {
                    branding.company_logo = Some(embed_image_file(&path)?);
                }
                if let Some(path) = stamp {
                    branding.stamp = Some(embed_image_file(&path)?);
                }
                store.set_branding(branding)?;
            }
            let b = store.branding();
            println!("Company: {}", b.company_name);
            println!("Logo:    {}", if b.company_logo.is_some() { "set" } else { "none" });
            println!("Stamp:   {}", if b.stamp.is_some() { "set" } else { "none" });
        }
        Commands::Words { number } => println!("{}", to_words(number)?),
    }

    Ok(())
}
