use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Currency, Engine, Money, NewWalletCmd, SyncReport, WalletKind};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "dompet_admin")]
#[command(about = "Admin utilities for Dompet (bootstrap users/wallets, reconcile balances)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./dompet.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Wallet(Wallet),
    /// Recompute wallet balances from their transactions.
    Sync(SyncArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Wallet {
    #[command(subcommand)]
    command: WalletCommand,
}

#[derive(Subcommand, Debug)]
enum WalletCommand {
    Create(WalletCreateArgs),
    List(WalletListArgs),
}

#[derive(Args, Debug)]
struct WalletCreateArgs {
    /// Owner username.
    #[arg(long)]
    owner: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "cash", value_parser = parse_wallet_kind)]
    kind: WalletKind,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, default_value = "IDR", value_parser = parse_currency)]
    currency: Currency,
    /// Booked as an opening transaction, e.g. `1000.00` or `-250.00`.
    #[arg(long, allow_hyphen_values = true)]
    opening_balance: Option<Money>,
}

#[derive(Args, Debug)]
struct WalletListArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    include_deleted: bool,
}

#[derive(Args, Debug)]
struct SyncArgs {
    /// Only these wallets (repeatable). Without it every wallet is checked.
    #[arg(long = "wallet")]
    wallets: Vec<Uuid>,
    /// Wallets loaded per page.
    #[arg(long, default_value_t = engine::DEFAULT_SYNC_BATCH_SIZE)]
    batch_size: u64,
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    Currency::try_from(raw).map_err(|err| err.to_string())
}

fn parse_wallet_kind(raw: &str) -> Result<WalletKind, String> {
    WalletKind::try_from(raw).map_err(|err| err.to_string())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn print_report(report: &SyncReport) {
    println!(
        "checked {} wallets: {} corrected, {} failed",
        report.total, report.corrected, report.failed
    );
    for c in &report.corrections {
        println!("  {}: {} -> {} ({})", c.wallet_id, c.before, c.after, c.delta);
    }
    for e in &report.errors {
        eprintln!("  {}: {}", e.wallet_id, e.error);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let batch_size = match &cli.command {
        Command::Sync(args) => args.batch_size,
        _ => engine::DEFAULT_SYNC_BATCH_SIZE,
    };
    let engine = Engine::builder()
        .database(db)
        .sync_batch_size(batch_size)
        .build()
        .await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let user = engine.new_user(&args.username).await?;
            println!("created user: {} ({})", user.username, user.id);
        }
        Command::Wallet(Wallet {
            command: WalletCommand::Create(args),
        }) => {
            let owner = engine.user_by_username(&args.owner).await?;
            let mut cmd = NewWalletCmd::new(owner.id, args.name)
                .kind(args.kind)
                .currency(args.currency)
                .opening_balance(args.opening_balance.unwrap_or(Money::ZERO));
            cmd.category = args.category;

            let wallet = engine.new_wallet(cmd).await?;
            println!(
                "created wallet: {} ({}) balance {} {}",
                wallet.name, wallet.id, wallet.balance, wallet.currency
            );
        }
        Command::Wallet(Wallet {
            command: WalletCommand::List(args),
        }) => {
            let owner = engine.user_by_username(&args.owner).await?;
            for wallet in engine.list_wallets(owner.id, args.include_deleted).await? {
                let state = if wallet.is_active() { "" } else { " [deleted]" };
                println!(
                    "{}  {:<20} {:>14} {}{state}",
                    wallet.id, wallet.name, wallet.balance, wallet.currency
                );
            }
        }
        Command::Sync(args) => {
            let report = if args.wallets.is_empty() {
                engine.sync_all_wallet_balances().await?
            } else {
                engine.sync_wallets(&args.wallets).await
            };
            print_report(&report);
            if report.failed > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
