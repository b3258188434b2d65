use dotenvy::dotenv;
use finzz::{
    config::{database, settings},
    core::{
        balance, category,
        effect::Totals,
        ledger::Ledger,
        notify::TracingNotifier,
        report::{self, Granularity},
    },
    entities::TransactionType,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; vars may also be set externally
    dotenv().ok();

    // 3. Load settings
    let config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!("Loaded configuration for user {}", config.user_id);

    // 4. Connect and ensure the schema
    let url = database::get_database_url();
    if url.starts_with("sqlite://data/") {
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Seed the totals row and categories on first run
    let seed = Totals::new(config.seed.balance, config.seed.savings);
    balance::ensure_balance(&db, &config.user_id, seed).await?;
    category::seed_categories(&db, &config.user_id, &config.categories).await?;

    // 6. Load the ledger and print a summary
    let mut ledger = Ledger::new(db, config.user_id.clone(), TracingNotifier);
    ledger.load().await;
    log_summary(&ledger);

    Ok(())
}

fn log_summary(ledger: &Ledger<TracingNotifier>) {
    let totals = ledger.balance();
    let entries = ledger.transactions();
    let today = chrono::Local::now().date_naive();

    info!(
        "Balance {:.2}, savings {:.2}, {} transactions",
        totals.balance,
        totals.savings,
        entries.len()
    );

    let stats = report::monthly_stats(entries, today);
    info!(
        "This month: income {:.2}, expenses {:.2}, saved {:.2}",
        stats.income, stats.expenses, stats.savings
    );

    for spend in report::category_breakdown(entries, ledger.categories()) {
        info!("  {:<16} {:>10.2}  {}", spend.name, spend.amount, spend.color);
    }

    for option in report::period_options(entries, Granularity::Month)
        .into_iter()
        .take(3)
    {
        let matched = report::filter_by_period(entries, Granularity::Month, &option.value, &[]);
        info!(
            "{}: spent {:.2}",
            option.label,
            report::total_for_type(matched, TransactionType::Expense)
        );
    }
}
