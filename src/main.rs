use api_client::BinanceGateway;
use audit::{AuditSink, FileAuditSink};
use clap::{Parser, Subcommand};
use clock::TokioSleeper;
use core_types::OrderResult;
use executor::{Executor, LiveExecutor};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use twap::TwapScheduler;

/// The main entry point for the Meridian trading CLI.
#[tokio::main]
async fn main() {
    // Load environment variables from a .env file, if one exists.
    dotenvy::dotenv().ok();

    let _guard = init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = ?e, "command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Place orders and run TWAP campaigns on Binance USDT-M Futures.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Trade against the production API instead of the testnet.
    #[arg(long)]
    live: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a MARKET order.
    Market(MarketArgs),
    /// Place a LIMIT order (GTC).
    Limit(LimitArgs),
    /// Place a STOP (stop-limit) order (GTC).
    Stop(StopArgs),
    /// Split a total quantity into timed MARKET order slices.
    Twap(TwapArgs),
}

#[derive(Parser)]
struct MarketArgs {
    /// Trading pair symbol, e.g. BTCUSDT.
    symbol: String,
    /// BUY or SELL.
    side: String,
    /// Order quantity.
    quantity: String,
}

#[derive(Parser)]
struct LimitArgs {
    /// Trading pair symbol, e.g. BTCUSDT.
    symbol: String,
    /// BUY or SELL.
    side: String,
    /// Order quantity.
    quantity: String,
    /// Limit price.
    price: String,
}

#[derive(Parser)]
struct StopArgs {
    /// Trading pair symbol, e.g. BTCUSDT.
    symbol: String,
    /// BUY or SELL.
    side: String,
    /// Order quantity.
    quantity: String,
    /// Limit price once triggered.
    #[arg(long)]
    price: String,
    /// Stop trigger price.
    #[arg(long)]
    trigger_price: String,
}

#[derive(Parser)]
struct TwapArgs {
    /// Trading pair symbol, e.g. BTCUSDT.
    symbol: String,
    /// BUY or SELL.
    side: String,
    /// Total quantity to execute across all slices.
    quantity: String,
    /// Number of slices (orders) to split the total quantity into.
    #[arg(long, default_value_t = 5)]
    slices: u32,
    /// Seconds to wait between each order.
    #[arg(long, default_value_t = 10)]
    interval: u64,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Shared wiring for every command: configuration, credentials, audit sink,
/// gateway, executor.
struct App {
    executor: Arc<dyn Executor>,
    audit: Arc<dyn AuditSink>,
    quantity_step: rust_decimal::Decimal,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let keys = configuration::load_keys(cli.live)?;

    let audit: Arc<dyn AuditSink> = Arc::new(FileAuditSink::open(&config.audit.path)?);
    let gateway = Arc::new(BinanceGateway::connect(
        cli.live,
        &config,
        &keys,
        audit.clone(),
    )?);
    let app = App {
        executor: Arc::new(LiveExecutor::new(gateway, audit.clone())),
        audit,
        quantity_step: config.exchange.quantity_step,
    };

    match cli.command {
        Commands::Market(args) => handle_market(&app, args).await,
        Commands::Limit(args) => handle_limit(&app, args).await,
        Commands::Stop(args) => handle_stop(&app, args).await,
        Commands::Twap(args) => handle_twap(&app, args).await,
    }
}

async fn handle_market(app: &App, args: MarketArgs) -> anyhow::Result<()> {
    let order = validator::validate_market(
        app.quantity_step,
        &args.symbol,
        &args.side,
        &args.quantity,
    )?;

    let result = app.executor.place_market(&order).await?;

    println!("=== MARKET ORDER REQUEST ===");
    println!("Symbol      : {}", order.symbol);
    println!("Side        : {}", order.side);
    println!("Quantity    : {}", order.quantity);
    print_result(&result);
    Ok(())
}

async fn handle_limit(app: &App, args: LimitArgs) -> anyhow::Result<()> {
    let order = validator::validate_limit(
        app.quantity_step,
        &args.symbol,
        &args.side,
        &args.quantity,
        Some(&args.price),
    )?;

    let result = app.executor.place_limit(&order).await?;

    println!("=== LIMIT ORDER REQUEST ===");
    println!("Symbol      : {}", order.symbol);
    println!("Side        : {}", order.side);
    println!("Quantity    : {}", order.quantity);
    println!("Price       : {}", args.price);
    print_result(&result);
    Ok(())
}

async fn handle_stop(app: &App, args: StopArgs) -> anyhow::Result<()> {
    let order = validator::validate_stop(
        app.quantity_step,
        &args.symbol,
        &args.side,
        &args.quantity,
        Some(&args.price),
        Some(&args.trigger_price),
    )?;

    let result = app.executor.place_stop(&order).await?;

    println!("=== STOP ORDER REQUEST ===");
    println!("Symbol      : {}", order.symbol);
    println!("Side        : {}", order.side);
    println!("Quantity    : {}", order.quantity);
    println!("Price       : {}", args.price);
    println!("Trigger     : {}", args.trigger_price);
    print_result(&result);
    Ok(())
}

async fn handle_twap(app: &App, args: TwapArgs) -> anyhow::Result<()> {
    let spec = validator::validate_campaign(
        app.quantity_step,
        &args.symbol,
        &args.side,
        &args.quantity,
        args.slices,
        std::time::Duration::from_secs(args.interval),
    )?;

    let scheduler = TwapScheduler::new(
        app.executor.clone(),
        Arc::new(TokioSleeper),
        app.audit.clone(),
        app.quantity_step,
    );
    let campaign = scheduler.run(spec).await;

    println!("=== TWAP CAMPAIGN ===");
    println!("Symbol        : {}", campaign.spec().symbol);
    println!("Side          : {}", campaign.spec().side);
    println!("Total qty     : {}", campaign.spec().total_quantity);
    println!("Slices        : {}", campaign.spec().slice_count);
    println!("Interval (s)  : {}", campaign.spec().interval.as_secs());
    println!("=== OUTCOMES PER SLICE ===");
    for slice in campaign.outcomes() {
        match &slice.result {
            Ok(order) => println!(
                "[Slice {}] orderId={}, status={}, executedQty={}, avgPrice={}",
                slice.index + 1,
                order.order_id,
                order.status,
                order.executed_qty,
                order
                    .avg_price
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Err(e) => println!("[Slice {}] FAILED: {e}", slice.index + 1),
        }
    }
    println!(
        "Result        : {}/{} slices filled, executed {}",
        campaign.succeeded(),
        campaign.attempted(),
        campaign.executed_quantity()
    );
    Ok(())
}

fn print_result(result: &OrderResult) {
    println!("=== RESPONSE ===");
    println!("orderId     : {}", result.order_id);
    println!("status      : {}", result.status);
    println!("executedQty : {}", result.executed_qty);
    println!(
        "avgPrice    : {}",
        result
            .avg_price
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Result      : SUCCESS");
}

/// Configures console plus daily-rotated file logging. The returned guard
/// must stay alive for the duration of the process so buffered log lines are
/// flushed on exit.
fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "meridian.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    guard
}
