//! Peatio agent entry point
//!
//! Builds one session from `PEATIO_CONFIG` (YAML path) or the `PEATIO_*`
//! environment variables, then logs a market snapshot and, when
//! credentials are configured, the account.

use std::path::Path;

use anyhow::Context;
use tracing::{error, info};

use peatio_agent::adapters::{ExchangeAgent, PeatioConfig, PeatioSession};
use peatio_agent::config::{self, constants};

fn load_peatio_config() -> anyhow::Result<PeatioConfig> {
    match std::env::var("PEATIO_CONFIG") {
        Ok(path) => {
            let app = config::load_config(Path::new(&path))
                .with_context(|| format!("loading {}", path))?;
            Ok(app.peatio)
        }
        Err(_) => PeatioConfig::from_env().context("reading PEATIO_* environment"),
    }
}

async fn run() -> anyhow::Result<()> {
    let peatio = load_peatio_config()?;
    let with_account = peatio.has_credentials();
    let session = PeatioSession::new(peatio)?;

    let ticker = session.ticker().await?;
    info!(
        market = %session.market(),
        currency = %session.currency(),
        rate = %session.rate(),
        bid = %ticker.bid,
        ask = %ticker.ask,
        spread = %ticker.spread(),
        "Ticker"
    );

    let offers = session.offers().await?;
    info!(
        market = %session.market(),
        best_bid = ?offers.best_bid(),
        best_ask = ?offers.best_ask(),
        depth_asks = offers.asks.len(),
        depth_bids = offers.bids.len(),
        "Order book"
    );

    if !with_account {
        info!("No credentials configured, skipping account");
        return Ok(());
    }

    let account = session.account().await?;
    for balance in &account.balances {
        info!(
            currency = %balance.currency,
            amount = %balance.amount,
            locked = %balance.locked,
            "Balance"
        );
    }

    let orders = session.orders().await?;
    info!(open_orders = orders.len(), "Orders");
    for order in &orders {
        info!(
            order_id = order.order_id,
            side = ?order.side,
            price = ?order.price,
            remaining = %order.remaining,
            status = %order.status,
            "Order"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    config::logging::init_logging();
    constants::log_configuration();

    info!(phase = "init", "Peatio agent starting");

    if let Err(e) = run().await {
        error!(error = %format!("{:#}", e), "Peatio agent failed");
        std::process::exit(1);
    }
}
