//! Runs the scripted presale scenario against a validator and reports the outcome of every step.

use client::{
    e2e_helpers::E2e,
    logs::log_divider,
    print_kv,
    transactions::SendTransactionConfig,
    LogColor,
};
use colored::Colorize;
use solana_sdk::signature::Signer;

use crate::cli::initialize_context_from_cli;

pub mod cli;
pub mod load_env;

fn print_header(label: &str) {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, false);
    log_divider();
    println!("{} {}", format!("[{timestamp}]").dimmed(), label.bold());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let ctx = initialize_context_from_cli()?;

    print_header("presale scenario");
    print_kv!("RPC", ctx.url, LogColor::Info);
    print_kv!("Presale program", ctx.ids.presale, LogColor::Info);
    print_kv!("Metadata program", ctx.ids.token_metadata, LogColor::Info);
    print_kv!("Creator", ctx.creator.pubkey(), LogColor::Info);
    print_kv!("Bidder", ctx.bidder.pubkey(), LogColor::Info);

    let e2e = E2e::new(
        &ctx.url,
        ctx.ids,
        SendTransactionConfig {
            confirmation: ctx.confirmation,
            ..Default::default()
        },
    );
    let outcome = e2e
        .run_sale_scenario(&ctx.creator, &ctx.bidder, &ctx.scenario, ctx.policy)
        .await?;

    print_header("step report");
    outcome.report.log();

    print_header("balances");
    print_kv!(
        "Creator",
        format!(
            "{} -> {}",
            outcome.initial_balances.creator, outcome.balances.creator
        ),
        LogColor::Info
    );
    print_kv!(
        "Bidder",
        format!(
            "{} -> {}",
            outcome.initial_balances.bidder, outcome.balances.bidder
        ),
        LogColor::Info
    );

    if let Some((step, error)) = outcome.report.first_failure() {
        anyhow::bail!(
            "{} failed ({} of {} steps failed): {error}",
            step.name(),
            outcome.report.failed().count(),
            outcome.report.records.len()
        );
    }

    Ok(())
}
