//! Show command implementation
//!
//! Lists the holdings stored for one depot.

use crate::app::models::{ClientTag, HoldingRecord};
use crate::app::services::holding_store::HoldingStore;
use crate::cli::args::{OutputFormat, ShowArgs};
use crate::cli::commands::shared::{
    CommandStats, csv_escape, load_configuration, open_store, setup_logging,
};
use crate::{Error, Result};
use colored::*;
use rust_decimal::Decimal;
use std::time::Instant;
use tracing::info;

/// Run the show command
pub async fn run_show(args: ShowArgs) -> Result<CommandStats> {
    let start_time = Instant::now();

    args.validate()?;
    let config = load_configuration(args.config_file.as_deref(), args.database.as_ref(), None)?;
    setup_logging(&args.get_log_level(&config.logging.level), false)?;

    if !config.storage.database_path.is_file() {
        return Err(Error::configuration(format!(
            "Database {} does not exist, run `depot-ingest ingest` first",
            config.storage.database_path.display()
        )));
    }

    let store = open_store(&config)?;
    let client = store.find_client(&args.depot)?;
    let holdings = store.find_holdings(&args.depot)?;

    let Some(client) = client else {
        return Err(Error::data_validation(format!(
            "Depot '{}' has not been ingested",
            args.depot
        )));
    };

    let output = match args.output_format {
        OutputFormat::Human => human_holdings_report(&client, &holdings),
        OutputFormat::Json => json_holdings_report(&client, &holdings)?,
        OutputFormat::Csv => csv_holdings_report(&holdings),
    };
    print!("{}", output);

    let stats = CommandStats {
        records: holdings.len(),
        processing_time: start_time.elapsed(),
        ..Default::default()
    };
    info!("Listed {} holdings of depot '{}'", stats.records, args.depot);

    Ok(stats)
}

/// Sum of the position values
pub fn total_value(holdings: &[HoldingRecord]) -> Decimal {
    holdings.iter().map(|holding| holding.total_value).sum()
}

fn human_holdings_report(client: &ClientTag, holdings: &[HoldingRecord]) -> String {
    let mut output = format!(
        "{}\n  Depot: {}\n  First ingested: {}\n  Last ingested: {}\n\n",
        client.name.bright_green().bold(),
        client.depot_id.bright_white().bold(),
        client.first_seen.format("%Y-%m-%d %H:%M:%S UTC"),
        client.last_seen.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    if holdings.is_empty() {
        output.push_str("  No holdings stored for this depot.\n");
        return output;
    }

    output.push_str(&format!(
        "  {:<14} {:<32} {:>12} {:>12} {:>14}  {}\n",
        "ISIN", "Asset", "Quantity", "Price", "Value", "Date"
    ));

    for holding in holdings {
        let name = if holding.asset_name.chars().count() > 32 {
            let truncated: String = holding.asset_name.chars().take(29).collect();
            truncated + "..."
        } else {
            holding.asset_name.clone()
        };

        output.push_str(&format!(
            "  {:<14} {:<32} {:>12} {:>12} {:>14}  {}\n",
            holding.isin, name, holding.quantity, holding.unit_price, holding.total_value, holding.date
        ));
    }

    output.push_str(&format!(
        "\n  {} positions, total value {}\n",
        holdings.len(),
        total_value(holdings).to_string().bright_white().bold()
    ));

    output
}

fn json_holdings_report(client: &ClientTag, holdings: &[HoldingRecord]) -> Result<String> {
    use serde_json::json;

    let report = json!({
        "client": client,
        "total_value": total_value(holdings),
        "holdings": holdings,
    });

    serde_json::to_string_pretty(&report)
        .map(|json| json + "\n")
        .map_err(|e| Error::data_validation(format!("Failed to serialize holdings: {}", e)))
}

fn csv_holdings_report(holdings: &[HoldingRecord]) -> String {
    let mut csv = String::from(
        "depot_id,instrument_key,asset_name,isin,ticker,quantity,unit_price,total_value,date\n",
    );

    for holding in holdings {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            csv_escape(&holding.depot_id),
            csv_escape(&holding.instrument_key),
            csv_escape(&holding.asset_name),
            holding.isin,
            holding.ticker.as_deref().map(csv_escape).unwrap_or_default(),
            holding.quantity,
            holding.unit_price,
            holding.total_value,
            csv_escape(&holding.date)
        ));
    }

    csv
}
