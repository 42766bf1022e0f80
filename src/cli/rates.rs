use super::ui;
use crate::core::PriceEntry;
use crate::scheduler::{CycleReport, FeedStatus, RefreshScheduler};
use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;

/// Runs one refresh cycle and prints the resulting table.
pub async fn show_rates(scheduler: &RefreshScheduler) -> Result<()> {
    let report = refresh_once(scheduler).await;
    let entries = scheduler.store().snapshot().await;
    if entries.is_empty() {
        eprintln!("{}", display_feed_status(&report));
        bail!("No rates available: every feed failed");
    }

    println!("{}", display_rates(&entries));
    println!("\n{}", display_feed_status(&report));
    Ok(())
}

/// Runs one refresh cycle and converts `amount` from one currency to another.
pub async fn convert(
    scheduler: &RefreshScheduler,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<()> {
    let report = refresh_once(scheduler).await;
    if !report.all_succeeded() {
        eprintln!("{}", display_feed_status(&report));
    }

    let value = scheduler
        .store()
        .convert(from, to, amount)
        .await
        .ok_or_else(|| anyhow!("No rate available to convert {from} to {to}"))?;

    println!(
        "{} {from} = {} {to}",
        ui::format_rate(amount),
        ui::style_text(&ui::format_rate(value), ui::StyleType::Value)
    );
    Ok(())
}

async fn refresh_once(scheduler: &RefreshScheduler) -> CycleReport {
    let spinner = ui::new_spinner("Fetching rates...");
    let report = scheduler.run_cycle().await;
    spinner.finish_and_clear();
    report
}

pub fn display_rates(entries: &[PriceEntry]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Per 1 USD"),
        ui::header_cell("Value in USD"),
        ui::header_cell("Updated"),
    ]);

    for entry in entries {
        let usd_value = if entry.price != 0.0 {
            ui::rate_cell(1.0 / entry.price)
        } else {
            ui::na_cell()
        };
        table.add_row(vec![
            Cell::new(&entry.code),
            ui::rate_cell(entry.price),
            usd_value,
            Cell::new(entry.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Exchange rates", ui::StyleType::Title),
        table
    )
}

pub fn display_feed_status(report: &CycleReport) -> String {
    report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.status {
            FeedStatus::Updated { saved } => ui::style_text(
                &format!("{}: updated {saved} rate(s)", outcome.feed),
                ui::StyleType::Subtle,
            ),
            FeedStatus::Failed { error } => ui::style_text(
                &format!("{}: {error}", outcome.feed),
                ui::StyleType::Error,
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FeedOutcome;
    use chrono::{TimeZone, Utc};

    fn entry(code: &str, price: f64) -> PriceEntry {
        PriceEntry {
            code: code.to_string(),
            price,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_display_rates() {
        console::set_colors_enabled(false);
        let output = display_rates(&[entry("BRL", 5.0), entry("ETH", 0.0005), entry("ZZZ", 0.0)]);

        assert!(output.contains("Exchange rates"));
        assert!(output.contains("BRL"));
        assert!(output.contains("5.0000"));
        assert!(output.contains("0.20000000"));
        assert!(output.contains("0.00050000"));
        assert!(output.contains("2000.0000"));
        assert!(output.contains("N/A"));
        assert!(output.contains("2024-01-02 03:04:05 UTC"));
    }

    #[test]
    fn test_display_feed_status() {
        console::set_colors_enabled(false);
        let report = CycleReport {
            outcomes: vec![
                FeedOutcome {
                    feed: "openexchangerates".to_string(),
                    status: FeedStatus::Updated { saved: 4 },
                },
                FeedOutcome {
                    feed: "coinmarketcap".to_string(),
                    status: FeedStatus::Failed {
                        error: "data error: empty ticker array".to_string(),
                    },
                },
            ],
        };

        assert_eq!(
            display_feed_status(&report),
            "openexchangerates: updated 4 rate(s)\ncoinmarketcap: data error: empty ticker array"
        );
    }
}
