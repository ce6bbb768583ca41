use super::ui;
use crate::core::feed::{DailyRateData, RateFeedProvider};
use anyhow::Result;
use comfy_table::Cell;

/// Fetches the daily fixing and prints it as a table.
pub async fn run(provider: &dyn RateFeedProvider) -> Result<()> {
    let spinner = ui::new_spinner("Fetching the daily fixing...");
    let result = provider.fetch_daily().await;
    spinner.finish_and_clear();

    let data = result?;
    println!("{}", render_rates_table(&data));
    Ok(())
}

fn render_rates_table(data: &DailyRateData) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Country"),
        ui::header_cell("Currency"),
        ui::header_cell("Amount"),
        ui::header_cell("Code"),
        ui::header_cell("Rate (CZK)"),
    ]);

    for rate in &data.rates {
        table.add_row(vec![
            Cell::new(&rate.country),
            Cell::new(&rate.currency),
            ui::numeric_cell(&rate.amount.to_string()),
            Cell::new(&rate.code),
            ui::numeric_cell(&format!("{:.3}", rate.rate)),
        ]);
    }

    let title = ui::style_text(
        &format!("CNB exchange rate fixing for {}", data.date),
        ui::StyleType::Title,
    );
    format!("{title}\n{table}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::parse_daily_feed;

    #[test]
    fn test_table_contains_all_rows() {
        let data = parse_daily_feed(
            "13 Oct 2025 #199\nCountry|Currency|Amount|Code|Rate\n\
             Australia|dollar|1|AUD|13.707\nJapan|yen|100|JPY|14.301",
        )
        .unwrap();

        let rendered = render_rates_table(&data);
        assert!(rendered.contains("2025-10-13"));
        assert!(rendered.contains("Australia"));
        assert!(rendered.contains("AUD"));
        assert!(rendered.contains("13.707"));
        assert!(rendered.contains("JPY"));
        assert!(rendered.contains("100"));
    }
}
