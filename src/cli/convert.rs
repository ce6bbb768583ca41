use super::ui;
use crate::core::config::AppConfig;
use crate::core::convert::Converter;
use crate::core::feed::RateFeedProvider;
use anyhow::{Result, bail};
use std::io::BufRead;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Field text, not a number: the engine's sanitizer decides what it means.
    pub amount: String,
    pub currency: Option<String>,
    /// Interpret `amount` as the foreign currency and convert to CZK.
    pub from_foreign: bool,
    pub interactive: bool,
}

/// Runs a conversion against the current fixing. With `--interactive` this
/// keeps accepting field edits until the user quits.
pub async fn run(
    provider: &dyn RateFeedProvider,
    config: &AppConfig,
    options: ConvertOptions,
) -> Result<()> {
    let spinner = ui::new_spinner("Fetching the daily fixing...");
    let fetched = provider.fetch_daily().await;
    spinner.finish_and_clear();

    let mut converter = Converter::new();
    converter.select_currency(options.currency.as_deref().unwrap_or(&config.currency));
    converter.load_rates(fetched?);

    if converter.resolved_rate().is_none() {
        bail!(
            "Currency '{}' is not part of today's fixing; run `kurzy rates` for the list",
            converter.selected_code()
        );
    }

    if options.from_foreign {
        converter.edit_foreign(&options.amount);
    } else {
        converter.edit_base(&options.amount);
    }
    println!("{}", render_conversion(&converter));

    if options.interactive {
        let stdin = std::io::stdin();
        interactive_loop(provider, &mut converter, &mut stdin.lock()).await?;
    }
    Ok(())
}

fn render_conversion(converter: &Converter) -> String {
    let code = converter.selected_code();
    let mut out = format!(
        "{} CZK = {} {}",
        converter.base_text(),
        ui::style_text(converter.foreign_text(), ui::StyleType::ResultValue),
        code,
    );
    if let Some(rate) = converter.resolved_rate() {
        out.push('\n');
        out.push_str(&ui::style_text(
            &format!("fixing: {} {} = {:.3} CZK", rate.amount, rate.code, rate.rate),
            ui::StyleType::Subtle,
        ));
    }
    out
}

async fn interactive_loop(
    provider: &dyn RateFeedProvider,
    converter: &mut Converter,
    input: &mut dyn BufRead,
) -> Result<()> {
    println!(
        "{}",
        ui::style_text(
            "Commands: base <text> | foreign <text> | currency <code> | rates | reload | quit",
            ui::StyleType::Subtle,
        )
    );

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let command = line.trim();
        let (head, rest) = command.split_once(' ').unwrap_or((command, ""));

        match head {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "base" => converter.edit_base(rest.trim()),
            "foreign" => converter.edit_foreign(rest.trim()),
            "currency" => {
                converter.select_currency(rest.trim());
                if converter.resolved_rate().is_none() {
                    println!(
                        "{}",
                        ui::style_text(
                            &format!("'{}' is not in the fixing", converter.selected_code()),
                            ui::StyleType::Error,
                        )
                    );
                }
            }
            "rates" => {
                for option in converter.currency_options() {
                    println!("{}  {}", option.code, option.name);
                }
                continue;
            }
            "reload" => match provider.fetch_daily().await {
                Ok(data) => converter.load_rates(data),
                Err(e) => {
                    println!(
                        "{}",
                        ui::style_text(&format!("Reload failed: {e}"), ui::StyleType::Error)
                    );
                    continue;
                }
            },
            other => {
                println!(
                    "{}",
                    ui::style_text(&format!("Unknown command: {other}"), ui::StyleType::Subtle)
                );
                continue;
            }
        }
        println!("{}", render_conversion(converter));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::{DailyRateData, parse_daily_feed};
    use async_trait::async_trait;

    struct StaticProvider(DailyRateData);

    #[async_trait]
    impl RateFeedProvider for StaticProvider {
        async fn fetch_daily(&self) -> Result<DailyRateData> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl RateFeedProvider for FailingProvider {
        async fn fetch_daily(&self) -> Result<DailyRateData> {
            bail!("network is down")
        }
    }

    fn sample_provider() -> StaticProvider {
        StaticProvider(
            parse_daily_feed(
                "13 Oct 2025 #199\nCountry|Currency|Amount|Code|Rate\n\
                 USA|dollar|1|USD|21.039\nEMU|euro|1|EUR|24.320",
            )
            .unwrap(),
        )
    }

    fn options(amount: &str) -> ConvertOptions {
        ConvertOptions {
            amount: amount.to_string(),
            currency: None,
            from_foreign: false,
            interactive: false,
        }
    }

    #[tokio::test]
    async fn test_one_shot_conversion() {
        let result = run(&sample_provider(), &AppConfig::default(), options("100")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_currency_fails() {
        let mut opts = options("100");
        opts.currency = Some("XXX".to_string());

        let result = run(&sample_provider(), &AppConfig::default(), opts).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("XXX"));
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces() {
        let result = run(&FailingProvider, &AppConfig::default(), options("100")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_interactive_session_applies_events() {
        let provider = sample_provider();
        let mut converter = Converter::new();
        converter.load_rates(provider.fetch_daily().await.unwrap());

        let script = b"base 200\ncurrency USD\nnonsense\nreload\nquit\n" as &[u8];
        interactive_loop(&provider, &mut converter, &mut &script[..])
            .await
            .unwrap();

        assert_eq!(converter.selected_code(), "USD");
        assert_eq!(converter.base_text(), "200");
        assert_eq!(converter.foreign_text(), "9.5062");
    }

    #[tokio::test]
    async fn test_interactive_reload_failure_keeps_state() {
        let provider = sample_provider();
        let mut converter = Converter::new();
        converter.load_rates(provider.fetch_daily().await.unwrap());

        let script = b"reload\nbase 200\n" as &[u8];
        interactive_loop(&FailingProvider, &mut converter, &mut &script[..])
            .await
            .unwrap();

        // The failed reload leaves the loaded fixing in place
        assert_eq!(converter.foreign_text(), "8.2237");
    }

    #[test]
    fn test_render_mentions_both_fields_and_rate() {
        let mut converter = Converter::new();
        converter.load_rates(
            parse_daily_feed(
                "13 Oct 2025 #199\nCountry|Currency|Amount|Code|Rate\nEMU|euro|1|EUR|24.320",
            )
            .unwrap(),
        );

        let rendered = console::strip_ansi_codes(&render_conversion(&converter)).to_string();
        assert!(rendered.contains("100 CZK"));
        assert!(rendered.contains("4.1118 EUR"));
        assert!(rendered.contains("1 EUR = 24.320 CZK"));
    }
}
