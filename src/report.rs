//! Rendering of the ranked market overview.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{config::ReportFormat, models::RankedToken, utils::decimal_to_f64};

/// One line of the market overview.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub rank: usize,
    pub symbol: String,
    pub token_address: String,
    pub token_id: Option<String>,
    pub current_price: Option<f64>,
    pub current_price_usd: Option<f64>,
    pub token_tvl: Option<f64>,
    pub price_change: f64,
    pub has_history: bool,
    pub market_cap: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub tokens: Vec<ReportRow>,
}

impl Report {
    pub fn new(ranked: &[RankedToken]) -> Self {
        let tokens = ranked
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let identity = t.token.identity();
                ReportRow {
                    rank: i + 1,
                    symbol: t.token.symbol().to_string(),
                    token_address: identity.address.clone(),
                    token_id: identity.token_id.clone(),
                    current_price: t.token.current_price.as_ref().and_then(decimal_to_f64),
                    current_price_usd: t.token.current_price_usd.as_ref().and_then(decimal_to_f64),
                    token_tvl: decimal_to_f64(&t.token.token_tvl),
                    price_change: t.price_change,
                    has_history: t.has_history,
                    market_cap: decimal_to_f64(&t.token.market_cap),
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            tokens,
        }
    }

    pub fn render(&self, format: ReportFormat) -> anyhow::Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::from("Tokens With Marketcap:\n");
        for row in &self.tokens {
            out.push_str(&format!(
                "{}. Symbol: {}, Current Price: {}, Current Price USD: {}, TokenTVL: {}, priceChange: {}, Marketcap: {}\n",
                row.rank,
                row.symbol,
                fmt_value(row.current_price),
                fmt_value(row.current_price_usd),
                fmt_value(row.token_tvl),
                row.price_change,
                fmt_value(row.market_cap),
            ));
        }
        out
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}
