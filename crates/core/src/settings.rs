//! User-facing settings and currency display.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "TRY")]
    Try,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Try];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Try => "TRY",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Try => "₺",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Eur => "Euro",
            Currency::Gbp => "British Pound",
            Currency::Try => "Turkish Lira",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "default_campaign_budget")]
    pub default_campaign_budget: f64,
    #[serde(default = "default_channel_budget")]
    pub default_channel_budget: f64,
    #[serde(default = "default_show_welcome")]
    pub show_welcome: bool,
}

fn default_campaign_budget() -> f64 {
    10_000.0
}
fn default_channel_budget() -> f64 {
    5_000.0
}
fn default_show_welcome() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            default_campaign_budget: default_campaign_budget(),
            default_channel_budget: default_channel_budget(),
            show_welcome: default_show_welcome(),
        }
    }
}

/// Render `amount` as whole currency units with thousands separators,
/// e.g. `$67,500`.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("{}-{}", currency.symbol(), grouped)
    } else {
        format!("{}{}", currency.symbol(), grouped)
    }
}
