//! Download of the full customer tree as a JSON document.

use adalloc_core::{AdallocResult, Customer};
use chrono::NaiveDate;

/// Pretty-printed JSON of every customer with nested campaigns and channels.
pub fn export_customers(customers: &[Customer]) -> AdallocResult<String> {
    Ok(serde_json::to_string_pretty(customers)?)
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("adalloc-data-{}.json", today.format("%Y-%m-%d"))
}
