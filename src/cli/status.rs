use crate::catalog::CatalogStatus;
use crate::cli::ui::{self, StyleType};

/// Renders the status counters for the terminal.
pub fn status_lines(status: &CatalogStatus) -> String {
    let last = status
        .last_refreshed_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());

    format!(
        "{} {}\n{} {}",
        ui::style_text("Total countries:", StyleType::Label),
        ui::style_text(&status.total_countries.to_string(), StyleType::Value),
        ui::style_text("Last refresh:", StyleType::Label),
        ui::style_text(&last, StyleType::Subtle),
    )
}
