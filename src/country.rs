use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single catalog row.
///
/// `population` is kept as the exact decimal string reported by the merge
/// step so very large counts survive storage without precision loss; sorting
/// casts it back to an unsigned integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: String,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Country {
    /// Store identity. Rows are keyed case-insensitively, so `"France"` and
    /// `"france"` address the same record.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Numeric value of the decimal-string population. A malformed stored
    /// value sorts as zero rather than poisoning the whole query.
    pub fn population_value(&self) -> u128 {
        self.population.parse().unwrap_or(0)
    }
}
