//! Joins the country directory with the exchange-rate table and derives the
//! GDP estimate. Pure transformation, no I/O.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;

use crate::country::Country;
use crate::directory_provider::SourceCountry;

pub const MULTIPLIER_MIN: u32 = 1000;
pub const MULTIPLIER_MAX: u32 = 2000;

/// One integer multiplier draw per country per refresh run. Injectable so
/// callers that need a reproducible estimate can pin the draw.
pub trait MultiplierSource: Send + Sync {
    /// Returns a value in `[MULTIPLIER_MIN, MULTIPLIER_MAX]`.
    fn draw(&self) -> u32;
}

/// Production source: uniform draw. The derived metric is intentionally not
/// reproducible across refresh runs on identical input.
pub struct UniformMultiplier;

impl MultiplierSource for UniformMultiplier {
    fn draw(&self) -> u32 {
        rand::thread_rng().gen_range(MULTIPLIER_MIN..=MULTIPLIER_MAX)
    }
}

/// Pins every draw to one value.
pub struct FixedMultiplier(pub u32);

impl MultiplierSource for FixedMultiplier {
    fn draw(&self) -> u32 {
        self.0
    }
}

/// Merges the two upstream datasets into catalog rows, all stamped with the
/// same `refreshed_at`.
pub fn merge_datasets(
    countries: Vec<SourceCountry>,
    rates: &HashMap<String, f64>,
    multipliers: &dyn MultiplierSource,
    refreshed_at: DateTime<Utc>,
) -> Vec<Country> {
    countries
        .into_iter()
        .map(|country| merge_one(country, rates, multipliers, refreshed_at))
        .collect()
}

fn merge_one(
    source: SourceCountry,
    rates: &HashMap<String, f64>,
    multipliers: &dyn MultiplierSource,
    refreshed_at: DateTime<Utc>,
) -> Country {
    let population = source.population.unwrap_or(0);
    let currency_code = source.primary_currency();

    // Three-way split: no currency means the estimate is zero by definition,
    // an unknown code means it is unknown, a listed rate yields the derived
    // value (absent again if the rate is non-positive).
    let (exchange_rate, estimated_gdp) = match currency_code.as_deref() {
        None => (None, Some(0.0)),
        Some(code) => match rates.get(code) {
            None => (None, None),
            Some(&rate) => {
                let estimate = if rate > 0.0 {
                    let multiplier = multipliers.draw();
                    Some(population as f64 * f64::from(multiplier) / rate)
                } else {
                    None
                };
                (Some(rate), estimate)
            }
        },
    };

    Country {
        name: source.name,
        capital: source.capital,
        region: source.region,
        population: population.to_string(),
        currency_code,
        exchange_rate,
        estimated_gdp,
        flag_url: source.flag,
        last_refreshed_at: Some(refreshed_at),
        created_at: refreshed_at,
        updated_at: refreshed_at,
    }
}
