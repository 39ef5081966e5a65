//! Filter, sort and paginate reads over a catalog snapshot.
//!
//! Sort semantics follow the original storage engine: populations compare as
//! unsigned integers cast from their decimal-string form, and the nullable
//! GDP field uses MySQL's default null placement (absent values first when
//! ascending, last when descending).

use std::cmp::Ordering;
use std::str::FromStr;

use crate::country::Country;
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    NameAsc,
    GdpDesc,
    GdpAsc,
    PopulationDesc,
    PopulationAsc,
}

impl SortKey {
    pub const ALLOWED: &'static str = "gdp_desc|gdp_asc|population_desc|population_asc|name_asc";

    /// Parses a sort key, rejecting anything outside the enumerated set
    /// before any query executes.
    pub fn parse(value: &str) -> Result<Self, CatalogError> {
        match value {
            "name_asc" => Ok(SortKey::NameAsc),
            "gdp_desc" => Ok(SortKey::GdpDesc),
            "gdp_asc" => Ok(SortKey::GdpAsc),
            "population_desc" => Ok(SortKey::PopulationDesc),
            "population_asc" => Ok(SortKey::PopulationAsc),
            _ => Err(CatalogError::Validation(format!(
                "sort must be one of {}",
                Self::ALLOWED
            ))),
        }
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortKey::parse(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountryQuery {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: SortKey,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Absent GDP sorts below every present value, mirroring NULL in the
/// original engine's ascending order.
fn gdp_ascending(a: &Country, b: &Country) -> Ordering {
    match (a.estimated_gdp, b.estimated_gdp) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

/// Applies filters, sort and pagination to a snapshot of catalog rows.
pub fn run_query(mut rows: Vec<Country>, query: &CountryQuery) -> Vec<Country> {
    if let Some(region) = query.region.as_deref() {
        rows.retain(|c| c.region.as_deref() == Some(region));
    }
    if let Some(currency) = query.currency.as_deref() {
        rows.retain(|c| c.currency_code.as_deref() == Some(currency));
    }

    match query.sort {
        SortKey::NameAsc => rows.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::GdpAsc => rows.sort_by(gdp_ascending),
        SortKey::GdpDesc => rows.sort_by(|a, b| gdp_ascending(b, a)),
        SortKey::PopulationAsc => rows.sort_by_key(Country::population_value),
        SortKey::PopulationDesc => {
            rows.sort_by(|a, b| b.population_value().cmp(&a.population_value()))
        }
    }

    let skipped = rows.into_iter().skip(query.offset.unwrap_or(0));
    match query.limit {
        Some(limit) => skipped.take(limit).collect(),
        None => skipped.collect(),
    }
}
