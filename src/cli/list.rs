use comfy_table::Cell;

use crate::cli::ui;
use crate::country::Country;
use crate::render::format_gdp;

/// Renders catalog rows as a terminal table.
pub fn countries_table(countries: &[Country]) -> String {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Capital"),
        ui::header_cell("Region"),
        ui::header_cell("Population"),
        ui::header_cell("Currency"),
        ui::header_cell("Rate"),
        ui::header_cell("Est. GDP"),
    ]);

    for country in countries {
        let capital = ui::format_optional_cell(country.capital.clone(), |c| c);
        let region = ui::format_optional_cell(country.region.clone(), |r| r);
        let currency = ui::format_optional_cell(country.currency_code.clone(), |c| c);
        let rate = ui::format_optional_cell(country.exchange_rate, |r| format!("{r:.4}"));
        let gdp = ui::format_optional_cell(country.estimated_gdp, format_gdp);

        table.add_row(vec![
            Cell::new(&country.name),
            capital,
            region,
            Cell::new(&country.population),
            currency,
            rate,
            gdp,
        ]);
    }

    table.to_string()
}

/// Renders one row as a field/value table for `show`.
pub fn country_details(country: &Country) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);

    let optional = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_string());

    table.add_row(vec![Cell::new("Name"), Cell::new(&country.name)]);
    table.add_row(vec![
        Cell::new("Capital"),
        Cell::new(optional(country.capital.clone())),
    ]);
    table.add_row(vec![
        Cell::new("Region"),
        Cell::new(optional(country.region.clone())),
    ]);
    table.add_row(vec![
        Cell::new("Population"),
        Cell::new(&country.population),
    ]);
    table.add_row(vec![
        Cell::new("Currency"),
        Cell::new(optional(country.currency_code.clone())),
    ]);
    table.add_row(vec![
        Cell::new("Exchange rate"),
        Cell::new(optional(country.exchange_rate.map(|r| format!("{r:.4}")))),
    ]);
    table.add_row(vec![
        Cell::new("Estimated GDP"),
        Cell::new(optional(country.estimated_gdp.map(format_gdp))),
    ]);
    table.add_row(vec![
        Cell::new("Flag"),
        Cell::new(optional(country.flag_url.clone())),
    ]);
    table.add_row(vec![
        Cell::new("Last refreshed"),
        Cell::new(optional(
            country.last_refreshed_at.map(|t| t.to_rfc3339()),
        )),
    ]);

    table.to_string()
}
