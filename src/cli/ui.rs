use chrono::{DateTime, Local, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::{Currency, CurrencyPair};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an amount cell. Missing amounts are displayed as "N/A".
pub fn amount_cell(currency: &Currency) -> Cell {
    currency.amount.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| {
            Cell::new(format!("{}{v:.2}", currency.symbol))
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right)
        },
    )
}

pub fn format_updated(last_updated: Option<DateTime<Utc>>) -> String {
    match last_updated {
        Some(ts) => format!(
            "Last updated {}",
            ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => "Not converted yet".to_string(),
    }
}

/// Renders the pair as a two-row table followed by the update timestamp.
pub fn pair_table(pair: &CurrencyPair) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell(""),
        header_cell("Currency"),
        header_cell("Amount"),
    ]);
    for (label, currency) in [("From", &pair.from), ("To", &pair.to)] {
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(&currency.code),
            amount_cell(currency),
        ]);
    }

    format!(
        "{}\n{}",
        table,
        style_text(&format_updated(pair.last_updated), StyleType::Subtle)
    )
}

/// Creates a spinner shown while a conversion is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
