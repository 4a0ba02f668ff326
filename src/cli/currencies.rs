use super::ui;
use crate::core::{Catalog, CatalogLoader};
use anyhow::{Context, Result};
use comfy_table::Cell;

impl Catalog {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("#"),
            ui::header_cell("Code"),
            ui::header_cell("Symbol"),
        ]);

        for (index, currency) in self.currencies().iter().enumerate() {
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(&currency.code),
                Cell::new(&currency.symbol),
            ]);
        }

        format!(
            "{}\n\n{}\n{}",
            ui::style_text("Supported currencies", ui::StyleType::Title),
            table,
            ui::style_text(&format!("{} currencies", self.len()), ui::StyleType::Subtle)
        )
    }
}

pub async fn run(loader: &CatalogLoader) -> Result<()> {
    let spinner = ui::new_spinner("Loading currencies...");
    let catalog = loader.load().await;
    spinner.finish_and_clear();

    let catalog = catalog.context("Failed to load supported currencies")?;
    println!("{}", catalog.display_as_table());
    Ok(())
}
