//! `alertgate taxonomy` command handler

use std::io::Write;

use serde::Serialize;

use alertgate_core::taxonomy::Category;

use crate::cli::{TaxonomyAction, TaxonomyArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `taxonomy` command.
///
/// Purely informational: prints the wire taxonomy the filter configuration
/// refers to, so accepted category and element names can be checked without
/// digging through sources.
pub fn execute(args: TaxonomyArgs, writer: &OutputWriter) -> Result<(), CliError> {
    match args.action {
        TaxonomyAction::Categories => writer.render(&build_categories_report()),
        TaxonomyAction::Elements { category } => writer.render(&build_elements_report(&category)?),
    }
}

fn build_categories_report() -> CategoriesReport {
    CategoriesReport {
        categories: Category::ALL
            .iter()
            .map(|category| CategoryEntry {
                name: category.name().to_owned(),
                id: category.id(),
                elements: category.elements().len(),
            })
            .collect(),
    }
}

fn build_elements_report(name: &str) -> Result<ElementsReport, CliError> {
    let category = Category::from_name(name).ok_or_else(|| {
        CliError::Command(format!(
            "unknown category: {} (expected: neb, bbdo, storage, correlation, dumper, bam, extcmd)",
            name
        ))
    })?;

    Ok(ElementsReport {
        category: category.name().to_owned(),
        id: category.id(),
        elements: category
            .elements()
            .iter()
            .map(|(element_name, element_id)| ElementEntry {
                name: (*element_name).to_owned(),
                id: *element_id,
            })
            .collect(),
    })
}

/// All known categories with their wire ids.
#[derive(Serialize)]
pub struct CategoriesReport {
    pub categories: Vec<CategoryEntry>,
}

#[derive(Serialize)]
pub struct CategoryEntry {
    pub name: String,
    pub id: u16,
    pub elements: usize,
}

impl Render for CategoriesReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{:<14} {:<6} Named elements", "Category", "Id")?;
        writeln!(w, "{}", "-".repeat(40))?;
        for entry in &self.categories {
            writeln!(w, "{:<14} {:<6} {}", entry.name, entry.id, entry.elements)?;
        }
        Ok(())
    }
}

/// Named elements of one category.
#[derive(Debug, Serialize)]
pub struct ElementsReport {
    pub category: String,
    pub id: u16,
    pub elements: Vec<ElementEntry>,
}

#[derive(Debug, Serialize)]
pub struct ElementEntry {
    pub name: String,
    pub id: u16,
}

impl Render for ElementsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Category {} (id {})", self.category.bold(), self.id)?;
        writeln!(w)?;

        if self.elements.is_empty() {
            writeln!(w, "{}", "No named elements.".dimmed())?;
            return Ok(());
        }

        writeln!(w, "{:<22} Id", "Element")?;
        writeln!(w, "{}", "-".repeat(30))?;
        for element in &self.elements {
            writeln!(w, "{:<22} {}", element.name, element.id)?;
        }
        Ok(())
    }
}
