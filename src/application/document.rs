//! Tabular projection of the ledger, shared by the terminal table and export

use crate::domain::SortedView;

/// Column headers of the grocery list. `Used` and `Bought` stay blank so the
/// printed sheet can be annotated by hand.
pub const COLUMNS: [&str; 5] = ["Item", "Brand", "Available", "Used", "Bought"];

/// Renderer-neutral table: a title, a header row and string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDocument {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableDocument {
    /// Build the grocery list table from the display-ordered entries.
    pub fn grocery_list(title: impl Into<String>, view: &SortedView<'_>) -> Self {
        let rows = view
            .iter()
            .map(|e| {
                vec![
                    e.item.clone(),
                    e.brand.clone(),
                    e.available.to_string(),
                    String::new(),
                    String::new(),
                ]
            })
            .collect();

        Self {
            title: title.into(),
            headers: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Display width (in chars) of each column, header included.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}
