//! In-memory list view used by the CLI, plus table / JSON rendering.

use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::binder::ViewSink;
use crate::types::{ColumnType, IconPayload, Thumbnail};

use super::arg_parser::ViewMode;

/// One rendered row.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RowView {
    pub name: String,
    pub is_dir: bool,
    pub icon: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<u8>,
    /// "WxH" once a thumbnail landed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub columns: BTreeMap<ColumnType, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_tip: Option<String>,
}

#[derive(Debug, Default)]
pub struct TableView {
    rows: Vec<RowView>,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over with one row per `(name, is_dir)`.
    pub fn reset<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (String, bool)>,
    {
        self.rows = rows
            .into_iter()
            .map(|(name, is_dir)| RowView {
                name,
                is_dir,
                ..Default::default()
            })
            .collect();
    }

    pub fn rows(&self) -> &[RowView] {
        &self.rows
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }

    /// Plain text table. Missing column values render blank.
    pub fn render(&self, mode: ViewMode, columns: &[ColumnType]) -> String {
        let mut out = String::new();
        match mode {
            ViewMode::Details => {
                let header: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{:<24}", c.header()))
                    .collect();
                out.push_str(&format!("{:>6}  {}\n", "Icon", header.join(" ").bold()));
                for row in &self.rows {
                    let cells: Vec<String> = columns
                        .iter()
                        .map(|c| {
                            let text = match (c, row.columns.get(c)) {
                                (_, Some(t)) => t.clone(),
                                (ColumnType::Name, None) => row.name.clone(),
                                _ => String::new(),
                            };
                            let cell = format!("{:<24}", text);
                            if *c == ColumnType::Name && row.is_dir {
                                cell.blue().bold().to_string()
                            } else {
                                cell
                            }
                        })
                        .collect();
                    out.push_str(&format!("{:>6}  {}\n", icon_label(row), cells.join(" ")));
                }
            }
            ViewMode::Icons | ViewMode::Thumbnails => {
                for row in &self.rows {
                    let name = if row.is_dir {
                        row.name.blue().bold().to_string()
                    } else {
                        row.name.clone()
                    };
                    let thumb = row.thumbnail.as_deref().unwrap_or("-");
                    out.push_str(&format!("{:>6}  {:<10} {}\n", icon_label(row), thumb, name));
                }
            }
        }
        for row in self.rows.iter().filter(|r| r.info_tip.is_some()) {
            if let Some(tip) = &row.info_tip {
                out.push_str(&format!("\n{}\n{}\n", row.name.cyan(), tip));
            }
        }
        out
    }
}

fn icon_label(row: &RowView) -> String {
    match row.overlay {
        Some(o) => format!("{}+{}", row.icon, o),
        None => row.icon.to_string(),
    }
}

impl ViewSink for TableView {
    fn apply_icon(&mut self, row: usize, icon: &IconPayload) {
        if let Some(r) = self.rows.get_mut(row) {
            r.icon = icon.index;
            r.overlay = icon.overlay;
        }
    }

    fn apply_thumbnail(&mut self, row: usize, thumbnail: &Thumbnail) {
        if let Some(r) = self.rows.get_mut(row) {
            r.thumbnail = Some(format!("{}x{}", thumbnail.width, thumbnail.height));
        }
    }

    fn apply_column_text(&mut self, row: usize, column: ColumnType, text: &str) {
        if let Some(r) = self.rows.get_mut(row) {
            r.columns.insert(column, text.to_string());
        }
    }

    fn apply_info_tip(&mut self, row: usize, text: &str) {
        if let Some(r) = self.rows.get_mut(row) {
            r.info_tip = Some(text.to_string());
        }
    }
}
