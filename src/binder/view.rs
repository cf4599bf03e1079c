use crate::types::{ColumnType, IconPayload, Thumbnail};

/// The list view being filled. Called only on the interactive thread, with current row positions.
pub trait ViewSink {
    fn apply_icon(&mut self, row: usize, icon: &IconPayload);
    fn apply_thumbnail(&mut self, row: usize, thumbnail: &Thumbnail);
    fn apply_column_text(&mut self, row: usize, column: ColumnType, text: &str);
    fn apply_info_tip(&mut self, row: usize, text: &str);
}
