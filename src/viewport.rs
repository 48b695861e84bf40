//! Projection between the logical field and the terminal grid.
//!
//! Layout, top to bottom: HUD on row 0, top border on row 1, the play area,
//! bottom border on row `rows - 2`, controls hint on the last row.  The play
//! area sits inside the side borders.

use crate::entities::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub field_width: f32,
    pub field_height: f32,
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(field_width: f32, field_height: f32, cols: u16, rows: u16) -> Self {
        Self {
            field_width,
            field_height,
            cols,
            rows,
        }
    }

    /// First and one-past-last play-area column.
    pub fn play_cols(&self) -> (u16, u16) {
        (1, self.cols.saturating_sub(1).max(2))
    }

    /// First and one-past-last play-area row.
    pub fn play_rows(&self) -> (u16, u16) {
        (2, self.rows.saturating_sub(2).max(3))
    }

    fn play_size(&self) -> (f32, f32) {
        let (c0, c1) = self.play_cols();
        let (r0, r1) = self.play_rows();
        ((c1 - c0) as f32, (r1 - r0) as f32)
    }

    /// Cell containing `pos`, or `None` if it lies outside the field.
    pub fn to_cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        if pos.x < 0.0 || pos.y < 0.0 || pos.x >= self.field_width || pos.y >= self.field_height {
            return None;
        }
        let (w, h) = self.play_size();
        let col = (pos.x * w / self.field_width).floor() as u16 + self.play_cols().0;
        let row = (pos.y * h / self.field_height).floor() as u16 + self.play_rows().0;
        Some((col, row))
    }

    /// Centre of a cell in logical coordinates, clamped into the field.
    pub fn to_logical(&self, col: u16, row: u16) -> Vec2 {
        let (w, h) = self.play_size();
        let (c0, c1) = self.play_cols();
        let (r0, r1) = self.play_rows();
        let col = col.clamp(c0, c1 - 1) - c0;
        let row = row.clamp(r0, r1 - 1) - r0;
        Vec2::new(
            (col as f32 + 0.5) * self.field_width / w,
            (row as f32 + 0.5) * self.field_height / h,
        )
    }

    /// Logical pixels per terminal row.
    pub fn px_per_row(&self) -> f32 {
        self.field_height / self.play_size().1
    }
}
