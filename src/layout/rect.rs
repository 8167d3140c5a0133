//! Rect: The terminal region a painter owns, in cells.

/// Region of the terminal, by top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left column.
    pub x: u16,
    /// Top row.
    pub y: u16,
    /// Columns covered.
    pub width: u16,
    /// Rows covered.
    pub height: u16,
}

impl Rect {
    /// Region at `(x, y)` spanning `width` × `height` cells.
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Region covering a whole `width` × `height` terminal.
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// No cell to paint.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether a mouse position falls inside the region.
    pub const fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && row >= self.y
            && column - self.x < self.width
            && row - self.y < self.height
    }

    /// Cut into the first `rows` rows and whatever remains below them.
    pub fn split_vertical(&self, rows: u16) -> (Self, Self) {
        let rows = rows.min(self.height);
        (
            Self::new(self.x, self.y, self.width, rows),
            Self::new(self.x, self.y + rows, self.width, self.height - rows),
        )
    }

    /// One-row region at offset `row`, clamped to the last row.
    pub fn row(&self, row: u16) -> Self {
        let row = row.min(self.height.saturating_sub(1));
        Self::new(self.x, self.y + row, self.width, u16::from(self.height > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let bar = Rect::new(2, 3, 4, 1);
        assert!(bar.contains(2, 3));
        assert!(bar.contains(5, 3));
        assert!(!bar.contains(6, 3));
        assert!(!bar.contains(2, 4));
        assert!(!bar.contains(1, 3));
    }

    #[test]
    fn test_rect_contains_at_terminal_edge() {
        let bar = Rect::new(u16::MAX - 1, u16::MAX, 2, 1);
        assert!(bar.contains(u16::MAX, u16::MAX));
        assert!(!Rect::new(0, 0, 0, 0).contains(0, 0));
    }

    #[test]
    fn test_rect_split_vertical() {
        let (body, status) = Rect::from_size(80, 24).split_vertical(23);
        assert_eq!(body, Rect::new(0, 0, 80, 23));
        assert_eq!(status, Rect::new(0, 23, 80, 1));

        let (all, none) = Rect::from_size(10, 2).split_vertical(5);
        assert_eq!(all.height, 2);
        assert!(none.is_empty());
    }

    #[test]
    fn test_rect_row() {
        let pane = Rect::new(0, 10, 40, 5);
        assert_eq!(pane.row(2), Rect::new(0, 12, 40, 1));
        assert_eq!(pane.row(9), Rect::new(0, 14, 40, 1));
    }
}
