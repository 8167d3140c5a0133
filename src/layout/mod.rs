//! Layout module: Screen regions for painting and hit testing.

mod rect;

pub use rect::Rect;
