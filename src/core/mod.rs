pub mod cursor;
pub mod fonts;

pub use cursor::{CursorManager, CursorType};
pub use fonts::{FontHandle, FontManager, FontPaths};
