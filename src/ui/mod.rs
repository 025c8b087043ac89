pub mod buttons;
pub mod canvas;
pub mod colors;
pub mod scaling;
pub mod text;
pub mod widgets;
