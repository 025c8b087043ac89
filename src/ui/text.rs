/// Text helpers working in logical (reference) units
use eframe::egui;

use super::canvas::Canvas;
use super::scaling::FrameContext;
use crate::core::fonts::FontHandle;

/// Draws text at a position already expressed in surface units, snapped to whole pixels
pub fn draw_text_logical(
    canvas: &mut dyn Canvas,
    font: Option<&FontHandle>,
    text: &str,
    x: f32,
    y: f32,
    font_size: f32,
    color: egui::Color32,
) {
    canvas.draw_text(
        text,
        egui::pos2(x.round(), y.round()),
        font,
        font_size.round(),
        color,
    );
}

/// Centers `text` horizontally in the current viewport.
///
/// `logical_y` and `font_size` are reference units and get scaled,
/// the horizontal center comes from the live logical viewport width.
/// Returns the top-left corner the text was drawn at.
pub fn draw_text_logical_centered(
    frame: &FrameContext,
    canvas: &mut dyn Canvas,
    font: Option<&FontHandle>,
    text: &str,
    logical_y: f32,
    font_size: f32,
    color: egui::Color32,
) -> egui::Pos2 {
    let size = frame.to_physical(font_size);
    let y = frame.to_physical(logical_y);
    let text_size = canvas.measure_text(text, font, size);

    let center_x = frame.viewport.logical_width as f32 / 2.0;
    let pos = egui::pos2((center_x - text_size.x / 2.0).round(), y);
    canvas.draw_text(text, pos, font, size, color);
    pos
}
