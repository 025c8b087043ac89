/// Drawing surface used by widgets
///
/// Widgets only talk to [`Canvas`], so the same widget code paints through
/// egui in the app and into a recording surface in tests.
use std::f32::consts::PI;

use eframe::egui;

use crate::core::fonts::FontHandle;

/// Max deviation of a tessellated arc from the true circle, in surface units
const SMOOTH_CIRCLE_ERROR_RATE: f32 = 0.5;
/// Upper bound on tessellation segments per corner
pub const MAX_CORNER_SEGMENTS: usize = 256;

pub trait Canvas {
    fn fill_rect(&mut self, rect: egui::Rect, color: egui::Color32);

    /// `roundness` is 0.0 (square) to 1.0 (fully rounded), `segments` is per corner
    fn fill_rounded_rect(
        &mut self,
        rect: egui::Rect,
        roundness: f32,
        segments: i32,
        color: egui::Color32,
    );

    fn measure_text(&self, text: &str, font: Option<&FontHandle>, size: f32) -> egui::Vec2;

    /// `pos` is the top-left corner of the text
    fn draw_text(
        &mut self,
        text: &str,
        pos: egui::Pos2,
        font: Option<&FontHandle>,
        size: f32,
        color: egui::Color32,
    );
}

/// Number of segments per corner, deriving one from the radius when `segments < 4`.
/// Never more than [`MAX_CORNER_SEGMENTS`].
pub fn corner_segments(radius: f32, segments: i32) -> usize {
    if segments >= 4 {
        return (segments as usize).min(MAX_CORNER_SEGMENTS);
    }
    let th = (2.0 * (1.0 - SMOOTH_CIRCLE_ERROR_RATE / radius).powi(2) - 1.0).acos();
    let derived = ((2.0 * PI / th).ceil() / 4.0) as i32;
    if th.is_nan() || derived <= 0 {
        4
    } else {
        (derived as usize).min(MAX_CORNER_SEGMENTS)
    }
}

/// Outline of a rounded rectangle, clockwise on screen.
///
/// Returns `None` when the shape degenerates to a plain rectangle.
pub fn rounded_rect_points(
    rect: egui::Rect,
    roundness: f32,
    segments: i32,
) -> Option<Vec<egui::Pos2>> {
    if roundness <= 0.0 || rect.width() < 1.0 || rect.height() < 1.0 {
        return None;
    }
    let roundness = roundness.min(1.0);
    let radius = rect.width().min(rect.height()) * roundness / 2.0;
    if radius <= 0.0 {
        return None;
    }

    let steps = corner_segments(radius, segments);
    let r = radius;
    // Центры дуг и начальные углы: левый верх, правый верх, правый низ, левый низ
    let corners = [
        (egui::pos2(rect.min.x + r, rect.min.y + r), PI),
        (egui::pos2(rect.max.x - r, rect.min.y + r), 1.5 * PI),
        (egui::pos2(rect.max.x - r, rect.max.y - r), 0.0),
        (egui::pos2(rect.min.x + r, rect.max.y - r), 0.5 * PI),
    ];

    let mut points = Vec::with_capacity(4 * (steps + 1));
    for (center, start) in corners {
        for i in 0..=steps {
            let angle = start + (PI / 2.0) * (i as f32 / steps as f32);
            points.push(center + r * egui::vec2(angle.cos(), angle.sin()));
        }
    }
    Some(points)
}

/// [`Canvas`] over an egui painter
pub struct EguiCanvas {
    painter: egui::Painter,
}

impl EguiCanvas {
    pub fn new(painter: egui::Painter) -> Self {
        Self { painter }
    }

    fn font_id(font: Option<&FontHandle>, size: f32) -> egui::FontId {
        let family = font
            .map(|f| f.family().clone())
            .unwrap_or(egui::FontFamily::Proportional);
        egui::FontId::new(size, family)
    }
}

impl Canvas for EguiCanvas {
    fn fill_rect(&mut self, rect: egui::Rect, color: egui::Color32) {
        self.painter.rect_filled(rect, 0.0, color);
    }

    fn fill_rounded_rect(
        &mut self,
        rect: egui::Rect,
        roundness: f32,
        segments: i32,
        color: egui::Color32,
    ) {
        match rounded_rect_points(rect, roundness, segments) {
            Some(points) => {
                self.painter
                    .add(egui::Shape::convex_polygon(points, color, egui::Stroke::NONE));
            }
            None => self.fill_rect(rect, color),
        }
    }

    fn measure_text(&self, text: &str, font: Option<&FontHandle>, size: f32) -> egui::Vec2 {
        if text.is_empty() || size <= 0.0 {
            return egui::Vec2::ZERO;
        }
        let font_id = Self::font_id(font, size);
        self.painter
            .ctx()
            .fonts(|f| f.layout_no_wrap(text.to_owned(), font_id, egui::Color32::PLACEHOLDER).size())
    }

    fn draw_text(
        &mut self,
        text: &str,
        pos: egui::Pos2,
        font: Option<&FontHandle>,
        size: f32,
        color: egui::Color32,
    ) {
        if text.is_empty() || size <= 0.0 {
            return;
        }
        self.painter.text(
            pos,
            egui::Align2::LEFT_TOP,
            text,
            Self::font_id(font, size),
            color,
        );
    }
}
