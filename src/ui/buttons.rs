/// Button rendering and interaction module
use eframe::egui;

use super::canvas::Canvas;
use super::colors::{self, adjust_brightness};
use super::scaling::FrameContext;
use crate::core::fonts::FontHandle;

/// Border darkening factor while pressed ("inset" look)
pub const PRESSED_BORDER_FACTOR: f32 = 0.6;
/// Border darkening factor while hovered
pub const HOVER_BORDER_FACTOR: f32 = 0.8;

pub const DEFAULT_SEGMENTS: i32 = 16;

/// Declarative button description.
///
/// All dimensions are logical units against the reference resolution,
/// scaling to the surface happens inside [`render_button`].
#[derive(Debug, Clone)]
pub struct Button {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub background_color: egui::Color32,
    pub text_color: egui::Color32,
    pub hover_color: egui::Color32,
    pub pressed_color: egui::Color32,
    pub border_color: egui::Color32,
    pub border_width: f32,
    pub font_size: f32,
    pub text: String,
    /// 0.0 = square corners, 1.0 = fully rounded
    pub border_radius: f32,
    /// Segments per rounded corner
    pub segments: i32,
    /// `None` = built-in font
    pub font: Option<FontHandle>,
}

impl Button {
    /// Button with the default steel palette
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            background_color: colors::button::DEFAULT,
            text_color: colors::text::ON_DARK,
            hover_color: colors::button::DEFAULT_HOVER,
            pressed_color: colors::button::DEFAULT_PRESSED,
            border_color: colors::border::DEFAULT,
            border_width: 2.0,
            font_size: 24.0,
            text: text.into(),
            border_radius: 0.0,
            segments: DEFAULT_SEGMENTS,
            font: None,
        }
    }

    pub fn with_font(mut self, font: FontHandle) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_border(mut self, width: f32, color: egui::Color32) -> Self {
        self.border_width = width;
        self.border_color = color;
        self
    }

    pub fn with_rounding(mut self, border_radius: f32, segments: i32) -> Self {
        self.border_radius = border_radius;
        self.segments = segments;
        self
    }

    /// Background, hover and pressed colors
    pub fn with_colors(
        mut self,
        background: egui::Color32,
        hover: egui::Color32,
        pressed: egui::Color32,
    ) -> Self {
        self.background_color = background;
        self.hover_color = hover;
        self.pressed_color = pressed;
        self
    }
}

/// Interaction state derived for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub hovered: bool,
    pub pressed: bool,
    pub clicked: bool,
}

/// Button bounds on the surface, rounded to whole units
pub fn physical_bounds(frame: &FrameContext, btn: &Button) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(frame.to_physical(btn.x), frame.to_physical(btn.y)),
        egui::vec2(frame.to_physical(btn.width), frame.to_physical(btn.height)),
    )
}

/// Closed-interval hit test, edges count as inside
pub fn is_point_inside(bounds: egui::Rect, point: egui::Pos2) -> bool {
    point.x >= bounds.min.x
        && point.x <= bounds.max.x
        && point.y >= bounds.min.y
        && point.y <= bounds.max.y
}

/// Derives the interaction state from the frame's pointer snapshot
pub fn button_state(frame: &FrameContext, bounds: egui::Rect) -> ButtonState {
    let hovered = frame
        .pointer
        .position
        .is_some_and(|pos| is_point_inside(bounds, pos));
    ButtonState {
        hovered,
        pressed: hovered && frame.pointer.primary_down,
        clicked: hovered && frame.pointer.primary_released,
    }
}

/// Body and border colors for the given state
pub fn state_colors(btn: &Button, state: ButtonState) -> (egui::Color32, egui::Color32) {
    if state.pressed {
        (
            btn.pressed_color,
            adjust_brightness(btn.pressed_color, PRESSED_BORDER_FACTOR),
        )
    } else if state.hovered {
        (
            btn.hover_color,
            adjust_brightness(btn.hover_color, HOVER_BORDER_FACTOR),
        )
    } else {
        (btn.background_color, btn.border_color)
    }
}

/// Hit-tests and draws the button: border, body, then the centered label.
///
/// Returns the interaction state for this frame.
pub fn render_button(frame: &FrameContext, canvas: &mut dyn Canvas, btn: &Button) -> ButtonState {
    let bounds = physical_bounds(frame, btn);
    let state = button_state(frame, bounds);
    let (body_color, border_color) = state_colors(btn, state);

    // Рамка рисуется только если задана, но не тоньше одного пикселя
    if btn.border_width > 0.0 {
        let border = frame.to_physical(btn.border_width).max(1.0);
        let border_rect = bounds.expand(border);
        if btn.border_radius > 0.0 {
            canvas.fill_rounded_rect(border_rect, btn.border_radius, btn.segments, border_color);
        } else {
            canvas.fill_rect(border_rect, border_color);
        }
    }

    if btn.border_radius > 0.0 {
        canvas.fill_rounded_rect(bounds, btn.border_radius, btn.segments, body_color);
    } else {
        canvas.fill_rect(bounds, body_color);
    }

    let font_size = frame.to_physical(btn.font_size);
    let font = btn.font.as_ref();
    let text_size = canvas.measure_text(&btn.text, font, font_size);

    // Округляем позицию текста до целых пикселей для чёткости
    let text_pos = egui::pos2(
        (bounds.min.x + (bounds.width() - text_size.x) / 2.0).round(),
        (bounds.min.y + (bounds.height() - text_size.y) / 2.0).round(),
    );
    canvas.draw_text(&btn.text, text_pos, font, font_size, btn.text_color);

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::canvas::recording::{DrawCall, RecordingCanvas};
    use crate::ui::scaling::{PointerInput, ScalePolicy, Scaler};

    fn frame(width: i32, height: i32, pointer: PointerInput) -> FrameContext {
        let mut frame = FrameContext::new(Scaler::new(ScalePolicy::Contain));
        frame.viewport.set_logical_size(width, height);
        frame.viewport.set_physical_size(width, height);
        frame.pointer = pointer;
        frame
    }

    fn pointer_at(x: f32, y: f32) -> PointerInput {
        PointerInput {
            position: Some(egui::pos2(x, y)),
            ..Default::default()
        }
    }

    #[test]
    fn half_scale_maps_logical_to_physical_bounds() {
        let frame = frame(960, 540, PointerInput::default());
        let btn = Button::new("OK", 860.0, 480.0, 200.0, 120.0);
        let bounds = physical_bounds(&frame, &btn);
        assert_eq!(bounds.min, egui::pos2(430.0, 240.0));
        assert_eq!(bounds.size(), egui::vec2(100.0, 60.0));
    }

    #[test]
    fn bounds_are_rounded_not_truncated() {
        // scale = 0.5, 101 * 0.5 = 50.5 -> 51
        let frame = frame(960, 540, PointerInput::default());
        let btn = Button::new("OK", 101.0, 3.0, 5.0, 7.0);
        let bounds = physical_bounds(&frame, &btn);
        assert_eq!(bounds.min, egui::pos2(51.0, 2.0));
        assert_eq!(bounds.size(), egui::vec2(3.0, 4.0));
    }

    #[test]
    fn hit_test_uses_closed_intervals() {
        let bounds = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(20.0, 10.0));
        assert!(is_point_inside(bounds, egui::pos2(15.0, 15.0)));
        assert!(is_point_inside(bounds, egui::pos2(10.0, 10.0)));
        assert!(is_point_inside(bounds, egui::pos2(30.0, 20.0)));
        assert!(!is_point_inside(bounds, egui::pos2(30.1, 20.0)));
        assert!(!is_point_inside(bounds, egui::pos2(9.9, 15.0)));
    }

    #[test]
    fn no_pointer_means_idle() {
        let frame = frame(1920, 1080, PointerInput::default());
        let btn = Button::new("OK", 0.0, 0.0, 100.0, 100.0);
        let state = render_button(&frame, &mut RecordingCanvas::default(), &btn);
        assert_eq!(state, ButtonState::default());
    }

    #[test]
    fn pressed_requires_hover() {
        let btn = Button::new("OK", 100.0, 100.0, 100.0, 50.0);
        let inside = PointerInput {
            primary_down: true,
            ..pointer_at(150.0, 120.0)
        };
        let outside = PointerInput {
            primary_down: true,
            ..pointer_at(10.0, 10.0)
        };

        let state = render_button(&frame(1920, 1080, inside), &mut RecordingCanvas::default(), &btn);
        assert!(state.hovered && state.pressed && !state.clicked);

        let state = render_button(&frame(1920, 1080, outside), &mut RecordingCanvas::default(), &btn);
        assert_eq!(state, ButtonState::default());
    }

    #[test]
    fn click_is_a_release_edge_while_hovered() {
        let btn = Button::new("OK", 100.0, 100.0, 100.0, 50.0);
        let release_inside = PointerInput {
            primary_released: true,
            ..pointer_at(100.0, 100.0)
        };
        let release_outside = PointerInput {
            primary_released: true,
            ..pointer_at(99.0, 100.0)
        };
        let held_inside = PointerInput {
            primary_down: true,
            ..pointer_at(120.0, 120.0)
        };

        let canvas = &mut RecordingCanvas::default();
        assert!(render_button(&frame(1920, 1080, release_inside), canvas, &btn).clicked);
        assert!(!render_button(&frame(1920, 1080, release_outside), canvas, &btn).clicked);
        assert!(!render_button(&frame(1920, 1080, held_inside), canvas, &btn).clicked);
    }

    #[test]
    fn draws_border_then_body_then_centered_label() {
        let frame = frame(960, 540, PointerInput::default());
        let btn = Button::new("Click", 860.0, 480.0, 200.0, 120.0)
            .with_font_size(24.0)
            .with_border(2.0, colors::border::DEFAULT);
        let mut canvas = RecordingCanvas::default();
        render_button(&frame, &mut canvas, &btn);

        let calls = canvas.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[0],
            DrawCall::Rect {
                rect: egui::Rect::from_min_size(egui::pos2(429.0, 239.0), egui::vec2(102.0, 62.0)),
                color: colors::border::DEFAULT,
            }
        );
        assert_eq!(
            calls[1],
            DrawCall::Rect {
                rect: egui::Rect::from_min_size(egui::pos2(430.0, 240.0), egui::vec2(100.0, 60.0)),
                color: colors::button::DEFAULT,
            }
        );
        // 5 символов * 12 / 2 = 30 в ширину, 12 в высоту
        assert_eq!(
            calls[2],
            DrawCall::Text {
                text: "Click".to_string(),
                pos: egui::pos2(465.0, 264.0),
                size: 12.0,
                font: None,
                color: colors::text::ON_DARK,
            }
        );
    }

    #[test]
    fn zero_border_width_skips_border() {
        let frame = frame(1920, 1080, PointerInput::default());
        let btn = Button::new("OK", 0.0, 0.0, 10.0, 10.0).with_border(0.0, colors::border::DEFAULT);
        let mut canvas = RecordingCanvas::default();
        render_button(&frame, &mut canvas, &btn);
        assert_eq!(canvas.calls().len(), 2);
    }

    #[test]
    fn rounded_button_uses_segments_and_state_colors() {
        let pointer = PointerInput {
            primary_down: true,
            ..pointer_at(50.0, 50.0)
        };
        let frame = frame(1920, 1080, pointer);
        let btn = Button::new("OK", 0.0, 0.0, 100.0, 100.0).with_rounding(0.3, 16);
        let mut canvas = RecordingCanvas::default();
        render_button(&frame, &mut canvas, &btn);

        let calls = canvas.calls();
        assert!(matches!(
            calls[0],
            DrawCall::RoundedRect { segments: 16, color, .. }
                if color == adjust_brightness(btn.pressed_color, PRESSED_BORDER_FACTOR)
        ));
        assert!(matches!(
            calls[1],
            DrawCall::RoundedRect { roundness, color, .. }
                if roundness == 0.3 && color == btn.pressed_color
        ));
    }

    #[test]
    fn hover_colors() {
        let btn = Button::new("OK", 0.0, 0.0, 100.0, 100.0);
        let hovered = ButtonState {
            hovered: true,
            ..Default::default()
        };
        assert_eq!(
            state_colors(&btn, hovered),
            (btn.hover_color, adjust_brightness(btn.hover_color, HOVER_BORDER_FACTOR))
        );
        assert_eq!(
            state_colors(&btn, ButtonState::default()),
            (btn.background_color, btn.border_color)
        );
    }

    #[test]
    fn degenerate_button_does_not_panic() {
        let frame = frame(1920, 1080, pointer_at(0.0, 0.0));
        let btn = Button::new("", 0.0, 0.0, -10.0, 0.0).with_rounding(1.0, 0);
        render_button(&frame, &mut RecordingCanvas::default(), &btn);
    }
}
