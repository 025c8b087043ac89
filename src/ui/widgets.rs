/// Diagnostic overlays: FPS counter and click counter
use std::collections::VecDeque;

use eframe::egui;

use super::canvas::Canvas;
use super::colors;
use super::scaling::FrameContext;
use super::text::draw_text_logical;
use crate::core::fonts::FontHandle;

/// Constants for overlay styling (reference units)
pub const FPS_FONT_SIZE: f32 = 20.0;
pub const FPS_PADDING: f32 = 10.0;
pub const COUNTER_FONT_SIZE: f32 = 28.0;

/// Number of frame times averaged for the FPS readout
const FPS_WINDOW: usize = 30;

/// Rolling-average frames-per-second counter
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    capacity: usize,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(FPS_WINDOW)
    }
}

impl FpsCounter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frame_times: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records the duration of the last frame in seconds
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if self.frame_times.len() == self.capacity {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);
    }

    pub fn fps(&self) -> u32 {
        if self.frame_times.is_empty() {
            return 0;
        }
        let total: f32 = self.frame_times.iter().sum();
        (self.frame_times.len() as f32 / total).round() as u32
    }
}

/// Draws "FPS: N" in the top-right corner of the viewport
pub fn draw_fps_counter(
    frame: &FrameContext,
    canvas: &mut dyn Canvas,
    font: Option<&FontHandle>,
    fps: u32,
) {
    let text = format!("FPS: {}", fps);
    let font_size = frame.to_physical(FPS_FONT_SIZE);
    let padding = FPS_PADDING * frame.scale();

    let text_size = canvas.measure_text(&text, font, font_size);
    draw_text_logical(
        canvas,
        font,
        &text,
        frame.viewport.logical_width as f32 - text_size.x - padding,
        padding,
        font_size,
        colors::status::SUCCESS,
    );
}

/// Draws "Counter: N" above the given logical anchor
pub fn draw_click_counter(
    frame: &FrameContext,
    canvas: &mut dyn Canvas,
    font: Option<&FontHandle>,
    count: u32,
    logical_pos: egui::Pos2,
) {
    let text = format!("Counter: {}", count);
    draw_text_logical(
        canvas,
        font,
        &text,
        frame.to_physical(logical_pos.x),
        frame.to_physical(logical_pos.y),
        frame.to_physical(COUNTER_FONT_SIZE),
        colors::primary::WHITE,
    );
}
