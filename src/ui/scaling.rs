/// Logical-to-physical coordinate scaling and the per-frame context
use eframe::egui;

/// Design-time resolution all logical layout is authored against
pub const REFERENCE_WIDTH: f32 = 1920.0;
pub const REFERENCE_HEIGHT: f32 = 1080.0;

/// How the reference layout is fitted into the current viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalePolicy {
    /// UI grows to fill the viewport, may crop
    Cover,
    /// UI shrinks to fit the viewport, never crops (letterbox)
    #[default]
    Contain,
}

impl ScalePolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "cover" => Some(Self::Cover),
            "contain" => Some(Self::Contain),
            _ => None,
        }
    }
}

/// Viewport sizes pushed in by the host once per frame (last write wins)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub physical_width: i32,
    pub physical_height: i32,
    pub logical_width: i32,
    pub logical_height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            physical_width: REFERENCE_WIDTH as i32,
            physical_height: REFERENCE_HEIGHT as i32,
            logical_width: REFERENCE_WIDTH as i32,
            logical_height: REFERENCE_HEIGHT as i32,
        }
    }
}

impl Viewport {
    pub fn set_physical_size(&mut self, width: i32, height: i32) {
        self.physical_width = width;
        self.physical_height = height;
    }

    pub fn set_logical_size(&mut self, width: i32, height: i32) {
        self.logical_width = width;
        self.logical_height = height;
    }
}

/// Computes the logical-to-physical factor against a fixed reference resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    pub reference_width: f32,
    pub reference_height: f32,
    pub policy: ScalePolicy,
}

impl Default for Scaler {
    fn default() -> Self {
        Self::new(ScalePolicy::default())
    }
}

impl Scaler {
    pub fn new(policy: ScalePolicy) -> Self {
        Self {
            reference_width: REFERENCE_WIDTH,
            reference_height: REFERENCE_HEIGHT,
            policy,
        }
    }

    /// Always strictly positive: non-positive viewport sizes are clamped to one unit.
    pub fn scale(&self, viewport: &Viewport) -> f32 {
        let sx = viewport.logical_width.max(1) as f32 / self.reference_width;
        let sy = viewport.logical_height.max(1) as f32 / self.reference_height;
        match self.policy {
            ScalePolicy::Cover => sx.max(sy),
            ScalePolicy::Contain => sx.min(sy),
        }
    }
}

/// Pointer snapshot for the current frame, in surface units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    pub position: Option<egui::Pos2>,
    /// Primary button is held down
    pub primary_down: bool,
    /// Primary button was released during this frame
    pub primary_released: bool,
}

impl PointerInput {
    pub fn from_egui(ctx: &egui::Context) -> Self {
        ctx.input(|i| Self {
            position: i.pointer.latest_pos(),
            primary_down: i.pointer.primary_down(),
            primary_released: i.pointer.primary_released(),
        })
    }
}

/// Everything a widget needs to know about the current frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    pub viewport: Viewport,
    pub pointer: PointerInput,
    pub scaler: Scaler,
}

impl FrameContext {
    pub fn new(scaler: Scaler) -> Self {
        Self {
            scaler,
            ..Default::default()
        }
    }

    /// Refreshes viewport and pointer from the egui host
    pub fn update_from_egui(&mut self, ctx: &egui::Context) {
        let screen = ctx.screen_rect();
        let ppp = ctx.pixels_per_point();
        let previous = self.viewport;
        self.viewport
            .set_logical_size(screen.width().round() as i32, screen.height().round() as i32);
        self.viewport.set_physical_size(
            (screen.width() * ppp).round() as i32,
            (screen.height() * ppp).round() as i32,
        );
        if self.viewport != previous {
            log::debug!(
                "Viewport: {}x{} (physical {}x{})",
                self.viewport.logical_width,
                self.viewport.logical_height,
                self.viewport.physical_width,
                self.viewport.physical_height
            );
        }
        self.pointer = PointerInput::from_egui(ctx);
    }

    pub fn scale(&self) -> f32 {
        self.scaler.scale(&self.viewport)
    }

    /// Logical value to whole physical units
    pub fn to_physical(&self, logical: f32) -> f32 {
        (logical * self.scale()).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(w: i32, h: i32) -> Viewport {
        let mut v = Viewport::default();
        v.set_logical_size(w, h);
        v.set_physical_size(w, h);
        v
    }

    #[test]
    fn half_size_viewport_scales_by_half_for_both_policies() {
        for policy in [ScalePolicy::Cover, ScalePolicy::Contain] {
            let scaler = Scaler::new(policy);
            assert_eq!(scaler.scale(&viewport(960, 540)), 0.5);
        }
    }

    #[test]
    fn cover_and_contain_differ_on_other_aspect_ratios() {
        let v = viewport(1920, 540);
        assert_eq!(Scaler::new(ScalePolicy::Cover).scale(&v), 1.0);
        assert_eq!(Scaler::new(ScalePolicy::Contain).scale(&v), 0.5);
    }

    #[test]
    fn scale_is_linear_in_viewport_width() {
        let scaler = Scaler::new(ScalePolicy::Cover);
        let a = scaler.scale(&viewport(1920, 100));
        let b = scaler.scale(&viewport(3840, 100));
        assert_eq!(b, a * 2.0);
    }

    #[test]
    fn degenerate_viewport_still_gives_positive_scale() {
        for policy in [ScalePolicy::Cover, ScalePolicy::Contain] {
            let scaler = Scaler::new(policy);
            assert!(scaler.scale(&viewport(0, 0)) > 0.0);
            assert!(scaler.scale(&viewport(-10, 200)) > 0.0);
        }
    }

    #[test]
    fn last_write_wins() {
        let mut v = Viewport::default();
        v.set_logical_size(800, 600);
        v.set_logical_size(1024, 768);
        assert_eq!((v.logical_width, v.logical_height), (1024, 768));
    }

    #[test]
    fn policy_names() {
        assert_eq!(ScalePolicy::from_name("Cover"), Some(ScalePolicy::Cover));
        assert_eq!(ScalePolicy::from_name(" contain "), Some(ScalePolicy::Contain));
        assert_eq!(ScalePolicy::from_name("stretch"), None);
    }
}
