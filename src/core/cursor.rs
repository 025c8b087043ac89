/// Управление курсором поверх поверхности рисования
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorType {
    #[default]
    Default,
    Pointer,
    Text,
    Crosshair,
    Move,
    NotAllowed,
    Grab,
    Grabbing,
}

impl CursorType {
    /// CSS `cursor` value used by web hosts
    pub fn css_name(self) -> &'static str {
        match self {
            CursorType::Default => "default",
            CursorType::Pointer => "pointer",
            CursorType::Text => "text",
            CursorType::Crosshair => "crosshair",
            CursorType::Move => "move",
            CursorType::NotAllowed => "not-allowed",
            CursorType::Grab => "grab",
            CursorType::Grabbing => "grabbing",
        }
    }

    pub fn icon(self) -> egui::CursorIcon {
        match self {
            CursorType::Default => egui::CursorIcon::Default,
            CursorType::Pointer => egui::CursorIcon::PointingHand,
            CursorType::Text => egui::CursorIcon::Text,
            CursorType::Crosshair => egui::CursorIcon::Crosshair,
            CursorType::Move => egui::CursorIcon::Move,
            CursorType::NotAllowed => egui::CursorIcon::NotAllowed,
            CursorType::Grab => egui::CursorIcon::Grab,
            CursorType::Grabbing => egui::CursorIcon::Grabbing,
        }
    }
}

/// Remembers the requested cursor and pushes it to the host every frame
/// (egui resets the cursor icon at the start of each pass).
#[derive(Debug, Default)]
pub struct CursorManager {
    current: CursorType,
    last_applied: Option<CursorType>,
}

impl CursorManager {
    pub fn set(&mut self, cursor: CursorType) {
        self.current = cursor;
    }

    pub fn current(&self) -> CursorType {
        self.current
    }

    pub fn apply(&mut self, ctx: &egui::Context) {
        let cursor = self.current();
        if self.last_applied != Some(cursor) {
            log::debug!("Курсор: {}", cursor.css_name());
            self.last_applied = Some(cursor);
        }
        ctx.set_cursor_icon(cursor.icon());
    }
}
