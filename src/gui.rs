use crate::config::Config;
use crate::core::{CursorManager, CursorType, FontHandle, FontManager, FontPaths};
use crate::services::ScriptSandbox;
use crate::ui::buttons::{render_button, Button};
use crate::ui::canvas::EguiCanvas;
use crate::ui::colors;
use crate::ui::scaling::{FrameContext, Scaler, REFERENCE_HEIGHT, REFERENCE_WIDTH};
use crate::ui::text::draw_text_logical_centered;
use crate::ui::widgets::{draw_click_counter, draw_fps_counter, FpsCounter};
use eframe::egui;

/// Size of the main button in reference units
const MAIN_BUTTON_SIZE: egui::Vec2 = egui::vec2(200.0, 100.0);
/// Logical y of the diagnostic line
const DIAGNOSTICS_Y: f32 = 120.0;
const DIAGNOSTICS_FONT_SIZE: f32 = 32.0;
const SCRIPT_BUTTON_FN: &str = "drawTestButton";

pub struct RamlaApp {
    frame: FrameContext,
    fonts: FontManager,
    cursor: CursorManager,
    fps: FpsCounter,
    sandbox: Option<ScriptSandbox>,
    click_count: u32,
    diagnostics: Option<String>, // Строка из скриптов, считается один раз при старте
}

impl RamlaApp {
    pub fn new(ctx: &egui::Context, config: Config) -> Self {
        let mut fonts = FontManager::new(ctx.clone(), FontPaths::in_assets_dir(&config.assets_dir));
        fonts.initialize();

        let mut sandbox = if config.scripting_enabled {
            match ScriptSandbox::new(Some(fonts.regular())) {
                Ok(sandbox) => Some(sandbox),
                Err(e) => {
                    log::error!("❌ Скриптовая среда недоступна: {:#}", e);
                    None
                }
            }
        } else {
            log::info!("Скрипты отключены в конфигурации");
            None
        };

        if let Some(sandbox) = sandbox.as_ref() {
            log::info!("📜 Скрипты: {:?}", sandbox.script_names());
        }

        if let (Some(sandbox), Some(dir)) = (sandbox.as_mut(), config.scripts_dir.as_deref()) {
            let loaded = sandbox.load_scripts_dir(dir);
            log::info!("📁 Загружено пользовательских скриптов: {}", loaded);
        }

        let diagnostics = sandbox.as_mut().and_then(|sandbox| {
            let welcome = sandbox.call_string("getWelcomeMessage")?;
            let product = sandbox.call_math("multiply", 6.0, 7.0);
            Some(format!("{} 6 x 7 = {}", welcome, product))
        });
        if let Some(line) = &diagnostics {
            log::info!("Диагностика скриптов: {}", line);
        }

        Self {
            frame: FrameContext::new(Scaler::new(config.scale_policy)),
            fonts,
            cursor: CursorManager::default(),
            fps: FpsCounter::default(),
            sandbox,
            click_count: 0,
            diagnostics,
        }
    }

    /// The main button, centered in reference space
    fn main_button(font: FontHandle) -> Button {
        Button::new(
            "Click me",
            REFERENCE_WIDTH / 2.0 - MAIN_BUTTON_SIZE.x / 2.0,
            REFERENCE_HEIGHT / 2.0 - MAIN_BUTTON_SIZE.y / 2.0,
            MAIN_BUTTON_SIZE.x,
            MAIN_BUTTON_SIZE.y,
        )
        .with_colors(
            colors::button::DEFAULT,
            colors::button::DEFAULT_HOVER,
            colors::button::DEFAULT_PRESSED,
        )
        .with_border(2.0, colors::border::DEFAULT)
        .with_font_size(24.0)
        .with_rounding(0.3, 16)
        .with_font(font)
    }

    fn draw_frame(&mut self, ctx: &egui::Context) {
        let painter = ctx.layer_painter(egui::LayerId::background());
        painter.rect_filled(ctx.screen_rect(), 0.0, colors::primary::BLACK);
        let mut canvas = EguiCanvas::new(painter.clone());

        let regular = self.fonts.regular();
        let bold = self.fonts.bold();

        let btn = Self::main_button(regular.clone());
        let state = render_button(&self.frame, &mut canvas, &btn);
        if state.hovered {
            self.cursor.set(CursorType::Pointer);
        }
        if state.clicked {
            self.click_count += 1;
            log::debug!("Клик по кнопке, всего: {}", self.click_count);
        }

        draw_click_counter(
            &self.frame,
            &mut canvas,
            Some(&bold),
            self.click_count,
            egui::pos2(btn.x, btn.y - MAIN_BUTTON_SIZE.y),
        );

        if let Some(sandbox) = self.sandbox.as_mut() {
            let script_canvas = Box::new(EguiCanvas::new(painter.clone()));
            let state = sandbox.call_button(SCRIPT_BUTTON_FN, &self.frame, script_canvas);
            if state.hovered {
                self.cursor.set(CursorType::Pointer);
            }
        }

        if let Some(line) = &self.diagnostics {
            draw_text_logical_centered(
                &self.frame,
                &mut canvas,
                Some(&regular),
                line,
                DIAGNOSTICS_Y,
                DIAGNOSTICS_FONT_SIZE,
                colors::text::LIGHT,
            );
        }

        draw_fps_counter(&self.frame, &mut canvas, Some(&regular), self.fps.fps());
    }
}

impl eframe::App for RamlaApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 1.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_frame(ctx);
    }
}

impl RamlaApp {
    /// One iteration of the frame loop
    fn run_frame(&mut self, ctx: &egui::Context) {
        self.frame.update_from_egui(ctx);
        self.fps.tick(ctx.input(|i| i.unstable_dt));
        self.cursor.set(CursorType::Default);

        self.draw_frame(ctx);

        self.cursor.apply(ctx);
        // Рисуем непрерывно, как игровой цикл
        ctx.request_repaint();
    }
}

impl Drop for RamlaApp {
    fn drop(&mut self) {
        if let Some(sandbox) = self.sandbox.as_mut().filter(|s| s.is_running()) {
            sandbox.shutdown();
        }
        if self.fonts.is_loaded() {
            self.fonts.unload();
        }
        log::info!("👋 Ramla Engine остановлен (кликов: {})", self.click_count);
    }
}
