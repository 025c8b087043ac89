// Модули приложения
mod config;
mod core;
mod gui;
mod logger;
mod services;
mod ui;

use config::Config;
use gui::RamlaApp;
use eframe::NativeOptions;

fn main() -> Result<(), eframe::Error> {
    // Инициализируем логирование
    logger::init();
    log::info!("🚀 Ramla Engine запущен");

    let config = Config::default();
    log::info!(
        "📁 Конфигурация загружена (масштаб: {:?}, скрипты: {})",
        config.scale_policy,
        config.scripting_enabled
    );
    let title = config.window_title.clone();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([320.0, 180.0]),
        vsync: config.vsync,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(Box::new(RamlaApp::new(&cc.egui_ctx, config)))
        }),
    )
}
