/// Модуль для инициализации логирования
/// Логирует в файл logs/ramla.log, если его нельзя открыть - в stderr

use std::io::Write;
use log::LevelFilter;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "logs/ramla.log";

pub fn init() {
    let mut builder = env_logger::Builder::new();

    // Читаем RUST_LOG переменную если она установлена
    if let Ok(log_level) = std::env::var("RUST_LOG") {
        builder.parse_filters(&log_level);
    } else {
        // По умолчанию: INFO уровень
        builder.filter_level(LevelFilter::Info);
        // Отключаем логи от зависимостей (слишком многословно)
        builder.filter_module("eframe", LevelFilter::Warn);
        builder.filter_module("egui", LevelFilter::Warn);
        builder.filter_module("wgpu", LevelFilter::Warn);
        builder.filter_module("wasmtime", LevelFilter::Warn);
        builder.filter_module("cranelift", LevelFilter::Warn);
    }

    // Формат логов: [HH:MM:SS LEVEL] модуль - сообщение
    builder.format(|buf, record| {
        let now = chrono::Local::now().format("%H:%M:%S");
        writeln!(
            buf,
            "[{} {}] {} - {}",
            now,
            record.level(),
            record.target(),
            record.args()
        )
    });

    // Создаем директорию для логов если её нет
    if !std::path::Path::new(LOG_DIR).exists() {
        let _ = std::fs::create_dir(LOG_DIR);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE);

    match file {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            builder.target(env_logger::Target::Stderr);
            eprintln!("Не удалось открыть {}: {}, пишем логи в stderr", LOG_FILE, e);
        }
    }

    if builder.try_init().is_err() {
        return;
    }

    log::info!("Логирование инициализировано ✓");
}
