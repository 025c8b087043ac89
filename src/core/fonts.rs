/// Менеджер шрифтов: ленивая загрузка Roboto Regular/Bold с откатом на встроенный шрифт
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use eframe::egui;

pub const REGULAR_FAMILY: &str = "roboto-regular";
pub const BOLD_FAMILY: &str = "roboto-bold";

/// sfnt signatures: TrueType, OpenType/CFF, Apple TrueType, collection
const FONT_SIGNATURES: [&[u8; 4]; 4] = [b"\x00\x01\x00\x00", b"OTTO", b"true", b"ttcf"];

#[derive(Debug)]
pub struct FontFace {
    name: String,
    family: egui::FontFamily,
}

/// Shared, non-owning reference to a face owned by [`FontManager`]
#[derive(Debug, Clone)]
pub struct FontHandle(Arc<FontFace>);

impl FontHandle {
    /// The built-in proportional font
    pub fn fallback() -> Self {
        Self(Arc::new(FontFace {
            name: "default".to_string(),
            family: egui::FontFamily::Proportional,
        }))
    }

    fn named(name: &str) -> Self {
        Self(Arc::new(FontFace {
            name: name.to_string(),
            family: egui::FontFamily::Name(name.into()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn family(&self) -> &egui::FontFamily {
        &self.0.family
    }

    pub fn is_fallback(&self) -> bool {
        self.0.family == egui::FontFamily::Proportional
    }

    pub fn ptr_eq(&self, other: &FontHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Paths of the two bundled font assets
#[derive(Debug, Clone)]
pub struct FontPaths {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

impl FontPaths {
    pub fn in_assets_dir(assets_dir: &Path) -> Self {
        let fonts = assets_dir.join("fonts");
        Self {
            regular: fonts.join("Roboto-Regular.ttf"),
            bold: fonts.join("Roboto-Bold.ttf"),
        }
    }
}

pub struct FontManager {
    ctx: egui::Context,
    paths: FontPaths,
    regular: Option<FontHandle>,
    bold: Option<FontHandle>,
    fallback: FontHandle,
    loaded: bool,
}

impl FontManager {
    pub fn new(ctx: egui::Context, paths: FontPaths) -> Self {
        Self {
            ctx,
            paths,
            regular: None,
            bold: None,
            fallback: FontHandle::fallback(),
            loaded: false,
        }
    }

    /// Loads both faces and registers them with egui. Repeated calls are no-ops.
    pub fn initialize(&mut self) {
        if self.loaded {
            return;
        }

        let mut fonts = egui::FontDefinitions::default();
        self.regular = register_face(&mut fonts, REGULAR_FAMILY, &self.paths.regular);
        self.bold = register_face(&mut fonts, BOLD_FAMILY, &self.paths.bold);

        if self.regular.is_some() || self.bold.is_some() {
            self.ctx.set_fonts(fonts);
        }
        self.loaded = true;

        log::info!(
            "🔤 Шрифты инициализированы (regular: {}, bold: {})",
            self.regular.is_some(),
            self.bold.is_some()
        );
    }

    pub fn regular(&mut self) -> FontHandle {
        self.initialize();
        self.regular.clone().unwrap_or_else(|| self.fallback.clone())
    }

    pub fn bold(&mut self) -> FontHandle {
        self.initialize();
        self.bold.clone().unwrap_or_else(|| self.fallback.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Drops both faces and restores egui's default fonts. Safe when never loaded.
    pub fn unload(&mut self) {
        if !self.loaded {
            return;
        }
        if self.regular.take().is_some() | self.bold.take().is_some() {
            self.ctx.set_fonts(egui::FontDefinitions::default());
        }
        self.loaded = false;
        log::debug!("Шрифты выгружены");
    }
}

/// Adds a named family for the face at `path`, keeping the proportional
/// fonts behind it for missing glyphs. `None` if the asset is unusable.
fn register_face(fonts: &mut egui::FontDefinitions, name: &str, path: &Path) -> Option<FontHandle> {
    let bytes = match read_font(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("⚠️ Шрифт {} недоступен, используем встроенный: {:#}", name, e);
            return None;
        }
    };

    fonts
        .font_data
        .insert(name.to_owned(), Arc::new(egui::FontData::from_owned(bytes)));

    let mut chain = vec![name.to_owned()];
    if let Some(proportional) = fonts.families.get(&egui::FontFamily::Proportional) {
        chain.extend(proportional.iter().cloned());
    }
    fonts.families.insert(egui::FontFamily::Name(name.into()), chain);

    Some(FontHandle::named(name))
}

fn read_font(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("не удалось прочитать {}", path.display()))?;
    let valid = bytes.len() >= 4 && FONT_SIGNATURES.iter().any(|sig| bytes[..4] == sig[..]);
    if !valid {
        bail!("{} не является файлом шрифта", path.display());
    }
    // egui разбирает шрифт лениво, на первом кадре, и паникует на битых таблицах
    ab_glyph::FontRef::try_from_slice(&bytes)
        .with_context(|| format!("повреждённый файл шрифта {}", path.display()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Copies egui's own proportional face, a real TTF
    fn write_test_font(dir: &Path, name: &str) {
        let defaults = egui::FontDefinitions::default();
        let face = &defaults.families[&egui::FontFamily::Proportional][0];
        let bytes = defaults.font_data[face].font.to_vec();

        let fonts = dir.join("fonts");
        std::fs::create_dir_all(&fonts).unwrap();
        std::fs::write(fonts.join(name), bytes).unwrap();
    }

    /// Valid TrueType signature, garbage tables
    fn write_corrupt_font(dir: &Path, name: &str) {
        let fonts = dir.join("fonts");
        std::fs::create_dir_all(&fonts).unwrap();
        let mut bytes = b"\x00\x01\x00\x00".to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        std::fs::write(fonts.join(name), bytes).unwrap();
    }

    #[test]
    fn missing_assets_fall_back_to_builtin_font() {
        let dir = tempfile::tempdir().unwrap();
        let mut fonts = FontManager::new(
            egui::Context::default(),
            FontPaths::in_assets_dir(dir.path()),
        );

        assert!(fonts.regular().is_fallback());
        assert!(fonts.bold().is_fallback());
        assert!(fonts.is_loaded());
    }

    #[test]
    fn initialize_twice_returns_the_same_handle() {
        let dir = tempfile::tempdir().unwrap();
        write_test_font(dir.path(), "Roboto-Regular.ttf");
        write_test_font(dir.path(), "Roboto-Bold.ttf");
        let mut fonts = FontManager::new(
            egui::Context::default(),
            FontPaths::in_assets_dir(dir.path()),
        );

        fonts.initialize();
        let first = fonts.regular();
        fonts.initialize();
        let second = fonts.regular();

        assert!(first.ptr_eq(&second));
        assert_eq!(first.name(), REGULAR_FAMILY);
        assert!(!first.is_fallback());
        assert_eq!(fonts.bold().name(), BOLD_FAMILY);
    }

    #[test]
    fn invalid_asset_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let fonts_dir = dir.path().join("fonts");
        std::fs::create_dir_all(&fonts_dir).unwrap();
        std::fs::write(fonts_dir.join("Roboto-Regular.ttf"), b"<html>").unwrap();

        let mut fonts = FontManager::new(
            egui::Context::default(),
            FontPaths::in_assets_dir(dir.path()),
        );
        assert!(fonts.regular().is_fallback());
    }

    #[test]
    fn corrupt_asset_falls_back_and_frame_renders() {
        let dir = tempfile::tempdir().unwrap();
        write_corrupt_font(dir.path(), "Roboto-Regular.ttf");
        write_test_font(dir.path(), "Roboto-Bold.ttf");
        let ctx = egui::Context::default();
        let mut fonts = FontManager::new(ctx.clone(), FontPaths::in_assets_dir(dir.path()));

        let regular = fonts.regular();
        let bold = fonts.bold();
        assert!(regular.is_fallback());
        assert!(!bold.is_fallback());

        // Шрифты реально разбираются egui только внутри кадра
        ctx.run(egui::RawInput::default(), |ctx| {
            let font = egui::FontId::new(16.0, bold.family().clone());
            let size = ctx.fonts(|f| {
                f.layout_no_wrap("Counter: 1".to_string(), font, egui::Color32::WHITE)
                    .size()
            });
            assert!(size.x > 0.0);
        });
    }

    #[test]
    fn unload_is_safe_and_resets_state() {
        let dir = tempfile::tempdir().unwrap();
        write_test_font(dir.path(), "Roboto-Bold.ttf");
        let mut fonts = FontManager::new(
            egui::Context::default(),
            FontPaths::in_assets_dir(dir.path()),
        );

        fonts.unload();
        assert!(!fonts.is_loaded());

        let bold = fonts.bold();
        assert!(!bold.is_fallback());
        fonts.unload();
        assert!(!fonts.is_loaded());

        // Повторная загрузка создаёт новый дескриптор
        assert!(!fonts.bold().ptr_eq(&bold));
    }
}
