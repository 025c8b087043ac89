// Полная таблица палитры, не все оттенки задействованы на экране
#![allow(dead_code)]

/// Палитра цветов, сгруппированная по назначению
use eframe::egui::Color32;

/// Основные цвета бренда
pub mod primary {
    use super::Color32;

    pub const STEEL: Color32 = Color32::from_rgb(70, 130, 180);
    pub const STEEL_LIGHT: Color32 = Color32::from_rgb(100, 149, 237);
    pub const STEEL_DARK: Color32 = Color32::from_rgb(45, 100, 145);
    pub const WHITE: Color32 = Color32::from_rgb(255, 255, 255);
    pub const BLACK: Color32 = Color32::from_rgb(0, 0, 0);
}

/// Button color schemes (default, success, warning, danger)
pub mod button {
    use super::{primary, Color32};

    pub const DEFAULT: Color32 = primary::STEEL;
    pub const DEFAULT_HOVER: Color32 = primary::STEEL_LIGHT;
    pub const DEFAULT_PRESSED: Color32 = primary::STEEL_DARK;

    pub const SUCCESS: Color32 = Color32::from_rgb(76, 175, 80);
    pub const SUCCESS_HOVER: Color32 = Color32::from_rgb(102, 187, 106);
    pub const SUCCESS_PRESSED: Color32 = Color32::from_rgb(56, 142, 60);

    pub const WARNING: Color32 = Color32::from_rgb(255, 152, 0);
    pub const WARNING_HOVER: Color32 = Color32::from_rgb(255, 183, 77);
    pub const WARNING_PRESSED: Color32 = Color32::from_rgb(239, 108, 0);

    pub const DANGER: Color32 = Color32::from_rgb(244, 67, 54);
    pub const DANGER_HOVER: Color32 = Color32::from_rgb(239, 83, 80);
    pub const DANGER_PRESSED: Color32 = Color32::from_rgb(198, 40, 40);
}

pub mod text {
    use super::{primary, Color32};

    pub const PRIMARY: Color32 = Color32::from_rgb(33, 33, 33);
    pub const SECONDARY: Color32 = Color32::from_rgb(117, 117, 117);
    pub const LIGHT: Color32 = Color32::from_rgb(189, 189, 189);
    /// Белый текст на тёмном фоне
    pub const ON_DARK: Color32 = Color32::from_rgb(255, 255, 255);
    pub const LINK: Color32 = primary::STEEL;
}

pub mod background {
    use super::Color32;

    pub const LIGHT: Color32 = Color32::from_rgb(250, 250, 250);
    pub const MEDIUM: Color32 = Color32::from_rgb(245, 245, 245);
    pub const DARK: Color32 = Color32::from_rgb(33, 33, 33);
    pub const SURFACE: Color32 = Color32::from_rgb(255, 255, 255);
    /// Полупрозрачный чёрный (premultiplied совпадает с unmultiplied для чёрного)
    pub const OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 128);
}

pub mod status {
    use super::{primary, Color32};

    pub const SUCCESS: Color32 = Color32::from_rgb(76, 175, 80);
    pub const WARNING: Color32 = Color32::from_rgb(255, 193, 7);
    pub const ERROR: Color32 = Color32::from_rgb(244, 67, 54);
    pub const INFO: Color32 = primary::STEEL;
}

pub mod border {
    use super::Color32;

    pub const DEFAULT: Color32 = Color32::from_rgb(100, 100, 100);
}

/// Neutral grays for borders and dividers
pub mod gray {
    use super::Color32;

    pub const GRAY_50: Color32 = Color32::from_rgb(250, 250, 250);
    pub const GRAY_100: Color32 = Color32::from_rgb(245, 245, 245);
    pub const GRAY_200: Color32 = Color32::from_rgb(238, 238, 238);
    pub const GRAY_300: Color32 = Color32::from_rgb(224, 224, 224);
    pub const GRAY_400: Color32 = Color32::from_rgb(189, 189, 189);
    pub const GRAY_500: Color32 = Color32::from_rgb(158, 158, 158);
    pub const GRAY_600: Color32 = Color32::from_rgb(117, 117, 117);
    pub const GRAY_700: Color32 = Color32::from_rgb(97, 97, 97);
    pub const GRAY_800: Color32 = Color32::from_rgb(66, 66, 66);
    pub const GRAY_900: Color32 = Color32::from_rgb(33, 33, 33);
}

/// Scales the RGB channels of `color` by `factor` (< 1.0 darker, > 1.0 lighter).
///
/// Each channel is clamped to `0..=255` before conversion, alpha is kept as is.
pub fn adjust_brightness(color: Color32, factor: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let scale = |channel: u8| (channel as f32 * factor).clamp(0.0, 255.0) as u8;
    Color32::from_rgba_unmultiplied(scale(r), scale(g), scale(b), a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darkening_scales_channels() {
        let c = adjust_brightness(Color32::from_rgb(100, 200, 50), 0.5);
        assert_eq!(c, Color32::from_rgb(50, 100, 25));
    }

    #[test]
    fn unit_factor_is_identity() {
        let c = Color32::from_rgb(200, 255, 128);
        assert_eq!(adjust_brightness(c, 1.0), c);
    }

    #[test]
    fn brightening_never_exceeds_255() {
        for factor in [1.5, 2.0, 10.0, 1000.0, f32::MAX] {
            let c = adjust_brightness(Color32::from_rgb(200, 255, 128), factor);
            assert_eq!(c.r(), 255);
            assert_eq!(c.g(), 255);
            assert!(c.b() >= 128);
        }
    }

    #[test]
    fn negative_factor_clamps_to_black() {
        let c = adjust_brightness(button::DANGER, -3.0);
        assert_eq!(c, Color32::from_rgb(0, 0, 0));
    }

    #[test]
    fn alpha_is_preserved() {
        let c = adjust_brightness(Color32::from_rgba_unmultiplied(80, 80, 80, 255), 0.8);
        assert_eq!(c.a(), 255);
    }
}
