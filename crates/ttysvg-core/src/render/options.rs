use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::style::ColorRef;

/// Cube steps of the xterm 256-color palette.
const CUBE_LEVELS: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid value for `{field}`: {reason}")]
pub struct InvalidOption {
    pub field: &'static str,
    pub reason: String,
}

/// Everything the renderer needs besides the timelines themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    pub font: FontOptions,
    pub palette: Palette,
    pub progress: ProgressOptions,
    pub advertisement: Option<Advertisement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontOptions {
    pub family: String,
    pub size: f64,
    /// Cell width in pixels.
    pub dx: f64,
    /// Cell height in pixels.
    pub dy: f64,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            family: "DejaVu Sans Mono, monospace".to_string(),
            size: 12.0,
            dx: 7.5,
            dy: 15.0,
        }
    }
}

/// Hex codes (`rrggbb`, no leading `#`) of the eight ANSI colors plus the
/// default foreground and background. Bright variants reuse the base entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub black: String,
    pub red: String,
    pub green: String,
    pub yellow: String,
    pub blue: String,
    pub magenta: String,
    pub cyan: String,
    pub white: String,
    pub foreground: String,
    pub background: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            black: "000000".to_string(),
            red: "cd0000".to_string(),
            green: "00cd00".to_string(),
            yellow: "cdcd00".to_string(),
            blue: "0000ee".to_string(),
            magenta: "cd00cd".to_string(),
            cyan: "00cdcd".to_string(),
            white: "e5e5e5".to_string(),
            foreground: "e5e5e5".to_string(),
            background: "000000".to_string(),
        }
    }
}

impl Palette {
    fn base(&self, index: u8) -> &str {
        match index % 8 {
            0 => &self.black,
            1 => &self.red,
            2 => &self.green,
            3 => &self.yellow,
            4 => &self.blue,
            5 => &self.magenta,
            6 => &self.cyan,
            _ => &self.white,
        }
    }

    /// Hex code for `color`.
    pub fn resolve(&self, color: ColorRef) -> String {
        match color {
            ColorRef::DefaultForeground => self.foreground.clone(),
            ColorRef::DefaultBackground => self.background.clone(),
            ColorRef::Indexed(index @ 0..=15) => self.base(index).to_string(),
            ColorRef::Indexed(index @ 16..=231) => {
                let n = index - 16;
                hex(
                    CUBE_LEVELS[(n / 36) as usize],
                    CUBE_LEVELS[((n / 6) % 6) as usize],
                    CUBE_LEVELS[(n % 6) as usize],
                )
            }
            ColorRef::Indexed(index) => {
                let level = 8 + 10 * (index - 232);
                hex(level, level, level)
            }
            ColorRef::Rgb(r, g, b) => hex(r, g, b),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 10] {
        [
            ("palette.black", self.black.as_str()),
            ("palette.red", self.red.as_str()),
            ("palette.green", self.green.as_str()),
            ("palette.yellow", self.yellow.as_str()),
            ("palette.blue", self.blue.as_str()),
            ("palette.magenta", self.magenta.as_str()),
            ("palette.cyan", self.cyan.as_str()),
            ("palette.white", self.white.as_str()),
            ("palette.foreground", self.foreground.as_str()),
            ("palette.background", self.background.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressOptions {
    pub height: f64,
    pub color: String,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            height: 5.0,
            color: "0000cc".to_string(),
        }
    }
}

/// Optional credit printed vertically in the right margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Advertisement {
    pub text: String,
    #[serde(default)]
    pub url: String,
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), InvalidOption> {
        positive("font.size", self.font.size)?;
        positive("font.dx", self.font.dx)?;
        positive("font.dy", self.font.dy)?;
        if self.progress.height < 0.0 || !self.progress.height.is_finite() {
            return Err(InvalidOption {
                field: "progress.height",
                reason: format!("expected a non-negative number, got {}", self.progress.height),
            });
        }
        if self.font.family.trim().is_empty() {
            return Err(InvalidOption {
                field: "font.family",
                reason: "must not be empty".to_string(),
            });
        }
        for (field, value) in self.palette.entries() {
            hex_code(field, value)?;
        }
        hex_code("progress.color", &self.progress.color)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), InvalidOption> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(InvalidOption {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

fn hex_code(field: &'static str, value: &str) -> Result<(), InvalidOption> {
    if value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(InvalidOption {
            field,
            reason: format!("expected six hex digits without `#`, got `{value}`"),
        })
    }
}

fn hex(r: u8, g: u8, b: u8) -> String {
    format!("{r:02x}{g:02x}{b:02x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(RenderOptions::default().validate(), Ok(()));
    }

    #[test]
    fn test_bright_colors_share_base_entry() {
        let palette = Palette::default();
        assert_eq!(palette.resolve(ColorRef::Indexed(1)), "cd0000");
        assert_eq!(palette.resolve(ColorRef::Indexed(9)), "cd0000");
        assert_eq!(palette.resolve(ColorRef::Indexed(15)), palette.white);
    }

    #[test]
    fn test_default_refs_resolve_to_fg_bg() {
        let palette = Palette {
            foreground: "aabbcc".into(),
            background: "112233".into(),
            ..Palette::default()
        };
        assert_eq!(palette.resolve(ColorRef::DefaultForeground), "aabbcc");
        assert_eq!(palette.resolve(ColorRef::DefaultBackground), "112233");
    }

    #[test]
    fn test_extended_palette() {
        let palette = Palette::default();
        assert_eq!(palette.resolve(ColorRef::Indexed(16)), "000000");
        assert_eq!(palette.resolve(ColorRef::Indexed(196)), "ff0000");
        assert_eq!(palette.resolve(ColorRef::Indexed(232)), "080808");
        assert_eq!(palette.resolve(ColorRef::Indexed(255)), "eeeeee");
        assert_eq!(palette.resolve(ColorRef::Rgb(1, 2, 255)), "0102ff");
    }

    #[test]
    fn test_rejects_bad_hex() {
        let options = RenderOptions {
            palette: Palette {
                red: "#ff0000".into(),
                ..Palette::default()
            },
            ..RenderOptions::default()
        };
        let err = options.validate().expect_err("invalid");
        assert_eq!(err.field, "palette.red");
    }

    #[test]
    fn test_rejects_zero_cell_width() {
        let mut options = RenderOptions::default();
        options.font.dx = 0.0;
        assert_eq!(
            options.validate().map_err(|e| e.field),
            Err("font.dx")
        );
    }

    #[test]
    fn test_deserializes_partial_toml() {
        let options: RenderOptions = toml::from_str(
            r#"
            [font]
            size = 16
            [palette]
            background = "101010"
            [advertisement]
            text = "made with ttysvg"
            "#,
        )
        .expect("parse");
        assert_eq!(options.font.size, 16.0);
        assert_eq!(options.font.dx, FontOptions::default().dx);
        assert_eq!(options.palette.background, "101010");
        assert_eq!(options.palette.red, Palette::default().red);
        assert_eq!(
            options.advertisement.map(|ad| ad.url),
            Some(String::new())
        );
    }
}
