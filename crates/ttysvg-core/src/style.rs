/// A color as reported by the terminal emulator.
///
/// The two default references stay symbolic until render time so that the
/// configured foreground/background hex codes apply, including after an
/// inverse-video swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorRef {
    DefaultForeground,
    DefaultBackground,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl ColorRef {
    pub fn is_default_background(&self) -> bool {
        matches!(self, ColorRef::DefaultBackground)
    }

    pub fn is_default_foreground(&self) -> bool {
        matches!(self, ColorRef::DefaultForeground)
    }
}

/// Attribute run key of the text layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub fg: ColorRef,
    pub bold: bool,
    pub underline: bool,
}

impl TextStyle {
    pub const PLAIN: TextStyle = TextStyle {
        fg: ColorRef::DefaultForeground,
        bold: false,
        underline: false,
    };

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::PLAIN
    }
}
