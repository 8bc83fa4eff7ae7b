use crate::screen::Cell;
use crate::style::ColorRef;

/// One visible cell reported during a rescan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellUpdate {
    pub col: u16,
    pub row: u16,
    pub ch: char,
    pub fg: ColorRef,
    pub bg: ColorRef,
    pub bold: bool,
    pub underline: bool,
    pub inverse: bool,
}

impl CellUpdate {
    /// Resolves inverse video by swapping foreground and background.
    pub fn into_cell(self) -> Cell {
        let (fg, bg) = if self.inverse {
            (self.bg, self.fg)
        } else {
            (self.fg, self.bg)
        };
        Cell {
            ch: self.ch,
            fg,
            bg,
            bold: self.bold,
            underline: self.underline,
        }
    }
}

/// A virtual terminal that interprets control sequences on our behalf.
///
/// The scheduler only ever feeds bytes in order and asks for a full rescan;
/// how cursor motion, scrolling or SGR attributes work is entirely up to the
/// implementation.
pub trait EmulationAdapter {
    fn resize(&mut self, cols: u16, rows: u16);

    fn feed(&mut self, bytes: &[u8]);

    /// Reports every visible cell of the current screen to `visit`.
    fn rescan(&self, visit: &mut dyn FnMut(CellUpdate));
}

impl<T: EmulationAdapter + ?Sized> EmulationAdapter for &mut T {
    fn resize(&mut self, cols: u16, rows: u16) {
        (**self).resize(cols, rows);
    }

    fn feed(&mut self, bytes: &[u8]) {
        (**self).feed(bytes);
    }

    fn rescan(&self, visit: &mut dyn FnMut(CellUpdate)) {
        (**self).rescan(visit);
    }
}
