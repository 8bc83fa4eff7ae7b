use tracing::trace;
use ttysvg_core::CellUpdate;
use ttysvg_core::ColorRef;
use ttysvg_core::EmulationAdapter;
use vt100::Parser;

/// Replay only ever needs the visible grid.
const SCROLLBACK: usize = 0;

pub struct VirtualTerminal {
    parser: Parser,
    cols: u16,
    rows: u16,
}

impl VirtualTerminal {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            parser: Parser::new(rows, cols, SCROLLBACK),
            cols,
            rows,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// The visible text with trailing blanks and empty trailing lines
    /// trimmed.
    pub fn screen_text(&self) -> String {
        let screen = self.parser.screen();
        let (rows, cols) = screen.size();

        let mut lines = Vec::new();
        for row in 0..rows {
            let line: String = (0..cols)
                .map(|col| screen.cell(row, col).map_or(' ', cell_char))
                .collect();
            lines.push(line.trim_end().to_string());
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }
}

impl EmulationAdapter for VirtualTerminal {
    fn resize(&mut self, cols: u16, rows: u16) {
        self.parser.set_size(rows, cols);
        self.cols = cols;
        self.rows = rows;
    }

    fn feed(&mut self, bytes: &[u8]) {
        trace!(len = bytes.len(), "feeding emulator");
        self.parser.process(bytes);
    }

    fn rescan(&self, visit: &mut dyn FnMut(CellUpdate)) {
        let screen = self.parser.screen();
        let (rows, cols) = screen.size();
        for row in 0..rows {
            for col in 0..cols {
                let Some(cell) = screen.cell(row, col) else {
                    continue;
                };
                visit(CellUpdate {
                    col,
                    row,
                    ch: cell_char(cell),
                    fg: convert_color(cell.fgcolor(), ColorRef::DefaultForeground),
                    bg: convert_color(cell.bgcolor(), ColorRef::DefaultBackground),
                    bold: cell.bold(),
                    underline: cell.underline(),
                    inverse: cell.inverse(),
                });
            }
        }
    }
}

/// Empty cells and the right half of wide glyphs read as spaces.
fn cell_char(cell: &vt100::Cell) -> char {
    if cell.is_wide_continuation() {
        return ' ';
    }
    cell.contents().chars().next().unwrap_or(' ')
}

fn convert_color(color: vt100::Color, default: ColorRef) -> ColorRef {
    match color {
        vt100::Color::Default => default,
        vt100::Color::Idx(idx) => ColorRef::Indexed(idx),
        vt100::Color::Rgb(r, g, b) => ColorRef::Rgb(r, g, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updates(term: &VirtualTerminal) -> Vec<CellUpdate> {
        let mut out = Vec::new();
        term.rescan(&mut |update: CellUpdate| out.push(update));
        out
    }

    fn at(updates: &[CellUpdate], row: u16, col: u16) -> CellUpdate {
        *updates
            .iter()
            .find(|u| u.row == row && u.col == col)
            .expect("cell reported")
    }

    #[test]
    fn test_basic_terminal() {
        let mut term = VirtualTerminal::new(80, 24);
        term.feed(b"Hello, World!");
        assert_eq!(term.screen_text(), "Hello, World!");
    }

    #[test]
    fn test_rescan_reports_every_cell() {
        let mut term = VirtualTerminal::new(10, 3);
        term.feed(b"ab\r\ncd");
        let cells = updates(&term);
        assert_eq!(cells.len(), 30);
        assert_eq!(at(&cells, 1, 1).ch, 'd');
        assert_eq!(at(&cells, 2, 9).ch, ' ');
    }

    #[test]
    fn test_attributes() {
        let mut term = VirtualTerminal::new(20, 2);
        term.feed(b"\x1b[1;4;31;42mB\x1b[0m\x1b[7mI\x1b[0mN");
        let cells = updates(&term);

        let bold = at(&cells, 0, 0);
        assert!(bold.bold && bold.underline && !bold.inverse);
        assert_eq!(bold.fg, ColorRef::Indexed(1));
        assert_eq!(bold.bg, ColorRef::Indexed(2));

        let inverse = at(&cells, 0, 1);
        assert!(inverse.inverse);
        assert_eq!(inverse.fg, ColorRef::DefaultForeground);
        assert_eq!(inverse.bg, ColorRef::DefaultBackground);

        let plain = at(&cells, 0, 2);
        assert!(!plain.bold && !plain.inverse);
    }

    #[test]
    fn test_extended_colors() {
        let mut term = VirtualTerminal::new(10, 1);
        term.feed(b"\x1b[38;5;196mx\x1b[38;2;1;2;3my");
        let cells = updates(&term);
        assert_eq!(at(&cells, 0, 0).fg, ColorRef::Indexed(196));
        assert_eq!(at(&cells, 0, 1).fg, ColorRef::Rgb(1, 2, 3));
    }

    #[test]
    fn test_wide_glyph_continuation_is_blank() {
        let mut term = VirtualTerminal::new(10, 1);
        term.feed("漢a".as_bytes());
        let cells = updates(&term);
        assert_eq!(at(&cells, 0, 0).ch, '漢');
        assert_eq!(at(&cells, 0, 1).ch, ' ');
        assert_eq!(at(&cells, 0, 2).ch, 'a');
    }

    #[test]
    fn test_resize() {
        let mut term = VirtualTerminal::new(80, 24);
        term.resize(4, 2);
        assert_eq!(term.size(), (4, 2));
        assert_eq!(updates(&term).len(), 8);
    }

    #[test]
    fn test_clear_screen() {
        let mut term = VirtualTerminal::new(10, 2);
        term.feed(b"junk\x1b[2J\x1b[H");
        assert_eq!(term.screen_text(), "");
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rescan_covers_the_grid(
                cols in 1u16..40,
                rows in 1u16..10,
                input in proptest::collection::vec(any::<u8>(), 0..256),
            ) {
                let mut term = VirtualTerminal::new(cols, rows);
                term.feed(&input);
                let cells = updates(&term);
                prop_assert_eq!(cells.len(), cols as usize * rows as usize);
                prop_assert!(cells.iter().all(|u| u.col < cols && u.row < rows));
            }
        }
    }
}
