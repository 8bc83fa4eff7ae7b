use crate::emulator::CellUpdate;
use crate::style::ColorRef;
use crate::style::TextStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub fg: ColorRef,
    pub bg: ColorRef,
    pub bold: bool,
    pub underline: bool,
}

impl Cell {
    /// A space with default attributes: the "nothing interesting" cell.
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: ColorRef::DefaultForeground,
        bg: ColorRef::DefaultBackground,
        bold: false,
        underline: false,
    };

    pub fn new(ch: char) -> Self {
        Self { ch, ..Self::BLANK }
    }

    pub fn style(&self) -> TextStyle {
        TextStyle {
            fg: self.fg,
            bold: self.bold,
            underline: self.underline,
        }
    }

    pub fn has_glyph(&self) -> bool {
        self.ch != ' '
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// One sampled `rows × cols` grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Screen {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        if row >= self.rows {
            return &[];
        }
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Writes one cell. Out-of-range positions are discarded and reported
    /// as `false`.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.cells[row * self.cols + col] = cell;
        true
    }

    pub fn apply(&mut self, update: CellUpdate) -> bool {
        self.set(update.row as usize, update.col as usize, update.into_cell())
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Builds a screen from text lines, padding or truncating each to `cols`.
    pub fn from_lines(cols: usize, lines: &[&str]) -> Self {
        let mut screen = Self::new(cols, lines.len());
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().take(cols).enumerate() {
                screen.set(row, col, Cell::new(ch));
            }
        }
        screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_screen_is_blank() {
        let screen = Screen::new(3, 2);
        assert_eq!(screen.cols(), 3);
        assert_eq!(screen.rows(), 2);
        assert!(screen.row(1).iter().all(|c| *c == Cell::BLANK));
    }

    #[test]
    fn test_out_of_range_writes_are_discarded() {
        let mut screen = Screen::new(2, 1);
        assert!(!screen.set(1, 0, Cell::new('x')));
        assert!(!screen.set(0, 2, Cell::new('x')));
        assert!(screen.set(0, 1, Cell::new('x')));
        assert_eq!(screen.cell(0, 1).map(|c| c.ch), Some('x'));
        assert!(screen.cell(0, 2).is_none());
        assert!(screen.row(5).is_empty());
    }

    #[test]
    fn test_from_lines_pads_and_truncates() {
        let screen = Screen::from_lines(3, &["ab", "wxyz"]);
        assert_eq!(screen.cell(0, 2).map(|c| c.ch), Some(' '));
        assert_eq!(screen.cell(1, 2).map(|c| c.ch), Some('y'));
    }

    #[test]
    fn test_clear_resets_cells() {
        let mut screen = Screen::from_lines(2, &["hi"]);
        screen.clear();
        assert!(screen.row(0).iter().all(|c| !c.has_glyph()));
    }

    #[test]
    fn test_apply_swaps_inverse_colors() {
        let mut screen = Screen::new(1, 1);
        let update = CellUpdate {
            col: 0,
            row: 0,
            ch: 'I',
            fg: ColorRef::Indexed(1),
            bg: ColorRef::DefaultBackground,
            bold: false,
            underline: false,
            inverse: true,
        };
        assert!(screen.apply(update));
        let cell = screen.cell(0, 0).copied().unwrap_or_default();
        assert_eq!(cell.fg, ColorRef::DefaultBackground);
        assert_eq!(cell.bg, ColorRef::Indexed(1));
    }
}
