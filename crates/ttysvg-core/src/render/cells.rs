//! Cell-granularity layers: one element per cell interval.

use std::io::Write;

use super::LayerSource;
use super::RenderContext;
use super::markup;
use crate::cell_recorder::CellRecorder;
use crate::error::RenderError;

impl LayerSource for CellRecorder {
    fn cols(&self) -> usize {
        CellRecorder::cols(self)
    }

    fn rows(&self) -> usize {
        CellRecorder::rows(self)
    }

    fn final_time(&self) -> Option<f64> {
        CellRecorder::final_time(self)
    }

    fn write_background(
        &self,
        out: &mut dyn Write,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let geometry = &ctx.geometry;
        for ((row, col), timeline) in self.timelines() {
            for interval in timeline.intervals() {
                let dur = interval.duration().ok_or(RenderError::OpenInterval {
                    unit: row * geometry.cols + col,
                })?;
                let cell = &interval.value;
                if cell.bg.is_default_background() {
                    continue;
                }
                writeln!(out, "<g display='none'>")?;
                writeln!(
                    out,
                    "<rect x='{}' y='{}' width='{}' height='{}' fill='#{}'/>",
                    markup::num(geometry.x(col)),
                    markup::num(geometry.y(row)),
                    markup::num(geometry.dx),
                    markup::num(geometry.dy),
                    ctx.palette.resolve(cell.bg)
                )?;
                markup::reveal(out, interval.begin, dur)?;
                writeln!(out, "</g>")?;
            }
        }
        Ok(())
    }

    fn write_text(&self, out: &mut dyn Write, ctx: &RenderContext<'_>) -> Result<(), RenderError> {
        let geometry = &ctx.geometry;
        for ((row, col), timeline) in self.timelines() {
            for interval in timeline.intervals() {
                let dur = interval.duration().ok_or(RenderError::OpenInterval {
                    unit: row * geometry.cols + col,
                })?;
                let cell = &interval.value;
                if !cell.has_glyph() {
                    continue;
                }
                let mut glyph = String::new();
                markup::push_glyphs(&mut glyph, cell.ch.encode_utf8(&mut [0; 4]));
                write!(
                    out,
                    "<text x='{}' y='{}' dominant-baseline='text-before-edge'{} display='none'>{}",
                    markup::num(geometry.x(col)),
                    markup::num(geometry.y(row)),
                    markup::style_attrs(&cell.style(), ctx.palette),
                    glyph
                )?;
                markup::reveal(out, interval.begin, dur)?;
                writeln!(out, "</text>")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::Recorder;
    use crate::render::Geometry;
    use crate::render::Palette;
    use crate::render::RenderOptions;
    use crate::render::SvgRenderer;
    use crate::screen::Cell;
    use crate::screen::Screen;
    use crate::style::ColorRef;

    fn layers(recorder: &CellRecorder) -> (String, String) {
        let palette = Palette::default();
        let ctx = RenderContext {
            geometry: Geometry {
                cols: recorder.cols(),
                rows: recorder.rows(),
                dx: 7.5,
                dy: 15.0,
            },
            palette: &palette,
        };
        let mut background = Vec::new();
        let mut text = Vec::new();
        recorder
            .write_background(&mut background, &ctx)
            .expect("background");
        recorder.write_text(&mut text, &ctx).expect("text");
        (
            String::from_utf8(background).expect("utf8"),
            String::from_utf8(text).expect("utf8"),
        )
    }

    #[test]
    fn test_one_element_per_glyph() {
        let mut recorder = CellRecorder::new(3, 2);
        recorder.sample(&Screen::from_lines(3, &["a&", " b"]), 0.0);
        recorder.finalize(1.0);

        let (background, text) = layers(&recorder);
        assert!(background.is_empty());
        assert_eq!(text.matches("<text ").count(), 3);
        assert!(text.contains("<text x='8.5' y='1' dominant-baseline='text-before-edge' display='none'>&amp;"));
        assert!(text.contains("x='8.5' y='16'"));
    }

    #[test]
    fn test_colored_space_renders_background_only() {
        let mut screen = Screen::new(2, 1);
        screen.set(
            0,
            1,
            Cell {
                bg: ColorRef::Indexed(2),
                ..Cell::BLANK
            },
        );
        let mut recorder = CellRecorder::new(2, 1);
        recorder.sample(&screen, 0.5);
        recorder.finalize(1.5);

        let (background, text) = layers(&recorder);
        assert!(text.is_empty());
        assert!(background.contains("<rect x='8.5' y='1' width='7.5' height='15' fill='#00cd00'/>"));
        assert!(background.contains("begin='start.begin+0.5' dur='1'"));
    }

    #[test]
    fn test_styled_glyph_attributes() {
        let mut screen = Screen::new(1, 1);
        screen.set(
            0,
            0,
            Cell {
                fg: ColorRef::Rgb(255, 128, 0),
                underline: true,
                ..Cell::new('x')
            },
        );
        let mut recorder = CellRecorder::new(1, 1);
        recorder.sample(&screen, 0.0);
        recorder.finalize(1.0);

        let (_, text) = layers(&recorder);
        assert!(text.contains(" fill='#ff8000' text-decoration='underline' display='none'>x"));
    }

    #[test]
    fn test_open_cell_interval_reports_unit() {
        let mut recorder = CellRecorder::new(3, 2);
        recorder.sample(&Screen::from_lines(3, &["", "  z"]), 0.0);
        let palette = Palette::default();
        let ctx = RenderContext {
            geometry: Geometry {
                cols: 3,
                rows: 2,
                dx: 7.5,
                dy: 15.0,
            },
            palette: &palette,
        };
        let mut out = Vec::new();
        let err = recorder.write_text(&mut out, &ctx).expect_err("open");
        assert!(matches!(err, RenderError::OpenInterval { unit: 5 }));
    }

    #[test]
    fn test_full_document_at_cell_granularity() {
        let mut recorder = CellRecorder::new(2, 1);
        recorder.sample(&Screen::from_lines(2, &["hi"]), 0.0);
        recorder.finalize(1.0);

        let mut out = Vec::new();
        SvgRenderer::new(&RenderOptions::default())
            .render(&mut out, &recorder)
            .expect("render");
        let doc = String::from_utf8(out).expect("utf8");
        assert_eq!(doc.matches("display='none'").count(), 2);
        assert!(doc.contains("dur='1' />"));
    }
}
