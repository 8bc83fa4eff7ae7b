//! SVG assembly.
//!
//! Every recorded interval becomes a hidden element whose `<set>` child shows
//! it for `[begin, end)` of the loop. All reveals are relative to the `start`
//! trigger, which re-fires whenever the progress bar animation ends, so the
//! document loops without any scripting.

mod cells;
mod markup;
mod options;
mod rows;

use std::io::Write;

use tracing::debug;

use crate::error::RenderError;

pub use options::Advertisement;
pub use options::FontOptions;
pub use options::InvalidOption;
pub use options::Palette;
pub use options::ProgressOptions;
pub use options::RenderOptions;

/// Pixel layout of the character grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub cols: usize,
    pub rows: usize,
    pub dx: f64,
    pub dy: f64,
}

impl Geometry {
    pub fn x(&self, col: usize) -> f64 {
        1.0 + col as f64 * self.dx
    }

    pub fn y(&self, row: usize) -> f64 {
        1.0 + row as f64 * self.dy
    }

    pub fn grid_width(&self) -> f64 {
        self.dx * self.cols as f64
    }

    pub fn grid_height(&self) -> f64 {
        self.dy * self.rows as f64
    }
}

/// What a layer writer needs to turn intervals into markup.
pub struct RenderContext<'a> {
    pub geometry: Geometry,
    pub palette: &'a Palette,
}

/// A finalized recording that can write the two animated layers.
pub trait LayerSource {
    fn cols(&self) -> usize;

    fn rows(&self) -> usize;

    /// The loop length; `None` until the recording has been finalized.
    fn final_time(&self) -> Option<f64>;

    fn write_background(
        &self,
        out: &mut dyn Write,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError>;

    fn write_text(&self, out: &mut dyn Write, ctx: &RenderContext<'_>) -> Result<(), RenderError>;
}

pub struct SvgRenderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    /// Width and height of the whole document for a `cols x rows` grid.
    pub fn document_size(&self, cols: usize, rows: usize) -> (f64, f64) {
        let (width, height) = self.content_size(cols, rows);
        (width + self.options.font.size + 1.0, height + 1.0)
    }

    fn content_size(&self, cols: usize, rows: usize) -> (f64, f64) {
        let font = &self.options.font;
        (
            1.0 + font.dx * (cols as f64 + 0.5),
            1.0 + font.dy * (rows as f64 + 0.5) + self.options.progress.height,
        )
    }

    pub fn render(&self, out: &mut dyn Write, source: &dyn LayerSource) -> Result<(), RenderError> {
        let final_time = source.final_time().ok_or(RenderError::NotFinalized)?;
        let (cols, rows) = (source.cols(), source.rows());
        let ctx = RenderContext {
            geometry: Geometry {
                cols,
                rows,
                dx: self.options.font.dx,
                dy: self.options.font.dy,
            },
            palette: &self.options.palette,
        };
        debug!(cols, rows, final_time, "rendering document");

        self.write_header(out, cols, rows)?;
        if let Some(ad) = &self.options.advertisement {
            self.write_advertisement(out, ad, cols, rows)?;
        }

        writeln!(out, "<!-- Background -->")?;
        writeln!(
            out,
            "<rect x='0' y='0' width='{}' height='{}' fill='#{}'/>",
            markup::num(ctx.geometry.grid_width() + 2.0),
            markup::num(ctx.geometry.grid_height() + 2.0),
            self.options.palette.background
        )?;
        source.write_background(out, &ctx)?;

        writeln!(out, "<!-- Text -->")?;
        writeln!(out, "<g>")?;
        source.write_text(out, &ctx)?;
        writeln!(out, "</g>")?;

        self.write_progress(out, &ctx.geometry, final_time)?;
        writeln!(out, "</svg>")?;
        out.flush()?;
        Ok(())
    }

    fn write_header(&self, out: &mut dyn Write, cols: usize, rows: usize) -> Result<(), RenderError> {
        let font = &self.options.font;
        let (width, height) = self.document_size(cols, rows);
        writeln!(
            out,
            "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'"
        )?;
        writeln!(
            out,
            " font-family='{}' font-size='{}' fill='#{}' width='{}' height='{}'>",
            markup::escape(&font.family),
            markup::num(font.size),
            self.options.palette.foreground,
            markup::num(width),
            markup::num(height)
        )?;
        writeln!(out, "<!-- Cycling -->")?;
        writeln!(out, "<text>")?;
        writeln!(
            out,
            " <set id='start' attributeName='visibility' attributeType='XML' to='visible' begin='0; progress.end' dur='0'/>"
        )?;
        writeln!(out, "</text>")?;
        Ok(())
    }

    fn write_advertisement(
        &self,
        out: &mut dyn Write,
        ad: &Advertisement,
        cols: usize,
        rows: usize,
    ) -> Result<(), RenderError> {
        let (x, y) = self.content_size(cols, rows);
        let (x, y) = (markup::num(x), markup::num(y));
        let linked = !ad.url.is_empty();

        writeln!(out, "<!-- Advertisement -->")?;
        if linked {
            writeln!(
                out,
                "<a xlink:href='{}' xlink:show='new'>",
                markup::escape(&ad.url)
            )?;
        }
        writeln!(
            out,
            " <text x='{x}' y='{y}' transform='rotate(-90, {x}, {y})' fill='#000000' dominant-baseline='text-before-edge' font-size='{}'>{}</text>",
            markup::num((self.options.font.size * 0.75).floor()),
            markup::escape(&ad.text)
        )?;
        if linked {
            writeln!(out, "</a>")?;
        }
        Ok(())
    }

    fn write_progress(
        &self,
        out: &mut dyn Write,
        geometry: &Geometry,
        final_time: f64,
    ) -> Result<(), RenderError> {
        let progress = &self.options.progress;
        let y = markup::num(1.0 + geometry.dy * (geometry.rows as f64 + 0.5));
        let width = markup::num(geometry.grid_width());
        let height = markup::num(progress.height);

        writeln!(out, "<!-- Progress -->")?;
        writeln!(
            out,
            "<rect x='1' y='{y}' width='{width}' height='{height}' style='stroke:#{}; fill:none' />",
            progress.color
        )?;
        writeln!(
            out,
            "<rect x='1' y='{y}' width='0' height='{height}' fill='#{}'>",
            progress.color
        )?;
        writeln!(
            out,
            " <animate id='progress' attributeName='width' attributeType='XML' from='0' to='{width}' fill='freeze' begin='start.begin' dur='{}' />",
            markup::duration(final_time)
        )?;
        writeln!(out, "</rect>")?;
        Ok(())
    }
}
