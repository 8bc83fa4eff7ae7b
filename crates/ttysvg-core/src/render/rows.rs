//! Row-granularity layers: one element per row interval.

use std::io::Write;

use super::LayerSource;
use super::RenderContext;
use super::markup;
use crate::error::RenderError;
use crate::row::BackgroundRuns;
use crate::row::RowReducer;
use crate::row::RowState;
use crate::row::TextRun;
use crate::timeline::Timeline;

impl LayerSource for RowReducer {
    fn cols(&self) -> usize {
        RowReducer::cols(self)
    }

    fn rows(&self) -> usize {
        RowReducer::rows(self)
    }

    fn final_time(&self) -> Option<f64> {
        RowReducer::final_time(self)
    }

    fn write_background(
        &self,
        out: &mut dyn Write,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        write_layer(out, ctx, self.background_timelines())
    }

    fn write_text(&self, out: &mut dyn Write, ctx: &RenderContext<'_>) -> Result<(), RenderError> {
        write_layer(out, ctx, self.text_timelines())
    }
}

fn write_layer(
    out: &mut dyn Write,
    ctx: &RenderContext<'_>,
    timelines: &[Timeline<RowState>],
) -> Result<(), RenderError> {
    for (row, timeline) in timelines.iter().enumerate() {
        for interval in timeline.intervals() {
            let dur = interval
                .duration()
                .ok_or(RenderError::OpenInterval { unit: row })?;
            match &interval.value {
                RowState::Text(run) => write_text_row(out, ctx, row, run, interval.begin, dur)?,
                RowState::Background(runs) => {
                    write_background_row(out, ctx, row, runs, interval.begin, dur)?
                }
            }
        }
    }
    Ok(())
}

fn write_text_row(
    out: &mut dyn Write,
    ctx: &RenderContext<'_>,
    row: usize,
    run: &TextRun,
    begin: f64,
    dur: f64,
) -> Result<(), RenderError> {
    let mut body = String::new();
    for span in run.spans() {
        if span.style.is_plain() {
            markup::push_glyphs(&mut body, &span.text);
        } else {
            body.push_str("<tspan");
            body.push_str(&markup::style_attrs(&span.style, ctx.palette));
            body.push('>');
            markup::push_glyphs(&mut body, &span.text);
            body.push_str("</tspan>");
        }
    }

    write!(
        out,
        "<text x='1' y='{}' dominant-baseline='text-before-edge' textLength='{}' display='none'>{}",
        markup::num(ctx.geometry.y(row)),
        markup::num(ctx.geometry.grid_width()),
        body
    )?;
    markup::reveal(out, begin, dur)?;
    writeln!(out, "</text>")?;
    Ok(())
}

fn write_background_row(
    out: &mut dyn Write,
    ctx: &RenderContext<'_>,
    row: usize,
    runs: &BackgroundRuns,
    begin: f64,
    dur: f64,
) -> Result<(), RenderError> {
    let geometry = &ctx.geometry;
    writeln!(out, "<g display='none'>")?;
    for run in runs.runs() {
        writeln!(
            out,
            "<rect x='{}' y='{}' width='{}' height='{}' fill='#{}'/>",
            markup::num(geometry.x(run.start_col)),
            markup::num(geometry.y(row)),
            markup::num(run.width() as f64 * geometry.dx),
            markup::num(geometry.dy),
            ctx.palette.resolve(run.color)
        )?;
    }
    markup::reveal(out, begin, dur)?;
    writeln!(out, "</g>")?;
    Ok(())
}
