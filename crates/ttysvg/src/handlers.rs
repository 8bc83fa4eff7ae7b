use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use tracing::debug;
use tracing::info;
use ttysvg_common::Colors;
use ttysvg_core::CellRecorder;
use ttysvg_core::LayerSource;
use ttysvg_core::PlaybackSummary;
use ttysvg_core::Recorder;
use ttysvg_core::RenderError;
use ttysvg_core::RowReducer;
use ttysvg_core::Scheduler;
use ttysvg_core::SvgRenderer;
use ttysvg_core::TimingReader;
use ttysvg_core::schedule::skip_header;
use ttysvg_terminal::VirtualTerminal;

use crate::commands::InputArgs;
use crate::commands::OutputFormat;
use crate::commands::SettingsArgs;
use crate::config::Config;
use crate::config::ConfigError;
use crate::config::Granularity;
use crate::error::ConvertError;
use crate::output;
use crate::output::OutputSink;

pub type HandlerResult = Result<(), ConvertError>;

pub struct HandlerContext {
    pub format: OutputFormat,
}

impl HandlerContext {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

pub struct RenderRequest {
    pub input: InputArgs,
    pub output: Option<PathBuf>,
    pub config: Config,
}

/// A replayed session.
pub struct Playback<R> {
    pub recorder: R,
    pub summary: PlaybackSummary,
    /// The emulator's screen after the last byte, trailing blanks trimmed.
    pub final_screen: String,
}

#[derive(Debug, Serialize)]
struct RowReport {
    row: usize,
    text_intervals: usize,
    background_intervals: usize,
}

/// Defaults, then the config file, then `--cols`/`--rows`.
pub fn load_config(settings: &SettingsArgs) -> Result<Config, ConfigError> {
    let mut config = Config::load(settings.config.as_deref())?;
    if let Some(cols) = settings.cols {
        config = config.with_columns(cols);
    }
    if let Some(rows) = settings.rows {
        config = config.with_rows(rows);
    }
    Ok(config)
}

fn open_input(path: &Path) -> Result<BufReader<File>, ConvertError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| input_error(path, source))
}

fn input_error(path: &Path, source: io::Error) -> ConvertError {
    ConvertError::InputAccess {
        path: path.to_path_buf(),
        source,
    }
}

/// Replays `input` through a fresh virtual terminal into `recorder`.
pub fn replay<R: Recorder>(
    input: &InputArgs,
    config: &Config,
    recorder: R,
) -> Result<Playback<R>, ConvertError> {
    let mut script = open_input(&input.script)?;
    let header = skip_header(&mut script).map_err(|source| input_error(&input.script, source))?;
    debug!(bytes = header, "skipped script header");
    let timing = open_input(&input.timing)?;

    let mut terminal = VirtualTerminal::new(config.columns, config.rows);
    let mut scheduler = Scheduler::new(&mut terminal, recorder, config.columns, config.rows);
    let summary = scheduler.play(script, TimingReader::new(timing))?;
    let recorder = scheduler.into_recorder();

    info!(
        records = summary.records,
        bytes = summary.bytes_fed,
        samples = summary.samples,
        final_time = summary.final_time,
        "playback finished"
    );

    Ok(Playback {
        recorder,
        summary,
        final_screen: terminal.screen_text(),
    })
}

pub fn handle_render(ctx: &HandlerContext, request: RenderRequest) -> HandlerResult {
    request.config.validate()?;
    let cols = usize::from(request.config.columns);
    let rows = usize::from(request.config.rows);
    match request.config.granularity {
        Granularity::Row => convert(ctx, &request, RowReducer::new(cols, rows)),
        Granularity::Cell => convert(ctx, &request, CellRecorder::new(cols, rows)),
    }
}

fn convert<R: Recorder + LayerSource>(
    ctx: &HandlerContext,
    request: &RenderRequest,
    recorder: R,
) -> HandlerResult {
    // Replay fully before touching the output so a bad recording leaves no file.
    let playback = replay(&request.input, &request.config, recorder)?;

    let target = request.output.as_deref().filter(|p| !output::is_stdout(p));
    let display_path = target.map_or_else(|| PathBuf::from("<stdout>"), Path::to_path_buf);
    let mut sink = OutputSink::create(target).map_err(|source| ConvertError::Output {
        path: display_path.clone(),
        source,
    })?;

    SvgRenderer::new(&request.config.render)
        .render(&mut sink, &playback.recorder)
        .map_err(|e| match e {
            RenderError::Io(source) => ConvertError::Output {
                path: display_path.clone(),
                source,
            },
            other => other.into(),
        })?;

    let stats = playback.recorder.stats();
    info!(
        output = %display_path.display(),
        intervals = stats.total_intervals(),
        "document written"
    );

    if sink.is_stdout() {
        return Ok(());
    }

    match ctx.format {
        OutputFormat::Json => {
            let value = json!({
                "output": display_path.display().to_string(),
                "granularity": request.config.granularity,
                "summary": playback.summary,
                "stats": stats
            });
            println!("{value:#}");
        }
        OutputFormat::Text => {
            println!(
                "{} Wrote {} ({} samples, {} intervals, {:.2}s loop)",
                Colors::success("✓"),
                display_path.display(),
                stats.samples,
                stats.total_intervals(),
                playback.summary.final_time
            );
        }
    }
    Ok(())
}

pub fn handle_inspect(ctx: &HandlerContext, input: &InputArgs, config: &Config) -> HandlerResult {
    config.validate()?;
    let recorder = RowReducer::new(usize::from(config.columns), usize::from(config.rows));
    let playback = replay(input, config, recorder)?;
    let stats = playback.recorder.stats();

    let rows: Vec<RowReport> = playback
        .recorder
        .text_timelines()
        .iter()
        .zip(playback.recorder.background_timelines())
        .enumerate()
        .filter(|(_, (text, background))| !text.is_empty() || !background.is_empty())
        .map(|(row, (text, background))| RowReport {
            row,
            text_intervals: text.len(),
            background_intervals: background.len(),
        })
        .collect();

    match ctx.format {
        OutputFormat::Json => {
            let value = json!({
                "columns": config.columns,
                "rows": config.rows,
                "summary": playback.summary,
                "stats": stats,
                "row_intervals": rows,
                "final_screen": playback.final_screen
            });
            println!("{value:#}");
        }
        OutputFormat::Text => {
            let summary = &playback.summary;
            println!("{}", Colors::bold("Playback"));
            println!("  grid:                 {}x{}", config.columns, config.rows);
            println!("  timing records:       {}", summary.records);
            println!("  bytes fed:            {}", summary.bytes_fed);
            println!("  samples:              {}", summary.samples);
            println!("  loop length:          {:.2}s", summary.final_time);
            println!("{}", Colors::bold("Timeline"));
            println!("  text intervals:       {}", stats.text_intervals);
            println!("  background intervals: {}", stats.background_intervals);
            if !rows.is_empty() {
                println!("{}", Colors::bold("Rows (text/background)"));
                for report in &rows {
                    println!(
                        "  {:>4}: {}/{}",
                        report.row, report.text_intervals, report.background_intervals
                    );
                }
            }
            println!("{}", Colors::bold("Final screen"));
            for line in playback.final_screen.lines() {
                println!("  {} {}", Colors::dim("|"), line);
            }
        }
    }
    Ok(())
}
