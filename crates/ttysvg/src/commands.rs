use std::path::PathBuf;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
pub use clap_complete::Shell;

use crate::config::Granularity;

const LONG_ABOUT: &str = r#"ttysvg replays a terminal session recorded with `script -t` and writes it
as a self-looping animated SVG. The animation is purely declarative, so the
result plays in any browser without scripts.

RECORDING:
    script -t 2>session.timing session.log

EXAMPLES:
    ttysvg render session.log session.timing -o session.svg
    ttysvg render session.log session.timing --cols 120 --rows 40 > out.svg
    ttysvg render session.log session.timing --granularity cell -o cells.svg
    ttysvg inspect session.log session.timing --format json

LOGGING:
    -v/-vv/-vvv raise the log level; RUST_LOG overrides it entirely.
    Set TTYSVG_LOG=<file> to send the log to a file instead of stderr."#;

#[derive(Parser)]
#[command(name = "ttysvg")]
#[command(author, version)]
#[command(about = "Convert recorded terminal sessions into animated SVG")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format for summaries and errors
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Returns the effective output format, considering --json shorthand.
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a recording into an animated SVG
    #[command(long_about = r#"Convert a recording into an animated SVG.

The script file is replayed through a virtual terminal following the delays
in the timing file. The first line of the script (the `Script started on`
header) is skipped. The document is only written once the whole session
has been replayed, so a malformed recording never leaves a partial file.

EXAMPLES:
    ttysvg render typescript timing -o demo.svg
    ttysvg render typescript timing --font-size 14 --ad-text "ttysvg" -o demo.svg"#)]
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Output file ("-" or omitted for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,

        /// One animated element per row state or per cell state
        #[arg(long, value_enum)]
        granularity: Option<Granularity>,

        /// Font family of the rendered text
        #[arg(long)]
        font_family: Option<String>,

        /// Font size in pixels
        #[arg(long)]
        font_size: Option<f64>,

        /// Credit text shown vertically in the right margin
        #[arg(long)]
        ad_text: Option<String>,

        /// Link opened when the credit text is clicked
        #[arg(long, requires = "ad_text")]
        ad_url: Option<String>,
    },

    /// Replay a recording and report timeline statistics
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Generate shell completion scripts
    #[command(long_about = r#"Generate shell completion scripts.

EXAMPLES:
    ttysvg completions bash > /etc/bash_completion.d/ttysvg
    ttysvg completions zsh > "${fpath[1]}/_ttysvg""#)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Recorded terminal output (the file written by `script`)
    pub script: PathBuf,

    /// Timing data (what `script -t` writes to stderr)
    pub timing: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct SettingsArgs {
    /// Terminal width in columns [default: 80]
    #[arg(long)]
    pub cols: Option<u16>,

    /// Terminal height in rows [default: 24]
    #[arg(long)]
    pub rows: Option<u16>,

    /// TOML configuration file
    #[arg(short, long, env = "TTYSVG_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::parse_from(["ttysvg", "render", "typescript", "timing"]);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.log_level(), "warn");
        let Commands::Render {
            input,
            output,
            settings,
            granularity,
            ..
        } = cli.command
        else {
            panic!("Expected Render command, got {:?}", cli.command);
        };
        assert_eq!(input.script, PathBuf::from("typescript"));
        assert_eq!(input.timing, PathBuf::from("timing"));
        assert!(output.is_none());
        assert!(settings.cols.is_none());
        assert!(granularity.is_none());
    }

    #[test]
    fn test_render_options() {
        let cli = Cli::parse_from([
            "ttysvg",
            "render",
            "s",
            "t",
            "-o",
            "out.svg",
            "--cols",
            "120",
            "--rows",
            "40",
            "--granularity",
            "cell",
            "--ad-text",
            "hi",
            "--ad-url",
            "https://example.org",
        ]);
        let Commands::Render {
            output,
            settings,
            granularity,
            ad_text,
            ad_url,
            ..
        } = cli.command
        else {
            panic!("Expected Render command");
        };
        assert_eq!(output, Some(PathBuf::from("out.svg")));
        assert_eq!(settings.cols, Some(120));
        assert_eq!(settings.rows, Some(40));
        assert_eq!(granularity, Some(Granularity::Cell));
        assert_eq!(ad_text.as_deref(), Some("hi"));
        assert_eq!(ad_url.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn test_ad_url_requires_text() {
        let result = Cli::try_parse_from(["ttysvg", "render", "s", "t", "--ad-url", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::parse_from(["ttysvg", "-vv", "inspect", "s", "t"]);
        assert_eq!(cli.log_level(), "debug");
        let cli = Cli::parse_from(["ttysvg", "-q", "inspect", "s", "t"]);
        assert_eq!(cli.log_level(), "error");
        assert!(Cli::try_parse_from(["ttysvg", "-q", "-v", "inspect", "s", "t"]).is_err());
    }

    #[test]
    fn test_json_shorthand() {
        let cli = Cli::parse_from(["ttysvg", "--json", "inspect", "s", "t"]);
        assert_eq!(cli.effective_format(), OutputFormat::Json);
    }
}
