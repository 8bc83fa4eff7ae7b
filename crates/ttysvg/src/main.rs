use clap::CommandFactory;
use clap::Parser;
use clap_complete::generate;

use ttysvg::commands::Cli;
use ttysvg::commands::Commands;
use ttysvg::commands::OutputFormat;
use ttysvg::error::ConvertError;
use ttysvg::handlers;
use ttysvg::handlers::HandlerContext;
use ttysvg::handlers::RenderRequest;
use ttysvg::telemetry::init_tracing;
use ttysvg_common::Colors;
use ttysvg_common::color_init;
use ttysvg_core::render::Advertisement;

fn main() {
    let cli = Cli::parse();
    color_init(cli.no_color);
    let telemetry = init_tracing(cli.log_level());
    let format = cli.effective_format();

    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            report(&e, format);
            e.exit_code()
        }
    };

    drop(telemetry);
    std::process::exit(code);
}

fn report(e: &ConvertError, format: OutputFormat) {
    match format {
        OutputFormat::Json => eprintln!("{:#}", e.to_json()),
        OutputFormat::Text => {
            eprintln!("{} {}", Colors::error("Error:"), e);
            eprintln!("{} {}", Colors::dim("Suggestion:"), e.suggestion());
        }
    }
}

fn run(cli: Cli) -> Result<(), ConvertError> {
    let ctx = HandlerContext::new(cli.effective_format());

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "ttysvg", &mut std::io::stdout());
            Ok(())
        }

        Commands::Render {
            input,
            output,
            settings,
            granularity,
            font_family,
            font_size,
            ad_text,
            ad_url,
        } => {
            let mut config = handlers::load_config(&settings)?;
            if let Some(granularity) = granularity {
                config = config.with_granularity(granularity);
            }
            if let Some(family) = font_family {
                config = config.with_font_family(family);
            }
            if let Some(size) = font_size {
                config = config.with_font_size(size);
            }
            if let Some(text) = ad_text {
                config = config.with_advertisement(Advertisement {
                    text,
                    url: ad_url.unwrap_or_default(),
                });
            }
            handlers::handle_render(
                &ctx,
                RenderRequest {
                    input,
                    output,
                    config,
                },
            )
        }

        Commands::Inspect { input, settings } => {
            let config = handlers::load_config(&settings)?;
            handlers::handle_inspect(&ctx, &input, &config)
        }
    }
}
