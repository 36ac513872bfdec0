use std::path::PathBuf;

use clap::{Parser, Subcommand};
use strata::config::StrataConfig;
use strata::render::{parse_format, render, ViewOptions, WriterSink};
use strata::shared::logging;
use strata::{error, plan, NeverCancelled, StrataError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Analyzes infrastructure-change plan documents and renders a risk-aware review.",
    version = APP_VERSION
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        short = 'c',
        global = true,
        value_name = "PATH",
        help = "Path to a strata config file"
    )]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Analyze a plan document and render a review of its changes")]
    Analyze {
        plan_path: PathBuf,

        #[arg(long, default_value = "table", help = "table, json, html, markdown, or csv")]
        format: String,

        #[arg(long, help = "Include no-op resources in the rendered output")]
        show_no_ops: bool,

        #[arg(long, help = "Expand every collapsible value regardless of its default")]
        expand_all: bool,

        #[arg(long, help = "Group resources into one table per provider")]
        group_by_provider: bool,
    },
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Commands::Analyze {
            plan_path,
            format,
            show_no_ops,
            expand_all,
            group_by_provider,
        } => run_analyze(
            &cli.config,
            plan_path,
            format,
            *show_no_ops,
            *expand_all,
            *group_by_provider,
        ),
    };

    std::process::exit(exit_code);
}

fn run_analyze(
    config_path: &Option<PathBuf>,
    plan_path: &PathBuf,
    format: &str,
    show_no_ops: bool,
    expand_all: bool,
    group_by_provider: bool,
) -> i32 {
    // Internal stages return precise `StrataError`s; flatten to `anyhow`
    // at the reporting boundary.
    match analyze_and_render(
        config_path,
        plan_path,
        format,
        show_no_ops,
        expand_all,
        group_by_provider,
    )
    .map_err(anyhow::Error::from)
    {
        Ok(dangerous) => {
            if dangerous {
                1
            } else {
                0
            }
        }
        Err(reported) => {
            let code = reported
                .downcast_ref::<StrataError>()
                .map(|e| e.exit_code())
                .unwrap_or(4);
            match reported.downcast_ref::<StrataError>() {
                Some(err) => logging::error(&error::format_user_message(err)),
                None => logging::error(&format!("{:?}", reported)),
            }
            code
        }
    }
}

fn analyze_and_render(
    config_path: &Option<PathBuf>,
    plan_path: &PathBuf,
    format: &str,
    show_no_ops: bool,
    expand_all: bool,
    group_by_provider: bool,
) -> Result<bool, StrataError> {
    let config = StrataConfig::load(config_path.as_deref())?;
    let max_plan_bytes = config
        .max_plan_bytes
        .unwrap_or(plan::loader::DEFAULT_MAX_PLAN_BYTES);

    logging::info(&format!("loading plan from {}", plan_path.display()));
    let raw = plan::loader::load(plan_path, max_plan_bytes)?;

    let rules = config.risk_rules();
    let limits = plan::DiffLimits::default();
    let summary = plan::analyze(
        raw,
        &rules,
        &limits,
        APP_VERSION,
        chrono::Utc::now(),
        &NeverCancelled,
    )?;

    let mut view = config.apply_to_view(ViewOptions::default());
    view.format = parse_format(format)?;
    view.show_no_ops = view.show_no_ops || show_no_ops;
    view.expand_all = view.expand_all || expand_all;
    view.group_by_provider = view.group_by_provider || group_by_provider;

    let stdout = std::io::stdout();
    let mut sink = WriterSink::new(stdout.lock());
    render(&summary, &view, &mut sink)?;

    Ok(summary.statistics.dangerous > 0)
}

fn init_logging() {
    let log_level = std::env::var("STRATA_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("strata={}", filter).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
