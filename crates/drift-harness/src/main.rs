#![forbid(unsafe_code)]

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use drift_harness::cli::{Cli, HELP_TEXT, Opts, VERSION};
use drift_harness::golden::{check_golden, is_bless_mode, write_ppm};
use drift_harness::{FrameLog, HarnessError, RunSummary};
use drift_render::PackedRgba;
use drift_runtime::EngineConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env("DRIFT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

fn load_config(opts: &Opts) -> Result<EngineConfig, HarnessError> {
    let mut config = match &opts.config {
        Some(path) => EngineConfig::from_json(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    match (opts.seed, config.seed) {
        (Some(seed), _) => config.seed = Some(seed),
        (None, None) => config.seed = Some(0),
        (None, Some(_)) => {}
    }
    Ok(config)
}

fn run_scenario<W: Write>(
    opts: &Opts,
    config: &EngineConfig,
    log: &mut FrameLog<W>,
) -> Result<RunSummary, HarnessError> {
    if opts.realtime {
        opts.scenario.run_realtime(config, log)
    } else {
        opts.scenario.run(config, log)
    }
}

fn execute(opts: &Opts) -> Result<RunSummary, HarnessError> {
    let config = load_config(opts)?;
    let summary = match &opts.out {
        Some(path) => {
            let mut log = FrameLog::new(BufWriter::new(File::create(path)?));
            run_scenario(opts, &config, &mut log)?
        }
        None => {
            let mut log = FrameLog::new(io::stdout().lock());
            run_scenario(opts, &config, &mut log)?
        }
    };

    if let Some(path) = &opts.ppm
        && let Some(surface) = &summary.last_surface
    {
        let background = config.clear_color()?.over(PackedRgba::BLACK);
        let mut out = BufWriter::new(File::create(path)?);
        write_ppm(surface, background, &mut out)?;
        out.flush()?;
        tracing::info!(path = %path.display(), "wrote final frame");
    }

    if let Some(dir) = &opts.golden {
        check_golden(dir, &opts.scenario.name, &summary.checksums, is_bless_mode())?;
    }
    Ok(summary)
}

fn main() -> ExitCode {
    let opts = match Cli::parse_from(std::env::args().skip(1)) {
        Ok(Cli::Run(opts)) => opts,
        Ok(Cli::Help) => {
            println!("{HELP_TEXT}");
            return ExitCode::SUCCESS;
        }
        Ok(Cli::Version) => {
            println!("drift-harness {VERSION}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    init_tracing(opts.log_json);
    match execute(&opts) {
        Ok(summary) => {
            tracing::info!(
                scenario = %summary.scenario,
                frames = summary.frames,
                mode = %summary.final_mode,
                items = summary.final_items,
                "run finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
