use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use xbe::api::{format_api_error, ApiError};
use xbe::cli::{self, args::LogLevel, Cli};

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("xbe {} started with log level: {:?}", xbe::VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("xbe").join("xbe.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".xbe").join("xbe.log");
    }
    PathBuf::from("xbe.log")
}

fn report_error(err: &anyhow::Error) {
    let mut stderr = io::stderr().lock();

    // The server's error document is shown verbatim before the summary
    if let Some(ApiError::Status { body, .. }) = err.downcast_ref::<ApiError>() {
        if !body.trim().is_empty() {
            let _ = writeln!(stderr, "{}", body.trim_end());
        }
    }

    tracing::error!("Command failed: {:#}", err);
    let _ = writeln!(stderr, "Error: {}", format_api_error(err));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let _log_guard = setup_logging(args.global.log_level);

    let mut stdout = io::stdout().lock();
    let result = cli::run(args, &mut stdout).await;
    let _ = stdout.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}
