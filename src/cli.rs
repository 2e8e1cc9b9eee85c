use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

use crate::capture::{CaptureError, MonitorSource, ScreenStitcher, XcapSource};
use crate::config::{Settings, init};

#[derive(Parser, Debug)]
#[command(name = "screen-stitch")]
#[command(about = "截取所有显示器并拼接为一张缩小的 PNG", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 输出 PNG 文件路径（已存在时覆盖）
    pub output: PathBuf,
}

/// CLI 入口函数
pub fn run() -> ExitCode {
    let parsed = Cli::try_parse();

    if let Err(e) = &parsed {
        if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    }

    let settings = Settings::default();
    let (dispatch, log_error) = init::build(&settings);

    tracing::dispatcher::with_default(&dispatch, || {
        if let Some(e) = log_error {
            warn!(
                "Failed to open log file {}, logging to stderr: {}",
                settings.log_file.display(),
                e
            );
        }
        debug!("Settings: {}", settings);

        let cli = match parsed {
            Ok(cli) => cli,
            Err(e) => {
                if e.kind() == ErrorKind::MissingRequiredArgument {
                    error!("No output file path provided");
                    eprintln!("Error: Output file path not provided");
                } else {
                    error!("Invalid arguments: {}", e.kind());
                }
                let _ = e.print();
                return ExitCode::FAILURE;
            }
        };

        let stitcher = ScreenStitcher::new(XcapSource::new(), settings.resize_factor);
        match execute(&stitcher, &cli.output) {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        }
    })
}

/// 执行一次截图，失败时记录错误日志并返回错误
fn execute<S: MonitorSource>(stitcher: &ScreenStitcher<S>, output: &Path) -> Result<()> {
    capture(stitcher, output).inspect_err(report)
}

/// 截图、拼接、缩放并保存到指定路径
fn capture<S: MonitorSource>(stitcher: &ScreenStitcher<S>, output: &Path) -> Result<()> {
    let (width, height) = stitcher
        .capture_to(output)
        .with_context(|| format!("Screenshot capture to {} failed", output.display()))?;

    info!(
        "Screenshot saved to {} ({}x{})",
        output.display(),
        width,
        height
    );
    Ok(())
}

fn report(e: &anyhow::Error) {
    if matches!(e.downcast_ref::<CaptureError>(), Some(CaptureError::NoMonitors)) {
        error!("No screenshots captured");
    } else {
        error!("{:#}", e);
    }
    eprintln!("Error: {:#}", e);
}
