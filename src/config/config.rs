use std::fmt;
use std::path::PathBuf;

/// 应用名称，同时用作日志文件名
pub const APP_NAME: &str = "screen-stitch";

/// 截图缩放比例，缩小为原尺寸的 50%
pub const RESIZE_FACTOR: f64 = 0.5;

/// 运行参数
///
/// 所有值均为固定常量，不提供外部配置
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub resize_factor: f64,
    pub log_file: PathBuf,
}

impl Settings {
    /// 日志目录：桌面目录，其次为 `~/Desktop`，都获取不到时使用当前目录
    pub fn log_dir() -> PathBuf {
        dirs::desktop_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_file_name() -> String {
        format!("{}.log", APP_NAME)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resize_factor: RESIZE_FACTOR,
            log_file: Self::log_dir().join(Self::log_file_name()),
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resize_factor={}, log_file={}",
            self.resize_factor,
            self.log_file.display()
        )
    }
}
