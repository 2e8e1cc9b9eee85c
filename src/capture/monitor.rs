use image::{DynamicImage, RgbImage};
use std::fmt;
use tracing::{debug, info};
use xcap::Monitor;

use crate::capture::error::CaptureError;

/// 显示器的位置与尺寸
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorGeometry {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for MonitorGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{} at ({}, {})",
            self.name, self.width, self.height, self.x, self.y
        )
    }
}

/// 单个显示器的一次截图
pub struct MonitorFrame {
    pub geometry: MonitorGeometry,
    pub image: RgbImage,
}

impl MonitorFrame {
    pub fn new(geometry: MonitorGeometry, image: RgbImage) -> Self {
        Self { geometry, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// 截图来源
///
/// 按枚举顺序返回所有物理显示器的截图，顺序决定拼接时从左到右的位置
pub trait MonitorSource {
    fn capture_all(&self) -> Result<Vec<MonitorFrame>, CaptureError>;
}

/// 基于 xcap 的显示器截图
///
/// `Monitor::all` 只返回物理显示器，不包含"所有显示器合集"这类虚拟条目
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapSource;

impl XcapSource {
    pub fn new() -> Self {
        Self
    }

    fn geometry(monitor: &Monitor) -> Result<MonitorGeometry, CaptureError> {
        Ok(MonitorGeometry {
            name: monitor.name().unwrap_or_else(|_| "Unknown".to_string()),
            x: monitor.x().map_err(CaptureError::enumerate)?,
            y: monitor.y().map_err(CaptureError::enumerate)?,
            width: monitor.width().map_err(CaptureError::enumerate)?,
            height: monitor.height().map_err(CaptureError::enumerate)?,
        })
    }

    fn capture_one(monitor: &Monitor) -> Result<MonitorFrame, CaptureError> {
        let geometry = Self::geometry(monitor)?;
        let rgba = monitor
            .capture_image()
            .map_err(|e| CaptureError::capture(&geometry.name, e))?;

        // HiDPI 下截图的物理像素可能与报告的尺寸不同，以截图为准
        if rgba.width() != geometry.width || rgba.height() != geometry.height {
            debug!(
                "Monitor {} reported {}x{} but captured {}x{}",
                geometry.name,
                geometry.width,
                geometry.height,
                rgba.width(),
                rgba.height()
            );
        }

        let image = DynamicImage::ImageRgba8(rgba).into_rgb8();
        Ok(MonitorFrame::new(geometry, image))
    }
}

impl MonitorSource for XcapSource {
    fn capture_all(&self) -> Result<Vec<MonitorFrame>, CaptureError> {
        // 截图会话只在此作用域内持有显示器句柄，无论成功与否都会随作用域释放
        let session = Monitor::all().map_err(CaptureError::enumerate)?;
        info!("Found {} monitors", session.len());

        let mut frames = Vec::with_capacity(session.len());
        for monitor in &session {
            let frame = Self::capture_one(monitor)?;
            info!("Captured monitor {}", frame.geometry);
            frames.push(frame);
        }

        Ok(frames)
    }
}
