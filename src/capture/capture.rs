use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::Builder;
use tracing::{debug, info};

use crate::capture::compose::{composite_size, downscale, stitch};
use crate::capture::error::CaptureError;
use crate::capture::monitor::MonitorSource;

/// 多显示器截图拼接器
///
/// 依次完成截图、拼接、缩放和保存，任何一步失败都直接返回错误
pub struct ScreenStitcher<S: MonitorSource> {
    source: S,
    resize_factor: f64,
}

impl<S: MonitorSource> ScreenStitcher<S> {
    pub fn new(source: S, resize_factor: f64) -> Self {
        Self {
            source,
            resize_factor,
        }
    }

    /// 截取所有显示器并拼接、缩放为一张图
    pub fn compose(&self) -> Result<RgbImage, CaptureError> {
        info!("Capturing screenshot...");
        let frames = self.source.capture_all()?;
        if frames.is_empty() {
            return Err(CaptureError::NoMonitors);
        }

        let (width, height) = composite_size(&frames);
        debug!(
            "Stitching {} monitors into {}x{} canvas",
            frames.len(),
            width,
            height
        );
        let merged = stitch(&frames);
        drop(frames);

        let resized = downscale(merged, self.resize_factor)?;
        debug!(
            "Resized canvas to {}x{} (factor {})",
            resized.width(),
            resized.height(),
            self.resize_factor
        );
        Ok(resized)
    }

    /// 截图并保存为 PNG，返回输出图像的尺寸
    pub fn capture_to(&self, output: &Path) -> Result<(u32, u32), CaptureError> {
        let image = self.compose()?;
        save_png(&image, output)?;
        Ok(image.dimensions())
    }
}

/// 以 PNG 格式保存图像，覆盖已存在的文件
///
/// 先写入同目录下的临时文件再重命名，失败时目标路径保持不变。
/// 新文件按 umask 取权限，覆盖时沿用原文件的权限
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), CaptureError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let existing = fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.permissions());

    let mut builder = Builder::new();
    builder.prefix(".screen-stitch-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // 与 File::create 相同，内核会再按 umask 屏蔽
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        PngEncoder::new(&mut writer).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )?;
        writer.flush()?;
    }

    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions)?;
    }

    tmp.persist(path).map_err(|e| CaptureError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}
