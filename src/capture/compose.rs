use image::{RgbImage, imageops};

use crate::capture::error::CaptureError;
use crate::capture::monitor::MonitorFrame;

/// 拼接后画布的尺寸：宽度为所有截图宽度之和，高度为最高的截图高度
pub fn composite_size(frames: &[MonitorFrame]) -> (u32, u32) {
    frames.iter().fold((0, 0), |(width, height), frame| {
        (width + frame.width(), height.max(frame.height()))
    })
}

/// 将所有截图从左到右拼接到一张黑色画布上，y 偏移均为 0
pub fn stitch(frames: &[MonitorFrame]) -> RgbImage {
    let (width, height) = composite_size(frames);
    let mut canvas = RgbImage::new(width, height);

    let mut x_offset = 0i64;
    for frame in frames {
        imageops::replace(&mut canvas, &frame.image, x_offset, 0);
        x_offset += i64::from(frame.width());
    }

    canvas
}

/// 缩放后的尺寸，向下取整
pub fn scaled_size(width: u32, height: u32, factor: f64) -> (u32, u32) {
    let scale = |v: u32| (f64::from(v) * factor).floor() as u32;
    (scale(width), scale(height))
}

/// 按比例缩小图像，比例不小于 1.0 时原样返回
///
/// 缩放后任一边为 0 时返回错误
pub fn downscale(image: RgbImage, factor: f64) -> Result<RgbImage, CaptureError> {
    if factor >= 1.0 {
        return Ok(image);
    }

    let (width, height) = scaled_size(image.width(), image.height(), factor);
    if width == 0 || height == 0 {
        return Err(CaptureError::EmptyImage { width, height });
    }

    Ok(imageops::resize(
        &image,
        width,
        height,
        imageops::FilterType::Lanczos3,
    ))
}
