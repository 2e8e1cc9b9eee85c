use image::{Rgb, RgbImage};
use std::cell::Cell;

use crate::capture::error::CaptureError;
use crate::capture::monitor::{MonitorFrame, MonitorGeometry, MonitorSource};

/// 按给定尺寸生成纯色截图的显示器来源
pub struct FakeSource {
    sizes: Vec<(u32, u32)>,
    calls: Cell<usize>,
}

impl FakeSource {
    pub fn new(sizes: Vec<(u32, u32)>) -> Self {
        Self {
            sizes,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl MonitorSource for FakeSource {
    fn capture_all(&self) -> Result<Vec<MonitorFrame>, CaptureError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self
            .sizes
            .iter()
            .enumerate()
            .map(|(idx, &(width, height))| {
                let geometry = MonitorGeometry {
                    name: format!("fake-{}", idx),
                    x: 0,
                    y: 0,
                    width,
                    height,
                };
                let shade = 40 * (idx as u8 + 1);
                MonitorFrame::new(
                    geometry,
                    RgbImage::from_pixel(width, height, Rgb([shade, shade, shade])),
                )
            })
            .collect())
    }
}
