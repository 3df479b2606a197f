use crate::error::{SensimError, SensimResult};

/// Lidar scan lent to subscribers for the duration of one broadcast
///
/// The producer owns `scan` and may reuse it as soon as the broadcast
/// returns. Subscribers that need the data later copy it with
/// [`LidarFrame::to_scan`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidarFrame<'a> {
    pub scan: &'a [f32],
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub format: &'a str,
}

impl<'a> LidarFrame<'a> {
    /// Borrow a scan, checking that its length matches the metadata
    pub fn new(scan: &'a [f32], width: u32, height: u32, channels: u32, format: &'a str) -> SensimResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|points| points.checked_mul(channels as usize))
            .ok_or_else(|| {
                SensimError::config(format!(
                    "lidar scan {}x{}x{} exceeds the addressable value count",
                    width, height, channels
                ))
            })?;
        if scan.len() != expected {
            return Err(SensimError::config(format!(
                "lidar scan {}x{}x{} needs {} values, got {}",
                width,
                height,
                channels,
                expected,
                scan.len()
            )));
        }
        Ok(Self {
            scan,
            width,
            height,
            channels,
            format,
        })
    }

    /// Value at column `x`, row `y`, channel `channel`
    pub fn value(&self, x: u32, y: u32, channel: u32) -> Option<f32> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return None;
        }
        let index = ((y as usize * self.width as usize) + x as usize) * self.channels as usize
            + channel as usize;
        self.scan.get(index).copied()
    }

    /// Owned copy for retention past the callback
    pub fn to_scan(&self) -> LidarScan {
        LidarScan {
            scan: self.scan.to_vec(),
            width: self.width,
            height: self.height,
            channels: self.channels,
            format: self.format.to_string(),
        }
    }
}

/// Owned lidar scan
#[derive(Debug, Clone, PartialEq)]
pub struct LidarScan {
    pub scan: Vec<f32>,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub format: String,
}

impl LidarScan {
    /// Borrow as a frame, e.g. to re-broadcast it
    pub fn as_frame(&self) -> LidarFrame<'_> {
        LidarFrame {
            scan: &self.scan,
            width: self.width,
            height: self.height,
            channels: self.channels,
            format: &self.format,
        }
    }
}
