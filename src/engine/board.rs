//! Dartboard geometry: map calibrated image-pixel coordinates to dart
//! scores. Pure math; frame capture belongs to the camera service, not
//! the engine.

use serde::{Deserialize, Serialize};

use crate::engine::dart::{Dart, BULL_VALUE};
use crate::engine::error::EngineError;

/// Standard sector order (clockwise), with 20 centered at 12 o'clock.
pub const SECTOR_ORDER: [u8; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

/// Ring radii as fractions of the full board radius (double outer).
///
/// Approximate WDF board proportions, tunable per setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingRatios {
    /// Double bull (50).
    pub inner_bull_r: f64,
    /// Single bull (25).
    pub outer_bull_r: f64,
    pub triple_inner_r: f64,
    pub triple_outer_r: f64,
    pub double_inner_r: f64,
    pub double_outer_r: f64,
}

impl Default for RingRatios {
    fn default() -> Self {
        Self {
            inner_bull_r: 0.037,
            outer_bull_r: 0.094,
            triple_inner_r: 0.582,
            triple_outer_r: 0.629,
            double_inner_r: 0.953,
            double_outer_r: 1.000,
        }
    }
}

impl RingRatios {
    pub fn validate(&self) -> Result<(), EngineError> {
        let vals = [
            self.inner_bull_r,
            self.outer_bull_r,
            self.triple_inner_r,
            self.triple_outer_r,
            self.double_inner_r,
            self.double_outer_r,
        ];
        if vals.iter().any(|&v| v <= 0.0) {
            return Err(EngineError::InvalidCalibration(
                "ring ratios must be > 0".into(),
            ));
        }
        let increasing = self.inner_bull_r < self.outer_bull_r
            && self.outer_bull_r < self.triple_inner_r
            && self.triple_inner_r < self.triple_outer_r
            && self.triple_outer_r < self.double_inner_r
            && self.double_inner_r <= self.double_outer_r;
        if !increasing {
            return Err(EngineError::InvalidCalibration(
                "ring ratios must be strictly increasing".into(),
            ));
        }
        Ok(())
    }
}

/// Pixel-space calibration for a single board.
///
/// `rotation_deg` is the offset applied to the sector mapping: 0 means 20
/// sits at 12 o'clock, positive rotates clockwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardCalibration {
    pub center_x: f64,
    pub center_y: f64,
    /// Board radius in pixels (outer edge of the double ring).
    pub radius_px: f64,
    pub rotation_deg: f64,
    #[serde(default)]
    pub rings: RingRatios,
}

impl BoardCalibration {
    pub fn new(
        center_x: f64,
        center_y: f64,
        radius_px: f64,
        rotation_deg: f64,
    ) -> Result<Self, EngineError> {
        if radius_px <= 0.0 {
            return Err(EngineError::InvalidCalibration(
                "radius_px must be > 0".into(),
            ));
        }
        let rings = RingRatios::default();
        rings.validate()?;
        Ok(Self {
            center_x,
            center_y,
            radius_px,
            rotation_deg,
            rings,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ring {
    Miss,
    Single,
    Double,
    Triple,
    Bull,
    Dbull,
}

/// One pixel coordinate scored against a calibrated board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPixel {
    pub x: f64,
    pub y: f64,
    /// 1-20, 25 for the bull, 0 for a miss.
    pub value: u8,
    /// 1-3, 0 for a miss.
    pub multiplier: u8,
    pub score: u16,
    pub ring: Ring,
    pub sector: Option<u8>,
    pub angle_deg: f64,
    pub radius_ratio: f64,
    pub confidence: f64,
}

impl ScoredPixel {
    /// The scoring dart this hit corresponds to; `None` for a miss.
    pub fn dart(&self) -> Option<Dart> {
        if self.multiplier == 0 {
            return None;
        }
        Dart::new(self.value, self.multiplier).ok()
    }
}

fn normalize_angle_deg(a: f64) -> f64 {
    let a = a % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// `angle_from_up_deg` is 0 at 12 o'clock (sector 20), increasing
/// clockwise. Sector wedges are 18 degrees wide, 20 centered on 0.
fn sector_from_angle_deg(angle_from_up_deg: f64) -> u8 {
    let angle = normalize_angle_deg(angle_from_up_deg);
    let idx = ((angle + 9.0) % 360.0 / 18.0) as usize;
    SECTOR_ORDER[idx.min(SECTOR_ORDER.len() - 1)]
}

/// Convert one pixel coordinate to a dart score using the calibration.
///
/// Coordinates are image pixels (x right, y down).
pub fn score_pixel(x: f64, y: f64, calib: &BoardCalibration, confidence: f64) -> ScoredPixel {
    let dx = x - calib.center_x;
    let dy = y - calib.center_y;

    let r = dx.hypot(dy);
    let rr = r / calib.radius_px;

    // Angle measured from "up" (12 o'clock), clockwise, in degrees. Image
    // y increases downward, so flip it for a Cartesian-like orientation.
    let theta = (-dy).atan2(dx).to_degrees();
    let angle_from_up = normalize_angle_deg(normalize_angle_deg(90.0 - theta) + calib.rotation_deg);
    let confidence = confidence.clamp(0.0, 1.0);

    let hit = |value: u8, multiplier: u8, ring: Ring, sector: Option<u8>| ScoredPixel {
        x,
        y,
        value,
        multiplier,
        score: u16::from(value) * u16::from(multiplier),
        ring,
        sector,
        angle_deg: angle_from_up,
        radius_ratio: rr,
        confidence,
    };

    if rr > calib.rings.double_outer_r {
        return hit(0, 0, Ring::Miss, None);
    }
    if rr <= calib.rings.inner_bull_r {
        return hit(BULL_VALUE, 2, Ring::Dbull, None);
    }
    if rr <= calib.rings.outer_bull_r {
        return hit(BULL_VALUE, 1, Ring::Bull, None);
    }

    let sector = sector_from_angle_deg(angle_from_up);
    if rr >= calib.rings.double_inner_r {
        hit(sector, 2, Ring::Double, Some(sector))
    } else if rr >= calib.rings.triple_inner_r && rr <= calib.rings.triple_outer_r {
        hit(sector, 3, Ring::Triple, Some(sector))
    } else {
        hit(sector, 1, Ring::Single, Some(sector))
    }
}

/// Score a batch of `(x, y, confidence)` hits; returns the scored hits
/// and their total.
pub fn score_pixels(
    hits: &[(f64, f64, f64)],
    calib: &BoardCalibration,
) -> (Vec<ScoredPixel>, u16) {
    let scored: Vec<ScoredPixel> = hits
        .iter()
        .map(|&(x, y, conf)| score_pixel(x, y, calib, conf))
        .collect();
    let total = scored.iter().map(|d| d.score).sum();
    (scored, total)
}
