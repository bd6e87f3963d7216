//! Flat-panel detector model.

use super::{unit, GEOMETRY_EPSILON};
use crate::error::{CorrectionError, IndexKind, Result};
use nalgebra::Vector3;

/// Axes whose unit vectors have a dot product above this are not orthogonal.
const ORTHOGONALITY_TOLERANCE: f64 = 1e-6;

/// One planar sensing region of a detector.
///
/// Positions and lengths are in mm in the laboratory frame; `mu` is the
/// linear attenuation coefficient of the sensor in mm⁻¹.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    name: String,
    origin: Vector3<f64>,
    fast_axis: Vector3<f64>,
    slow_axis: Vector3<f64>,
    pixel_size: (f64, f64),
    image_size: Option<(usize, usize)>,
    mu: f64,
    thickness: f64,
}

impl Panel {
    /// Pixel size of a hybrid photon-counting module, in mm.
    pub const DEFAULT_PIXEL_SIZE: (f64, f64) = (0.172, 0.172);

    /// Create a panel.
    ///
    /// The fast and slow axes are normalized and must be orthogonal.
    pub fn new(
        name: impl Into<String>,
        origin: Vector3<f64>,
        fast_axis: Vector3<f64>,
        slow_axis: Vector3<f64>,
        mu: f64,
        thickness: f64,
    ) -> Result<Self> {
        let fast_axis = unit(&fast_axis, "fast axis")?;
        let slow_axis = unit(&slow_axis, "slow axis")?;
        if fast_axis.dot(&slow_axis).abs() > ORTHOGONALITY_TOLERANCE {
            return Err(CorrectionError::domain("fast and slow axes must be orthogonal"));
        }
        if !origin.iter().all(|c| c.is_finite()) {
            return Err(CorrectionError::domain("panel origin must be finite"));
        }
        if !mu.is_finite() || mu <= 0.0 {
            return Err(CorrectionError::domain(format!(
                "attenuation coefficient must be positive, got {}",
                mu
            )));
        }
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(CorrectionError::domain(format!(
                "sensor thickness must be positive, got {}",
                thickness
            )));
        }

        Ok(Self {
            name: name.into(),
            origin,
            fast_axis,
            slow_axis,
            pixel_size: Self::DEFAULT_PIXEL_SIZE,
            image_size: None,
            mu,
            thickness,
        })
    }

    /// Set the pixel size (fast, slow) in mm. Both must be positive.
    pub fn with_pixel_size(mut self, fast: f64, slow: f64) -> Result<Self> {
        for size in [fast, slow] {
            if !size.is_finite() || size <= 0.0 {
                return Err(CorrectionError::domain(format!(
                    "pixel size must be positive, got {}",
                    size
                )));
            }
        }
        self.pixel_size = (fast, slow);
        Ok(self)
    }

    /// Set the image size (fast, slow) in pixels.
    pub fn with_image_size(mut self, fast: usize, slow: usize) -> Self {
        self.image_size = Some((fast, slow));
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn origin(&self) -> &Vector3<f64> {
        &self.origin
    }

    #[inline]
    pub fn fast_axis(&self) -> &Vector3<f64> {
        &self.fast_axis
    }

    #[inline]
    pub fn slow_axis(&self) -> &Vector3<f64> {
        &self.slow_axis
    }

    #[inline]
    pub fn pixel_size(&self) -> (f64, f64) {
        self.pixel_size
    }

    #[inline]
    pub fn image_size(&self) -> Option<(usize, usize)> {
        self.image_size
    }

    /// Linear attenuation coefficient of the sensor material (mm⁻¹).
    #[inline]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Nominal sensor thickness (mm).
    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Outward surface normal, `unit(slow × fast)`.
    ///
    /// For a panel viewed from the sample with fast running right and slow
    /// running down, this points back towards the sample.
    pub fn normal(&self) -> Vector3<f64> {
        self.slow_axis.cross(&self.fast_axis).normalize()
    }

    /// Perpendicular distance from the sample position to the panel plane.
    pub fn distance(&self) -> f64 {
        self.origin.dot(&self.normal()).abs()
    }

    /// Laboratory coordinate of a point given in panel mm coordinates.
    pub fn lab_coord(&self, x_mm: f64, y_mm: f64) -> Vector3<f64> {
        self.origin + self.fast_axis * x_mm + self.slow_axis * y_mm
    }

    /// Panel mm coordinates where a ray from the sample along `s1` meets the
    /// panel plane, or `None` if the ray is parallel to or points away from it.
    pub fn ray_intersection(&self, s1: &Vector3<f64>) -> Option<(f64, f64)> {
        let n = self.normal();
        let denom = s1.dot(&n);
        if denom.abs() < GEOMETRY_EPSILON {
            return None;
        }
        let scale = self.origin.dot(&n) / denom;
        if scale <= 0.0 {
            return None;
        }
        let rel = s1 * scale - self.origin;
        Some((rel.dot(&self.fast_axis), rel.dot(&self.slow_axis)))
    }

    /// Convert panel mm coordinates to pixel coordinates.
    pub fn mm_to_px(&self, x_mm: f64, y_mm: f64) -> (f64, f64) {
        (x_mm / self.pixel_size.0, y_mm / self.pixel_size.1)
    }

    /// Whether a pixel coordinate lies on the panel. Always true when the
    /// image size is unset.
    pub fn contains_px(&self, x_px: f64, y_px: f64) -> bool {
        match self.image_size {
            Some((w, h)) => x_px >= 0.0 && y_px >= 0.0 && x_px < w as f64 && y_px < h as f64,
            None => true,
        }
    }
}

/// An ordered set of panels, addressed by zero-based index.
#[derive(Clone, Debug, PartialEq)]
pub struct Detector {
    panels: Vec<Panel>,
}

impl Detector {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels }
    }

    /// Detector made of one panel.
    pub fn single(panel: Panel) -> Self {
        Self {
            panels: vec![panel],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Look up a panel, failing with `OutOfRange` for a bad index.
    pub fn panel(&self, index: usize) -> Result<&Panel> {
        self.panels.get(index).ok_or(CorrectionError::OutOfRange {
            kind: IndexKind::Panel,
            index,
            len: self.panels.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Panel> {
        self.panels.iter()
    }

    /// Index of the first panel hit by a ray along `s1`, with the pixel
    /// coordinate of the hit.
    pub fn find_panel(&self, s1: &Vector3<f64>) -> Option<(usize, (f64, f64))> {
        self.panels.iter().enumerate().find_map(|(i, p)| {
            let (x, y) = p.ray_intersection(s1)?;
            let (px, py) = p.mm_to_px(x, y);
            p.contains_px(px, py).then_some((i, (px, py)))
        })
    }
}

impl<'a> IntoIterator for &'a Detector {
    type Item = &'a Panel;
    type IntoIter = std::slice::Iter<'a, Panel>;

    fn into_iter(self) -> Self::IntoIter {
        self.panels.iter()
    }
}
