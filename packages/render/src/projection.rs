//! Spherical Mercator projection fitted to a drawing area.
//!
//! Screen coordinates have their origin at the top-left corner with `y`
//! growing downward, so north is up.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use geo::{BoundingRect, Coord, Geometry, Rect};

use crate::RenderError;

/// Latitude beyond which Mercator `y` diverges.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Share of the drawing area the fitted geometry occupies.
pub const DEFAULT_FILL: f64 = 0.95;

/// Smallest projected span used when fitting (one degree, in radians).
/// Keeps a single point or a degenerate line from producing an infinite
/// scale.
const MIN_SPAN: f64 = 0.017_453_292_519_943_295;

/// A Mercator projection with a center, scale, and screen translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    /// Projected (unscaled) center.
    center: (f64, f64),
    /// Pixels per radian.
    scale: f64,
    /// Screen position the center maps to.
    translate: (f64, f64),
}

impl Mercator {
    /// Creates a projection centered on `(lon, lat)`.
    ///
    /// A center outside the projection's domain falls back to `(0, 0)`.
    #[must_use]
    pub fn new(center: (f64, f64), scale: f64, translate: (f64, f64)) -> Self {
        Self {
            center: raw(center.0, clamp_latitude(center.1)).unwrap_or((0.0, 0.0)),
            scale,
            translate,
        }
    }

    /// Fits the projection so `extent` fills `fill` of a `width` × `height`
    /// area, centered.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDimensions`] for a non-positive or
    /// non-finite drawing area and [`RenderError::EmptyExtent`] if the
    /// extent is not finite.
    pub fn fit_extent(
        extent: Rect<f64>,
        width: f64,
        height: f64,
        fill: f64,
    ) -> Result<Self, RenderError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RenderError::InvalidDimensions { width, height });
        }

        let (min, max) = (extent.min(), extent.max());
        let (Some((x0, y0)), Some((x1, y1))) = (
            raw(min.x, clamp_latitude(min.y)),
            raw(max.x, clamp_latitude(max.y)),
        ) else {
            return Err(RenderError::EmptyExtent);
        };

        let span_x = (x1 - x0).max(MIN_SPAN);
        let span_y = (y1 - y0).max(MIN_SPAN);
        let fill = if fill.is_finite() && fill > 0.0 {
            fill
        } else {
            DEFAULT_FILL
        };
        let scale = fill / (span_x / width).max(span_y / height);

        Ok(Self {
            center: (x0.midpoint(x1), y0.midpoint(y1)),
            scale,
            translate: (width / 2.0, height / 2.0),
        })
    }

    /// Projects a longitude/latitude pair to screen coordinates.
    ///
    /// Returns `None` for non-finite input or latitudes outside the
    /// Mercator domain.
    #[must_use]
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let (x, y) = raw(lon, lat)?;
        Some((
            self.scale.mul_add(x - self.center.0, self.translate.0),
            (-self.scale).mul_add(y - self.center.1, self.translate.1),
        ))
    }

    /// Maps screen coordinates back to longitude/latitude.
    #[must_use]
    pub fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !(x.is_finite() && y.is_finite()) || self.scale == 0.0 {
            return None;
        }
        let lambda = (x - self.translate.0) / self.scale + self.center.0;
        let m = (self.translate.1 - y) / self.scale + self.center.1;
        Some((lambda.to_degrees(), inverse_latitude(m)))
    }

    /// Geographic center as `(lon, lat)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        let (x, y) = self.center;
        (x.to_degrees(), inverse_latitude(y))
    }

    /// Pixels per radian of longitude.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Screen position of the center.
    #[must_use]
    pub const fn translate(&self) -> (f64, f64) {
        self.translate
    }
}

/// Bounding box of all geometries with a finite extent.
///
/// Geometries with no coordinates or with non-finite coordinates are
/// ignored; returns `None` if nothing remains.
#[must_use]
pub fn extent_of<'a>(geometries: impl IntoIterator<Item = &'a Geometry<f64>>) -> Option<Rect<f64>> {
    let mut combined: Option<(Coord<f64>, Coord<f64>)> = None;

    for rect in geometries.into_iter().filter_map(BoundingRect::bounding_rect) {
        let (min, max) = (rect.min(), rect.max());
        if ![min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite()) {
            continue;
        }
        combined = Some(match combined {
            None => (min, max),
            Some((lo, hi)) => (
                Coord {
                    x: lo.x.min(min.x),
                    y: lo.y.min(min.y),
                },
                Coord {
                    x: hi.x.max(max.x),
                    y: hi.y.max(max.y),
                },
            ),
        });
    }

    combined.map(|(min, max)| Rect::new(min, max))
}

fn raw(lon: f64, lat: f64) -> Option<(f64, f64)> {
    if !(lon.is_finite() && lat.is_finite()) || lat.abs() > MAX_LATITUDE {
        return None;
    }
    let phi = lat.to_radians();
    Some((lon.to_radians(), (FRAC_PI_4 + phi / 2.0).tan().ln()))
}

fn inverse_latitude(y: f64) -> f64 {
    2.0f64.mul_add(y.exp().atan(), -FRAC_PI_2).to_degrees()
}

fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}
