//! Bounded zoom and pan.

/// Smallest zoom factor (the fitted, unzoomed view).
pub const MIN_ZOOM: f64 = 1.0;

/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 8.0;

/// Factor applied by one zoom-in or zoom-out step.
pub const ZOOM_STEP: f64 = 1.5;

/// A uniform scale followed by a translation: `screen = point * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    /// Scale factor, always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub k: f64,
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    /// No zoom, no pan.
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Creates a transform, clamping `k` to the zoom bounds. Non-finite
    /// components fall back to the identity's.
    #[must_use]
    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self {
            k: clamp_zoom(k),
            x: if x.is_finite() { x } else { 0.0 },
            y: if y.is_finite() { y } else { 0.0 },
        }
    }

    /// Multiplies the scale by `factor`, keeping the screen point `anchor`
    /// fixed.
    #[must_use]
    pub fn scale_by(self, factor: f64, anchor: (f64, f64)) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        let k = clamp_zoom(self.k * factor);
        let (px, py) = self.invert(anchor);
        Self {
            k,
            x: px.mul_add(-k, anchor.0),
            y: py.mul_add(-k, anchor.1),
        }
    }

    /// One step in, centered on the viewport.
    #[must_use]
    pub fn zoom_in(self, width: f64, height: f64) -> Self {
        self.scale_by(ZOOM_STEP, (width / 2.0, height / 2.0))
            .constrain(width, height)
    }

    /// One step out, centered on the viewport.
    #[must_use]
    pub fn zoom_out(self, width: f64, height: f64) -> Self {
        self.scale_by(ZOOM_STEP.recip(), (width / 2.0, height / 2.0))
            .constrain(width, height)
    }

    /// Back to [`ZoomTransform::IDENTITY`].
    #[must_use]
    pub const fn reset(self) -> Self {
        Self::IDENTITY
    }

    /// Translates by `(dx, dy)` screen units.
    #[must_use]
    pub fn pan(self, dx: f64, dy: f64) -> Self {
        Self::new(self.k, self.x + dx, self.y + dy)
    }

    /// Limits the translation so the zoomed content still covers the
    /// `width` × `height` viewport.
    #[must_use]
    pub fn constrain(self, width: f64, height: f64) -> Self {
        let bound = |offset: f64, extent: f64| {
            let min = extent.mul_add(-self.k, extent);
            offset.clamp(min.min(0.0), 0.0)
        };
        Self {
            k: self.k,
            x: bound(self.x, width),
            y: bound(self.y, height),
        }
    }

    /// Maps a content point to the screen.
    #[must_use]
    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        (
            point.0.mul_add(self.k, self.x),
            point.1.mul_add(self.k, self.y),
        )
    }

    /// Maps a screen point back to content coordinates.
    #[must_use]
    pub fn invert(&self, point: (f64, f64)) -> (f64, f64) {
        ((point.0 - self.x) / self.k, (point.1 - self.y) / self.k)
    }

    /// Whether this is the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// SVG `transform` attribute value.
    #[must_use]
    pub fn to_svg(&self) -> String {
        format!("translate({:.2},{:.2}) scale({})", self.x, self.y, self.k)
    }
}

fn clamp_zoom(k: f64) -> f64 {
    if k.is_finite() {
        k.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        MIN_ZOOM
    }
}
