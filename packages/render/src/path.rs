//! Projected county shapes.
//!
//! Polygons become SVG path data, points become circular markers. Each
//! shape keeps a screen-space hit area so pointer events can be mapped
//! back to the county under the cursor.

use geo::{Centroid, Contains, Coord, Geometry, LineString, MultiPolygon, Point, Polygon};

use crate::ProjectionError;
use crate::projection::Mercator;

/// Radius of point markers, in screen units.
pub const MARKER_RADIUS: f64 = 6.0;

/// What gets drawn for a county.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Closed outline(s), as SVG path data.
    Path(String),
    /// A circle at a representative point.
    Marker {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius.
        r: f64,
    },
}

/// A county geometry in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedShape {
    /// Drawable shape.
    pub shape: Shape,
    /// Label anchor.
    pub centroid: (f64, f64),
    hit_area: Option<MultiPolygon<f64>>,
}

impl ProjectedShape {
    /// Whether the screen point `(x, y)` falls on this shape.
    #[must_use]
    pub fn hit(&self, x: f64, y: f64) -> bool {
        match (&self.shape, &self.hit_area) {
            (_, Some(area)) => area.contains(&Point::new(x, y)),
            (Shape::Marker { cx, cy, r }, None) => (x - cx).hypot(y - cy) <= *r,
            (Shape::Path(_), None) => false,
        }
    }
}

/// A projected shape tagged with its county.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyShape {
    /// County display name.
    pub name: String,
    /// Screen-space geometry.
    pub projected: ProjectedShape,
}

/// Topmost county under the screen point `(x, y)`.
///
/// `shapes` is in draw order, so later entries win.
#[must_use]
pub fn county_at(shapes: &[CountyShape], x: f64, y: f64) -> Option<&str> {
    shapes
        .iter()
        .rev()
        .find(|s| s.projected.hit(x, y))
        .map(|s| s.name.as_str())
}

/// Projects a county geometry.
///
/// # Errors
///
/// * [`ProjectionError::UnsupportedGeometry`] for anything other than a
///   point, polygon, or multipolygon
/// * [`ProjectionError::InvalidCoordinate`] if any vertex cannot be projected
/// * [`ProjectionError::Empty`] if the geometry has no vertices
pub fn project_geometry(
    geometry: &Geometry<f64>,
    projection: &Mercator,
) -> Result<ProjectedShape, ProjectionError> {
    match geometry {
        Geometry::Point(point) => {
            let (cx, cy) = project_coord(point.0, projection)?;
            Ok(ProjectedShape {
                shape: Shape::Marker {
                    cx,
                    cy,
                    r: MARKER_RADIUS,
                },
                centroid: (cx, cy),
                hit_area: None,
            })
        }
        Geometry::Polygon(polygon) => project_polygons(std::slice::from_ref(polygon), projection),
        Geometry::MultiPolygon(multi) => project_polygons(&multi.0, projection),
        Geometry::Line(_) => Err(ProjectionError::UnsupportedGeometry("Line")),
        Geometry::LineString(_) => Err(ProjectionError::UnsupportedGeometry("LineString")),
        Geometry::MultiPoint(_) => Err(ProjectionError::UnsupportedGeometry("MultiPoint")),
        Geometry::MultiLineString(_) => {
            Err(ProjectionError::UnsupportedGeometry("MultiLineString"))
        }
        Geometry::GeometryCollection(_) => {
            Err(ProjectionError::UnsupportedGeometry("GeometryCollection"))
        }
        Geometry::Rect(_) => Err(ProjectionError::UnsupportedGeometry("Rect")),
        Geometry::Triangle(_) => Err(ProjectionError::UnsupportedGeometry("Triangle")),
    }
}

fn project_polygons(
    polygons: &[Polygon<f64>],
    projection: &Mercator,
) -> Result<ProjectedShape, ProjectionError> {
    let mut data = String::new();
    let mut screen = Vec::with_capacity(polygons.len());

    for polygon in polygons {
        if polygon.exterior().0.is_empty() {
            continue;
        }
        let exterior = project_ring(polygon.exterior(), projection, &mut data)?;
        let interiors = polygon
            .interiors()
            .iter()
            .filter(|ring| !ring.0.is_empty())
            .map(|ring| project_ring(ring, projection, &mut data))
            .collect::<Result<Vec<_>, _>>()?;
        screen.push(Polygon::new(exterior, interiors));
    }

    if screen.is_empty() {
        return Err(ProjectionError::Empty);
    }

    let area = MultiPolygon(screen);
    let centroid = area
        .centroid()
        .or_else(|| area.0.first().and_then(|p| p.exterior().points().next()))
        .map(|p| (p.x(), p.y()))
        .ok_or(ProjectionError::Empty)?;

    Ok(ProjectedShape {
        shape: Shape::Path(data),
        centroid,
        hit_area: Some(area),
    })
}

/// Appends one closed subpath for `ring` to `data` and returns the
/// projected ring.
fn project_ring(
    ring: &LineString<f64>,
    projection: &Mercator,
    data: &mut String,
) -> Result<LineString<f64>, ProjectionError> {
    let mut projected = Vec::with_capacity(ring.0.len());

    for (i, coord) in ring.0.iter().enumerate() {
        let (x, y) = project_coord(*coord, projection)?;
        let command = if i == 0 { 'M' } else { 'L' };
        data.push_str(&format!("{command}{x:.2},{y:.2}"));
        projected.push(Coord { x, y });
    }
    data.push('Z');

    Ok(LineString(projected))
}

fn project_coord(coord: Coord<f64>, projection: &Mercator) -> Result<(f64, f64), ProjectionError> {
    projection
        .project(coord.x, coord.y)
        .ok_or(ProjectionError::InvalidCoordinate {
            x: coord.x,
            y: coord.y,
        })
}
