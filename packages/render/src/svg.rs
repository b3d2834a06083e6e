//! SVG document assembly.

use feedback_map_analytics::NO_DATA_COLOR;
use feedback_map_analytics_models::CountyAggregation;
use feedback_map_geography::boundaries::{BoundarySet, CountyBoundary};

use crate::interaction::Tooltip;
use crate::path::{CountyShape, Shape, county_at, project_geometry};
use crate::projection::{DEFAULT_FILL, Mercator, extent_of};
use crate::state::LoadState;
use crate::view::ZoomTransform;
use crate::{ProjectionError, RenderError, SkippedFeature};

/// Shown when no county has drawable geometry.
pub const NO_DATA_MESSAGE: &str = "No map data available";

/// Shown while map data is being fetched.
pub const LOADING_MESSAGE: &str = "Loading map data...";

const BACKGROUND: &str = "#f8fafc";
const STROKE: &str = "#333";
const STROKE_WIDTH: f64 = 0.5;
const SELECTED_STROKE_WIDTH: f64 = 2.5;
const FILL_OPACITY: f64 = 0.8;
const HOVERED_FILL_OPACITY: f64 = 0.5;
const LABEL_FONT_SIZE: f64 = 10.0;

/// How to draw the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Drawing width.
    pub width: f64,
    /// Drawing height.
    pub height: f64,
    /// County drawn with a heavy border.
    pub selected: Option<String>,
    /// County drawn highlighted, with its tooltip.
    pub hovered: Option<String>,
    /// Zoom and pan applied to the county layer.
    pub transform: ZoomTransform,
    /// Draw county names at shape centroids.
    pub labels: bool,
    /// Share of the drawing area the geometry is fitted to.
    pub fill: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            selected: None,
            hovered: None,
            transform: ZoomTransform::IDENTITY,
            labels: true,
            fill: DEFAULT_FILL,
        }
    }
}

/// Output of one draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMap {
    /// The SVG document.
    pub svg: String,
    /// Drawn shapes in draw order, in untransformed screen space.
    pub shapes: Vec<CountyShape>,
    /// Counties left off the map.
    pub skipped: Vec<SkippedFeature>,
    /// The fitted projection, if anything was drawn.
    pub projection: Option<Mercator>,
}

impl RenderedMap {
    /// Whether no county was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// County under the screen point `(x, y)` given the zoom `transform`.
    #[must_use]
    pub fn county_at(&self, x: f64, y: f64, transform: &ZoomTransform) -> Option<&str> {
        let (cx, cy) = transform.invert((x, y));
        county_at(&self.shapes, cx, cy)
    }
}

/// Draws `boundaries` colored by `aggregation`.
///
/// Counties whose geometry cannot be projected are skipped and reported
/// in [`RenderedMap::skipped`]. If nothing can be drawn the document
/// contains only the [`NO_DATA_MESSAGE`].
///
/// # Errors
///
/// * If the requested dimensions are not positive and finite
pub fn render_map(
    boundaries: &BoundarySet,
    aggregation: &CountyAggregation,
    options: &RenderOptions,
) -> Result<RenderedMap, RenderError> {
    let (width, height) = (options.width, options.height);
    validate_dimensions(width, height)?;

    // Whether a feature projects does not depend on scale or translation,
    // so unprojectable features are dropped before fitting the extent.
    let unit = Mercator::new((0.0, 0.0), 1.0, (0.0, 0.0));
    let mut skipped = Vec::new();
    let mut drawable = Vec::with_capacity(boundaries.counties.len());
    for county in &boundaries.counties {
        match project_geometry(&county.geometry, &unit) {
            Ok(_) => drawable.push(county),
            Err(error) => skip(&mut skipped, county, error),
        }
    }

    let Some(extent) = extent_of(drawable.iter().map(|c| &c.geometry)) else {
        log::debug!("No boundary has a drawable extent; rendering empty state");
        return Ok(RenderedMap {
            svg: render_status(NO_DATA_MESSAGE, width, height)?,
            shapes: Vec::new(),
            skipped,
            projection: None,
        });
    };
    let projection = Mercator::fit_extent(extent, width, height, options.fill)?;

    let mut shapes = Vec::with_capacity(drawable.len());
    for county in drawable {
        match project_geometry(&county.geometry, &projection) {
            Ok(projected) => shapes.push(CountyShape {
                name: county.name.clone(),
                projected,
            }),
            Err(error) => skip(&mut skipped, county, error),
        }
    }

    if shapes.is_empty() {
        return Ok(RenderedMap {
            svg: render_status(NO_DATA_MESSAGE, width, height)?,
            shapes,
            skipped,
            projection: Some(projection),
        });
    }

    // The selected county goes last so its border is not painted over.
    let selected = options.selected.as_ref().and_then(|selected| {
        shapes
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(selected))
    });
    if let Some(i) = selected {
        let shape = shapes.remove(i);
        shapes.push(shape);
    }

    log::debug!(
        "Rendering {} counties ({} skipped) at {width}x{height}",
        shapes.len(),
        skipped.len()
    );

    let svg = document(&shapes, aggregation, options);

    Ok(RenderedMap {
        svg,
        shapes,
        skipped,
        projection: Some(projection),
    })
}

fn skip(skipped: &mut Vec<SkippedFeature>, county: &CountyBoundary, error: ProjectionError) {
    log::warn!("Skipping county {}: {error}", county.name);
    skipped.push(SkippedFeature {
        name: county.name.clone(),
        error,
    });
}

/// A document with a single centered message.
///
/// # Errors
///
/// * If the requested dimensions are not positive and finite
pub fn render_status(message: &str, width: f64, height: f64) -> Result<String, RenderError> {
    validate_dimensions(width, height)?;

    let mut svg = open_document(width, height);
    svg.push_str(&format!(
        r##"<text class="status" x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="central" font-family="sans-serif" font-size="16" fill="#666">{}</text>"##,
        width / 2.0,
        height / 2.0,
        escape(message)
    ));
    svg.push_str("</svg>");
    Ok(svg)
}

/// The placeholder for a load that is not ready, or `None` if it is.
///
/// # Errors
///
/// * If the requested dimensions are not positive and finite
pub fn render_load_state<T>(
    state: &LoadState<T>,
    width: f64,
    height: f64,
) -> Result<Option<String>, RenderError> {
    match state {
        LoadState::Loading => render_status(LOADING_MESSAGE, width, height).map(Some),
        LoadState::Error(message) => {
            render_status(&format!("Failed to load map data: {message}"), width, height).map(Some)
        }
        LoadState::Ready(_) => Ok(None),
    }
}

fn validate_dimensions(width: f64, height: f64) -> Result<(), RenderError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(RenderError::InvalidDimensions { width, height })
    }
}

fn open_document(width: f64, height: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" role="img" aria-label="County feedback map"><rect width="100%" height="100%" fill="{BACKGROUND}"/>"#
    )
}

fn document(
    shapes: &[CountyShape],
    aggregation: &CountyAggregation,
    options: &RenderOptions,
) -> String {
    let transform = &options.transform;
    let mut svg = open_document(options.width, options.height);
    svg.push_str(&format!(r#"<g class="counties" transform="{}">"#, transform.to_svg()));

    let is = |name: &str, target: Option<&String>| {
        target.is_some_and(|t| t.eq_ignore_ascii_case(name))
    };

    for county in shapes {
        let aggregate = aggregation.get(&county.name);
        let fill = aggregate.map_or(NO_DATA_COLOR, |a| a.color).to_hex();
        let count = aggregate.map_or(0, |a| a.count);
        let stroke_width = if is(&county.name, options.selected.as_ref()) {
            SELECTED_STROKE_WIDTH
        } else {
            STROKE_WIDTH
        };
        let opacity = if is(&county.name, options.hovered.as_ref()) {
            HOVERED_FILL_OPACITY
        } else {
            FILL_OPACITY
        };
        let name = escape(&county.name);
        let style = format!(
            r#"fill="{fill}" fill-opacity="{opacity}" stroke="{STROKE}" stroke-width="{stroke_width}" vector-effect="non-scaling-stroke""#
        );

        svg.push_str(&format!(
            r#"<g class="county" data-county="{name}" data-count="{count}">"#
        ));
        match &county.projected.shape {
            Shape::Path(data) => {
                svg.push_str(&format!(r#"<path d="{data}" {style}>"#));
                svg.push_str(&format!("<title>{name}: {count}</title></path>"));
            }
            Shape::Marker { cx, cy, r } => {
                svg.push_str(&format!(
                    r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" {style}>"#
                ));
                svg.push_str(&format!("<title>{name}: {count}</title></circle>"));
            }
        }
        svg.push_str("</g>");
    }

    if options.labels {
        svg.push_str(&format!(
            r##"<g class="labels" text-anchor="middle" dominant-baseline="central" font-family="sans-serif" font-size="{:.2}" fill="#222" pointer-events="none">"##,
            LABEL_FONT_SIZE / transform.k
        ));
        for county in shapes {
            let (x, y) = county.projected.centroid;
            svg.push_str(&format!(
                r#"<text x="{x:.2}" y="{y:.2}">{}</text>"#,
                escape(&county.name)
            ));
        }
        svg.push_str("</g>");
    }
    svg.push_str("</g>");

    let hovered = options
        .hovered
        .as_ref()
        .and_then(|hovered| shapes.iter().find(|s| s.name.eq_ignore_ascii_case(hovered)));
    if let Some(county) = hovered {
        let anchor = transform.apply(county.projected.centroid);
        let tooltip = Tooltip::new(&county.name, aggregation.get(&county.name), anchor);
        write_tooltip(&mut svg, &tooltip);
    }

    svg.push_str("</svg>");
    svg
}

#[allow(clippy::cast_precision_loss)]
fn write_tooltip(svg: &mut String, tooltip: &Tooltip) {
    let lines = tooltip.lines();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = (longest as f64).mul_add(7.0, 16.0);
    let height = (lines.len() as f64).mul_add(16.0, 8.0);

    svg.push_str(&format!(
        r##"<g class="tooltip" transform="translate({:.2},{:.2})" pointer-events="none"><rect width="{width}" height="{height}" rx="4" fill="#fff" stroke="#ccc"/><text font-family="sans-serif" font-size="12" fill="#222">"##,
        tooltip.x, tooltip.y
    ));
    for (i, line) in lines.iter().enumerate() {
        let weight = if i == 0 { r#" font-weight="bold""# } else { "" };
        svg.push_str(&format!(
            r#"<tspan x="8" y="{}"{weight}>{}</tspan>"#,
            16 * (i + 1),
            escape(line)
        ));
    }
    svg.push_str("</text></g>");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_map_analytics::{aggregate_by_county, color_for_count};
    use feedback_map_feedback_models::{FeedbackRecord, GeoLocation};
    use feedback_map_geography::boundaries::catalog_boundaries;
    use geo::{Geometry, LineString, Point, polygon};

    fn record(county: &str) -> FeedbackRecord {
        FeedbackRecord {
            location: Some(GeoLocation {
                county: Some(county.to_string()),
                ..GeoLocation::default()
            }),
            ..FeedbackRecord::default()
        }
    }

    fn sample() -> CountyAggregation {
        aggregate_by_county(&[record("Nairobi"), record("Nairobi"), record("Mombasa")])
    }

    #[test]
    fn draws_every_catalog_county_with_its_color() {
        let map = render_map(&catalog_boundaries(), &sample(), &RenderOptions::default()).unwrap();

        assert_eq!(map.shapes.len(), 47);
        assert!(map.skipped.is_empty());
        assert_eq!(map.svg.matches(r#"class="county""#).count(), 47);
        assert!(map.svg.starts_with("<svg"));
        assert!(map.svg.ends_with("</svg>"));

        let nairobi = format!(r#"fill="{}""#, color_for_count(2, 2).to_hex());
        let mombasa = format!(r#"fill="{}""#, color_for_count(1, 2).to_hex());
        let grey = format!(r#"fill="{}""#, NO_DATA_COLOR.to_hex());
        assert!(map.svg.contains(&nairobi));
        assert!(map.svg.contains(&mombasa));
        assert!(map.svg.contains(&grey));
        assert!(map.svg.contains(r#"data-county="Nairobi" data-count="2""#));
        assert!(map.svg.contains("Murang&apos;a"));
    }

    #[test]
    fn selected_county_is_drawn_last_with_heavy_border() {
        let options = RenderOptions {
            selected: Some("kisumu".to_string()),
            ..RenderOptions::default()
        };
        let map = render_map(&catalog_boundaries(), &sample(), &options).unwrap();

        assert_eq!(map.shapes.last().map(|s| s.name.as_str()), Some("Kisumu"));
        assert_eq!(map.svg.matches(r#"stroke-width="2.5""#).count(), 1);
        let kisumu = map.svg.find(r#"data-county="Kisumu""#).unwrap();
        assert!(map.svg[kisumu..].contains(r#"stroke-width="2.5""#));
    }

    #[test]
    fn hovered_county_gets_tooltip() {
        let options = RenderOptions {
            hovered: Some("Nairobi".to_string()),
            ..RenderOptions::default()
        };
        let map = render_map(&catalog_boundaries(), &sample(), &options).unwrap();
        assert!(map.svg.contains(r#"class="tooltip""#));
        assert!(map.svg.contains("Feedback: 2"));
        assert!(map.svg.contains("Issues: General"));
        assert_eq!(map.svg.matches(r#"fill-opacity="0.5""#).count(), 1);
    }

    #[test]
    fn zoom_transform_and_label_size() {
        let options = RenderOptions {
            transform: ZoomTransform::new(2.0, -100.0, -50.0),
            ..RenderOptions::default()
        };
        let map = render_map(&catalog_boundaries(), &sample(), &options).unwrap();
        assert!(map.svg.contains(r#"transform="translate(-100.00,-50.00) scale(2)""#));
        assert!(map.svg.contains(r#"font-size="5.00""#));

        let nairobi = map
            .shapes
            .iter()
            .find(|s| s.name == "Nairobi")
            .unwrap()
            .projected
            .centroid;
        let screen = options.transform.apply(nairobi);
        assert_eq!(
            map.county_at(screen.0, screen.1, &options.transform),
            Some("Nairobi")
        );
    }

    #[test]
    fn bad_geometry_is_skipped_not_fatal() {
        let mut boundaries = catalog_boundaries();
        boundaries.counties.push(CountyBoundary {
            name: "Broken".to_string(),
            code: None,
            geometry: Geometry::LineString(LineString::from(vec![(36.0, 0.0), (37.0, 1.0)])),
        });
        boundaries.counties.push(CountyBoundary {
            name: "Nowhere".to_string(),
            code: None,
            geometry: Geometry::Point(Point::new(f64::NAN, 1.0)),
        });

        let map = render_map(&boundaries, &sample(), &RenderOptions::default()).unwrap();
        assert_eq!(map.shapes.len(), 47);
        assert_eq!(
            map.skipped[0],
            SkippedFeature {
                name: "Broken".to_string(),
                error: ProjectionError::UnsupportedGeometry("LineString"),
            }
        );
        assert_eq!(map.skipped[1].name, "Nowhere");
        assert_eq!(map.skipped.len(), 2);
        assert!(matches!(
            map.skipped[1].error,
            ProjectionError::InvalidCoordinate { .. }
        ));
    }

    fn vertical_span(map: &RenderedMap) -> f64 {
        let ys = map.shapes.iter().map(|s| s.projected.centroid.1);
        let min = ys.clone().fold(f64::INFINITY, f64::min);
        let max = ys.fold(f64::NEG_INFINITY, f64::max);
        max - min
    }

    #[test]
    fn skipped_feature_does_not_shrink_drawable_counties() {
        let clean = render_map(&catalog_boundaries(), &sample(), &RenderOptions::default()).unwrap();

        let mut boundaries = catalog_boundaries();
        boundaries.counties.push(CountyBoundary {
            name: "Polar".to_string(),
            code: None,
            geometry: Geometry::Point(Point::new(37.0, 89.0)),
        });
        boundaries.counties.push(CountyBoundary {
            name: "Track".to_string(),
            code: None,
            geometry: Geometry::LineString(LineString::from(vec![(0.0, 0.0), (80.0, 30.0)])),
        });
        let map = render_map(&boundaries, &sample(), &RenderOptions::default()).unwrap();

        assert_eq!(map.shapes.len(), 47);
        let names: Vec<&str> = map.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Polar", "Track"]);
        assert!(matches!(
            map.skipped[0].error,
            ProjectionError::InvalidCoordinate { .. }
        ));

        let span = vertical_span(&clean);
        assert!(span > 500.0, "catalog should fill the drawing, got {span}");
        assert!((vertical_span(&map) - span).abs() < 1e-6);
        assert_eq!(map.projection, clean.projection);
    }

    #[test]
    fn polygons_render_as_paths() {
        let boundaries = BoundarySet {
            counties: vec![CountyBoundary {
                name: "Nairobi".to_string(),
                code: Some(47),
                geometry: Geometry::Polygon(polygon![
                    (x: 36.6, y: -1.45),
                    (x: 37.1, y: -1.45),
                    (x: 37.1, y: -1.15),
                    (x: 36.6, y: -1.15),
                ]),
            }],
            skipped: Vec::new(),
        };
        let map = render_map(&boundaries, &sample(), &RenderOptions::default()).unwrap();
        assert!(map.svg.contains("<path d=\"M"));
        assert!(!map.svg.contains("<circle"));
        assert_eq!(map.county_at(400.0, 300.0, &ZoomTransform::IDENTITY), Some("Nairobi"));
    }

    #[test]
    fn empty_input_shows_message() {
        let map = render_map(
            &BoundarySet::default(),
            &sample(),
            &RenderOptions::default(),
        )
        .unwrap();
        assert!(map.is_empty());
        assert!(map.svg.contains(NO_DATA_MESSAGE));
        assert!(map.projection.is_none());

        let only_bad = BoundarySet {
            counties: vec![CountyBoundary {
                name: "Line".to_string(),
                code: None,
                geometry: Geometry::LineString(LineString::from(vec![(36.0, 0.0), (37.0, 1.0)])),
            }],
            skipped: Vec::new(),
        };
        let map = render_map(&only_bad, &sample(), &RenderOptions::default()).unwrap();
        assert!(map.is_empty());
        assert!(map.svg.contains(NO_DATA_MESSAGE));
        assert_eq!(map.skipped.len(), 1);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let options = RenderOptions {
            width: 0.0,
            ..RenderOptions::default()
        };
        assert_eq!(
            render_map(&catalog_boundaries(), &sample(), &options),
            Err(RenderError::InvalidDimensions {
                width: 0.0,
                height: 600.0
            })
        );
    }

    #[test]
    fn load_states_have_placeholders() {
        let loading = render_load_state(&LoadState::<()>::Loading, 400.0, 300.0)
            .unwrap()
            .unwrap();
        assert!(loading.contains(LOADING_MESSAGE));

        let error = render_load_state(&LoadState::<()>::Error("timeout".into()), 400.0, 300.0)
            .unwrap()
            .unwrap();
        assert!(error.contains("Failed to load map data: timeout"));

        assert_eq!(
            render_load_state(&LoadState::Ready(()), 400.0, 300.0),
            Ok(None)
        );
    }
}
