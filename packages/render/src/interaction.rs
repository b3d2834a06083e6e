//! Pointer interaction with the rendered map.
//!
//! [`MapInteraction`] is fed pointer events in screen coordinates. It hit
//! tests them against the drawn shapes (undoing the current zoom
//! transform first), keeps hover and tooltip state, and reports clicks to
//! a caller-supplied callback. Wheel and drag gestures update the zoom
//! transform within its bounds.

use feedback_map_analytics_models::{CountyAggregate, CountyAggregation};

use crate::path::{CountyShape, county_at};
use crate::view::ZoomTransform;

/// Wheel sensitivity: the zoom factor for a wheel delta `d` is
/// `2^(-d * WHEEL_SENSITIVITY)`, so one 100-pixel notch down zooms out
/// by about 13%.
pub const WHEEL_SENSITIVITY: f64 = 0.002;

/// Distance between the cursor and the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: f64 = 10.0;

/// Issues listed in a tooltip before the rest are summarized.
pub const TOOLTIP_ISSUE_LIMIT: usize = 3;

/// Tooltip for a hovered county.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// County display name.
    pub county: String,
    /// Feedback count.
    pub count: u64,
    /// First few distinct issues.
    pub issues: Vec<String>,
    /// Number of issues not listed.
    pub more: usize,
    /// Screen position (top-left).
    pub x: f64,
    /// Screen position (top-left).
    pub y: f64,
}

impl Tooltip {
    /// Builds the tooltip for `county` with the cursor at `pointer`.
    #[must_use]
    pub fn new(county: &str, aggregate: Option<&CountyAggregate>, pointer: (f64, f64)) -> Self {
        let (name, count, issues) = aggregate.map_or((county, 0, &[][..]), |a| {
            (a.name.as_str(), a.count, a.issues.as_slice())
        });

        Self {
            county: name.to_string(),
            count,
            issues: issues.iter().take(TOOLTIP_ISSUE_LIMIT).cloned().collect(),
            more: issues.len().saturating_sub(TOOLTIP_ISSUE_LIMIT),
            x: pointer.0 + TOOLTIP_OFFSET,
            y: pointer.1 + TOOLTIP_OFFSET,
        }
    }

    /// Text lines, top to bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.county.clone(), format!("Feedback: {}", self.count)];
        if !self.issues.is_empty() {
            let mut issues = format!("Issues: {}", self.issues.join(", "));
            if self.more > 0 {
                issues.push_str(&format!(" +{} more", self.more));
            }
            lines.push(issues);
        }
        lines
    }

    fn move_to(&mut self, pointer: (f64, f64)) {
        self.x = pointer.0 + TOOLTIP_OFFSET;
        self.y = pointer.1 + TOOLTIP_OFFSET;
    }
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The pointer moved to `(x, y)`.
    Move {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
    },
    /// The pointer left the map.
    Leave,
    /// A click at `(x, y)`.
    Click {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
    },
    /// A scroll at `(x, y)`. Negative `delta` (scrolling up) zooms in,
    /// anchored at the cursor.
    Wheel {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
        /// Vertical wheel delta in pixels.
        delta: f64,
    },
    /// The map was dragged by `(dx, dy)` pixels.
    Drag {
        /// Horizontal movement.
        dx: f64,
        /// Vertical movement.
        dy: f64,
    },
}

/// Hover, tooltip, and selection state for one map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapInteraction {
    hovered: Option<String>,
    selected: Option<String>,
    tooltip: Option<Tooltip>,
}

impl MapInteraction {
    /// Nothing hovered or selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// County under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Currently selected county.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Tooltip for the hovered county.
    #[must_use]
    pub const fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// The pointer entered `county`'s shape.
    pub fn pointer_enter(
        &mut self,
        county: &str,
        aggregation: &CountyAggregation,
        pointer: (f64, f64),
    ) {
        self.hovered = Some(county.to_string());
        self.tooltip = Some(Tooltip::new(county, aggregation.get(county), pointer));
    }

    /// The pointer moved within the hovered shape.
    pub fn pointer_move(&mut self, pointer: (f64, f64)) {
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.move_to(pointer);
        }
    }

    /// The pointer left the hovered shape.
    pub fn pointer_leave(&mut self) {
        self.hovered = None;
        self.tooltip = None;
    }

    /// Reports a click on `county` to `on_select`.
    ///
    /// The callback decides what selection means; see
    /// [`MapInteraction::toggle_selection`].
    pub fn click(county: &str, on_select: impl FnOnce(&str)) {
        log::debug!("County clicked: {county}");
        on_select(county);
    }

    /// Selects `county`, or clears the selection if it is already
    /// selected. Returns the new selection.
    pub fn toggle_selection(&mut self, county: &str) -> Option<&str> {
        let same = self
            .selected
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(county));
        self.selected = if same { None } else { Some(county.to_string()) };
        self.selected()
    }

    /// Replaces the selection.
    pub fn set_selected(&mut self, county: Option<String>) {
        self.selected = county;
    }

    /// Dispatches a pointer event against the drawn `shapes`.
    ///
    /// Moving across shapes produces the matching leave/enter pair. A
    /// click on a shape is forwarded to `on_select`; clicks on empty space
    /// are ignored. Wheel and drag events update `transform`, keeping it
    /// within the zoom bounds and the `viewport` (width, height).
    pub fn handle(
        &mut self,
        event: PointerEvent,
        shapes: &[CountyShape],
        transform: &mut ZoomTransform,
        viewport: (f64, f64),
        aggregation: &CountyAggregation,
        on_select: impl FnOnce(&str),
    ) {
        let (width, height) = viewport;
        match event {
            PointerEvent::Move { x, y } => {
                let (cx, cy) = transform.invert((x, y));
                match county_at(shapes, cx, cy) {
                    Some(county) if self.hovered.as_deref() == Some(county) => {
                        self.pointer_move((x, y));
                    }
                    Some(county) => {
                        self.pointer_leave();
                        self.pointer_enter(county, aggregation, (x, y));
                    }
                    None => self.pointer_leave(),
                }
            }
            PointerEvent::Leave => self.pointer_leave(),
            PointerEvent::Click { x, y } => {
                let (cx, cy) = transform.invert((x, y));
                if let Some(county) = county_at(shapes, cx, cy) {
                    Self::click(county, on_select);
                }
            }
            PointerEvent::Wheel { x, y, delta } => {
                let factor = (-delta * WHEEL_SENSITIVITY).exp2();
                *transform = transform
                    .scale_by(factor, (x, y))
                    .constrain(width, height);
            }
            PointerEvent::Drag { dx, dy } => {
                *transform = transform.pan(dx, dy).constrain(width, height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_map_analytics_models::HslColor;
    use feedback_map_geography_models::county_key;

    use crate::path::{ProjectedShape, project_geometry};
    use crate::projection::Mercator;
    use crate::view::MAX_ZOOM;

    fn aggregation() -> CountyAggregation {
        let mut aggregation = CountyAggregation::default();
        let mut nairobi = CountyAggregate::empty("Nairobi", HslColor::new(0.0, 0.0, 88.0));
        for issue in ["passport", "water", "roads", "health", "power"] {
            nairobi.record(issue);
        }
        aggregation.counties.insert(county_key("Nairobi"), nairobi);
        aggregation
    }

    fn marker(name: &str, lon: f64) -> CountyShape {
        let projection = Mercator::new((37.0, 0.0), 5000.0, (500.0, 500.0));
        let projected: ProjectedShape =
            project_geometry(&geo::Geometry::Point(geo::Point::new(lon, 0.0)), &projection)
                .unwrap();
        CountyShape {
            name: name.to_string(),
            projected,
        }
    }

    #[test]
    fn tooltip_lists_three_issues_then_summarizes() {
        let aggregation = aggregation();
        let tooltip = Tooltip::new("nairobi", aggregation.get("nairobi"), (100.0, 50.0));
        assert_eq!(tooltip.county, "Nairobi");
        assert_eq!((tooltip.x, tooltip.y), (110.0, 60.0));
        assert_eq!(
            tooltip.lines(),
            vec![
                "Nairobi".to_string(),
                "Feedback: 5".to_string(),
                "Issues: passport, water, roads +2 more".to_string(),
            ]
        );

        let empty = Tooltip::new("Lamu", None, (0.0, 0.0));
        assert_eq!(empty.lines(), vec!["Lamu".to_string(), "Feedback: 0".to_string()]);
    }

    #[test]
    fn enter_move_leave() {
        let aggregation = aggregation();
        let mut interaction = MapInteraction::new();

        interaction.pointer_enter("Nairobi", &aggregation, (10.0, 10.0));
        assert_eq!(interaction.hovered(), Some("Nairobi"));

        interaction.pointer_move((30.0, 40.0));
        let tooltip = interaction.tooltip().unwrap();
        assert_eq!((tooltip.x, tooltip.y), (40.0, 50.0));

        interaction.pointer_leave();
        assert_eq!(interaction.hovered(), None);
        assert!(interaction.tooltip().is_none());
    }

    #[test]
    fn toggle_selection_is_case_insensitive() {
        let mut interaction = MapInteraction::new();
        assert_eq!(interaction.toggle_selection("Kisumu"), Some("Kisumu"));
        assert_eq!(interaction.toggle_selection("Nakuru"), Some("Nakuru"));
        assert_eq!(interaction.toggle_selection("NAKURU"), None);
    }

    #[test]
    fn events_are_hit_tested_through_the_zoom() {
        let aggregation = aggregation();
        let shapes = vec![marker("Nairobi", 37.0), marker("Kajiado", 37.5)];
        let mut transform = ZoomTransform::new(2.0, -500.0, -500.0);
        let viewport = (1000.0, 1000.0);
        let mut interaction = MapInteraction::new();
        let noop = |_: &str| {};

        // Content (500, 500) is at screen (500, 500) under this transform.
        interaction.handle(
            PointerEvent::Move { x: 500.0, y: 500.0 },
            &shapes,
            &mut transform,
            viewport,
            &aggregation,
            noop,
        );
        assert_eq!(interaction.hovered(), Some("Nairobi"));

        interaction.handle(
            PointerEvent::Move { x: 504.0, y: 500.0 },
            &shapes,
            &mut transform,
            viewport,
            &aggregation,
            noop,
        );
        assert_eq!(interaction.hovered(), Some("Nairobi"));
        assert_eq!(interaction.tooltip().map(|t| t.x), Some(514.0));

        interaction.handle(
            PointerEvent::Move { x: 50.0, y: 50.0 },
            &shapes,
            &mut transform,
            viewport,
            &aggregation,
            noop,
        );
        assert_eq!(interaction.hovered(), None);

        let mut clicked = None;
        interaction.handle(
            PointerEvent::Click { x: 500.0, y: 500.0 },
            &shapes,
            &mut transform,
            viewport,
            &aggregation,
            |county| clicked = Some(county.to_string()),
        );
        assert_eq!(clicked.as_deref(), Some("Nairobi"));

        let mut missed = false;
        interaction.handle(
            PointerEvent::Click { x: 5.0, y: 5.0 },
            &shapes,
            &mut transform,
            viewport,
            &aggregation,
            |_| missed = true,
        );
        assert!(!missed);
    }

    #[test]
    fn wheel_zooms_at_cursor_within_bounds() {
        let aggregation = aggregation();
        let shapes = vec![marker("Nairobi", 37.0)];
        let viewport = (800.0, 600.0);
        let mut transform = ZoomTransform::IDENTITY;
        let mut interaction = MapInteraction::new();

        let anchor = (200.0, 150.0);
        let before = transform.invert(anchor);
        interaction.handle(
            PointerEvent::Wheel {
                x: anchor.0,
                y: anchor.1,
                delta: -500.0,
            },
            &shapes,
            &mut transform,
            viewport,
            &aggregation,
            |_| {},
        );
        assert!((transform.k - 2.0).abs() < 1e-9, "{transform:?}");
        let after = transform.apply(before);
        assert!((after.0 - anchor.0).abs() < 1e-9 && (after.1 - anchor.1).abs() < 1e-9);

        for _ in 0..10 {
            interaction.handle(
                PointerEvent::Wheel {
                    x: 400.0,
                    y: 300.0,
                    delta: -1000.0,
                },
                &shapes,
                &mut transform,
                viewport,
                &aggregation,
                |_| {},
            );
        }
        assert!((transform.k - MAX_ZOOM).abs() < f64::EPSILON);

        for _ in 0..10 {
            interaction.handle(
                PointerEvent::Wheel {
                    x: 0.0,
                    y: 0.0,
                    delta: 1000.0,
                },
                &shapes,
                &mut transform,
                viewport,
                &aggregation,
                |_| {},
            );
        }
        assert!(transform.is_identity(), "{transform:?}");
    }

    #[test]
    fn drag_pans_within_viewport() {
        let aggregation = aggregation();
        let viewport = (800.0, 600.0);
        let mut transform = ZoomTransform::new(2.0, -400.0, -300.0);
        let mut interaction = MapInteraction::new();

        interaction.handle(
            PointerEvent::Drag { dx: 100.0, dy: -50.0 },
            &[],
            &mut transform,
            viewport,
            &aggregation,
            |_| {},
        );
        assert_eq!((transform.x, transform.y), (-300.0, -350.0));

        interaction.handle(
            PointerEvent::Drag {
                dx: 5000.0,
                dy: -5000.0,
            },
            &[],
            &mut transform,
            viewport,
            &aggregation,
            |_| {},
        );
        assert_eq!((transform.x, transform.y), (0.0, -600.0));
        assert!((transform.k - 2.0).abs() < f64::EPSILON);

        let mut unzoomed = ZoomTransform::IDENTITY;
        interaction.handle(
            PointerEvent::Drag { dx: 40.0, dy: 40.0 },
            &[],
            &mut unzoomed,
            viewport,
            &aggregation,
            |_| {},
        );
        assert!(unzoomed.is_identity());
    }
}
