//! Paper space layouts

use super::PlotSettings;
use crate::entities::{EntityList, EntityType, LwPolyline, Viewport};
use crate::types::{center_and_size, Handle, HandleSeed, Vector2};

/// A named paper space page: owned entities plus page setup
#[derive(Debug, PartialEq)]
pub struct Layout {
    /// LAYOUT object handle, assigned on write
    pub handle: Handle,
    pub name: String,
    /// `*Paper_Space`, `*Paper_Space0`, ...; assigned on write
    pub block_name: String,
    pub plot_settings: PlotSettings,
    /// Paper space limits in millimeters
    pub min_limits: Vector2,
    pub max_limits: Vector2,
    /// Default viewport extents in millimeters
    pub min_extents: Vector2,
    pub max_extents: Vector2,
    /// Entities drawn on this page, viewports included
    pub entities: EntityList,
    /// Tab order; assigned on write
    pub tab_order: i32,
}

impl Layout {
    pub fn new(name: impl Into<String>) -> Self {
        Layout {
            handle: Handle::NULL,
            name: name.into(),
            block_name: String::new(),
            plot_settings: PlotSettings::default(),
            min_limits: Vector2::new(-20.0, -7.5),
            max_limits: Vector2::new(277.0, 202.0),
            min_extents: Vector2::new(25.7, 19.5),
            max_extents: Vector2::new(231.3, 175.5),
            entities: EntityList::new(),
            tab_order: 0,
        }
    }

    /// Add an entity to the page; it is flagged as paper space
    pub fn add_entity(&mut self, entity: impl Into<EntityType>) {
        let mut entity = entity.into();
        entity.common_mut().paperspace = true;
        self.entities.push(entity);
    }

    /// Add a viewport clipped by `polygon_ps` (paper space), showing
    /// `center_ms` with `height_ms` model units. Returns the viewport handle.
    pub fn add_polygonal_viewport(
        &mut self,
        handles: &mut HandleSeed,
        polygon_ps: Vec<Vector2>,
        center_ms: Vector2,
        height_ms: f64,
        twist_deg: f64,
    ) -> Handle {
        let (center_ps, width_ps, height_ps) =
            center_and_size(&polygon_ps).unwrap_or((Vector2::ZERO, 0.0, 0.0));

        let mut outline = LwPolyline::from_points(polygon_ps, true);
        let outline_handle = handles.allocate();
        outline.common.handle = outline_handle;
        self.add_entity(outline);

        let mut viewport = Viewport::new();
        viewport.common.handle = handles.allocate();
        viewport.center = center_ps;
        viewport.width = width_ps;
        viewport.height = height_ps;
        viewport.view_center = center_ms;
        viewport.view_height = height_ms;
        viewport.twist_angle = twist_deg;
        viewport.clip_entity = Some(outline_handle);
        let handle = viewport.common.handle;
        self.add_entity(viewport);
        handle
    }

    /// Add a viewport showing `polygon_ms`, sized to `width_ps` paper units
    /// and centered on `center_ps`
    pub fn add_polygonal_viewport_by_width(
        &mut self,
        handles: &mut HandleSeed,
        polygon_ms: &[Vector2],
        center_ps: Vector2,
        width_ps: f64,
        twist_deg: f64,
    ) -> Handle {
        let (polygon_ps, center_ms, height_ms) =
            project_polygon(polygon_ms, center_ps, ViewportScale::Width(width_ps), twist_deg);
        self.add_polygonal_viewport(handles, polygon_ps, center_ms, height_ms, twist_deg)
    }

    /// Add a viewport showing `polygon_ms` at a fixed model-to-paper `scale`
    pub fn add_polygonal_viewport_by_scale(
        &mut self,
        handles: &mut HandleSeed,
        polygon_ms: &[Vector2],
        center_ps: Vector2,
        scale: f64,
        twist_deg: f64,
    ) -> Handle {
        let (polygon_ps, center_ms, height_ms) =
            project_polygon(polygon_ms, center_ps, ViewportScale::Factor(scale), twist_deg);
        self.add_polygonal_viewport(handles, polygon_ps, center_ms, height_ms, twist_deg)
    }
}

enum ViewportScale {
    /// Target paper space width
    Width(f64),
    /// Model to paper factor
    Factor(f64),
}

/// Map a model space outline into paper space.
///
/// Returns the paper space polygon, the model space view center and the
/// model space view height.
fn project_polygon(
    polygon_ms: &[Vector2],
    center_ps: Vector2,
    scale: ViewportScale,
    twist_deg: f64,
) -> (Vec<Vector2>, Vector2, f64) {
    let twist = twist_deg.to_radians();
    let rotated: Vec<Vector2> = polygon_ms.iter().map(|p| p.rotate(twist)).collect();
    let (rotated_center, width_ms, height_ms) =
        center_and_size(&rotated).unwrap_or((Vector2::ZERO, 0.0, 0.0));

    let center_ms = rotated_center.rotate(-twist);
    let shift_ms = center_ms - rotated_center;

    let factor = match scale {
        ViewportScale::Width(w) if width_ms != 0.0 => w / width_ms,
        ViewportScale::Width(_) => 0.0,
        ViewportScale::Factor(f) => f,
    };
    let shift_ps = center_ps - center_ms * factor;
    let polygon_ps = rotated
        .iter()
        .map(|p| (*p + shift_ms) * factor + shift_ps)
        .collect();
    (polygon_ps, center_ms, height_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Vector2> {
        vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(size, 0.0),
            Vector2::new(size, size),
            Vector2::new(0.0, size),
        ]
    }

    #[test]
    fn test_layout_defaults() {
        let l = Layout::new("Layout1");
        assert_eq!(l.min_limits, Vector2::new(-20.0, -7.5));
        assert_eq!(l.max_extents, Vector2::new(231.3, 175.5));
        assert!(l.entities.is_empty());
    }

    #[test]
    fn test_polygonal_viewport_links_outline() {
        let mut l = Layout::new("Layout1");
        let mut seed = HandleSeed::starting_after(0x100);
        let vp_handle =
            l.add_polygonal_viewport(&mut seed, square(10.0), Vector2::new(50.0, 50.0), 100.0, 0.0);

        assert_eq!(l.entities.len(), 2);
        let outline = l.entities.get(0).unwrap().handle();
        match l.entities.find(vp_handle) {
            Some(EntityType::Viewport(vp)) => {
                assert_eq!(vp.clip_entity, Some(outline));
                assert_eq!(vp.center, Vector2::new(5.0, 5.0));
                assert_eq!(vp.width, 10.0);
                assert_eq!(vp.view_height, 100.0);
                assert!(vp.common.paperspace);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_viewport_by_width_scales_polygon() {
        let mut l = Layout::new("Layout1");
        let mut seed = HandleSeed::starting_after(0x100);
        l.add_polygonal_viewport_by_width(&mut seed, &square(100.0), Vector2::new(100.0, 100.0), 50.0, 0.0);
        match l.entities.get(0) {
            Some(EntityType::LwPolyline(p)) => {
                assert!(p.vertices[0].approx_eq(&Vector2::new(75.0, 75.0), 1e-9));
                assert!(p.vertices[2].approx_eq(&Vector2::new(125.0, 125.0), 1e-9));
            }
            other => panic!("unexpected {:?}", other),
        }
        match l.entities.get(1) {
            Some(EntityType::Viewport(vp)) => {
                assert!(vp.view_center.approx_eq(&Vector2::new(50.0, 50.0), 1e-9));
                assert!((vp.view_height - 100.0).abs() < 1e-9);
                assert!((vp.height - 50.0).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_viewport_by_scale_with_twist() {
        let (poly, center_ms, height_ms) = project_polygon(
            &square(10.0),
            Vector2::new(0.0, 0.0),
            ViewportScale::Factor(2.0),
            90.0,
        );
        assert!(center_ms.approx_eq(&Vector2::new(5.0, 5.0), 1e-9));
        assert!((height_ms - 10.0).abs() < 1e-9);
        let (c, w, h) = center_and_size(&poly).unwrap();
        assert!(c.approx_eq(&Vector2::ZERO, 1e-9));
        assert!((w - 20.0).abs() < 1e-9 && (h - 20.0).abs() < 1e-9);
    }
}
