//! Click picking
//!
//! A click is turned into a camera ray, intersected with the pickable
//! nodes, and the nearest hit replaces the selection. A miss clears it.

mod ray;
mod raycaster;
mod selection;

pub use ray::{intersect_triangle, Ray};
pub use raycaster::{Intersection, Raycaster};
pub use selection::{SelectionChanged, SelectionStore};

use crate::renderer::viewer::{Camera, Viewport};
use crate::scene::{NodeId, Scene, SceneError};

/// Resolves clicks against a fixed set of pickable nodes.
#[derive(Debug, Clone)]
pub struct PickingService {
    pickable: Vec<NodeId>,
    raycaster: Raycaster,
    selection: SelectionStore,
}

impl PickingService {
    /// Every pickable id must belong to `scene`.
    pub fn new(scene: &Scene, pickable: Vec<NodeId>) -> Result<Self, SceneError> {
        scene.check_nodes(&pickable)?;
        Ok(Self {
            pickable,
            raycaster: Raycaster::default(),
            selection: SelectionStore::new(),
        })
    }

    pub fn with_raycaster(mut self, raycaster: Raycaster) -> Self {
        self.raycaster = raycaster;
        self
    }

    pub fn pickable(&self) -> &[NodeId] {
        &self.pickable
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Nearest hit under `pointer` (physical pixels, origin top-left).
    pub fn pick(
        &self,
        pointer: (f32, f32),
        viewport: Viewport,
        camera: &Camera,
        scene: &Scene,
    ) -> Option<Intersection> {
        let ndc = viewport.to_ndc(pointer)?;
        let ray = Ray::from_camera(camera, ndc);
        self.raycaster
            .intersect_nodes(&ray, scene, &self.pickable, true)
            .into_iter()
            .next()
    }

    /// Replace the selection with the node under `pointer`, or clear it.
    pub fn handle_click(
        &mut self,
        pointer: (f32, f32),
        viewport: Viewport,
        camera: &Camera,
        scene: &Scene,
    ) -> SelectionChanged {
        let current = self
            .pick(pointer, viewport, camera, scene)
            .map(|hit| hit.node);
        let previous = self.selection.replace(current);
        let change = SelectionChanged { previous, current };
        if change.is_change() {
            tracing::debug!(
                previous = ?previous.and_then(|id| scene.node(id)).map(|n| n.name.as_str()),
                current = ?current.and_then(|id| scene.node(id)).map(|n| n.name.as_str()),
                "selection changed"
            );
        }
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::geometry::primitives;
    use crate::renderer::material::MaterialDesc;
    use crate::scene::SceneNode;
    use glam::{Mat4, Vec3};
    use std::sync::Arc;

    struct Fixture {
        scene: Scene,
        camera: Camera,
        viewport: Viewport,
        near: NodeId,
        far: NodeId,
    }

    // Camera on +Z looking at the origin. `near` sits at the origin, `far`
    // behind it, and a second column of one cube sits off to the right.
    fn fixture() -> Fixture {
        let mut scene = Scene::new();
        let cube = Arc::new(primitives::cuboid(4.0, 4.0, 4.0));
        let at = |name: &str, p: Vec3| {
            SceneNode::mesh(name, cube.clone(), MaterialDesc::default())
                .with_transform(Mat4::from_translation(p))
        };
        let far = scene.add(at("far", Vec3::new(0.0, 0.0, -20.0)));
        let near = scene.add(at("near", Vec3::ZERO));

        let viewport = Viewport::new(400, 400);
        let mut camera = Camera::new_perspective(
            Vec3::new(0.0, 0.0, 30.0),
            Vec3::ZERO,
            Vec3::Y,
            60.0,
            1.0,
            0.1,
            200.0,
        );
        camera.set_viewport(viewport);
        Fixture {
            scene,
            camera,
            viewport,
            near,
            far,
        }
    }

    #[test]
    fn test_unknown_pickable_is_rejected() {
        let f = fixture();
        let mut other = Scene::new();
        for i in 0..5 {
            other.add(SceneNode::new(format!("n{i}")));
        }
        let stranger = other.find("n4").unwrap();
        let err = PickingService::new(&f.scene, vec![f.near, stranger]).unwrap_err();
        assert_eq!(err, SceneError::UnknownNode(stranger));
    }

    #[test]
    fn test_click_selects_nearest() {
        let f = fixture();
        let mut picking = PickingService::new(&f.scene, vec![f.far, f.near]).unwrap();
        let change = picking.handle_click((200.0, 200.0), f.viewport, &f.camera, &f.scene);
        assert_eq!(change, SelectionChanged { previous: None, current: Some(f.near) });
        assert_eq!(picking.selection().selected(), &[f.near]);

        let hit = picking
            .pick((200.0, 200.0), f.viewport, &f.camera, &f.scene)
            .unwrap();
        assert!((hit.distance - 28.0).abs() < 1e-3);
    }

    #[test]
    fn test_non_pickable_nodes_are_ignored() {
        let f = fixture();
        let mut picking = PickingService::new(&f.scene, vec![f.far]).unwrap();
        picking.handle_click((200.0, 200.0), f.viewport, &f.camera, &f.scene);
        assert_eq!(picking.selection().selected(), &[f.far]);
    }

    #[test]
    fn test_miss_clears_and_repeated_miss_is_idempotent() {
        let f = fixture();
        let mut picking = PickingService::new(&f.scene, vec![f.near, f.far]).unwrap();
        picking.handle_click((200.0, 200.0), f.viewport, &f.camera, &f.scene);

        let first = picking.handle_click((5.0, 5.0), f.viewport, &f.camera, &f.scene);
        assert_eq!(first.previous, Some(f.near));
        assert!(picking.selection().is_empty());

        let second = picking.handle_click((5.0, 5.0), f.viewport, &f.camera, &f.scene);
        assert!(!second.is_change());
        assert!(picking.selection().selected().is_empty());
    }

    #[test]
    fn test_outside_viewport_is_a_miss() {
        let f = fixture();
        let mut picking = PickingService::new(&f.scene, vec![f.near]).unwrap();
        picking.handle_click((200.0, 200.0), f.viewport, &f.camera, &f.scene);
        let change = picking.handle_click((-10.0, 200.0), f.viewport, &f.camera, &f.scene);
        assert_eq!(change.current, None);
    }

    #[test]
    fn test_selection_never_accumulates() {
        let mut f = fixture();
        let side = f.scene.add(
            SceneNode::mesh(
                "side",
                Arc::new(primitives::sphere(2.0, 16, 8)),
                MaterialDesc::default(),
            )
            .with_transform(Mat4::from_translation(Vec3::new(8.0, 0.0, 0.0))),
        );
        let mut picking = PickingService::new(&f.scene, vec![f.near, f.far, side]).unwrap();

        let side_px = f.camera_pixel(Vec3::new(8.0, 0.0, 0.0));
        for pointer in [(200.0, 200.0), side_px, (200.0, 200.0), side_px] {
            picking.handle_click(pointer, f.viewport, &f.camera, &f.scene);
            assert_eq!(picking.selection().selected().len(), 1);
        }
        assert_eq!(picking.selection().current(), Some(side));
    }

    #[test]
    fn test_far_limit_drops_distant_hits() {
        let f = fixture();
        let mut picking = PickingService::new(&f.scene, vec![f.near, f.far])
            .unwrap()
            .with_raycaster(Raycaster::new(0.0, 25.0));
        let change = picking.handle_click((200.0, 200.0), f.viewport, &f.camera, &f.scene);
        assert_eq!(change.current, None);
    }

    impl Fixture {
        fn camera_pixel(&self, world: Vec3) -> (f32, f32) {
            use crate::renderer::viewer::Viewer;
            let ndc = self.camera.view_projection_matrix().project_point3(world);
            let (w, h) = (self.viewport.width as f32, self.viewport.height as f32);
            ((ndc.x + 1.0) / 2.0 * w, (1.0 - ndc.y) / 2.0 * h)
        }
    }
}
