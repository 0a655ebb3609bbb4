//! The showcase application
//!
//! Owns the CPU scene, camera, orbit control and picking state. GPU
//! resources are built on the first frame, once the window surface and
//! its format are known.

mod settings;

pub use settings::{CameraSettings, ControlSettings, RendererSettings, ShowcaseSettings};

use crate::context::WgpuContext;
use crate::effect::{EffectComposer, FxaaEffect, OutlinePass, OutputPass, RenderPass, HDR_FORMAT};
use crate::frame::{FrameLoop, FrameStage, Tick};
use crate::picking::{PickingService, SelectionChanged};
use crate::renderer::control::OrbitControl;
use crate::renderer::viewer::{Camera, Viewport};
use crate::scene::{NodeId, Scene, SceneGpu};
use crate::viewport::{Resizable, ViewportService};
use crate::window::{Event, FrameInput, FrameOutput, MouseButton, Window};

/// Turns a left press and release into a click when the pointer barely
/// moved in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTracker {
    threshold: f32,
    pressed_at: Option<(f32, f32)>,
}

impl ClickTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            pressed_at: None,
        }
    }

    /// Feed an event; returns the click position on a qualifying release.
    pub fn observe(&mut self, event: &Event) -> Option<(f32, f32)> {
        match *event {
            Event::MousePress {
                button: MouseButton::Left,
                position,
                ..
            } => {
                self.pressed_at = Some(position);
                None
            }
            Event::MouseRelease {
                button: MouseButton::Left,
                position,
                ..
            } => {
                let (x, y) = self.pressed_at.take()?;
                let travel = ((position.0 - x).powi(2) + (position.1 - y).powi(2)).sqrt();
                (travel <= self.threshold).then_some(position)
            }
            _ => None,
        }
    }
}

/// GPU state built from the first frame's surface.
struct Renderer {
    ctx: WgpuContext,
    scene: SceneGpu,
    composer: EffectComposer,
}

impl Renderer {
    fn new(
        ctx: &WgpuContext,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        scene: &Scene,
        settings: &ShowcaseSettings,
    ) -> anyhow::Result<Self> {
        let (width, height) = (viewport.width, viewport.height);
        let renderer = &settings.renderer;

        let scene_gpu = SceneGpu::new(ctx, HDR_FORMAT, scene)?;

        let mut composer = EffectComposer::new(ctx, width, height);
        composer.add(Box::new(RenderPass::new(scene.background)));
        composer.add(Box::new(OutlinePass::new(ctx, width, height, settings.outline)?));
        let output_format = if renderer.antialias {
            wgpu::TextureFormat::Rgba8Unorm
        } else {
            surface_format
        };
        composer.add(Box::new(OutputPass::new(
            ctx,
            output_format,
            renderer.tone_mapping,
            renderer.exposure,
        )?));
        if renderer.antialias {
            composer.add(Box::new(FxaaEffect::new(ctx, surface_format, width, height)?));
        }
        tracing::info!(passes = ?composer.labels(), "post-processing chain ready");

        Ok(Self {
            ctx: ctx.clone(),
            scene: scene_gpu,
            composer,
        })
    }
}

/// One frame of the showcase: orbit step, then the effect chain.
struct ShowcaseFrame<'a> {
    control: &'a mut OrbitControl,
    camera: &'a mut Camera,
    renderer: &'a mut Renderer,
    selection: &'a [NodeId],
    output: &'a wgpu::TextureView,
}

impl FrameStage for ShowcaseFrame<'_> {
    fn update(&mut self, dt: f32) {
        self.control.update(self.camera, dt);
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let renderer = &mut *self.renderer;
        let mut encoder = renderer.ctx.create_encoder(Some("frame encoder"));
        renderer.composer.render(
            &mut encoder,
            self.camera,
            &renderer.scene,
            self.selection,
            self.output,
        );
        renderer.ctx.submit([encoder.finish()]);
        Ok(())
    }
}

/// Textured ground, six primitives, orbit camera and click-to-outline
/// selection.
pub struct Showcase {
    settings: ShowcaseSettings,
    scene: Scene,
    camera: Camera,
    control: OrbitControl,
    picking: PickingService,
    viewport: ViewportService,
    frame_loop: FrameLoop,
    clicks: ClickTracker,
    renderer: Option<Renderer>,
}

impl Showcase {
    pub fn new(settings: ShowcaseSettings) -> anyhow::Result<Self> {
        let (scene, pickable) = Scene::from_layout(&settings.layout)?;
        let picking = PickingService::new(&scene, pickable)?;

        let (width, height) = settings.window.size;
        let viewport = ViewportService::new(width, height);
        let mut camera = settings.camera.build(viewport.viewport().aspect());
        camera.set_viewport(viewport.viewport());
        let control = settings.control.build(settings.camera.target);

        tracing::info!(
            nodes = scene.len(),
            pickable = picking.pickable().len(),
            "scene assembled"
        );

        Ok(Self {
            clicks: ClickTracker::new(settings.click_threshold),
            settings,
            scene,
            camera,
            control,
            picking,
            viewport,
            frame_loop: FrameLoop::new(),
            renderer: None,
        })
    }

    /// Open the window and run until it closes.
    pub fn run(self) -> anyhow::Result<()> {
        let window = Window::new(self.settings.window.clone());
        window.render_loop(self, |showcase, input| showcase.frame(input))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    /// Currently selected nodes, zero or one.
    pub fn selection(&self) -> &[NodeId] {
        self.picking.selection().selected()
    }

    /// Dispatch one frame's events in delivery order: resizes and clicks
    /// first, then the remaining pointer input drives the orbit control.
    pub fn handle_events(&mut self, events: &mut [Event]) -> Vec<SelectionChanged> {
        let mut changes = Vec::new();
        for event in events.iter() {
            if let Event::Resize { width, height } = *event {
                let mut surfaces: Vec<&mut dyn Resizable> = Vec::new();
                if let Some(renderer) = self.renderer.as_mut() {
                    surfaces.push(&mut renderer.composer);
                }
                self.viewport
                    .handle_resize((width, height), &mut self.camera, &mut surfaces);
            } else if let Some(pointer) = self.clicks.observe(event) {
                changes.push(self.picking.handle_click(
                    pointer,
                    self.viewport.viewport(),
                    &self.camera,
                    &self.scene,
                ));
            }
        }
        self.control.handle_events(&self.camera, events);
        changes
    }

    /// Frame callback of the render loop.
    pub fn frame(&mut self, mut input: FrameInput<'_>) -> FrameOutput {
        if self.renderer.is_none() {
            match Renderer::new(
                input.ctx,
                input.surface_format,
                input.viewport,
                &self.scene,
                &self.settings,
            ) {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(err) => {
                    tracing::error!(error = %err, "failed to build renderer");
                    return FrameOutput::exit();
                }
            }
        }

        self.handle_events(&mut input.events);

        let Some(renderer) = self.renderer.as_mut() else {
            return FrameOutput::exit();
        };
        let mut stage = ShowcaseFrame {
            control: &mut self.control,
            camera: &mut self.camera,
            renderer,
            selection: self.picking.selection().selected(),
            output: input.surface_view,
        };
        match self.frame_loop.tick(&mut stage, input.delta_time as f32) {
            Tick::Continue => FrameOutput::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::viewer::Viewer;
    use glam::Vec3;

    fn press(position: (f32, f32)) -> Event {
        Event::MousePress {
            button: MouseButton::Left,
            position,
            handled: false,
        }
    }

    fn release(position: (f32, f32)) -> Event {
        Event::MouseRelease {
            button: MouseButton::Left,
            position,
            handled: false,
        }
    }

    fn showcase() -> Showcase {
        let mut showcase = Showcase::new(ShowcaseSettings::default()).unwrap();
        showcase.handle_events(&mut [Event::Resize {
            width: 1280,
            height: 720,
        }]);
        showcase
    }

    fn pixel_of(showcase: &Showcase, world: Vec3) -> (f32, f32) {
        let ndc = showcase.camera().view_projection_matrix().project_point3(world);
        let viewport = showcase.viewport();
        (
            (ndc.x + 1.0) / 2.0 * viewport.width as f32,
            (1.0 - ndc.y) / 2.0 * viewport.height as f32,
        )
    }

    fn click(showcase: &mut Showcase, at: (f32, f32)) -> Vec<SelectionChanged> {
        showcase.handle_events(&mut [press(at), release(at)])
    }

    #[test]
    fn test_click_tracker_threshold() {
        let mut clicks = ClickTracker::new(5.0);
        assert_eq!(clicks.observe(&press((10.0, 10.0))), None);
        assert_eq!(clicks.observe(&release((13.0, 14.0))), Some((13.0, 14.0)));

        clicks.observe(&press((10.0, 10.0)));
        assert_eq!(clicks.observe(&release((30.0, 10.0))), None);
        assert_eq!(clicks.observe(&release((10.0, 10.0))), None);
    }

    #[test]
    fn test_unbounded_threshold_picks_after_drag() {
        let mut clicks = ClickTracker::new(f32::INFINITY);
        clicks.observe(&press((10.0, 10.0)));
        assert_eq!(clicks.observe(&release((400.0, 250.0))), Some((400.0, 250.0)));

        let settings = ShowcaseSettings::default().click_threshold(f32::INFINITY);
        let mut showcase = Showcase::new(settings).unwrap();
        showcase.handle_events(&mut [Event::Resize {
            width: 1280,
            height: 720,
        }]);
        let cube = showcase.scene().find("cube").unwrap();
        let at_cube = pixel_of(&showcase, Vec3::new(-20.0, 5.0, -10.0));
        let start = (at_cube.0 - 60.0, at_cube.1);
        showcase.handle_events(&mut [press(start), release(at_cube)]);
        assert_eq!(showcase.selection(), &[cube]);
    }

    #[test]
    fn test_pickable_set_is_fixed() {
        let showcase = showcase();
        let names: Vec<_> = showcase
            .picking
            .pickable()
            .iter()
            .map(|id| showcase.scene().node(*id).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["cube", "sphere", "torus", "cone", "cylinder", "torus knot"]);
        assert!(showcase.selection().is_empty());
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let showcase = showcase();
        assert!((showcase.camera().aspect() - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(showcase.viewport(), Viewport::new(1280, 720));
    }

    #[test]
    fn test_click_replaces_selection() {
        let mut showcase = showcase();
        let cube = showcase.scene().find("cube").unwrap();
        let sphere = showcase.scene().find("sphere").unwrap();

        let at_cube = pixel_of(&showcase, Vec3::new(-20.0, 5.0, -10.0));
        let changes = click(&mut showcase, at_cube);
        assert_eq!(changes, vec![SelectionChanged { previous: None, current: Some(cube) }]);
        assert_eq!(showcase.selection(), &[cube]);

        let at_sphere = pixel_of(&showcase, Vec3::new(15.0, 10.0, 15.0));
        click(&mut showcase, at_sphere);
        assert_eq!(showcase.selection(), &[sphere]);
    }

    #[test]
    fn test_click_on_empty_space_clears_selection() {
        let mut showcase = showcase();
        let at_cube = pixel_of(&showcase, Vec3::new(-20.0, 5.0, -10.0));
        click(&mut showcase, at_cube);
        assert_eq!(showcase.selection().len(), 1);

        // Top-left corner looks over the ground into the background.
        click(&mut showcase, (1.0, 1.0));
        assert!(showcase.selection().is_empty());
        click(&mut showcase, (1.0, 1.0));
        assert!(showcase.selection().is_empty());
    }

    #[test]
    fn test_ground_is_not_selectable() {
        let mut showcase = showcase();
        let ground_point = pixel_of(&showcase, Vec3::new(0.0, 0.0, 25.0));
        click(&mut showcase, ground_point);
        assert!(showcase.selection().is_empty());
    }

    #[test]
    fn test_drag_orbits_instead_of_selecting() {
        let mut showcase = showcase();
        let at_cube = pixel_of(&showcase, Vec3::new(-20.0, 5.0, -10.0));
        let moved = (at_cube.0 + 40.0, at_cube.1);
        let mut events = [
            press(at_cube),
            Event::MouseMotion {
                delta: (40.0, 0.0),
                position: moved,
                handled: false,
            },
            release(moved),
        ];
        let changes = showcase.handle_events(&mut events);
        assert!(changes.is_empty());
        assert!(events[1].is_handled());
        assert!(showcase.selection().is_empty());
    }
}
