use crate::camera::Camera;
use crate::geometry::CUBE_COUNT;
use glam::Mat4;
use std::convert::Infallible;
use std::fmt::Write as _;
use tricube_animation::AnimationState;
use tricube_common::{ControlPanel, Rgb};

/// Which faces a draw discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullFace {
    Front,
    Back,
}

impl CullFace {
    /// Order of the two passes per cube: inner faces first, then outer.
    pub const PASSES: [CullFace; 2] = [CullFace::Front, CullFace::Back];
}

/// Uniforms shared by every draw in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub distortion: f32,
    pub distortion_speed: f32,
    pub light_intensity: f32,
    pub tint: Rgb,
    /// Seconds on the render driver's clock.
    pub time: f32,
}

/// Per-cube transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectUniforms {
    pub model_view: Mat4,
    pub normal_matrix: Mat4,
}

/// GPU-side half of the frame loop. All geometry is uploaded when the
/// backend is created; a frame only moves uniforms and issues draws.
///
/// Calls arrive in this order: `begin_frame`, `upload_frame_uniforms`, then
/// per cube `upload_object_uniforms` followed by its draws, then `end_frame`.
pub trait CubeBackend {
    type Error;

    /// Clear color and depth.
    fn begin_frame(&mut self, background: Rgb);

    fn upload_frame_uniforms(&mut self, uniforms: &FrameUniforms);

    fn upload_object_uniforms(&mut self, cube: usize, uniforms: &ObjectUniforms);

    fn draw_cube(&mut self, cube: usize, cull: CullFace);

    fn end_frame(&mut self) -> Result<(), Self::Error>;
}

/// Owns the animation state and drives one frame per display refresh.
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    animation: AnimationState,
    camera: Camera,
    frames: u64,
}

impl FrameRenderer {
    pub fn new(camera: Camera) -> Self {
        Self {
            animation: AnimationState::new(),
            camera,
            frames: 0,
        }
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// For the interaction controller, which retargets between frames.
    pub fn animation_mut(&mut self) -> &mut AnimationState {
        &mut self.animation
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Render one frame at `timestamp_ms` on the driver's monotonic clock.
    pub fn render_frame<B: CubeBackend>(
        &mut self,
        backend: &mut B,
        timestamp_ms: f64,
        panel: &ControlPanel,
    ) -> Result<(), B::Error> {
        let time = (timestamp_ms * 0.001) as f32;
        self.animation.advance();

        let options = panel.options();
        backend.begin_frame(panel.background());
        backend.upload_frame_uniforms(&FrameUniforms {
            projection: self.camera.projection_matrix(),
            distortion: self.animation.distortion(),
            distortion_speed: options.distortion_frequency,
            light_intensity: options.light_intensity,
            tint: panel.tint(),
            time,
        });

        for cube in 0..CUBE_COUNT {
            let model_view = self
                .camera
                .model_view(cube, self.animation.rotation_angle());
            backend.upload_object_uniforms(
                cube,
                &ObjectUniforms {
                    model_view,
                    normal_matrix: Camera::normal_matrix(model_view),
                },
            );
            for cull in CullFace::PASSES {
                backend.draw_cube(cube, cull);
            }
        }

        self.frames += 1;
        backend.end_frame()
    }
}

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Begin(Rgb),
    FrameUniforms(FrameUniforms),
    ObjectUniforms(usize, ObjectUniforms),
    Draw(usize, CullFace),
    End,
}

/// Backend that records the command stream instead of drawing.
///
/// Useful for headless runs, logging, and testing the frame sequence.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<Command>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Commands of the most recent frame, from its `Begin`.
    pub fn last_frame(&self) -> &[Command] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, Command::Begin(_)))
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Human-readable dump of the most recent frame.
    pub fn describe_last_frame(&self) -> String {
        let mut out = String::new();
        for command in self.last_frame() {
            let _ = match command {
                Command::Begin(bg) => writeln!(out, "begin clear={bg}"),
                Command::FrameUniforms(u) => writeln!(
                    out,
                    "  frame t={:.3} distortion={:.3} speed={:.2} light={:.2} tint={}",
                    u.time, u.distortion, u.distortion_speed, u.light_intensity, u.tint
                ),
                Command::ObjectUniforms(cube, u) => {
                    let eye = u.model_view.w_axis;
                    writeln!(
                        out,
                        "  cube {cube} at ({:.2}, {:.2}, {:.2})",
                        eye.x, eye.y, eye.z
                    )
                }
                Command::Draw(cube, cull) => writeln!(out, "    draw {cube} cull={cull:?}"),
                Command::End => writeln!(out, "end"),
            };
        }
        out
    }
}

impl CubeBackend for RecordingBackend {
    type Error = Infallible;

    fn begin_frame(&mut self, background: Rgb) {
        self.commands.push(Command::Begin(background));
    }

    fn upload_frame_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.commands.push(Command::FrameUniforms(*uniforms));
    }

    fn upload_object_uniforms(&mut self, cube: usize, uniforms: &ObjectUniforms) {
        self.commands.push(Command::ObjectUniforms(cube, *uniforms));
    }

    fn draw_cube(&mut self, cube: usize, cull: CullFace) {
        self.commands.push(Command::Draw(cube, cull));
    }

    fn end_frame(&mut self) -> Result<(), Infallible> {
        self.commands.push(Command::End);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tricube_animation::InteractionController;

    fn run_frame(renderer: &mut FrameRenderer, backend: &mut RecordingBackend, ms: f64) {
        let panel = ControlPanel::default();
        let Ok(()) = renderer.render_frame(backend, ms, &panel);
    }

    #[test]
    fn each_cube_drawn_twice_front_then_back() {
        let mut renderer = FrameRenderer::default();
        let mut backend = RecordingBackend::new();
        run_frame(&mut renderer, &mut backend, 16.0);

        let draws: Vec<_> = backend
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::Draw(cube, cull) => Some((*cube, *cull)),
                _ => None,
            })
            .collect();
        assert_eq!(
            draws,
            vec![
                (0, CullFace::Front),
                (0, CullFace::Back),
                (1, CullFace::Front),
                (1, CullFace::Back),
                (2, CullFace::Front),
                (2, CullFace::Back),
            ]
        );
    }

    #[test]
    fn shared_uniforms_precede_every_draw() {
        let mut renderer = FrameRenderer::default();
        let mut backend = RecordingBackend::new();
        run_frame(&mut renderer, &mut backend, 16.0);

        let cmds = backend.commands();
        assert!(matches!(cmds[0], Command::Begin(_)));
        assert!(matches!(cmds[1], Command::FrameUniforms(_)));
        assert!(matches!(cmds.last(), Some(Command::End)));
        assert_eq!(
            cmds.iter()
                .filter(|c| matches!(c, Command::FrameUniforms(_)))
                .count(),
            1
        );
    }

    #[test]
    fn object_uniforms_precede_their_draws() {
        let mut renderer = FrameRenderer::default();
        let mut backend = RecordingBackend::new();
        run_frame(&mut renderer, &mut backend, 16.0);

        let mut current = None;
        for c in backend.commands() {
            match c {
                Command::ObjectUniforms(cube, _) => current = Some(*cube),
                Command::Draw(cube, _) => assert_eq!(current, Some(*cube)),
                _ => {}
            }
        }
    }

    #[test]
    fn frame_uniforms_carry_panel_and_animation() {
        let mut renderer = FrameRenderer::default();
        let mut backend = RecordingBackend::new();
        let mut ctl = InteractionController::new();
        ctl.click(renderer.animation_mut(), std::time::Duration::ZERO);

        let mut panel = ControlPanel::default();
        panel.options_mut().light_intensity = 0.9;
        panel.options_mut().tint_color_hex = "#00ff00".into();
        panel.refresh().unwrap();
        let Ok(()) = renderer.render_frame(&mut backend, 2500.0, &panel);

        let Command::FrameUniforms(u) = backend.commands()[1] else {
            panic!("expected frame uniforms");
        };
        assert_eq!(u.time, 2.5);
        assert_eq!(u.light_intensity, 0.9);
        assert_eq!(u.distortion_speed, panel.options().distortion_frequency);
        assert_eq!(u.tint, Rgb::new(0.0, 1.0, 0.0));
        assert_eq!(u.distortion, 1.0);
        assert_eq!(backend.commands()[0], Command::Begin(panel.background()));
    }

    #[test]
    fn animation_advances_once_per_frame() {
        let mut renderer = FrameRenderer::default();
        let mut backend = RecordingBackend::new();
        for i in 0..10 {
            run_frame(&mut renderer, &mut backend, i as f64 * 16.7);
        }
        assert_eq!(renderer.frame_count(), 10);
        let expected = 10.0 * 35.0 / 2000.0;
        assert!((renderer.animation().rotation_angle() - expected).abs() < 1e-9);
        assert_eq!(backend.last_frame().len(), 1 + 1 + 3 * 3 + 1);
    }

    #[test]
    fn normal_matrix_is_inverse_transpose() {
        let mut renderer = FrameRenderer::default();
        let mut backend = RecordingBackend::new();
        run_frame(&mut renderer, &mut backend, 0.0);
        for c in backend.commands() {
            if let Command::ObjectUniforms(_, u) = c {
                let expected = u.model_view.inverse().transpose();
                assert!(u.normal_matrix.abs_diff_eq(expected, 1e-5));
            }
        }
    }

    #[test]
    fn description_lists_draws() {
        let mut renderer = FrameRenderer::default();
        let mut backend = RecordingBackend::new();
        run_frame(&mut renderer, &mut backend, 0.0);
        run_frame(&mut renderer, &mut backend, 16.0);
        let text = backend.describe_last_frame();
        assert!(text.starts_with("begin clear=#1b1b1b"));
        assert!(text.contains("t=0.016"));
        assert_eq!(text.matches("draw").count(), 6);
        assert!(text.ends_with("end\n"));
    }
}
