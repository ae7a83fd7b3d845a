use egui::Context as EguiContext;
use std::time::{Duration, Instant};
use tricube_animation::InteractionController;
use tricube_common::options::{
    DISTORTION_AMPLITUDE_RANGE, DISTORTION_FREQUENCY_RANGE, HOVER_ROTATION_SPEED_RANGE,
    LIGHT_INTENSITY_RANGE,
};
use tricube_common::{ColorError, ControlOptions, ControlPanel, Rgb};
use tricube_render::{CubeBackend, FrameRenderer};

/// Everything the frame loop, pointer handlers and control panel share.
pub struct AppState {
    pub panel: ControlPanel,
    pub controller: InteractionController,
    pub renderer: FrameRenderer,
    pub show_panel: bool,
    started: Instant,
}

impl AppState {
    pub fn new(options: ControlOptions) -> Result<Self, ColorError> {
        Ok(Self {
            panel: ControlPanel::new(options)?,
            controller: InteractionController::new(),
            renderer: FrameRenderer::default(),
            show_panel: true,
            started: Instant::now(),
        })
    }

    /// Time on the app's monotonic clock.
    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn pointer_enter(&mut self) {
        self.controller
            .pointer_enter(self.renderer.animation_mut(), self.panel.options());
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave(self.renderer.animation_mut());
    }

    pub fn click(&mut self, now: Duration) {
        self.controller.click(self.renderer.animation_mut(), now);
    }

    /// Fire the click cooldown if due, then render one frame.
    pub fn frame<B: CubeBackend>(&mut self, backend: &mut B, now: Duration) -> Result<(), B::Error> {
        self.controller
            .tick(self.renderer.animation_mut(), self.panel.options(), now);
        self.renderer
            .render_frame(backend, now.as_secs_f64() * 1000.0, &self.panel)
    }

    pub fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        egui::Window::new("Controls")
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                let options = self.panel.options_mut();
                egui::CollapsingHeader::new("On hover")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.add(
                            egui::Slider::new(
                                &mut options.distortion_amplitude,
                                DISTORTION_AMPLITUDE_RANGE,
                            )
                            .text("amplitude"),
                        );
                        ui.add(
                            egui::Slider::new(
                                &mut options.distortion_frequency,
                                DISTORTION_FREQUENCY_RANGE,
                            )
                            .text("frequency"),
                        );
                        ui.add(
                            egui::Slider::new(
                                &mut options.hover_rotation_speed,
                                HOVER_ROTATION_SPEED_RANGE,
                            )
                            .text("rotation speed"),
                        );
                    });
                ui.add(
                    egui::Slider::new(&mut options.light_intensity, LIGHT_INTENSITY_RANGE)
                        .text("light intensity"),
                );

                let mut colors_changed = color_row(ui, "color", &mut options.tint_color_hex);
                colors_changed |= color_row(ui, "bkg color", &mut options.background_color_hex);
                if colors_changed {
                    // a bad hex keeps the previous color; refresh already logged it
                    let _ = self.panel.refresh();
                }

                ui.separator();
                let anim = self.renderer.animation();
                ui.label(format!("Mode: {:?}", self.controller.mode()));
                ui.label(format!(
                    "Distortion: {:.2}  Speed: {:.1}",
                    anim.distortion(),
                    anim.rotation_speed()
                ));
                ui.small("F1: Toggle panel");
            });
    }
}

/// Color picker plus hex field. Returns true when the hex string was committed.
fn color_row(ui: &mut egui::Ui, label: &str, hex: &mut String) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut changed = false;
        if let Ok(rgb) = Rgb::from_hex(hex) {
            let mut srgb = rgb.to_rgb8();
            if egui::widgets::color_picker::color_edit_button_srgb(ui, &mut srgb).changed() {
                *hex = Rgb::from_rgb8(srgb).to_hex();
                changed = true;
            }
        }
        let field = ui.add(egui::TextEdit::singleline(hex).desired_width(72.0));
        changed | field.lost_focus()
    })
    .inner
}
