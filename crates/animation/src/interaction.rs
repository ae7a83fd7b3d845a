use crate::cooldown::CooldownTimer;
use crate::state::{AnimationState, Smoothing, Targets};
use std::time::Duration;
use tricube_common::ControlOptions;

pub const CLICK_COOLDOWN: Duration = Duration::from_millis(500);
pub const CLICK_DISTORTION_STEP: f32 = 1.0;
pub const CLICK_ROTATION_SPEED_STEP: f32 = 30.0;

/// Where the pointer is relative to the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Hovered,
    Clicked,
}

fn hover_targets(options: &ControlOptions) -> Targets {
    Targets {
        distortion: options.distortion_amplitude,
        rotation_speed: options.hover_rotation_speed,
    }
}

/// Pointer state machine that retargets an [`AnimationState`].
///
/// Handlers take the animation state and options explicitly; the controller
/// only owns its mode and the click cooldown.
#[derive(Debug, Clone)]
pub struct InteractionController {
    mode: InteractionMode,
    cooldown: CooldownTimer,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            mode: InteractionMode::Idle,
            cooldown: CooldownTimer::new(CLICK_COOLDOWN),
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// When the pending click cooldown fires, if any.
    pub fn cooldown_deadline(&self) -> Option<Duration> {
        self.cooldown.deadline()
    }

    pub fn pointer_enter(&mut self, state: &mut AnimationState, options: &ControlOptions) {
        state.retarget(hover_targets(options), Smoothing::FAST);
        // a pending cooldown still owns the exit from Clicked
        if self.mode != InteractionMode::Clicked {
            self.mode = InteractionMode::Hovered;
        }
        tracing::debug!(mode = ?self.mode, "pointer enter");
    }

    pub fn pointer_leave(&mut self, state: &mut AnimationState) {
        self.cooldown.cancel();
        state.retarget(Targets::IDLE, Smoothing::SLOW);
        self.mode = InteractionMode::Idle;
        tracing::debug!("pointer leave");
    }

    pub fn click(&mut self, state: &mut AnimationState, now: Duration) {
        state.kick(CLICK_DISTORTION_STEP, CLICK_ROTATION_SPEED_STEP);
        state.retarget(state.targets(), Smoothing::FAST);
        self.cooldown.arm(now);
        self.mode = InteractionMode::Clicked;
        tracing::debug!(
            distortion = state.distortion(),
            rotation_speed = state.rotation_speed(),
            "click"
        );
    }

    /// Fire the click cooldown if it is due. Returns true on the
    /// `Clicked -> Hovered` transition.
    pub fn tick(
        &mut self,
        state: &mut AnimationState,
        options: &ControlOptions,
        now: Duration,
    ) -> bool {
        if !self.cooldown.fire_if_due(now) {
            return false;
        }
        state.retarget(hover_targets(options), Smoothing::SLOW);
        self.mode = InteractionMode::Hovered;
        tracing::debug!("click cooldown elapsed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn enter_targets_hover_values() {
        let options = ControlOptions::default();
        let mut state = AnimationState::new();
        let mut ctl = InteractionController::new();

        ctl.pointer_enter(&mut state, &options);
        assert_eq!(ctl.mode(), InteractionMode::Hovered);
        assert_eq!(state.targets().distortion, options.distortion_amplitude);
        assert_eq!(state.targets().rotation_speed, options.hover_rotation_speed);
        assert_eq!(state.smoothing(), Smoothing::FAST);
    }

    #[test]
    fn leave_targets_idle_and_cancels_cooldown() {
        let options = ControlOptions::default();
        let mut state = AnimationState::new();
        let mut ctl = InteractionController::new();

        ctl.pointer_enter(&mut state, &options);
        ctl.click(&mut state, ms(0));
        ctl.pointer_leave(&mut state);

        assert_eq!(ctl.mode(), InteractionMode::Idle);
        assert_eq!(state.targets(), Targets::IDLE);
        assert_eq!(state.smoothing(), Smoothing::SLOW);
        assert_eq!(ctl.cooldown_deadline(), None);
        assert!(!ctl.tick(&mut state, &options, ms(10_000)));
        assert_eq!(state.targets(), Targets::IDLE);
    }

    #[test]
    fn clicks_bump_distortion_in_steps() {
        let mut state = AnimationState::new();
        let mut ctl = InteractionController::new();
        assert_eq!(state.distortion(), 0.0);

        ctl.click(&mut state, ms(0));
        assert_eq!(state.distortion(), 1.0);
        assert_eq!(state.targets().distortion, 1.0);
        assert_eq!(ctl.mode(), InteractionMode::Clicked);
        assert_eq!(state.smoothing(), Smoothing::FAST);

        ctl.click(&mut state, ms(100));
        assert_eq!(state.distortion(), 2.0);
        assert_eq!(state.targets().distortion, 2.0);
    }

    #[test]
    fn click_debounce_reverts_once_after_last_click() {
        let options = ControlOptions::default();
        let mut state = AnimationState::new();
        let mut ctl = InteractionController::new();
        ctl.pointer_enter(&mut state, &options);

        ctl.click(&mut state, ms(0));
        ctl.click(&mut state, ms(100));
        assert_eq!(ctl.cooldown_deadline(), Some(ms(600)));

        let mut transitions = Vec::new();
        for t in (0..=2000).step_by(10) {
            if ctl.tick(&mut state, &options, ms(t)) {
                transitions.push(t);
            }
        }
        assert_eq!(transitions, vec![600]);
        assert_eq!(ctl.mode(), InteractionMode::Hovered);
        assert_eq!(state.smoothing(), Smoothing::SLOW);
        assert_eq!(state.targets().distortion, options.distortion_amplitude);
    }

    #[test]
    fn click_while_idle_reverts_to_hover() {
        let options = ControlOptions::default();
        let mut state = AnimationState::new();
        let mut ctl = InteractionController::new();

        ctl.click(&mut state, ms(0));
        assert!(ctl.tick(&mut state, &options, ms(500)));
        assert_eq!(ctl.mode(), InteractionMode::Hovered);
    }

    #[test]
    fn enter_during_cooldown_stays_clicked() {
        let options = ControlOptions::default();
        let mut state = AnimationState::new();
        let mut ctl = InteractionController::new();

        ctl.click(&mut state, ms(0));
        ctl.pointer_enter(&mut state, &options);
        assert_eq!(ctl.mode(), InteractionMode::Clicked);
        assert!(ctl.tick(&mut state, &options, ms(500)));
        assert_eq!(ctl.mode(), InteractionMode::Hovered);
    }

    #[test]
    fn hover_converges_within_fifty_frames() {
        let options = ControlOptions::default();
        let mut state = AnimationState::new();
        let mut ctl = InteractionController::new();

        ctl.pointer_leave(&mut state);
        for _ in 0..400 {
            state.advance();
        }
        let idle = state.rotation_speed();
        assert!((idle - Targets::IDLE.rotation_speed).abs() < 1e-3);

        ctl.pointer_enter(&mut state, &options);
        for _ in 0..50 {
            state.advance();
        }
        let target = options.hover_rotation_speed;
        let covered = (state.rotation_speed() - idle) / (target - idle);
        assert!(covered >= 0.9, "covered only {covered}");
    }

    #[test]
    fn panel_edits_apply_on_next_retarget() {
        let mut options = ControlOptions::default();
        let mut state = AnimationState::new();
        let mut ctl = InteractionController::new();

        ctl.click(&mut state, ms(0));
        options.hover_rotation_speed = 12.0;
        ctl.tick(&mut state, &options, ms(500));
        assert_eq!(state.targets().rotation_speed, 12.0);
    }
}
