/// Rotation angle added per frame is `rotation_speed / ROTATION_SPEED_DIVISOR` radians.
pub const ROTATION_SPEED_DIVISOR: f64 = 2000.0;

pub const MAX_DISTORTION: f32 = 3.0;
pub const MAX_ROTATION_SPEED: f32 = 100.0;

/// Per-frame fraction of the remaining gap consumed by each eased value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    pub distortion: f32,
    pub rotation_speed: f32,
}

impl Smoothing {
    /// Before any pointer interaction.
    pub const STARTUP: Smoothing = Smoothing {
        distortion: 0.065,
        rotation_speed: 1.0,
    };
    /// Hover and click: snap quickly toward the new targets.
    pub const FAST: Smoothing = Smoothing {
        distortion: 0.4,
        rotation_speed: 0.4,
    };
    /// Pointer left or click cooled down: settle slowly.
    pub const SLOW: Smoothing = Smoothing {
        distortion: 0.05,
        rotation_speed: 0.05,
    };
}

/// Values the eased scalars are heading toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub distortion: f32,
    pub rotation_speed: f32,
}

impl Targets {
    /// Pointer away from the surface.
    pub const IDLE: Targets = Targets {
        distortion: 0.0,
        rotation_speed: 5.0,
    };
}

/// Animated scalars advanced once per frame by first-order exponential lag.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    rotation_angle: f64,
    distortion: f32,
    distortion_target: f32,
    rotation_speed: f32,
    rotation_speed_target: f32,
    smoothing: Smoothing,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            rotation_angle: 0.0,
            distortion: 0.0,
            distortion_target: 0.0,
            rotation_speed: 35.0,
            rotation_speed_target: 35.0,
            smoothing: Smoothing::STARTUP,
        }
    }
}

fn ease(current: f32, target: f32, coef: f32) -> f32 {
    let next = current + (target - current) * coef;
    // guard rounding: never step past the target
    if (target - next) * (target - current) < 0.0 {
        target
    } else {
        next
    }
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative rotation in radians. Unbounded.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    pub fn distortion(&self) -> f32 {
        self.distortion
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn targets(&self) -> Targets {
        Targets {
            distortion: self.distortion_target,
            rotation_speed: self.rotation_speed_target,
        }
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// Advance one frame: ease both values, then accumulate rotation.
    pub fn advance(&mut self) {
        self.distortion = ease(
            self.distortion,
            self.distortion_target,
            self.smoothing.distortion,
        );
        self.rotation_speed = ease(
            self.rotation_speed,
            self.rotation_speed_target,
            self.smoothing.rotation_speed,
        );
        self.rotation_angle += self.rotation_speed as f64 / ROTATION_SPEED_DIVISOR;
    }

    pub(crate) fn retarget(&mut self, targets: Targets, smoothing: Smoothing) {
        self.distortion_target = targets.distortion;
        self.rotation_speed_target = targets.rotation_speed;
        self.smoothing = smoothing;
    }

    /// Bump current values by the given increments, capped, and pin the
    /// targets to the bumped values.
    pub(crate) fn kick(&mut self, distortion: f32, rotation_speed: f32) {
        self.distortion = (self.distortion + distortion).min(MAX_DISTORTION);
        self.rotation_speed = (self.rotation_speed + rotation_speed).min(MAX_ROTATION_SPEED);
        self.distortion_target = self.distortion;
        self.rotation_speed_target = self.rotation_speed;
    }
}
