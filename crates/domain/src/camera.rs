const MIN_DISTANCE: f32 = 0.3;
const MAX_DISTANCE: f32 = 20.0;
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit camera around a fixed target. No operation moves the target, so
/// panning is unavailable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    target: [f32; 3],
    yaw: f32,
    pitch: f32,
    distance: f32,
}

impl OrbitCamera {
    pub fn looking_at(eye: [f32; 3], target: [f32; 3]) -> Self {
        let dx = eye[0] - target[0];
        let dy = eye[1] - target[1];
        let dz = eye[2] - target[2];
        let horizontal = (dx * dx + dz * dz).sqrt();
        let distance = (horizontal * horizontal + dy * dy)
            .sqrt()
            .clamp(MIN_DISTANCE, MAX_DISTANCE);
        Self {
            target,
            yaw: dx.atan2(dz),
            pitch: dy.atan2(horizontal).clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance,
        }
    }

    pub fn target(&self) -> [f32; 3] {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn eye(&self) -> [f32; 3] {
        let horizontal = self.distance * self.pitch.cos();
        [
            self.target[0] + horizontal * self.yaw.sin(),
            self.target[1] + self.distance * self.pitch.sin(),
            self.target[2] + horizontal * self.yaw.cos(),
        ]
    }

    /// Rotates around the target. Angles are radians; non-finite input is ignored.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if !delta_yaw.is_finite() || !delta_pitch.is_finite() {
            return;
        }
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// `factor < 1` moves closer.
    pub fn zoom(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at([0.0, 0.6, 1.8], [0.0, 0.0, 0.0])
    }
}
