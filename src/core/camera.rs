use glam::{Mat4, Quat, Vec3};

/// The closed set of camera roles the registry manages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraKind {
    /// First-person flight camera, collision-checked
    Drone,
    /// Free-flying inspection camera, ignores collision
    Debug,
    /// Fixed vantage point, not driven by flight input
    Stationary,
}

impl CameraKind {
    pub fn name(&self) -> &'static str {
        match self {
            CameraKind::Drone => "drone",
            CameraKind::Debug => "debug",
            CameraKind::Stationary => "stationary",
        }
    }

    /// Whether the flight controller drives this camera at all
    pub fn accepts_flight_input(&self) -> bool {
        match self {
            CameraKind::Drone | CameraKind::Debug => true,
            CameraKind::Stationary => false,
        }
    }

    /// Whether movement is clamped against the collision index
    pub fn collision_checked(&self) -> bool {
        matches!(self, CameraKind::Drone)
    }
}

/// Camera with a quaternion orientation and a canonical start pose
pub struct Camera {
    kind: CameraKind,
    position: Vec3,
    orientation: Quat,
    start_position: Vec3,
    start_orientation: Quat,
    /// Field of view in radians
    fov: f32,
    near_plane: f32,
    far_plane: f32,
}

impl Camera {
    /// Create a camera at `position` aimed at `target`; this pose becomes the
    /// canonical start pose restored by [`reset_pose`](Self::reset_pose).
    pub fn new(kind: CameraKind, position: Vec3, target: Vec3) -> Self {
        let direction = (target - position).normalize_or_zero();
        let orientation = if direction == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            // Yaw/pitch decomposition keeps the camera upright (no roll)
            let yaw = (-direction.x).atan2(-direction.z);
            let pitch = direction.y.clamp(-1.0, 1.0).asin();
            Quat::from_euler(glam::EulerRot::YXZ, yaw, pitch, 0.0)
        };

        Self {
            kind,
            position,
            orientation,
            start_position: position,
            start_orientation: orientation,
            fov: 75.0_f32.to_radians(),
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }

    pub fn kind(&self) -> CameraKind {
        self.kind
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Local -Z axis
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Local +X axis
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Left-multiply a rotation of `angle` radians around `axis` onto the
    /// current orientation.
    pub fn rotate_around(&mut self, axis: Vec3, angle: f32) {
        self.orientation = (Quat::from_axis_angle(axis, angle) * self.orientation).normalize();
    }

    /// Restore the canonical start pose
    pub fn reset_pose(&mut self) {
        self.position = self.start_position;
        self.orientation = self.start_orientation;
    }

    /// Get the view matrix for rendering
    pub fn view_matrix(&self) -> Mat4 {
        let target = self.position + self.forward();
        let up = self.orientation * Vec3::Y;
        Mat4::look_at_rh(self.position, target, up)
    }

    /// Get the projection matrix for rendering
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect_ratio, self.near_plane, self.far_plane)
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near_plane = near;
        self.far_plane = far;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_at_target() {
        let camera = Camera::new(CameraKind::Drone, Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        let forward = camera.forward();
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_reset_restores_start_pose() {
        let mut camera = Camera::new(CameraKind::Drone, Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        camera.translate(Vec3::new(5.0, 3.0, -20.0));
        camera.rotate_around(Vec3::Y, 1.2);
        camera.reset_pose();

        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 100.0));
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_kind_capabilities() {
        assert!(CameraKind::Drone.accepts_flight_input());
        assert!(CameraKind::Drone.collision_checked());
        assert!(CameraKind::Debug.accepts_flight_input());
        assert!(!CameraKind::Debug.collision_checked());
        assert!(!CameraKind::Stationary.accepts_flight_input());
    }

    #[test]
    fn test_rotate_around_world_up() {
        let mut camera = Camera::new(CameraKind::Debug, Vec3::ZERO, Vec3::NEG_Z);
        camera.rotate_around(Vec3::Y, std::f32::consts::FRAC_PI_2);
        // Quarter turn left: forward swings from -Z to -X
        assert!((camera.forward() - Vec3::NEG_X).length() < 1e-5);
    }
}
