use super::{CameraSpacePoint, DepthSpacePoint};

/// Depth substituted for negative Z values before mapping
///
/// Inferred joints sometimes report a negative depth. Mapping such a point
/// yields infinite coordinates, so Z is clamped to this value first.
pub const INFERRED_Z_POSITION_CLAMP: f32 = 0.1;

/// Projects camera-space points into depth image space
///
/// Implementations may assume `point.z > 0`; callers run points through
/// [`clamp_inferred_depth`] before mapping.
pub trait CoordinateMapper: Send {
    fn map_camera_point_to_depth_space(&self, point: CameraSpacePoint) -> DepthSpacePoint;
}

#[inline]
#[must_use]
pub fn clamp_inferred_depth(point: CameraSpacePoint) -> CameraSpacePoint {
    if point.z < 0.0 {
        CameraSpacePoint {
            z: INFERRED_Z_POSITION_CLAMP,
            ..point
        }
    } else {
        point
    }
}

/// Plain pinhole projection, no lens distortion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeMapper {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl PinholeMapper {
    /// Nominal intrinsics of the Kinect V2 depth camera at 512x424
    pub const KINECT_V2_DEPTH: Self = Self {
        fx: 365.456,
        fy: 365.456,
        cx: 254.878,
        cy: 205.395,
    };
}

impl Default for PinholeMapper {
    fn default() -> Self {
        Self::KINECT_V2_DEPTH
    }
}

impl CoordinateMapper for PinholeMapper {
    fn map_camera_point_to_depth_space(&self, point: CameraSpacePoint) -> DepthSpacePoint {
        // Camera space is Y-up, image rows grow downwards
        DepthSpacePoint {
            x: (point.x / point.z).mul_add(self.fx, self.cx),
            y: (-point.y / point.z).mul_add(self.fy, self.cy),
        }
    }
}
