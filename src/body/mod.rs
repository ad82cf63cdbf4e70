//! Skeleton data and the presentation rules for drawing it
//!
//! Joint positions come from the sensor. This module only decides what gets
//! drawn and in which style; the palettes are lookup tables so the rules can
//! be tested without a drawing surface.

mod mapper;
mod overlay;
mod raster;

pub use mapper::{clamp_inferred_depth, CoordinateMapper, PinholeMapper, INFERRED_Z_POSITION_CLAMP};
pub use overlay::{build_overlay, DrawCommand};
pub use raster::rasterize;

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Maximum number of bodies the sensor tracks at once
pub const BODY_COUNT: usize = 6;

/// Radius of the hand state markers
pub const HAND_SIZE: f32 = 30.0;
/// Radius of joint markers
pub const JOINT_THICKNESS: f32 = 3.0;
/// Thickness of the clipped-edge indicators
pub const CLIP_BOUNDS_THICKNESS: f32 = 10.0;
/// Thickness of bones between two tracked joints
pub const BODY_PEN_THICKNESS: f32 = 6.0;

/// Joints in sensor order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointType {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

impl JointType {
    pub const COUNT: usize = 25;

    pub const ALL: [Self; Self::COUNT] = [
        Self::SpineBase,
        Self::SpineMid,
        Self::Neck,
        Self::Head,
        Self::ShoulderLeft,
        Self::ElbowLeft,
        Self::WristLeft,
        Self::HandLeft,
        Self::ShoulderRight,
        Self::ElbowRight,
        Self::WristRight,
        Self::HandRight,
        Self::HipLeft,
        Self::KneeLeft,
        Self::AnkleLeft,
        Self::FootLeft,
        Self::HipRight,
        Self::KneeRight,
        Self::AnkleRight,
        Self::FootRight,
        Self::SpineShoulder,
        Self::HandTipLeft,
        Self::ThumbLeft,
        Self::HandTipRight,
        Self::ThumbRight,
    ];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A bone is drawn between two joints
pub const BONES: [(JointType, JointType); 24] = {
    use JointType::*;
    [
        // Torso
        (Head, Neck),
        (Neck, SpineShoulder),
        (SpineShoulder, SpineMid),
        (SpineMid, SpineBase),
        (SpineShoulder, ShoulderRight),
        (SpineShoulder, ShoulderLeft),
        (SpineBase, HipRight),
        (SpineBase, HipLeft),
        // Right arm
        (ShoulderRight, ElbowRight),
        (ElbowRight, WristRight),
        (WristRight, HandRight),
        (HandRight, HandTipRight),
        (WristRight, ThumbRight),
        // Left arm
        (ShoulderLeft, ElbowLeft),
        (ElbowLeft, WristLeft),
        (WristLeft, HandLeft),
        (HandLeft, HandTipLeft),
        (WristLeft, ThumbLeft),
        // Right leg
        (HipRight, KneeRight),
        (KneeRight, AnkleRight),
        (AnkleRight, FootRight),
        // Left leg
        (HipLeft, KneeLeft),
        (KneeLeft, AnkleLeft),
        (AnkleLeft, FootLeft),
    ]
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingState {
    #[default]
    NotTracked,
    Inferred,
    Tracked,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandState {
    #[default]
    Unknown,
    NotTracked,
    Open,
    Closed,
    Lasso,
}

/// Point in camera space, metres
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSpacePoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Point in depth image space, pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthSpacePoint {
    pub x: f32,
    pub y: f32,
}

impl DepthSpacePoint {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub position: CameraSpacePoint,
    pub tracking_state: TrackingState,
}

/// Frame edges a body extends past
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameEdges(u8);

impl FrameEdges {
    pub const NONE: Self = Self(0);
    pub const RIGHT: Self = Self(1);
    pub const LEFT: Self = Self(2);
    pub const TOP: Self = Self(4);
    pub const BOTTOM: Self = Self(8);

    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// One tracking slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub is_tracked: bool,
    pub joints: [Joint; JointType::COUNT],
    #[serde(default)]
    pub hand_left_state: HandState,
    #[serde(default)]
    pub hand_right_state: HandState,
    #[serde(default)]
    pub clipped_edges: FrameEdges,
}

impl Body {
    #[inline]
    #[must_use]
    pub fn joint(&self, joint_type: JointType) -> &Joint {
        &self.joints[joint_type.index()]
    }

    pub fn joint_mut(&mut self, joint_type: JointType) -> &mut Joint {
        &mut self.joints[joint_type.index()]
    }
}

/// One line of a body recording
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyFrame {
    #[serde(default)]
    pub relative_time_ms: u64,
    pub bodies: Vec<Body>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Rgba<u8>,
    pub thickness: f32,
}

/// Body colors per tracking slot
pub const BODY_COLORS: [Rgba<u8>; BODY_COUNT] = [
    Rgba([255, 0, 0, 255]),     // red
    Rgba([255, 165, 0, 255]),   // orange
    Rgba([0, 128, 0, 255]),     // green
    Rgba([0, 0, 255, 255]),     // blue
    Rgba([75, 0, 130, 255]),    // indigo
    Rgba([238, 130, 238, 255]), // violet
];

pub const INFERRED_BONE_PEN: Pen = Pen {
    color: Rgba([128, 128, 128, 255]),
    thickness: 1.0,
};

pub const TRACKED_JOINT_COLOR: Rgba<u8> = Rgba([68, 192, 68, 255]);
pub const INFERRED_JOINT_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);
pub const CLIPPED_EDGE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Hand marker color per hand state; states not listed draw nothing
pub const HAND_COLORS: [(HandState, Rgba<u8>); 3] = [
    (HandState::Closed, Rgba([255, 0, 0, 128])),
    (HandState::Open, Rgba([0, 255, 0, 128])),
    (HandState::Lasso, Rgba([0, 0, 255, 128])),
];

/// Pen for a body in the given tracking slot, cycling through the palette
#[inline]
#[must_use]
pub fn body_pen(slot: usize) -> Pen {
    Pen {
        color: BODY_COLORS[slot % BODY_COUNT],
        thickness: BODY_PEN_THICKNESS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneStyle {
    /// At least one end is only inferred
    Inferred,
    /// Both ends are tracked, drawn in the body color
    Tracked,
}

/// Style of a bone, `None` when it must not be drawn
#[must_use]
pub fn bone_style(first: TrackingState, second: TrackingState) -> Option<BoneStyle> {
    match (first, second) {
        (TrackingState::NotTracked, _) | (_, TrackingState::NotTracked) => None,
        (TrackingState::Tracked, TrackingState::Tracked) => Some(BoneStyle::Tracked),
        _ => Some(BoneStyle::Inferred),
    }
}

/// Fill color of a joint marker, `None` when it must not be drawn
#[must_use]
pub fn joint_color(state: TrackingState) -> Option<Rgba<u8>> {
    match state {
        TrackingState::Tracked => Some(TRACKED_JOINT_COLOR),
        TrackingState::Inferred => Some(INFERRED_JOINT_COLOR),
        TrackingState::NotTracked => None,
    }
}

/// Fill color of a hand marker, `None` when it must not be drawn
#[must_use]
pub fn hand_color(state: HandState) -> Option<Rgba<u8>> {
    HAND_COLORS
        .iter()
        .find(|(hand, _)| *hand == state)
        .map(|&(_, color)| color)
}
