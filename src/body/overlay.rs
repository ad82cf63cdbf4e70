use super::{
    body_pen, bone_style, clamp_inferred_depth, hand_color, joint_color, Body, BoneStyle,
    CoordinateMapper, DepthSpacePoint, FrameEdges, JointType, Pen, BONES, CLIPPED_EDGE_COLOR,
    CLIP_BOUNDS_THICKNESS, HAND_SIZE, INFERRED_BONE_PEN, JOINT_THICKNESS,
};
use crate::types::Dimensions;
use image::Rgba;

/// Drawing primitive in depth image space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Rectangle {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgba<u8>,
    },
    Line {
        from: DepthSpacePoint,
        to: DepthSpacePoint,
        pen: Pen,
    },
    Ellipse {
        center: DepthSpacePoint,
        radius: f32,
        color: Rgba<u8>,
    },
}

/// Build the drawing commands for one body frame
///
/// The first command always paints the display area black. Bodies keep the
/// color of their tracking slot whether or not earlier slots are tracked.
#[must_use]
pub fn build_overlay(
    bodies: &[Body],
    mapper: &dyn CoordinateMapper,
    display: Dimensions,
) -> Vec<DrawCommand> {
    let width = f32::from(display.width);
    let height = f32::from(display.height);

    let mut commands = vec![DrawCommand::Rectangle {
        x: 0.0,
        y: 0.0,
        width,
        height,
        color: Rgba([0, 0, 0, 255]),
    }];

    for (slot, body) in bodies.iter().enumerate() {
        if !body.is_tracked {
            continue;
        }

        push_clipped_edges(&mut commands, body.clipped_edges, width, height);

        let points: Vec<DepthSpacePoint> = body
            .joints
            .iter()
            .map(|joint| mapper.map_camera_point_to_depth_space(clamp_inferred_depth(joint.position)))
            .collect();

        push_body(&mut commands, body, &points, body_pen(slot));

        for (hand_state, hand) in [
            (body.hand_left_state, JointType::HandLeft),
            (body.hand_right_state, JointType::HandRight),
        ] {
            if let Some(color) = hand_color(hand_state) {
                commands.push(DrawCommand::Ellipse {
                    center: points[hand.index()],
                    radius: HAND_SIZE,
                    color,
                });
            }
        }
    }

    commands
}

fn push_body(commands: &mut Vec<DrawCommand>, body: &Body, points: &[DepthSpacePoint], pen: Pen) {
    for (first, second) in BONES {
        let style = bone_style(
            body.joint(first).tracking_state,
            body.joint(second).tracking_state,
        );
        let Some(style) = style else {
            continue;
        };

        commands.push(DrawCommand::Line {
            from: points[first.index()],
            to: points[second.index()],
            pen: match style {
                BoneStyle::Tracked => pen,
                BoneStyle::Inferred => INFERRED_BONE_PEN,
            },
        });
    }

    for joint_type in JointType::ALL {
        if let Some(color) = joint_color(body.joint(joint_type).tracking_state) {
            commands.push(DrawCommand::Ellipse {
                center: points[joint_type.index()],
                radius: JOINT_THICKNESS,
                color,
            });
        }
    }
}

fn push_clipped_edges(commands: &mut Vec<DrawCommand>, edges: FrameEdges, width: f32, height: f32) {
    let bars = [
        (FrameEdges::BOTTOM, 0.0, height - CLIP_BOUNDS_THICKNESS, width, CLIP_BOUNDS_THICKNESS),
        (FrameEdges::TOP, 0.0, 0.0, width, CLIP_BOUNDS_THICKNESS),
        (FrameEdges::LEFT, 0.0, 0.0, CLIP_BOUNDS_THICKNESS, height),
        (FrameEdges::RIGHT, width - CLIP_BOUNDS_THICKNESS, 0.0, CLIP_BOUNDS_THICKNESS, height),
    ];

    for (edge, x, y, w, h) in bars {
        if edges.contains(edge) {
            commands.push(DrawCommand::Rectangle {
                x,
                y,
                width: w,
                height: h,
                color: CLIPPED_EDGE_COLOR,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{
        CameraSpacePoint, HandState, PinholeMapper, TrackingState, BODY_COLORS,
        INFERRED_JOINT_COLOR, TRACKED_JOINT_COLOR,
    };

    const DISPLAY: Dimensions = Dimensions {
        width: 512,
        height: 424,
    };

    /// Maps (x, y) straight through so positions are easy to assert on
    struct Identity;

    impl CoordinateMapper for Identity {
        fn map_camera_point_to_depth_space(&self, point: CameraSpacePoint) -> DepthSpacePoint {
            DepthSpacePoint::new(point.x, point.y)
        }
    }

    fn tracked_body() -> Body {
        let mut body = Body {
            is_tracked: true,
            ..Body::default()
        };
        for (i, joint) in body.joints.iter_mut().enumerate() {
            joint.tracking_state = TrackingState::Tracked;
            joint.position = CameraSpacePoint {
                x: i as f32,
                y: 2.0 * i as f32,
                z: 1.0,
            };
        }
        body
    }

    fn lines(commands: &[DrawCommand]) -> Vec<Pen> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { pen, .. } => Some(*pen),
                _ => None,
            })
            .collect()
    }

    fn ellipses(commands: &[DrawCommand]) -> Vec<(DepthSpacePoint, f32, Rgba<u8>)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Ellipse {
                    center,
                    radius,
                    color,
                } => Some((*center, *radius, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_no_bodies_only_background() {
        let commands = build_overlay(&[], &Identity, DISPLAY);
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0],
            DrawCommand::Rectangle {
                x: 0.0,
                y: 0.0,
                width: 512.0,
                height: 424.0,
                color: Rgba([0, 0, 0, 255]),
            }
        );
    }

    #[test]
    fn test_untracked_body_draws_nothing() {
        let mut body = tracked_body();
        body.is_tracked = false;
        body.hand_left_state = HandState::Closed;

        let commands = build_overlay(&[body], &Identity, DISPLAY);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_fully_tracked_body() {
        let commands = build_overlay(&[tracked_body()], &Identity, DISPLAY);

        let pens = lines(&commands);
        assert_eq!(pens.len(), BONES.len());
        assert!(pens.iter().all(|pen| pen.color == BODY_COLORS[0]));

        let joints = ellipses(&commands);
        assert_eq!(joints.len(), JointType::COUNT);
        assert!(joints.iter().all(|&(_, r, c)| r == JOINT_THICKNESS && c == TRACKED_JOINT_COLOR));
    }

    #[test]
    fn test_slot_color_follows_position_not_tracked_count() {
        let mut idle = tracked_body();
        idle.is_tracked = false;

        let commands = build_overlay(&[idle.clone(), idle, tracked_body()], &Identity, DISPLAY);
        assert!(lines(&commands).iter().all(|pen| pen.color == BODY_COLORS[2]));
    }

    #[test]
    fn test_not_tracked_joint_removes_its_bones_and_marker() {
        let mut body = tracked_body();
        body.joint_mut(JointType::Head).tracking_state = TrackingState::NotTracked;
        body.joint_mut(JointType::FootLeft).tracking_state = TrackingState::Inferred;

        let commands = build_overlay(&[body], &Identity, DISPLAY);
        let pens = lines(&commands);

        // Head-Neck disappears, AnkleLeft-FootLeft is degraded
        assert_eq!(pens.len(), BONES.len() - 1);
        assert_eq!(pens.iter().filter(|pen| **pen == INFERRED_BONE_PEN).count(), 1);

        let joints = ellipses(&commands);
        assert_eq!(joints.len(), JointType::COUNT - 1);
        assert_eq!(joints.iter().filter(|&&(_, _, c)| c == INFERRED_JOINT_COLOR).count(), 1);
    }

    #[test]
    fn test_hand_markers_at_hand_joints() {
        let mut body = tracked_body();
        body.hand_left_state = HandState::Open;
        body.hand_right_state = HandState::Unknown;

        let commands = build_overlay(&[body], &Identity, DISPLAY);
        let hands: Vec<_> = ellipses(&commands)
            .into_iter()
            .filter(|&(_, r, _)| r == HAND_SIZE)
            .collect();

        assert_eq!(hands.len(), 1);
        let (center, _, color) = hands[0];
        assert_eq!(center, DepthSpacePoint::new(7.0, 14.0));
        assert_eq!(color, Rgba([0, 255, 0, 128]));
    }

    #[test]
    fn test_clipped_edges() {
        let mut body = tracked_body();
        body.clipped_edges = FrameEdges::BOTTOM.union(FrameEdges::RIGHT);

        let commands = build_overlay(&[body], &Identity, DISPLAY);
        let bars: Vec<_> = commands
            .iter()
            .skip(1)
            .filter_map(|c| match c {
                DrawCommand::Rectangle { x, y, width, height, color } => {
                    Some((*x, *y, *width, *height, *color))
                }
                _ => None,
            })
            .collect();

        assert_eq!(
            bars,
            vec![
                (0.0, 414.0, 512.0, 10.0, CLIPPED_EDGE_COLOR),
                (502.0, 0.0, 10.0, 424.0, CLIPPED_EDGE_COLOR),
            ]
        );
    }

    #[test]
    fn test_negative_depth_goes_through_clamp() {
        let mut body = tracked_body();
        for joint in &mut body.joints {
            joint.position.z = -2.0;
        }

        let commands = build_overlay(&[body], &PinholeMapper::default(), DISPLAY);
        for (center, _, _) in ellipses(&commands) {
            assert!(center.x.is_finite() && center.y.is_finite());
        }
    }
}
