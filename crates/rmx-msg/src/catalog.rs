//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Builtin schema catalog covering common middleware message types."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
//! Builtin message schemas.
//!
//! A small catalog in the shape of the common middleware vocabularies:
//! scalar wrappers, stamped poses, and one service pair. Applications with
//! their own schemas register them alongside these on a fresh registry.

use serde::{Deserialize, Serialize};

use crate::kind::MessageKind;
use crate::registry::MessageRegistry;
use crate::schema::Schema;

/// Scalar float message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Float32 {
    /// Carried value.
    pub data: f32,
}

impl Schema for Float32 {
    const BASE_NAME: &'static str = "std_msgs/Float32";
}

/// Scalar integer message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Int32 {
    /// Carried value.
    pub data: i32,
}

impl Schema for Int32 {
    const BASE_NAME: &'static str = "std_msgs/Int32";
}

/// Scalar boolean message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bool {
    /// Carried value.
    pub data: bool,
}

impl Schema for Bool {
    const BASE_NAME: &'static str = "std_msgs/Bool";
}

/// Timestamp split into whole seconds and nanoseconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Time {
    /// Whole seconds since the epoch.
    pub secs: u32,
    /// Nanoseconds past the second.
    pub nsecs: u32,
}

/// Standard metadata attached to stamped messages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Header {
    /// Monotonic sequence number.
    pub seq: u32,
    /// Acquisition time.
    pub stamp: Time,
    /// Coordinate frame the data is expressed in.
    pub frame_id: String,
}

impl Schema for Header {
    const BASE_NAME: &'static str = "std_msgs/Header";
}

impl Header {
    /// Construct a header for the given frame with zeroed sequence/stamp.
    pub fn for_frame(frame_id: impl Into<String>) -> Self {
        Self {
            frame_id: frame_id.into(),
            ..Self::default()
        }
    }
}

/// Position in free space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate in meters.
    pub x: f64,
    /// Y coordinate in meters.
    pub y: f64,
    /// Z coordinate in meters.
    pub z: f64,
}

impl Schema for Point {
    const BASE_NAME: &'static str = "geometry_msgs/Point";
}

impl Point {
    /// Construct a point from raw coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Orientation in free space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// Scalar component.
    pub w: f64,
}

impl Schema for Quaternion {
    const BASE_NAME: &'static str = "geometry_msgs/Quaternion";
}

impl Quaternion {
    /// The identity rotation.
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

/// Position and orientation pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Position component.
    pub position: Point,
    /// Orientation component.
    pub orientation: Quaternion,
}

impl Schema for Pose {
    const BASE_NAME: &'static str = "geometry_msgs/Pose";
}

/// A pose tagged with frame and time metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseStamped {
    /// Frame and time metadata.
    pub header: Header,
    /// The pose itself.
    pub pose: Pose,
}

impl Schema for PoseStamped {
    const BASE_NAME: &'static str = "geometry_msgs/PoseStamped";
}

impl PoseStamped {
    /// Construct a stamped pose in the given frame.
    pub fn in_frame(frame_id: impl Into<String>, pose: Pose) -> Self {
        Self {
            header: Header::for_frame(frame_id),
            pose,
        }
    }
}

/// An ordered sequence of stamped poses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    /// Frame and time metadata for the path as a whole.
    pub header: Header,
    /// Waypoints in traversal order.
    pub poses: Vec<PoseStamped>,
}

impl Schema for Path {
    const BASE_NAME: &'static str = "nav_msgs/Path";
}

/// Request half of the plan query service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetPlanRequest {
    /// Starting pose.
    pub start: PoseStamped,
    /// Goal pose.
    pub goal: PoseStamped,
    /// Acceptable goal distance in meters.
    pub tolerance: f32,
}

impl Schema for GetPlanRequest {
    const BASE_NAME: &'static str = "nav_msgs/GetPlan";
    const KIND: MessageKind = MessageKind::Request;
}

/// Response half of the plan query service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetPlanResponse {
    /// The computed plan.
    pub plan: Path,
}

impl Schema for GetPlanResponse {
    const BASE_NAME: &'static str = "nav_msgs/GetPlan";
    const KIND: MessageKind = MessageKind::Response;
}

/// Register every builtin schema on the provided registry.
pub fn register_builtins(registry: &mut MessageRegistry) -> crate::Result<()> {
    registry.register::<Float32>()?;
    registry.register::<Int32>()?;
    registry.register::<Bool>()?;
    registry.register::<Header>()?;
    registry.register::<Point>()?;
    registry.register::<Quaternion>()?;
    registry.register::<Pose>()?;
    registry.register::<PoseStamped>()?;
    registry.register::<Path>()?;
    registry.register::<GetPlanRequest>()?;
    registry.register::<GetPlanResponse>()?;
    Ok(())
}
