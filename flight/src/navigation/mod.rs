//! Waypoint path following.
//!
//! The navigator owns an ordered path and a cursor into it. Hosts call
//! [`WaypointNavigator::update`] once per tick with the drone position to
//! advance the cursor and get a progress snapshot, and may ask for
//! [`WaypointNavigator::get_navigation_input`] to steer toward the current
//! waypoint.

mod waypoint;
mod navigator;

pub use waypoint::{NavigatorConfig, Waypoint, WaypointKind, WaypointSpec};
pub use navigator::{NavigationInput, NavigationPhase, NavigationState, WaypointNavigator};
