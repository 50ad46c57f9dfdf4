mod util;
mod types;
mod forces;
mod dynamics;

pub use types::{ControlInput, FlightState, FlightStepDebug};
pub use forces::{drag_force, gravity_force, thrust_force};
pub use dynamics::FlightPhysics;
