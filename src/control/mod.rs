//! PID control with bumpless transfer and anti-windup, plus the two
//! thin wrappers (`AngularController`, `VelocityController`) the
//! navigation task drives.

mod angular;
mod pid;
mod velocity;

pub use angular::AngularController;
pub use pid::PidController;
pub use velocity::VelocityController;
