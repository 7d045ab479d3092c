//! Abstract actuator capability. The core never calls this directly —
//! `NavigationControl`/`CommandLogic` write actuator commands into
//! `SharedState`, and an external adapter polls the snapshot and
//! forwards it here (spec.md §6).

use crate::model::ActuatorCommand;

pub trait ActuatorSink: Send + Sync {
    fn write(&self, command: ActuatorCommand);
}
