//! Operator/remote command model.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    EnableAutomatic,
    DisableAutomatic,
    EmergencyStop,
    ResetEmergency,
    ResetFault,
    Stop,
    Shutdown,
    Accelerate,
    Brake,
    SteerLeft,
    SteerRight,
    MoveForward,
    MoveBackward,
    // Aliases for SteerLeft/SteerRight kept for compatibility; see
    // spec.md section 9's open question — both spellings exist in the
    // source and both must keep working.
    TurnLeft,
    TurnRight,
}

impl CommandKind {
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Some(match name {
            "ENABLE_AUTOMATIC" => CommandKind::EnableAutomatic,
            "DISABLE_AUTOMATIC" => CommandKind::DisableAutomatic,
            "EMERGENCY_STOP" => CommandKind::EmergencyStop,
            "RESET_EMERGENCY" => CommandKind::ResetEmergency,
            "RESET_FAULT" => CommandKind::ResetFault,
            "STOP" => CommandKind::Stop,
            "SHUTDOWN" => CommandKind::Shutdown,
            "ACCELERATE" => CommandKind::Accelerate,
            "BRAKE" => CommandKind::Brake,
            "STEER_LEFT" => CommandKind::SteerLeft,
            "STEER_RIGHT" => CommandKind::SteerRight,
            "MOVE_FORWARD" => CommandKind::MoveForward,
            "MOVE_BACKWARD" => CommandKind::MoveBackward,
            "TURN_LEFT" => CommandKind::TurnLeft,
            "TURN_RIGHT" => CommandKind::TurnRight,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub value: Option<f64>,
    pub source: String,
    pub t: f64,
}

impl Command {
    pub fn new(kind: CommandKind, value: Option<f64>, source: impl Into<String>, t: f64) -> Self {
        Self { kind, value, source: source.into(), t }
    }

    pub fn local(kind: CommandKind, t: f64) -> Self {
        Self::new(kind, None, "local", t)
    }
}
