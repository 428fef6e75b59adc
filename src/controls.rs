//! Keyboard mapping of the control surface.
//!
//! Discrete presses map to [`Command`]s applied through
//! [`SceneState::apply`](crate::scene::SceneState::apply). Held keys are polled every
//! frame and drive either the ROV or the ghost camera, depending on the camera mode.

use winit::keyboard::KeyCode;

use crate::camera::CameraMovement;
use crate::rov::RovMovement;
use crate::scene::ScreenMode;

/// A one-shot action triggered by a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleFullscreen,
    ToggleAxis,
    ToggleGhost,
    ToggleProjection,
    /// Toggles the spot light belonging to the active camera mode.
    ToggleSpotLight,
    ToggleBlinnPhong,
    /// Per-fragment versus per-vertex shading.
    ToggleShading,
    SelectScreen(ScreenMode),
}

/// Command bound to a key press, if any.
pub fn command_for(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::Escape => Command::Quit,
        KeyCode::F11 => Command::ToggleFullscreen,
        KeyCode::KeyX => Command::ToggleAxis,
        KeyCode::KeyG => Command::ToggleGhost,
        KeyCode::KeyY => Command::ToggleProjection,
        KeyCode::KeyF => Command::ToggleSpotLight,
        KeyCode::KeyL => Command::ToggleBlinnPhong,
        KeyCode::KeyH => Command::ToggleShading,
        KeyCode::Digit1 | KeyCode::Numpad1 => return screen(1),
        KeyCode::Digit2 | KeyCode::Numpad2 => return screen(2),
        KeyCode::Digit3 | KeyCode::Numpad3 => return screen(3),
        KeyCode::Digit4 | KeyCode::Numpad4 => return screen(4),
        KeyCode::Digit5 | KeyCode::Numpad5 => return screen(5),
        _ => return None,
    };
    Some(command)
}

fn screen(n: u8) -> Option<Command> {
    ScreenMode::from_number(n).map(Command::SelectScreen)
}

/// Held keys steering the ROV in follow mode.
pub const ROV_KEYS: [(KeyCode, RovMovement); 8] = [
    (KeyCode::KeyW, RovMovement::Forward),
    (KeyCode::KeyS, RovMovement::Backward),
    (KeyCode::KeyA, RovMovement::StrafeLeft),
    (KeyCode::KeyD, RovMovement::StrafeRight),
    (KeyCode::KeyQ, RovMovement::TurnLeft),
    (KeyCode::KeyE, RovMovement::TurnRight),
    (KeyCode::Space, RovMovement::Ascend),
    (KeyCode::ShiftLeft, RovMovement::Descend),
];

/// Held keys moving the ghost camera.
pub const GHOST_KEYS: [(KeyCode, CameraMovement); 4] = [
    (KeyCode::KeyW, CameraMovement::Forward),
    (KeyCode::KeyS, CameraMovement::Backward),
    (KeyCode::KeyA, CameraMovement::Left),
    (KeyCode::KeyD, CameraMovement::Right),
];

/// Held key boosting the ghost camera.
pub const BOOST_KEY: KeyCode = KeyCode::ShiftLeft;

/// Held keys pulling the follow camera in or pushing it out, per frame.
pub const FOLLOW_DISTANCE_KEYS: [(KeyCode, f32); 2] = [(KeyCode::KeyO, -0.5), (KeyCode::KeyP, 0.5)];
