//! Native window input turned into `TunnelInput` messages.
//!
//! On the web the hosting page owns scrolling and sends the same messages over
//! the RPC bridge, so these systems are only registered for native builds.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::input::{KEY_STEP, WHEEL_LINE_STEP, WHEEL_PIXEL_STEP};

use crate::engine::rig::TunnelInput;

/// Stand-in for the page scroll position when there is no page.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollCursor {
    pub fraction: f32,
}

impl ScrollCursor {
    pub fn advance(&mut self, delta: f32) -> f32 {
        self.fraction = (self.fraction + delta).clamp(0.0, 1.0);
        self.fraction
    }
}

/// Scroll fraction change for one wheel event. Wheel down moves forward.
pub fn wheel_delta(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => -y * WHEEL_LINE_STEP,
        MouseScrollUnit::Pixel => -y * WHEEL_PIXEL_STEP,
    }
}

pub fn emit_native_input(
    mut cursor: ResMut<ScrollCursor>,
    mut wheel_events: EventReader<MouseWheel>,
    mut cursor_moved: EventReader<CursorMoved>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut inputs: EventWriter<TunnelInput>,
) {
    let before = cursor.fraction;
    let mut gesture = mouse_button.get_just_pressed().next().is_some();

    for wheel in wheel_events.read() {
        cursor.advance(wheel_delta(wheel.unit, wheel.y));
        gesture = true;
    }

    if keyboard.any_just_pressed([KeyCode::ArrowDown, KeyCode::PageDown, KeyCode::Space]) {
        cursor.advance(KEY_STEP);
    }
    if keyboard.any_just_pressed([KeyCode::ArrowUp, KeyCode::PageUp]) {
        cursor.advance(-KEY_STEP);
    }
    if keyboard.just_pressed(KeyCode::Home) {
        cursor.fraction = 0.0;
    }
    if keyboard.just_pressed(KeyCode::End) {
        cursor.fraction = 1.0;
    }

    if gesture {
        inputs.write(TunnelInput::UserGesture);
    }

    if cursor.fraction != before {
        inputs.write(TunnelInput::ScrollFraction(cursor.fraction));
    }

    if let Some(moved) = cursor_moved.read().last() {
        if let Ok(window) = windows.single() {
            inputs.write(TunnelInput::PointerMoved {
                position: moved.position,
                viewport: Vec2::new(window.width(), window.height()),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_app() -> App {
        let mut app = App::new();
        app.init_resource::<ScrollCursor>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_event::<MouseWheel>()
            .add_event::<CursorMoved>()
            .add_event::<TunnelInput>()
            .add_systems(Update, emit_native_input);
        app
    }

    fn emitted(app: &App) -> Vec<TunnelInput> {
        app.world()
            .resource::<Events<TunnelInput>>()
            .iter_current_update_events()
            .copied()
            .collect()
    }

    #[test]
    fn wheel_lines_advance_the_fraction() {
        let mut app = input_app();
        app.world_mut().send_event(MouseWheel {
            unit: MouseScrollUnit::Line,
            x: 0.0,
            y: -3.0,
            window: Entity::PLACEHOLDER,
        });
        app.update();

        let fraction = app.world().resource::<ScrollCursor>().fraction;
        assert!((fraction - 0.06).abs() < 1e-6);
        let events = emitted(&app);
        assert_eq!(events[0], TunnelInput::UserGesture);
        assert!(matches!(events[1], TunnelInput::ScrollFraction(f) if (f - 0.06).abs() < 1e-6));
    }

    #[test]
    fn keys_step_and_clamp() {
        let mut app = input_app();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowUp);
        app.update();
        assert_eq!(app.world().resource::<ScrollCursor>().fraction, 0.0);
        assert!(emitted(&app).is_empty());

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::End);
        app.update();
        assert_eq!(app.world().resource::<ScrollCursor>().fraction, 1.0);
        assert_eq!(emitted(&app), vec![TunnelInput::ScrollFraction(1.0)]);
    }

    #[test]
    fn wheel_up_moves_backward() {
        assert!(wheel_delta(MouseScrollUnit::Line, 1.0) < 0.0);
        assert!((wheel_delta(MouseScrollUnit::Pixel, -100.0) - 0.05).abs() < 1e-6);
    }
}
