//! Native UI: cue captions and the FPS counter.
//!
//! The scene cameras render HDR with bloom, so the UI gets its own 2D camera
//! drawn last without clearing or tonemapping.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::ui::IsDefaultUiCamera;
use constants::render_settings::{CUE_BOTTOM_MARGIN_PX, CUE_FONT_SIZE};

use crate::engine::assets::tunnel_manifest::TunnelManifest;
use crate::engine::core::app_state::FpsText;
use crate::engine::systems::frame_driver::CueChanged;

/// Caption bound to one cue interval.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct CueOverlay {
    pub id: String,
}

#[derive(Component)]
pub struct OverlayCamera;

pub fn spawn_overlays(mut commands: Commands, manifest: Res<TunnelManifest>) {
    commands.spawn((
        Camera2d,
        Camera {
            order: 2,
            hdr: true,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        Tonemapping::None,
        IsDefaultUiCamera,
        OverlayCamera,
    ));

    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            for cue in &manifest.cues {
                let Some(text) = cue.text.as_deref() else {
                    continue;
                };
                parent.spawn((
                    Text::new(text),
                    TextFont {
                        font_size: CUE_FONT_SIZE,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    Node {
                        position_type: PositionType::Absolute,
                        bottom: Val::Px(CUE_BOTTOM_MARGIN_PX),
                        width: Val::Percent(100.0),
                        justify_content: JustifyContent::Center,
                        ..default()
                    },
                    TextLayout::new_with_justify(JustifyText::Center),
                    Visibility::Hidden,
                    CueOverlay { id: cue.id.clone() },
                ));
            }

            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

pub fn apply_cue_overlays(
    mut changes: EventReader<CueChanged>,
    mut overlays: Query<(&CueOverlay, &mut Visibility)>,
) {
    for change in changes.read() {
        for (overlay, mut visibility) in &mut overlays {
            if overlay.id == change.id {
                *visibility = if change.visible {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_changes_toggle_matching_overlay() {
        let mut app = App::new();
        app.add_event::<CueChanged>()
            .add_systems(Update, apply_cue_overlays);

        let welcome = app
            .world_mut()
            .spawn((
                CueOverlay {
                    id: "welcome".into(),
                },
                Visibility::Hidden,
            ))
            .id();
        let other = app
            .world_mut()
            .spawn((
                CueOverlay {
                    id: "surface".into(),
                },
                Visibility::Hidden,
            ))
            .id();

        app.world_mut().send_event(CueChanged {
            id: "welcome".into(),
            visible: true,
        });
        app.update();
        assert_eq!(
            app.world().get::<Visibility>(welcome),
            Some(&Visibility::Inherited)
        );
        assert_eq!(
            app.world().get::<Visibility>(other),
            Some(&Visibility::Hidden)
        );

        app.world_mut().send_event(CueChanged {
            id: "welcome".into(),
            visible: false,
        });
        app.update();
        assert_eq!(
            app.world().get::<Visibility>(welcome),
            Some(&Visibility::Hidden)
        );
    }
}
