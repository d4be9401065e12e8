use raylib::prelude::*;

use voxelscape::{Capability, Quality, Renderer};

use crate::player::Player;

fn toggle(renderer: &mut Renderer, capability: Capability) {
    if renderer.is_enabled(capability) {
        renderer.disable(capability);
    } else {
        renderer.enable(capability);
    }
    log::info!("{capability}: {}", renderer.is_enabled(capability));
}

/// Teclado: F niebla, R reflejo, M suavizado, 1/2/3 calidad; el resto mueve al jugador.
pub fn process_events(window: &mut RaylibHandle, player: &mut Player, renderer: &mut Renderer) {
    if window.is_key_pressed(KeyboardKey::KEY_F) {
        toggle(renderer, Capability::Fog);
    }
    if window.is_key_pressed(KeyboardKey::KEY_R) {
        toggle(renderer, Capability::ReflectionMap);
    }
    if window.is_key_pressed(KeyboardKey::KEY_M) {
        toggle(renderer, Capability::Smooth);
    }
    for (key, quality) in [
        (KeyboardKey::KEY_ONE, Quality::Low),
        (KeyboardKey::KEY_TWO, Quality::Medium),
        (KeyboardKey::KEY_THREE, Quality::High),
    ] {
        if window.is_key_pressed(key) {
            renderer.set_quality(quality);
        }
    }

    let dt = window.get_frame_time();
    player.update(window, dt);
    renderer.set_camera(player.camera_update());
}
