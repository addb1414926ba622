pub mod math;
pub mod path;
pub mod progress;

pub mod assets;
pub mod camera;
pub mod cues;
pub mod rig;

pub mod audio;
pub mod core;
#[cfg(not(target_arch = "wasm32"))]
pub mod input;
pub mod loading;
pub mod render;
pub mod scene;
pub mod systems;
