pub mod view;
pub mod spindle_vis2d;
pub mod spindle_vis3d;
pub mod meshes;
pub mod camera;
pub mod controls;
pub mod hud;
