pub mod params;
pub mod clock;
pub mod derivation;
pub mod rotation;
pub mod particles;
pub mod cross_section;
pub mod session;
