//! The scrolling course: obstacles and the ground strip

pub mod obstacle;
pub mod stream;
pub mod track;

pub use obstacle::{Obstacle, ObstacleState};
pub use stream::ObstacleStream;
pub use track::ScrollTrack;
