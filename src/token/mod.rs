pub mod clock;
pub mod refresh;
