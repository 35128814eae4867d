pub mod timer;

pub use timer::AutoRotateTimer;
