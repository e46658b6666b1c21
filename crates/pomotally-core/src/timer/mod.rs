mod driver;
mod engine;

pub use driver::TimerDriver;
pub use engine::{Intervals, Mode, TickEvent, TimerEngine, TimerSnapshot};
