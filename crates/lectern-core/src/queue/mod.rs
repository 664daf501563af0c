//! Queue module: deadline-ordered delay queue.

mod delay_queue;
mod delayed;

pub use delay_queue::DelayQueue;
pub use delayed::Delayed;
