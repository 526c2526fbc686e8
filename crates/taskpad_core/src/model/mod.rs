mod task;

pub use task::{Suggestion, Task};
