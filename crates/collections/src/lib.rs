pub mod circular_queue;
pub mod macros;
pub mod open_addressing;
mod record;

pub use circular_queue::{CircularQueue, QueueError};
pub use open_addressing::{ProbingTable, Slot, TableError};
pub use record::Record;
