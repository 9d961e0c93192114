pub mod driver;
pub mod store;
pub mod timeline;
pub mod types;

pub use driver::QueueDriver;
pub use store::{QueueProgress, TaskQueue};
pub use timeline::SessionClock;
pub use types::{OperationKind, QueueEntry, QueueStatus};
