pub mod error;
pub mod file;
pub mod memory;
pub mod query;
pub mod record;
pub mod store;

pub use common::{EntityId, GameClock};
pub use error::{FactLogError, Result};
pub use file::FileFactLog;
pub use memory::InMemoryFactLog;
pub use query::LogQuery;
pub use record::{FactId, FactRecord, FactRecordBuilder, Sequence};
pub use store::{AppendOptions, FactLog};
