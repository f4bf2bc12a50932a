mod pool;
mod resp;

pub use self::in_memory_test::{InMemoryTestDriver, InMemoryTestResponseBuilder, RecordedCall};
pub use self::pool::RespPool;
pub use self::resp::RespConnection;
