pub mod file;
pub mod table;

pub use file::JsonFileSink;
pub use table::{TableStoreConfig, TableStoreSink, table_record};
