pub mod loader;
pub mod snapshot;

pub use loader::{parse_table, CsvDirectorySource, TableSource};
pub use snapshot::{CatalogSnapshot, RawTables, SnapshotStore};
