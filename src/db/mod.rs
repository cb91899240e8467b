pub mod connection;
pub mod properties;

pub use connection::{init_db, Database};

use crate::domain::{NewProperty, PropertyRecord};
use crate::errors::ServerError;

/// Create/read access to the saved properties.
/// `Database` is the real one; the workflows only see this trait.
pub trait PropertyStore {
    /// Inserts one record and returns its new id. No deduplication.
    fn create_record(&self, prop: &NewProperty) -> Result<i64, ServerError>;

    /// All records. Failures are returned, never turned into an empty list.
    fn list_records(&self) -> Result<Vec<PropertyRecord>, ServerError>;
}
