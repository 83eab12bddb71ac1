//! Document storage: identifiers, the collection contract, and the in-process
//! collection used by the service binary and the test suites.

pub mod collection;
pub mod memory;
pub mod object_id;

pub use collection::{Collection, Document, RepositoryError};
pub use memory::MemoryCollection;
pub use object_id::{ObjectId, ObjectIdError};
