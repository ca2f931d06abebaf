pub mod decompose;
pub mod ordering;
pub mod property_type;

pub use decompose::Decomposition;
pub use ordering::{PropertyComparator, PropertyOrder, same_type_together};
pub use property_type::{MAX_SEQUENCES, PropertyType};
