pub mod kind;
pub mod query;
pub mod reference;

pub use kind::EntityKind;
pub use query::prepare_query;
pub use reference::ReferenceIdPattern;
