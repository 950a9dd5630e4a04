//! Property model: validators, holders, and the name-keyed registry

pub mod holder;
pub mod registry;
pub mod validator;

pub use holder::PropertyHolder;
pub use registry::PropertyRegistry;
pub use validator::{AnyValue, BooleanValidator, EnumeratedValidator, ValueValidator, BOOLEAN_VALUES};
