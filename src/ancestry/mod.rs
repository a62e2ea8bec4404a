pub(crate) mod resolver;

pub use resolver::{Ancestor, Ancestors, AncestryComparison};
