// An wrapper around the `oxc_resolver` crate to provide a more houdini-specific API.

mod resolver;

pub use crate::resolver::{ResolveReturn, Resolver};

pub use oxc_resolver::ResolveError;
