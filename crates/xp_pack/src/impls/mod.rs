//! Implementations for standard types.

// -----------------------------------------------------------------------------
// Modules

mod array;
mod map;
mod option;
mod primitive;
mod sequence;

// -----------------------------------------------------------------------------
// Exports

pub use map::MapKey;

#[doc(hidden)]
pub use map::parse_decimal;
