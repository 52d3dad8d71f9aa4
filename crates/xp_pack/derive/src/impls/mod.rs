// -----------------------------------------------------------------------------
// Modules

mod enum_kind;
mod remote_kind;
mod struct_kind;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use enum_kind::impl_enum;
pub(crate) use remote_kind::impl_remote;
pub(crate) use struct_kind::impl_struct;
