//! Role values and their kinds
//!
//! A role is a tagged payload: a [`RoleKind`] from a closed set plus a
//! [`Payload`] of attributes. Role values are immutable and compare by identity
//! (same kind, structurally equal payload).

mod kind;
mod payload;
mod value;

pub use kind::RoleKind;
pub use payload::Payload;
pub use value::RoleValue;
