//! Policy engine services and ports.
//!
//! Everything here is a pure function of an immutable [`trellis_domain::MetadataConfig`]
//! snapshot and a request-scoped [`trellis_core::UserIdentity`]; the only
//! effects live behind the two ports in [`ports`].

#![forbid(unsafe_code)]

mod authority;
mod field_access;
mod ports;
mod surface;
mod visibility;


pub use authority::{PermissionAuthority, authorize_with_native, group_grants, profile_grants};
pub use field_access::{FieldAccessResolution, FieldDecision};
pub use ports::{DataAccessPort, NativePermissionPort};
pub use surface::ViewSurfaceBuilder;
pub use visibility::{filter_by_groups, filter_by_profile, merge_filtered};
