//! Value Objects - Immutable, identity-less domain primitives

mod agency_set;
mod identifiers;

pub use agency_set::AgencySet;
pub use identifiers::{RouteId, RouteType, SegmentId};
