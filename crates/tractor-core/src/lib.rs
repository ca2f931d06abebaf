//! Card-shape analysis for Tractor (Shengji): reading hands as properties,
//! estimating what the unseen cards hold, and searching for plays that
//! cover a lead.

pub mod covering;
pub mod model;
pub mod probability;
pub mod property;
pub mod snapshot;
