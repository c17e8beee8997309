//! Poll a fleet of network devices over SSH and extract one field from each.

pub mod application;
pub mod domain;
pub mod infrastructure;
