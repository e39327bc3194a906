//! Node.js runtime management: resolution, acquisition, and the local
//! cache.

pub mod acquire;
pub mod cache;
pub mod constraint;
pub mod download;
pub mod index;
pub mod resolver;
pub mod target;
