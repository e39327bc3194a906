//! Interactive shell sessions in a pseudo terminal.

pub mod dialect;
pub mod resize;
pub mod session;
