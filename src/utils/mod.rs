//! Small string helpers.

pub mod unicode;
