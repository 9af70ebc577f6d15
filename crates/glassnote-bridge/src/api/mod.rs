//! Wire types exchanged with the bridge.

mod models;

pub use models::*;
