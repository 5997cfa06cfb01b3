//! Decoded replay data models.
//!
//! These types mirror the document produced by the external replay decoder.
//! Identifiers and match clocks are normalized once, at deserialization time.

mod elimination;
mod ids;
mod player;
mod replay;

pub use elimination::*;
pub use ids::*;
pub use player::*;
pub use replay::*;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
