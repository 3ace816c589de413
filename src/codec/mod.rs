//! Flat, path-keyed encoding of trees.

mod deserialize;
mod encoded;
mod serialize;

pub use deserialize::{DeserializeError, deserialize};
pub use encoded::{Encoded, EncodedValue, encoded};
pub use serialize::{SerializeError, serialize};
