#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::{hash_map::Entry, HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use hashbrown::{hash_map::Entry, HashMap, HashSet};
}
