pub use std::collections::{BTreeMap, VecDeque};
