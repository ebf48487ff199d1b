//! Engine limits shared by the parser, validator and form deriver.
use serde::{Deserialize, Serialize};

use crate::path_de::{self, DecodeError};

// ------------------------------- Policy ---------------------------------- //

/// Root properties sit at depth 1; every object child or array `items`
/// adds one level.
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl Limits {
    /// Decode limits from a JSON document; errors name the offending path.
    pub fn from_json_str(src: &str) -> Result<Self, DecodeError> {
        path_de::from_str_with_path(src)
    }

    pub(crate) fn exceeded(&self, depth: usize) -> bool {
        depth > self.max_depth
    }
}
