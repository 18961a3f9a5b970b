use serde::{Deserialize, Serialize};
use std::fmt;

/// One frame of the pre-round countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownStep {
    Count(u8),
    Begin,
}

impl fmt::Display for CountdownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownStep::Count(n) => write!(f, "{n}"),
            CountdownStep::Begin => f.write_str("Begin!"),
        }
    }
}
