pub use indexmap::{IndexMap, IndexSet};
pub use log::{debug, info, warn};
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    borrow::Borrow,
    fmt::{self, Debug, Display, Formatter},
    hash::Hash,
    iter::FromIterator,
    path::{Path, PathBuf},
    str::FromStr,
};
pub use thiserror::Error;
