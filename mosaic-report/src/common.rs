pub use anyhow::{ensure, format_err, Context, Result};
pub use inventory::{Catalog, CatalogConfig, ColorKey, Inventory, PixelSize, PointRecord, Survey};
pub use itertools::Itertools;
pub use log::{info, warn};
pub use once_cell::sync::Lazy;
pub use semver::{Version, VersionReq};
pub use serde::{de::Error as DeserializeError, Deserialize, Deserializer, Serialize};
pub use std::{
    fs, io,
    path::{Path, PathBuf},
};
