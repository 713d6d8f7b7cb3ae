use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tiering::TieringConfig;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Table snapshot location, defaults to ~/.config/ultrank-tiering/tables.yaml
    #[serde(default)]
    pub tables: Option<PathBuf>,

    #[serde(default)]
    pub tiering: Option<TieringConfig>,
}
