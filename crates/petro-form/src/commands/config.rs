//! # Config Commands
//!
//! Command for retrieving station configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current station configuration.
///
/// ## When Used
/// - Form startup (currency symbol, station name)
/// - Highlighting rows whose density variation exceeds the tolerance
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
