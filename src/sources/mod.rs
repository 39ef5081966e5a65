pub mod open_er_api;
pub mod rest_countries;

use std::time::Duration;

/// Hard time limit for one upstream fetch. A fetch that exceeds this fails
/// the whole refresh; there is no retry.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
