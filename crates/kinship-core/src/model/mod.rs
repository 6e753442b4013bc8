pub mod admin;
pub mod family;
pub mod member;
pub mod relationship;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use family::Family;
use member::Member;

/// Result of a substring search across members and families.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    pub members: Vec<Member>,
    pub families: Vec<Family>,
}

/// Current time truncated to microseconds, the precision every backend
/// stores, so a freshly created record equals the same record read back.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
