//! Peer Wire Protocol
//!
//! Constants shared by the HTTP server handler and the peer client. The
//! value itself travels as the raw response body (`application/octet-stream`);
//! both sides must keep using the same convention.

use std::time::Duration;

/// Path prefix under which every node serves its cache surface. A fetch for
/// key `k` in group `g` is `GET {peer}{DEFAULT_BASE_PATH}{g}/{k}`.
pub const DEFAULT_BASE_PATH: &str = "/cache/";

/// Virtual points each peer contributes to the placement ring.
pub const DEFAULT_REPLICAS: usize = 50;

/// Per-attempt bound on a peer fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_millis(500);

/// Transport-level retries per fetch. HTTP error statuses are not retried;
/// they map to a fetch failure and the caller's loader fallback.
pub const FETCH_ATTEMPTS: usize = 3;
