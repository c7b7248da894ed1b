//! Enrichment flows for a restaurant location.
//!
//! Every flow degrades to its own fallback value instead of returning an
//! error, so a caller always gets a structurally valid answer.

mod grounded;
mod types;
mod videos;

pub use grounded::GroundedFlows;
pub use types::{
    LabelCandidate, ReservationMenuLinks, VideoCandidate, CUISINE_CATEGORIES,
    DINING_STYLE_CATEGORIES,
};
pub use videos::{search_tool, tool_params, VideoDiscovery, SEARCH_TOOL_NAME};
