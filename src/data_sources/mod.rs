//! External data sources proxied by FuelRadar.
//!
//! Each client wraps exactly one outbound HTTP call and returns either the
//! raw upstream payload or a `reqwest::Error`. There are no retries, no
//! timeout overrides beyond the transport default, and no circuit breaking;
//! a single failed call fails the whole request it serves.
//!
//! # Data Sources
//!
//! - [`gnews`]: GNews keyword search for fuel-related headlines
//! - [`price_sheet`]: published spreadsheet CSV export of district fuel prices
//! - [`overpass`]: Overpass API radius query for nearby fuel stations

pub mod gnews;
pub mod overpass;
pub mod price_sheet;

pub use gnews::GnewsClient;
pub use overpass::OverpassClient;
pub use price_sheet::PriceSheetClient;
