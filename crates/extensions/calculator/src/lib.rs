//! Optimal team source for f1sync.
//!
//! Fetches the public team-calculator page, pulls the JSON it embeds in its
//! Next.js flight payload, and runs the core optimizer over it.

mod client;
mod error;
mod payload;
mod prices;

pub use client::{CalculatorClient, CalculatorResult, DEFAULT_CALCULATOR_URL};
pub use error::CalculatorError;
pub use payload::{extract_json_object, extract_next_payload};
pub use prices::{price_maps, PriceMaps};
