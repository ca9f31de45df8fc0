pub mod chain;
pub mod client;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod headers;
pub mod links;
pub mod retry;
pub mod sites;
pub mod strategy;
pub mod tuning;

pub use chain::{FieldChain, Listing};
pub use client::{SearchClient, SearchOptions};
pub use document::{Document, Node};
pub use error::{ExtractError, FetchError};
pub use extract::{extract_listings, passes_inclusion_gate, ParsedListing, ResultCap, Retailer};
pub use fetch::{HttpFetcher, PageFetcher};
pub use headers::browser_headers;
pub use sites::{Amazon, Flipkart, AMAZON_SELECTORS, FLIPKART_SELECTORS};
