//! Site-specific selector tables and field chains.

pub mod amazon;
pub mod flipkart;

pub use amazon::{Amazon, AMAZON_SELECTORS};
pub use flipkart::{Flipkart, FLIPKART_SELECTORS};
