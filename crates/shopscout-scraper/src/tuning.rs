//! Thresholds tuned against observed Amazon and Flipkart markup. They have no
//! derivation beyond "this is what the pages looked like"; change them only
//! alongside a fixture that shows why.

/// Hrefs longer than this are assumed to carry tracking parameters and are
/// rebuilt from the product-id pattern when possible.
pub const LONG_HREF_LEN: usize = 500;

/// Amazon: a number read from an `aria-label` is a review count only if it
/// exceeds this (smaller values are usually the star rating).
pub const ARIA_REVIEW_COUNT_MIN: u64 = 10;

/// Flipkart: a free-text `N Ratings` / `(N)` count must exceed this.
pub const TEXT_REVIEW_COUNT_MIN: u64 = 5;

/// Ratings outside `0..=RATING_MAX` are rejected.
pub const RATING_MAX: f64 = 5.0;

/// Dedicated brand elements longer than this (chars) are rejected.
pub const BRAND_ELEMENT_MAX_LEN: usize = 50;

/// A brand derived from the leading words of the name must be shorter than this.
pub const DERIVED_BRAND_MAX_LEN: usize = 30;

/// Badge labels must be shorter than this.
pub const BADGE_MAX_LEN: usize = 50;

/// Amazon specification fragments must be strictly inside this window (chars).
pub const SPEC_LEN_WINDOW: (usize, usize) = (20, 200);

/// Flipkart `<li>` highlights must be longer than this.
pub const LIST_HIGHLIGHT_MIN_LEN: usize = 10;

/// Flipkart highlight blocks must be strictly inside this window (chars).
pub const BLOCK_HIGHLIGHT_LEN_WINDOW: (usize, usize) = (20, 200);

/// Flipkart looks at no more than this many `<li>` or highlight blocks.
pub const HIGHLIGHT_SCAN_LIMIT: usize = 5;

/// Flipkart names from a class-matched element must be longer than this.
pub const NAME_ELEMENT_MIN_LEN: usize = 10;

/// Flipkart names taken from an arbitrary link must be longer than this.
pub const NAME_LINK_MIN_LEN: usize = 20;

/// Cap on `badges` and `highlights` list lengths.
pub const LIST_FIELD_CAP: usize = 3;

/// Bank offer text is cut to this many chars.
pub const BANK_OFFER_MAX_LEN: usize = 80;
