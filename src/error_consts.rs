pub const NEGATIVE_SCRAPE_COUNT: &str = "EXPR: scrape count may not be negative";
pub const NEGATIVE_INTERVAL: &str = "EXPR: lookback interval may not be negative";
pub const INVALID_PERCENTILE: &str = "EXPR: percentile must be between 0 and 100";
pub const DUPLICATE_TAG: &str = "EXPR: duplicate tag name";
pub const EMPTY_TAG_NAME: &str = "EXPR: tag name may not be empty";
pub const INVALID_TAG_VALUE: &str = "EXPR: tag value may not be empty or a histogram";
pub const EMPTY_WITHOUT_CLAUSE: &str = "EXPR: without clause requires at least one tag";
pub const NEGATIVE_RANGE: &str = "EXPR: histogram bucket floor exceeds ceiling";
pub const MIXED_SIGN: &str = "EXPR: histogram has mixed-sign bucket counts";
pub const NON_FINITE_BUCKET: &str = "EXPR: histogram bucket bounds must be finite";
pub const WINDOW_ORDER: &str = "EXPR: collections must be added in strictly increasing timestamp order";
pub const EMPTY_PATH: &str = "EXPR: path requires at least one segment";
