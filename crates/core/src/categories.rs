//! Well-known notification category constants.
//!
//! These must match the category values written by upstream producers into
//! the `notification_queue.category` column. The set is open: the pipeline
//! treats unknown categories like any other.

/// A deal crossed the "hot" score threshold for a followed keyword.
pub const CATEGORY_SMART_HOT: &str = "smart_hot";

/// A tracked deal dropped in price.
pub const CATEGORY_PRICE_DROP: &str = "price_drop";

/// A user was mentioned in a comment.
pub const CATEGORY_MENTION: &str = "mention";

/// Someone replied to a user's comment.
pub const CATEGORY_REPLY: &str = "reply";
