//! Notification text rendering

use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::types::{Notification, Position};

/// Maximum characters of the rendered trade size
const SIZE_DISPLAY_CHARS: usize = 7;

/// Position explorer URL prefix, suffixed with the account address
const WATCHER_URL_PREFIX: &str = "https://watcher.synthetix.io/";

/// Render the fixed notification template for a classified position
pub fn render_notification(position: &Position, flavor: &str) -> Notification {
    format!(
        "{} {} {} @ {}\n\n{}\n\n{}{}",
        position.direction,
        format_size(position.trade_size),
        position.market_symbol,
        format_usd(position.last_price),
        flavor,
        WATCHER_URL_PREFIX,
        position.account,
    )
}

/// Render a trade size truncated to a bounded width
///
/// Truncated, never rounded. Whole numbers keep a `.0` fractional part so
/// the rendering always reads as a decimal quantity.
pub fn format_size(size: Decimal) -> String {
    let mut text = size.normalize().to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text.truncate(SIZE_DISPLAY_CHARS);
    text
}

/// Render a price as US-locale currency without thousands separators
pub fn format_usd(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}
