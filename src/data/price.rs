use super::Price;

/// Formats a product price for display
///
/// Missing or unparsable prices read "Price not available" and a zero price
/// reads "Free"; anything else is the amount followed by the euro sign.
pub fn format_price(price: Option<&Price>) -> String {
    match price.and_then(Price::amount) {
        None => "Price not available".to_string(),
        Some(amount) if amount == 0.0 => "Free".to_string(),
        Some(amount) => format!("{}€", amount),
    }
}
