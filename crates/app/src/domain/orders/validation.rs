//! Cart validation, run before anything is written.

use rust_decimal::Decimal;

use crate::domain::orders::{data::NewOrderItem, errors::OrdersServiceError};

/// Player ids are non-empty and ASCII alphanumeric.
#[must_use]
pub fn is_valid_player_id(player_id: &str) -> bool {
    !player_id.is_empty() && player_id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Reject a cart that cannot become an order.
///
/// # Errors
///
/// Returns the first problem found, in cart order.
pub fn validate_items(items: &[NewOrderItem]) -> Result<(), OrdersServiceError> {
    if items.is_empty() {
        return Err(OrdersServiceError::EmptyCart);
    }

    for item in items {
        if !is_valid_player_id(&item.player_id) {
            return Err(OrdersServiceError::InvalidPlayerId(item.player_id.clone()));
        }

        if item.quantity == 0 {
            return Err(OrdersServiceError::InvalidQuantity);
        }

        if item.price < Decimal::ZERO {
            return Err(OrdersServiceError::InvalidPrice);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::domain::products::records::ProductUuid;

    use super::*;

    fn item(player_id: &str) -> NewOrderItem {
        NewOrderItem {
            product: ProductUuid::new(),
            player_id: player_id.to_string(),
            quantity: 1,
            price: Decimal::ONE,
        }
    }

    #[test]
    fn accepts_alphanumeric_player_ids() {
        assert!(is_valid_player_id("abc123"));
        assert!(is_valid_player_id("XYZ"));
        assert!(is_valid_player_id("9"));
    }

    #[test]
    fn rejects_empty_or_punctuated_player_ids() {
        for player_id in ["", " ", "abc 123", "abc-123", "abc_123", "ab#c", "игрок", "abc\n"] {
            assert!(
                !is_valid_player_id(player_id),
                "{player_id:?} should be rejected"
            );
        }
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert!(matches!(
            validate_items(&[]),
            Err(OrdersServiceError::EmptyCart)
        ));
    }

    #[test]
    fn one_bad_player_id_rejects_whole_cart() {
        let result = validate_items(&[item("good1"), item("bad id")]);

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidPlayerId(ref id)) if id == "bad id"),
            "expected InvalidPlayerId, got {result:?}"
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result = validate_items(&[NewOrderItem {
            quantity: 0,
            ..item("player")
        }]);

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = validate_items(&[NewOrderItem {
            price: Decimal::NEGATIVE_ONE,
            ..item("player")
        }]);

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidPrice)),
            "expected InvalidPrice, got {result:?}"
        );
    }
}
