//! Order pricing.

use rust_decimal::Decimal;

use crate::{
    domain::orders::{data::NewOrderItem, errors::OrdersServiceError},
    money::{MAX_AMOUNT, round2},
};

/// Sales tax applied to every order (15%).
pub const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Computed totals of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPricing {
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub total_price: Decimal,
}

impl OrderPricing {
    /// Price a cart, rounding to cents after each step.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::AmountTooLarge`] when the total does not
    /// fit the stored money column.
    pub fn from_items(items: &[NewOrderItem]) -> Result<Self, OrdersServiceError> {
        let subtotal = items.iter().try_fold(Decimal::ZERO, |acc, item| {
            item.price
                .checked_mul(Decimal::from(item.quantity))
                .and_then(|line| acc.checked_add(line))
                .ok_or(OrdersServiceError::AmountTooLarge)
        })?;

        let items_price = round2(subtotal);
        let tax_price = round2(
            items_price
                .checked_mul(TAX_RATE)
                .ok_or(OrdersServiceError::AmountTooLarge)?,
        );
        let total_price = round2(
            items_price
                .checked_add(tax_price)
                .ok_or(OrdersServiceError::AmountTooLarge)?,
        );

        if total_price > MAX_AMOUNT {
            return Err(OrdersServiceError::AmountTooLarge);
        }

        Ok(Self {
            items_price,
            tax_price,
            total_price,
        })
    }

    /// True when every quoted total that was supplied equals the computed one.
    #[must_use]
    pub fn matches_quote(
        &self,
        items_price: Option<Decimal>,
        tax_price: Option<Decimal>,
        total_price: Option<Decimal>,
    ) -> bool {
        [
            (items_price, self.items_price),
            (tax_price, self.tax_price),
            (total_price, self.total_price),
        ]
        .into_iter()
        .all(|(quoted, computed)| quoted.is_none_or(|quoted| quoted == computed))
    }
}
