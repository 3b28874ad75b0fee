//! Shopper cart state.
//!
//! [`Cart`] is a plain state container for one store's cart. It does no I/O;
//! the storefront loads it through a persistence port, applies one mutation
//! and saves it back.

use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Price, ProductId, StoreId};

/// Snapshot of a product taken when it is added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
}

/// One line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: CartProduct,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the amount is not representable.
    pub fn line_total(&self) -> Result<Price, CartError> {
        self.product
            .price
            .checked_times(self.quantity)
            .ok_or(CartError::TotalOverflow)
    }
}

/// Errors from cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The line index is past the end of the cart.
    #[error("no cart line at index {0}")]
    NoSuchLine(usize),

    /// A product was priced below zero.
    #[error("price cannot be negative")]
    NegativePrice,

    /// A product's currency differs from the lines already in the cart.
    #[error("cart is priced in {cart:?}, product is priced in {product:?}")]
    CurrencyMismatch {
        cart: CurrencyCode,
        product: CurrencyCode,
    },

    /// The cart total would exceed the representable amount.
    #[error("cart total is too large")]
    TotalOverflow,
}

/// A shopper's cart for a single store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    store_id: StoreId,
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new(store_id: StoreId) -> Self {
        Self {
            store_id,
            lines: Vec::new(),
        }
    }

    /// Rebuild a cart from persisted lines.
    #[must_use]
    pub const fn from_lines(store_id: StoreId, lines: Vec<CartLine>) -> Self {
        Self { store_id, lines }
    }

    #[must_use]
    pub const fn store_id(&self) -> StoreId {
        self.store_id
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency of the cart's lines, `None` while empty.
    #[must_use]
    pub fn currency(&self) -> Option<CurrencyCode> {
        self.lines.first().map(|line| line.product.price.currency_code)
    }

    /// Add one unit of `product`.
    ///
    /// If a line for the same product id exists its quantity is incremented,
    /// otherwise a new line with quantity 1 is appended. The cart is left
    /// unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NegativePrice`], [`CartError::CurrencyMismatch`]
    /// if the cart already holds another currency, or
    /// [`CartError::TotalOverflow`] if the total would no longer fit.
    pub fn add_item(&mut self, product: CartProduct) -> Result<(), CartError> {
        if product.price.amount.is_sign_negative() {
            return Err(CartError::NegativePrice);
        }
        if let Some(cart) = self.currency()
            && cart != product.price.currency_code
        {
            return Err(CartError::CurrencyMismatch {
                cart,
                product: product.price.currency_code,
            });
        }

        self.apply(|lines| {
            if let Some(line) = lines.iter_mut().find(|line| line.product.id == product.id) {
                line.quantity = line.quantity.saturating_add(1);
            } else {
                lines.push(CartLine {
                    product,
                    quantity: 1,
                });
            }
            Ok(())
        })
    }

    /// Remove the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoSuchLine`] if `index` is out of bounds.
    pub fn remove_item(&mut self, index: usize) -> Result<CartLine, CartError> {
        if index >= self.lines.len() {
            return Err(CartError::NoSuchLine(index));
        }
        Ok(self.lines.remove(index))
    }

    /// Set the quantity of the line at `index`. Zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoSuchLine`] if `index` is out of bounds, or
    /// [`CartError::TotalOverflow`] if the total would no longer fit.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> Result<(), CartError> {
        let Ok(quantity) = u32::try_from(quantity) else {
            if quantity <= 0 {
                return self.remove_item(index).map(|_| ());
            }
            return self.set_quantity(index, u32::MAX);
        };
        if quantity == 0 {
            return self.remove_item(index).map(|_| ());
        }
        self.set_quantity(index, quantity)
    }

    fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<(), CartError> {
        self.apply(|lines| {
            let line = lines.get_mut(index).ok_or(CartError::NoSuchLine(index))?;
            line.quantity = quantity;
            Ok(())
        })
    }

    /// Run `change` on a copy of the lines and keep it only if the result
    /// still has a total.
    fn apply(
        &mut self,
        change: impl FnOnce(&mut Vec<CartLine>) -> Result<(), CartError>,
    ) -> Result<(), CartError> {
        let mut lines = self.lines.clone();
        change(&mut lines)?;
        sum_lines(&lines)?;
        self.lines = lines;
        Ok(())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    ///
    /// An empty cart totals zero in the default currency.
    ///
    /// # Errors
    ///
    /// Mutations keep the total representable, so this only fails for lines
    /// restored through [`Cart::from_lines`]: [`CartError::TotalOverflow`]
    /// or [`CartError::CurrencyMismatch`].
    pub fn total(&self) -> Result<Price, CartError> {
        sum_lines(&self.lines)
    }
}

fn sum_lines(lines: &[CartLine]) -> Result<Price, CartError> {
    let currency = lines
        .first()
        .map_or_else(CurrencyCode::default, |line| line.product.price.currency_code);

    lines.iter().try_fold(Price::zero(currency), |acc, line| {
        let line_total = line.line_total()?;
        if line_total.currency_code != currency {
            return Err(CartError::CurrencyMismatch {
                cart: currency,
                product: line_total.currency_code,
            });
        }
        acc.checked_add(&line_total).ok_or(CartError::TotalOverflow)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32, cents: i64) -> CartProduct {
        CartProduct {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new(Decimal::new(cents, 2), CurrencyCode::USD),
        }
    }

    #[test]
    fn test_add_item_merges_same_product() {
        let mut cart = Cart::new(StoreId::new(1));
        cart.add_item(product(1, 500)).unwrap();
        cart.add_item(product(2, 250)).unwrap();
        cart.add_item(product(1, 500)).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[1].quantity, 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_total() {
        let mut cart = Cart::new(StoreId::new(1));
        assert_eq!(cart.total().unwrap().amount, Decimal::ZERO);

        cart.add_item(product(1, 500)).unwrap();
        cart.add_item(product(1, 500)).unwrap();
        cart.add_item(product(2, 250)).unwrap();
        assert_eq!(cart.total().unwrap().amount, Decimal::new(1250, 2));
        assert_eq!(cart.total().unwrap().to_string(), "$12.50");
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new(StoreId::new(1));
        cart.add_item(product(1, 500)).unwrap();
        cart.update_quantity(0, 4).unwrap();
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_update_quantity_to_zero_or_less_removes_line() {
        let mut cart = Cart::new(StoreId::new(1));
        cart.add_item(product(1, 500)).unwrap();
        cart.add_item(product(2, 500)).unwrap();

        cart.update_quantity(0, 0).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].product.id, ProductId::new(2));

        cart.update_quantity(0, -3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_out_of_range_index() {
        let mut cart = Cart::new(StoreId::new(1));
        assert_eq!(cart.remove_item(0), Err(CartError::NoSuchLine(0)));
        assert_eq!(cart.update_quantity(3, 1), Err(CartError::NoSuchLine(3)));
        assert_eq!(cart.update_quantity(3, 0), Err(CartError::NoSuchLine(3)));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new(StoreId::new(1));
        cart.add_item(product(1, 500)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    fn priced(id: i32, amount: Decimal, currency: CurrencyCode) -> CartProduct {
        CartProduct {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new(amount, currency),
        }
    }

    #[test]
    fn test_add_item_rejects_total_overflow() {
        let mut cart = Cart::new(StoreId::new(1));
        cart.add_item(priced(1, Decimal::MAX, CurrencyCode::USD)).unwrap();

        let err = cart.add_item(priced(1, Decimal::MAX, CurrencyCode::USD));
        assert_eq!(err, Err(CartError::TotalOverflow));
        let err = cart.add_item(priced(2, Decimal::ONE, CurrencyCode::USD));
        assert_eq!(err, Err(CartError::TotalOverflow));

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total().unwrap().amount, Decimal::MAX);
    }

    #[test]
    fn test_update_quantity_rejects_total_overflow() {
        let mut cart = Cart::new(StoreId::new(1));
        cart.add_item(priced(1, Decimal::MAX, CurrencyCode::USD)).unwrap();

        assert_eq!(cart.update_quantity(0, 2), Err(CartError::TotalOverflow));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_item_rejects_second_currency() {
        let mut cart = Cart::new(StoreId::new(1));
        cart.add_item(priced(1, Decimal::new(500, 2), CurrencyCode::USD)).unwrap();

        let err = cart.add_item(priced(2, Decimal::new(500, 2), CurrencyCode::EUR));
        assert_eq!(
            err,
            Err(CartError::CurrencyMismatch {
                cart: CurrencyCode::USD,
                product: CurrencyCode::EUR,
            })
        );
        assert_eq!(cart.total().unwrap().to_string(), "$5.00");

        cart.clear();
        cart.add_item(priced(2, Decimal::new(500, 2), CurrencyCode::EUR)).unwrap();
        assert_eq!(cart.currency(), Some(CurrencyCode::EUR));
    }

    #[test]
    fn test_add_item_rejects_negative_price() {
        let mut cart = Cart::new(StoreId::new(1));
        let err = cart.add_item(priced(1, Decimal::new(-1, 0), CurrencyCode::USD));
        assert_eq!(err, Err(CartError::NegativePrice));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_of_restored_mixed_currency_lines_fails() {
        let line = |id, currency| CartLine {
            product: priced(id, Decimal::new(500, 2), currency),
            quantity: 1,
        };
        let cart = Cart::from_lines(
            StoreId::new(1),
            vec![line(1, CurrencyCode::USD), line(2, CurrencyCode::EUR)],
        );
        assert!(matches!(cart.total(), Err(CartError::CurrencyMismatch { .. })));
    }
}
