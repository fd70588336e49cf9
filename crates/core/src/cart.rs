//! Shopping cart state and its reducer.
//!
//! The cart is a plain value mutated exclusively through
//! [`Cart::apply`], so every quantity change flows through one place.
//! Quantities are always >= 1 while a line is present: decrementing a
//! quantity-1 line removes it rather than leaving a zero-quantity entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{ProductId, VariantId};
use crate::types::price::Price;

/// A single cart line, keyed by variant identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Purchasable variant this line refers to.
    pub variant_id: VariantId,
    /// Owning product, for display grouping.
    pub product_id: ProductId,
    /// Display title.
    pub title: String,
    /// Price per unit.
    pub unit_price: Price,
    /// Units in the cart; >= 1 while the line exists.
    pub quantity: u32,
}

impl CartLine {
    /// Total for this line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.amount * Decimal::from(self.quantity)
    }
}

/// Cart mutations, dispatched through [`Cart::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartAction {
    /// Add a line; merges quantities with an existing line for the same
    /// variant.
    Add(CartLine),
    /// Increase a line's quantity by one.
    Increment(VariantId),
    /// Decrease a line's quantity by one; removes the line at quantity 1.
    Decrement(VariantId),
    /// Remove the line for a variant entirely.
    Remove(VariantId),
    /// Empty the cart.
    Clear,
}

/// A shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines currently in the cart.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Apply a cart action.
    ///
    /// Actions targeting a variant not in the cart are no-ops; a zero-quantity
    /// `Add` is likewise ignored.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(line) => self.add(line),
            CartAction::Increment(variant_id) => {
                if let Some(line) = self.line_mut(variant_id) {
                    line.quantity = line.quantity.saturating_add(1);
                }
            }
            CartAction::Decrement(variant_id) => self.decrement(variant_id),
            CartAction::Remove(variant_id) => {
                self.lines.retain(|line| line.variant_id != variant_id);
            }
            CartAction::Clear => self.lines.clear(),
        }
    }

    fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }

        if let Some(existing) = self.line_mut(line.variant_id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
    }

    fn decrement(&mut self, variant_id: VariantId) {
        let Some(line) = self.line_mut(variant_id) else {
            return;
        };

        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            self.lines.retain(|l| l.variant_id != variant_id);
        }
    }

    fn line_mut(&mut self, variant_id: VariantId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.variant_id == variant_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::types::price::CurrencyCode;

    use super::*;

    fn line(variant: u64, quantity: u32, cents: i64) -> CartLine {
        CartLine {
            variant_id: VariantId::new(variant),
            product_id: ProductId::new(variant),
            title: format!("Item {variant}"),
            unit_price: Price::from_minor_units(cents, CurrencyCode::USD),
            quantity,
        }
    }

    #[test]
    fn test_add_merges_by_variant() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(line(1, 2, 500)));
        cart.apply(CartAction::Add(line(1, 3, 500)));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_increment_then_decrement_restores_state() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(line(1, 2, 500)));
        cart.apply(CartAction::Add(line(2, 1, 250)));
        let before = cart.clone();
        let subtotal_before = cart.subtotal();

        cart.apply(CartAction::Increment(VariantId::new(1)));
        cart.apply(CartAction::Decrement(VariantId::new(1)));

        assert_eq!(cart, before);
        assert_eq!(cart.subtotal(), subtotal_before);
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(line(1, 1, 500)));
        cart.apply(CartAction::Decrement(VariantId::new(1)));

        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_leaves_other_lines_unchanged() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(line(1, 2, 500)));
        cart.apply(CartAction::Add(line(2, 1, 250)));
        cart.apply(CartAction::Remove(VariantId::new(1)));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].variant_id, VariantId::new(2));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_actions_on_missing_variant_are_noops() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(line(1, 1, 500)));
        let before = cart.clone();

        cart.apply(CartAction::Increment(VariantId::new(99)));
        cart.apply(CartAction::Decrement(VariantId::new(99)));
        cart.apply(CartAction::Remove(VariantId::new(99)));

        assert_eq!(cart, before);
    }

    #[test]
    fn test_zero_quantity_add_ignored() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(line(1, 0, 500)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(line(1, 2, 500))); // $10.00
        cart.apply(CartAction::Add(line(2, 1, 250))); // $2.50

        assert_eq!(cart.subtotal(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(line(1, 2, 500)));
        cart.apply(CartAction::Clear);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }
}
