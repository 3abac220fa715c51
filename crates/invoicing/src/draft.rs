//! Order draft: the basket assembled at the till before an invoice is issued.

use serde::{Deserialize, Serialize};

use pizzapos_catalog::Item;
use pizzapos_core::{DomainError, DomainResult, ItemId, Money};

use crate::invoice::LineInput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    pub item_id: ItemId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl DraftLine {
    pub fn total(&self) -> Money {
        self.unit_price
            .checked_mul(self.quantity)
            .unwrap_or(Money::from_cents(u64::MAX))
    }
}

/// Selected items with quantities. Quantities never drop below 1; taking an
/// item off the order is an explicit `remove_item`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    lines: Vec<DraftLine>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `item`; an item already on the order gets its quantity
    /// bumped instead of a second line.
    pub fn add_item(&mut self, item: &Item) {
        if let Some(line) = self.line_mut(item.id_typed()) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(DraftLine {
            item_id: item.id_typed(),
            name: item.name().to_string(),
            unit_price: item.price(),
            quantity: 1,
        });
    }

    /// Change a line's quantity by `delta`, clamping the result to at least 1.
    /// Returns the new quantity.
    pub fn adjust_quantity(&mut self, item_id: ItemId, delta: i64) -> DomainResult<u32> {
        let line = self
            .line_mut(item_id)
            .ok_or_else(|| DomainError::item_not_found(item_id))?;
        let next = i64::from(line.quantity).saturating_add(delta).max(1);
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Ok(line.quantity)
    }

    /// Drop the line for `item_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, item_id: ItemId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);
        self.lines.len() != before
    }

    pub fn subtotal(&self) -> Money {
        Money::checked_sum(self.lines.iter().map(DraftLine::total))
            .unwrap_or(Money::from_cents(u64::MAX))
    }

    pub fn line_inputs(&self) -> Vec<LineInput> {
        self.lines
            .iter()
            .map(|l| LineInput {
                item_id: l.item_id,
                quantity: i64::from(l.quantity),
            })
            .collect()
    }

    fn line_mut(&mut self, item_id: ItemId) -> Option<&mut DraftLine> {
        self.lines.iter_mut().find(|l| l.item_id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzapos_catalog::{Category, NewItem};

    fn item(name: &str, cents: u64) -> Item {
        Item::create(
            ItemId::new(),
            NewItem {
                name: name.to_string(),
                category: Category::Pizza,
                price: Money::from_cents(cents),
                description: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn adding_same_item_twice_increments_quantity() {
        let pizza = item("Margherita", 1299);
        let mut draft = OrderDraft::new();
        draft.add_item(&pizza);
        draft.add_item(&pizza);
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].quantity, 2);
        assert_eq!(draft.subtotal().cents(), 2598);
    }

    #[test]
    fn decrement_below_one_clamps_to_one() {
        let pizza = item("Margherita", 1299);
        let mut draft = OrderDraft::new();
        draft.add_item(&pizza);

        assert_eq!(draft.adjust_quantity(pizza.id_typed(), -1).unwrap(), 1);
        assert_eq!(draft.adjust_quantity(pizza.id_typed(), -10).unwrap(), 1);
        assert_eq!(draft.adjust_quantity(pizza.id_typed(), 2).unwrap(), 3);
        assert_eq!(draft.line_inputs()[0].quantity, 3);
    }

    #[test]
    fn adjusting_unknown_line_fails() {
        let mut draft = OrderDraft::new();
        let id = ItemId::new();
        assert_eq!(
            draft.adjust_quantity(id, 1).unwrap_err(),
            DomainError::ItemNotFound(id)
        );
    }

    #[test]
    fn remove_is_explicit() {
        let pizza = item("Margherita", 1299);
        let water = item("Water", 199);
        let mut draft = OrderDraft::new();
        draft.add_item(&pizza);
        draft.add_item(&water);

        assert!(draft.remove_item(pizza.id_typed()));
        assert!(!draft.remove_item(pizza.id_typed()));
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.subtotal().cents(), 199);
    }
}
