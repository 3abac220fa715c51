//! Line pricing: resolve requested items against the catalog and snapshot
//! their name and price.

use pizzapos_catalog::Item;
use pizzapos_core::{DomainError, ItemId};

use crate::invoice::{InvoiceLine, LineInput};

/// Validate and price every requested line.
///
/// `resolve` looks an item up in the catalog; `Ok(None)` means the item does
/// not exist and becomes `DomainError::ItemNotFound`. Quantities are checked
/// before the lookup, and the first failing line aborts the whole request, so
/// either every line is priced or nothing is returned.
pub fn price_lines<F, E>(inputs: &[LineInput], mut resolve: F) -> Result<Vec<InvoiceLine>, E>
where
    F: FnMut(ItemId) -> Result<Option<Item>, E>,
    E: From<DomainError>,
{
    if inputs.is_empty() {
        return Err(DomainError::validation("cannot create invoice without items").into());
    }

    let mut lines = Vec::with_capacity(inputs.len());
    for input in inputs {
        let quantity = checked_quantity(input.quantity)?;
        let item = resolve(input.item_id)?
            .ok_or_else(|| DomainError::item_not_found(input.item_id))?;
        lines.push(InvoiceLine::new(
            item.id_typed(),
            item.name(),
            item.price(),
            quantity,
        )?);
    }
    Ok(lines)
}

fn checked_quantity(raw: i64) -> Result<u32, DomainError> {
    if raw < 1 {
        return Err(DomainError::invalid_quantity(format!(
            "quantity must be a positive integer (got {raw})"
        )));
    }
    u32::try_from(raw)
        .map_err(|_| DomainError::invalid_quantity(format!("quantity {raw} is too large")))
}
