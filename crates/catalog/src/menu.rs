//! Starter menu for a fresh installation.

use pizzapos_core::{DomainResult, ItemId, Money};

use crate::item::{Category, Item, NewItem};

const DEFAULT_MENU: &[(&str, Category, u64, &str)] = &[
    ("Margherita Pizza", Category::Pizza, 1299, "Classic tomato sauce, mozzarella, fresh basil"),
    ("Pepperoni Pizza", Category::Pizza, 1499, "Tomato sauce, mozzarella, pepperoni"),
    (
        "Supreme Pizza",
        Category::Pizza,
        1899,
        "Loaded with pepperoni, sausage, peppers, onions, mushrooms",
    ),
    ("Extra Cheese", Category::Topping, 250, "Additional mozzarella cheese"),
    ("Mushrooms", Category::Topping, 150, "Fresh mushrooms"),
    ("Pepperoni", Category::Topping, 200, "Premium pepperoni slices"),
    ("Coca Cola", Category::Beverage, 299, "16oz bottle"),
    ("Bottled Water", Category::Beverage, 199, "16oz bottle"),
];

/// The default items seeded into an empty catalog, with fresh identifiers.
pub fn default_menu() -> DomainResult<Vec<Item>> {
    DEFAULT_MENU
        .iter()
        .map(|(name, category, cents, description)| {
            Item::create(
                ItemId::new(),
                NewItem {
                    name: (*name).to_string(),
                    category: *category,
                    price: Money::from_cents(*cents),
                    description: Some((*description).to_string()),
                },
            )
        })
        .collect()
}
