use serde::{Deserialize, Serialize};

use pizzapos_core::{DomainError, DomainResult, Entity, ItemId, Money};

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const DESCRIPTION_MAX_CHARS: usize = 200;

/// Menu category. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pizza,
    Topping,
    Beverage,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pizza => "pizza",
            Category::Topping => "topping",
            Category::Beverage => "beverage",
            Category::Other => "other",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sellable menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    category: Category,
    price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// Input for creating an item (no identifier yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub price: Money,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update; absent fields keep their current value.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Item {
    /// Validate `input` and build an item under `id`.
    pub fn create(id: ItemId, input: NewItem) -> DomainResult<Self> {
        let name = normalize_name(&input.name)?;
        let description = normalize_description(input.description)?;
        let price = checked_price(input.price)?;
        Ok(Self {
            id,
            name,
            category: input.category,
            price,
            description,
        })
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Merge `patch` into a copy of this item, re-validating the result.
    pub fn patched(&self, patch: ItemPatch) -> DomainResult<Self> {
        let name = match patch.name {
            Some(n) => normalize_name(&n)?,
            None => self.name.clone(),
        };
        let description = match patch.description {
            Some(d) => normalize_description(d)?,
            None => self.description.clone(),
        };
        Ok(Self {
            id: self.id,
            name,
            category: patch.category.unwrap_or(self.category),
            price: checked_price(patch.price.unwrap_or(self.price))?,
            description,
        })
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn normalize_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    let chars = name.chars().count();
    if chars < NAME_MIN_CHARS {
        return Err(DomainError::validation(format!(
            "name must be at least {NAME_MIN_CHARS} characters"
        )));
    }
    if chars > NAME_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "name must be at most {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

fn checked_price(price: Money) -> DomainResult<Money> {
    Money::try_from_cents(price.cents())
}

fn normalize_description(raw: Option<String>) -> DomainResult<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "description must be at most {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}
