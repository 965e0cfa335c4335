//! Two-level cursor (category, item) over a [`Catalog`].
//!
//! The cursor holds no catalog of its own: every operation takes the catalog
//! produced by the latest scan together with the current [`FocusState`] and
//! returns the next state. Cycling never wraps; stepping past either end
//! leaves focus where it was and reports the boundary.

use crate::catalog::{Catalog, Category};
use crate::error::NavError;

/// Currently selected (category, item) pair. Survives rescans.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FocusState {
    pub category: Option<String>,
    pub item: Option<String>,
}

impl FocusState {
    pub fn new(category: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            item: Some(item.into()),
        }
    }

    pub const fn empty() -> Self {
        Self {
            category: None,
            item: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() || self.item.is_none()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    fn first_of(category: &Category) -> Self {
        Self {
            category: Some(category.name().to_owned()),
            item: category.first().map(|poi| poi.name.clone()),
        }
    }
}

/// Direction of a cycle request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum Cycle {
    Next,
    Prev,
}

impl Cycle {
    const fn apply(self, index: usize) -> Option<usize> {
        match self {
            Cycle::Next => index.checked_add(1),
            Cycle::Prev => index.checked_sub(1),
        }
    }
}

/// Outcome of a cycle request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub focus: FocusState,
    /// Set when the request ran past the first or last entry.
    pub boundary: bool,
}

/// Returns `focus` if it still resolves in `catalog`, otherwise the first item
/// of the first non-empty category, or an empty focus.
pub fn resync(catalog: &Catalog, focus: &FocusState) -> FocusState {
    if let (Some(category), Some(item)) = (focus.category(), focus.item())
        && catalog.poi(category, item).is_some()
    {
        return focus.clone();
    }
    first_valid(catalog)
}

/// First item of the first non-empty category in catalog order.
pub fn first_valid(catalog: &Catalog) -> FocusState {
    catalog
        .categories()
        .iter()
        .find(|category| !category.is_empty())
        .map(FocusState::first_of)
        .unwrap_or_default()
}

/// Re-derives the first item of the focused category, falling back to
/// [`first_valid`] when that category is gone.
pub fn first_item_of_current(catalog: &Catalog, focus: &FocusState) -> FocusState {
    focus
        .category()
        .and_then(|name| catalog.get(name))
        .filter(|category| !category.is_empty())
        .map(FocusState::first_of)
        .unwrap_or_else(|| first_valid(catalog))
}

/// Moves to the neighbouring item inside the focused category.
///
/// # Errors
///
/// Returns [`NavError::NothingFound`] when the focused category is not in the catalog.
pub fn cycle_item(catalog: &Catalog, focus: &FocusState, cycle: Cycle) -> Result<Step, NavError> {
    let category = focus
        .category()
        .and_then(|name| catalog.get(name))
        .ok_or(NavError::NothingFound)?;

    let target = focus
        .item()
        .and_then(|item| category.index_of(item))
        .and_then(|index| cycle.apply(index))
        .and_then(|index| category.items().get(index));

    Ok(match target {
        Some(poi) => Step {
            focus: FocusState::new(category.name(), poi.name.clone()),
            boundary: false,
        },
        None => Step {
            focus: focus.clone(),
            boundary: true,
        },
    })
}

/// Moves to the first item of the neighbouring category.
///
/// # Errors
///
/// Returns [`NavError::NoCategories`] when the focused category is not in the catalog.
pub fn cycle_category(
    catalog: &Catalog,
    focus: &FocusState,
    cycle: Cycle,
) -> Result<Step, NavError> {
    let index = focus
        .category()
        .and_then(|name| catalog.index_of(name))
        .ok_or(NavError::NoCategories)?;

    let target = cycle
        .apply(index)
        .and_then(|index| catalog.category_at(index));

    Ok(match target {
        Some(category) => Step {
            focus: FocusState::first_of(category),
            boundary: false,
        },
        None => Step {
            focus: focus.clone(),
            boundary: true,
        },
    })
}
