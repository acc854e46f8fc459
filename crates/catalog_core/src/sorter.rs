use std::{cmp::Ordering, fmt, str::FromStr};

use shared::protocol::Product;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Id,
    Title,
    Price,
    Category,
    Image,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Id,
        SortColumn::Title,
        SortColumn::Price,
        SortColumn::Category,
        SortColumn::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Price => "price",
            Self::Category => "category",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown sort column `{0}` (expected one of id, title, price, category, image)")]
pub struct UnknownColumn(pub String);

impl FromStr for SortColumn {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == lowered)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Header click: the active column flips direction, any other column starts ascending.
    pub fn after_click(current: Option<SortState>, clicked: SortColumn) -> SortState {
        match current {
            Some(state) if state.column == clicked => SortState {
                column: clicked,
                direction: state.direction.toggled(),
            },
            _ => SortState::ascending(clicked),
        }
    }
}

/// Header glyph for `column` given the active sort.
pub fn indicator(active: Option<SortState>, column: SortColumn) -> &'static str {
    match active {
        Some(state) if state.column == column => match state.direction {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        },
        _ => "⇅",
    }
}

type Comparator = fn(&Product, &Product) -> Ordering;

fn comparator(column: SortColumn) -> Comparator {
    match column {
        SortColumn::Id => |a: &Product, b: &Product| a.id.cmp(&b.id),
        SortColumn::Title => |a: &Product, b: &Product| {
            a.title.to_lowercase().cmp(&b.title.to_lowercase())
        },
        SortColumn::Price => |a: &Product, b: &Product| a.price.total_cmp(&b.price),
        // `None` orders before `Some`, so uncategorized rows lead in ascending order.
        SortColumn::Category => |a: &Product, b: &Product| {
            let left = a.category_name().map(str::to_lowercase);
            let right = b.category_name().map(str::to_lowercase);
            left.cmp(&right)
        },
        SortColumn::Image => |a: &Product, b: &Product| {
            let left = a.primary_image().map(str::to_lowercase);
            let right = b.primary_image().map(str::to_lowercase);
            left.cmp(&right)
        },
    }
}

/// Stable sort: rows with equal keys keep their relative input order in both directions.
pub fn sort_in_place(products: &mut [Product], column: SortColumn, direction: SortDirection) {
    let compare = comparator(column);
    match direction {
        SortDirection::Ascending => products.sort_by(compare),
        SortDirection::Descending => products.sort_by(|a, b| compare(b, a)),
    }
}

pub fn apply(products: &[Product], column: SortColumn, direction: SortDirection) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sort_in_place(&mut sorted, column, direction);
    sorted
}
