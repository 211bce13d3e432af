//! Ordering of search results.

use std::fmt;
use std::str::FromStr;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Ascending order (oldest first).
    Asc,
    /// Descending order (newest first).
    #[default]
    Desc,
}

impl Direction {
    /// Wire value of the direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Specifies the ordering of search results.
///
/// # Example
///
/// ```
/// use ted_search_lib::api::query::{Direction, Sort};
///
/// let sort = Sort::asc("publication-date");
/// assert_eq!(sort.direction(), Direction::Asc);
/// assert_eq!(Sort::default(), Sort::desc("publication-date"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sort {
    field: String,
    direction: Direction,
}

impl Default for Sort {
    fn default() -> Self {
        Self::desc("publication-date")
    }
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Creates an ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Asc)
    }

    /// Creates a descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Desc)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("ASC".parse::<Direction>(), Ok(Direction::Asc));
        assert_eq!(" desc ".parse::<Direction>(), Ok(Direction::Desc));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
