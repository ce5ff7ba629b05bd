use std::fmt;

/// Inventory level bucket. Boundaries are inclusive: ten or fewer is
/// scarce, fifty or more is surplus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockLevel {
    Scarce,
    Normal,
    Surplus,
}

impl StockLevel {
    pub const SCARCE_MAX: i64 = 10;
    pub const SURPLUS_MIN: i64 = 50;

    pub fn classify(quantity: i64) -> Self {
        if quantity <= Self::SCARCE_MAX {
            Self::Scarce
        } else if quantity >= Self::SURPLUS_MIN {
            Self::Surplus
        } else {
            Self::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scarce => "scarce",
            Self::Normal => "normal",
            Self::Surplus => "surplus",
        }
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(StockLevel::classify(0), StockLevel::Scarce);
        assert_eq!(StockLevel::classify(10), StockLevel::Scarce);
        assert_eq!(StockLevel::classify(11), StockLevel::Normal);
        assert_eq!(StockLevel::classify(49), StockLevel::Normal);
        assert_eq!(StockLevel::classify(50), StockLevel::Surplus);
        assert_eq!(StockLevel::classify(-3), StockLevel::Scarce);
    }
}
