use std::fmt;

use serde::Serialize;

/// Spending tier used to steer dining recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetBand {
    BudgetFriendly,
    MidRange,
    Luxury,
}

impl BudgetBand {
    /// Classify a per-day budget: under 50 is budget-friendly, under 150 mid-range.
    pub fn from_daily_budget(daily_budget: f64) -> Self {
        if daily_budget < 50.0 {
            BudgetBand::BudgetFriendly
        } else if daily_budget < 150.0 {
            BudgetBand::MidRange
        } else {
            BudgetBand::Luxury
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetBand::BudgetFriendly => "budget-friendly",
            BudgetBand::MidRange => "mid-range",
            BudgetBand::Luxury => "luxury",
        }
    }
}

impl fmt::Display for BudgetBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-dollar share of `amount`, truncated toward zero.
pub fn share(amount: f64, fraction: f64) -> i64 {
    (amount * fraction).trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TripRequest;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(BudgetBand::from_daily_budget(49.99), BudgetBand::BudgetFriendly);
        assert_eq!(BudgetBand::from_daily_budget(50.0), BudgetBand::MidRange);
        assert_eq!(BudgetBand::from_daily_budget(149.99), BudgetBand::MidRange);
        assert_eq!(BudgetBand::from_daily_budget(150.0), BudgetBand::Luxury);
    }

    #[test]
    fn test_band_from_request() {
        let request = TripRequest::new("Rome", 600.0, 3).unwrap();
        assert_eq!(request.daily_budget(), 200.0);
        assert_eq!(BudgetBand::from_daily_budget(request.daily_budget()).as_str(), "luxury");

        let request = TripRequest::new("Rome", 120.0, 3).unwrap();
        assert_eq!(request.daily_budget(), 40.0);
        assert_eq!(
            BudgetBand::from_daily_budget(request.daily_budget()).as_str(),
            "budget-friendly"
        );
    }

    #[test]
    fn test_share_truncates() {
        assert_eq!(share(500.0, 0.35), 175);
        assert_eq!(share(166.67, 0.15), 25);
    }
}
