//! The shared money counter

use std::fmt;

/// Not enough money for a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub needed: u32,
    pub available: u32,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "need ${} but only ${} available", self.needed, self.available)
    }
}

/// Player funds. Debits are all-or-nothing, so the balance never goes negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Economy {
    money: u32,
}

impl Economy {
    pub fn new(starting_money: u32) -> Self {
        Self {
            money: starting_money,
        }
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.money >= cost
    }

    /// Debit `cost`, or leave the balance untouched if it is too small
    pub fn try_spend(&mut self, cost: u32) -> Result<(), Shortfall> {
        if !self.can_afford(cost) {
            return Err(Shortfall {
                needed: cost,
                available: self.money,
            });
        }
        self.money -= cost;
        Ok(())
    }

    pub fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_and_credit() {
        let mut economy = Economy::new(500);
        assert!(economy.try_spend(100).is_ok());
        assert_eq!(economy.money(), 400);
        economy.credit(50);
        assert_eq!(economy.money(), 450);
    }

    #[test]
    fn test_overspend_is_rejected() {
        let mut economy = Economy::new(40);
        let err = economy.try_spend(50).unwrap_err();
        assert_eq!(err, Shortfall { needed: 50, available: 40 });
        assert_eq!(economy.money(), 40);
        // Spending exactly the balance is allowed
        assert!(economy.try_spend(40).is_ok());
        assert_eq!(economy.money(), 0);
    }
}
