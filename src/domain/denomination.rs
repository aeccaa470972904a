use crate::error::{Result, SkinError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A purchasable pack of Valorant Points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denomination {
    /// Points granted by the pack.
    pub units: u32,
    /// Price in USD.
    pub price: Decimal,
}

impl Denomination {
    pub const fn new(units: u32, price: Decimal) -> Self {
        Self { units, price }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} VP (${})", self.units, self.price)
    }
}

/// VP packs offered by the store, largest first.
pub const VP_PACKS: [Denomination; 6] = [
    Denomination::new(11000, dec!(99.99)),
    Denomination::new(5350, dec!(49.99)),
    Denomination::new(3650, dec!(34.99)),
    Denomination::new(2050, dec!(19.99)),
    Denomination::new(1000, dec!(9.99)),
    Denomination::new(475, dec!(4.99)),
];

/// The packs selected to cover a VP amount, in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasePlan {
    pub total_cost: Decimal,
    pub packs: Vec<Denomination>,
}

impl PurchasePlan {
    pub fn empty() -> Self {
        Self {
            total_cost: Decimal::ZERO,
            packs: Vec::new(),
        }
    }

    /// Sum of the points granted by every selected pack.
    pub fn units_covered(&self) -> u64 {
        self.packs.iter().map(|p| u64::from(p.units)).sum()
    }

    /// Packs rendered as `"{units} VP (${price})"`.
    pub fn formatted_packs(&self) -> Vec<String> {
        self.packs.iter().map(ToString::to_string).collect()
    }
}

/// A validated denomination table: non-empty, strictly descending by units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenominationTable {
    packs: Vec<Denomination>,
}

impl Default for DenominationTable {
    fn default() -> Self {
        Self {
            packs: VP_PACKS.to_vec(),
        }
    }
}

impl DenominationTable {
    pub fn new(packs: Vec<Denomination>) -> Result<Self> {
        if packs.is_empty() {
            return Err(SkinError::InvalidTable("table is empty".to_string()));
        }
        for pack in &packs {
            if pack.units == 0 {
                return Err(SkinError::InvalidTable(
                    "pack units must be positive".to_string(),
                ));
            }
            if pack.price < Decimal::ZERO {
                return Err(SkinError::InvalidTable(format!(
                    "pack of {} units has a negative price",
                    pack.units
                )));
            }
        }
        if packs.windows(2).any(|w| w[0].units <= w[1].units) {
            return Err(SkinError::InvalidTable(
                "packs must be strictly descending by units".to_string(),
            ));
        }
        Ok(Self { packs })
    }

    pub fn packs(&self) -> &[Denomination] {
        &self.packs
    }

    pub fn smallest(&self) -> Denomination {
        self.packs[self.packs.len() - 1]
    }

    /// Covers `target` points with packs from the table.
    ///
    /// Greedily takes the largest packs that fit, covers any remainder with the
    /// smallest pack that is big enough, then checks whether swapping the last
    /// pack for the table's smallest pack is cheaper while still covering the
    /// target. This is a heuristic and is not globally cost-optimal.
    pub fn compute_cost(&self, target: u32) -> Result<PurchasePlan> {
        let mut packs = Vec::new();
        let mut remaining = target;

        for pack in &self.packs {
            while remaining >= pack.units {
                remaining -= pack.units;
                packs.push(*pack);
            }
        }

        if remaining > 0 {
            let cover = self
                .packs
                .iter()
                .rev()
                .find(|p| p.units >= remaining)
                .ok_or(SkinError::Coverage { target, remaining })?;
            packs.push(*cover);
        }

        let total: Decimal = packs.iter().map(|p| p.price).sum();

        if packs.len() > 1 {
            let smallest = self.smallest();
            let kept = &packs[..packs.len() - 1];
            let alternative_cost = kept.iter().map(|p| p.price).sum::<Decimal>() + smallest.price;
            let alternative_units =
                kept.iter().map(|p| u64::from(p.units)).sum::<u64>() + u64::from(smallest.units);

            if alternative_cost < total && alternative_units >= u64::from(target) {
                let mut swapped = kept.to_vec();
                swapped.push(smallest);
                return Ok(PurchasePlan {
                    total_cost: alternative_cost.round_dp(2),
                    packs: swapped,
                });
            }
        }

        Ok(PurchasePlan {
            total_cost: total.round_dp(2),
            packs,
        })
    }
}
