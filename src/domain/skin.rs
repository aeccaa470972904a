use super::denomination::{DenominationTable, PurchasePlan};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Label recorded for skins shown without a price (earned through a pass).
pub const BATTLE_PASS: &str = "Battle Pass";

/// The price shown on a skin card.
///
/// Serialized as a plain string: digits for a VP price, the label otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceTag {
    /// Purchasable for this many VP.
    Points(u32),
    /// Not purchasable with VP (battle pass, agent contract, ...).
    NotForSale(String),
}

impl PriceTag {
    /// Interprets the raw price text of a card.
    ///
    /// All-digit text is a VP price; anything else is kept verbatim, and a
    /// missing or blank price means the skin comes from a battle pass.
    pub fn parse(raw: Option<&str>) -> Self {
        let text = raw.map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return PriceTag::NotForSale(BATTLE_PASS.to_string());
        }
        if text.bytes().all(|b| b.is_ascii_digit())
            && let Ok(points) = text.parse()
        {
            return PriceTag::Points(points);
        }
        PriceTag::NotForSale(text.to_string())
    }

    pub fn points(&self) -> Option<u32> {
        match self {
            PriceTag::Points(points) => Some(*points),
            PriceTag::NotForSale(_) => None,
        }
    }
}

impl fmt::Display for PriceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceTag::Points(points) => write!(f, "{points}"),
            PriceTag::NotForSale(label) => f.write_str(label),
        }
    }
}

impl Serialize for PriceTag {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PriceTag {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(PriceTag::parse(Some(raw.as_str())))
    }
}

/// One skin as published in a weapon dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skin {
    pub name: String,
    pub rarity: String,
    pub price_vp: PriceTag,
    /// Cost of the cheapest VP packs found for `price_vp`, as a JSON number.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_usd: Option<Decimal>,
    pub optimal_vp_packs: Vec<String>,
    pub image_url: Option<String>,
}

impl Skin {
    /// Builds a skin, pricing it with `table` when the tag is a VP amount.
    pub fn priced(
        name: String,
        rarity: String,
        price_vp: PriceTag,
        image_url: Option<String>,
        table: &DenominationTable,
    ) -> Result<Self> {
        let plan = match price_vp.points() {
            Some(points) => Some(table.compute_cost(points)?),
            None => None,
        };

        Ok(Self {
            name,
            rarity,
            price_vp,
            price_usd: plan.as_ref().map(|p| p.total_cost),
            optimal_vp_packs: plan
                .as_ref()
                .map(PurchasePlan::formatted_packs)
                .unwrap_or_default(),
            image_url,
        })
    }
}

/// All skins extracted for one weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDataset {
    pub weapon: String,
    pub skins: Vec<Skin>,
}

impl WeaponDataset {
    /// Collects skins, keeping the first occurrence of each name.
    pub fn new(weapon: impl Into<String>, skins: impl IntoIterator<Item = Skin>) -> Self {
        let mut seen = HashSet::new();
        let skins = skins
            .into_iter()
            .filter(|s| seen.insert(s.name.clone()))
            .collect();
        Self {
            weapon: weapon.into(),
            skins,
        }
    }
}
