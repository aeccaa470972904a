use crate::domain::skin::WeaponDataset;
use crate::error::Result;
use std::io::Write;

/// Writes weapon datasets as CSV, one row per skin.
pub struct SkinWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SkinWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes the header and every skin of `dataset`, then flushes.
    pub fn write_dataset(&mut self, dataset: &WeaponDataset) -> Result<()> {
        self.writer.write_record([
            "name",
            "rarity",
            "price_vp",
            "price_usd",
            "packs",
            "image_url",
        ])?;

        for skin in &dataset.skins {
            let price_vp = skin.price_vp.to_string();
            let price_usd = skin.price_usd.map(|p| p.to_string()).unwrap_or_default();
            let packs = skin.optimal_vp_packs.join("; ");
            self.writer.write_record([
                skin.name.as_str(),
                skin.rarity.as_str(),
                price_vp.as_str(),
                price_usd.as_str(),
                packs.as_str(),
                skin.image_url.as_deref().unwrap_or_default(),
            ])?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
