use super::markup::{OpenTag, element_markup, element_text, find_open_tag, open_tags};
use crate::domain::denomination::DenominationTable;
use crate::domain::skin::{PriceTag, Skin, WeaponDataset};
use crate::error::{Result, SkinError};
use tracing::{debug, warn};

const CARD_CLASS: &str = "MuiCard-root";
const TITLE_CLASS: &str = "MuiCardHeader-title";
const RARITY_CLASS: &str = "MuiAvatar-root";
const PRICE_CLASS: &str = "MuiTypography-circular";

/// Extracts skin records from a weapon page.
///
/// Each `MuiCard-root` div is a card, read only up to its own closing tag.
/// Cards that fail to parse are logged and skipped; the rest of the page is
/// kept.
#[derive(Debug, Clone, Default)]
pub struct SkinExtractor {
    table: DenominationTable,
}

impl SkinExtractor {
    pub fn new(table: DenominationTable) -> Self {
        Self { table }
    }

    pub fn extract(&self, weapon: &str, html: &str) -> WeaponDataset {
        let cards: Vec<&str> = open_tags(html, "div")
            .filter(|t| t.class_contains(CARD_CLASS))
            .map(|t| element_markup(html, &t, "div"))
            .collect();

        let mut skins = Vec::new();
        let mut previous_image: Option<String> = None;

        for (i, card) in cards.iter().enumerate() {
            match self.parse_card(card, &mut previous_image) {
                Ok(Some(skin)) => skins.push(skin),
                Ok(None) => debug!(weapon, card = i, "Skipping unnamed card"),
                Err(e) => warn!(weapon, card = i, error = %e, "Error processing card"),
            }
        }

        let dataset = WeaponDataset::new(weapon, skins);
        debug!(weapon, cards = cards.len(), skins = dataset.skins.len(), "Extracted skins");
        dataset
    }

    fn parse_card(&self, card: &str, previous_image: &mut Option<String>) -> Result<Option<Skin>> {
        let name = first_with_class(card, "span", TITLE_CLASS)
            .map(|t| element_text(card, &t, "span"))
            .filter(|n| !n.is_empty() && !n.eq_ignore_ascii_case("unknown"));
        let Some(name) = name else {
            return Ok(None);
        };

        let rarity = first_with_class(card, "div", RARITY_CLASS)
            .and_then(|avatar| find_open_tag(element_markup(card, &avatar, "div"), "img", 0))
            .and_then(|img| img.attr("alt"))
            .filter(|alt| !alt.trim().is_empty())
            .ok_or_else(|| SkinError::Extract(format!("'{name}' has no rarity")))?;

        let price = first_with_class(card, "span", PRICE_CLASS)
            .map(|t| element_text(card, &t, "span"));
        let price_vp = PriceTag::parse(price.as_deref());

        let image_url = match card_image_url(card) {
            Some(url) if previous_image.as_deref() != Some(url.as_str()) => {
                *previous_image = Some(url.clone());
                Some(url)
            }
            _ => None,
        };

        Skin::priced(name, rarity.trim().to_string(), price_vp, image_url, &self.table).map(Some)
    }
}

fn first_with_class<'a>(html: &'a str, tag: &'a str, class: &str) -> Option<OpenTag<'a>> {
    open_tags(html, tag).find(|t| t.class_contains(class))
}

/// URL from the `background-image` style of the card's first `role="img"` div.
fn card_image_url(card: &str) -> Option<String> {
    open_tags(card, "div")
        .find(|t| t.attr("role").is_some_and(|r| r.eq_ignore_ascii_case("img")))
        .and_then(|t| t.attr("style"))
        .and_then(|s| style_url(&s))
}

/// First `url(...)` pointing at an http(s) resource.
fn style_url(style: &str) -> Option<String> {
    let mut rest = style;
    while let Some(at) = rest.find("url(") {
        let candidate = rest[at + 4..].trim_start_matches(['"', '\'', ' ']);
        if candidate.starts_with("http://") || candidate.starts_with("https://") {
            let end = candidate
                .find(['"', '\'', ')'])
                .unwrap_or(candidate.len());
            return Some(candidate[..end].to_string());
        }
        rest = &rest[at + 4..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn card(name: &str, rarity: Option<&str>, price: Option<&str>, image: Option<&str>) -> String {
        let rarity = rarity
            .map(|r| format!(r#"<div class="MuiAvatar-root MuiAvatar-circular"><img alt="{r}" src="r.png"></div>"#))
            .unwrap_or_default();
        let price = price
            .map(|p| format!(r#"<span class="MuiTypography-root MuiTypography-circular">{p}</span>"#))
            .unwrap_or_default();
        let image = image
            .map(|u| format!(r#"<div role="img" style="background-image: url(&quot;{u}&quot;)"></div>"#))
            .unwrap_or_default();
        format!(
            r#"<div class="MuiPaper-root MuiCard-root css-1"><div class="MuiCardHeader-root">{rarity}<span class="MuiTypography-root MuiCardHeader-title">{name}</span></div>{image}<div>{price}</div></div>"#
        )
    }

    #[test]
    fn test_extracts_priced_card() {
        let html = card(
            "Prime Vandal",
            Some("Premium Edition"),
            Some("1775"),
            Some("https://media.valorant-api.com/a.png"),
        );
        let dataset = SkinExtractor::default().extract("vandal", &html);

        assert_eq!(dataset.weapon, "vandal");
        assert_eq!(dataset.skins.len(), 1);
        let skin = &dataset.skins[0];
        assert_eq!(skin.name, "Prime Vandal");
        assert_eq!(skin.rarity, "Premium Edition");
        assert_eq!(skin.price_vp, PriceTag::Points(1775));
        assert_eq!(skin.price_usd, Some(dec!(19.97)));
        assert_eq!(
            skin.image_url.as_deref(),
            Some("https://media.valorant-api.com/a.png")
        );
    }

    #[test]
    fn test_battle_pass_card() {
        let html = card("Couture Vandal", Some("Select Edition"), None, None);
        let dataset = SkinExtractor::default().extract("vandal", &html);
        let skin = &dataset.skins[0];
        assert_eq!(skin.price_vp, PriceTag::NotForSale("Battle Pass".to_string()));
        assert_eq!(skin.price_usd, None);
        assert!(skin.optimal_vp_packs.is_empty());
    }

    #[test]
    fn test_skips_unknown_and_missing_rarity() {
        let html = [
            card("Unknown", Some("Select Edition"), Some("875"), None),
            card("", Some("Select Edition"), Some("875"), None),
            card("Broken", None, Some("875"), None),
            card("Reaver Vandal", Some("Premium Edition"), Some("1775"), None),
        ]
        .concat();
        let dataset = SkinExtractor::default().extract("vandal", &html);
        let names: Vec<_> = dataset.skins.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Reaver Vandal"]);
    }

    #[test]
    fn test_repeated_image_is_dropped() {
        let url = "https://media.valorant-api.com/same.png";
        let html = [
            card("A", Some("Select Edition"), Some("875"), Some(url)),
            card("B", Some("Select Edition"), Some("875"), Some(url)),
            card("C", Some("Select Edition"), Some("875"), Some("https://x/c.png")),
        ]
        .concat();
        let dataset = SkinExtractor::default().extract("ghost", &html);
        assert_eq!(dataset.skins[0].image_url.as_deref(), Some(url));
        assert_eq!(dataset.skins[1].image_url, None);
        assert_eq!(dataset.skins[2].image_url.as_deref(), Some("https://x/c.png"));
    }

    #[test]
    fn test_card_ignores_markup_after_its_close() {
        let html = format!(
            r#"{}<footer><div role="img" style="background-image: url(&quot;https://cdn/banner.png&quot;)"></div><span class="MuiTypography-circular">9999</span></footer>"#,
            card("Couture Vandal", Some("Select Edition"), None, None)
        );
        let dataset = SkinExtractor::default().extract("vandal", &html);
        let skin = &dataset.skins[0];
        assert_eq!(skin.price_vp, PriceTag::NotForSale("Battle Pass".to_string()));
        assert_eq!(skin.price_usd, None);
        assert_eq!(skin.image_url, None);
    }

    #[test]
    fn test_rarity_comes_from_inside_the_avatar() {
        let html = r#"<div class="MuiCard-root"><div class="MuiAvatar-root"></div><span class="MuiCardHeader-title">Reaver Vandal</span><img alt="Skin artwork" src="s.png"></div>"#;
        let dataset = SkinExtractor::default().extract("vandal", html);
        assert!(dataset.skins.is_empty());
    }

    #[test]
    fn test_only_first_role_img_is_read() {
        let html = r#"<div class="MuiCard-root"><div class="MuiAvatar-root"><img alt="Select Edition"></div><span class="MuiCardHeader-title">Reaver Vandal</span><div role="img" style="background: none"></div><div role="img" style="background-image: url('https://x/second.png')"></div></div>"#;
        let dataset = SkinExtractor::default().extract("vandal", html);
        assert_eq!(dataset.skins[0].name, "Reaver Vandal");
        assert_eq!(dataset.skins[0].image_url, None);
    }

    #[test]
    fn test_style_url_variants() {
        assert_eq!(
            style_url("background-image: url('https://a/b.png')").as_deref(),
            Some("https://a/b.png")
        );
        assert_eq!(
            style_url("background: url(http://a/b.png) no-repeat").as_deref(),
            Some("http://a/b.png")
        );
        assert_eq!(style_url("background-image: url(/local.png)"), None);
    }

    #[test]
    fn test_page_without_cards() {
        let dataset = SkinExtractor::default().extract("odin", "<html><body>nothing</body></html>");
        assert!(dataset.skins.is_empty());
    }
}
