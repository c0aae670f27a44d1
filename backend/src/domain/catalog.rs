//! Static tree catalog.
//!
//! Five tree types, fixed at build time. The per-type absorption figures are
//! descriptive copy for the store UI only; the footprint estimator uses its
//! own flat constant (see `footprint`).

use shared::StoreTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeType {
    Oak,
    Pine,
    Maple,
    Fir,
    Willow,
}

impl TreeType {
    pub const ALL: [TreeType; 5] = [
        TreeType::Oak,
        TreeType::Pine,
        TreeType::Maple,
        TreeType::Fir,
        TreeType::Willow,
    ];

    /// Catalog name as it appears on the wire, e.g. "OAK"
    pub fn name(&self) -> &'static str {
        match self {
            TreeType::Oak => "OAK",
            TreeType::Pine => "PINE",
            TreeType::Maple => "MAPLE",
            TreeType::Fir => "FIR",
            TreeType::Willow => "WILLOW",
        }
    }

    pub fn from_name(name: &str) -> Option<TreeType> {
        TreeType::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Descriptive absorption figure in kg CO2 per year
    pub fn co2_absorption_kg_per_year(&self) -> u32 {
        match self {
            TreeType::Oak => 10,
            TreeType::Pine => 8,
            TreeType::Maple => 6,
            TreeType::Fir => 7,
            TreeType::Willow => 5,
        }
    }

    pub fn description(&self) -> String {
        format!(
            "Absorbs approximately {} kg of CO₂ per year",
            self.co2_absorption_kg_per_year()
        )
    }

    /// Image shown in the store, before the tree is planted
    pub fn store_photo_url(&self) -> &'static str {
        match self {
            TreeType::Oak => "https://rassadacvetov.com/wp-content/uploads/2024/06/dub-chereshchatyj-kompakta-compacta--scaled.jpg",
            TreeType::Pine => "https://luxgarden.md/wp-content/uploads/2024/08/pin-negru-650-scaled.jpg",
            TreeType::Maple => "https://bahorgullari.uz/image/cache/catalog/%202023/Vibranced%20photos%20new/01000099-700x700.jpg",
            TreeType::Fir => "https://www.pervocvet-shop.ru/img/work/nomencl/27178-m.jpg",
            TreeType::Willow => "https://s.alicdn.com/@sc04/kf/HTB1TI8taHH1gK0jSZFwq6A7aXXaU.jpg",
        }
    }

    /// Image shown on the map once the tree is planted
    pub fn planted_photo_url(&self) -> &'static str {
        match self {
            TreeType::Oak => "https://s0.geograph.org.uk/geophotos/05/39/26/5392672_7c73798e.jpg",
            TreeType::Pine => "https://www.nationalarboretum.act.gov.au/__data/assets/image/0020/1512533/Young-stone-pine-in-Forest-56-2.jpg",
            TreeType::Maple => "https://kostka.by/wp-content/uploads/2024/06/dub-krasnyj.jpg",
            TreeType::Fir => "https://images.prom.ua/2974647960_w600_h600_2974647960.jpg",
            TreeType::Willow => "https://krasnodar.pitomnik-rastenij.ru/image/data/parser3/iva-plakuchaya-pamyati-mindovskogo.jpg",
        }
    }

    /// Build the store offer for this type with its one-time price
    pub fn to_offer(&self, price: f64) -> StoreTree {
        StoreTree {
            price,
            title: self.name().to_string(),
            description: self.description(),
            photo_url: self.store_photo_url().to_string(),
            tree_type: self.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_roundtrips_all_types() {
        for tree_type in TreeType::ALL {
            assert_eq!(TreeType::from_name(tree_type.name()), Some(tree_type));
        }
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(TreeType::from_name("BAOBAB"), None);
        assert_eq!(TreeType::from_name("oak"), None);
    }

    #[test]
    fn catalog_has_five_distinct_names() {
        let mut names: Vec<&str> = TreeType::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
    }
}
