//! Agro-shop models and point-of-interest filtering

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Substrings marking a shop as agriculture related (name or shop tag)
pub const INCLUSION_KEYWORDS: [&str; 6] = ["agro", "farm", "agr", "hort", "garden", "agriculture"];

/// Substrings that disqualify a shop by name
pub const EXCLUSION_KEYWORDS: [&str; 4] = ["clothes", "apparel", "fashion", "footwear"];

/// A nearby agriculture-relevant shop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shop {
    pub name: String,
    pub category: String,
    pub address: String,
}

/// A shop that passed the filters but may still need its address resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ShopCandidate {
    pub name: String,
    pub category: String,
    /// `None` when the tags carry no usable address
    pub address: Option<String>,
}

impl ShopCandidate {
    /// Filter a POI by its tags.
    ///
    /// Returns `None` for unnamed POIs, names hitting an exclusion keyword, and
    /// POIs where neither name nor `shop` tag hits an inclusion keyword.
    pub fn from_tags(tags: &HashMap<String, String>) -> Option<Self> {
        let name = tag(tags, "name");
        let category = tag(tags, "shop");

        if !is_agri_shop(name, category) {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            category: category.to_string(),
            address: assemble_address(tags),
        })
    }
}

/// Keyword filter applied to a shop's name and `shop` tag.
///
/// Matching is case-insensitive substring containment.
pub fn is_agri_shop(name: &str, shop_tag: &str) -> bool {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return false;
    }
    if EXCLUSION_KEYWORDS.iter().any(|k| name.contains(k)) {
        return false;
    }

    let shop_tag = shop_tag.trim().to_lowercase();
    INCLUSION_KEYWORDS
        .iter()
        .any(|k| name.contains(k) || shop_tag.contains(k))
}

/// Address from tags: `addr:full`, else the non-empty parts of
/// house number, street and city joined with ", ".
pub fn assemble_address(tags: &HashMap<String, String>) -> Option<String> {
    let full = tag(tags, "addr:full");
    if !full.is_empty() {
        return Some(full.to_string());
    }

    let parts: Vec<&str> = ["addr:housenumber", "addr:street", "addr:city"]
        .iter()
        .map(|key| tag(tags, key))
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn tag<'a>(tags: &'a HashMap<String, String>, key: &str) -> &'a str {
    tags.get(key).map(|v| v.trim()).unwrap_or("")
}
