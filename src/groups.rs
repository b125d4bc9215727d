//! Commodity group classification.
//!
//! Two ways to assign columns to the ten groups:
//!
//! - `classify`: positional ranges over the commodity columns (the layout of the
//!   source sheet), guarded so the range sizes must add up to the column count
//! - `GroupSchema::resolve`: a declared list of (group, commodity) names checked
//!   against the actual columns, which is what the pipeline uses
//!
//! Either way, the result partitions the commodity set: every commodity lands in
//! exactly one group.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::domain::CommodityGroup;
use crate::error::AppError;

/// Column counts per group, in `CommodityGroup::ALL` order.
pub const DEFAULT_GROUP_SIZES: [usize; 10] = [10, 7, 11, 7, 10, 5, 3, 4, 7, 3];

const BUILTIN_SCHEMA: [(CommodityGroup, &[&str]); 10] = [
    (
        CommodityGroup::Energy,
        &[
            "Crude oil, average",
            "Crude oil, Brent",
            "Crude oil, Dubai",
            "Crude oil, WTI",
            "Coal, Australian",
            "Coal, South African",
            "Natural gas, US",
            "Natural gas, Europe",
            "Liquefied natural gas, Japan",
            "Natural gas index",
        ],
    ),
    (
        CommodityGroup::Beverages,
        &[
            "Cocoa",
            "Coffee, Arabica",
            "Coffee, Robusta",
            "Tea, avg 3 auctions",
            "Tea, Colombo",
            "Tea, Kolkata",
            "Tea, Mombasa",
        ],
    ),
    (
        CommodityGroup::OilsAndMeals,
        &[
            "Coconut oil",
            "Groundnuts",
            "Fish meal",
            "Groundnut oil",
            "Palm oil",
            "Palm kernel oil",
            "Soybeans",
            "Soybean oil",
            "Soybean meal",
            "Rapeseed oil",
            "Sunflower oil",
        ],
    ),
    (
        CommodityGroup::Grains,
        &[
            "Maize",
            "Rice, Thai 5%",
            "Rice, Thai 25%",
            "Rice, Thai A1",
            "Rice, Viet Namese 5%",
            "Wheat, US SRW",
            "Wheat, US HRW",
        ],
    ),
    (
        CommodityGroup::OtherFood,
        &[
            "Banana, Europe",
            "Banana, US",
            "Orange",
            "Beef",
            "Chicken",
            "Lamb",
            "Sugar, EU",
            "Sugar, US",
            "Sugar, world",
            "Tobacco, US import uv",
        ],
    ),
    (
        CommodityGroup::Timber,
        &[
            "Logs, Cameroon",
            "Logs, Malaysian",
            "Sawnwood, Cameroon",
            "Sawnwood, Malaysian",
            "Plywood",
        ],
    ),
    (CommodityGroup::OtherRawMaterials, &["Cotton, A Index", "Rubber, TSR20", "Rubber, RSS3"]),
    (CommodityGroup::Fertilizers, &["DAP", "TSP", "Urea", "Potassium chloride"]),
    (
        CommodityGroup::MetalsAndMinerals,
        &["Aluminum", "Iron ore, cfr spot", "Copper", "Lead", "Tin", "Nickel", "Zinc"],
    ),
    (CommodityGroup::PreciousMetals, &["Gold", "Platinum", "Silver"]),
];

/// Group → ordered member commodities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommodityGroups {
    groups: Vec<(CommodityGroup, Vec<String>)>,
}

impl CommodityGroups {
    pub fn members(&self, group: CommodityGroup) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, members)| members.as_slice())
    }

    pub fn group_of(&self, commodity: &str) -> Option<CommodityGroup> {
        self.groups
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == commodity))
            .map(|(g, _)| *g)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CommodityGroup, &[String])> {
        self.groups.iter().map(|(g, members)| (*g, members.as_slice()))
    }

    pub fn commodity_count(&self) -> usize {
        self.groups.iter().map(|(_, m)| m.len()).sum()
    }
}

/// Split `column_names` into consecutive ranges, one per `(group, size)` entry.
///
/// Fails when the sizes do not add up to the number of columns; a mismatch
/// means the input layout changed and any split would misgroup commodities.
pub fn classify<S: AsRef<str>>(
    column_names: &[S],
    layout: &[(CommodityGroup, usize)],
) -> Result<CommodityGroups, AppError> {
    let expected: usize = layout.iter().map(|(_, n)| n).sum();
    if expected != column_names.len() {
        return Err(AppError::input(format!(
            "Group layout covers {expected} columns but the table has {} commodity columns.",
            column_names.len()
        )));
    }

    let mut groups = Vec::with_capacity(layout.len());
    let mut start = 0;
    for &(group, size) in layout {
        let members = column_names[start..start + size]
            .iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        groups.push((group, members));
        start += size;
    }
    Ok(CommodityGroups { groups })
}

/// The default positional layout: `CommodityGroup::ALL` with `DEFAULT_GROUP_SIZES`.
pub fn default_layout() -> Vec<(CommodityGroup, usize)> {
    CommodityGroup::ALL.into_iter().zip(DEFAULT_GROUP_SIZES).collect()
}

#[derive(Debug, Deserialize)]
struct SchemaEntry {
    group: CommodityGroup,
    commodities: Vec<String>,
}

/// Declared (group, commodity) assignment validated against the input columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSchema {
    groups: Vec<(CommodityGroup, Vec<String>)>,
}

impl GroupSchema {
    /// The schema of the World Bank monthly sheet after the default column drops.
    pub fn builtin() -> Self {
        Self {
            groups: BUILTIN_SCHEMA
                .iter()
                .map(|(g, names)| (*g, names.iter().map(|s| s.to_string()).collect()))
                .collect(),
        }
    }

    pub fn new(groups: Vec<(CommodityGroup, Vec<String>)>) -> Result<Self, AppError> {
        let mut seen_groups = BTreeSet::new();
        let mut owner: HashMap<&str, CommodityGroup> = HashMap::new();
        for (group, members) in &groups {
            if !seen_groups.insert(*group) {
                return Err(AppError::input(format!("Group '{group}' is declared more than once.")));
            }
            for name in members {
                if let Some(prev) = owner.insert(name.as_str(), *group) {
                    return Err(AppError::input(format!(
                        "Commodity '{name}' is assigned to both '{prev}' and '{group}'."
                    )));
                }
            }
        }
        Ok(Self { groups })
    }

    /// Load a schema from JSON: `[{"group": "Energy", "commodities": ["..."]}, ...]`.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::input(format!("Failed to open group schema '{}': {e}", path.display()))
        })?;
        let entries: Vec<SchemaEntry> = serde_json::from_reader(file).map_err(|e| {
            AppError::input(format!("Invalid group schema '{}': {e}", path.display()))
        })?;
        Self::new(entries.into_iter().map(|e| (e.group, e.commodities)).collect())
    }

    pub fn commodity_count(&self) -> usize {
        self.groups.iter().map(|(_, m)| m.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CommodityGroup, &[String])> {
        self.groups.iter().map(|(g, members)| (*g, members.as_slice()))
    }

    /// Check the schema against the table's commodity columns and produce the groups.
    ///
    /// Any column the schema does not declare, or any declared commodity the
    /// table lacks, is an error naming every offending column.
    pub fn resolve<S: AsRef<str>>(&self, columns: &[S]) -> Result<CommodityGroups, AppError> {
        let actual: BTreeSet<&str> = columns.iter().map(|c| c.as_ref()).collect();
        let declared: BTreeSet<&str> = self
            .groups
            .iter()
            .flat_map(|(_, members)| members.iter().map(String::as_str))
            .collect();

        let missing: Vec<&str> = declared.difference(&actual).copied().collect();
        let unexpected: Vec<&str> = actual.difference(&declared).copied().collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            let mut msg = String::from("Input columns do not match the commodity group schema.");
            if !missing.is_empty() {
                msg.push_str(&format!("\n  missing: {}", missing.join("; ")));
            }
            if !unexpected.is_empty() {
                msg.push_str(&format!("\n  unexpected: {}", unexpected.join("; ")));
            }
            return Err(AppError::input(msg));
        }

        Ok(CommodityGroups {
            groups: self.groups.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_columns() -> Vec<String> {
        BUILTIN_SCHEMA
            .iter()
            .flat_map(|(_, names)| names.iter().map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn builtin_schema_matches_default_sizes() {
        for ((group, names), size) in BUILTIN_SCHEMA.iter().zip(DEFAULT_GROUP_SIZES) {
            assert_eq!(names.len(), size, "size of {group}");
        }
        assert_eq!(GroupSchema::builtin().commodity_count(), 67);
    }

    #[test]
    fn groups_partition_the_commodity_set() {
        let columns = builtin_columns();
        let groups = GroupSchema::builtin().resolve(&columns).unwrap();

        let mut union: Vec<&str> = groups
            .iter()
            .flat_map(|(_, m)| m.iter().map(String::as_str))
            .collect();
        assert_eq!(union.len(), columns.len());
        union.sort_unstable();
        union.dedup();
        assert_eq!(union.len(), columns.len());

        for c in &columns {
            let owners = groups.iter().filter(|(_, m)| m.contains(c)).count();
            assert_eq!(owners, 1, "{c}");
        }
        assert_eq!(groups.group_of("Plywood"), Some(CommodityGroup::Timber));
    }

    #[test]
    fn positional_classification_matches_declared_schema() {
        let columns = builtin_columns();
        let by_position = classify(&columns, &default_layout()).unwrap();
        let by_name = GroupSchema::builtin().resolve(&columns).unwrap();
        assert_eq!(by_position, by_name);
    }

    #[test]
    fn positional_classification_guards_column_count() {
        let mut columns = builtin_columns();
        columns.pop();
        let err = classify(&columns, &default_layout()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn resolve_reports_missing_and_unexpected_columns() {
        let mut columns = builtin_columns();
        columns.retain(|c| c != "Gold");
        columns.push("Barley".to_string());
        let err = GroupSchema::builtin().resolve(&columns).unwrap_err();
        assert!(err.message().contains("missing: Gold"));
        assert!(err.message().contains("unexpected: Barley"));
    }

    #[test]
    fn schema_rejects_double_assignment() {
        let err = GroupSchema::new(vec![
            (CommodityGroup::Energy, vec!["Coal".to_string()]),
            (CommodityGroup::Timber, vec!["Coal".to_string()]),
        ])
        .unwrap_err();
        assert!(err.message().contains("Coal"));
    }

    #[test]
    fn schema_loads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(
            &path,
            r#"[{"group": "Precious Metals", "commodities": ["Gold", "Silver"]},
                {"group": "Oils and Meals", "commodities": ["Palm oil"]}]"#,
        )
        .unwrap();

        let schema = GroupSchema::from_json_file(&path).unwrap();
        let groups = schema.resolve(&["Silver", "Palm oil", "Gold"]).unwrap();
        assert_eq!(
            groups.members(CommodityGroup::PreciousMetals).unwrap(),
            ["Gold".to_string(), "Silver".to_string()]
        );
        assert_eq!(groups.group_of("Palm oil"), Some(CommodityGroup::OilsAndMeals));
    }
}
