//! Interface registry: one record per case-insensitive interface name.

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// One network interface, enriched incrementally by several commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub status: Option<String>,
    pub protocol: Option<String>,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub mask: Option<String>,
    pub vrf: Option<String>,
    pub bandwidth: Option<String>,
    pub speed: Option<String>,
    pub duplex: Option<String>,
    pub mtu: Option<i64>,
    pub mac_address: Option<String>,
    pub in_utilization: Option<f64>,
    pub out_utilization: Option<f64>,
    pub eth_trunk: Option<String>,
    pub shutdown: Option<bool>,
}

impl Interface {
    /// Create a record holding only the name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Get-or-create map from normalized interface name to its record.
///
/// Owned by one [`Model`](super::Model), so every parse starts empty.
/// Serializes as a plain array of records in first-sighting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceRegistry {
    records: IndexMap<String, Interface>,
}

/// Registry key for an interface name.
pub fn interface_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl InterfaceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record for `name`, creating it on first sighting.
    pub fn get_or_create(&mut self, name: &str) -> &mut Interface {
        let name = name.trim();
        self.records
            .entry(interface_key(name))
            .or_insert_with(|| Interface::new(name))
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Option<&Interface> {
        self.records.get(&interface_key(name))
    }

    /// Check if a record exists.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(&interface_key(name))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in first-sighting order.
    pub fn iter(&self) -> impl Iterator<Item = &Interface> {
        self.records.values()
    }

    /// Rebuild from a list, keeping the first record per name.
    pub fn from_records(records: Vec<Interface>) -> Self {
        let mut registry = Self::new();
        for record in records {
            registry
                .records
                .entry(interface_key(&record.name))
                .or_insert(record);
        }
        registry
    }

    /// Take all records out in order.
    pub fn into_records(self) -> Vec<Interface> {
        self.records.into_values().collect()
    }
}

impl Serialize for InterfaceRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.values())
    }
}

impl<'de> Deserialize<'de> for InterfaceRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<Interface>::deserialize(deserializer)?;
        Ok(Self::from_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_case_insensitive() {
        let mut registry = InterfaceRegistry::new();
        registry.get_or_create("GigabitEthernet0/0/1").status = Some("up".into());
        registry.get_or_create("gigabitethernet0/0/1").description = Some("WAN".into());

        assert_eq!(registry.len(), 1);
        let iface = registry.get("GIGABITETHERNET0/0/1").unwrap();
        assert_eq!(iface.name, "GigabitEthernet0/0/1");
        assert_eq!(iface.status.as_deref(), Some("up"));
        assert_eq!(iface.description.as_deref(), Some("WAN"));
    }

    #[test]
    fn test_serializes_as_array() {
        let mut registry = InterfaceRegistry::new();
        registry.get_or_create("Eth-Trunk1");
        registry.get_or_create("LoopBack0");

        let json = serde_json::to_value(&registry).unwrap();
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Eth-Trunk1", "LoopBack0"]);
        assert!(json[0]["status"].is_null());
    }

    #[test]
    fn test_from_records_keeps_first() {
        let mut first = Interface::new("Vlanif10");
        first.mtu = Some(1500);
        let mut second = Interface::new("VLANIF10");
        second.mtu = Some(9000);

        let registry = InterfaceRegistry::from_records(vec![first, second]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("vlanif10").unwrap().mtu, Some(1500));
    }
}
