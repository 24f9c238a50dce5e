//! Structured device record built from one capture.
//!
//! Every type here serializes to JSON for downstream consumers. Fields that
//! were not found in the capture are `None` (`null`); values that the device
//! printed as empty stay `Some("")`.

mod diagnostics;
mod interfaces;

pub use diagnostics::{Diagnostics, RawSection};
pub use interfaces::{Interface, InterfaceRegistry, interface_key};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Aggregate root: one per parsed capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub identity: Identity,
    pub software: Software,
    pub ntp: NtpState,
    pub resources: Resources,
    pub hardware: Hardware,
    pub interfaces: InterfaceRegistry,
    pub protocols: Protocols,
    pub routing: Routing,
    pub licenses: Vec<License>,
    pub alarms: Vec<Alarm>,
    pub alarm_settings: Vec<AlarmSetting>,
    pub raw_sections: Diagnostics,
}

impl Model {
    /// Create an empty model with a fresh interface registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the interface record for `name`.
    pub fn interface(&mut self, name: &str) -> &mut Interface {
        self.interfaces.get_or_create(name)
    }
}

// ============================================================================
// Identity & software
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub hostname: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub router_id: Option<String>,
    pub vrf_router_ids: IndexMap<String, String>,
    pub timezone: Option<String>,
    pub current_time: Option<String>,
    pub patch: Option<String>,
    pub saved_config: Option<String>,
    pub ssh_users: Vec<SshUser>,
    pub base_mac: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SshUser {
    pub name: String,
    pub authentication_type: Option<String>,
    pub service_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Software {
    pub version: Option<String>,
    pub release: Option<String>,
    pub uptime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NtpState {
    pub sync_state: Option<String>,
    pub stratum: Option<i64>,
    pub reference: Option<String>,
    pub servers: Vec<NtpServer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NtpServer {
    pub address: String,
    pub vrf: Option<String>,
}

// ============================================================================
// Resources: append-only sample lists
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub cpu: Vec<CpuSample>,
    pub memory: Vec<MemorySample>,
    pub disk: Vec<DiskSample>,
    pub power: Vec<PowerSample>,
    pub temperature: Vec<TemperatureSample>,
    pub fans: Vec<FanSample>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuSample {
    pub slot: Option<String>,
    pub usage_percent: Option<i64>,
    pub max_percent: Option<i64>,
    pub five_seconds: Option<i64>,
    pub one_minute: Option<i64>,
    pub five_minutes: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    pub slot: Option<String>,
    pub total_kb: Option<i64>,
    pub used_kb: Option<i64>,
    pub free_kb: Option<i64>,
    pub usage_percent: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskSample {
    pub device: Option<String>,
    pub total_kb: Option<i64>,
    pub free_kb: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerSample {
    pub id: String,
    pub present: Option<String>,
    pub mode: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub slot: String,
    pub sensor: Option<String>,
    pub status: Option<String>,
    pub current_celsius: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FanSample {
    pub slot: String,
    pub present: Option<String>,
    pub status: Option<String>,
    pub speed: Option<String>,
}

// ============================================================================
// Hardware inventory
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    pub cards: Vec<Card>,
    pub pics: Vec<Pic>,
    pub elabels: Vec<Elabel>,
    pub sfps: Vec<Sfp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub slot: String,
    pub card_type: Option<String>,
    pub online: Option<String>,
    pub register: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pic {
    pub slot: String,
    pub status: Option<String>,
    pub pic_type: Option<String>,
    pub port_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Elabel {
    pub slot: String,
    pub board_type: Option<String>,
    pub bar_code: Option<String>,
    pub item: Option<String>,
    pub description: Option<String>,
    pub manufactured: Option<String>,
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sfp {
    pub interface: String,
    pub transceiver_type: Option<String>,
    pub vendor: Option<String>,
    pub serial: Option<String>,
    pub wavelength_nm: Option<i64>,
    pub distance: Option<String>,
    pub rx_power_dbm: Option<f64>,
    pub tx_power_dbm: Option<f64>,
}

// ============================================================================
// Protocols
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Protocols {
    pub mac_table: Vec<MacEntry>,
    pub arp_table: Vec<ArpEntry>,
    pub vlans: Vec<Vlan>,
    pub lags: Vec<Lag>,
    pub etrunks: Vec<ETrunk>,
    pub lldp: LldpState,
    pub vrrp: VrrpState,
    pub bfd: BfdState,
    pub ospf_neighbors: Vec<OspfNeighbor>,
    pub isis_processes: Vec<IsisProcess>,
    pub isis_peers: Vec<IsisPeer>,
    pub bgp: BgpState,
    pub vrfs: Vec<Vrf>,
    pub mpls: MplsState,
    pub evpn_instances: Vec<EvpnInstance>,
    pub vxlan_vnis: Vec<VxlanVni>,
}

impl Protocols {
    /// Get or create the VRF named `name`, merging sightings by name.
    pub fn vrf(&mut self, name: &str) -> &mut Vrf {
        let idx = match self.vrfs.iter().position(|v| v.name == name) {
            Some(idx) => idx,
            None => {
                self.vrfs.push(Vrf {
                    name: name.to_string(),
                    ..Default::default()
                });
                self.vrfs.len() - 1
            }
        };
        &mut self.vrfs[idx]
    }

    /// Get or create the link aggregation group named `name`.
    pub fn lag(&mut self, name: &str) -> &mut Lag {
        let key = interface_key(name);
        let idx = match self.lags.iter().position(|l| interface_key(&l.name) == key) {
            Some(idx) => idx,
            None => {
                self.lags.push(Lag {
                    name: name.to_string(),
                    ..Default::default()
                });
                self.lags.len() - 1
            }
        };
        &mut self.lags[idx]
    }

    /// Get or create the EVPN instance named `name`.
    pub fn evpn_instance(&mut self, name: &str) -> &mut EvpnInstance {
        let idx = match self.evpn_instances.iter().position(|e| e.name == name) {
            Some(idx) => idx,
            None => {
                self.evpn_instances.push(EvpnInstance {
                    name: name.to_string(),
                    ..Default::default()
                });
                self.evpn_instances.len() - 1
            }
        };
        &mut self.evpn_instances[idx]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacEntry {
    pub mac: String,
    pub vlan: Option<String>,
    pub interface: Option<String>,
    pub entry_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArpEntry {
    pub ip: String,
    pub mac: String,
    pub expire_minutes: Option<i64>,
    pub entry_type: Option<String>,
    pub interface: Option<String>,
    pub vrf: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: i64,
    pub vlan_type: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub ports: Vec<String>,
}

/// Eth-Trunk link aggregation group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lag {
    pub name: String,
    pub mode: Option<String>,
    pub operate_status: Option<String>,
    pub members: Vec<LagMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LagMember {
    pub port: String,
    pub status: Option<String>,
    pub weight: Option<i64>,
}

/// Inter-chassis E-Trunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ETrunk {
    pub id: String,
    pub state: Option<String>,
    pub priority: Option<i64>,
    pub peer_ip: Option<String>,
    pub source_ip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LldpState {
    pub enabled: Option<bool>,
    pub neighbors: Vec<LldpNeighbor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LldpNeighbor {
    pub local_interface: String,
    pub neighbor_device: Option<String>,
    pub neighbor_interface: Option<String>,
    pub expires_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VrrpState {
    pub enabled: Option<bool>,
    pub groups: Vec<VrrpGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VrrpGroup {
    pub vrid: String,
    pub interface: Option<String>,
    pub state: Option<String>,
    pub virtual_ip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BfdState {
    pub enabled: Option<bool>,
    pub sessions: Vec<BfdSession>,
    pub configs: Vec<BfdConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BfdSession {
    pub local_discriminator: Option<i64>,
    pub remote_discriminator: Option<i64>,
    pub peer_ip: Option<String>,
    pub state: Option<String>,
    pub session_type: Option<String>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BfdConfig {
    pub name: String,
    pub peer_ip: Option<String>,
    pub vrf: Option<String>,
    pub interface: Option<String>,
    pub local_discriminator: Option<i64>,
    pub remote_discriminator: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OspfNeighbor {
    pub process: Option<String>,
    pub area: Option<String>,
    pub interface: Option<String>,
    pub neighbor_id: String,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsisProcess {
    pub process_id: String,
    pub vrf: Option<String>,
    pub network_entity: Option<String>,
    pub is_level: Option<String>,
    pub cost_style: Option<String>,
    pub segment_routing: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsisPeer {
    pub process_id: Option<String>,
    pub system_id: String,
    pub interface: Option<String>,
    pub state: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BgpState {
    pub local_as: Option<String>,
    pub router_id: Option<String>,
    pub peers: Vec<BgpPeer>,
    pub vpnv4_peers: Vec<BgpPeer>,
    pub evpn_peers: Vec<BgpPeer>,
    pub configured_peers: Vec<BgpConfiguredPeer>,
}

/// A row of a BGP peer summary table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BgpPeer {
    pub peer: String,
    pub vrf: Option<String>,
    pub version: Option<i64>,
    pub remote_as: Option<String>,
    pub msg_received: Option<i64>,
    pub msg_sent: Option<i64>,
    pub out_queue: Option<i64>,
    pub up_down: Option<String>,
    pub state: Option<String>,
    pub prefixes_received: Option<i64>,
}

/// A peer declared in the BGP configuration stanza.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BgpConfiguredPeer {
    pub peer: String,
    pub vrf: Option<String>,
    pub remote_as: Option<String>,
    pub group: Option<String>,
    pub description: Option<String>,
    pub bfd_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vrf {
    pub name: String,
    pub rd: Option<String>,
    pub address_families: Vec<String>,
    pub import_targets: Vec<String>,
    pub export_targets: Vec<String>,
    pub interfaces: Vec<String>,
}

impl Vrf {
    /// Add items to a list field, skipping ones already present.
    pub fn merge_into(list: &mut Vec<String>, items: impl IntoIterator<Item = String>) {
        for item in items {
            if !list.contains(&item) {
                list.push(item);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MplsState {
    pub lsr_id: Option<String>,
    pub mpls_enabled: Option<bool>,
    pub ldp_enabled: Option<bool>,
    pub te_enabled: Option<bool>,
    pub sr_enabled: Option<bool>,
    pub srgb: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvpnInstance {
    pub name: String,
    pub mode: Option<String>,
    pub rd: Option<String>,
    pub import_targets: Vec<String>,
    pub export_targets: Vec<String>,
    pub bridge_domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VxlanVni {
    pub vni: i64,
    pub bridge_domain: Option<String>,
    pub state: Option<String>,
}

// ============================================================================
// Routing
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Routing {
    pub summaries: Vec<RouteSummary>,
    pub static_routes: Vec<StaticRoute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub vrf: String,
    pub total_prefixes: Option<i64>,
    pub total_routes: Option<i64>,
    pub by_protocol: IndexMap<String, i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticRoute {
    pub vrf: Option<String>,
    pub prefix: String,
    pub mask: Option<String>,
    pub next_hop: Option<String>,
    pub interface: Option<String>,
    pub preference: Option<i64>,
    pub description: Option<String>,
}

// ============================================================================
// Licenses & alarms
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub file: Option<String>,
    pub state: Option<String>,
    pub item: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub sequence: Option<i64>,
    pub alarm_id: Option<String>,
    pub level: Option<String>,
    pub state: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub description: String,
}

/// Per-alarm override from the `alarm` configuration stanza.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmSetting {
    pub name: String,
    pub severity: Option<String>,
    pub masked: bool,
}
