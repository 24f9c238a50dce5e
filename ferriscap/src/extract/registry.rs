//! Ordered command-label → extractor table.

use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};
use regex::Regex;

use super::{config, hardware, interfaces, protocols, routing, system};
use crate::capture::Chunk;
use crate::capture::patterns::command_pattern;
use crate::error::ExtractError;
use crate::model::Model;

/// Signature shared by every extractor.
pub type ExtractFn = fn(&Chunk, &mut Model) -> Result<(), ExtractError>;

/// Built-in rules, evaluated top to bottom. More specific commands must
/// come before the commands they abbreviate or extend.
const BUILTIN_RULES: &[(&str, &str, ExtractFn)] = &[
    (
        "configuration",
        "dis[play] cur[rent-configuration]|sav[ed-configuration]",
        config::extract_configuration,
    ),
    ("version", "dis[play] ver[sion]", system::extract_version),
    ("clock", "dis[play] clo[ck]", system::extract_clock),
    ("cpu", "dis[play] cpu[-usage]", system::extract_cpu),
    ("memory", "dis[play] mem[ory-usage]", system::extract_memory),
    ("disk", "dir", system::extract_disk),
    ("power", "dis[play] pow[er]", system::extract_power),
    ("temperature", "dis[play] temp[erature]", system::extract_temperature),
    ("fan", "dis[play] fan", system::extract_fans),
    ("alarm", "dis[play] ala[rm]", system::extract_alarms),
    ("pic-status", "dis[play] dev[ice] pic[-status]", hardware::extract_pics),
    ("device", "dis[play] dev[ice]", hardware::extract_device),
    ("elabel", "dis[play] ela[bel]", hardware::extract_elabels),
    ("esn", "dis[play] esn", hardware::extract_esn),
    (
        "transceiver",
        "dis[play] int[erface] * tran[sceiver]",
        hardware::extract_transceivers,
    ),
    ("transceiver", "dis[play] tran[sceiver]", hardware::extract_transceivers),
    ("optical-module", "dis[play] opt[ical-module]", hardware::extract_transceivers),
    (
        "interface-brief",
        "dis[play] int[erface] br[ief]",
        interfaces::extract_interface_brief,
    ),
    (
        "ip-interface-brief",
        "dis[play] ip int[erface] br[ief]",
        interfaces::extract_ip_interface_brief,
    ),
    ("ip-interface", "dis[play] ip int[erface]", interfaces::extract_interface_detail),
    ("interface", "dis[play] int[erface]", interfaces::extract_interface_detail),
    ("arp", "dis[play] arp", interfaces::extract_arp),
    ("mac-address", "dis[play] mac-add[ress]", interfaces::extract_mac_table),
    ("vlan", "dis[play] vlan", interfaces::extract_vlans),
    ("eth-trunk", "dis[play] eth-t[runk]", interfaces::extract_eth_trunk),
    ("e-trunk", "dis[play] e-t[runk]", interfaces::extract_etrunk),
    ("lldp", "dis[play] lldp nei[ghbor]", interfaces::extract_lldp),
    ("vrrp", "dis[play] vrrp", interfaces::extract_vrrp),
    ("bfd", "dis[play] bfd ses[sion]", protocols::extract_bfd_sessions),
    ("ospf", "dis[play] ospf * peer", protocols::extract_ospf_peers),
    ("isis", "dis[play] isis * peer", protocols::extract_isis_peers),
    ("bgp-vpnv4", "dis[play] bgp vpnv4 * peer", protocols::extract_bgp_vpnv4_peers),
    ("bgp-evpn", "dis[play] bgp evpn * peer", protocols::extract_bgp_evpn_peers),
    ("bgp", "dis[play] bgp * peer", protocols::extract_bgp_peers),
    ("vpn-instance", "dis[play] ip vpn-inst[ance]", protocols::extract_vrfs),
    ("evpn-instance", "dis[play] evpn vpn-inst[ance]", protocols::extract_evpn_instances),
    ("vxlan", "dis[play] vxlan vni", protocols::extract_vxlan_vnis),
    ("segment-routing", "dis[play] seg[ment-routing]", protocols::extract_segment_routing),
    ("mpls", "dis[play] mpls", protocols::extract_mpls),
    (
        "route-statistics",
        "dis[play] ip rou[ting-table] * stat[istics]",
        routing::extract_route_statistics,
    ),
    (
        "static-routes",
        "dis[play] ip rou[ting-table] prot[ocol] static",
        routing::extract_static_routes,
    ),
    ("license", "dis[play] lic[ense]", system::extract_licenses),
    ("patch", "dis[play] patch[-information]", system::extract_patch),
    ("startup", "dis[play] start[up]", system::extract_startup),
    ("ntp", "dis[play] ntp[-service]", system::extract_ntp),
    ("ssh-users", "dis[play] ssh user[-information]", system::extract_ssh_users),
    ("router-id", "dis[play] router id", system::extract_router_id),
    ("base-mac", "dis[play] bri[dge] mac-add[ress]", system::extract_base_mac),
    ("base-mac", "dis[play] sys[tem-mac]", system::extract_base_mac),
];

/// One `(label pattern, extractor)` pair.
#[derive(Clone)]
pub struct Rule {
    /// Short rule name used in logs.
    pub name: &'static str,

    /// Pattern matched against the chunk's canonical label.
    pub pattern: Regex,

    /// Extractor to run.
    pub extract: ExtractFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Outcome of dispatching one chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// An extractor ran successfully.
    Extracted { rule: &'static str },

    /// An extractor ran and failed; the chunk went to diagnostics.
    Failed {
        rule: &'static str,
        error: ExtractError,
    },

    /// No rule matched; the chunk went to diagnostics.
    Unmatched,
}

/// Ordered list of extraction rules; the first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct ExtractorRegistry {
    rules: Vec<Rule>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a registry holding the built-in rule table.
    pub fn builtin() -> Result<Self, regex::Error> {
        let mut registry = Self::new();
        for &(name, template, extract) in BUILTIN_RULES {
            registry.push(name, template, extract)?;
        }
        Ok(registry)
    }

    /// Append a rule built from a command template such as `dis[play] ver[sion]`.
    pub fn push(
        &mut self,
        name: &'static str,
        template: &str,
        extract: ExtractFn,
    ) -> Result<(), regex::Error> {
        self.rules.push(Rule {
            name,
            pattern: command_pattern(template)?,
            extract,
        });
        Ok(())
    }

    /// Builder-style variant of [`push`](Self::push).
    pub fn with_rule(
        mut self,
        name: &'static str,
        template: &str,
        extract: ExtractFn,
    ) -> Result<Self, regex::Error> {
        self.push(name, template, extract)?;
        Ok(self)
    }

    /// First rule whose pattern matches the label.
    pub fn find(&self, label: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.pattern.is_match(label))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the matching extractor for a chunk.
    ///
    /// Errors and panics are recorded in the model's diagnostics under the
    /// chunk's normalized label; unmatched chunks are stored verbatim.
    pub fn dispatch(&self, chunk: &Chunk, model: &mut Model) -> Dispatch {
        let Some(rule) = self.find(&chunk.label) else {
            debug!("chunk {}: no extractor for '{}'", chunk.index, chunk.label);
            model.raw_sections.record_unmatched(chunk.key(), chunk.raw.as_str());
            return Dispatch::Unmatched;
        };

        debug!(
            "chunk {}: '{}' -> {} extractor",
            chunk.index, chunk.label, rule.name
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (rule.extract)(chunk, model)));
        let error = match outcome {
            Ok(Ok(())) => return Dispatch::Extracted { rule: rule.name },
            Ok(Err(error)) => error,
            Err(payload) => ExtractError::Panicked {
                message: panic_message(payload.as_ref()),
            },
        };

        warn!(
            "chunk {}: {} extractor failed for '{}': {}",
            chunk.index, rule.name, chunk.label, error
        );
        model
            .raw_sections
            .record_failure(chunk.key(), chunk.raw.as_str(), error.to_string());
        Dispatch::Failed {
            rule: rule.name,
            error,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
