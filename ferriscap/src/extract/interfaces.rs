//! Interface and layer-2 extractors.
//!
//! Interface-centric commands all enrich the same registry record, so a
//! port seen in `display interface brief`, `display ip interface brief` and
//! the configuration ends up as one entry.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::fields::{
    Header, assign, builtin_regex, cell_at, columns, find_header, is_ipv4, is_mac, is_separator,
    labeled, looks_like_interface, split_prefix, table_rows, to_float, to_int, tokens,
};
use crate::capture::Chunk;
use crate::error::ExtractError;
use crate::model::{
    ArpEntry, ETrunk, LagMember, LldpNeighbor, MacEntry, Model, Vlan, VrrpGroup, Vrf,
};

static IF_STATE: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(r"(?i)^(?P<name>[A-Za-z][\w./:-]*\d[\w./:-]*)\s+current\s+state\s*:\s*(?P<state>.+?)\s*$")
});
static LINE_PROTOCOL: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?im)^\s*Line\s+protocol\s+current\s+state\s*:\s*(.+?)\s*$"));
static INTERNET_ADDRESS: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)Internet\s+Address\s+is\s+(\S+)"));
static MTU: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)Maximum\s+Transmit\s+Unit\s*(?:is|:)\s*(\d+)"));
static HARDWARE_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(r"(?i)Hardware\s+address\s+is\s+([0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4})")
});
static TRUNK_TITLE: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)^\s*(Eth-Trunk\d+)'s\s+state\s+information\s+is"));
static LLDP_PORT: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)^\s*(\S+)\s+has\s+(\d+)\s+neighbor"));
static VRRP_BLOCK: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)^\s*(\S+)\s*\|\s*Virtual\s+Router\s+(\d+)"));

const MAC_ENTRY_TYPES: &[&str] = &[
    "dynamic", "static", "sticky", "blackhole", "security", "authen", "mux", "snooping",
];

/// Interface state text with parentheticals dropped: `UP (ifindex: 3)` → `up`.
fn state_text(raw: &str) -> String {
    raw.split('(').next().unwrap_or(raw).trim().to_lowercase()
}

/// Group lines into blocks that start where `start` returns a title.
fn blocks<'a, F>(lines: impl Iterator<Item = &'a str>, mut start: F) -> Vec<(String, String)>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out: Vec<(String, String)> = Vec::new();
    for line in lines {
        if let Some(title) = start(line) {
            out.push((title, format!("{line}\n")));
        } else if let Some((_, text)) = out.last_mut() {
            text.push_str(line);
            text.push('\n');
        }
    }
    out
}

// ============================================================================
// Interface views
// ============================================================================

/// `display interface brief`
///
/// Indented rows under an Eth-Trunk are its members.
pub fn extract_interface_brief(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["interface", "phy", "protocol"]).ok_or(
        ExtractError::MissingHeader {
            expected: "Interface PHY Protocol",
        },
    )?;

    let mut trunk: Option<String> = None;
    for line in &lines[h + 1..] {
        let Some(toks) = tokens(line, 3) else {
            continue;
        };
        let name = toks[0];
        if !looks_like_interface(name) {
            continue;
        }

        let member = line.starts_with(char::is_whitespace);
        if !member {
            trunk = name
                .to_lowercase()
                .starts_with("eth-trunk")
                .then(|| name.to_string());
        }

        let record = model.interface(name);
        record.status = Some(toks[1].to_string());
        record.protocol = Some(toks[2].to_string());
        assign(&mut record.in_utilization, toks.get(3).and_then(|v| to_float(v)));
        assign(&mut record.out_utilization, toks.get(4).and_then(|v| to_float(v)));
        if toks[1].starts_with('*') {
            record.shutdown = Some(true);
        }

        if let (true, Some(trunk)) = (member, trunk.as_ref()) {
            record.eth_trunk = Some(trunk.clone());
            add_lag_member(model, trunk, name, None, None);
        }
    }
    Ok(())
}

/// `display ip interface brief`
pub fn extract_ip_interface_brief(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["interface", "ip address", "physical"]).ok_or(
        ExtractError::MissingHeader {
            expected: "Interface IP Address/Mask Physical",
        },
    )?;

    for row in table_rows(&lines, h, 4) {
        let name = row[0];
        if !looks_like_interface(name) {
            continue;
        }

        let vrf = cell_at(&row, Some(4));
        let record = model.interface(name);
        if row[1].contains('/') {
            let (ip, mask) = split_prefix(row[1]);
            record.ip_address = Some(ip);
            assign(&mut record.mask, mask);
        }
        record.status = Some(row[2].to_string());
        record.protocol = Some(row[3].to_string());

        if let Some(vrf) = vrf {
            record.vrf = Some(vrf.clone());
            Vrf::merge_into(&mut model.protocols.vrf(&vrf).interfaces, [name.to_string()]);
        }
    }
    Ok(())
}

/// `display interface [NAME]` and `display ip interface [NAME]`
///
/// One block per `<name> current state :` line.
pub fn extract_interface_detail(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let blocks = blocks(chunk.lines(), |line| {
        IF_STATE.captures(line).map(|caps| caps["name"].to_string())
    });
    if blocks.is_empty() {
        return Err(ExtractError::Malformed {
            message: "no '<interface> current state' lines".to_string(),
        });
    }

    for (name, text) in blocks {
        let state = text
            .lines()
            .next()
            .and_then(|line| IF_STATE.captures(line))
            .map(|caps| state_text(&caps["state"]));
        let protocol = LINE_PROTOCOL.captures(&text).map(|caps| state_text(&caps[1]));

        let record = model.interface(&name);
        if let Some(state) = state {
            if state.contains("administratively") {
                record.shutdown = Some(true);
            }
            record.status = Some(state);
        }
        assign(&mut record.protocol, protocol);
        assign(&mut record.description, labeled(&text, &["Description"]));

        if let Some(caps) = INTERNET_ADDRESS.captures(&text) {
            let (ip, mask) = split_prefix(&caps[1]);
            record.ip_address = Some(ip);
            assign(&mut record.mask, mask);
        }
        assign(&mut record.mtu, MTU.captures(&text).and_then(|c| to_int(&c[1])));
        assign(
            &mut record.mac_address,
            HARDWARE_ADDRESS.captures(&text).map(|c| c[1].to_lowercase()),
        );
        assign(&mut record.speed, labeled(&text, &["Speed"]));
        assign(
            &mut record.duplex,
            labeled(&text, &["Duplex"]).map(|d| d.to_lowercase()),
        );
        assign(&mut record.bandwidth, labeled(&text, &["Current BW", "Port BW"]));
        assign(
            &mut record.in_utilization,
            labeled(&text, &["Input bandwidth utilization"]).and_then(|v| to_float(&v)),
        );
        assign(
            &mut record.out_utilization,
            labeled(&text, &["Output bandwidth utilization"]).and_then(|v| to_float(&v)),
        );
    }
    Ok(())
}

// ============================================================================
// Address tables
// ============================================================================

/// `display arp [all]`
pub fn extract_arp(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    for line in chunk.lines() {
        let Some(toks) = tokens(line, 4) else {
            continue;
        };
        if !is_ipv4(toks[0]) {
            continue;
        }

        let mut rest = toks[2..].iter().copied().peekable();
        let expire_minutes = match rest.peek() {
            Some(t) if t.chars().all(|c| c.is_ascii_digit()) => rest.next().and_then(to_int),
            _ => None,
        };
        let entry_type = rest.next().map(str::to_string);
        if rest.peek() == Some(&"-") {
            rest.next();
        }

        model.protocols.arp_table.push(ArpEntry {
            ip: toks[0].to_string(),
            mac: toks[1].to_lowercase(),
            expire_minutes,
            entry_type,
            interface: rest.next().map(str::to_string),
            vrf: rest.next().map(str::to_string),
        });
    }
    Ok(())
}

/// `display mac-address`
pub fn extract_mac_table(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    for line in chunk.lines() {
        let Some(toks) = tokens(line, 3) else {
            continue;
        };
        if !is_mac(toks[0]) {
            continue;
        }

        let vlan = toks[1].split('/').next().unwrap_or(toks[1]).to_string();
        let interface = toks[2..]
            .iter()
            .find(|t| looks_like_interface(t))
            .map(|t| t.to_string());
        let entry_type = toks[2..]
            .iter()
            .find(|t| MAC_ENTRY_TYPES.contains(&t.to_lowercase().as_str()))
            .map(|t| t.to_string());

        model.protocols.mac_table.push(MacEntry {
            mac: toks[0].to_lowercase(),
            vlan: Some(vlan).filter(|v| v != "-"),
            interface,
            entry_type,
        });
    }
    Ok(())
}

/// Port name with tag prefix and state suffix removed: `UT:GE0/0/1(U)` → `GE0/0/1`.
fn vlan_port(raw: &str) -> String {
    let name = raw.split_once(':').map_or(raw, |(_, rest)| rest);
    name.split('(').next().unwrap_or(name).to_string()
}

/// `display vlan`: the port table and the status/description table.
pub fn extract_vlans(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    #[derive(PartialEq)]
    enum Table {
        None,
        Ports,
        Status,
    }

    let mut table = Table::None;
    let mut vlans: IndexMap<i64, Vlan> = IndexMap::new();
    let mut current: Option<i64> = None;

    for line in chunk.lines() {
        let lower = line.to_lowercase();
        if lower.contains("vid") && lower.contains("ports") {
            table = Table::Ports;
            continue;
        }
        if lower.contains("vid") && lower.contains("status") {
            table = Table::Status;
            continue;
        }
        if line.trim().is_empty() || is_separator(line) {
            continue;
        }

        let starts_with_id = line.starts_with(|c: char| c.is_ascii_digit());
        match table {
            Table::Ports if starts_with_id => {
                let Some(toks) = tokens(line, 2) else {
                    continue;
                };
                let Some(id) = to_int(toks[0]) else {
                    continue;
                };
                let vlan = vlans.entry(id).or_insert_with(|| Vlan {
                    id,
                    ..Default::default()
                });
                vlan.vlan_type = Some(toks[1].to_string());
                vlan.ports.extend(toks[2..].iter().map(|p| vlan_port(p)));
                current = Some(id);
            }
            Table::Ports if line.starts_with(char::is_whitespace) => {
                if let Some(vlan) = current.and_then(|id| vlans.get_mut(&id)) {
                    vlan.ports.extend(line.split_whitespace().map(vlan_port));
                }
            }
            Table::Status if starts_with_id => {
                let Some(cols) = columns(line, 2) else {
                    continue;
                };
                let Some(id) = to_int(cols[0]) else {
                    continue;
                };
                let vlan = vlans.entry(id).or_insert_with(|| Vlan {
                    id,
                    ..Default::default()
                });
                vlan.status = Some(cols[1].to_string());
                if cols.len() > 5 {
                    vlan.description = Some(cols[5..].join(" "));
                }
            }
            _ => current = None,
        }
    }

    if table == Table::None {
        return Err(ExtractError::MissingHeader {
            expected: "VID Type Ports",
        });
    }

    for (id, vlan) in vlans {
        match model.protocols.vlans.iter_mut().find(|v| v.id == id) {
            Some(existing) => {
                assign(&mut existing.vlan_type, vlan.vlan_type);
                assign(&mut existing.status, vlan.status);
                assign(&mut existing.description, vlan.description);
                Vrf::merge_into(&mut existing.ports, vlan.ports);
            }
            None => model.protocols.vlans.push(vlan),
        }
    }
    Ok(())
}

// ============================================================================
// Aggregation & redundancy
// ============================================================================

pub(crate) fn add_lag_member(
    model: &mut Model,
    trunk: &str,
    port: &str,
    status: Option<String>,
    weight: Option<i64>,
) {
    let lag = model.protocols.lag(trunk);
    match lag.members.iter_mut().find(|m| m.port.eq_ignore_ascii_case(port)) {
        Some(member) => {
            assign(&mut member.status, status);
            assign(&mut member.weight, weight);
        }
        None => lag.members.push(LagMember {
            port: port.to_string(),
            status,
            weight,
        }),
    }
}

/// `display eth-trunk [N]`: mode, status and local member ports.
pub fn extract_eth_trunk(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let blocks = blocks(chunk.lines(), |line| {
        TRUNK_TITLE.captures(line).map(|caps| caps[1].to_string())
    });
    if blocks.is_empty() {
        return Err(ExtractError::Malformed {
            message: "no Eth-Trunk state blocks".to_string(),
        });
    }

    for (name, text) in blocks {
        let lag = model.protocols.lag(&name);
        assign(&mut lag.mode, labeled(&text, &["WorkingMode", "Working Mode"]));
        assign(&mut lag.operate_status, labeled(&text, &["Operate status"]));

        let mut in_members = false;
        for line in text.lines() {
            let lower = line.to_lowercase();
            if lower.contains("partner") {
                break;
            }
            if lower.contains("portname") {
                in_members = true;
                continue;
            }
            if !in_members {
                continue;
            }
            let Some(toks) = tokens(line, 2) else {
                continue;
            };
            if !looks_like_interface(toks[0]) {
                continue;
            }

            let weight = toks.last().and_then(|w| to_int(w));
            add_lag_member(model, &name, toks[0], Some(toks[1].to_string()), weight);
            model.interface(toks[0]).eth_trunk = Some(name.clone());
        }
        model.interface(&name);
    }
    Ok(())
}

/// `display e-trunk [N]`
pub fn extract_etrunk(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let blocks = blocks(chunk.lines(), |line| {
        line.to_uppercase().contains("E-TRUNK-ID").then(String::new)
    });

    for (_, text) in blocks {
        let Some(id) = labeled(&text, &["E-TRUNK-ID"]).filter(|v| !v.is_empty()) else {
            continue;
        };
        model.protocols.etrunks.push(ETrunk {
            id,
            state: labeled(&text, &["State"]),
            priority: labeled(&text, &["Priority"]).and_then(|v| to_int(&v)),
            peer_ip: labeled(&text, &["Peer-IP", "Peer IP"]),
            source_ip: labeled(&text, &["Source-IP", "Source IP"]),
        });
    }
    Ok(())
}

/// `display lldp neighbor [brief]`
pub fn extract_lldp(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lower = chunk.body.to_lowercase();
    if lower.contains("lldp is not enabled") || lower.contains("lldp is disabled") {
        model.protocols.lldp.enabled = Some(false);
        return Ok(());
    }

    let lines: Vec<&str> = chunk.lines().collect();
    let header = find_header(&lines, &["local intf", "neighbor"])
        .or_else(|| find_header(&lines, &["local interface", "neighbor"]));

    let mut neighbors = Vec::new();
    if let Some(h) = header {
        for line in &lines[h + 1..] {
            if is_separator(line) {
                continue;
            }
            let Some(cols) = columns(line, 3) else {
                continue;
            };
            neighbors.push(LldpNeighbor {
                local_interface: cols[0].to_string(),
                neighbor_device: Some(cols[1].to_string()),
                neighbor_interface: Some(cols[2].to_string()),
                expires_seconds: cols.get(3).and_then(|v| to_int(v)),
            });
        }
    } else {
        let ports = blocks(chunk.lines(), |line| {
            LLDP_PORT.captures(line).map(|caps| caps[1].to_string())
        });
        for (local, text) in ports {
            let entries = blocks(text.lines(), |line| {
                line.trim_start()
                    .to_lowercase()
                    .starts_with("neighbor index")
                    .then(String::new)
            });
            for (_, entry) in entries {
                neighbors.push(LldpNeighbor {
                    local_interface: local.clone(),
                    neighbor_device: labeled(&entry, &["System name"]),
                    neighbor_interface: labeled(&entry, &["Port ID"]),
                    expires_seconds: labeled(&entry, &["Expired time"]).and_then(|v| to_int(&v)),
                });
            }
        }
    }

    if header.is_some() || !neighbors.is_empty() {
        model.protocols.lldp.enabled = Some(true);
    }
    model.protocols.lldp.neighbors.extend(neighbors);
    Ok(())
}

/// `display vrrp [brief]`
pub fn extract_vrrp(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let mut groups = Vec::new();

    if let Some(h) = find_header(&lines, &["vrid", "state", "interface"]) {
        let header = Header::parse(lines[h]);
        let vrid = header.index(&["vrid"]);
        let state = header.index(&["state"]);
        let interface = header.index(&["interface"]);
        let virtual_ip = header.index(&["virtual"]);

        for row in table_rows(&lines, h, 3) {
            let Some(id) = cell_at(&row, vrid).filter(|v| v.chars().all(|c| c.is_ascii_digit()))
            else {
                continue;
            };
            groups.push(VrrpGroup {
                vrid: id,
                interface: cell_at(&row, interface),
                state: cell_at(&row, state),
                virtual_ip: cell_at(&row, virtual_ip),
            });
        }
    } else {
        let vrrp_blocks = blocks(chunk.lines(), |line| {
            VRRP_BLOCK
                .captures(line)
                .map(|caps| format!("{}|{}", &caps[1], &caps[2]))
        });
        for (title, text) in vrrp_blocks {
            let (interface, vrid) = title.split_once('|').unwrap_or((title.as_str(), ""));
            groups.push(VrrpGroup {
                vrid: vrid.to_string(),
                interface: Some(interface.to_string()),
                state: labeled(&text, &["State"]),
                virtual_ip: labeled(&text, &["Virtual IP"]),
            });
        }
    }

    if !groups.is_empty() {
        model.protocols.vrrp.enabled = Some(true);
    }
    model.protocols.vrrp.groups.extend(groups);
    Ok(())
}
