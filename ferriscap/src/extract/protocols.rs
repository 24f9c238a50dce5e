//! Routing-protocol and overlay extractors.

use once_cell::sync::Lazy;
use regex::Regex;

use super::fields::{
    assign, builtin_regex, columns, find_header, first_capture, is_ipv4, is_separator, labeled,
    table_rows, to_int, tokens,
};
use crate::capture::Chunk;
use crate::error::ExtractError;
use crate::model::{BfdSession, BgpPeer, IsisPeer, IsisProcess, Model, OspfNeighbor, Vrf, VxlanVni};

static OSPF_PROCESS: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)OSPF\s+Process\s+(\d+)"));
static OSPF_AREA: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(r"(?i)^\s*Area\s+(\S+)\s+interface\s+\S+?\((\S+?)\)'s\s+neighbors")
});
static OSPF_ROUTER: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)^\s*Router\s+ID\s*:\s*(\d+\.\d+\.\d+\.\d+)"));
static OSPF_STATE: Lazy<Regex> = Lazy::new(|| builtin_regex(r"(?i)^\s*State\s*:\s*(\S+)"));

static ISIS_PROCESS: Lazy<Regex> = Lazy::new(|| builtin_regex(r"(?i)ISIS\s*\(\s*(\d+)\s*\)"));

static BGP_ROW: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(
        r"^\s*(\S+)\s+(\d)\s+(\S+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\S+)\s+(\S+)\s+(\d+)\s*$",
    )
});
static BGP_VRF: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(r"(?i)^\s*VPN-Instance\s+([^,\s]+)\s*,\s*Router\s+ID\s+(\d+\.\d+\.\d+\.\d+)")
});

static INSTANCE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(r"(?i)^\s*E?VPN-Instance\s+Name\s+and\s+ID\s*:\s*([^,\s]+)")
});
static ADDRESS_FAMILY: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?im)^\s*Address\s+family\s+(\S+)"));
static ROUTE_DISTINGUISHER: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"^(?:\d+|\d+\.\d+\.\d+\.\d+):\d+$"));

static LSR_ID: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?i)\bLSR[\s-]*ID\b[^\n\d]*(\d+\.\d+\.\d+\.\d+)"));
static SRGB_RANGE: Lazy<Regex> = Lazy::new(|| {
    builtin_regex(r"(?i)(?:srgb|global[\s-]*block)[^\n]*?(\d{3,})\s*(?:-|~|to)\s*(\d{3,})")
});

/// Lowercased address family without the `-family` suffix.
pub(crate) fn family_name(raw: &str) -> String {
    raw.trim()
        .trim_end_matches("-family")
        .to_lowercase()
}

fn disabled(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("not enabled") || lower.contains("not configured")
}

// ============================================================================
// IGP & BFD
// ============================================================================

/// `display bfd session all`
pub fn extract_bfd_sessions(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let mut found = false;
    for line in chunk.lines() {
        let Some(toks) = tokens(line, 5) else {
            continue;
        };
        let (Some(local), Some(remote)) = (
            toks[0].parse::<i64>().ok(),
            toks[1].parse::<i64>().ok(),
        ) else {
            continue;
        };

        found = true;
        model.protocols.bfd.sessions.push(BfdSession {
            local_discriminator: Some(local),
            remote_discriminator: Some(remote),
            peer_ip: Some(toks[2].to_string()),
            state: Some(toks[3].to_string()),
            session_type: Some(toks[4].to_string()),
            interface: toks.get(5).filter(|i| **i != "-").map(|i| i.to_string()),
        });
    }
    if found {
        model.protocols.bfd.enabled = Some(true);
    }
    Ok(())
}

/// `display ospf [N] peer [brief]`
pub fn extract_ospf_peers(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let mut process: Option<String> = None;
    let mut area: Option<String> = None;
    let mut interface: Option<String> = None;
    let mut detailed: Option<OspfNeighbor> = None;

    for line in chunk.lines() {
        if let Some(caps) = OSPF_PROCESS.captures(line) {
            process = Some(caps[1].to_string());
            continue;
        }
        if let Some(caps) = OSPF_AREA.captures(line) {
            area = Some(caps[1].to_string());
            interface = Some(caps[2].to_string());
            continue;
        }
        if let Some(caps) = OSPF_ROUTER.captures(line) {
            model.protocols.ospf_neighbors.extend(detailed.take());
            detailed = Some(OspfNeighbor {
                process: process.clone(),
                area: area.clone(),
                interface: interface.clone(),
                neighbor_id: caps[1].to_string(),
                state: None,
            });
            continue;
        }
        if let Some(caps) = OSPF_STATE.captures(line) {
            if let Some(neighbor) = detailed.as_mut() {
                neighbor.state = Some(caps[1].to_string());
            }
            continue;
        }

        // Brief row: area, interface, neighbor ID, state
        let Some(toks) = tokens(line, 4) else {
            continue;
        };
        if is_ipv4(toks[0]) && is_ipv4(toks[2]) {
            model.protocols.ospf_neighbors.push(OspfNeighbor {
                process: process.clone(),
                area: Some(toks[0].to_string()),
                interface: Some(toks[1].to_string()),
                neighbor_id: toks[2].to_string(),
                state: Some(toks[3].to_string()),
            });
        }
    }
    model.protocols.ospf_neighbors.extend(detailed);
    Ok(())
}

/// `display isis [N] peer`
pub fn extract_isis_peers(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    if find_header(&lines, &["system id", "interface"]).is_none() {
        return Err(ExtractError::MissingHeader {
            expected: "System Id Interface",
        });
    }

    let mut process: Option<String> = None;
    let mut in_table = false;
    for line in &lines {
        if let Some(caps) = ISIS_PROCESS.captures(line) {
            let id = caps[1].to_string();
            if !model
                .protocols
                .isis_processes
                .iter()
                .any(|p| p.process_id == id)
            {
                model.protocols.isis_processes.push(IsisProcess {
                    process_id: id.clone(),
                    ..Default::default()
                });
            }
            process = Some(id);
            in_table = false;
            continue;
        }
        let lower = line.to_lowercase();
        if lower.contains("system id") && lower.contains("interface") {
            in_table = true;
            continue;
        }
        if !in_table || is_separator(line) {
            continue;
        }
        let Some(toks) = tokens(line, 6) else {
            continue;
        };
        model.protocols.isis_peers.push(IsisPeer {
            process_id: process.clone(),
            system_id: toks[0].to_string(),
            interface: Some(toks[1].to_string()),
            state: Some(toks[3].to_string()),
            level: Some(toks[5].to_string()),
        });
    }
    Ok(())
}

// ============================================================================
// BGP
// ============================================================================

/// Which peer list a BGP summary table feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeerTable {
    Ipv4,
    Vpnv4,
    Evpn,
}

fn extract_bgp_table(chunk: &Chunk, model: &mut Model, table: PeerTable) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let mut vrf: Option<String> = None;
    let mut peers = Vec::new();

    for line in chunk.lines() {
        if let Some(caps) = BGP_VRF.captures(line) {
            vrf = Some(caps[1].to_string());
            model
                .identity
                .vrf_router_ids
                .insert(caps[1].to_string(), caps[2].to_string());
            continue;
        }
        let Some(caps) = BGP_ROW.captures(line) else {
            continue;
        };
        let peer = &caps[1];
        if !is_ipv4(peer) && !peer.contains(':') {
            continue;
        }
        peers.push(BgpPeer {
            peer: peer.to_string(),
            vrf: vrf.clone(),
            version: to_int(&caps[2]),
            remote_as: Some(caps[3].to_string()),
            msg_received: to_int(&caps[4]),
            msg_sent: to_int(&caps[5]),
            out_queue: to_int(&caps[6]),
            up_down: Some(caps[7].to_string()),
            state: Some(caps[8].to_string()),
            prefixes_received: to_int(&caps[9]),
        });
    }

    let local_as = labeled(body, &["Local AS number"]);
    let router_id = labeled(body, &["BGP local router ID"]);
    if peers.is_empty() && local_as.is_none() && router_id.is_none() {
        return Err(ExtractError::MissingHeader {
            expected: "Peer V AS MsgRcvd MsgSent",
        });
    }

    let bgp = &mut model.protocols.bgp;
    assign(&mut bgp.local_as, local_as);
    assign(&mut bgp.router_id, router_id);
    let target = match table {
        PeerTable::Ipv4 => &mut bgp.peers,
        PeerTable::Vpnv4 => &mut bgp.vpnv4_peers,
        PeerTable::Evpn => &mut bgp.evpn_peers,
    };
    target.extend(peers);
    Ok(())
}

/// `display bgp peer`
pub fn extract_bgp_peers(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    extract_bgp_table(chunk, model, PeerTable::Ipv4)
}

/// `display bgp vpnv4 all peer`: public VPNv4 peers plus per-VRF sections.
pub fn extract_bgp_vpnv4_peers(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    extract_bgp_table(chunk, model, PeerTable::Vpnv4)
}

/// `display bgp evpn peer`
pub fn extract_bgp_evpn_peers(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    extract_bgp_table(chunk, model, PeerTable::Evpn)
}

// ============================================================================
// VPN instances & overlays
// ============================================================================

fn targets(text: &str, labels: &[&str]) -> Vec<String> {
    labeled(text, labels)
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Split text into per-instance blocks keyed by instance name.
fn instance_blocks(chunk: &Chunk) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for line in chunk.lines() {
        if let Some(caps) = INSTANCE_BLOCK.captures(line) {
            out.push((caps[1].to_string(), String::new()));
        } else if let Some((_, text)) = out.last_mut() {
            text.push_str(line);
            text.push('\n');
        }
    }
    out
}

/// `display ip vpn-instance [verbose]`
pub fn extract_vrfs(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let verbose = instance_blocks(chunk);
    if !verbose.is_empty() {
        for (name, text) in verbose {
            let interfaces: Vec<String> = labeled(&text, &["Interfaces"])
                .map(|v| {
                    v.split(',')
                        .map(|i| i.trim().to_string())
                        .filter(|i| !i.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            let families: Vec<String> = ADDRESS_FAMILY
                .captures_iter(&text)
                .map(|caps| family_name(&caps[1]))
                .collect();

            let vrf = model.protocols.vrf(&name);
            assign(
                &mut vrf.rd,
                labeled(&text, &["Route Distinguisher"]).filter(|v| !v.is_empty()),
            );
            Vrf::merge_into(&mut vrf.address_families, families);
            Vrf::merge_into(&mut vrf.export_targets, targets(&text, &["Export VPN Targets"]));
            Vrf::merge_into(&mut vrf.import_targets, targets(&text, &["Import VPN Targets"]));
            Vrf::merge_into(&mut vrf.interfaces, interfaces.iter().cloned());

            for interface in interfaces {
                model.interface(&interface).vrf = Some(name.clone());
            }
        }
        return Ok(());
    }

    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["vpn-instance name", "rd"]).ok_or(
        ExtractError::MissingHeader {
            expected: "VPN-Instance Name RD",
        },
    )?;
    for line in &lines[h + 1..] {
        if is_separator(line) {
            continue;
        }
        let Some(cols) = columns(line, 1) else {
            continue;
        };
        let rd = cols[1..]
            .iter()
            .find(|c| ROUTE_DISTINGUISHER.is_match(c))
            .map(|c| c.to_string());
        let families: Vec<String> = cols[1..]
            .iter()
            .filter(|c| c.to_lowercase().contains("ipv"))
            .flat_map(|c| c.split('&'))
            .map(family_name)
            .collect();

        let vrf = model.protocols.vrf(cols[0]);
        assign(&mut vrf.rd, rd);
        Vrf::merge_into(&mut vrf.address_families, families);
    }
    Ok(())
}

/// `display evpn vpn-instance [verbose]`
pub fn extract_evpn_instances(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let verbose = instance_blocks(chunk);
    if !verbose.is_empty() {
        for (name, text) in verbose {
            let instance = model.protocols.evpn_instance(&name);
            assign(
                &mut instance.rd,
                labeled(&text, &["Route Distinguisher"]).filter(|v| !v.is_empty()),
            );
            Vrf::merge_into(
                &mut instance.export_targets,
                targets(&text, &["Export VPN Targets"]),
            );
            Vrf::merge_into(
                &mut instance.import_targets,
                targets(&text, &["Import VPN Targets"]),
            );
        }
        return Ok(());
    }

    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["name", "rd"]).ok_or(ExtractError::MissingHeader {
        expected: "EVPN-Instance Name RD",
    })?;
    for line in &lines[h + 1..] {
        if is_separator(line) {
            continue;
        }
        let Some(cols) = columns(line, 2) else {
            continue;
        };
        let rd = cols[1..]
            .iter()
            .find(|c| ROUTE_DISTINGUISHER.is_match(c))
            .map(|c| c.to_string());
        let instance = model.protocols.evpn_instance(cols[0]);
        assign(&mut instance.rd, rd);
    }
    Ok(())
}

/// `display vxlan vni`
pub fn extract_vxlan_vnis(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["vni"]).ok_or(ExtractError::MissingHeader { expected: "VNI" })?;

    for row in table_rows(&lines, h, 2) {
        let Some(vni) = row[0].parse::<i64>().ok() else {
            continue;
        };
        let bridge_domain = Some(row[1].to_string()).filter(|bd| bd != "--" && bd != "-");
        let state = row.get(2).map(|s| s.to_string());
        match model.protocols.vxlan_vnis.iter_mut().find(|v| v.vni == vni) {
            Some(existing) => {
                assign(&mut existing.bridge_domain, bridge_domain);
                assign(&mut existing.state, state);
            }
            None => model.protocols.vxlan_vnis.push(VxlanVni {
                vni,
                bridge_domain,
                state,
            }),
        }
    }
    Ok(())
}

// ============================================================================
// MPLS & segment routing
// ============================================================================

/// `display segment-routing ...`: enablement and global block.
pub fn extract_segment_routing(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let mpls = &mut model.protocols.mpls;
    if disabled(body) {
        mpls.sr_enabled = Some(false);
        return Ok(());
    }
    mpls.sr_enabled = Some(true);

    if let Some(caps) = SRGB_RANGE.captures(body) {
        mpls.srgb = Some(format!("{}-{}", &caps[1], &caps[2]));
        return Ok(());
    }

    let lines: Vec<&str> = chunk.lines().collect();
    if let Some(h) = find_header(&lines, &["base", "size"]) {
        let range = table_rows(&lines, h, 2).into_iter().find_map(|row| {
            let base = row[0].parse::<i64>().ok()?;
            let size = row[1].parse::<i64>().ok()?;
            Some(format!("{}-{}", base, base + size - 1))
        });
        assign(&mut mpls.srgb, range);
    }
    Ok(())
}

/// `display mpls ...`: LSR ID and which MPLS features are running.
pub fn extract_mpls(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let body = chunk.body.as_str();
    let words: Vec<String> = chunk
        .label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    let enabled = !disabled(body);
    let mpls = &mut model.protocols.mpls;

    if words.iter().any(|w| w == "ldp") {
        mpls.ldp_enabled = Some(enabled);
    } else if words.iter().any(|w| w == "te") {
        mpls.te_enabled = Some(enabled);
    } else {
        mpls.mpls_enabled = Some(enabled);
    }
    if enabled && mpls.mpls_enabled.is_none() {
        mpls.mpls_enabled = Some(true);
    }

    assign(
        &mut mpls.lsr_id,
        labeled(body, &["LSR ID", "LSR-ID", "Lsr Id"])
            .filter(|v| is_ipv4(v))
            .or_else(|| first_capture(body, &[&*LSR_ID])),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        extract: fn(&Chunk, &mut Model) -> Result<(), ExtractError>,
        label: &str,
        body: &str,
    ) -> Model {
        let mut model = Model::new();
        extract(&Chunk::from_parts(label, body), &mut model).unwrap();
        model
    }

    // ========================================================================
    // IGP & BFD
    // ========================================================================

    #[test]
    fn test_bfd_sessions() {
        let body = "\
--------------------------------------------------------------------------------
Local Remote     PeerIpAddr      State     Type        InterfaceName
--------------------------------------------------------------------------------
8192  8193       10.1.1.2        Up        S_IP_IF     GigabitEthernet0/0/1
16385 16386      2.2.2.2         Up        S_IP_PEER   -
--------------------------------------------------------------------------------
     Total UP/DOWN Session Number : 2/0
";
        let model = run(extract_bfd_sessions, "display bfd session all", body);
        let bfd = &model.protocols.bfd;
        assert_eq!(bfd.enabled, Some(true));
        assert_eq!(bfd.sessions.len(), 2);
        assert_eq!(bfd.sessions[0].local_discriminator, Some(8192));
        assert_eq!(bfd.sessions[0].interface.as_deref(), Some("GigabitEthernet0/0/1"));
        assert_eq!(bfd.sessions[1].interface, None);
    }

    #[test]
    fn test_ospf_brief() {
        let body = "\
          OSPF Process 1 with Router ID 1.1.1.1
                  Peer Statistic Information
 ----------------------------------------------------------------------------
 Area Id          Interface                        Neighbor id      State
 0.0.0.0          GigabitEthernet0/0/1             2.2.2.2          Full
 0.0.0.1          GigabitEthernet0/0/2             3.3.3.3          Init
";
        let model = run(extract_ospf_peers, "display ospf peer brief", body);
        let peers = &model.protocols.ospf_neighbors;
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].process.as_deref(), Some("1"));
        assert_eq!(peers[0].neighbor_id, "2.2.2.2");
        assert_eq!(peers[0].state.as_deref(), Some("Full"));
        assert_eq!(peers[1].area.as_deref(), Some("0.0.0.1"));
    }

    #[test]
    fn test_ospf_verbose() {
        let body = "\
  OSPF Process 1 with Router ID 1.1.1.1
    Neighbors
  Area 0.0.0.0 interface 10.1.1.1(GigabitEthernet0/0/1)'s neighbors
  Router ID: 2.2.2.2          Address: 10.1.1.2
    State: Full  Mode:Nbr is  Master  Priority: 1
";
        let model = run(extract_ospf_peers, "display ospf peer", body);
        let peer = &model.protocols.ospf_neighbors[0];
        assert_eq!(peer.neighbor_id, "2.2.2.2");
        assert_eq!(peer.interface.as_deref(), Some("GigabitEthernet0/0/1"));
        assert_eq!(peer.area.as_deref(), Some("0.0.0.0"));
        assert_eq!(peer.state.as_deref(), Some("Full"));
    }

    #[test]
    fn test_isis_peers() {
        let body = "\
                          Peer information for ISIS(1)
  System Id     Interface          Circuit Id        State HoldTime Type     PRI
--------------------------------------------------------------------------------
0000.0000.0002  GE0/0/1            0000.0000.0002.01  Up   8s       L2       64
PE3             GE0/0/2            0000000001         Up   25s      L2       --
";
        let model = run(extract_isis_peers, "display isis peer", body);
        let peers = &model.protocols.isis_peers;
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].process_id.as_deref(), Some("1"));
        assert_eq!(peers[0].system_id, "0000.0000.0002");
        assert_eq!(peers[1].state.as_deref(), Some("Up"));
        assert_eq!(peers[1].level.as_deref(), Some("L2"));
        assert_eq!(model.protocols.isis_processes[0].process_id, "1");
    }

    // ========================================================================
    // BGP
    // ========================================================================

    #[test]
    fn test_bgp_peers() {
        let body = "\
 BGP local router ID : 1.1.1.1
 Local AS number : 65000
 Total number of peers : 2                 Peers in established state : 1

  Peer            V          AS  MsgRcvd  MsgSent  OutQ  Up/Down       State  PrefRcv
  10.0.0.2        4       65001      100      110     0 01:02:03  Established       10
  10.0.0.3        4       65001        0        0     0 00:00:10       Idle        0
";
        let model = run(extract_bgp_peers, "display bgp peer", body);
        let bgp = &model.protocols.bgp;
        assert_eq!(bgp.local_as.as_deref(), Some("65000"));
        assert_eq!(bgp.router_id.as_deref(), Some("1.1.1.1"));
        assert_eq!(bgp.peers.len(), 2);
        assert_eq!(bgp.peers[0].remote_as.as_deref(), Some("65001"));
        assert_eq!(bgp.peers[0].up_down.as_deref(), Some("01:02:03"));
        assert_eq!(bgp.peers[0].prefixes_received, Some(10));
        assert_eq!(bgp.peers[1].state.as_deref(), Some("Idle"));
        assert!(bgp.vpnv4_peers.is_empty());
    }

    #[test]
    fn test_bgp_vpnv4_vrf_sections() {
        let body = "\
 BGP local router ID : 1.1.1.1
 Local AS number : 65000

  Peer            V          AS  MsgRcvd  MsgSent  OutQ  Up/Down       State  PrefRcv
  3.3.3.3         4       65000      200      210     0 1d02h  Established      100

  Peer of IPv4-family for vpn instance :

 VPN-Instance vrf1, Router ID 1.1.1.1:
  Peer            V          AS  MsgRcvd  MsgSent  OutQ  Up/Down       State  PrefRcv
  192.168.1.2     4       65100       50       55     0 01:00:00  Established        5
";
        let model = run(extract_bgp_vpnv4_peers, "display bgp vpnv4 all peer", body);
        let peers = &model.protocols.bgp.vpnv4_peers;
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].vrf, None);
        assert_eq!(peers[1].vrf.as_deref(), Some("vrf1"));
        assert_eq!(model.identity.vrf_router_ids["vrf1"], "1.1.1.1");
        assert!(model.protocols.bgp.peers.is_empty());
    }

    // ========================================================================
    // VPN instances & overlays
    // ========================================================================

    #[test]
    fn test_vrfs_verbose() {
        let body = "\
 VPN-Instance Name and ID : vrf1, 1
  Interfaces : GigabitEthernet0/0/2, GigabitEthernet0/0/3
 Address family ipv4
  Create date : 2024/01/01 10:00:00
  Route Distinguisher : 100:1
  Export VPN Targets :  100:1 200:1
  Import VPN Targets :  100:1
  Label Policy : label per instance
";
        let model = run(extract_vrfs, "display ip vpn-instance verbose", body);
        let vrf = &model.protocols.vrfs[0];
        assert_eq!(vrf.name, "vrf1");
        assert_eq!(vrf.rd.as_deref(), Some("100:1"));
        assert_eq!(vrf.address_families, vec!["ipv4"]);
        assert_eq!(vrf.export_targets, vec!["100:1", "200:1"]);
        assert_eq!(vrf.import_targets, vec!["100:1"]);
        assert_eq!(vrf.interfaces.len(), 2);

        let ge = model.interfaces.get("GigabitEthernet0/0/3").unwrap();
        assert_eq!(ge.vrf.as_deref(), Some("vrf1"));
    }

    #[test]
    fn test_vrfs_brief() {
        let body = "\
 Total VPN-Instances configured      : 2

  VPN-Instance Name               RD                    Address-family
  vrf1                            100:1                 IPv4&IPv6
  vrf2                                                  IPv4
";
        let model = run(extract_vrfs, "display ip vpn-instance", body);
        let vrfs = &model.protocols.vrfs;
        assert_eq!(vrfs.len(), 2);
        assert_eq!(vrfs[0].rd.as_deref(), Some("100:1"));
        assert_eq!(vrfs[0].address_families, vec!["ipv4", "ipv6"]);
        assert_eq!(vrfs[1].rd, None);
    }

    #[test]
    fn test_evpn_instances() {
        let body = "\
Number of EVPN Instance: 1
EVPN-Instance Name              RD                    Address-family
evpn1                           100:10                evpn
";
        let model = run(extract_evpn_instances, "display evpn vpn-instance", body);
        let evpn = &model.protocols.evpn_instances[0];
        assert_eq!(evpn.name, "evpn1");
        assert_eq!(evpn.rd.as_deref(), Some("100:10"));
    }

    #[test]
    fn test_vxlan_vnis() {
        let body = "\
Number of vxlan vni : 1
VNI            BD-ID            State
---------------------------------------
10010          10               up
";
        let model = run(extract_vxlan_vnis, "display vxlan vni", body);
        let vni = &model.protocols.vxlan_vnis[0];
        assert_eq!(vni.vni, 10010);
        assert_eq!(vni.bridge_domain.as_deref(), Some("10"));
        assert_eq!(vni.state.as_deref(), Some("up"));
    }

    // ========================================================================
    // MPLS & segment routing
    // ========================================================================

    #[test]
    fn test_mpls_ldp() {
        let body = "\
                         LDP Instance Information
 ------------------------------------------------------------------------------
 Instance ID        : 0                    VPN-Instance      :
 Instance Status    : Active               LSR ID            : 1.1.1.1
";
        let model = run(extract_mpls, "display mpls ldp", body);
        let mpls = &model.protocols.mpls;
        assert_eq!(mpls.ldp_enabled, Some(true));
        assert_eq!(mpls.mpls_enabled, Some(true));
        assert_eq!(mpls.lsr_id.as_deref(), Some("1.1.1.1"));
    }

    #[test]
    fn test_mpls_not_enabled() {
        let model = run(
            extract_mpls,
            "display mpls ldp",
            "Error: LDP is not enabled globally.\n",
        );
        assert_eq!(model.protocols.mpls.ldp_enabled, Some(false));
        assert_eq!(model.protocols.mpls.mpls_enabled, None);
    }

    #[test]
    fn test_segment_routing_table() {
        let body = "\
Segment Routing Global Block Information:
Base       Size       Status
16000      8000       Active
";
        let model = run(
            extract_segment_routing,
            "display segment-routing global-block",
            body,
        );
        let mpls = &model.protocols.mpls;
        assert_eq!(mpls.sr_enabled, Some(true));
        assert_eq!(mpls.srgb.as_deref(), Some("16000-23999"));
    }
}
