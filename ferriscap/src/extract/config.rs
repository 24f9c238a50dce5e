//! Configuration dump extractor.
//!
//! `display current-configuration` output (and bare saved configuration
//! files) is split into top-level stanzas: an unindented head line plus the
//! indented lines below it, closed by a column-0 `#`. Each stanza head is
//! matched against an ordered table of patterns; the first match handles the
//! stanza and unknown stanzas are skipped.

use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::fields::{
    assign, builtin_regex, dotted_mask, first_capture, is_ipv4, looks_like_interface, to_int,
};
use super::interfaces::add_lag_member;
use super::protocols::family_name;
use crate::capture::Chunk;
use crate::error::ExtractError;
use crate::model::{
    AlarmSetting, BfdConfig, BgpConfiguredPeer, ETrunk, IsisProcess, Model, NtpServer, SshUser,
    StaticRoute, Vrf, VrrpGroup, VxlanVni,
};

/// One top-level configuration block.
#[derive(Debug)]
struct Stanza<'a> {
    head: &'a str,
    body: Vec<&'a str>,
}

type StanzaFn = fn(&Captures<'_>, &[&str], &mut Model);

static SOFTWARE_COMMENT: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?im)^!\s*Software\s+Version\s+(\S+)"));
static VPN_INSTANCE: Lazy<Regex> = Lazy::new(|| builtin_regex(r"\bvpn-instance\s+(\S+)"));

/// Stanza heads in match order. `mpls ldp` must precede bare `mpls`.
static STANZAS: Lazy<Vec<(Regex, StanzaFn)>> = Lazy::new(|| {
    let table: [(&str, StanzaFn); 21] = [
        (r"^sysname\s+(\S+)", sysname),
        (r"^clock\s+timezone\s+(\S+)\s+(add|minus)\s+(\S+)", clock_timezone),
        (r"^router\s+id\s+(\S+)", router_id),
        (r"^mpls\s+lsr-id\s+(\S+)", mpls_lsr_id),
        (r"^mpls\s+ldp\s*$", mpls_ldp),
        (r"^mpls\s*$", mpls),
        (r"^segment-routing\s*$", segment_routing),
        (r"^lldp\s+enable", lldp_enable),
        (r"^bfd\s*$", bfd),
        (r"^bfd\s+(\S+)\s+bind\s+peer-ip\s+(\S+)(.*)$", bfd_session),
        (r"^ntp-service\s+unicast-server\s+(?:ipv6\s+)?(\S+).*$", ntp_server),
        (
            r"^ssh\s+user\s+(\S+)(?:\s+(authentication-type|service-type)\s+(\S+))?",
            ssh_user,
        ),
        (r"^ip\s+vpn-instance\s+(\S+)", vpn_instance),
        (r"^evpn\s+vpn-instance\s+(\S+)(?:\s+(bd-mode|vpws))?", evpn_instance),
        (r"^bridge-domain\s+(\d+)", bridge_domain),
        (r"^interface\s+(\S+)", interface),
        (r"^e-trunk\s+(\d+)", etrunk),
        (r"^bgp\s+(\S+)", bgp),
        (r"^isis\s+(\d+)(.*)$", isis),
        (r"^ip\s+route-static\s+(.+)$", static_route),
        (r"^alarm\s*$", alarm),
    ];
    table
        .into_iter()
        .map(|(pattern, apply)| (builtin_regex(pattern), apply))
        .collect()
});

/// `display current-configuration` / `display saved-configuration`
pub fn extract_configuration(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    extract_configuration_text(&chunk.body, model)
}

/// Extract a configuration dump that is not wrapped in a command chunk.
pub fn extract_configuration_text(text: &str, model: &mut Model) -> Result<(), ExtractError> {
    let stanzas = stanzas(text);
    if stanzas.is_empty() {
        return Err(ExtractError::Malformed {
            message: "no configuration stanzas".to_string(),
        });
    }

    assign(
        &mut model.software.release,
        first_capture(text, &[&*SOFTWARE_COMMENT]),
    );

    for stanza in &stanzas {
        for (pattern, apply) in STANZAS.iter() {
            if let Some(caps) = pattern.captures(stanza.head) {
                apply(&caps, &stanza.body, model);
                break;
            }
        }
    }
    Ok(())
}

fn stanzas(text: &str) -> Vec<Stanza<'_>> {
    let mut out = Vec::new();
    let mut current: Option<Stanza<'_>> = None;

    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(|c: char| c.is_whitespace()) {
            if let Some(stanza) = current.as_mut() {
                stanza.body.push(line.trim());
            }
            continue;
        }
        out.extend(current.take());
        if line.starts_with('#') || line.starts_with('!') || line == "return" {
            continue;
        }
        current = Some(Stanza {
            head: line,
            body: Vec::new(),
        });
    }
    out.extend(current);
    out
}

/// Whitespace tokens of a body line.
fn words(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Text after a leading keyword phrase, if the line starts with it.
fn after<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Route targets and their direction from a `vpn-target` line.
fn vpn_targets(rest: &str) -> (Vec<String>, bool, bool) {
    let toks = words(rest);
    let targets = toks
        .iter()
        .filter(|t| t.contains(':'))
        .map(|t| t.to_string())
        .collect();
    let export = toks.iter().any(|t| *t == "export-extcommunity");
    let import = toks.iter().any(|t| *t == "import-extcommunity");
    match (export, import) {
        (false, false) => (targets, true, true),
        _ => (targets, import, export),
    }
}

// ============================================================================
// Identity & single-line statements
// ============================================================================

fn sysname(caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    model.identity.hostname = Some(caps[1].to_string());
}

fn clock_timezone(caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    let sign = if &caps[2] == "add" { '+' } else { '-' };
    let offset: Vec<&str> = caps[3].split(':').take(2).collect();
    model.identity.timezone = Some(format!("{} UTC{sign}{}", &caps[1], offset.join(":")));
}

fn router_id(caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    model.identity.router_id = Some(caps[1].to_string());
}

fn ntp_server(caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    let line = caps.get(0).map_or("", |m| m.as_str());
    model.ntp.servers.push(NtpServer {
        address: caps[1].to_string(),
        vrf: first_capture(line, &[&*VPN_INSTANCE]),
    });
}

fn ssh_user(caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    let name = &caps[1];
    let users = &mut model.identity.ssh_users;
    let idx = match users.iter().position(|u| u.name == name) {
        Some(idx) => idx,
        None => {
            users.push(SshUser {
                name: name.to_string(),
                ..Default::default()
            });
            users.len() - 1
        }
    };
    let value = caps.get(3).map(|m| m.as_str().to_string());
    match caps.get(2).map(|m| m.as_str()) {
        Some("authentication-type") => users[idx].authentication_type = value,
        Some("service-type") => users[idx].service_type = value,
        _ => {}
    }
}

fn lldp_enable(_caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    model.protocols.lldp.enabled = Some(true);
}

/// `alarm-name X severity Y` and `mask alarm-name X`, merged per alarm name.
fn alarm(_caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    for line in body {
        let tokens = words(line);
        let (name, severity, masked) = match tokens.as_slice() {
            ["alarm-name", name, "severity", severity, ..] => (*name, Some(*severity), false),
            ["mask", "alarm-name", name, ..] => (*name, None, true),
            _ => continue,
        };
        let settings = &mut model.alarm_settings;
        let idx = match settings.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                settings.push(AlarmSetting {
                    name: name.to_string(),
                    ..Default::default()
                });
                settings.len() - 1
            }
        };
        if let Some(severity) = severity {
            settings[idx].severity = Some(severity.to_string());
        }
        settings[idx].masked |= masked;
    }
}

// ============================================================================
// MPLS & segment routing
// ============================================================================

fn mpls_lsr_id(caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    model.protocols.mpls.lsr_id = Some(caps[1].to_string());
}

fn mpls(_caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    let mpls = &mut model.protocols.mpls;
    mpls.mpls_enabled = Some(true);
    if body.iter().any(|line| *line == "mpls te") {
        mpls.te_enabled = Some(true);
    }
}

fn mpls_ldp(_caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    model.protocols.mpls.ldp_enabled = Some(true);
}

fn segment_routing(_caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    model.protocols.mpls.sr_enabled = Some(true);
}

// ============================================================================
// BFD
// ============================================================================

fn bfd(_caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    model.protocols.bfd.enabled = Some(true);
}

fn bfd_session(caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    let options = words(&caps[3]);
    let option = |key: &str| {
        options
            .iter()
            .position(|t| *t == key)
            .and_then(|i| options.get(i + 1))
            .map(|v| v.to_string())
    };

    let mut config = BfdConfig {
        name: caps[1].to_string(),
        peer_ip: Some(caps[2].to_string()),
        vrf: option("vpn-instance"),
        interface: option("interface"),
        ..Default::default()
    };
    for line in body {
        if let Some(value) = after(line, "discriminator local") {
            config.local_discriminator = to_int(value);
        } else if let Some(value) = after(line, "discriminator remote") {
            config.remote_discriminator = to_int(value);
        }
    }
    model.protocols.bfd.configs.push(config);
}

// ============================================================================
// VRFs, EVPN & bridge domains
// ============================================================================

fn vpn_instance(caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    let vrf = model.protocols.vrf(&caps[1]);
    for line in body {
        let head = line.split_whitespace().next().unwrap_or_default();
        if head == "ipv4-family" || head == "ipv6-family" {
            Vrf::merge_into(&mut vrf.address_families, [family_name(head)]);
        } else if let Some(rd) = after(line, "route-distinguisher") {
            vrf.rd = Some(rd.to_string());
        } else if let Some(rest) = after(line, "vpn-target") {
            let (targets, import, export) = vpn_targets(rest);
            if import {
                Vrf::merge_into(&mut vrf.import_targets, targets.clone());
            }
            if export {
                Vrf::merge_into(&mut vrf.export_targets, targets);
            }
        }
    }
}

fn evpn_instance(caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    let instance = model.protocols.evpn_instance(&caps[1]);
    assign(
        &mut instance.mode,
        caps.get(2).map(|m| m.as_str().to_string()),
    );
    for line in body {
        if let Some(rd) = after(line, "route-distinguisher") {
            instance.rd = Some(rd.to_string());
        } else if let Some(rest) = after(line, "vpn-target") {
            let (targets, import, export) = vpn_targets(rest);
            if import {
                Vrf::merge_into(&mut instance.import_targets, targets.clone());
            }
            if export {
                Vrf::merge_into(&mut instance.export_targets, targets);
            }
        }
    }
}

fn bridge_domain(caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    let bd = caps[1].to_string();
    for line in body {
        if let Some(vni) = after(line, "vxlan vni").and_then(to_int) {
            let vnis = &mut model.protocols.vxlan_vnis;
            match vnis.iter_mut().find(|v| v.vni == vni) {
                Some(entry) => entry.bridge_domain = Some(bd.clone()),
                None => vnis.push(VxlanVni {
                    vni,
                    bridge_domain: Some(bd.clone()),
                    state: None,
                }),
            }
        } else if let Some(name) = after(line, "evpn binding vpn-instance") {
            let name = name.split_whitespace().next().unwrap_or(name);
            model.protocols.evpn_instance(name).bridge_domain = Some(bd.clone());
        }
    }
}

// ============================================================================
// Interfaces & redundancy
// ============================================================================

fn interface(caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    let name = caps[1].to_string();
    let is_trunk = name.to_lowercase().starts_with("eth-trunk");
    model.interface(&name);

    for line in body {
        let record = model.interface(&name);
        if let Some(text) = after(line, "description") {
            record.description = Some(text.to_string());
        } else if *line == "undo shutdown" {
            record.shutdown = Some(false);
        } else if *line == "shutdown" {
            record.shutdown = Some(true);
        } else if let Some(vrf) = after(line, "ip binding vpn-instance") {
            record.vrf = Some(vrf.to_string());
            Vrf::merge_into(&mut model.protocols.vrf(vrf).interfaces, [name.clone()]);
        } else if let Some(rest) = after(line, "ip address") {
            let toks = words(rest);
            if toks.len() >= 2 && is_ipv4(toks[0]) && !toks.contains(&"sub") {
                record.ip_address = Some(toks[0].to_string());
                record.mask = dotted_mask(toks[1]);
            }
        } else if let Some(mtu) = after(line, "mtu") {
            record.mtu = to_int(mtu);
        } else if let Some(bandwidth) = after(line, "bandwidth") {
            record.bandwidth = Some(bandwidth.to_string());
        } else if let Some(speed) = after(line, "speed") {
            record.speed = Some(speed.to_string());
        } else if let Some(duplex) = after(line, "duplex") {
            record.duplex = Some(duplex.to_string());
        } else if let Some(id) = after(line, "eth-trunk") {
            let trunk = format!("Eth-Trunk{id}");
            record.eth_trunk = Some(trunk.clone());
            add_lag_member(model, &trunk, &name, None, None);
        } else if let Some(mode) = after(line, "mode").filter(|_| is_trunk) {
            model.protocols.lag(&name).mode = Some(mode.to_string());
        } else if let Some(rest) = after(line, "vrrp vrid") {
            let toks = words(rest);
            if let [vrid, "virtual-ip", ip, ..] = toks.as_slice() {
                add_vrrp_group(model, vrid, &name, ip);
            }
        }
    }
}

fn add_vrrp_group(model: &mut Model, vrid: &str, interface: &str, ip: &str) {
    let vrrp = &mut model.protocols.vrrp;
    vrrp.enabled = Some(true);
    let existing = vrrp.groups.iter_mut().find(|g| {
        g.vrid == vrid
            && g
                .interface
                .as_deref()
                .is_some_and(|i| i.eq_ignore_ascii_case(interface))
    });
    match existing {
        Some(group) => group.virtual_ip = Some(ip.to_string()),
        None => vrrp.groups.push(VrrpGroup {
            vrid: vrid.to_string(),
            interface: Some(interface.to_string()),
            state: None,
            virtual_ip: Some(ip.to_string()),
        }),
    }
}

fn etrunk(caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    let id = caps[1].to_string();
    let etrunks = &mut model.protocols.etrunks;
    let idx = match etrunks.iter().position(|e| e.id == id) {
        Some(idx) => idx,
        None => {
            etrunks.push(ETrunk {
                id,
                ..Default::default()
            });
            etrunks.len() - 1
        }
    };
    let record = &mut etrunks[idx];

    for line in body {
        if let Some(priority) = after(line, "priority") {
            record.priority = to_int(priority);
        } else if let Some(rest) = after(line, "peer-address") {
            let toks = words(rest);
            record.peer_ip = toks.first().map(|t| t.to_string());
            if let Some(i) = toks.iter().position(|t| *t == "source-address") {
                record.source_ip = toks.get(i + 1).map(|t| t.to_string());
            }
        }
    }
}

// ============================================================================
// Routing protocols
// ============================================================================

/// BGP stanza.
///
/// A `peer X ...` line opens X's scope; following non-peer lines such as
/// `description` or `bfd enable` apply to X until the next peer line,
/// address-family line or `#` separator. `ipv4-family vpn-instance V`
/// scopes later peers to V.
fn bgp(caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    let bgp = &mut model.protocols.bgp;
    bgp.local_as = Some(caps[1].to_string());

    let mut vrf: Option<String> = None;
    let mut current: Option<usize> = None;

    for line in body {
        let toks = words(line);
        let Some(&head) = toks.first() else {
            continue;
        };

        if head.starts_with('#') || head == "group" {
            current = None;
        } else if head.ends_with("-family") {
            vrf = first_capture(line, &[&*VPN_INSTANCE]);
            current = None;
        } else if head == "router-id" {
            if let Some(id) = toks.get(1) {
                match &vrf {
                    Some(name) => {
                        model
                            .identity
                            .vrf_router_ids
                            .insert(name.clone(), id.to_string());
                    }
                    None => model.protocols.bgp.router_id = Some(id.to_string()),
                }
            }
        } else if head == "peer" && toks.len() >= 3 {
            current = bgp_peer_line(&mut model.protocols.bgp.configured_peers, &toks, &vrf);
        } else if let Some(idx) = current {
            let peer = &mut model.protocols.bgp.configured_peers[idx];
            if let Some(text) = after(line, "description") {
                peer.description = Some(text.to_string());
            } else if *line == "bfd enable" {
                peer.bfd_enabled = true;
            }
        }
    }
}

/// Apply one `peer X <option>` line, returning the peer's index.
fn bgp_peer_line(
    peers: &mut Vec<BgpConfiguredPeer>,
    toks: &[&str],
    vrf: &Option<String>,
) -> Option<usize> {
    let address = toks[1];
    if address.parse::<IpAddr>().is_err() {
        // peer group options
        return None;
    }
    let option = toks[2];
    let found = peers
        .iter()
        .position(|p| p.peer == address && p.vrf == *vrf);
    let idx = match found {
        Some(idx) => idx,
        None if option == "as-number" || option == "group" => {
            peers.push(BgpConfiguredPeer {
                peer: address.to_string(),
                vrf: vrf.clone(),
                ..Default::default()
            });
            peers.len() - 1
        }
        None => return None,
    };

    let peer = &mut peers[idx];
    let value = toks.get(3).map(|v| v.to_string());
    match option {
        "as-number" => peer.remote_as = value,
        "group" => peer.group = value,
        "description" => peer.description = Some(toks[3..].join(" ")),
        "bfd" if value.as_deref() == Some("enable") => peer.bfd_enabled = true,
        _ => {}
    }
    Some(idx)
}

fn isis(caps: &Captures<'_>, body: &[&str], model: &mut Model) {
    let mut process = IsisProcess {
        process_id: caps[1].to_string(),
        vrf: first_capture(&caps[2], &[&*VPN_INSTANCE]),
        ..Default::default()
    };

    for line in body {
        if let Some(net) = after(line, "network-entity") {
            process.network_entity = Some(net.to_string());
        } else if let Some(level) = after(line, "is-level") {
            process.is_level = Some(level.to_string());
        } else if let Some(style) = after(line, "cost-style") {
            process.cost_style = Some(style.to_string());
        } else if *line == "segment-routing mpls" {
            process.segment_routing = Some(true);
            model.protocols.mpls.sr_enabled = Some(true);
        } else if let Some(rest) = after(line, "segment-routing global-block") {
            if let [low, high, ..] = words(rest).as_slice() {
                model.protocols.mpls.srgb = Some(format!("{low}-{high}"));
            }
        }
    }
    model.protocols.isis_processes.push(process);
}

/// `ip route-static [vpn-instance V] PREFIX MASK [IFACE] [NEXTHOP] [options]`
fn static_route(caps: &Captures<'_>, _body: &[&str], model: &mut Model) {
    let toks = words(&caps[1]);
    let mut rest = toks.as_slice();

    let mut vrf = None;
    if let ["vpn-instance", name, tail @ ..] = rest {
        vrf = Some(name.to_string());
        rest = tail;
    }
    let [prefix, mask, tail @ ..] = rest else {
        return;
    };
    if !is_ipv4(prefix) {
        return;
    }

    let mut route = StaticRoute {
        vrf,
        prefix: prefix.to_string(),
        mask: dotted_mask(mask),
        ..Default::default()
    };

    let mut i = 0;
    while i < tail.len() {
        match tail[i] {
            "preference" => {
                route.preference = tail.get(i + 1).and_then(|v| to_int(v));
                i += 2;
            }
            "description" => {
                route.description = Some(tail[i + 1..].join(" "));
                break;
            }
            "vpn-instance" | "tag" | "track" | "bfd" | "name" => i += 2,
            tok if is_ipv4(tok) && route.next_hop.is_none() => {
                route.next_hop = Some(tok.to_string());
                i += 1;
            }
            tok if route.interface.is_none()
                && route.next_hop.is_none()
                && looks_like_interface(tok) =>
            {
                route.interface = Some(tok.to_string());
                i += 1;
            }
            _ => i += 1,
        }
    }
    model.routing.static_routes.push(route);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::interfaces::extract_interface_brief;

    fn parse(text: &str) -> Model {
        let mut model = Model::new();
        extract_configuration_text(text, &mut model).unwrap();
        model
    }

    // ========================================================================
    // Stanza splitting
    // ========================================================================

    #[test]
    fn test_stanzas_split_on_column_zero_separator() {
        let text = "\
!Software Version V800R021C10SPC600
#
sysname PE1
#
bgp 100
 peer 1.1.1.1 as-number 100
 #
 ipv4-family unicast
#
return
";
        let stanzas = stanzas(text);
        assert_eq!(stanzas.len(), 2);
        assert_eq!(stanzas[0].head, "sysname PE1");
        assert_eq!(stanzas[1].head, "bgp 100");
        assert_eq!(stanzas[1].body, vec!["peer 1.1.1.1 as-number 100", "#", "ipv4-family unicast"]);
    }

    #[test]
    fn test_empty_text_is_malformed() {
        let mut model = Model::new();
        let err = extract_configuration_text("#\nreturn\n", &mut model).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed { .. }));
    }

    #[test]
    fn test_identity_statements() {
        let model = parse(
            "\
!Software Version V800R021C10SPC600
sysname PE1
clock timezone Beijing add 08:00:00
router id 10.0.0.1
lldp enable
ntp-service unicast-server 10.9.9.9 vpn-instance MGMT source-interface LoopBack0
ntp-service unicast-server 10.9.9.10
ssh user admin
ssh user admin authentication-type password
ssh user admin service-type stelnet
",
        );
        assert_eq!(model.identity.hostname.as_deref(), Some("PE1"));
        assert_eq!(model.identity.timezone.as_deref(), Some("Beijing UTC+08:00"));
        assert_eq!(model.identity.router_id.as_deref(), Some("10.0.0.1"));
        assert_eq!(model.software.release.as_deref(), Some("V800R021C10SPC600"));
        assert_eq!(model.protocols.lldp.enabled, Some(true));

        assert_eq!(model.ntp.servers.len(), 2);
        assert_eq!(model.ntp.servers[0].vrf.as_deref(), Some("MGMT"));
        assert_eq!(model.ntp.servers[1].vrf, None);

        let users = &model.identity.ssh_users;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].authentication_type.as_deref(), Some("password"));
        assert_eq!(users[0].service_type.as_deref(), Some("stelnet"));
    }

    // ========================================================================
    // Interfaces
    // ========================================================================

    #[test]
    fn test_interface_stanzas() {
        let model = parse(
            "\
interface GigabitEthernet0/0/1
 description To-PE2
 undo shutdown
 ip binding vpn-instance vrf1
 ip address 10.1.1.1 255.255.255.252
 ip address 10.2.2.1 24 sub
 mtu 9000
 vrrp vrid 1 virtual-ip 10.1.1.3
#
interface GigabitEthernet0/0/2
 shutdown
 eth-trunk 1
#
interface Eth-Trunk1
 mode lacp-static
#
",
        );
        let ge1 = model.interfaces.get("GigabitEthernet0/0/1").unwrap();
        assert_eq!(ge1.description.as_deref(), Some("To-PE2"));
        assert_eq!(ge1.shutdown, Some(false));
        assert_eq!(ge1.vrf.as_deref(), Some("vrf1"));
        assert_eq!(ge1.ip_address.as_deref(), Some("10.1.1.1"));
        assert_eq!(ge1.mask.as_deref(), Some("255.255.255.252"));
        assert_eq!(ge1.mtu, Some(9000));
        assert_eq!(model.protocols.vrfs[0].interfaces, vec!["GigabitEthernet0/0/1"]);
        assert_eq!(model.protocols.vrrp.groups[0].virtual_ip.as_deref(), Some("10.1.1.3"));

        let ge2 = model.interfaces.get("GigabitEthernet0/0/2").unwrap();
        assert_eq!(ge2.shutdown, Some(true));
        assert_eq!(ge2.eth_trunk.as_deref(), Some("Eth-Trunk1"));

        let lag = &model.protocols.lags[0];
        assert_eq!(lag.name, "Eth-Trunk1");
        assert_eq!(lag.mode.as_deref(), Some("lacp-static"));
        assert_eq!(lag.members[0].port, "GigabitEthernet0/0/2");
    }

    #[test]
    fn test_interface_merge_with_brief_table() {
        let mut model = parse(
            "\
interface GigabitEthernet0/0/1
 description Uplink
 ip address 10.1.1.1 255.255.255.0
#
",
        );
        let brief = "\
Interface                   PHY   Protocol  InUti OutUti   inErrors  outErrors
GigabitEthernet0/0/1        up    up           1%     2%          0          0
";
        let chunk = Chunk::from_parts("display interface brief", brief);
        extract_interface_brief(&chunk, &mut model).unwrap();

        assert_eq!(model.interfaces.len(), 1);
        let record = model.interfaces.get("gigabitethernet0/0/1").unwrap();
        assert_eq!(record.description.as_deref(), Some("Uplink"));
        assert_eq!(record.ip_address.as_deref(), Some("10.1.1.1"));
        assert_eq!(record.status.as_deref(), Some("up"));
    }

    // ========================================================================
    // VRFs & EVPN
    // ========================================================================

    #[test]
    fn test_vpn_instance_and_evpn() {
        let model = parse(
            "\
ip vpn-instance vrf1
 ipv4-family
  route-distinguisher 100:1
  vpn-target 100:1 export-extcommunity
  vpn-target 100:1 100:2 import-extcommunity
#
evpn vpn-instance evpn1 bd-mode
 route-distinguisher 200:1
 vpn-target 200:1
#
bridge-domain 10
 vxlan vni 5010
 evpn binding vpn-instance evpn1
#
",
        );
        let vrf = &model.protocols.vrfs[0];
        assert_eq!(vrf.name, "vrf1");
        assert_eq!(vrf.rd.as_deref(), Some("100:1"));
        assert_eq!(vrf.address_families, vec!["ipv4"]);
        assert_eq!(vrf.export_targets, vec!["100:1"]);
        assert_eq!(vrf.import_targets, vec!["100:1", "100:2"]);

        let evpn = &model.protocols.evpn_instances[0];
        assert_eq!(evpn.mode.as_deref(), Some("bd-mode"));
        assert_eq!(evpn.rd.as_deref(), Some("200:1"));
        assert_eq!(evpn.import_targets, vec!["200:1"]);
        assert_eq!(evpn.export_targets, vec!["200:1"]);
        assert_eq!(evpn.bridge_domain.as_deref(), Some("10"));

        assert_eq!(model.protocols.vxlan_vnis[0].vni, 5010);
        assert_eq!(model.protocols.vxlan_vnis[0].bridge_domain.as_deref(), Some("10"));
    }

    // ========================================================================
    // Routing protocols
    // ========================================================================

    #[test]
    fn test_bgp_peer_scope() {
        let model = parse(
            "\
bgp 65000
 router-id 10.0.0.1
 peer 10.0.0.2 as-number 65000
 peer 10.0.0.2 description iBGP-to-PE2
 peer 10.0.0.3 as-number 65000
 bfd enable
 #
 ipv4-family unicast
  peer 10.0.0.2 enable
 #
 ipv4-family vpn-instance vrf1
  router-id 10.1.1.1
  peer 10.1.1.2 as-number 65001
  description CE1
#
",
        );
        let bgp = &model.protocols.bgp;
        assert_eq!(bgp.local_as.as_deref(), Some("65000"));
        assert_eq!(bgp.router_id.as_deref(), Some("10.0.0.1"));
        assert_eq!(model.identity.vrf_router_ids["vrf1"], "10.1.1.1");

        let peers = &bgp.configured_peers;
        assert_eq!(peers.len(), 3);
        assert_eq!(peers[0].peer, "10.0.0.2");
        assert_eq!(peers[0].description.as_deref(), Some("iBGP-to-PE2"));
        assert!(!peers[0].bfd_enabled);
        assert_eq!(peers[1].peer, "10.0.0.3");
        assert!(peers[1].bfd_enabled);
        assert_eq!(peers[2].vrf.as_deref(), Some("vrf1"));
        assert_eq!(peers[2].remote_as.as_deref(), Some("65001"));
        assert_eq!(peers[2].description.as_deref(), Some("CE1"));
    }

    #[test]
    fn test_isis_mpls_and_bfd() {
        let model = parse(
            "\
bfd
#
mpls lsr-id 10.0.0.1
mpls
 mpls te
#
mpls ldp
#
isis 1
 is-level level-2
 cost-style wide
 network-entity 49.0001.0100.0000.0001.00
 segment-routing mpls
 segment-routing global-block 16000 23999
#
bfd to-pe2 bind peer-ip 10.0.0.2 interface GigabitEthernet0/0/1
 discriminator local 10
 discriminator remote 20
#
",
        );
        let mpls = &model.protocols.mpls;
        assert_eq!(mpls.lsr_id.as_deref(), Some("10.0.0.1"));
        assert_eq!(mpls.mpls_enabled, Some(true));
        assert_eq!(mpls.te_enabled, Some(true));
        assert_eq!(mpls.ldp_enabled, Some(true));
        assert_eq!(mpls.sr_enabled, Some(true));
        assert_eq!(mpls.srgb.as_deref(), Some("16000-23999"));

        let isis = &model.protocols.isis_processes[0];
        assert_eq!(isis.process_id, "1");
        assert_eq!(isis.is_level.as_deref(), Some("level-2"));
        assert_eq!(isis.segment_routing, Some(true));

        let bfd = &model.protocols.bfd;
        assert_eq!(bfd.enabled, Some(true));
        assert_eq!(bfd.configs[0].name, "to-pe2");
        assert_eq!(bfd.configs[0].interface.as_deref(), Some("GigabitEthernet0/0/1"));
        assert_eq!(bfd.configs[0].local_discriminator, Some(10));
        assert_eq!(bfd.configs[0].remote_discriminator, Some(20));
    }

    #[test]
    fn test_static_routes_and_etrunk() {
        let model = parse(
            "\
ip route-static 0.0.0.0 0.0.0.0 10.1.1.2 preference 70 description default
ip route-static vpn-instance vrf1 192.168.0.0 16 NULL0
ip route-static 10.9.0.0 255.255.0.0 GigabitEthernet0/0/1 10.1.1.6
e-trunk 1
 priority 10
 peer-address 10.0.0.2 source-address 10.0.0.1
#
",
        );
        let routes = &model.routing.static_routes;
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].next_hop.as_deref(), Some("10.1.1.2"));
        assert_eq!(routes[0].preference, Some(70));
        assert_eq!(routes[0].description.as_deref(), Some("default"));
        assert_eq!(routes[1].vrf.as_deref(), Some("vrf1"));
        assert_eq!(routes[1].mask.as_deref(), Some("255.255.0.0"));
        assert_eq!(routes[1].interface.as_deref(), Some("NULL0"));
        assert_eq!(routes[2].interface.as_deref(), Some("GigabitEthernet0/0/1"));
        assert_eq!(routes[2].next_hop.as_deref(), Some("10.1.1.6"));

        let etrunk = &model.protocols.etrunks[0];
        assert_eq!(etrunk.priority, Some(10));
        assert_eq!(etrunk.peer_ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(etrunk.source_ip.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_alarm_overrides() {
        let model = parse(
            "\
alarm
 alarm-name hwFanFail severity critical
 mask alarm-name hwPowerRemove
 alarm-name hwPowerRemove severity minor
 alarm-name hwFanFail severity major
#
",
        );
        assert_eq!(
            model.alarm_settings,
            vec![
                AlarmSetting {
                    name: "hwFanFail".into(),
                    severity: Some("major".into()),
                    masked: false,
                },
                AlarmSetting {
                    name: "hwPowerRemove".into(),
                    severity: Some("minor".into()),
                    masked: true,
                },
            ]
        );
    }
}
