//! Routing-table extractors.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::fields::{builtin_regex, find_header, first_capture, labeled, split_prefix, to_int, tokens};
use crate::capture::Chunk;
use crate::error::ExtractError;
use crate::model::{Model, RouteSummary, StaticRoute};

/// VRF name used for the global routing table.
pub const PUBLIC_VRF: &str = "_public_";

static LABEL_VRF: Lazy<Regex> = Lazy::new(|| builtin_regex(r"(?i)\bvpn-instance\s+(\S+)"));
static TABLE_NAME: Lazy<Regex> =
    Lazy::new(|| builtin_regex(r"(?im)^\s*Routing\s+Table\s*:\s*(\S+)"));

/// `display ip routing-table [vpn-instance NAME] statistics`
pub fn extract_route_statistics(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let lines: Vec<&str> = chunk.lines().collect();
    let h = find_header(&lines, &["proto"]).ok_or(ExtractError::MissingHeader {
        expected: "Proto total active",
    })?;

    let vrf = first_capture(&chunk.label, &[&*LABEL_VRF])
        .or_else(|| first_capture(&chunk.body, &[&*TABLE_NAME]))
        .filter(|name| !name.eq_ignore_ascii_case("_public_"))
        .unwrap_or_else(|| PUBLIC_VRF.to_string());

    let mut summary = RouteSummary {
        vrf,
        total_prefixes: labeled(&chunk.body, &["Summary Prefixes"]).and_then(|v| to_int(&v)),
        total_routes: None,
        by_protocol: IndexMap::new(),
    };

    for line in &lines[h + 1..] {
        let Some(toks) = tokens(line, 2) else {
            continue;
        };
        let (proto, Some(count)) = (toks[0], to_int(toks[1])) else {
            continue;
        };
        if !proto.starts_with(|c: char| c.is_ascii_alphabetic()) {
            continue;
        }
        if proto.eq_ignore_ascii_case("total") {
            summary.total_routes = Some(count);
        } else {
            summary.by_protocol.insert(proto.to_uppercase(), count);
        }
    }

    model.routing.summaries.push(summary);
    Ok(())
}

/// `display ip routing-table protocol static`
///
/// Rows may wrap: a prefix line followed by indented next-hop lines.
pub fn extract_static_routes(chunk: &Chunk, model: &mut Model) -> Result<(), ExtractError> {
    let vrf = first_capture(&chunk.label, &[&*LABEL_VRF]);
    let mut prefix: Option<(String, Option<String>)> = None;

    for line in chunk.lines() {
        let Some(toks) = tokens(line, 4) else {
            continue;
        };

        // "<prefix/len> Static <pre> <cost> <flags> <nexthop> <interface>"
        let rest = if toks[0].contains('/') && toks[1].eq_ignore_ascii_case("static") {
            prefix = Some(split_prefix(toks[0]));
            &toks[1..]
        } else if toks[0].eq_ignore_ascii_case("static") && prefix.is_some() {
            &toks[..]
        } else {
            continue;
        };
        let (Some((address, mask)), Some(preference)) = (prefix.clone(), to_int(rest[1])) else {
            continue;
        };

        // rest: Static, Pre, Cost, [Flags], NextHop, Interface
        let (next_hop, interface) = match rest.len() {
            n if n >= 6 => (rest[4], rest.get(5).copied()),
            5 => (rest[3], rest.get(4).copied()),
            _ => continue,
        };
        model.routing.static_routes.push(StaticRoute {
            vrf: vrf.clone(),
            prefix: address,
            mask,
            next_hop: Some(next_hop.to_string()),
            interface: interface.map(str::to_string),
            preference: Some(preference),
            description: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_statistics_public() {
        let body = "\
Summary Prefixes : 25
Proto      total      active     added      deleted    freed
           routes     routes     routes     routes     routes
DIRECT     10         10         10         0          0
STATIC     2          2          2          0          0
OSPF       5          5          5          0          0
Total      17         17         17         0          0
";
        let mut model = Model::new();
        let chunk = Chunk::from_parts("display ip routing-table statistics", body);
        extract_route_statistics(&chunk, &mut model).unwrap();

        let summary = &model.routing.summaries[0];
        assert_eq!(summary.vrf, PUBLIC_VRF);
        assert_eq!(summary.total_prefixes, Some(25));
        assert_eq!(summary.total_routes, Some(17));
        assert_eq!(summary.by_protocol["DIRECT"], 10);
        assert_eq!(summary.by_protocol["OSPF"], 5);
        assert_eq!(summary.by_protocol.len(), 3);
    }

    #[test]
    fn test_route_statistics_vrf_from_label() {
        let body = "\
Proto      total      active
DIRECT     4          4
Total      4          4
";
        let mut model = Model::new();
        let chunk = Chunk::from_parts(
            "display ip routing-table vpn-instance vrf1 statistics",
            body,
        );
        extract_route_statistics(&chunk, &mut model).unwrap();
        assert_eq!(model.routing.summaries[0].vrf, "vrf1");
    }

    #[test]
    fn test_route_statistics_without_header_fails() {
        let mut model = Model::new();
        let chunk = Chunk::from_parts("display ip routing-table statistics", "Info: none\n");
        assert!(extract_route_statistics(&chunk, &mut model).is_err());
        assert!(model.routing.summaries.is_empty());
    }

    #[test]
    fn test_static_routes() {
        let body = "\
Route Flags: R - relay, D - download to fib
------------------------------------------------------------------------------
Public routing table : Static
         Destinations : 2        Routes : 3        Configured Routes : 3

Static routing table status : <Active>
         Destinations : 2        Routes : 3

Destination/Mask    Proto   Pre  Cost      Flags NextHop         Interface

        0.0.0.0/0   Static  60   0          RD   10.1.1.2        GigabitEthernet0/0/1
    10.10.0.0/16    Static  60   0          RD   10.1.1.6        GigabitEthernet0/0/2
                    Static  60   0          RD   10.1.1.10       GigabitEthernet0/0/3

Static routing table status : <Inactive>
         Destinations : 0        Routes : 0
";
        let mut model = Model::new();
        let chunk = Chunk::from_parts("display ip routing-table protocol static", body);
        extract_static_routes(&chunk, &mut model).unwrap();

        let routes = &model.routing.static_routes;
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].prefix, "0.0.0.0");
        assert_eq!(routes[0].mask.as_deref(), Some("0.0.0.0"));
        assert_eq!(routes[0].next_hop.as_deref(), Some("10.1.1.2"));
        assert_eq!(routes[0].preference, Some(60));
        assert_eq!(routes[1].mask.as_deref(), Some("255.255.0.0"));
        assert_eq!(routes[2].prefix, "10.10.0.0");
        assert_eq!(
            routes[2].interface.as_deref(),
            Some("GigabitEthernet0/0/3")
        );
    }
}
