//! Post-parse duplicate removal.
//!
//! Several command families report the same entity (a configuration stanza
//! and a display table, or a display command issued twice). After all chunks
//! ran, list fields keep only the first occurrence per identity key. Later
//! duplicates are dropped, not merged. Interfaces need no pass here since
//! the registry is keyed by name.

use std::collections::HashSet;
use std::hash::Hash;

use crate::model::Model;

/// Keep the first item per key, preserving order.
fn first_wins<T, K, F>(items: &mut Vec<T>, key: F)
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(key(item)));
}

/// Apply every dedup rule to a finished model.
pub fn dedup(model: &mut Model) {
    first_wins(&mut model.identity.ssh_users, |u| u.name.clone());
    first_wins(&mut model.ntp.servers, |s| s.address.clone());
    first_wins(&mut model.protocols.vrfs, |v| v.name.clone());
    first_wins(&mut model.alarms, |a| a.description.clone());
    first_wins(&mut model.protocols.bgp.configured_peers, |p| p.peer.clone());
    first_wins(&mut model.protocols.isis_processes, |p| p.process_id.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alarm, BgpConfiguredPeer, IsisProcess, NtpServer, SshUser};

    #[test]
    fn test_first_occurrence_wins() {
        let mut model = Model::new();
        model.identity.ssh_users = vec![
            SshUser {
                name: "admin".into(),
                service_type: Some("stelnet".into()),
                ..Default::default()
            },
            SshUser {
                name: "ops".into(),
                ..Default::default()
            },
            SshUser {
                name: "admin".into(),
                service_type: Some("all".into()),
                ..Default::default()
            },
        ];
        model.ntp.servers = vec![
            NtpServer {
                address: "10.1.1.1".into(),
                vrf: Some("MGMT".into()),
            },
            NtpServer {
                address: "10.1.1.1".into(),
                vrf: None,
            },
        ];
        model.protocols.isis_processes = vec![
            IsisProcess {
                process_id: "1".into(),
                is_level: Some("level-2".into()),
                ..Default::default()
            },
            IsisProcess {
                process_id: "1".into(),
                ..Default::default()
            },
        ];

        dedup(&mut model);

        let users = &model.identity.ssh_users;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].service_type.as_deref(), Some("stelnet"));
        assert_eq!(users[1].name, "ops");
        assert_eq!(model.ntp.servers.len(), 1);
        assert_eq!(model.ntp.servers[0].vrf.as_deref(), Some("MGMT"));
        assert_eq!(model.protocols.isis_processes.len(), 1);
        assert_eq!(
            model.protocols.isis_processes[0].is_level.as_deref(),
            Some("level-2")
        );
    }

    #[test]
    fn test_alarms_and_peers() {
        let mut model = Model::new();
        let alarm = |seq, text: &str| Alarm {
            sequence: Some(seq),
            description: text.to_string(),
            ..Default::default()
        };
        model.alarms = vec![alarm(1, "Fan failure"), alarm(2, "Link down"), alarm(3, "Fan failure")];

        let peer = |addr: &str, vrf: Option<&str>| BgpConfiguredPeer {
            peer: addr.to_string(),
            vrf: vrf.map(str::to_string),
            ..Default::default()
        };
        model.protocols.bgp.configured_peers = vec![
            peer("10.0.0.2", None),
            peer("10.0.0.3", None),
            peer("10.0.0.2", Some("vrf1")),
        ];

        dedup(&mut model);

        let sequences: Vec<_> = model.alarms.iter().map(|a| a.sequence).collect();
        assert_eq!(sequences, vec![Some(1), Some(2)]);
        let peers = &model.protocols.bgp.configured_peers;
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].vrf, None);
        assert_eq!(peers[1].peer, "10.0.0.3");
    }
}
