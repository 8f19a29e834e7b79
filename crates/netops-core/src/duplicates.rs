//! Duplicate host detection across every operator's server lists.

use std::collections::{BTreeSet, HashMap};

use netops_shared::{
    DuplicateServer, ServerProtocol, UserOperatorServers, UserServer, UserServersError,
};

/// Find hosts used by more than one non-deleted server of `protocol`.
///
/// Every operator is scanned, enabled or not, including the entry of
/// user-added servers. One `DuplicateHost` error is emitted per host, listing
/// every server involved; errors follow the first occurrence of their host in
/// operator order, then server order.
pub fn detect_duplicates(
    all: &[UserOperatorServers],
    protocol: ServerProtocol,
) -> Vec<UserServersError> {
    let mut order: Vec<(String, Vec<DuplicateServer>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in all {
        let operator_id = entry.operator_id();
        for server in entry.servers(protocol).iter().filter(|s| !s.deleted) {
            for host in server.hosts() {
                let occurrence = DuplicateServer {
                    operator_id,
                    server: server.server.clone(),
                };
                match index.get(&host) {
                    Some(&i) => order[i].1.push(occurrence),
                    None => {
                        index.insert(host.clone(), order.len());
                        order.push((host, vec![occurrence]));
                    }
                }
            }
        }
    }

    order
        .into_iter()
        .filter(|(_, servers)| servers.len() > 1)
        .map(|(host, servers)| UserServersError::DuplicateHost {
            protocol,
            host,
            servers,
        })
        .collect()
}

/// Hosts named by any duplicate error, for annotating server rows.
pub fn find_duplicate_hosts(errors: &[UserServersError]) -> BTreeSet<String> {
    errors
        .iter()
        .filter_map(|e| e.duplicate_host())
        .map(str::to_owned)
        .collect()
}

/// Whether any of the server's hosts is in the duplicate set.
pub fn is_duplicate(server: &UserServer, duplicate_hosts: &BTreeSet<String>) -> bool {
    server.hosts().iter().any(|h| duplicate_hosts.contains(h))
}
