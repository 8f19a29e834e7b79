//! Host identity of server addresses.
//!
//! A server address looks like `smp://<keyhash>@host1,host2:5223`. Two
//! servers are considered the same endpoint when they share any host after
//! normalization, regardless of scheme, key hash, port or letter case.

/// Extract the normalized hosts of a server address.
///
/// The scheme and key hash are stripped, the host list is split on `,`,
/// ports are removed and hosts are lowercased. A host listed twice in the
/// same address is returned once; empty hosts are dropped.
pub fn normalized_hosts(address: &str) -> Vec<String> {
    let rest = address.trim();
    let rest = match rest.find("://") {
        Some(pos) => &rest[pos + 3..],
        None => rest,
    };
    // key hashes are base64 and may contain '/', so strip them before the path
    let rest = match rest.rfind('@') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    let rest = rest.split(['/', '?', '#']).next().unwrap_or_default();

    let mut hosts: Vec<String> = Vec::new();
    for part in rest.split(',') {
        let host = normalize_host(part);
        if !host.is_empty() && !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    hosts
}

/// Normalize a single `host[:port]` entry.
pub fn normalize_host(entry: &str) -> String {
    let entry = entry.trim();

    let host = if let Some(bracketed) = entry.strip_prefix('[') {
        // IPv6 literal: [::1]:443
        bracketed.split(']').next().unwrap_or_default()
    } else if entry.matches(':').count() == 1 {
        entry.split(':').next().unwrap_or_default()
    } else {
        // bare IPv6 literal or no port at all
        entry
    };

    host.trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_address() {
        let hosts = normalized_hosts(
            "smp://0YuTwO05YJWS8rkjn9eLJDjQhFKvIYd8d4xG8X1blIU=@smp8.simplex.im,beccx4yfxxbvyhqypaavemqurytl6hozr47wfc7uuecacjqdvwpw2xid.onion",
        );
        assert_eq!(
            hosts,
            vec![
                "smp8.simplex.im".to_string(),
                "beccx4yfxxbvyhqypaavemqurytl6hozr47wfc7uuecacjqdvwpw2xid.onion".to_string(),
            ]
        );
    }

    #[test]
    fn test_scheme_case_and_port_ignored() {
        assert_eq!(normalized_hosts("xftp://key@Files.Example.COM:443"), vec!["files.example.com"]);
        assert_eq!(normalized_hosts("smp1.example"), vec!["smp1.example"]);
        assert_eq!(normalized_hosts("smp://k@smp1.example.:5223"), vec!["smp1.example"]);
    }

    #[test]
    fn test_ipv6_hosts() {
        assert_eq!(normalize_host("[2001:DB8::1]:5223"), "2001:db8::1");
        assert_eq!(normalize_host("2001:db8::1"), "2001:db8::1");
    }

    #[test]
    fn test_repeated_and_empty_hosts() {
        assert_eq!(
            normalized_hosts("smp://k@a.example,A.example:5223,,"),
            vec!["a.example"]
        );
        assert!(normalized_hosts("smp://k@").is_empty());
    }
}
