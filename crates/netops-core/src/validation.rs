//! Server configuration validation.
//!
//! [`validate_servers`] is pure and idempotent: it looks only at the snapshot
//! it is given and returns a flat, deterministically ordered error list.
//! Callers decide how to group the errors; the filters at the bottom of this
//! module cover the groupings the operator screens use.

use netops_shared::{
    OperatorId, ServerProtocol, ServerRoles, UserOperatorServers, UserServersError,
};

use crate::duplicates::detect_duplicates;

/// Validate every operator's servers, per protocol.
///
/// For each protocol (SMP first), in this order:
/// - no active server at all: `NoServers`, and no role errors for it;
/// - otherwise, missing storage and (SMP only) missing proxy roles;
/// - then duplicate hosts.
///
/// A server is active when it is enabled, not deleted, and its operator is
/// enabled (user-added servers have no operator and are always eligible).
pub fn validate_servers(all: &[UserOperatorServers]) -> Vec<UserServersError> {
    let mut errors = Vec::new();
    for protocol in ServerProtocol::ALL {
        errors.extend(role_errors(all, protocol));
        errors.extend(detect_duplicates(all, protocol));
    }
    errors
}

fn role_errors(all: &[UserOperatorServers], protocol: ServerProtocol) -> Option<UserServersError> {
    let active: Vec<ServerRoles> = all
        .iter()
        .filter(|entry| entry.is_operator_enabled())
        .flat_map(|entry| {
            let roles = entry.roles(protocol);
            entry
                .servers(protocol)
                .iter()
                .filter(|s| s.enabled && !s.deleted)
                .map(move |_| roles)
        })
        .collect();

    if active.is_empty() {
        return Some(UserServersError::NoServers { protocol });
    }

    let storage = active.iter().any(|r| r.storage);
    let proxy = !protocol.has_proxy_role() || active.iter().any(|r| r.proxy);

    match (storage, proxy) {
        (true, true) => None,
        (false, true) => Some(UserServersError::StorageFromAllOperatorsDisabled { protocol }),
        (true, false) => Some(UserServersError::ProxyFromAllOperatorsDisabled { protocol }),
        (false, false) => Some(UserServersError::NoProxyOrStorageEnabled { protocol }),
    }
}

// ---------------------------------------------------------------------------
// Presentation filters
// ---------------------------------------------------------------------------

/// First error that concerns the configuration as a whole, shown under the
/// operator toggle. Duplicates are shown on their rows instead.
pub fn global_error(errors: &[UserServersError]) -> Option<&UserServersError> {
    errors.iter().find(|e| e.duplicate_host().is_none())
}

/// First error of one protocol's section, excluding duplicates.
pub fn global_protocol_error(
    errors: &[UserServersError],
    protocol: ServerProtocol,
) -> Option<&UserServersError> {
    errors
        .iter()
        .find(|e| e.protocol() == protocol && e.duplicate_host().is_none())
}

/// Errors involving one operator's servers. `None` selects user-added servers.
pub fn operator_errors(
    errors: &[UserServersError],
    operator_id: Option<OperatorId>,
) -> Vec<&UserServersError> {
    errors
        .iter()
        .filter(|e| e.operator_ids().contains(&operator_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{custom_entry, operator_entry, server};

    fn baseline() -> Vec<UserOperatorServers> {
        vec![
            operator_entry(
                1,
                true,
                vec![server("smp://a@smp1.example")],
                vec![server("xftp://a@xftp1.example")],
            ),
            custom_entry(vec![], vec![]),
        ]
    }

    #[test]
    fn test_valid_configuration() {
        assert!(validate_servers(&baseline()).is_empty());
    }

    #[test]
    fn test_no_servers_suppresses_role_errors() {
        let mut all = baseline();
        all[0].operator.as_mut().unwrap().enabled = false;

        let errors = validate_servers(&all);
        assert_eq!(
            errors,
            vec![
                UserServersError::NoServers {
                    protocol: ServerProtocol::Smp
                },
                UserServersError::NoServers {
                    protocol: ServerProtocol::Xftp
                },
            ]
        );
    }

    #[test]
    fn test_deleted_and_disabled_servers_are_not_active() {
        let mut all = baseline();
        all[0].smp_servers[0].deleted = true;
        all[0].xftp_servers[0].enabled = false;

        let errors = validate_servers(&all);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, UserServersError::NoServers { .. })));
    }

    #[test]
    fn test_storage_missing() {
        let mut all = baseline();
        all[0].operator.as_mut().unwrap().xftp_roles.storage = false;

        assert_eq!(
            validate_servers(&all),
            vec![UserServersError::StorageFromAllOperatorsDisabled {
                protocol: ServerProtocol::Xftp
            }]
        );
    }

    #[test]
    fn test_proxy_missing_only_for_smp() {
        let mut all = baseline();
        {
            let op = all[0].operator.as_mut().unwrap();
            op.smp_roles.proxy = false;
            op.xftp_roles.proxy = false;
        }

        assert_eq!(
            validate_servers(&all),
            vec![UserServersError::ProxyFromAllOperatorsDisabled {
                protocol: ServerProtocol::Smp
            }]
        );
    }

    #[test]
    fn test_both_roles_missing() {
        let mut all = baseline();
        all[0].operator.as_mut().unwrap().smp_roles = ServerRoles::default();

        assert_eq!(
            validate_servers(&all),
            vec![UserServersError::NoProxyOrStorageEnabled {
                protocol: ServerProtocol::Smp
            }]
        );
    }

    #[test]
    fn test_custom_servers_grant_every_role() {
        let mut all = baseline();
        all[0].operator.as_mut().unwrap().smp_roles = ServerRoles::default();
        all[1].smp_servers.push(server("smp://k@mine.example"));

        assert!(validate_servers(&all).is_empty());
    }

    #[test]
    fn test_duplicate_then_delete() {
        let mut all = vec![
            operator_entry(1, true, vec![server("smp1.example")], vec![]),
            operator_entry(2, true, vec![server("smp1.example")], vec![]),
        ];

        let dups: Vec<_> = validate_servers(&all)
            .into_iter()
            .filter(|e| e.duplicate_host().is_some())
            .collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].protocol(), ServerProtocol::Smp);
        assert_eq!(
            dups[0].operator_ids(),
            vec![Some(OperatorId(1)), Some(OperatorId(2))]
        );

        all[1].smp_servers[0].deleted = true;
        assert!(validate_servers(&all)
            .iter()
            .all(|e| e.duplicate_host().is_none()));
    }

    #[test]
    fn test_idempotent() {
        let mut all = baseline();
        all.push(operator_entry(2, false, vec![server("smp://b@smp1.example")], vec![]));
        all[0].operator.as_mut().unwrap().xftp_roles.storage = false;

        let first = validate_servers(&all);
        let second = validate_servers(&all);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_filters() {
        let mut all = baseline();
        all[0].operator.as_mut().unwrap().xftp_roles.storage = false;
        all[1].smp_servers.push(server("smp://z@smp1.example"));

        let errors = validate_servers(&all);
        assert_eq!(errors.len(), 2);

        assert!(matches!(
            global_error(&errors),
            Some(UserServersError::StorageFromAllOperatorsDisabled { .. })
        ));
        assert!(global_protocol_error(&errors, ServerProtocol::Smp).is_none());
        assert!(global_protocol_error(&errors, ServerProtocol::Xftp).is_some());
        assert_eq!(operator_errors(&errors, Some(OperatorId(1))).len(), 1);
        assert_eq!(operator_errors(&errors, None).len(), 1);
        assert!(operator_errors(&errors, Some(OperatorId(9))).is_empty());
    }
}
