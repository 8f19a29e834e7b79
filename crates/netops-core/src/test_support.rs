//! Builders for operator lists used across the unit tests.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use netops_shared::{
    AuthorityError, ConditionsAcceptance, ConditionsDocument, OperatorId, OperatorInfo,
    ServerOperator, ServerOperatorConditions, ServerRoles, UsageConditions, UserOperatorServers,
    UserServer,
};

use crate::authority::ConditionsAuthority;

pub fn accepted() -> ConditionsAcceptance {
    ConditionsAcceptance::Accepted { accepted_at: None }
}

pub fn required(deadline: Option<DateTime<Utc>>) -> ConditionsAcceptance {
    ConditionsAcceptance::Required { deadline }
}

pub fn operator(id: i64, enabled: bool, acceptance: ConditionsAcceptance) -> ServerOperator {
    ServerOperator {
        operator_id: OperatorId(id),
        trade_name: format!("Operator {id}"),
        legal_name: Some(format!("Operator {id} Ltd")),
        info: OperatorInfo::default(),
        enabled,
        conditions_acceptance: acceptance,
        smp_roles: ServerRoles::ALL,
        xftp_roles: ServerRoles::ALL,
    }
}

pub fn server(address: &str) -> UserServer {
    let mut server = UserServer::custom(address);
    server.server_id = Some(1);
    server
}

/// An accepted operator with the given servers.
pub fn operator_entry(
    id: i64,
    enabled: bool,
    smp: Vec<UserServer>,
    xftp: Vec<UserServer>,
) -> UserOperatorServers {
    UserOperatorServers {
        operator: Some(operator(id, enabled, accepted())),
        smp_servers: smp,
        xftp_servers: xftp,
    }
}

pub fn custom_entry(smp: Vec<UserServer>, xftp: Vec<UserServer>) -> UserOperatorServers {
    UserOperatorServers {
        operator: None,
        smp_servers: smp,
        xftp_servers: xftp,
    }
}

pub fn conditions(operators: Vec<ServerOperator>) -> ServerOperatorConditions {
    ServerOperatorConditions {
        server_operators: operators,
        current_conditions: UsageConditions {
            conditions_id: 1,
            conditions_commit: "a5061f3147165a05979d6ace33960aced2d6ac03".into(),
            notified_at: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        },
    }
}

/// In-memory conditions authority that records acceptance calls.
pub struct FakeAuthority {
    state: Mutex<ServerOperatorConditions>,
    text: Mutex<Option<String>>,
    fail: AtomicBool,
    accept_calls: Mutex<Vec<BTreeSet<OperatorId>>>,
}

impl FakeAuthority {
    pub fn new(initial: ServerOperatorConditions) -> Self {
        Self {
            state: Mutex::new(initial),
            text: Mutex::new(None),
            fail: AtomicBool::new(false),
            accept_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_text(&self, text: Option<&str>) {
        *self.text.lock().unwrap() = text.map(str::to_owned);
    }

    pub fn accept_calls(&self) -> Vec<BTreeSet<OperatorId>> {
        self.accept_calls.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), AuthorityError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(AuthorityError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

/// The snapshot an authority returns after accepting for `ids`.
pub fn accept_in(
    snapshot: &ServerOperatorConditions,
    ids: &BTreeSet<OperatorId>,
) -> ServerOperatorConditions {
    let mut next = snapshot.clone();
    for op in next.server_operators.iter_mut() {
        if ids.contains(&op.operator_id) {
            op.conditions_acceptance = ConditionsAcceptance::Accepted {
                accepted_at: Some(Utc::now()),
            };
        }
    }
    next
}

impl ConditionsAuthority for FakeAuthority {
    async fn server_operators(&self) -> Result<ServerOperatorConditions, AuthorityError> {
        self.check()?;
        Ok(self.state.lock().unwrap().clone())
    }

    async fn fetch_usage_conditions(&self) -> Result<ConditionsDocument, AuthorityError> {
        self.check()?;
        Ok(ConditionsDocument {
            current: self.state.lock().unwrap().current_conditions.clone(),
            text: self.text.lock().unwrap().clone(),
            accepted: None,
        })
    }

    async fn accept_conditions(
        &self,
        conditions_id: i64,
        operator_ids: &BTreeSet<OperatorId>,
    ) -> Result<ServerOperatorConditions, AuthorityError> {
        self.accept_calls.lock().unwrap().push(operator_ids.clone());
        self.check()?;

        let mut state = self.state.lock().unwrap();
        if state.current_conditions.conditions_id != conditions_id {
            return Err(AuthorityError::Rejected {
                status: 409,
                message: format!("unknown conditions {conditions_id}"),
            });
        }
        *state = accept_in(&state, operator_ids);
        Ok(state.clone())
    }
}
