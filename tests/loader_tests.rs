//! End-to-end tests loading machines from configuration values.

use finite::callback::TransitionContext;
use finite::core::{State, StateKind, Stateful};
use finite::loader::{ArrayLoader, Loader, MachineConfig, Registry};
use finite::{FiniteError, StateMachine};
use serde_json::{json, Value};

#[derive(Debug, Default)]
struct Expense {
    state: Option<String>,
    department: String,
    manager_sign_off: bool,
    audit: Vec<String>,
}

impl Stateful for Expense {
    fn finite_state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    fn set_finite_state(&mut self, state: &str) {
        self.state = Some(state.to_string());
    }

    fn property(&self, key: &str) -> Option<Value> {
        match key {
            "department" => Some(json!(self.department)),
            _ => None,
        }
    }
}

fn job_config() -> Value {
    json!({
        "class": "Expense",
        "states": {
            "idle": { "kind": "initial" },
            "running": { "kind": "normal" },
            "done": { "kind": "final" }
        },
        "transitions": {
            "start": { "from": "idle", "to": "running" },
            "finish": { "from": "running", "to": "done" }
        }
    })
}

fn approval_config() -> Value {
    json!({
        "class": "Expense",
        "states": {
            "pending": { "type": "initial" },
            "approved": { "properties": { "payable": true } },
            "rejected": { "type": "final" }
        },
        "transitions": {
            "approve": { "from": "pending", "to": "approved", "guard": "has_manager_sign_off" },
            "reject": { "from": ["pending", "approved"], "to": "rejected" }
        },
        "callbacks": {
            "before": [
                { "do": "audit", "on": "approve" }
            ],
            "after": [
                { "do": "audit" },
                { "do": "audit", "to": "rejected", "properties": { "department": "legal" } }
            ]
        }
    })
}

fn registry() -> Registry<Expense> {
    Registry::new()
        .guard("has_manager_sign_off", |e: &Expense| e.manager_sign_off)
        .callback("audit", |e: &mut Expense, ctx: &TransitionContext| {
            let state = e.state.clone().unwrap_or_default();
            e.audit.push(format!("{}@{state}", ctx.transition));
            Ok(())
        })
}

fn load(config: Value, expense: Expense) -> StateMachine<Expense> {
    let loader = ArrayLoader::from_value(config, registry()).unwrap();
    let mut machine = StateMachine::new(expense);
    loader.load(&mut machine).unwrap();
    machine.initialize().unwrap();
    machine
}

#[test]
fn loaded_machine_walks_idle_running_done() {
    let mut machine = load(job_config(), Expense::default());

    assert_eq!(machine.current_state_id(), Some("idle"));
    assert_eq!(machine.apply("start").unwrap(), "running");
    assert_eq!(machine.apply("finish").unwrap(), "done");
    assert!(machine.is_final());

    let result = machine.apply("start");
    assert!(matches!(
        result,
        Err(FiniteError::InvalidTransition { ref state, .. }) if state == "done"
    ));
    assert_eq!(machine.current_state_id(), Some("done"));
}

#[test]
fn guard_from_registry_blocks_approval() {
    let mut machine = load(approval_config(), Expense::default());

    assert!(!machine.can("approve").unwrap());
    assert!(matches!(
        machine.apply("approve"),
        Err(FiniteError::InvalidTransition { .. })
    ));
    assert_eq!(machine.object().state.as_deref(), Some("pending"));
    assert!(machine.object().audit.is_empty());
}

#[test]
fn callbacks_fire_by_filter() {
    let mut machine = load(
        approval_config(),
        Expense {
            manager_sign_off: true,
            department: "legal".to_string(),
            ..Expense::default()
        },
    );

    machine.apply("approve").unwrap();
    machine.apply("reject").unwrap();

    assert_eq!(
        machine.object().audit,
        vec![
            "approve@pending",
            "approve@approved",
            "reject@rejected",
            "reject@rejected",
        ]
    );
}

#[test]
fn property_filter_skips_other_departments() {
    let mut machine = load(
        approval_config(),
        Expense {
            department: "sales".to_string(),
            ..Expense::default()
        },
    );

    machine.apply("reject").unwrap();

    assert_eq!(machine.object().audit, vec!["reject@rejected"]);
}

#[test]
fn state_properties_are_loaded() {
    let machine = load(approval_config(), Expense::default());

    let approved = machine.state("approved").unwrap();
    assert_eq!(approved.kind(), StateKind::Normal);
    assert_eq!(approved.get("payable"), Some(&json!(true)));
}

#[test]
fn loading_twice_reports_duplicate_state() {
    let loader = ArrayLoader::from_value(job_config(), registry()).unwrap();
    let mut machine = StateMachine::new(Expense::default());
    loader.load(&mut machine).unwrap();

    let result = loader.load(&mut machine);

    assert!(matches!(result, Err(FiniteError::DuplicateState(_))));
}

#[test]
fn duplicate_state_registration_fails() {
    let mut machine = StateMachine::new(Expense::default());
    machine.add_state(State::new("idle", StateKind::Initial)).unwrap();

    let result = machine.add_state(State::new("idle", StateKind::Normal));

    assert!(matches!(result, Err(FiniteError::DuplicateState(id)) if id == "idle"));
}

#[test]
fn transitions_may_reference_states_loaded_elsewhere() {
    let loader = ArrayLoader::from_value(
        json!({ "transitions": { "start": { "from": "idle", "to": "running" } } }),
        registry(),
    )
    .unwrap();
    let mut machine = StateMachine::new(Expense::default());

    loader.load(&mut machine).unwrap();
    machine.add_state(State::new("idle", StateKind::Initial)).unwrap();
    machine.initialize().unwrap();

    assert!(matches!(
        machine.apply("start"),
        Err(FiniteError::UnknownState(id)) if id == "running"
    ));

    machine.add_state(State::new("running", StateKind::Normal)).unwrap();
    assert_eq!(machine.apply("start").unwrap(), "running");
}

#[test]
fn strict_schema_rejects_bad_entries() {
    let cases = [
        json!({ "states": { "idle": { "kind": "waiting" } } }),
        json!({ "states": { "idle": { "label": "Idle" } } }),
        json!({ "transitions": { "start": { "to": "running" } } }),
        json!({ "transitions": { "start": { "from": "idle" } } }),
        json!({ "transitions": { "start": { "from": "idle", "to": "b", "after": "x" } } }),
        json!({ "callbacks": { "around": [] } }),
        json!({ "workflow": "x" }),
    ];

    for config in cases {
        let result = ArrayLoader::from_value(config.clone(), registry());
        assert!(
            matches!(result, Err(FiniteError::Configuration(_))),
            "expected configuration error for {config}"
        );
    }
}

#[test]
fn unknown_callback_filter_key_fails_load() {
    let loader = ArrayLoader::from_value(
        json!({ "callbacks": { "before": [ { "do": "audit", "state": "idle" } ] } }),
        registry(),
    )
    .unwrap();

    let result = loader.load(&mut StateMachine::new(Expense::default()));

    assert!(matches!(result, Err(FiniteError::Configuration(_))));
}

#[test]
fn unregistered_callback_name_fails_load() {
    let loader = ArrayLoader::from_value(
        json!({ "callbacks": { "after": [ { "do": "notify" } ] } }),
        registry(),
    )
    .unwrap();

    let result = loader.load(&mut StateMachine::new(Expense::default()));

    assert!(matches!(result, Err(FiniteError::Configuration(_))));
}

#[test]
fn supports_checks_configured_class() {
    let expense_loader = ArrayLoader::from_value(job_config(), registry()).unwrap();
    let invoice_loader = ArrayLoader::new(MachineConfig::new("Invoice"), registry());

    assert!(expense_loader.supports(&Expense::default()));
    assert!(!invoice_loader.supports(&Expense::default()));
}
