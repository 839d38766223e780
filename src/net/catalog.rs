//! The demo scenarios embedded in the blog posts.
use crate::net::core::NetError;
use crate::net::scenario::{Scenario, ScenarioSpec, TransitionSpec};

macro_rules! transition {
    ($name:literal : [$($input:literal),*] => [$($output:literal),*]) => {
        TransitionSpec {
            name: $name,
            inputs: &[$($input),*],
            outputs: &[$($output),*],
        }
    };
}

pub const COFFEE: ScenarioSpec = ScenarioSpec {
    name: "coffee",
    title: "Making Coffee",
    places: &[
        ("waterCold", 1),
        ("waterHot", 0),
        ("beansWhole", 1),
        ("beansGround", 0),
        ("cupEmpty", 1),
        ("coffeeReady", 0),
    ],
    transitions: &[
        transition!("heatWater": ["waterCold"] => ["waterHot"]),
        transition!("grindBeans": ["beansWhole"] => ["beansGround"]),
        transition!("pourOver": ["waterHot", "beansGround", "cupEmpty"] => ["coffeeReady"]),
    ],
    goal: Some("coffeeReady"),
};

pub const APPROVAL: ScenarioSpec = ScenarioSpec {
    name: "approval",
    title: "Contract Approval",
    places: &[
        ("submitted", 1),
        ("awaitingFinance", 0),
        ("awaitingLegal", 0),
        ("financeApproved", 0),
        ("financeRejected", 0),
        ("legalApproved", 0),
        ("legalRejected", 0),
        ("contractExecuted", 0),
    ],
    transitions: &[
        transition!("submit": ["submitted"] => ["awaitingFinance", "awaitingLegal"]),
        transition!("approveFinance": ["awaitingFinance"] => ["financeApproved"]),
        transition!("rejectFinance": ["awaitingFinance"] => ["financeRejected"]),
        transition!("approveLegal": ["awaitingLegal"] => ["legalApproved"]),
        transition!("rejectLegal": ["awaitingLegal"] => ["legalRejected"]),
        transition!("execute": ["financeApproved", "legalApproved"] => ["contractExecuted"]),
    ],
    goal: Some("contractExecuted"),
};

pub const CHECKOUT: ScenarioSpec = ScenarioSpec {
    name: "checkout",
    title: "Checkout Flow",
    places: &[
        ("cartReady", 3),
        ("inventory", 2),
        ("inventoryReserved", 0),
        ("paymentPending", 0),
        ("paymentComplete", 0),
        ("paymentFailed", 0),
        ("orderFulfilled", 0),
        ("orderCancelled", 0),
    ],
    transitions: &[
        transition!("beginCheckout": ["cartReady", "inventory"] => ["inventoryReserved", "paymentPending"]),
        transition!("completePayment": ["paymentPending"] => ["paymentComplete"]),
        transition!("failPayment": ["paymentPending"] => ["paymentFailed"]),
        transition!("fulfillOrder": ["paymentComplete", "inventoryReserved"] => ["orderFulfilled"]),
        transition!("cancelOrder": ["paymentFailed", "inventoryReserved"] => ["orderCancelled", "inventory"]),
    ],
    goal: None,
};

pub const HUMAN_GATE: ScenarioSpec = ScenarioSpec {
    name: "human-gate",
    title: "Human Approval Gate",
    places: &[
        ("codePending", 1),
        ("humanApproval", 0),
        ("approved", 0),
        ("codeDone", 0),
    ],
    transitions: &[
        transition!("requestApproval": ["codePending"] => ["humanApproval"]),
        transition!("approve": ["humanApproval"] => ["approved"]),
        transition!("reject": ["humanApproval"] => ["codeDone"]),
        transition!("executeCode": ["approved"] => ["codeDone"]),
    ],
    goal: Some("codeDone"),
};

pub const JOIN_RESULTS: ScenarioSpec = ScenarioSpec {
    name: "join-results",
    title: "Joining Tool Results",
    places: &[
        ("searchPending", 1),
        ("dbPending", 1),
        ("codePending", 1),
        ("searchDone", 0),
        ("dbDone", 0),
        ("codeDone", 0),
        ("responseGenerated", 0),
    ],
    transitions: &[
        transition!("completeSearch": ["searchPending"] => ["searchDone"]),
        transition!("skipSearch": ["searchPending"] => ["searchDone"]),
        transition!("completeDb": ["dbPending"] => ["dbDone"]),
        transition!("skipDb": ["dbPending"] => ["dbDone"]),
        transition!("completeCode": ["codePending"] => ["codeDone"]),
        transition!("skipCode": ["codePending"] => ["codeDone"]),
        transition!("joinResults": ["searchDone", "dbDone", "codeDone"] => ["responseGenerated"]),
    ],
    goal: Some("responseGenerated"),
};

pub const ALL: &[ScenarioSpec] = &[COFFEE, APPROVAL, CHECKOUT, HUMAN_GATE, JOIN_RESULTS];

pub fn names() -> impl Iterator<Item = &'static str> {
    ALL.iter().map(|spec| spec.name)
}

pub fn load(name: &str) -> Result<Scenario, NetError> {
    let spec = ALL
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| NetError::UnknownScenario(name.to_string()))?;
    Scenario::from_spec(spec)
}
