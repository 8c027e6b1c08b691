//! Unit tests for the asymmetric advisory override policy.

use crate::common_fixtures::{healthy_coin, settings, NOW};
use memetrix::advisory::{AdvisoryRouter, RoutedVerdict};
use memetrix::models::decision::{Decision, Intent, Verdict};
use memetrix::signals::{evaluate, DecisionEngine};

fn hold_decision() -> Decision {
    let settings = settings();
    let coin = healthy_coin();
    let health = evaluate(&settings, &coin, NOW);
    DecisionEngine::decide(&settings, &coin, &health, None)
}

fn buy_decision() -> Decision {
    let mut decision = hold_decision();
    decision.intent = Intent::Buy;
    decision
}

fn verdict(intent: Intent) -> RoutedVerdict {
    RoutedVerdict {
        worker: "http://127.0.0.1:9001||local-model".to_string(),
        verdict: Verdict {
            intent,
            confidence: 0.8,
            rationale: vec!["because".to_string()],
            risks: Vec::new(),
            invalidations: Vec::new(),
        },
    }
}

#[test]
fn hold_verdict_vetoes_a_buy() {
    let mut decision = buy_decision();
    AdvisoryRouter::apply(&mut decision, verdict(Intent::Hold));

    assert_eq!(decision.intent, Intent::Hold);
    assert!(decision.reasons.iter().any(|r| r == "advisory vetoed entry"));
    assert!(decision.advisory.is_some());
}

#[test]
fn hold_verdict_on_a_hold_is_recorded_without_noise() {
    let mut decision = hold_decision();
    let reasons_before = decision.reasons.len();
    AdvisoryRouter::apply(&mut decision, verdict(Intent::Hold));

    assert_eq!(decision.intent, Intent::Hold);
    assert_eq!(decision.reasons.len(), reasons_before);
    assert!(decision.advisory.is_some());
}

#[test]
fn buy_verdict_never_originates_a_buy() {
    let mut decision = hold_decision();
    AdvisoryRouter::apply(&mut decision, verdict(Intent::Buy));

    assert_eq!(decision.intent, Intent::Hold, "advisory cannot upgrade");
    let advisory = decision.advisory.unwrap();
    assert!(advisory.note.is_some(), "overridden buy is kept for audit");
}

#[test]
fn buy_verdict_confirms_an_existing_buy() {
    let mut decision = buy_decision();
    AdvisoryRouter::apply(&mut decision, verdict(Intent::Buy));

    assert_eq!(decision.intent, Intent::Buy);
    assert!(decision.advisory.unwrap().note.is_none());
}

#[test]
fn sell_verdict_always_forces_an_exit() {
    for start in [hold_decision(), buy_decision()] {
        let mut decision = start;
        AdvisoryRouter::apply(&mut decision, verdict(Intent::Sell));

        assert_eq!(decision.intent, Intent::Sell);
        assert!(decision.reasons.iter().any(|r| r == "advisory requested exit"));
    }
}

#[test]
fn verdict_details_survive_into_the_record() {
    let mut decision = hold_decision();
    AdvisoryRouter::apply(&mut decision, verdict(Intent::Hold));

    let advisory = decision.advisory.unwrap();
    assert_eq!(advisory.worker, "http://127.0.0.1:9001||local-model");
    assert_eq!(advisory.verdict.confidence, 0.8);
    assert_eq!(advisory.verdict.rationale, vec!["because".to_string()]);
}
