use chrono::NaiveDate;

use api_types::safe::SafeKind;
use api_types::transfer::{LegKind, LegRow, LegStatus};
use engine::{
    DecisionForm, EngineError, PageMeta, SearchQuery, TokenGate, TransferFilter, TransferSort,
    TransferStatus, Verdict, known_safes, reconcile, sort_transfers,
};

fn leg(id: i64, kind: LegKind, status: LegStatus, reference: Option<&str>) -> LegRow {
    LegRow {
        id,
        kind,
        amount: 150.75,
        status,
        safe_id: Some(1),
        safe_name: Some("Cassa centrale".to_string()),
        safe_type: Some(SafeKind::Company),
        counterpart_safe_id: Some(2),
        counterpart_safe_name: Some("Cassa agente".to_string()),
        counterpart_safe_type: Some(SafeKind::Rep),
        date: NaiveDate::from_ymd_opt(2026, 8, 1),
        created_at: None,
        user_id: Some(5),
        user_name: Some("alice".to_string()),
        approved_by_name: None,
        approved_date: None,
        reference: reference.map(str::to_string),
        notes: None,
        admin_notes: None,
    }
}

#[test]
fn paired_legs_reconcile_to_one_transfer() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Pending, Some("A")),
        leg(2, LegKind::TransferIn, LegStatus::Pending, Some("A")),
    ];

    let transfers = reconcile(rows);
    assert_eq!(transfers.len(), 1);

    let transfer = &transfers[0];
    assert_eq!(transfer.out_id, Some(1));
    assert_eq!(transfer.in_id, Some(2));
    assert_eq!(transfer.status, TransferStatus::Pending);
    assert_eq!(transfer.canonical_id(), Some(1));
    assert!(!transfer.is_degraded());
    assert_eq!(transfer.amount.minor(), 15075);
    assert_eq!(transfer.source.id, Some(1));
    assert_eq!(transfer.destination.id, Some(2));
}

#[test]
fn pending_out_keeps_transfer_pending() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Pending, Some("A")),
        leg(2, LegKind::TransferIn, LegStatus::Approved, Some("A")),
    ];
    assert_eq!(reconcile(rows)[0].status, TransferStatus::Pending);
}

#[test]
fn rejection_wins_over_approval() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Rejected, Some("A")),
        leg(2, LegKind::TransferIn, LegStatus::Approved, Some("A")),
    ];
    assert_eq!(reconcile(rows)[0].status, TransferStatus::Rejected);
}

#[test]
fn both_approved_is_approved() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Approved, Some("A")),
        leg(2, LegKind::TransferIn, LegStatus::Approved, Some("A")),
    ];
    assert_eq!(reconcile(rows)[0].status, TransferStatus::Approved);
}

#[test]
fn output_accounts_for_every_reference_and_single() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Pending, Some("A")),
        leg(2, LegKind::TransferIn, LegStatus::Pending, Some("A")),
        leg(3, LegKind::TransferOut, LegStatus::Approved, Some("B")),
        leg(4, LegKind::TransferOut, LegStatus::Pending, None),
        leg(5, LegKind::TransferIn, LegStatus::Pending, None),
    ];

    // Two references plus two reference-less singles.
    let transfers = reconcile(rows);
    assert_eq!(transfers.len(), 4);
}

#[test]
fn duplicate_same_side_reference_is_not_dropped() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Pending, Some("A")),
        leg(2, LegKind::TransferIn, LegStatus::Pending, Some("A")),
        leg(3, LegKind::TransferOut, LegStatus::Pending, Some("A")),
    ];

    let transfers = reconcile(rows);
    assert_eq!(transfers.len(), 2);
    assert!(transfers.iter().any(|t| t.out_id == Some(3)));
}

#[test]
fn lone_in_leg_swaps_roles_and_degrades() {
    let rows = vec![leg(7, LegKind::TransferIn, LegStatus::Pending, None)];

    let transfers = reconcile(rows);
    let transfer = &transfers[0];

    // The in leg is recorded against the destination safe; its counterpart
    // is where the money left.
    assert_eq!(transfer.source.id, Some(2));
    assert_eq!(transfer.destination.id, Some(1));
    assert_eq!(transfer.out_id, None);
    assert_eq!(transfer.canonical_id(), Some(7));
    assert!(transfer.is_degraded());
}

#[test]
fn missing_safe_names_degrade_to_placeholder() {
    let mut row = leg(1, LegKind::TransferOut, LegStatus::Pending, None);
    row.counterpart_safe_id = None;
    row.counterpart_safe_name = None;
    row.counterpart_safe_type = None;

    let transfers = reconcile(vec![row]);
    assert_eq!(transfers[0].destination.label(), "—");
}

#[test]
fn empty_filter_keeps_the_whole_set() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Pending, Some("A")),
        leg(2, LegKind::TransferIn, LegStatus::Pending, Some("A")),
        leg(3, LegKind::TransferOut, LegStatus::Approved, Some("B")),
    ];
    let transfers = reconcile(rows);

    let filter = TransferFilter::default();
    assert!(filter.is_empty());
    assert_eq!(filter.apply(&transfers).len(), transfers.len());
}

#[test]
fn explicit_id_search_matches_either_leg_only() {
    let rows = vec![
        leg(42, LegKind::TransferOut, LegStatus::Pending, Some("A")),
        leg(43, LegKind::TransferIn, LegStatus::Pending, Some("A")),
        leg(44, LegKind::TransferOut, LegStatus::Pending, Some("B")),
    ];
    let transfers = reconcile(rows);

    for query in ["#42", "id:42", "id=42", "#43"] {
        let filter = TransferFilter {
            search: SearchQuery::parse(query),
            ..Default::default()
        };
        let hits = filter.apply(&transfers);
        assert_eq!(hits.len(), 1, "query {query}");
        assert_eq!(hits[0].out_id, Some(42));
    }

    // "alice" appears on every leg, but an id query never free-text matches.
    let filter = TransferFilter {
        search: SearchQuery::parse("#9999"),
        ..Default::default()
    };
    assert!(filter.apply(&transfers).is_empty());
}

#[test]
fn explicit_transfer_id_field_matches_either_leg() {
    let rows = vec![
        leg(42, LegKind::TransferOut, LegStatus::Pending, Some("A")),
        leg(43, LegKind::TransferIn, LegStatus::Pending, Some("A")),
        leg(44, LegKind::TransferOut, LegStatus::Pending, Some("B")),
    ];
    let transfers = reconcile(rows);

    let filter = TransferFilter {
        transfer_id: Some(43),
        ..Default::default()
    };
    let hits = filter.apply(&transfers);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].in_id, Some(43));
}

#[test]
fn free_text_matches_names_amount_and_reference() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Pending, Some("TRX-77")),
        {
            let mut other = leg(2, LegKind::TransferOut, LegStatus::Pending, Some("TRX-88"));
            other.user_name = Some("Josè".to_string());
            other.amount = 9.5;
            other
        },
    ];
    let transfers = reconcile(rows);

    let by_user = TransferFilter {
        search: SearchQuery::parse("jose"),
        ..Default::default()
    };
    assert_eq!(by_user.apply(&transfers).len(), 1);

    let by_reference = TransferFilter {
        search: SearchQuery::parse("trx-77"),
        ..Default::default()
    };
    assert_eq!(by_reference.apply(&transfers).len(), 1);

    let by_amount = TransferFilter {
        search: SearchQuery::parse("9.50"),
        ..Default::default()
    };
    assert_eq!(by_amount.apply(&transfers).len(), 1);
}

#[test]
fn date_range_is_inclusive_on_both_ends() {
    let mut early = leg(1, LegKind::TransferOut, LegStatus::Pending, None);
    early.date = NaiveDate::from_ymd_opt(2026, 7, 31);
    let edge = leg(2, LegKind::TransferOut, LegStatus::Pending, None);
    let mut late = leg(3, LegKind::TransferOut, LegStatus::Pending, None);
    late.date = NaiveDate::from_ymd_opt(2026, 8, 2);

    let transfers = reconcile(vec![early, edge, late]);
    let filter = TransferFilter {
        date_from: NaiveDate::from_ymd_opt(2026, 8, 1),
        date_to: NaiveDate::from_ymd_opt(2026, 8, 2),
        ..Default::default()
    };

    let hits = filter.apply(&transfers);
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|t| t.out_id != Some(1)));
}

#[test]
fn status_and_safe_filters_combine() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Pending, Some("A")),
        leg(2, LegKind::TransferOut, LegStatus::Approved, Some("B")),
    ];
    let transfers = reconcile(rows);

    let filter = TransferFilter {
        status: Some(TransferStatus::Approved),
        source_safe_id: Some(1),
        dest_safe_id: Some(2),
        user_id: Some(5),
        ..Default::default()
    };
    let hits = filter.apply(&transfers);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].out_id, Some(2));

    let wrong_safe = TransferFilter {
        dest_safe_id: Some(99),
        ..Default::default()
    };
    assert!(wrong_safe.apply(&transfers).is_empty());
}

#[test]
fn sort_orders_are_stable_and_reversible() {
    let mut cheap = leg(1, LegKind::TransferOut, LegStatus::Pending, None);
    cheap.amount = 10.0;
    cheap.date = NaiveDate::from_ymd_opt(2026, 8, 3);
    let mut dear = leg(2, LegKind::TransferOut, LegStatus::Pending, None);
    dear.amount = 500.0;
    dear.date = NaiveDate::from_ymd_opt(2026, 8, 1);

    let mut transfers = reconcile(vec![cheap, dear]);

    sort_transfers(&mut transfers, TransferSort::DateDesc);
    assert_eq!(transfers[0].out_id, Some(1));

    sort_transfers(&mut transfers, TransferSort::AmountDesc);
    assert_eq!(transfers[0].out_id, Some(2));

    sort_transfers(&mut transfers, TransferSort::AmountAsc);
    assert_eq!(transfers[0].out_id, Some(1));
}

#[test]
fn decision_is_refused_once_resolved() {
    let rows = vec![leg(1, LegKind::TransferOut, LegStatus::Approved, None)];
    let transfers = reconcile(rows);

    let mut form = DecisionForm::new();
    assert!(!form.can_decide(&transfers[0]));
    assert_eq!(
        form.begin(&transfers[0], Verdict::Approve),
        Err(EngineError::NotPending)
    );
}

#[test]
fn decision_runs_once_and_keeps_note_on_failure() {
    let rows = vec![leg(1, LegKind::TransferOut, LegStatus::Pending, Some("A"))];
    let transfers = reconcile(rows);

    let mut form = DecisionForm::new();
    form.note = "verificato con l'agente".to_string();

    let request = form.begin(&transfers[0], Verdict::Approve).unwrap();
    assert_eq!(request.transaction_id, 1);
    assert_eq!(request.note.as_deref(), Some("verificato con l'agente"));
    assert!(form.in_flight());

    // No double submit while the call is out.
    assert_eq!(
        form.begin(&transfers[0], Verdict::Reject),
        Err(EngineError::DecisionInFlight)
    );

    form.fail();
    assert!(!form.in_flight());
    assert_eq!(form.note, "verificato con l'agente");

    let retry = form.begin(&transfers[0], Verdict::Reject).unwrap();
    assert_eq!(retry.status, api_types::transfer::LegStatus::Rejected);
    form.succeed();
    assert!(form.note.is_empty());
}

#[test]
fn decision_addresses_the_in_leg_when_out_is_missing() {
    let rows = vec![leg(7, LegKind::TransferIn, LegStatus::Pending, None)];
    let transfers = reconcile(rows);

    let mut form = DecisionForm::new();
    let request = form.begin(&transfers[0], Verdict::Approve).unwrap();
    assert_eq!(request.transaction_id, 7);
}

#[test]
fn stale_response_never_renders() {
    let mut gate = TokenGate::new();

    let first = gate.issue();
    let second = gate.issue();

    // First response arrives after the second query was issued: discard.
    assert!(!gate.admit(first));
    // The newer query's response is the one that renders.
    assert!(gate.admit(second));
    assert!(!gate.is_loading());
}

#[test]
fn pagination_math_holds_for_small_grid() {
    for (total, per_page, expected) in [
        (0u64, 10u64, 1u64),
        (1, 10, 1),
        (10, 10, 1),
        (11, 10, 2),
        (100, 7, 15),
    ] {
        assert_eq!(PageMeta::total_pages(total, per_page), expected);
    }
}

#[test]
fn known_safes_deduplicates_across_transfers() {
    let rows = vec![
        leg(1, LegKind::TransferOut, LegStatus::Pending, Some("A")),
        leg(2, LegKind::TransferOut, LegStatus::Pending, Some("B")),
    ];
    let transfers = reconcile(rows);

    let safes = known_safes(&transfers);
    assert_eq!(safes.len(), 2);
    assert_eq!(safes[0].id, Some(1));
    assert_eq!(safes[1].id, Some(2));
}
