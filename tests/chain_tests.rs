use chrono::{Duration, NaiveDate, TimeZone, Utc};
use receipt_book::core::{
    Branding, ChainOrder, ChainPosition, Payment, PaymentMethod, Receipt, build_installment_draft,
    chain_of, cumulative_paid, remaining, resolve_root,
};
use receipt_book::store::{MemoryStore, ReceiptStore};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn root(total: Option<f64>, paid: f64) -> Receipt {
    let mut r = Receipt::new(&Branding::default(), day());
    r.client_name = "Rachid Benali".into();
    r.purpose = "Kitchen renovation".into();
    r.total_price = total;
    r.paid_amount = Some(paid);
    r.created_at = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
    r
}

#[test]
fn collect_then_pay_scenario() {
    let mut store = ReceiptStore::open(MemoryStore::new()).unwrap();
    let r1 = root(Some(1000.0), 400.0);
    let r1_id = r1.id;
    let r1_number = r1.receipt_number.clone();
    store.save_receipt(r1).unwrap();

    let mut draft = store.collect_installment(r1_id, day()).unwrap();
    assert_eq!(draft.parent_id(), Some(r1_id));
    assert_eq!(draft.total_price, Some(1000.0));
    assert_eq!(draft.previous_payments().len(), 1);
    assert_eq!(draft.previous_payments()[0].receipt_number, r1_number);
    assert_eq!(draft.previous_payments()[0].amount, 400.0);
    assert_eq!(draft.previous_payments()[0].method, PaymentMethod::Cash.label());

    draft.paid_amount = Some(300.0);
    let child_id = draft.id;
    store.save_receipt(draft).unwrap();

    let child = store.get(child_id).unwrap();
    assert_eq!(cumulative_paid(child), 700.0);
    assert_eq!(remaining(child), Some(300.0));
}

#[test]
fn ledger_grows_with_chain_and_is_chronological() {
    let r = root(Some(900.0), 300.0);
    let mut all = vec![r.clone()];
    for (i, paid) in [200.0, 100.0].into_iter().enumerate() {
        let mut d = build_installment_draft(&r, &all, &Branding::default(), day());
        d.paid_amount = Some(paid);
        d.created_at = r.created_at + Duration::days(i as i64 + 1);
        all.insert(0, d);
    }

    let draft = build_installment_draft(&all[0], &all, &Branding::default(), day());
    let ledger = draft.previous_payments();
    assert_eq!(ledger.len(), 1 + chain_of(r.id, &all, ChainOrder::Chronological).len());
    let amounts: Vec<f64> = ledger.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![300.0, 200.0, 100.0]);
    assert_eq!(cumulative_paid(&draft), 600.0);
    assert_eq!(remaining(&draft), Some(300.0));
}

#[test]
fn ledger_is_a_frozen_snapshot() {
    let mut store = ReceiptStore::open(MemoryStore::new()).unwrap();
    let r = root(Some(500.0), 100.0);
    let root_id = r.id;
    store.save_receipt(r).unwrap();

    let mut child = store.collect_installment(root_id, day()).unwrap();
    child.paid_amount = Some(50.0);
    let child_id = child.id;
    store.save_receipt(child).unwrap();

    let mut edited = store.get(root_id).unwrap().clone();
    edited.paid_amount = Some(250.0);
    store.save_receipt(edited).unwrap();

    let child = store.get(child_id).unwrap();
    assert_eq!(child.previous_payments()[0].amount, 100.0);
    assert_eq!(cumulative_paid(child), 150.0);
}

#[test]
fn chains_are_disjoint_and_one_level_deep() {
    let a = root(None, 10.0);
    let b = root(None, 20.0);
    let mut all = vec![a.clone(), b.clone()];
    let a1 = build_installment_draft(&a, &all, &Branding::default(), day());
    all.push(a1.clone());
    // Collecting from an installment attaches to the root, not the installment.
    let a2 = build_installment_draft(&a1, &all, &Branding::default(), day());
    all.push(a2.clone());
    let b1 = build_installment_draft(&b, &all, &Branding::default(), day());
    all.push(b1);

    let chain_a = chain_of(a.id, &all, ChainOrder::NewestFirst);
    let chain_b = chain_of(b.id, &all, ChainOrder::NewestFirst);
    assert_eq!(chain_a.len(), 2);
    assert_eq!(chain_b.len(), 1);
    assert!(chain_a.iter().all(|r| r.parent_id() == Some(a.id)));
    assert!(chain_a.iter().all(|r| !chain_b.iter().any(|o| o.id == r.id)));
    assert!(chain_of(a1.id, &all, ChainOrder::NewestFirst).is_empty());
    assert!(all.iter().all(|r| r.is_root() != r.parent_id().is_some()));
}

#[test]
fn deleting_root_orphans_installments() {
    let mut store = ReceiptStore::open(MemoryStore::new()).unwrap();
    let r = root(Some(800.0), 200.0);
    let root_id = r.id;
    store.save_receipt(r).unwrap();
    let child = store.collect_installment(root_id, day()).unwrap();
    let child_id = child.id;
    store.save_receipt(child).unwrap();

    store.delete(root_id, |_| true).unwrap();
    let orphan = store.get(child_id).unwrap();
    assert_eq!(orphan.parent_id(), Some(root_id));
    assert_eq!(resolve_root(orphan, store.receipts()).id, child_id);

    // A new installment against the orphan keeps pointing at the missing root.
    let draft = store.collect_installment(child_id, day()).unwrap();
    assert_eq!(draft.parent_id(), Some(root_id));
    assert_eq!(draft.previous_payments().len(), 1);
    assert_eq!(draft.previous_payments()[0].receipt_number, orphan.receipt_number);
}

#[test]
fn draft_resets_payment_fields() {
    let mut r = root(Some(100.0), 40.0);
    r.payment = Payment::Cheque {
        cheque_number: Some("55".into()),
        bank_name: Some("BMCE".into()),
        due_date: None,
    };
    r.signature = Some("data:image/png;base64,AA==".into());
    let draft = build_installment_draft(&r, &[r.clone()], &Branding::default(), day());
    assert_eq!(draft.payment, Payment::Cash);
    assert!(draft.signature.is_none());
    assert_ne!(draft.id, r.id);
    assert!(matches!(draft.position, ChainPosition::Installment { .. }));
}
