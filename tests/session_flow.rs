//! End-to-end command scenarios through the router
//!
//! These tests drive full request lines (as they would arrive off the
//! wire) through the command router against a live in-memory ledger, and
//! assert on the exact response lines. They cover the provisioning
//! surface, the authentication state machine, access control, and the
//! money-movement invariants.

use rstest::rstest;
use rust_banking_server::storage::MemoryStore;
use rust_banking_server::{Ledger, Router, Session};
use std::sync::Arc;

fn router() -> Router {
    Router::new(Ledger::new(Arc::new(MemoryStore::new())))
}

fn send(router: &Router, session: &mut Session, line: &str) -> String {
    router.handle_line(session, line).response.to_line()
}

/// Provision a client via the admin surface; returns (clientId, accountNumber)
fn provision(router: &Router, first: &str, last: &str, national_id: &str, pw: &str) -> (String, String) {
    let mut admin = Session::new();
    let line = send(
        router,
        &mut admin,
        &format!("ADMIN;ADD_CLIENT;{first};{last};{national_id};{pw}"),
    );
    let fields: Vec<&str> = line.split(';').collect();
    assert_eq!(&fields[..2], &["OK", "CLIENT_ADDED"], "unexpected: {line}");
    (fields[2].to_string(), fields[3].to_string())
}

/// Read any account's balance through the admin surface
fn balance_of(router: &Router, number: &str) -> String {
    let mut admin = Session::new();
    let line = send(
        router,
        &mut admin,
        &format!("ADMIN;GET_ACCOUNT_DETAILS;{number}"),
    );
    let fields: Vec<&str> = line.split(';').collect();
    assert_eq!(fields[0], "ACCOUNT_DETAILS", "unexpected: {line}");
    fields[3].to_string()
}

#[test]
fn test_provisioning_and_money_movement_scenario() {
    let router = router();

    // Admin creates Anna; the response carries a fresh client id and a
    // generated zero-balance account.
    let (anna_id, account_a) = provision(&router, "Anna", "Kowalska", "12345678901", "pw1");
    assert!(account_a.starts_with("PL"));
    assert_eq!(account_a.len(), 28);
    assert_eq!(balance_of(&router, &account_a), "0");

    // Anna logs in and is greeted by first name.
    let mut session = Session::new();
    assert_eq!(
        send(&router, &mut session, &format!("LOGIN;{anna_id};pw1")),
        format!("OK;LOGIN_SUCCESSFUL;Anna;{anna_id}")
    );

    // Deposit funds.
    assert_eq!(
        send(&router, &mut session, &format!("DEPOSIT;{account_a};100.00")),
        "OK;DEPOSIT_SUCCESSFUL;100.00"
    );

    // Overdraft is rejected and nothing moves.
    assert_eq!(
        send(&router, &mut session, &format!("WITHDRAW;{account_a};150.00")),
        "INSUFFICIENT_FUNDS"
    );
    assert_eq!(
        send(&router, &mut session, &format!("BALANCE;{account_a}")),
        "BALANCE_IS;100.00"
    );

    // A second client with a zero-balance account receives a transfer.
    let (_, account_b) = provision(&router, "Jan", "Nowak", "22222222222", "pw2");
    assert_eq!(
        send(
            &router,
            &mut session,
            &format!("TRANSFER;{account_a};{account_b};40.00")
        ),
        "OK;TRANSFER_SUCCESSFUL"
    );
    assert_eq!(balance_of(&router, &account_a), "60.00");
    assert_eq!(balance_of(&router, &account_b), "40.00");

    // Same-account transfer never reaches storage.
    let line = send(
        &router,
        &mut session,
        &format!("TRANSFER;{account_a};{account_a};1.00"),
    );
    assert!(line.starts_with("ERROR;PARAM;"), "unexpected: {line}");
    assert_eq!(balance_of(&router, &account_a), "60.00");
}

#[test]
fn test_transfer_sum_invariant_and_failure_atomicity() {
    let router = router();
    let (anna_id, account_a) = provision(&router, "Anna", "Kowalska", "12345678901", "pw1");
    let (_, account_b) = provision(&router, "Jan", "Nowak", "22222222222", "pw2");

    let mut session = Session::new();
    send(&router, &mut session, &format!("LOGIN;{anna_id};pw1"));
    send(&router, &mut session, &format!("DEPOSIT;{account_a};75.25"));
    send(&router, &mut session, &format!("DEPOSIT;{account_b};24.75"));

    // Successful transfer: the two balances change by exactly the amount.
    assert_eq!(
        send(
            &router,
            &mut session,
            &format!("TRANSFER;{account_a};{account_b};0.25")
        ),
        "OK;TRANSFER_SUCCESSFUL"
    );
    assert_eq!(balance_of(&router, &account_a), "75.00");
    assert_eq!(balance_of(&router, &account_b), "25.00");

    // Failed transfer: both balances equal their pre-call values.
    assert_eq!(
        send(
            &router,
            &mut session,
            &format!("TRANSFER;{account_a};{account_b};75.01")
        ),
        "INSUFFICIENT_FUNDS"
    );
    assert_eq!(balance_of(&router, &account_a), "75.00");
    assert_eq!(balance_of(&router, &account_b), "25.00");
}

#[test]
fn test_balance_reads_are_idempotent() {
    let router = router();
    let (anna_id, account) = provision(&router, "Anna", "Kowalska", "12345678901", "pw1");

    let mut session = Session::new();
    send(&router, &mut session, &format!("LOGIN;{anna_id};pw1"));
    send(&router, &mut session, &format!("DEPOSIT;{account};12.34"));

    let first = send(&router, &mut session, &format!("BALANCE;{account}"));
    let second = send(&router, &mut session, &format!("BALANCE;{account}"));
    assert_eq!(first, second);
    assert_eq!(first, "BALANCE_IS;12.34");
}

#[rstest]
#[case::balance("BALANCE;PL11111111111111111111111111")]
#[case::withdraw("WITHDRAW;PL11111111111111111111111111;1.00")]
#[case::transfer("TRANSFER;PL11111111111111111111111111;PL22222222222222222222222222;1.00")]
#[case::list("LIST_MY_ACCOUNTS")]
fn test_auth_gate_before_and_after_logout(#[case] line: &str) {
    let router = router();
    let (anna_id, _) = provision(&router, "Anna", "Kowalska", "12345678901", "pw1");

    // Before any login.
    let mut session = Session::new();
    assert!(send(&router, &mut session, line).starts_with("ERROR;AUTH_REQUIRED"));

    // After a login/logout cycle the same gate applies again.
    send(&router, &mut session, &format!("LOGIN;{anna_id};pw1"));
    let reply = router.handle_line(&mut session, "LOGOUT");
    assert!(reply.end_session);
    assert!(send(&router, &mut session, line).starts_with("ERROR;AUTH_REQUIRED"));
}

#[test]
fn test_access_control_on_foreign_accounts() {
    let router = router();
    let (_, foreign) = provision(&router, "Anna", "Kowalska", "12345678901", "pw1");
    let (intruder_id, own) = provision(&router, "Jan", "Nowak", "22222222222", "pw2");

    let mut session = Session::new();
    send(&router, &mut session, &format!("LOGIN;{intruder_id};pw2"));
    send(&router, &mut session, &format!("DEPOSIT;{own};10.00"));

    for line in [
        format!("BALANCE;{foreign}"),
        format!("WITHDRAW;{foreign};1.00"),
        format!("TRANSFER;{foreign};{own};1.00"),
    ] {
        let response = send(&router, &mut session, &line);
        assert_eq!(
            response, "ERROR;ACCESS_DENIED;Account does not belong to you.",
            "for {line}"
        );
    }

    // No mutation happened anywhere.
    assert_eq!(balance_of(&router, &foreign), "0");
    assert_eq!(balance_of(&router, &own), "10.00");
}

#[test]
fn test_client_lifecycle_via_admin_surface() {
    let router = router();
    let mut admin = Session::new();
    let (client_id, first_account) = provision(&router, "Anna", "Kowalska", "12345678901", "pw1");

    // Add a funded second account.
    let line = send(
        &router,
        &mut admin,
        &format!("ADMIN;ADD_ACCOUNT_TO_CLIENT;{client_id};250.00"),
    );
    let second_account = line
        .strip_prefix("OK;ACCOUNT_ADDED_TO_CLIENT;")
        .unwrap_or_else(|| panic!("unexpected: {line}"))
        .to_string();
    assert_eq!(balance_of(&router, &second_account), "250.00");

    // Client info lists both accounts.
    let line = send(
        &router,
        &mut admin,
        &format!("ADMIN;GET_CLIENT_INFO_BY_ID;{client_id}"),
    );
    assert_eq!(
        line,
        format!(
            "CLIENT_INFO;{client_id};Anna;Kowalska;12345678901;{first_account}:0,{second_account}:250.00"
        )
    );

    // Deleting the client cascades to both accounts.
    assert_eq!(
        send(&router, &mut admin, &format!("ADMIN;DELETE_CLIENT;{client_id}")),
        format!("OK;CLIENT_DELETED;{client_id}")
    );
    assert_eq!(
        send(
            &router,
            &mut admin,
            &format!("ADMIN;GET_ACCOUNT_DETAILS;{first_account}")
        ),
        "ACCOUNT_NOT_FOUND"
    );
    assert_eq!(
        send(
            &router,
            &mut admin,
            &format!("ADMIN;GET_CLIENT_INFO_BY_ID;{client_id}")
        ),
        "CLIENT_NOT_FOUND"
    );
}

#[test]
fn test_every_request_line_gets_one_response_line() {
    let router = router();
    let mut session = Session::new();

    // A burst of malformed, unknown and gated requests; each produces
    // exactly one structured response and the session survives them all.
    let requests = [
        "",
        ";;;",
        "FROBNICATE",
        "ADMIN",
        "ADMIN;DROP_TABLES",
        "LOGIN;not-a-number;pw",
        "DEPOSIT;PL11111111111111111111111111;ten",
        "BALANCE;PL11111111111111111111111111",
    ];
    for request in requests {
        let reply = router.handle_line(&mut session, request);
        assert!(!reply.response.to_line().is_empty(), "for {request:?}");
        assert!(!reply.end_session, "for {request:?}");
    }
}
