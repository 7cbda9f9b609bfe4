//! Integration tests for the mollie CLI
//!
//! These run the binary end-to-end with assert_cmd against a stub HTTP
//! server on localhost that answers with canned API responses.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

const KEY: &str = "test_dHar4XY7LxsDOtmnkVtjNVWXLSlXsM";

/// A `mollie` command isolated from the user's environment and config
fn mollie(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mollie").unwrap();
    cmd.env_remove("MOLLIE_API_KEY")
        .env_remove("MOLLIE_TESTMODE")
        .env_remove("MOLLIE_FORMAT")
        .env_remove("MOLLIE_LOG")
        .env("MOLLIE_CONFIG", config_dir.path().join("config.yaml"))
        // nothing listens here; commands that should not reach the API fail fast
        .env("MOLLIE_API_URL", "http://127.0.0.1:9/v2");
    cmd
}

/// Serve one canned response per connection, returning the request heads
struct Stub {
    url: String,
    handle: JoinHandle<Vec<String>>,
}

impl Stub {
    fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v2", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                requests.push(read_head(&mut stream));

                let reason = match status {
                    200 => "OK",
                    401 => "Unauthorized",
                    404 => "Not Found",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/hal+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
            requests
        });

        Self { url, handle }
    }

    fn requests(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_head(stream: &mut impl Read) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

fn payment_json(id: &str, value: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "resource": "payment",
        "id": id,
        "mode": "test",
        "amount": {"value": value, "currency": "EUR"},
        "status": status,
        "description": format!("Order {id}"),
        "method": "ideal",
        "createdAt": "2024-03-01T09:15:00+00:00",
        "_links": {"self": {"href": format!("https://api.mollie.com/v2/payments/{id}")}}
    })
}

fn payment_list(payments: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "count": payments.len(),
        "_embedded": {"payments": payments},
        "_links": {"next": null}
    })
    .to_string()
}

fn two_payments() -> String {
    payment_list(vec![
        payment_json("tr_first", "10.00", "paid"),
        payment_json("tr_second", "25.50", "open"),
    ])
}

fn not_found(id: &str) -> String {
    serde_json::json!({
        "status": 404,
        "title": "Not Found",
        "detail": format!("No payment exists with token {id}.")
    })
    .to_string()
}

// ============================================================================
// Help and completions
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let tmp = TempDir::new().unwrap();
    mollie(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("payments"))
        .stdout(predicate::str::contains("methods"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_completions_need_no_key() {
    let tmp = TempDir::new().unwrap();
    mollie(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mollie"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    mollie(&tmp).arg("refund-everything").assert().code(2);
}

// ============================================================================
// Credentials
// ============================================================================

#[test]
fn test_missing_key_fails_every_api_command() {
    let tmp = TempDir::new().unwrap();
    let commands: [&[&str]; 5] = [
        &["payments", "list"],
        &["payments", "show", "tr_123"],
        &["methods", "list"],
        &["list", "customers"],
        &["get", "tr_123"],
    ];

    for args in commands {
        mollie(&tmp)
            .args(args)
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("error:"))
            .stderr(predicate::str::contains("no API key given"));
    }
}

#[test]
fn test_bad_key_prefix() {
    let tmp = TempDir::new().unwrap();
    mollie(&tmp)
        .args(["payments", "list", "--key", "sk_abc123"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("test_, live_, access_"));
}

#[test]
fn test_key_from_config_file() {
    let tmp = TempDir::new().unwrap();
    let stub = Stub::start(vec![(200, two_payments())]);
    std::fs::write(
        tmp.path().join("config.yaml"),
        format!("api_key: {KEY}\ndefault_format: id\n"),
    )
    .unwrap();

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["payments", "list"])
        .assert()
        .success()
        .stdout("tr_first\ntr_second\n");

    let requests = stub.requests();
    assert!(requests[0].contains(&format!("Bearer {KEY}")));
}

#[test]
fn test_key_flag_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    let stub = Stub::start(vec![(200, two_payments())]);
    std::fs::write(
        tmp.path().join("config.yaml"),
        "api_key: test_fromConfigFile123\n",
    )
    .unwrap();

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["payments", "list", "-k", KEY])
        .assert()
        .success();

    let requests = stub.requests();
    assert!(requests[0].contains(&format!("Bearer {KEY}")));
    assert!(!requests[0].contains("test_fromConfigFile123"));
}

#[test]
fn test_rejected_key_is_auth_error() {
    let tmp = TempDir::new().unwrap();
    let body = r#"{"status":401,"title":"Unauthorized Request","detail":"Missing authentication, or failed to authenticate"}"#;
    let stub = Stub::start(vec![(401, body.to_string())]);

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["payments", "list", "-k", KEY])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("authentication failed"));
    stub.requests();
}

#[test]
fn test_access_token_testmode_param() {
    let tmp = TempDir::new().unwrap();
    let stub = Stub::start(vec![(200, two_payments())]);

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["payments", "list", "-k", "access_abc123", "--testmode"])
        .assert()
        .success();

    let requests = stub.requests();
    assert!(requests[0].contains("testmode=true"));
}

// ============================================================================
// Payments
// ============================================================================

#[test]
fn test_payments_list_limit() {
    let tmp = TempDir::new().unwrap();
    let stub = Stub::start(vec![(200, two_payments())]);

    let output = mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["payments", "list", "--limit", "2", "-k", KEY])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows: Vec<&str> = stdout.lines().filter(|l| l.contains("tr_")).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains("tr_first") && rows[0].contains("paid"));
    assert!(rows[1].contains("tr_second") && rows[1].contains("25.50"));
    assert!(stdout.contains("CREATED"));

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /v2/payments?limit=2"));
}

#[test]
fn test_payments_list_cursor_is_forwarded() {
    let tmp = TempDir::new().unwrap();
    for flag in ["--from", "--offset"] {
        let stub = Stub::start(vec![(200, two_payments())]);

        mollie(&tmp)
            .env("MOLLIE_API_URL", &stub.url)
            .args(["payments", "list", "--limit", "5", flag, "tr_second", "-k", KEY])
            .assert()
            .success();

        let requests = stub.requests();
        assert!(requests[0].starts_with("GET /v2/payments?"));
        assert!(requests[0].contains("limit=5"));
        assert!(requests[0].contains("from=tr_second"));
    }
}

#[test]
fn test_payments_list_csv() {
    let tmp = TempDir::new().unwrap();
    let stub = Stub::start(vec![(200, two_payments())]);

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["payments", "list", "-k", KEY, "--format", "csv"])
        .assert()
        .success()
        .stdout(
            "id,amount,currency,status,description,created\n\
             tr_first,10.00,EUR,paid,Order tr_first,2024-03-01T09:15:00+00:00\n\
             tr_second,25.50,EUR,open,Order tr_second,2024-03-01T09:15:00+00:00\n",
        );
    stub.requests();
}

#[test]
fn test_payments_list_json() {
    let tmp = TempDir::new().unwrap();
    let stub = Stub::start(vec![(200, two_payments())]);

    let output = mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .env("MOLLIE_FORMAT", "json")
        .args(["payments", "list", "-k", KEY])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let payments = parsed.as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0]["id"], "tr_first");
    assert_eq!(payments[1]["amount"]["value"], "25.50");
    stub.requests();
}

#[test]
fn test_payments_list_empty_prints_header() {
    let tmp = TempDir::new().unwrap();
    let stub = Stub::start(vec![(200, r#"{"count":0,"_embedded":{"payments":[]}}"#.to_string())]);

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["payments", "list", "-k", KEY])
        .assert()
        .success()
        .stdout(predicate::str::contains("ID"))
        .stdout(predicate::str::contains("tr_").not());
    stub.requests();
}

#[test]
fn test_payments_list_bad_limit_is_validation_error() {
    let tmp = TempDir::new().unwrap();
    for limit in ["0", "251"] {
        mollie(&tmp)
            .args(["payments", "list", "--limit", limit, "-k", KEY])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("error:"));
    }
}

#[test]
fn test_payments_show() {
    let tmp = TempDir::new().unwrap();
    let stub = Stub::start(vec![(200, payment_json("tr_123", "10.00", "paid").to_string())]);

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["payments", "show", "tr_123", "-k", KEY])
        .assert()
        .success()
        .stdout(predicate::str::contains("tr_123"))
        .stdout(predicate::str::contains("Order tr_123"));

    let requests = stub.requests();
    assert!(requests[0].starts_with("GET /v2/payments/tr_123 "));
}

#[test]
fn test_payments_show_not_found() {
    let tmp = TempDir::new().unwrap();
    let stub = Stub::start(vec![(404, not_found("tr_123"))]);

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["payments", "show", "tr_123", "-k", KEY])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("No payment exists with token tr_123."));
    stub.requests();
}

#[test]
fn test_payments_show_rejects_foreign_id() {
    let tmp = TempDir::new().unwrap();
    mollie(&tmp)
        .args(["payments", "show", "../customers", "-k", KEY])
        .assert()
        .code(2);
}

#[test]
fn test_upstream_error_status() {
    let tmp = TempDir::new().unwrap();
    let body = r#"{"status":422,"title":"Unprocessable Entity","detail":"The amount is too low"}"#;
    let stub = Stub::start(vec![(422, body.to_string())]);

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["methods", "list", "--amount", "0.01", "--currency", "EUR", "-k", KEY])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("422"))
        .stderr(predicate::str::contains("The amount is too low"));

    let requests = stub.requests();
    assert!(requests[0].contains("amount%5Bvalue%5D=0.01") || requests[0].contains("amount[value]=0.01"));
}

// ============================================================================
// Methods and generic resources
// ============================================================================

#[test]
fn test_methods_list() {
    let tmp = TempDir::new().unwrap();
    let body = serde_json::json!({
        "count": 2,
        "_embedded": {"methods": [
            {"resource": "method", "id": "ideal", "description": "iDEAL",
             "minimumAmount": {"value": "0.01", "currency": "EUR"},
             "maximumAmount": {"value": "50000.00", "currency": "EUR"}},
            {"resource": "method", "id": "creditcard", "description": "Card"}
        ]}
    });
    let stub = Stub::start(vec![(200, body.to_string())]);

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["methods", "list", "-k", KEY, "-f", "md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| ideal"))
        .stdout(predicate::str::contains("50000.00 EUR"));
    stub.requests();
}

#[test]
fn test_generic_list_and_get() {
    let tmp = TempDir::new().unwrap();
    let customer = serde_json::json!({
        "resource": "customer", "id": "cst_8wmqcHMN4U", "name": "Customer A",
        "email": "customer@example.org"
    });
    let list = serde_json::json!({"count": 1, "_embedded": {"customers": [customer.clone()]}});
    let stub = Stub::start(vec![(200, list.to_string()), (200, customer.to_string())]);

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["list", "cust", "-k", KEY, "-f", "csv"])
        .assert()
        .success()
        .stdout("id,email\ncst_8wmqcHMN4U,customer@example.org\n");

    mollie(&tmp)
        .env("MOLLIE_API_URL", &stub.url)
        .args(["get", "cst_8wmqcHMN4U", "-k", KEY])
        .assert()
        .success()
        .stdout(predicate::str::contains("PROPERTY"))
        .stdout(predicate::str::contains("Customer A"));

    let requests = stub.requests();
    assert!(requests[0].starts_with("GET /v2/customers?limit=10"));
    assert!(requests[1].starts_with("GET /v2/customers/cst_8wmqcHMN4U "));
}

#[test]
fn test_generic_list_unknown_resource() {
    let tmp = TempDir::new().unwrap();
    mollie(&tmp)
        .args(["list", "widgets", "-k", KEY])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no resource found for name 'widgets'"));
}
