//! End-to-end handler tests against a stand-in extension
//!
//! A wiremock server plays the Secrets Manager extension; the handler is
//! wired exactly as the binary wires it, apart from the base URL.

// Integration tests can use unwrap/expect for cleaner assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use secrecy::SecretString;
use sms_function::{Backend, FunctionConfig, InvocationResult, SecretFetchHandler};
use sms_secrets::resolvers::SECRETS_TOKEN_HEADER;
use sms_secrets::{ExtensionResolver, PORT_VAR, SECRET_NAME_VAR, SESSION_TOKEN_VAR, SecretError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn handler_for(
    server: &MockServer,
    secret_id: &str,
    token: &str,
) -> SecretFetchHandler<ExtensionResolver> {
    let resolver =
        ExtensionResolver::with_base_url(server.uri(), SecretString::from(token.to_string()))
            .expect("resolver should build");
    SecretFetchHandler::new(resolver, sms_secrets::SecretRef::new(secret_id))
}

#[tokio::test]
async fn test_emails_scenario_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secretsmanager/get"))
        .and(query_param("secretId", "emails"))
        .and(header(SECRETS_TOKEN_HEADER, "abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"SecretString":"user@example.com"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = handler_for(&server, "emails", "abc123").handle().await.unwrap();

    assert_eq!(
        serde_json::to_string(&result).unwrap(),
        r#"{"statusCode":200,"body":"{\"secret\": \"user@example.com\"}"}"#
    );
}

#[tokio::test]
async fn test_any_secret_value_is_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("secretId", "prod/api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"SecretString":"X"}"#))
        .mount(&server)
        .await;

    let result = handler_for(&server, "prod/api-key", "tok")
        .handle()
        .await
        .unwrap();
    assert_eq!(
        result,
        InvocationResult {
            status_code: 200,
            body: r#"{"secret": "X"}"#.to_string(),
        }
    );
}

#[tokio::test]
async fn test_wrong_token_is_not_matched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header(SECRETS_TOKEN_HEADER, "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"SecretString":"X"}"#))
        .mount(&server)
        .await;

    // Unmatched requests get wiremock's 404
    let err = handler_for(&server, "emails", "other-token")
        .handle()
        .await
        .unwrap_err();
    assert!(matches!(err, SecretError::UnexpectedStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_envelope_fails_the_invocation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"SecretString\": "))
        .mount(&server)
        .await;

    let err = handler_for(&server, "emails", "abc123")
        .handle()
        .await
        .unwrap_err();
    assert!(matches!(err, SecretError::InvalidEnvelope { .. }));
}

#[tokio::test]
async fn test_envelope_without_secret_string_fails_the_invocation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"Name":"emails","SecretBinary":"AAEC"}"#),
        )
        .mount(&server)
        .await;

    let err = handler_for(&server, "emails", "abc123")
        .handle()
        .await
        .unwrap_err();
    assert!(matches!(err, SecretError::MissingSecretString { .. }));
}

#[tokio::test]
async fn test_server_error_fails_the_invocation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = handler_for(&server, "emails", "abc123")
        .handle()
        .await
        .unwrap_err();
    assert!(matches!(err, SecretError::UnexpectedStatus { status: 500, .. }));
}

#[test]
fn test_missing_environment_fails_before_any_request() {
    temp_env::with_vars(
        [
            ("SECRET_SOURCE", None),
            (SECRET_NAME_VAR, Some("emails")),
            (PORT_VAR, None),
            (SESSION_TOKEN_VAR, Some("abc123")),
        ],
        || {
            let err = FunctionConfig::from_env().unwrap_err();
            assert!(matches!(err, SecretError::MissingConfig { var: PORT_VAR }));
        },
    );
}

#[test]
fn test_environment_builds_localhost_url() {
    temp_env::with_vars(
        [
            ("SECRET_SOURCE", None),
            ("SECRET_VERSION_ID", None),
            ("SECRET_VERSION_STAGE", None),
            (SECRET_NAME_VAR, Some("emails")),
            (PORT_VAR, Some("2773")),
            (SESSION_TOKEN_VAR, Some("abc123")),
        ],
        || {
            let config = FunctionConfig::from_env().unwrap();
            let Backend::Extension(extension) = &config.backend else {
                panic!("expected extension backend");
            };
            let resolver = ExtensionResolver::new(extension).unwrap();
            assert_eq!(
                resolver.url_for(&config.secret),
                "http://localhost:2773/secretsmanager/get?secretId=emails"
            );
        },
    );
}
