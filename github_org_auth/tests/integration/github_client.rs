use crate::common::{MockGithub, MockUser, TEST_ORG, github_client, test_config};

use github_org_auth::{
    AccessToken, GithubClient, GithubEndpoints, GithubProvider, ProviderError,
};

#[tokio::test]
async fn test_exchange_and_fetch_against_mock_github() {
    let mock = MockGithub::start().await;
    let client = github_client(&test_config(&mock));
    let code = mock.issue_code(&MockUser::new("octocat", 42, &["other", TEST_ORG]));

    let token = client.exchange_code(&code).await.expect("Token exchange failed");
    assert_eq!(token.secret(), format!("gho_{code}"));

    let user = client
        .get_authenticated_user(&token)
        .await
        .expect("Failed to fetch user");
    assert_eq!(user.login, "octocat");
    assert_eq!(user.id, 42);

    let orgs = client
        .get_user_organizations(&token)
        .await
        .expect("Failed to fetch organizations");
    let logins: Vec<_> = orgs.iter().map(|o| o.login.as_str()).collect();
    assert_eq!(logins, vec!["other", TEST_ORG]);
}

#[tokio::test]
async fn test_error_body_with_ok_status_fails_exchange() {
    let mock = MockGithub::start().await;
    let client = github_client(&test_config(&mock));

    let err = client
        .exchange_code("not-a-real-code")
        .await
        .expect_err("Unknown code must fail");

    match err {
        ProviderError::TokenExchange(message) => {
            assert!(message.contains("bad_verification_code"), "{message}");
        }
        other => panic!("Expected TokenExchange, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_client_secret_fails_exchange() {
    let mock = MockGithub::start().await;
    let client = GithubClient::new("mock-client-id", "wrong-secret", mock.endpoints())
        .expect("client");
    let code = mock.issue_code(&MockUser::new("octocat", 1, &[TEST_ORG]));

    let err = client.exchange_code(&code).await.expect_err("Must fail");
    assert!(
        matches!(
            &err,
            ProviderError::TokenExchange(m) if m.contains("incorrect_client_credentials")
        ),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_rejected_token_is_a_fetch_error() {
    let mock = MockGithub::start().await;
    let client = github_client(&test_config(&mock));
    let token = AccessToken::new("gho_forged");

    let err = client
        .get_authenticated_user(&token)
        .await
        .expect_err("Forged token must fail");
    assert!(matches!(err, ProviderError::FetchUserInfo(_)));

    let err = client
        .get_user_organizations(&token)
        .await
        .expect_err("Forged token must fail");
    assert!(matches!(err, ProviderError::FetchOrganizations(_)));
}

#[tokio::test]
async fn test_upstream_failure_is_reported() {
    let mock = MockGithub::start().await;
    let client = github_client(&test_config(&mock));
    let code = mock.issue_code(&MockUser::new("octocat", 1, &[TEST_ORG]));
    let token = client.exchange_code(&code).await.expect("Token exchange failed");

    mock.break_api();
    let err = client
        .get_user_organizations(&token)
        .await
        .expect_err("Broken API must fail");
    match err {
        ProviderError::FetchOrganizations(message) => assert!(message.contains("502"), "{message}"),
        other => panic!("Expected FetchOrganizations, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_reported() {
    // Port 9 (discard) on localhost is expected to refuse connections.
    let client = GithubClient::new(
        "id",
        "secret",
        GithubEndpoints::with_base("http://127.0.0.1:9", "http://127.0.0.1:9/api"),
    )
    .expect("client");

    let err = client.exchange_code("code").await.expect_err("Must fail");
    assert!(matches!(err, ProviderError::TokenExchange(_)));
}
