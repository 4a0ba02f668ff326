use fxpair::cli::convert::ConvertRequest;
use std::fs;
use tracing::{error, info};

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CURRENCIES: &str =
        r#"{"EUR": "Euro", "GBP": "British Pound", "USD": "United States Dollar"}"#;

    pub async fn create_frankfurter_mock_server(
        from: &str,
        to: &str,
        status: u16,
        latest: &str,
    ) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/currencies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CURRENCIES))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", from))
            .and(query_param("to", to))
            .respond_with(ResponseTemplate::new(status).set_body_string(latest))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(file: &tempfile::NamedTempFile, base_url: &str) {
        let config_content = format!(
            r#"
        provider: frankfurter
        providers:
          frankfurter:
            base_url: {base_url}
        default_pair:
          from:
            code: USD
            symbol: "$"
            amount: 100
          to:
            code: GBP
            symbol: "£"
        debounce_ms: 50
    "#
        );
        std::fs::write(file.path(), config_content).expect("Failed to write config file");
    }
}

#[test_log::test(tokio::test)]
#[ignore = "talks to the public Frankfurter API"]
async fn test_real_frankfurter_api() {
    use fxpair::core::CurrencyRateProvider;
    use fxpair::providers::frankfurter::FrankfurterProvider;

    let provider = FrankfurterProvider::new("https://api.frankfurter.app");
    let (from, to) = ("USD", "EUR");
    info!(?from, ?to, "Converting with Frankfurter");

    match provider.convert(100.0, from, to).await {
        Ok(value) => {
            info!(?value, "Received conversion");
            assert!(value > 0.0, "Converted amount should be positive");
        }
        Err(e) => {
            error!("Conversion request failed: {e}\n{e:?}");
            panic!("Conversion request failed: {e}");
        }
    }
}

#[test_log::test(tokio::test)]
async fn test_convert_command_with_mock() {
    let mock_server = test_utils::create_frankfurter_mock_server(
        "USD",
        "GBP",
        200,
        r#"{"amount": 100.0, "base": "USD", "date": "2026-10-16", "rates": {"GBP": 79.5}}"#,
    )
    .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxpair::run_command(
        fxpair::AppCommand::Convert(ConvertRequest {
            amount: "100".to_string(),
            ..Default::default()
        }),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_currencies_command_with_mock() {
    let mock_server = test_utils::create_frankfurter_mock_server("USD", "GBP", 200, "{}").await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxpair::run_command(
        fxpair::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Currencies failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_reverse_conversion_flow() {
    use fxpair::core::CatalogLoader;
    use fxpair::core::config::AppConfig;

    let mock_server = test_utils::create_frankfurter_mock_server(
        "EUR",
        "USD",
        200,
        r#"{"amount": 50.0, "base": "EUR", "date": "2026-10-16", "rates": {"USD": 54.237}}"#,
    )
    .await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let config = AppConfig::load_from_path(config_file.path()).expect("config should load");
    let (rates, catalog) = fxpair::build_providers(&config).expect("providers should build");
    let loader = std::sync::Arc::new(CatalogLoader::new(
        catalog,
        config.default_pair.as_ref().map(|p| p.to_pair()),
    ));

    let request = ConvertRequest {
        amount: "50".to_string(),
        from: Some("usd".to_string()),
        to: Some("EUR".to_string()),
        reverse: true,
    };
    let pair = fxpair::cli::convert::convert(rates, loader, &request)
        .await
        .expect("conversion should succeed");

    assert_eq!(pair.to.code, "EUR");
    assert_eq!(pair.to.amount, Some(50.0));
    assert_eq!(pair.from.code, "USD");
    assert_eq!(pair.from.amount, Some(54.24));
    assert!(pair.last_updated.is_some());
}

#[test_log::test(tokio::test)]
async fn test_convert_command_reports_api_failure() {
    let mock_server = test_utils::create_frankfurter_mock_server("USD", "GBP", 500, "").await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxpair::run_command(
        fxpair::AppCommand::Convert(ConvertRequest {
            amount: "100".to_string(),
            ..Default::default()
        }),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("a 500 response should fail the command");
    assert!(err.to_string().contains("HTTP error: 500"), "{err:#}");
}

#[test_log::test(tokio::test)]
async fn test_invalid_amount_is_rejected() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, "http://127.0.0.1:9");

    let result = fxpair::run_command(
        fxpair::AppCommand::Convert(ConvertRequest {
            amount: "12a".to_string(),
            ..Default::default()
        }),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    assert!(result.unwrap_err().to_string().contains("Invalid amount"));
}

#[test_log::test(tokio::test)]
async fn test_missing_beacon_config_fails() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "provider: currency_beacon\n").expect("write config");

    let result = fxpair::run_command(
        fxpair::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("currency_beacon selected but not configured")
    );
}
