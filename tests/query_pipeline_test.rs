use cep_fleet::domain::ports::ExportFormat;
use cep_fleet::{IbgeClient, LocalStorage, QueryEngine, QueryState, Settings, ViaCepClient};
use httpmock::prelude::*;
use serde_json::json;
use std::io::Read;
use tempfile::TempDir;

fn settings(output_path: &str, format: ExportFormat) -> Settings {
    Settings {
        output_path: output_path.to_string(),
        export_format: format,
        ..Settings::default()
    }
}

fn statistics_body() -> serde_json::Value {
    json!([{
        "id": 28122,
        "res": [
            {"localidade": "0", "res": {"2020": "107948371", "2021": "111446870"}},
            {"localidade": "1234567", "res": {"2020": "100", "2021": "110"}}
        ]
    }])
}

fn sheet_xml(path: &std::path::Path) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut sheet = archive.by_name("xl/worksheets/sheet1.xml").unwrap();
    let mut xml = String::new();
    sheet.read_to_string(&mut xml).unwrap();
    xml
}

#[tokio::test]
async fn test_end_to_end_query_writes_xlsx() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("data");
    let output_path = output_path.to_str().unwrap();

    let address_server = MockServer::start();
    let address_mock = address_server.mock(|when, then| {
        when.method(GET).path("/ws/99999999/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"cep": "99999-999", "localidade": "Testópolis", "uf": "TS", "ibge": "12345678"}));
    });

    let stats_server = MockServer::start();
    let stats_mock = stats_server.mock(|when, then| {
        when.method(GET)
            .path_contains("/api/v1/pesquisas/indicadores/28122/resultados/0")
            .path_contains("1234567");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(statistics_body());
    });

    let mut engine = QueryEngine::new(
        ViaCepClient::new(address_server.base_url()),
        IbgeClient::new(stats_server.base_url(), "28122"),
        LocalStorage::new(output_path.to_string()),
        settings(output_path, ExportFormat::Xlsx),
    );

    let state = engine.submit("99999-999").await;
    let QueryState::Success(report) = state else {
        panic!("expected success, got {:?}", state);
    };

    address_mock.assert();
    stats_mock.assert();

    assert_eq!(report.region_code, "1234567");
    let rows: Vec<(i32, i64)> = report.series.rows().iter().map(|r| (r.year, r.value)).collect();
    assert_eq!(rows, vec![(2020, 100), (2021, 110)]);

    let chart = report.chart.as_ref().unwrap();
    assert_eq!(chart.x_labels, vec!["2020", "2021"]);
    assert_eq!(chart.values, vec![100, 110]);

    let saved = std::path::Path::new(output_path).join("Testópolis.xlsx");
    assert_eq!(report.saved_path.as_deref(), saved.to_str());
    let xml = sheet_xml(&saved);
    assert_eq!(xml.matches("<row r=").count(), 3);
    assert!(xml.contains("<v>2021</v>"));
    assert!(xml.contains("<v>110</v>"));
}

#[tokio::test]
async fn test_unknown_postal_code_in_body_flag() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap();

    let address_server = MockServer::start();
    address_server.mock(|when, then| {
        when.method(GET).path("/ws/00000000/json/");
        then.status(200).json_body(json!({"erro": true}));
    });

    let stats_server = MockServer::start();
    let stats_mock = stats_server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(statistics_body());
    });

    let mut engine = QueryEngine::new(
        ViaCepClient::new(address_server.base_url()),
        IbgeClient::new(stats_server.base_url(), "28122"),
        LocalStorage::new(output_path.to_string()),
        settings(output_path, ExportFormat::Xlsx),
    );

    let state = engine.submit("00000000").await;
    assert!(matches!(state, QueryState::Failed(msg) if msg.contains("not found")));
    stats_mock.assert_hits(0);
}

#[tokio::test]
async fn test_missing_ibge_makes_no_statistics_call() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap();

    let address_server = MockServer::start();
    address_server.mock(|when, then| {
        when.method(GET).path("/ws/01001000/json/");
        then.status(200).json_body(json!({"cep": "01001-000", "localidade": "São Paulo"}));
    });

    let stats_server = MockServer::start();
    let stats_mock = stats_server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(statistics_body());
    });

    let mut engine = QueryEngine::new(
        ViaCepClient::new(address_server.base_url()),
        IbgeClient::new(stats_server.base_url(), "28122"),
        LocalStorage::new(output_path.to_string()),
        settings(output_path, ExportFormat::Xlsx),
    );

    let state = engine.submit("01001-000").await;
    assert!(matches!(state, QueryState::Failed(msg) if msg.contains("ibge")));
    stats_mock.assert_hits(0);
    assert!(std::fs::read_dir(output_path).unwrap().next().is_none());
}

#[tokio::test]
async fn test_statistics_server_error_fails_query() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap();

    let address_server = MockServer::start();
    address_server.mock(|when, then| {
        when.method(GET).path("/ws/01001000/json/");
        then.status(200).json_body(json!({"localidade": "São Paulo", "ibge": "3550308"}));
    });

    let stats_server = MockServer::start();
    stats_server.mock(|when, then| {
        when.method(GET);
        then.status(503);
    });

    let mut engine = QueryEngine::new(
        ViaCepClient::new(address_server.base_url()),
        IbgeClient::new(stats_server.base_url(), "28122"),
        LocalStorage::new(output_path.to_string()),
        settings(output_path, ExportFormat::Csv),
    );

    let state = engine.submit("01001000").await;
    assert!(matches!(state, QueryState::Failed(msg) if msg.contains("503")));
}

#[tokio::test]
async fn test_region_without_rows_is_no_data() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap();

    let address_server = MockServer::start();
    address_server.mock(|when, then| {
        when.method(GET).path("/ws/01001000/json/");
        then.status(200).json_body(json!({"localidade": "São Paulo", "ibge": "3550308"}));
    });

    let stats_server = MockServer::start();
    stats_server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!([{"res": [{"localidade": "0", "res": {"2020": "1"}}]}]));
    });

    let mut engine = QueryEngine::new(
        ViaCepClient::new(address_server.base_url()),
        IbgeClient::new(stats_server.base_url(), "28122"),
        LocalStorage::new(output_path.to_string()),
        settings(output_path, ExportFormat::Csv),
    );

    let state = engine.submit("01001000").await;
    assert!(matches!(state, QueryState::Failed(msg) if msg.contains("no fleet data")));
}
