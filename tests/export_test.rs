use cep_fleet::core::present::{render, save};
use cep_fleet::domain::model::{FleetRow, FleetSeries};
use cep_fleet::domain::ports::ExportFormat;
use cep_fleet::{ErrorKind, LocalStorage};
use std::io::Read;
use tempfile::TempDir;

fn series(values: &[(i32, i64)]) -> FleetSeries {
    values
        .iter()
        .map(|&(year, value)| FleetRow::new("355030", year, value))
        .collect()
}

#[tokio::test]
async fn test_save_twice_overwrites_csv() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("data");
    let storage = LocalStorage::new(base.to_str().unwrap().to_string());

    save(&storage, &series(&[(2019, 1), (2020, 2), (2021, 3)]), "São Paulo", ExportFormat::Csv)
        .await
        .unwrap();
    let path = save(&storage, &series(&[(2022, 40)]), "São Paulo", ExportFormat::Csv)
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "Localidade,Ano,Valor\n355030,2022,40\n");
}

#[tokio::test]
async fn test_save_twice_overwrites_xlsx() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

    save(&storage, &series(&[(2019, 1), (2020, 2), (2021, 3)]), "Sé", ExportFormat::Xlsx)
        .await
        .unwrap();
    let path = save(&storage, &series(&[(2022, 40)]), "Sé", ExportFormat::Xlsx)
        .await
        .unwrap();

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
    let mut xml = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    // header plus the single row of the latest call
    assert_eq!(xml.matches("<row r=").count(), 2);
    assert!(xml.contains("<v>40</v>"));
    assert!(!xml.contains("<v>2019</v>"));
}

#[tokio::test]
async fn test_save_into_unwritable_location_is_io_failure() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let storage = LocalStorage::new(blocker.to_str().unwrap().to_string());

    let err = save(&storage, &series(&[(2020, 1)]), "Sé", ExportFormat::Csv)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_render_other_region_is_no_data() {
    let err = render(&series(&[(2020, 1)]), "330455", "Rio de Janeiro").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoData);
}
