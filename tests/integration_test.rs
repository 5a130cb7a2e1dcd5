use question_import::models::ImportRow;
use question_import::spreadsheet::{self, COLUMNS};
use question_import::{validate, AppError, Config, ExamApiClient, ImportOptions, ImportSession, ImportStep};
use std::path::Path;

fn question(content: &str, a: &str, b: &str, answer: &str) -> ImportRow {
    ImportRow {
        content: content.to_string(),
        option_a: a.to_string(),
        option_b: b.to_string(),
        correct_answer: answer.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_written_sheet_parses_back_with_row_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cau_hoi.xlsx");

    let rows = vec![
        question("2+2=?", "3", "4", "b"),
        question("", "x", "y", "E"),
    ];
    spreadsheet::write_rows(&path, &rows).unwrap();

    let sheet = spreadsheet::parse_file(&path).unwrap();
    assert_eq!(sheet.header, COLUMNS.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    assert!(spreadsheet::check_header(&sheet.header).is_empty());
    assert_eq!(sheet.rows.len(), 2);

    let mapped = spreadsheet::map_rows(&sheet.rows);
    assert_eq!(mapped[0].index, 2);
    assert_eq!(mapped[0].option_b, "4");
    assert_eq!(mapped[1].index, 3);

    let result = validate(&mapped);
    assert!(!result.is_valid);
    assert_eq!(result.valid_count, 1);
    assert_eq!(result.invalid_count, 1);
    assert_eq!(result.errors[0].row, 3);
    assert_eq!(result.errors[0].errors.len(), 2);
}

#[test]
fn test_template_is_a_valid_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mau.xlsx");
    spreadsheet::write_template(&path).unwrap();

    let sheet = spreadsheet::parse_file(&path).unwrap();
    let result = validate(&spreadsheet::map_rows(&sheet.rows));
    assert!(result.is_valid);
    assert_eq!(result.valid_count, 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cau_hoi.csv");
    std::fs::write(&path, "Nội dung,Đáp án A\n").unwrap();

    let err = spreadsheet::parse_file(&path).unwrap_err();
    assert!(matches!(err, AppError::Spreadsheet(_)));
    assert_eq!(err.user_message(), "Chỉ hỗ trợ tệp Excel (.xlsx, .xls).");
}

#[tokio::test]
async fn test_session_select_file_moves_to_configure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cau_hoi.xlsx");
    spreadsheet::write_rows(&path, &[question("Thủ đô?", "Hà Nội", "Huế", "a")]).unwrap();

    let mut session = ImportSession::new(ImportOptions::for_subject("1"));
    let result = session.select_file(path.as_path()).await.unwrap();
    assert!(result.is_valid);
    assert!(result.warnings.is_empty());
    assert_eq!(session.step(), ImportStep::Configure);
    assert_eq!(session.file(), Some(path.as_path()));
    assert!(session.ready_to_submit().is_ok());
}

#[tokio::test]
async fn test_session_empty_sheet_stays_in_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trong.xlsx");
    spreadsheet::write_rows(&path, &[]).unwrap();

    let mut session = ImportSession::new(ImportOptions::for_subject("1"));
    let err = session.select_file(path.as_path()).await.unwrap_err();
    assert_eq!(err.user_message(), "Tệp Excel không có dữ liệu.");
    assert_eq!(session.step(), ImportStep::Upload);
}

#[tokio::test]
#[ignore] // 需要可访问的题库 API：cargo test -- --ignored
async fn test_fetch_subjects_from_live_api() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::from_env();
    let client = ExamApiClient::new(&config).expect("创建客户端失败");

    let subjects = client.fetch_subjects().await.expect("获取科目失败");
    println!("找到 {} 个科目", subjects.len());
}

#[tokio::test]
#[ignore]
async fn test_import_file_to_live_api() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::from_env();
    let client = ExamApiClient::new(&config).expect("创建客户端失败");
    let subject = std::env::var("TEST_SUBJECT_ID").unwrap_or_else(|_| "1".to_string());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mau.xlsx");
    spreadsheet::write_template(&path).unwrap();

    let summary = client
        .import_questions(Path::new(&path), &ImportOptions::for_subject(subject))
        .await
        .expect("导入失败");
    println!("导入结果: {:?}", summary);
}
