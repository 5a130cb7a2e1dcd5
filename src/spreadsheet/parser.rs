//! 表格解析：把上传的 Excel 文件读成原始行

use crate::error::{AppError, AppResult, FileError, SpreadsheetError};
use crate::models::RawRow;
use calamine::{open_workbook_auto, DataType, Reader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 支持的扩展名
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// 解析后的工作表
#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    pub sheet_name: String,
    /// 第1行（表头）
    pub header: Vec<String>,
    /// 数据行（已跳过空行）
    pub rows: Vec<RawRow>,
}

/// 检查文件扩展名
pub fn check_extension(path: &Path) -> Result<(), SpreadsheetError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(SpreadsheetError::UnsupportedExtension(path.display().to_string()))
    }
}

/// 读取第一个工作表
pub fn parse_file(path: &Path) -> AppResult<ParsedSheet> {
    if !path.exists() {
        return Err(AppError::File(FileError::NotFound {
            path: path.display().to_string(),
        }));
    }
    check_extension(path)?;

    info!("开始解析Excel文件: {}", path.display());

    let mut workbook = open_workbook_auto(path).map_err(|e| SpreadsheetError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SpreadsheetError::NoWorksheet)?;

    let range = match workbook.worksheet_range(&sheet_name) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            return Err(SpreadsheetError::SheetRead {
                sheet: sheet_name,
                message: e.to_string(),
            }
            .into())
        }
        None => return Err(SpreadsheetError::NoWorksheet.into()),
    };

    // calamine 的区域从第一个非空单元格开始，这里补齐行号偏移
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let cells: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    let sheet = rows_from_cells(sheet_name, cells, first_row + 1)?;
    info!(
        "Excel解析完成: 工作表 {}, 共 {} 行数据",
        sheet.sheet_name,
        sheet.rows.len()
    );
    Ok(sheet)
}

/// 在阻塞线程池中解析，避免占用异步运行时
pub async fn load_file(path: PathBuf) -> AppResult<ParsedSheet> {
    tokio::task::spawn_blocking(move || parse_file(&path))
        .await
        .map_err(|e| AppError::Other(format!("解析任务失败: {}", e)))?
}

/// 把单元格文本整理成表头 + 数据行
///
/// `first_row_number` 是 `cells[0]` 在表格中的行号。
pub fn rows_from_cells(
    sheet_name: String,
    cells: Vec<Vec<String>>,
    first_row_number: usize,
) -> Result<ParsedSheet, SpreadsheetError> {
    let mut iter = cells.into_iter().enumerate();
    let header = iter.next().map(|(_, h)| h).unwrap_or_default();

    let mut rows = Vec::new();
    for (offset, cells) in iter {
        let row = RawRow::new(first_row_number + offset, cells);
        if row.is_blank() {
            debug!("跳过空行: {}", row.row_number);
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(SpreadsheetError::Empty);
    }

    Ok(ParsedSheet {
        sheet_name,
        header,
        rows,
    })
}

/// 单元格转文本
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => format_number(*f),
        DataType::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// 整数值的浮点数不带小数部分（4.0 -> "4"）
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&DataType::Float(4.0)), "4");
        assert_eq!(cell_to_string(&DataType::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&DataType::Int(-3)), "-3");
        assert_eq!(cell_to_string(&DataType::String("  b ".into())), "b");
        assert_eq!(cell_to_string(&DataType::Empty), "");
        assert_eq!(cell_to_string(&DataType::Bool(true)), "TRUE");
    }

    #[test]
    fn test_rows_from_cells_skips_blank_rows() {
        let cells = vec![
            strings(&["Nội dung", "Đáp án A"]),
            strings(&["1+1=?", "2"]),
            strings(&["", "  "]),
            strings(&["2+2=?", "4"]),
        ];

        let sheet = rows_from_cells("Sheet1".into(), cells, 1).unwrap();
        assert_eq!(sheet.header[0], "Nội dung");
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].row_number, 2);
        assert_eq!(sheet.rows[1].row_number, 4);
    }

    #[test]
    fn test_rows_from_cells_header_only_is_empty() {
        let cells = vec![strings(&["Nội dung"]), strings(&[""])];
        assert!(matches!(
            rows_from_cells("Sheet1".into(), cells, 1),
            Err(SpreadsheetError::Empty)
        ));
    }

    #[test]
    fn test_check_extension() {
        assert!(check_extension(Path::new("cau_hoi.XLSX")).is_ok());
        assert!(check_extension(Path::new("cau_hoi.xls")).is_ok());
        assert!(check_extension(Path::new("cau_hoi.csv")).is_err());
        assert!(check_extension(Path::new("cau_hoi")).is_err());
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_file(Path::new("khong_ton_tai.xlsx")).unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }
}
