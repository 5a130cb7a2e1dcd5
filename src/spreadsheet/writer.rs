//! 导出模板和题目到 xlsx

use crate::error::{AppResult, SpreadsheetError};
use crate::models::ImportRow;
use crate::spreadsheet::mapper::{to_cells, COLUMNS};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::info;

const SHEET_NAME: &str = "Câu hỏi";
const COLUMN_WIDTHS: [f64; 8] = [50.0, 20.0, 20.0, 20.0, 20.0, 14.0, 40.0, 12.0];

/// 模板中的示例行
fn sample_row() -> ImportRow {
    ImportRow {
        index: 2,
        content: "2 + 2 = ?".to_string(),
        option_a: "3".to_string(),
        option_b: "4".to_string(),
        option_c: "5".to_string(),
        option_d: "6".to_string(),
        correct_answer: "B".to_string(),
        explanation: "2 cộng 2 bằng 4".to_string(),
        level: "Dễ".to_string(),
    }
}

/// 写入导入模板（表头 + 一行示例）
pub fn write_template(path: &Path) -> AppResult<()> {
    write_rows(path, &[sample_row()])?;
    info!("✓ 模板已生成: {}", path.display());
    Ok(())
}

/// 把题目写成与模板相同列顺序的 xlsx
pub fn write_rows(path: &Path, rows: &[ImportRow]) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    fill_sheet(sheet, rows).map_err(SpreadsheetError::from)?;
    workbook.save(path).map_err(SpreadsheetError::from)?;
    info!("✓ 已写入 {} 道题目: {}", rows.len(), path.display());
    Ok(())
}

fn fill_sheet(sheet: &mut Worksheet, rows: &[ImportRow]) -> Result<(), XlsxError> {
    sheet.set_name(SHEET_NAME)?;

    let header_fmt = Format::new().set_bold().set_border(FormatBorder::Thin);

    for (col, title) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header_fmt)?;
        sheet.set_column_width(col, COLUMN_WIDTHS[col as usize])?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, value) in to_cells(row).iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row_num, col as u16, *value)?;
            }
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}
