//! 逐行校验待导入的题目
//!
//! 纯函数，不做任何 IO。一行只要有一条错误就算无效；警告不影响有效性。

use crate::models::{ImportRow, QuestionLevel, RowError, ValidationResult};
use std::collections::HashMap;

/// 允许的正确答案
pub const ANSWER_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

pub const MSG_MISSING_CONTENT: &str = "Thiếu nội dung câu hỏi";
pub const MSG_MISSING_OPTION_A: &str = "Thiếu đáp án A";
pub const MSG_MISSING_OPTION_B: &str = "Thiếu đáp án B";
pub const MSG_MISSING_CORRECT: &str = "Thiếu đáp án đúng";

/// 校验单行，返回错误信息（为空即有效）
pub fn validate_row(row: &ImportRow) -> Vec<String> {
    let mut errors = Vec::new();

    if row.content.trim().is_empty() {
        errors.push(MSG_MISSING_CONTENT.to_string());
    }
    if row.option_a.trim().is_empty() {
        errors.push(MSG_MISSING_OPTION_A.to_string());
    }
    if row.option_b.trim().is_empty() {
        errors.push(MSG_MISSING_OPTION_B.to_string());
    }

    let answer = row.normalized_answer();
    if answer.is_empty() {
        errors.push(MSG_MISSING_CORRECT.to_string());
    } else if parse_answer(&answer).is_none() {
        errors.push(format!(
            "Đáp án đúng '{}' không hợp lệ (phải là A, B, C hoặc D)",
            row.correct_answer.trim()
        ));
    }

    errors
}

/// 规范化后的答案转成选项字母
fn parse_answer(normalized: &str) -> Option<char> {
    let mut chars = normalized.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if ANSWER_LETTERS.contains(&c) => Some(c),
        _ => None,
    }
}

/// 只对有效行给出的提示
fn row_warnings(row: &ImportRow) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(letter) = parse_answer(&row.normalized_answer()) {
        if row.option(letter).map(|o| o.trim().is_empty()).unwrap_or(false) {
            warnings.push(format!(
                "Dòng {}: đáp án đúng là {} nhưng đáp án {} đang để trống",
                row.index, letter, letter
            ));
        }
    }

    if row.option_c.trim().is_empty() && !row.option_d.trim().is_empty() {
        warnings.push(format!(
            "Dòng {}: có đáp án D nhưng thiếu đáp án C",
            row.index
        ));
    }

    let level = row.level.trim();
    if !level.is_empty() && QuestionLevel::parse(level).is_none() {
        warnings.push(format!(
            "Dòng {}: mức độ '{}' không nhận diện được, sẽ dùng mức độ mặc định",
            row.index, level
        ));
    }

    warnings
}

/// 校验全部行
pub fn validate(rows: &[ImportRow]) -> ValidationResult {
    let mut result = ValidationResult::default();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let errors = validate_row(row);
        if errors.is_empty() {
            result.valid_count += 1;
            result.warnings.extend(row_warnings(row));
        } else {
            result.invalid_count += 1;
            result.errors.push(RowError {
                row: row.index,
                errors,
            });
        }

        let key = row.content.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if let Some(first) = seen.get(&key) {
            result.warnings.push(format!(
                "Dòng {}: nội dung trùng với dòng {}",
                row.index, first
            ));
        } else {
            seen.insert(key, row.index);
        }
    }

    result.is_valid = result.errors.is_empty();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        index: usize,
        content: &str,
        a: &str,
        b: &str,
        c: &str,
        d: &str,
        answer: &str,
    ) -> ImportRow {
        ImportRow {
            index,
            content: content.to_string(),
            option_a: a.to_string(),
            option_b: b.to_string(),
            option_c: c.to_string(),
            option_d: d.to_string(),
            correct_answer: answer.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lowercase_answer_without_c_d_is_valid() {
        let result = validate(&[row(2, "2+2=?", "3", "4", "", "", "b")]);
        assert!(result.is_valid);
        assert_eq!(result.valid_count, 1);
        assert_eq!(result.invalid_count, 0);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_content_and_bad_answer_gives_two_messages() {
        let result = validate(&[row(3, "", "x", "y", "", "", "E")]);
        assert!(!result.is_valid);
        assert_eq!(result.invalid_count, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 3);
        assert_eq!(result.errors[0].errors.len(), 2);
        assert_eq!(result.errors[0].errors[0], MSG_MISSING_CONTENT);
        assert!(result.errors[0].errors[1].contains("'E'"));
    }

    #[test]
    fn test_each_required_field() {
        let cases = [
            (row(2, " ", "a", "b", "", "", "A"), MSG_MISSING_CONTENT),
            (row(2, "q", "", "b", "", "", "A"), MSG_MISSING_OPTION_A),
            (row(2, "q", "a", "  ", "", "", "A"), MSG_MISSING_OPTION_B),
            (row(2, "q", "a", "b", "", "", " "), MSG_MISSING_CORRECT),
        ];
        for (r, expected) in cases {
            assert_eq!(validate_row(&r), vec![expected.to_string()]);
        }
    }

    #[test]
    fn test_answer_normalization() {
        assert!(validate_row(&row(2, "q", "a", "b", "c", "d", " d ")).is_empty());
        assert_eq!(validate_row(&row(2, "q", "a", "b", "c", "d", "AB")).len(), 1);
        assert_eq!(validate_row(&row(2, "q", "a", "b", "c", "d", "1")).len(), 1);
        assert_eq!(validate_row(&row(2, "q", "a", "b", "c", "d", "Đ")).len(), 1);
    }

    #[test]
    fn test_counts_always_add_up() {
        let rows = vec![
            row(2, "q1", "a", "b", "", "", "A"),
            row(3, "", "", "", "", "", ""),
            row(4, "q3", "a", "b", "c", "", "c"),
            row(5, "q4", "a", "b", "", "", "z"),
        ];
        let result = validate(&rows);
        assert_eq!(result.valid_count + result.invalid_count, rows.len());
        assert_eq!(result.valid_count, 2);
        assert_eq!(result.is_valid, result.errors.is_empty());
        assert_eq!(result.invalid_rows(), vec![3, 5]);
        assert_eq!(result.errors[0].errors.len(), 4);
    }

    #[test]
    fn test_empty_input_is_valid() {
        let result = validate(&[]);
        assert!(result.is_valid);
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_warnings_do_not_affect_validity() {
        let mut r = row(2, "q", "a", "b", "", "d", "C");
        r.level = "siêu khó".to_string();
        let result = validate(&[r]);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn test_duplicate_content_warns() {
        let rows = vec![
            row(2, "Thủ đô Việt Nam?", "Hà Nội", "Huế", "", "", "A"),
            row(3, "thủ đô việt nam?", "Hà Nội", "Huế", "", "", "A"),
        ];
        let result = validate(&rows);
        assert!(result.is_valid);
        assert_eq!(result.warnings, vec!["Dòng 3: nội dung trùng với dòng 2".to_string()]);
    }
}
