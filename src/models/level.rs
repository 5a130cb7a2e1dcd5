use phf::phf_map;

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum QuestionLevel {
    Easy,
    Medium,
    Hard,
}

static LEVEL_NAMES: phf::Map<&'static str, QuestionLevel> = phf_map! {
    "dễ" => QuestionLevel::Easy,
    "de" => QuestionLevel::Easy,
    "easy" => QuestionLevel::Easy,
    "nhận biết" => QuestionLevel::Easy,
    "trung bình" => QuestionLevel::Medium,
    "trung binh" => QuestionLevel::Medium,
    "medium" => QuestionLevel::Medium,
    "thông hiểu" => QuestionLevel::Medium,
    "khó" => QuestionLevel::Hard,
    "kho" => QuestionLevel::Hard,
    "hard" => QuestionLevel::Hard,
    "vận dụng" => QuestionLevel::Hard,
    "1" => QuestionLevel::Easy,
    "2" => QuestionLevel::Medium,
    "3" => QuestionLevel::Hard,
};

impl QuestionLevel {
    /// 标准名称（与模板中“Mức độ”一列一致）
    pub fn name(self) -> &'static str {
        match self {
            QuestionLevel::Easy => "Dễ",
            QuestionLevel::Medium => "Trung bình",
            QuestionLevel::Hard => "Khó",
        }
    }

    /// 解析“Mức độ”列，忽略大小写和首尾空格
    pub fn parse(text: &str) -> Option<Self> {
        let key = text.trim().to_lowercase();
        LEVEL_NAMES.get(key.as_str()).copied()
    }
}

impl std::fmt::Display for QuestionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        assert_eq!(QuestionLevel::parse(" Dễ "), Some(QuestionLevel::Easy));
        assert_eq!(QuestionLevel::parse("TRUNG BÌNH"), Some(QuestionLevel::Medium));
        assert_eq!(QuestionLevel::parse("hard"), Some(QuestionLevel::Hard));
        assert_eq!(QuestionLevel::parse("3"), Some(QuestionLevel::Hard));
        assert_eq!(QuestionLevel::parse("rất khó"), None);
        assert_eq!(QuestionLevel::parse(""), None);
    }
}
