use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// API 调用错误
    Api(ApiError),
    /// 文件操作错误
    File(FileError),
    /// 表格解析/写入错误
    Spreadsheet(SpreadsheetError),
    /// 导入流程错误
    Import(ImportError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "API错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Spreadsheet(e) => write!(f, "表格错误: {}", e),
            AppError::Import(e) => write!(f, "导入错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Api(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Spreadsheet(e) => Some(e),
            AppError::Import(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// API 调用错误
#[derive(Debug)]
pub enum ApiError {
    /// 网络请求失败（连接、超时等）
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端返回非 2xx 状态码
    Status {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// JSON 解析失败
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { endpoint, source } => {
                write!(f, "API请求失败 ({}): {}", endpoint, source)
            }
            ApiError::Status {
                endpoint,
                status,
                message,
            } => {
                write!(
                    f,
                    "API返回错误响应 ({}): status={}, message={:?}",
                    endpoint, status, message
                )
            }
            ApiError::JsonParseFailed { source } => {
                write!(f, "JSON解析失败: {}", source)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::RequestFailed { source, .. } | ApiError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            ApiError::Status { .. } => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound { path: String },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            FileError::NotFound { .. } => None,
        }
    }
}

/// 表格解析/写入错误
#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error("不支持的文件格式: {0}（仅支持 .xlsx / .xls）")]
    UnsupportedExtension(String),
    #[error("无法打开表格文件 {path}: {message}")]
    Open { path: String, message: String },
    #[error("表格文件中没有工作表")]
    NoWorksheet,
    #[error("无法读取工作表 {sheet}: {message}")]
    SheetRead { sheet: String, message: String },
    #[error("表格中没有数据行")]
    Empty,
    #[error("写入表格失败: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

/// 导入流程错误
#[derive(Debug)]
pub enum ImportError {
    /// 未选择科目
    MissingSubject,
    /// 批次大小超出范围
    InvalidBatchSize { value: usize, min: usize, max: usize },
    /// 没有可导入的行
    NoRows,
    /// 仍有未通过校验的行
    ValidationFailed { invalid_count: usize },
    /// 当前步骤不允许该操作
    InvalidTransition {
        step: &'static str,
        action: &'static str,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::MissingSubject => write!(f, "必须选择科目"),
            ImportError::InvalidBatchSize { value, min, max } => {
                write!(f, "批次大小 {} 超出范围 [{}, {}]", value, min, max)
            }
            ImportError::NoRows => write!(f, "没有可导入的题目"),
            ImportError::ValidationFailed { invalid_count } => {
                write!(f, "有 {} 行未通过校验", invalid_count)
            }
            ImportError::InvalidTransition { step, action } => {
                write!(f, "当前步骤 {} 不允许执行 {}", step, action)
            }
        }
    }
}

impl std::error::Error for ImportError {}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件解析失败
    FileParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileParseFailed { path, source } => {
                write!(f, "配置文件解析失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        AppError::Api(ApiError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<SpreadsheetError> for AppError {
    fn from(err: SpreadsheetError) -> Self {
        AppError::Spreadsheet(err)
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Spreadsheet(SpreadsheetError::Write(err))
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::Import(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建状态码错误
    pub fn api_status(endpoint: impl Into<String>, status: u16, message: Option<String>) -> Self {
        AppError::Api(ApiError::Status {
            endpoint: endpoint.into(),
            status,
            message,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// HTTP 状态码（如果是状态码错误）
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api(ApiError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// 面向用户的提示信息（越南语）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(ApiError::Status {
                status, message, ..
            }) => {
                let base = status_message(*status);
                match message {
                    Some(detail) if !detail.trim().is_empty() => format!("{}: {}", base, detail.trim()),
                    _ => base,
                }
            }
            AppError::Api(ApiError::RequestFailed { .. }) => {
                "Không thể kết nối đến máy chủ. Vui lòng kiểm tra kết nối mạng.".to_string()
            }
            AppError::Api(ApiError::JsonParseFailed { .. }) => {
                "Phản hồi từ máy chủ không hợp lệ.".to_string()
            }
            AppError::File(FileError::NotFound { path }) => {
                format!("Không tìm thấy tệp: {}", path)
            }
            AppError::Spreadsheet(SpreadsheetError::UnsupportedExtension(_)) => {
                "Chỉ hỗ trợ tệp Excel (.xlsx, .xls).".to_string()
            }
            AppError::Spreadsheet(SpreadsheetError::Empty) => {
                "Tệp Excel không có dữ liệu.".to_string()
            }
            AppError::Spreadsheet(_) => "Không thể đọc tệp Excel. Vui lòng kiểm tra định dạng.".to_string(),
            AppError::Import(ImportError::MissingSubject) => "Vui lòng chọn môn học.".to_string(),
            AppError::Import(ImportError::InvalidBatchSize { min, max, .. }) => {
                format!("Kích thước lô phải nằm trong khoảng {} - {}.", min, max)
            }
            AppError::Import(ImportError::NoRows) => "Không có câu hỏi nào để nhập.".to_string(),
            AppError::Import(ImportError::ValidationFailed { invalid_count }) => {
                format!("Có {} dòng không hợp lệ. Vui lòng sửa trước khi nhập.", invalid_count)
            }
            other => other.to_string(),
        }
    }
}

/// HTTP 状态码到提示信息的映射
fn status_message(status: u16) -> String {
    match status {
        400 => "Dữ liệu không hợp lệ".to_string(),
        401 | 403 => "Bạn không có quyền thực hiện thao tác này".to_string(),
        404 => "Không tìm thấy tài nguyên yêu cầu".to_string(),
        409 => "Dữ liệu bị trùng lặp hoặc xung đột".to_string(),
        500..=599 => "Lỗi máy chủ, vui lòng thử lại sau".to_string(),
        other => format!("Đã xảy ra lỗi (mã {})", other),
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
