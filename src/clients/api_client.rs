/// 题库 REST API 客户端
///
/// 封装科目/章节/难度列表、题目导入和导出接口
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::options::ImportOptions;
use crate::models::reference::parse_list;
use crate::models::{Chapter, ImportSummary, Level, Subject};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const SUBJECT_ENDPOINT: &str = "api/Subject";
pub const CHAPTER_ENDPOINT: &str = "api/Chapter";
pub const LEVEL_ENDPOINT: &str = "api/Level";
pub const IMPORT_ENDPOINT: &str = "api/Question/import";
pub const EXPORT_ENDPOINT: &str = "api/Question/export";

/// 提交导入文件的能力
///
/// 批量提交器只依赖这个接口，测试时可以替换成本地实现。
pub trait QuestionImporter {
    fn import_file(
        &self,
        file: &Path,
        options: &ImportOptions,
    ) -> impl Future<Output = AppResult<ImportSummary>> + Send;
}

/// 题库 API 客户端
#[derive(Clone)]
pub struct ExamApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ExamApiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// 非 2xx 状态码转成错误，尽量带上服务端的提示
    async fn check_status(endpoint: &str, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!("{} 返回 {}: {}", endpoint, status, body);
        Err(AppError::api_status(
            endpoint,
            status.as_u16(),
            extract_message(&body),
        ))
    }

    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)]) -> AppResult<Value> {
        let request = self.authorize(self.http.get(self.url(endpoint)).query(query));
        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;
        let response = Self::check_status(endpoint, response).await?;
        let text = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// 获取科目列表
    pub async fn fetch_subjects(&self) -> AppResult<Vec<Subject>> {
        let value = self.get_json(SUBJECT_ENDPOINT, &[]).await?;
        Ok(parse_list(value))
    }

    /// 获取章节列表，可按科目过滤
    pub async fn fetch_chapters(&self, subject_id: Option<&str>) -> AppResult<Vec<Chapter>> {
        let query: Vec<(&str, &str)> = subject_id.map(|id| ("subjectId", id)).into_iter().collect();
        let value = self.get_json(CHAPTER_ENDPOINT, &query).await?;
        Ok(parse_list(value))
    }

    /// 获取难度列表
    pub async fn fetch_levels(&self) -> AppResult<Vec<Level>> {
        let value = self.get_json(LEVEL_ENDPOINT, &[]).await?;
        Ok(parse_list(value))
    }

    /// 导出题目为 xlsx，返回写入的字节数
    pub async fn export_questions(
        &self,
        subject_id: &str,
        chapter_id: Option<&str>,
        output: &Path,
    ) -> AppResult<u64> {
        let mut query = vec![("subjectId", subject_id)];
        if let Some(chapter_id) = chapter_id {
            query.push(("chapterId", chapter_id));
        }

        let request = self.authorize(self.http.get(self.url(EXPORT_ENDPOINT)).query(&query));
        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(EXPORT_ENDPOINT, e))?;
        let response = Self::check_status(EXPORT_ENDPOINT, response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::api_request_failed(EXPORT_ENDPOINT, e))?;

        tokio::fs::write(output, &bytes)
            .await
            .map_err(|e| AppError::file_write_failed(output.display().to_string(), e))?;

        info!("✓ 已导出 {} 字节到 {}", bytes.len(), output.display());
        Ok(bytes.len() as u64)
    }

    /// 上传导入文件
    pub async fn import_questions(
        &self,
        file: &Path,
        options: &ImportOptions,
    ) -> AppResult<ImportSummary> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| AppError::file_read_failed(file.display().to_string(), e))?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "questions.xlsx".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for(file))
            .map_err(|e| AppError::api_request_failed(IMPORT_ENDPOINT, e))?;

        let mut form = Form::new().part("file", part);
        for (name, value) in form_fields(options) {
            form = form.text(name, value);
        }

        info!("📤 正在上传 {} 到 {}", file_name, IMPORT_ENDPOINT);

        let request = self.authorize(self.http.post(self.url(IMPORT_ENDPOINT)).multipart(form));
        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(IMPORT_ENDPOINT, e))?;
        let response = Self::check_status(IMPORT_ENDPOINT, response).await?;
        let text = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(IMPORT_ENDPOINT, e))?;

        debug!("导入接口响应: {}", text);

        if text.trim().is_empty() {
            return Ok(ImportSummary::default());
        }
        let value: Value = serde_json::from_str(&text)?;
        Ok(ImportSummary::from_response(value)?)
    }
}

impl QuestionImporter for ExamApiClient {
    async fn import_file(&self, file: &Path, options: &ImportOptions) -> AppResult<ImportSummary> {
        self.import_questions(file, options).await
    }
}

/// 导入表单中除文件外的字段
pub fn form_fields(options: &ImportOptions) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();
    if let Some(subject_id) = ImportOptions::non_empty(&options.subject_id) {
        fields.push(("subjectId", subject_id.to_string()));
    }
    if let Some(chapter_id) = ImportOptions::non_empty(&options.chapter_id) {
        fields.push(("chapterId", chapter_id.to_string()));
    }
    if let Some(level_id) = ImportOptions::non_empty(&options.level_id) {
        fields.push(("levelId", level_id.to_string()));
    }
    fields.push(("overrideExisting", options.override_existing.to_string()));
    fields.push(("continueOnError", options.continue_on_error.to_string()));
    fields.push(("batchSize", options.batch_size.to_string()));
    fields
}

fn mime_for(file: &Path) -> &'static str {
    match file.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "xls" => "application/vnd.ms-excel",
        _ => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    }
}

/// 从错误响应体中取出提示信息
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return ["message", "title", "error", "detail"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::to_string);
    }
    if body.chars().count() <= 200 && !body.starts_with('<') {
        return Some(body.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields() {
        let options = ImportOptions {
            subject_id: Some("5".into()),
            chapter_id: Some(" ".into()),
            level_id: Some("2".into()),
            override_existing: true,
            continue_on_error: false,
            batch_size: 50,
        };
        let fields = form_fields(&options);
        assert_eq!(
            fields,
            vec![
                ("subjectId", "5".to_string()),
                ("levelId", "2".to_string()),
                ("overrideExisting", "true".to_string()),
                ("continueOnError", "false".to_string()),
                ("batchSize", "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"message": "Môn học không tồn tại"}"#).as_deref(),
            Some("Môn học không tồn tại")
        );
        assert_eq!(
            extract_message(r#"{"title": "One or more validation errors occurred."}"#).as_deref(),
            Some("One or more validation errors occurred.")
        );
        assert_eq!(extract_message(r#"{"code": 1}"#), None);
        assert_eq!(extract_message("Bad Request").as_deref(), Some("Bad Request"));
        assert_eq!(extract_message("<html>error</html>"), None);
        assert_eq!(extract_message("   "), None);
    }

    #[test]
    fn test_url_join() {
        let config = Config {
            api_base_url: "http://localhost:5000/".into(),
            ..Config::default()
        };
        let client = ExamApiClient::new(&config).unwrap();
        assert_eq!(client.url(IMPORT_ENDPOINT), "http://localhost:5000/api/Question/import");
        assert_eq!(client.url("/api/Subject"), "http://localhost:5000/api/Subject");
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("a.XLS")), "application/vnd.ms-excel");
        assert!(mime_for(Path::new("a.xlsx")).contains("spreadsheetml"));
    }
}
