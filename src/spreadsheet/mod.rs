//! 表格读写：解析上传的 Excel、按列映射成题目、生成模板

pub mod mapper;
pub mod parser;
pub mod writer;

pub use mapper::{check_header, map_rows, COLUMNS};
pub use parser::{load_file, parse_file, ParsedSheet};
pub use writer::{write_rows, write_template};
