use anyhow::Result;
use clap::{Parser, Subcommand};
use question_import::models::options::DEFAULT_BATCH_SIZE;
use question_import::utils::logging;
use question_import::{App, AppError, Config, ImportOptions};
use std::path::PathBuf;
use tracing::{error, info};

/// 题库批量导入工具
#[derive(Parser, Debug)]
#[command(name = "question_import", version)]
struct Cli {
    /// TOML 配置文件（环境变量优先）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 解析并校验 Excel 文件
    Validate {
        file: PathBuf,
        /// 把无效行写到新的 xlsx 文件
        #[arg(long)]
        invalid_out: Option<PathBuf>,
    },
    /// 校验后上传到导入接口
    Import {
        file: PathBuf,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        chapter: Option<String>,
        #[arg(long)]
        level: Option<String>,
        /// 覆盖已存在的题目
        #[arg(long = "override")]
        override_existing: bool,
        /// 遇到错误行时停止
        #[arg(long)]
        stop_on_error: bool,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        invalid_out: Option<PathBuf>,
    },
    /// 生成导入模板
    Template { output: PathBuf },
    /// 导出题目
    Export {
        output: PathBuf,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        chapter: Option<String>,
    },
    /// 列出科目、难度和章节
    Subjects {
        #[arg(long)]
        subject: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 加载配置
    let config = match &cli.config {
        Some(path) => match Config::from_toml_file(path) {
            Ok(config) => config,
            Err(e) => {
                logging::init(cli.verbose);
                error!("❌ {}", e);
                std::process::exit(2);
            }
        },
        None => Config::from_env(),
    };

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    if let Err(e) = run(cli, config).await {
        // 优先显示面向用户的提示
        match e.downcast_ref::<AppError>() {
            Some(app_error) => error!("❌ {}", app_error.user_message()),
            None => error!("❌ {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let default_batch_size = if config.default_batch_size == 0 {
        DEFAULT_BATCH_SIZE
    } else {
        config.default_batch_size
    };

    let app = App::initialize(config)?;

    match cli.command {
        Command::Validate { file, invalid_out } => {
            let result = app.validate(&file, invalid_out.as_deref()).await?;
            if !result.is_valid {
                anyhow::bail!("{} dòng không hợp lệ", result.invalid_count);
            }
        }
        Command::Import {
            file,
            subject,
            chapter,
            level,
            override_existing,
            stop_on_error,
            batch_size,
            invalid_out,
        } => {
            let options = ImportOptions {
                subject_id: Some(subject),
                chapter_id: chapter,
                level_id: level,
                override_existing,
                continue_on_error: !stop_on_error,
                batch_size: batch_size.unwrap_or(default_batch_size),
            };
            app.import(&file, options, invalid_out.as_deref()).await?;
        }
        Command::Template { output } => {
            app.template(&output)?;
        }
        Command::Export {
            output,
            subject,
            chapter,
        } => {
            app.export(&output, &subject, chapter.as_deref()).await?;
        }
        Command::Subjects { subject } => {
            let data = app.reference(subject.as_deref()).await;
            info!("📚 科目 ({}):", data.subjects.len());
            for s in &data.subjects {
                info!("  {}", s);
            }
            info!("📈 难度 ({}):", data.levels.len());
            for l in &data.levels {
                info!("  {}", l);
            }
            info!("📖 章节 ({}):", data.chapters.len());
            for c in &data.chapters {
                info!("  {}", c);
            }
        }
    }

    Ok(())
}
