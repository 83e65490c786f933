// ==========================================
// 工资档案管理 - 命令行入口
// ==========================================
// 每个子命令都转换为 ApiRequest 经 Router 分发，输出 JSON 信封
// 退出码: 响应状态 >= 400 时为 1
// ==========================================

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use payroll_records::app::{get_default_db_path, ApiRequest, AppState, Router};
use payroll_records::logging;

#[derive(Parser)]
#[command(name = "payroll-records")]
#[command(version, about = "Company and employee payroll records with bulk CSV import")]
struct Cli {
    /// Database file (defaults to PAYROLL_DB_PATH or the user data directory)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    InitDb,

    /// Import companies and employees from a CSV file
    Import {
        /// Path to the CSV file
        file: String,
    },

    /// List companies with employee counts and average salaries
    Companies,

    /// Show one company
    Company {
        /// Company ID
        id: i64,
    },

    /// List employees
    Employees {
        /// Only employees of this company
        #[arg(short, long)]
        company: Option<i64>,
    },

    /// Show one employee
    Employee {
        /// Employee ID
        id: i64,
    },

    /// Read or write runtime settings (e.g. import/max_rows)
    Config {
        /// Setting key; omit to print every setting
        key: Option<String>,

        /// New value; omit to read the current value
        value: Option<String>,
    },

    /// Send a raw request through the router
    Request {
        /// HTTP method (GET, POST, PUT, DELETE)
        method: String,

        /// Path, e.g. /employees/1
        path: String,

        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
    },
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path.clone()).map_err(|e| anyhow!(e))?;

    let request = match cli.command {
        Commands::InitDb => {
            return print_json(&json!({
                "success": true,
                "message": "Database initialized",
                "db_path": db_path,
            }));
        }
        Commands::Config { key, value } => {
            let config = &state.config_manager;
            let output = match (key, value) {
                (None, _) => {
                    let snapshot: Value = serde_json::from_str(&config.get_config_snapshot()?)?;
                    json!({ "success": true, "data": snapshot })
                }
                (Some(key), None) => {
                    json!({ "success": true, "data": config.get_global_config_value(&key)? })
                }
                (Some(key), Some(value)) => {
                    config.set_global_config_value(&key, &value)?;
                    json!({ "success": true, "message": format!("{} updated", key) })
                }
            };
            return print_json(&output);
        }
        Commands::Import { file } => {
            let csv_content = std::fs::read_to_string(&file)
                .with_context(|| format!("无法读取 CSV 文件: {}", file))?;
            ApiRequest::new(
                "POST",
                "/csv/upload",
                Some(json!({ "csv_content": csv_content })),
            )
        }
        Commands::Companies => ApiRequest::new("GET", "/companies", None),
        Commands::Company { id } => ApiRequest::new("GET", &format!("/companies/{}", id), None),
        Commands::Employees { company: None } => ApiRequest::new("GET", "/employees", None),
        Commands::Employees { company: Some(id) } => {
            ApiRequest::new("GET", &format!("/companies/{}/employees", id), None)
        }
        Commands::Employee { id } => ApiRequest::new("GET", &format!("/employees/{}", id), None),
        Commands::Request { method, path, body } => {
            let body = body
                .map(|raw| serde_json::from_str::<Value>(&raw))
                .transpose()
                .context("--body 不是合法的 JSON")?;
            ApiRequest::new(&method, &path, body)
        }
    };

    let router = Router::new(Arc::new(state));
    let response = router.dispatch(request).await;
    print_json(&response.body)?;

    if response.status >= 400 {
        std::process::exit(1);
    }
    Ok(())
}
