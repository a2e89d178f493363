// ==========================================
// 加热炉周期核验系统 - 命令行入口
// ==========================================
// 子命令: analyze（加载生产实绩与传感器文件，输出核验结果）
// 输出: 终端汇总 / CSV 结果文件 / 完整 JSON 报告（stdout）
// ==========================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use furnace_cycle::api::{AnalysisApi, AnalysisResponse, ResultWriter};
use furnace_cycle::config::{AnalysisConfig, ConfigManager};
use furnace_cycle::domain::AnalysisMode;
use furnace_cycle::importer::{ImportOptions, ProductionColumnHints, SensorColumnHints};
use furnace_cycle::logging;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "加热炉热处理周期核验与燃气单耗计算", long_about = None)]
struct Cli {
    /// 以 JSON 格式输出日志
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 识别热处理周期并计算燃气单耗
    Analyze(AnalyzeArgs),
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// 生产实绩文件（.csv/.xlsx/.xls）
    #[arg(long, value_hint = ValueHint::FilePath)]
    production: PathBuf,

    /// 传感器文件，可重复指定（多机组模式下文件名需包含机组号）
    #[arg(long = "sensor", required = true, value_hint = ValueHint::FilePath)]
    sensors: Vec<PathBuf>,

    /// 生产实绩表头行（从 0 开始）
    #[arg(long, default_value_t = 0)]
    production_header_row: usize,

    /// 传感器表头行（从 0 开始）
    #[arg(long, default_value_t = 0)]
    sensor_header_row: usize,

    /// 装炉日期列名（缺省自动识别）
    #[arg(long)]
    date_column: Option<String>,

    /// 装炉量列名（缺省自动识别）
    #[arg(long)]
    weight_column: Option<String>,

    /// 机组列名（缺省自动识别）
    #[arg(long)]
    unit_column: Option<String>,

    /// 时间列名（缺省自动识别）
    #[arg(long)]
    time_column: Option<String>,

    /// 温度列名（缺省自动识别）
    #[arg(long)]
    temperature_column: Option<String>,

    /// 燃气表列名（缺省自动识别）
    #[arg(long)]
    gas_column: Option<String>,

    /// 配置文件（JSON）
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// 启用严格模式（升温起点校验 + 低温异常校验）
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,

    /// 匹配时间容差（小时，1~48）
    #[arg(long)]
    tolerance_hours: Option<f64>,

    /// 目标单耗 (Nm3/t)
    #[arg(long, conflicts_with = "no_target")]
    target: Option<f64>,

    /// 不做达标判定
    #[arg(long, action = ArgAction::SetTrue)]
    no_target: bool,

    /// 多机组模式（从传感器文件名提取机组号）
    #[arg(long, action = ArgAction::SetTrue)]
    multi_unit: bool,

    /// 结果 CSV 输出路径
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// 将完整报告以 JSON 输出到 stdout
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

impl AnalyzeArgs {
    /// 配置文件 + 命令行覆盖
    fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = ConfigManager::new(self.config.clone())
            .load()
            .context("加载配置失败")?;

        if self.strict {
            config.criteria.strict_mode = true;
        }
        if let Some(hours) = self.tolerance_hours {
            config.match_tolerance_hours = hours;
        }
        if self.no_target {
            config.target_specific_consumption = None;
        } else if let Some(target) = self.target {
            config.target_specific_consumption = Some(target);
        }
        if self.multi_unit {
            config.mode = AnalysisMode::MultiUnit;
        }

        Ok(config)
    }

    fn import_options(&self) -> ImportOptions {
        ImportOptions {
            sensor_header_row: self.sensor_header_row,
            production_header_row: self.production_header_row,
            sensor_columns: SensorColumnHints {
                time: self.time_column.clone(),
                temperature: self.temperature_column.clone(),
                gas: self.gas_column.clone(),
            },
            production_columns: ProductionColumnHints {
                date: self.date_column.clone(),
                weight: self.weight_column.clone(),
                unit: self.unit_column.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    match cli.command {
        Command::Analyze(args) => run_analyze(args).await,
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    info!(version = furnace_cycle::VERSION, "{}", furnace_cycle::SYSTEM_NAME);

    let config = args.resolve_config()?;
    // 命令行覆盖后的配置在 AnalysisApi::new 中重新校验
    let api = AnalysisApi::new(config, args.import_options()).context("配置校验失败")?;

    let response = api
        .analyze_files(args.production.clone(), args.sensors.clone())
        .await
        .context("分析失败")?;

    if let Some(path) = &args.output {
        ResultWriter::write_csv_file(&response.report.results, path)
            .with_context(|| format!("写入结果文件失败: {}", path.display()))?;
        info!(path = %path.display(), rows = response.report.results.len(), "结果已导出");
    }

    if args.json {
        let body = serde_json::to_string_pretty(&response).context("报告序列化失败")?;
        println!("{}", body);
    } else {
        print_summary(&response);
    }

    Ok(())
}

fn print_summary(response: &AnalysisResponse) {
    let report = &response.report;
    let summary = &report.run_summary;

    println!("==================================================");
    println!("{} v{}", furnace_cycle::SYSTEM_NAME, furnace_cycle::VERSION);
    println!("run_id: {}", report.run_id);
    println!("==================================================");

    for result in &report.results {
        println!(
            "[{}] {} | {} ~ {} | 燃气 {:.2} | 装炉 {:.0} kg | 单耗 {:.2} | {}",
            result.unit_id,
            result.cycle_date,
            result.start_time.format("%m-%d %H:%M"),
            result.end_time.format("%m-%d %H:%M"),
            result.gas_used,
            result.charge_weight_kg,
            result.specific_consumption_rounded(),
            result.pass_fail
        );
    }

    println!("--------------------------------------------------");
    for unit in &report.unit_summaries {
        println!(
            "机组 {}: 周期 {} 个, 平均单耗 {:.2}, 达标 {}, 超标 {}",
            unit.unit_id,
            unit.cycle_count,
            unit.mean_specific_consumption,
            unit.pass_count,
            unit.fail_count
        );
    }

    match summary.mean_specific_consumption {
        Some(mean) => println!("有效周期: {} 个, 平均单耗: {:.2} Nm3/t", summary.cycle_count, mean),
        None => println!("未找到有效周期"),
    }
    if let (Some(target), Some(delta)) = (
        report.config.target_specific_consumption,
        summary.delta_to_target,
    ) {
        println!("目标单耗: {:.2}, 差值: {:+.2}", target, delta);
    }

    if !report.diagnostics.is_empty() {
        println!("--------------------------------------------------");
        println!("未匹配装炉记录: {} 条", report.diagnostics.len());
        for diag in &report.diagnostics {
            println!(
                "  第 {} 行 ({}): {}",
                diag.charge.row_number,
                diag.charge.start.format("%Y-%m-%d %H:%M"),
                diag.rejection
            );
        }
    }

    for source in &report.unresolved_sources {
        println!("未识别机组号，已排除: {}", source);
    }
    for (file, reason) in &response.failed_files {
        println!("加载失败，已排除: {} ({})", file, reason);
    }
    if response.dropped_sensor_rows > 0 || response.dropped_production_rows > 0 {
        println!(
            "丢弃无法解析的行: 传感器 {} 行, 生产实绩 {} 行",
            response.dropped_sensor_rows, response.dropped_production_rows
        );
    }
}
