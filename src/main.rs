// ==========================================
// 库存批次分配引擎 - 命令行入口
// ==========================================
// 用法:
//   lot-allocator <stocks.csv|stocks.json> --required N
//       [--no-backorder] [--ordering as-supplied|fefo|fifo]
//       [--existing allocation.json] [--config config.json]
//       [--locale zh-CN|en] [--json-log]
//
// 输出: 保存成功时向 stdout 打印 JSON（summary + records）
// 退出码: 0 成功 / 1 输入或配置错误 / 2 分配校验未通过
// ==========================================

use anyhow::Context;
use clap::Parser;
use lot_allocator::config::{config_keys, ConfigManager};
use lot_allocator::i18n::{set_locale, t};
use lot_allocator::importer::StockSnapshotLoader;
use lot_allocator::{AllocationRecord, AllocationRequest, StockAllocator, StockOrdering};
use std::path::PathBuf;
use std::process::ExitCode;

/// 命令行参数
#[derive(Debug, Default, Parser)]
#[command(
    name = "lot-allocator",
    version,
    about = "库存批次分配：按批次分配需求数量，不足部分记为缺货"
)]
struct CliArgs {
    /// 库存快照文件（.csv 或 .json）
    stock_file: PathBuf,

    /// 需求数量
    #[arg(long)]
    required: u64,

    /// 不允许缺货（覆盖配置文件）
    #[arg(long)]
    no_backorder: bool,

    /// 批次排序策略: as-supplied / fefo / fifo
    #[arg(long, value_parser = parse_ordering)]
    ordering: Option<StockOrdering>,

    /// 已保存分配（JSON 记录数组），用于继续编辑
    #[arg(long)]
    existing: Option<PathBuf>,

    /// 配置文件路径（默认见 LOT_ALLOCATOR_CONFIG）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 提示语言
    #[arg(long, value_parser = ["zh-CN", "en"])]
    locale: Option<String>,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    json_log: bool,
}

fn parse_ordering(s: &str) -> Result<StockOrdering, String> {
    StockOrdering::parse(s).ok_or_else(|| format!("未知排序策略: {}", s))
}

fn load_config(cli: &CliArgs) -> anyhow::Result<ConfigManager> {
    let mut config = match &cli.config {
        Some(path) => ConfigManager::new(path)?,
        None => ConfigManager::load_default()?,
    };

    if cli.no_backorder {
        config.set_config_value(config_keys::ALLOW_BACKORDER, "false")?;
    }
    if let Some(ordering) = cli.ordering {
        config.set_config_value(config_keys::STOCK_ORDERING, &ordering.to_string())?;
    }
    if let Some(locale) = &cli.locale {
        config.set_config_value(config_keys::LOCALE, locale)?;
    }
    Ok(config)
}

fn run(cli: CliArgs) -> anyhow::Result<ExitCode> {
    if cli.json_log {
        lot_allocator::logging::init_json();
    } else {
        lot_allocator::logging::init();
    }
    tracing::debug!("{} v{}", lot_allocator::APP_NAME, lot_allocator::VERSION);

    let config = load_config(&cli)?;
    set_locale(config.locale());
    tracing::debug!(config = %config.get_config_snapshot()?, "有效配置");

    let stocks = StockSnapshotLoader
        .load(&cli.stock_file)
        .with_context(|| format!("无法加载库存快照: {}", cli.stock_file.display()))?;

    let mut request = AllocationRequest::new(cli.required, stocks);
    if let Some(path) = &cli.existing {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取已保存分配: {}", path.display()))?;
        let records: Vec<AllocationRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("已保存分配格式错误: {}", path.display()))?;
        request = request.with_existing(records);
    }

    let mut allocator = StockAllocator::new(&config);
    let summary = allocator.open(request)?;
    if summary.total_available == 0 && summary.has_backorder {
        eprintln!("{}", t("allocation.fully_backordered"));
    }

    match allocator.save() {
        Ok(records) => {
            let output = serde_json::json!({
                "summary": summary,
                "records": records,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_validation() => {
            eprintln!("{}", e.user_message());
            let preview = serde_json::to_string_pretty(&allocator.preview_records())?;
            eprintln!("{}", preview);
            allocator.cancel()?;
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> ExitCode {
    let cli = match CliArgs::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help / --version 正常退出；参数错误归入输入错误
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", t("common.failed"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(list: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("lot-allocator").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_args() {
        let cli = parse(&[
            "stocks.csv",
            "--required",
            "10",
            "--no-backorder",
            "--ordering",
            "fefo",
        ])
        .unwrap();
        assert_eq!(cli.stock_file, PathBuf::from("stocks.csv"));
        assert_eq!(cli.required, 10);
        assert!(cli.no_backorder);
        assert_eq!(cli.ordering, Some(StockOrdering::Fefo));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse(&["stocks.csv"]).is_err());
        assert!(parse(&["--required", "5"]).is_err());
        assert!(parse(&["stocks.csv", "--required", "-1"]).is_err());
        assert!(parse(&["stocks.csv", "--required"]).is_err());
        assert!(parse(&["a.csv", "b.csv", "--required", "1"]).is_err());
        assert!(parse(&["a.csv", "--required", "1", "--bogus"]).is_err());
        assert!(parse(&["a.csv", "--required", "1", "--ordering", "lifo"]).is_err());
        assert!(parse(&["a.csv", "--required", "1", "--locale", "fr"]).is_err());
    }

    #[test]
    fn test_load_config_overrides() {
        let cli = CliArgs {
            config: Some(PathBuf::from("/nonexistent/lot-allocator.json")),
            no_backorder: true,
            ordering: Some(StockOrdering::Fifo),
            ..CliArgs::default()
        };
        let config = load_config(&cli).unwrap();
        assert!(!config.allow_backorder());
        assert_eq!(config.stock_ordering(), StockOrdering::Fifo);
    }
}
