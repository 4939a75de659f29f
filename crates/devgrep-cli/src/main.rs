mod style;

use anyhow::{Context, Result};
use clap::Parser;
use devgrep_core::{
    scan, ExtensionFilter, Highlight, IoErrorPolicy, Plain, ScanConfig, ScanMode, ScanStats, Settings, TextReporter,
};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::style::{Ansi, ColorChoice};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(
    name = "devgrep",
    version,
    about = "Recursively grep (or replace) literal strings in source files",
    after_help = "Examples:\n  devgrep -e py,c,h pattern    # extensions\n  devgrep foo bar              # 'foo' AND 'bar' on the same line\n  devgrep -r foo bar           # replace 'foo' with 'bar'\n  devgrep foo -n 5             # also print 5 lines before and after"
)]
struct Cli {
    /// 要查找的字面量；多个时须出现在同一行。替换模式下为 <源> <目标>
    #[arg(required = true, value_name = "PATTERN")]
    patterns: Vec<String>,

    /// 将第一个 pattern 替换为第二个（原地写回，无备份）
    #[arg(short, long)]
    replace: bool,

    /// 大小写不敏感
    #[arg(short, long)]
    ignore_case: bool,

    /// 扩展名列表，逗号分隔；"*" 表示所有文件
    #[arg(short, long, value_delimiter = ',', value_name = "EXTS")]
    exts: Option<Vec<String>>,

    /// 命中行前后各打印的行数
    #[arg(short = 'n', long, default_value_t = 0, value_name = "LINES")]
    nlines: usize,

    /// 扫描的根目录
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// 设置文件（TOML）
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 何时着色
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, value_name = "WHEN")]
    color: ColorChoice,

    /// 单文件读写失败时打印警告并继续，而不是终止
    #[arg(long)]
    keep_going: bool,
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    debug!(?config, "resolved configuration");
    info!(dir = %cli.dir.display(), mode = ?config.mode, "starting scan");

    let stats = if cli.color.enabled() {
        run(&cli, &config, Ansi)?
    } else {
        run(&cli, &config, Plain)?
    };

    info!(
        files_scanned = stats.files_scanned,
        files_skipped = stats.files_skipped,
        occurrences = stats.occurrences,
        "scan finished"
    );
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写 stderr，stdout 只留给查找结果；默认仅输出 warn 及以上
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 组装扫描配置：默认值 → 设置文件 → 命令行
fn build_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = ScanConfig {
        patterns: cli.patterns.clone(),
        mode: if cli.replace { ScanMode::Replace } else { ScanMode::Find },
        ignore_case: cli.ignore_case,
        context_lines: cli.nlines,
        on_io_error: if cli.keep_going { IoErrorPolicy::Skip } else { IoErrorPolicy::Abort },
        ..ScanConfig::default()
    };
    if let Some(path) = &cli.config {
        Settings::load(path)?.apply(&mut config)?;
    }
    if let Some(exts) = &cli.exts {
        config.extensions = ExtensionFilter::parse(exts)?;
    }
    // 提前校验，保证任何文件被触碰前失败
    config.validate()?;
    Ok(config)
}

fn run<H: Highlight>(cli: &Cli, config: &ScanConfig, style: H) -> Result<ScanStats> {
    let stdout = io::stdout();
    let mut reporter = TextReporter::new(BufWriter::new(stdout.lock()), style);
    let stats = scan(&cli.dir, config, &mut reporter).context("scan failed")?;
    reporter.into_inner().flush().context("flush output")?;
    Ok(stats)
}
