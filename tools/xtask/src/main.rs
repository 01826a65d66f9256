//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-core`: 运行 text-type 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `config-check`: 检查配置文件（解析、动画诊断、画廊图片引用）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use host::{FsCatalog, ImageCatalog, SiteConfig};
use text_type::{AnimationConfig, DiagnosticResult, check_config};
use walkdir::WalkDir;

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-core" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "text-type", "--html"]);
            run("cargo llvm-cov -p text-type --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            ensure_cargo_llvm_cov_available()?;

            // 排除 xtask，避免稀释信号
            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "--workspace", "--exclude", "xtask", "--html"]);
            run(
                "cargo llvm-cov --workspace --exclude xtask --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "config-check" => {
            let path = args.next();
            config_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-core        运行 text-type 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  config-check    检查配置文件

CONFIG-CHECK:
  cargo xtask config-check [path]

  不带参数：检查当前目录下所有 .json 文件（跳过 target/）
  带路径参数：检查指定文件或目录

  站点配置（含 hero/reveal/galleries/terminal 任一字段）：
    - 配置验证
    - 标语动画诊断
    - 画廊列出的图片是否存在
  其余 JSON 按单个动画配置处理：
    - 动画诊断

ALIASES (in .cargo/config.toml):
  cargo check-all     -> cargo xtask check-all
  cargo cov-core      -> cargo xtask cov-core
  cargo cov-workspace -> cargo xtask cov-workspace
  cargo config-check  -> cargo xtask config-check
"#
    );
}

//=============================================================================
// config-check 命令实现
//=============================================================================

/// 站点配置的顶层字段
const SITE_KEYS: &[&str] = &["hero", "reveal", "galleries", "terminal"];

/// 配置检查结果
#[derive(Default)]
struct ConfigCheckResult {
    /// 检查的文件数量
    files_checked: usize,
    /// 解析 / 验证错误数量
    load_errors: usize,
    /// 诊断结果
    diagnostics: DiagnosticResult,
    /// 缺失的图片
    missing_images: Vec<MissingImage>,
}

/// 缺失的图片信息
struct MissingImage {
    config: String,
    gallery: String,
    path: String,
}

/// 执行配置检查
fn config_check(path: Option<&str>) -> anyhow::Result<()> {
    let root = PathBuf::from(path.unwrap_or("."));
    let files = if root.is_file() {
        vec![root]
    } else if root.is_dir() {
        collect_config_files(&root)
    } else {
        anyhow::bail!("路径不存在: {}", root.display());
    };

    if files.is_empty() {
        eprintln!("未找到配置文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个配置文件...\n", files.len());

    let mut result = ConfigCheckResult::default();
    for file in &files {
        check_config_file(file, &mut result);
    }

    print_check_result(&result);

    if result.load_errors > 0 || result.diagnostics.has_errors() {
        anyhow::bail!("配置检查发现错误");
    }

    Ok(())
}

/// 收集目录下的所有 JSON 文件
fn collect_config_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 构建产物、隐藏目录不参与检查
fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "target" || name.starts_with('.')
}

/// 检查单个配置文件
fn check_config_file(file: &Path, result: &mut ConfigCheckResult) {
    let source = file.display().to_string();
    result.files_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}: 无法读取文件 - {}", source, e);
            result.load_errors += 1;
            return;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("[ERROR] {}: {}", source, e);
            result.load_errors += 1;
            return;
        }
    };

    let is_site = value
        .as_object()
        .is_some_and(|obj| SITE_KEYS.iter().any(|key| obj.contains_key(*key)));

    if is_site {
        check_site_config(file, &source, value, result);
    } else {
        match serde_json::from_value::<AnimationConfig>(value) {
            Ok(config) => result.diagnostics.merge(check_config(&source, &config)),
            Err(e) => {
                eprintln!("[ERROR] {}: {}", source, e);
                result.load_errors += 1;
            }
        }
    }
}

fn check_site_config(
    file: &Path,
    source: &str,
    value: serde_json::Value,
    result: &mut ConfigCheckResult,
) {
    let config: SiteConfig = match serde_json::from_value(value) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ERROR] {}: {}", source, e);
            result.load_errors += 1;
            return;
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("[ERROR] {}: {}", source, e);
        result.load_errors += 1;
    }

    let mut diagnostics = config.diagnostics();
    for diag in &mut diagnostics.diagnostics {
        diag.source = format!("{} ({})", source, diag.source);
    }
    result.diagnostics.merge(diagnostics);

    let base = file.parent().unwrap_or(Path::new(""));
    let catalog = FsCatalog::new(base);
    for section in &config.galleries {
        let images = catalog.images(section);
        for image in images {
            if !base.join(&image).exists() {
                result.missing_images.push(MissingImage {
                    config: source.to_string(),
                    gallery: section.title.clone(),
                    path: image,
                });
            }
        }
    }
}

/// 输出检查结果
fn print_check_result(result: &ConfigCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个配置文件", result.files_checked);
    eprintln!();

    for diag in &result.diagnostics.diagnostics {
        eprintln!("{}", diag);
    }

    for mi in &result.missing_images {
        eprintln!(
            "[WARN] {}: 图片不存在 [{}] {}",
            mi.config, mi.gallery, mi.path
        );
    }

    let error_count = result.load_errors + result.diagnostics.error_count();
    let warn_count = result.diagnostics.warn_count() + result.missing_images.len();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
