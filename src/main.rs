//! flowport - STORE NAMESPACE CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use flowport::{
    cli::Args,
    converter::{plan, Converter},
    pattern::PatternMatcher,
    processor::ProcessOptions,
    report,
    transform::DocumentTransformer,
};

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    // 스레드 풀 설정
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("스레드 풀 초기화 실패")?;
    }

    print_header(&args);

    let matcher = PatternMatcher::new(args.pattern.clone())?;

    // 드라이런 모드
    if args.dry_run {
        let plan = plan(&args.source, &matcher)?;
        println!("{}", report::format_plan(&plan));
        return Ok(());
    }

    let options = ProcessOptions::new().with_pretty(!args.compact);
    let stats = Converter::new(DocumentTransformer::default())
        .with_matcher(matcher)
        .with_options(options)
        .with_progress(create_progress_bar())
        .run(&args.source, &args.output)
        .with_context(|| format!("변환 실패: {:?} → {:?}", args.source, args.output))?;

    let failures = stats.failures();
    print!("{}", report::format_failures(&failures, args.verbose));

    if let Some(ref log_path) = args.log {
        report::write_error_log(log_path, &failures)
            .with_context(|| format!("에러 로그를 쓸 수 없습니다: {:?}", log_path))?;
        println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);
    }

    let output_root = std::fs::canonicalize(&args.output).unwrap_or_else(|_| args.output.clone());
    report::print_summary(&stats, &output_root);
    print_next_steps(&output_root);

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(60).bright_blue());
    println!(
        "{}",
        " 🚀 STORE NAMESPACE CONVERTER".bright_white().bold()
    );
    println!("{}", "═".repeat(60).bright_blue());
    println!("  {} 소스 폴더: {:?}", "📂".bright_cyan(), args.source);

    if !args.dry_run {
        println!("  {} 출력 폴더: {:?}", "📄".bright_green(), args.output);
    }

    if let Some(ref pattern) = args.pattern {
        println!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    if args.compact {
        println!("  {} {}", "✨".bright_magenta(), "Compact 출력 모드".magenta());
    }

    println!("{}", "═".repeat(60).bright_blue());
}

/// 진행률 바 생성
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}

/// 다음 단계 안내
fn print_next_steps(output_root: &Path) {
    println!("\n{}", "🎯 다음 단계:".bright_cyan());
    println!("  1. {:?} 의 변환 결과를 검토하세요", output_root);
    println!("  2. 변환된 항목 몇 개를 대상 애플리케이션에서 실행해 보세요\n");
}
