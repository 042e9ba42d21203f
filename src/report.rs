//! 실행 결과 보고 모듈
//!
//! 실행 통계와 변환 계획을 사람이 읽을 수 있는 요약으로 만듭니다.

use colored::Colorize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::converter::ConversionPlan;
use crate::stats::{format_bytes, format_duration, FileFailure, RunStatistics};

const RULE_WIDTH: usize = 60;

/// 최종 통계 요약 문자열
pub fn format_summary(stats: &RunStatistics, output_root: &Path) -> String {
    let mut out = String::new();
    let errors = stats.error_files();

    let _ = writeln!(out, "\n{}", "═".repeat(RULE_WIDTH).bright_blue());
    let _ = writeln!(out, "{}", " 🎉 변환 완료".bright_white().bold());
    let _ = writeln!(out, "{}", "═".repeat(RULE_WIDTH).bright_blue());

    let _ = writeln!(out, "  {} 처리한 파일:      {}", "📁".bright_cyan(), stats.total_files());
    let _ = writeln!(
        out,
        "  {} 변환된 파일:      {}",
        "✅".bright_green(),
        stats.converted_files().to_string().green()
    );
    let _ = writeln!(
        out,
        "  {} 그대로 복사:      {}",
        "📋".bright_white(),
        stats.unchanged_files()
    );

    if errors > 0 {
        let _ = writeln!(
            out,
            "  {} 실패:             {}",
            "❌".bright_red(),
            errors.to_string().red()
        );
    } else {
        let _ = writeln!(out, "  {} 실패:             {}", "✅".bright_green(), "0".green());
    }

    let _ = writeln!(
        out,
        "  {} 총 치환 수:       {}",
        "🔄".bright_magenta(),
        stats.total_substitutions()
    );
    let _ = writeln!(
        out,
        "  {} 인덱스 파일:      {}",
        "🗂️".bright_yellow(),
        stats.index_files()
    );
    let _ = writeln!(
        out,
        "  {} 입력/출력 용량:   {} / {}",
        "📦".bright_white(),
        format_bytes(stats.bytes_read()),
        format_bytes(stats.bytes_written())
    );
    let _ = writeln!(
        out,
        "  {} 처리 시간:        {}",
        "⏱️".bright_cyan(),
        format_duration(stats.elapsed())
    );
    let _ = writeln!(
        out,
        "\n  {} 출력 위치: {}",
        "📂".bright_green(),
        output_root.display()
    );
    let _ = write!(out, "{}", "═".repeat(RULE_WIDTH).bright_blue());

    if errors > 0 {
        let _ = write!(
            out,
            "\n\n{} {} 개의 파일에서 오류가 발생했습니다. 위 로그를 확인하세요.",
            "⚠️".bright_yellow(),
            errors.to_string().red()
        );
    }

    out
}

/// 최종 통계 요약 출력
pub fn print_summary(stats: &RunStatistics, output_root: &Path) {
    println!("{}", format_summary(stats, output_root));
}

/// 실패 파일 목록 문자열 (verbose면 메시지 포함)
pub fn format_failures(failures: &[FileFailure], verbose: bool) -> String {
    let mut out = String::new();
    if failures.is_empty() {
        return out;
    }

    let _ = writeln!(out, "\n{}", "❌ 오류 발생 파일:".bright_red());
    for failure in failures {
        let _ = writeln!(out, "  {} {}", "•".red(), failure.path.display());
        if verbose {
            let _ = writeln!(out, "    {}", failure.message.dimmed());
        }
    }
    out
}

/// 드라이런용 변환 계획 문자열
pub fn format_plan(plan: &ConversionPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", "📋 변환 예정 파일 목록:".bright_cyan());
    for collection in &plan.collections {
        let name = collection.collection.dir_name();
        match &collection.files {
            Some(files) => {
                let _ = writeln!(out, "  [{}] {} 개", name, files.len());
                for (i, path) in files.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "    {}. {}",
                        i + 1,
                        path.file_name().unwrap_or_default().to_string_lossy()
                    );
                }
                for failure in &collection.errors {
                    let _ = writeln!(out, "    {} {}", "✗".red(), failure.message);
                }
            }
            None => {
                let _ = writeln!(out, "  [{}] {}", name, "폴더 없음 (건너뜀)".yellow());
            }
        }
    }

    let _ = writeln!(out, "  [index] {} 개", plan.index_files.len());
    for (kind, _) in &plan.index_files {
        let _ = writeln!(out, "    - {}", kind.file_name());
    }

    let _ = write!(
        out,
        "\n{} 총 {} 개의 항목 파일이 변환될 예정입니다.",
        "ℹ️".bright_blue(),
        plan.item_count().to_string().bright_green()
    );
    out
}

/// 에러 로그 파일 작성
pub fn write_error_log(log_path: &Path, failures: &[FileFailure]) -> std::io::Result<()> {
    let mut log_file = File::create(log_path)?;

    writeln!(log_file, "flowport 에러 로그")?;
    writeln!(log_file, "생성 시간: {}", chrono::Utc::now().to_rfc3339())?;
    writeln!(log_file, "총 에러 수: {}", failures.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for failure in failures {
        writeln!(log_file, "\n파일: {}", failure.path.display())?;
        writeln!(log_file, "에러: {}", failure.message)?;
    }

    Ok(())
}
