//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

/// flowport CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "flowport",
    author = "YourName <your@email.com>",
    version,
    about = "STORE NAMESPACE CONVERTER - 스토어 flow/component JSON의 네임스페이스 참조를 변환합니다",
    long_about = r#"
STORE NAMESPACE CONVERTER
=========================

내려받은 스토어의 flows / components JSON 파일에서
langflow 네임스페이스 참조(import 구문, 모듈 문자열, 문서 URL)를
axiestudio로 바꾸어 미러링된 출력 폴더에 저장합니다.

소스 폴더 구조:
  <source>/store_index.json
  <source>/flows/flows_index.json, <id>.json ...
  <source>/components/components_index.json, <id>.json ...

특징:
  • 파일 단위 오류 허용 (실패한 파일만 건너뜀)
  • 원자적 쓰기 (임시 파일 후 rename)
  • 재실행해도 결과가 같은 멱등 변환
  • 병렬 처리 및 진행률 표시

예제:
  flowport
  flowport -s ./store_components -o ./converted
  flowport -s ./store_components --dry-run
  flowport -s ./store_components -p "chat_*" --verbose --log errors.log
"#
)]
pub struct Args {
    /// 변환할 스토어 내보내기 폴더
    #[arg(short, long, default_value = "src/store_components")]
    pub source: PathBuf,

    /// 변환 결과를 저장할 폴더
    #[arg(short, long, default_value = "src/store_components_converted")]
    pub output: PathBuf,

    /// 항목 파일 이름 패턴 필터 (glob 형식, 예: "chat_*", "[0-9]*.json")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 상세 출력 모드 (debug 로그, 에러 메시지 표시)
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 변환 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 한 줄 JSON으로 출력 (기본값: 2칸 들여쓰기)
    #[arg(long)]
    pub compact: bool,

    /// 병렬 처리 스레드 수 (기본값: CPU 코어 수)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl Args {
    /// 기본 로그 필터 (RUST_LOG가 없을 때)
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
