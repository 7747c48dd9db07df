//! 로깅 초기화
//!
//! `[general]` 설정에 따라 `tracing-subscriber`를 구성합니다.
//! JSON 구조화 로그와 사람이 읽기 쉬운 pretty 형식을 지원합니다.
//! `RUST_LOG` 환경변수가 있으면 설정의 `log_level`보다 우선합니다.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::GeneralConfig;
use crate::error::ModkitError;

/// 전역 tracing subscriber를 설치합니다.
///
/// 프로세스당 한 번만 성공합니다. 이미 설치되어 있으면 [`ModkitError::Logging`]을 반환합니다.
///
/// * `"json"` - 기계가 읽는 JSON 줄 (운영 기본값)
/// * `"pretty"` - 사람이 읽는 컬러 출력 (개발용)
pub fn init_tracing(config: &GeneralConfig) -> Result<(), ModkitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| {
                ModkitError::Logging(format!("failed to initialize JSON tracing subscriber: {e}"))
            }),
        "pretty" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .map_err(|e| {
                ModkitError::Logging(format!(
                    "failed to initialize pretty tracing subscriber: {e}"
                ))
            }),
        other => Err(ModkitError::Logging(format!(
            "unknown log format '{other}', expected 'json' or 'pretty'"
        ))),
    }
}
