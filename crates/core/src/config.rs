//! 설정 관리 — modkit.toml 파싱 및 런타임 설정
//!
//! [`ModkitConfig`]는 로깅, 통계 집계, 트레이스 활성화 방식을 담는 최상위 구조체입니다.
//! 모듈별 옵션은 여기가 아니라 각 모듈의 파라미터 스키마와 설정 워크로 전달됩니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`MODKIT_STATS_ACCUMULATE_NOW_STATS=true` 형식)
//! 2. 설정 파일 (`modkit.toml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), modkit_core::error::ModkitError> {
//! use modkit_core::config::ModkitConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ModkitConfig::load("modkit.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ModkitConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ModkitError};

/// modkit 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModkitConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 통계 집계 설정
    #[serde(default)]
    pub stats: StatsConfig,
    /// 트레이스 설정
    #[serde(default)]
    pub trace: TraceConfig,
}

impl ModkitConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ModkitError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ModkitError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ModkitError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ModkitError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ModkitError> {
        toml::from_str(toml_str).map_err(|e| {
            ModkitError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `MODKIT_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "MODKIT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "MODKIT_GENERAL_LOG_FORMAT");

        override_bool(
            &mut self.stats.accumulate_now_stats,
            "MODKIT_STATS_ACCUMULATE_NOW_STATS",
        );
        override_bool(
            &mut self.stats.show_zero_counts,
            "MODKIT_STATS_SHOW_ZERO_COUNTS",
        );
        override_string(&mut self.stats.output_format, "MODKIT_STATS_OUTPUT_FORMAT");

        override_bool(&mut self.trace.enable_all, "MODKIT_TRACE_ENABLE_ALL");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ModkitError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        let valid_outputs = ["text", "json", "metrics"];
        if !valid_outputs.contains(&self.stats.output_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "stats.output_format".to_owned(),
                reason: format!("must be one of: {}", valid_outputs.join(", ")),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 통계 집계 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// 집계 시 Now 유형 카운터도 누적할지 여부
    pub accumulate_now_stats: bool,
    /// 텍스트 출력에서 0인 카운터도 표시할지 여부
    pub show_zero_counts: bool,
    /// 출력 형식 (text, json, metrics)
    pub output_format: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            accumulate_now_stats: false,
            show_zero_counts: false,
            output_format: "text".to_owned(),
        }
    }
}

/// 트레이스 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// 모든 모듈의 모든 트레이스 옵션을 켤지 여부
    pub enable_all: bool,
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}
