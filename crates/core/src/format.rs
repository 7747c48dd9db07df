//! 통계 출력 — peg 값을 콘솔, 파일, 메트릭 레코더로 내보내는 협력자
//!
//! 모듈은 카운터 이름과 값만 제공하고, 형식과 출력 대상은 [`StatsFormatter`]
//! 구현이 결정합니다.
//!
//! - [`TextFormatter`]: 사람이 읽는 `name: value` 줄 (콘솔/파일)
//! - [`JsonFormatter`]: 모듈당 JSON 한 줄
//! - [`MetricsFormatter`]: `metrics` 레코더로 게시 (Prometheus 등)
//!
//! [`from_config`]는 `[stats]` 설정의 `output_format`/`show_zero_counts`로 구현을 고릅니다.

use std::io::Write;

use serde::Serialize;

use crate::config::StatsConfig;
use crate::error::{ConfigError, ModkitError};
use crate::metrics as m;
use crate::peg::{CountType, PegEntry};

/// 카운터 목록을 받아 출력하는 협력자
pub trait StatsFormatter {
    /// 한 모듈의 카운터를 출력합니다.
    fn emit(&mut self, module: &str, entries: &[PegEntry<'_>]) -> Result<(), ModkitError>;
}

/// `[stats]` 설정에 맞는 출력 협력자를 만듭니다.
///
/// `output_format`이 `text`면 `show_zero_counts`를 반영한 [`TextFormatter`],
/// `json`이면 [`JsonFormatter`], `metrics`면 [`MetricsFormatter`]를 반환합니다.
/// `metrics`는 `out`을 사용하지 않습니다.
pub fn from_config<'a, W: Write + 'a>(
    config: &StatsConfig,
    out: W,
) -> Result<Box<dyn StatsFormatter + 'a>, ModkitError> {
    match config.output_format.as_str() {
        "text" => Ok(Box::new(
            TextFormatter::new(out).show_zero(config.show_zero_counts),
        )),
        "json" => Ok(Box::new(JsonFormatter::new(out))),
        "metrics" => Ok(Box::new(MetricsFormatter)),
        other => Err(ConfigError::InvalidValue {
            field: "stats.output_format".to_owned(),
            reason: format!("unknown output format '{other}'"),
        }
        .into()),
    }
}

/// 이름 열 너비
const NAME_WIDTH: usize = 25;

/// 텍스트 출력
///
/// ```text
/// stream_tcp
///                   packets: 1024
///                  sessions: 12
/// ```
///
/// 기본적으로 0인 카운터는 생략하며, 출력할 줄이 없으면 모듈 헤더도 쓰지 않습니다.
#[derive(Debug)]
pub struct TextFormatter<W> {
    out: W,
    show_zero: bool,
}

impl<W: Write> TextFormatter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_zero: false,
        }
    }

    /// 0인 카운터도 출력할지 지정합니다.
    pub fn show_zero(mut self, show: bool) -> Self {
        self.show_zero = show;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatsFormatter for TextFormatter<W> {
    fn emit(&mut self, module: &str, entries: &[PegEntry<'_>]) -> Result<(), ModkitError> {
        let mut header = false;
        for e in entries {
            if e.value == 0 && !self.show_zero {
                continue;
            }
            if !header {
                writeln!(self.out, "{module}")?;
                header = true;
            }
            writeln!(self.out, "{:>width$}: {}", e.name, e.value, width = NAME_WIDTH)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    module: &'a str,
    pegs: &'a [PegEntry<'a>],
}

/// JSON Lines 출력 — 모듈당 한 줄
#[derive(Debug)]
pub struct JsonFormatter<W> {
    out: W,
}

impl<W: Write> JsonFormatter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatsFormatter for JsonFormatter<W> {
    fn emit(&mut self, module: &str, entries: &[PegEntry<'_>]) -> Result<(), ModkitError> {
        let record = JsonRecord {
            module,
            pegs: entries,
        };
        serde_json::to_writer(&mut self.out, &record)?;
        writeln!(self.out)?;
        Ok(())
    }
}

/// `metrics` 레코더로 게시
///
/// Sum 카운터는 counter(절대값), Now/Max는 gauge로 게시합니다.
/// 레이블은 `module`, `peg`입니다. 레코더가 설치되지 않았으면 아무 일도 하지 않습니다.
#[derive(Debug, Default)]
pub struct MetricsFormatter;

impl StatsFormatter for MetricsFormatter {
    fn emit(&mut self, module: &str, entries: &[PegEntry<'_>]) -> Result<(), ModkitError> {
        for e in entries {
            let module = module.to_owned();
            let peg = e.name.to_owned();
            match e.kind {
                CountType::Sum => {
                    metrics::counter!(m::PEG_COUNT_TOTAL, m::LABEL_MODULE => module, m::LABEL_PEG => peg)
                        .absolute(e.value);
                }
                CountType::Now | CountType::Max => {
                    let name = if e.kind == CountType::Now {
                        m::PEG_COUNT_CURRENT
                    } else {
                        m::PEG_COUNT_MAX
                    };
                    // u64 → f64: 2^53 이상의 카운터는 정밀도 손실이 있지만 게이지 표시에는 문제없음
                    #[allow(clippy::cast_precision_loss)]
                    {
                        metrics::gauge!(name, m::LABEL_MODULE => module, m::LABEL_PEG => peg)
                            .set(e.value as f64);
                    }
                }
            }
        }
        Ok(())
    }
}
