//! 트레이스 마스크 — 이름 있는 트레이스 옵션을 런타임 비트마스크로 컴파일
//!
//! [`TraceMask`]는 `{alias, mask}` 쌍의 정적 목록입니다. 설정 워크 중
//! `trace.<alias> = on/off` 값을 받으면 해당 비트를 대상 마스크에 OR합니다.
//! 비트는 추가만 되고 이 경로로는 지워지지 않습니다.
//!
//! 대상 마스크는 [`TraceHandle`]로 공유되어 로깅 계층이 다른 스레드에서 읽을 수 있습니다.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::param::{ParamKind, Parameter};
use crate::value::Value;

/// 트레이스 비트마스크
pub type Trace = u64;

/// 트레이스 옵션 이름과 비트 값
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceValue {
    pub alias: &'static str,
    pub mask: Trace,
}

impl TraceValue {
    pub const fn new(alias: &'static str, mask: Trace) -> Self {
        Self { alias, mask }
    }
}

/// 불변 트레이스 옵션 집합
///
/// 중복 alias는 허용되며 조회 시 앞쪽 항목이 우선합니다.
#[derive(Debug, Clone, Copy)]
pub struct TraceMask {
    values: &'static [TraceValue],
}

impl TraceMask {
    pub const fn new(values: &'static [TraceValue]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &'static [TraceValue] {
        self.values
    }

    /// 값이 가리키는 트레이스 옵션을 대상 마스크에 반영합니다.
    ///
    /// 일치하는 alias가 있으면 `true`를 반환합니다. 값이 0이면 마스크는 그대로입니다.
    /// 일치하는 alias가 없으면 `false`를 반환하고 마스크를 건드리지 않습니다.
    pub fn try_set(&self, v: &Value, target: &mut Trace) -> bool {
        match self.values.iter().find(|tv| v.is(tv.alias)) {
            Some(tv) => {
                if v.get_u8() != 0 {
                    *target |= tv.mask;
                }
                true
            }
            None => false,
        }
    }

    /// 모든 트레이스 옵션의 비트를 대상 마스크에 OR합니다.
    pub fn apply_all(&self, target: &mut Trace) {
        for tv in self.values {
            *target |= tv.mask;
        }
    }
}

const DEFAULT_TRACE_VALUES: &[TraceValue] = &[TraceValue::new("all", 1)];

/// 자체 트레이스 스키마가 없는 모듈에 주어지는 기본 마스크 (`all` = 1)
pub static DEFAULT_TRACE_MASK: TraceMask = TraceMask::new(DEFAULT_TRACE_VALUES);

const DEFAULT_TRACE: &[Parameter] = &[Parameter::new(
    "all",
    ParamKind::Bool,
    None,
    Some("false"),
    "enabling traces in module",
)];

/// 기본 트레이스 파라미터 스키마 (`trace = { all }`)
pub static DEFAULT_TRACE_PARAMS: &[Parameter] =
    &[Parameter::table("trace", DEFAULT_TRACE, "trace config")];

/// 모듈이 갱신하고 로깅 계층이 읽는 공유 트레이스 대상
///
/// 워커 스레드마다 있는 모듈 인스턴스가 하나의 대상을 공유할 수 있습니다.
/// 비트 추가는 [`add`](Self::add)의 `fetch_or`로만 이루어지며, [`set`](Self::set)은 명시적 초기화용입니다.
#[derive(Debug, Clone, Default)]
pub struct TraceHandle(Arc<AtomicU64>);

impl TraceHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 마스크
    pub fn get(&self) -> Trace {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, mask: Trace) {
        self.0.store(mask, Ordering::Relaxed);
    }

    /// 비트가 하나라도 켜져 있는지 확인합니다.
    pub fn enabled(&self, bits: Trace) -> bool {
        self.get() & bits != 0
    }

    /// 비트를 원자적으로 OR합니다. 같은 대상을 공유하는 여러 모듈이 동시에 써도 비트가 유실되지 않습니다.
    pub fn add(&self, bits: Trace) {
        if bits != 0 {
            self.0.fetch_or(bits, Ordering::Relaxed);
        }
    }
}
