//! 모듈 — 설정 워크 검증, peg 통계, 트레이스 활성화를 묶는 집합 루트
//!
//! [`Module`]은 고정된 검증 계층입니다. 테이블 중첩 깊이, 리스트형 모듈 제약,
//! 기본 트레이스 옵션 처리를 직접 수행한 뒤 모듈별 동작은 [`ModuleHooks`]에 위임합니다.
//! 구체 모듈은 훅만 구현하므로 깊이 규칙을 다시 구현할 필요가 없습니다.
//!
//! # 설정 워크
//! ```text
//! enter_table("stream.ports", 0)   table_level 1 → 2, hooks.begin()
//!   apply_value("stream.ports.port", 80)          hooks.set()
//! exit_table("stream.ports", 0)    table_level 2 → 1, hooks.end()
//! ```
//!
//! # 사용 예시
//! ```
//! use modkit_core::module::{Module, ModuleHooks};
//! use modkit_core::peg::{PegCount, PegInfo, SIMPLE_PEGS};
//! use modkit_core::trace::TraceHandle;
//! use modkit_core::value::Value;
//!
//! #[derive(Default)]
//! struct Counter {
//!     live: [PegCount; 1],
//! }
//!
//! impl ModuleHooks for Counter {
//!     fn pegs(&self) -> Option<&'static [PegInfo]> {
//!         Some(SIMPLE_PEGS)
//!     }
//!     fn counts_mut(&mut self) -> Option<&mut [PegCount]> {
//!         Some(&mut self.live[..])
//!     }
//! }
//!
//! let trace = TraceHandle::new();
//! let mut module = Module::new("counter", "counts packets", Counter::default())
//!     .with_trace(trace.clone());
//!
//! assert!(module.apply_value("counter.trace.all", &Value::bool("all", true)));
//! assert_eq!(trace.get(), 1);
//!
//! module.hooks_mut().live[0] = 5;
//! module.sum_stats(false);
//! assert_eq!(module.get_global_count("packets"), 5);
//! ```

use tracing::{debug, info, warn};

use crate::error::ModkitError;
use crate::format::StatsFormatter;
use crate::param::Parameter;
use crate::peg::{PegCount, PegInfo, PegStats};
use crate::trace::{DEFAULT_TRACE_MASK, DEFAULT_TRACE_PARAMS, Trace, TraceHandle, TraceMask};
use crate::value::Value;

/// 트레이스 옵션으로 취급되는 fqn 경로 조각
///
/// 경로 세그먼트 단위가 아닌 부분 문자열 포함 여부로 검사합니다.
pub const TRACE_SEGMENT: &str = ".trace.";

/// 모듈별 `set` 훅의 판정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// 모듈이 값을 받아들임
    Accepted,
    /// 모듈이 자기 옵션이지만 값을 거부함
    Rejected,
    /// 모듈이 모르는 옵션 — 기본 처리(트레이스 옵션 또는 미인식)로 넘어감
    Unknown,
}

/// 구체 모듈이 구현하는 훅
///
/// 모든 메서드에 기본 구현이 있으므로 필요한 것만 재정의합니다.
pub trait ModuleHooks {
    /// 테이블 진입. 깊이는 이미 증가한 상태입니다.
    fn begin(&mut self, _fqn: &str, _idx: usize) -> bool {
        true
    }

    /// 스칼라 값 설정
    fn set(&mut self, _fqn: &str, _v: &Value) -> SetOutcome {
        SetOutcome::Unknown
    }

    /// 테이블 종료. 깊이는 이미 감소한 상태입니다.
    fn end(&mut self, _fqn: &str, _idx: usize) -> bool {
        true
    }

    /// 카운터 기술자
    fn pegs(&self) -> Option<&'static [PegInfo]> {
        None
    }

    /// 기술자와 같은 순서의 라이브 카운터
    fn counts_mut(&mut self) -> Option<&mut [PegCount]> {
        None
    }

    /// 라이브 값이 이미 전역 합계인 모듈이면 `true`
    fn global_stats(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
struct TraceBinding {
    mask: &'static TraceMask,
    target: TraceHandle,
}

/// 검증 계층이 붙은 모듈
pub struct Module<H> {
    name: String,
    help: String,
    params: &'static [Parameter],
    default_params: &'static [Parameter],
    trace: Option<TraceBinding>,
    list: bool,
    table_level: usize,
    stats: PegStats,
    hooks: H,
}

impl<H: ModuleHooks> Module<H> {
    /// 파라미터와 트레이스가 없는 모듈을 만듭니다.
    pub fn new(name: impl Into<String>, help: impl Into<String>, hooks: H) -> Self {
        let stats = PegStats::new(hooks.pegs());
        Self {
            name: name.into(),
            help: help.into(),
            params: &[],
            default_params: &[],
            trace: None,
            list: false,
            table_level: 0,
            stats,
            hooks,
        }
    }

    /// 모듈 파라미터 스키마를 지정합니다.
    pub fn with_params(mut self, params: &'static [Parameter]) -> Self {
        self.params = params;
        self
    }

    /// 리스트형 모듈로 표시합니다.
    ///
    /// 리스트형 모듈은 최소 한 단계의 중첩 테이블 안(깊이 2 이상)에서만 값을 받습니다.
    pub fn as_list(mut self) -> Self {
        self.list = true;
        self
    }

    /// 기본 트레이스 스키마(`trace.all`)로 트레이스를 지원합니다.
    pub fn with_trace(self, target: TraceHandle) -> Self {
        self.with_trace_schema(target, DEFAULT_TRACE_PARAMS, &DEFAULT_TRACE_MASK)
    }

    /// 모듈 전용 트레이스 스키마로 트레이스를 지원합니다.
    pub fn with_trace_schema(
        mut self,
        target: TraceHandle,
        params: &'static [Parameter],
        mask: &'static TraceMask,
    ) -> Self {
        self.default_params = params;
        self.trace = Some(TraceBinding { mask, target });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn params(&self) -> &'static [Parameter] {
        self.params
    }

    /// 모든 모듈에 공통으로 붙는 옵션 스키마 (현재는 트레이스 테이블)
    pub fn default_params(&self) -> &'static [Parameter] {
        self.default_params
    }

    pub fn is_list(&self) -> bool {
        self.list
    }

    /// 현재 테이블 중첩 깊이
    pub fn table_level(&self) -> usize {
        self.table_level
    }

    pub fn trace_target(&self) -> Option<&TraceHandle> {
        self.trace.as_ref().map(|t| &t.target)
    }

    pub fn stats(&self) -> &PegStats {
        &self.stats
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    // ─── 설정 워크 ───────────────────────────────────────────────────

    /// 테이블에 진입합니다. 깊이를 올린 뒤 `begin` 훅의 결과를 반환합니다.
    pub fn enter_table(&mut self, fqn: &str, idx: usize) -> bool {
        self.table_level += 1;
        debug!(module = %self.name, fqn, idx, level = self.table_level, "enter table");
        self.hooks.begin(fqn, idx)
    }

    /// 스칼라 값을 적용합니다.
    ///
    /// 리스트형 모듈에서 깊이가 2 미만이면 무조건 실패합니다.
    pub fn apply_value(&mut self, fqn: &str, v: &Value) -> bool {
        if self.list && self.table_level < 2 {
            warn!(
                module = %self.name,
                fqn,
                level = self.table_level,
                "list module value outside of a table entry"
            );
            return false;
        }

        match self.hooks.set(fqn, v) {
            SetOutcome::Accepted => true,
            SetOutcome::Rejected => false,
            SetOutcome::Unknown => self.default_set(fqn, v),
        }
    }

    /// 테이블을 빠져나옵니다. 깊이를 내린 뒤 `end` 훅의 결과를 반환합니다.
    pub fn exit_table(&mut self, fqn: &str, idx: usize) -> bool {
        if self.table_level == 0 {
            warn!(module = %self.name, fqn, "exit_table without matching enter_table");
        }
        self.table_level = self.table_level.saturating_sub(1);
        debug!(module = %self.name, fqn, idx, level = self.table_level, "exit table");
        self.hooks.end(fqn, idx)
    }

    fn default_set(&self, fqn: &str, v: &Value) -> bool {
        if fqn.contains(TRACE_SEGMENT) {
            let Some(binding) = &self.trace else {
                warn!(module = %self.name, fqn, "module has no trace support");
                return false;
            };
            let mut delta: Trace = 0;
            let found = binding.mask.try_set(v, &mut delta);
            binding.target.add(delta);
            if !found {
                warn!(module = %self.name, fqn, "unknown trace option");
            }
            return found;
        }

        warn!(module = %self.name, fqn, "unrecognized option");
        false
    }

    /// 설정된 모든 트레이스 비트를 한 번에 켭니다.
    pub fn enable_trace(&self) {
        if let Some(binding) = &self.trace {
            let mut delta: Trace = 0;
            binding.mask.apply_all(&mut delta);
            binding.target.add(delta);
            info!(module = %self.name, mask = binding.target.get(), "trace enabled");
        }
    }

    // ─── 통계 ───────────────────────────────────────────────────────

    /// 라이브 카운터를 누적 값에 합칩니다.
    pub fn sum_stats(&mut self, accumulate_now: bool) {
        let global = self.hooks.global_stats();
        self.stats
            .sum(self.hooks.counts_mut(), global, accumulate_now);
    }

    /// 누적 값을 0으로 만듭니다. 카운터 수는 처음 호출에서만 결정됩니다.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// 이름으로 누적 값을 조회합니다. 모르는 이름은 호출자 버그입니다.
    pub fn get_global_count(&self, name: &str) -> PegCount {
        self.stats.get_global_count(name)
    }

    pub fn try_global_count(&self, name: &str) -> Option<PegCount> {
        self.stats.try_global_count(name)
    }

    /// 누적 값 전체를 출력합니다. 카운터가 없으면 아무것도 출력하지 않습니다.
    pub fn show_stats(&self, out: &mut dyn StatsFormatter) -> Result<(), ModkitError> {
        if self.stats.count().unwrap_or(0) == 0 {
            return Ok(());
        }
        out.emit(&self.name, &self.stats.entries())
    }

    /// 선택한 카운터의 라이브 값을 출력합니다.
    pub fn show_interval_stats(
        &mut self,
        indices: &[usize],
        out: &mut dyn StatsFormatter,
    ) -> Result<(), ModkitError> {
        if self.stats.count().unwrap_or(0) == 0 {
            return Ok(());
        }
        let Some(live) = self.hooks.counts_mut() else {
            return Ok(());
        };
        let entries = self.stats.interval_entries(live, indices);
        out.emit(&self.name, &entries)
    }
}
