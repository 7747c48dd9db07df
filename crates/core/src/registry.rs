//! 모듈 레지스트리 — 등록된 모듈에 대한 일괄 통계/트레이스 조작
//!
//! [`ModuleRegistry`]는 등록 순서를 보존하며, 같은 이름의 모듈은 한 번만 등록됩니다.
//! 구체 훅 타입이 다른 모듈을 함께 담기 위해 dyn-compatible한 [`DynModule`]을 사용합니다.
//!
//! # 사용 예시
//! ```ignore
//! let mut registry = ModuleRegistry::new();
//! registry.register(Box::new(stream_module))?;
//! registry.register(Box::new(http_module))?;
//!
//! registry.apply_config(&config);
//! // ... 패킷 처리 ...
//! registry.sum_all(&config.stats);
//! registry.show_all(&mut TextFormatter::new(std::io::stdout()))?;
//! ```

use tracing::{debug, info};

use crate::config::{ModkitConfig, StatsConfig};
use crate::error::{ModkitError, RegistryError};
use crate::format::{self, StatsFormatter};
use crate::metrics as m;
use crate::module::{Module, ModuleHooks};
use crate::peg::PegCount;
use crate::value::Value;

/// 레지스트리가 다루는 dyn-compatible 모듈 인터페이스
///
/// [`ModuleHooks`]를 구현한 훅을 가진 [`Module`]은 자동으로 구현됩니다.
pub trait DynModule: Send {
    fn name(&self) -> &str;
    fn help(&self) -> &str;
    fn enter_table(&mut self, fqn: &str, idx: usize) -> bool;
    fn apply_value(&mut self, fqn: &str, v: &Value) -> bool;
    fn exit_table(&mut self, fqn: &str, idx: usize) -> bool;
    fn enable_trace(&self);
    fn sum_stats(&mut self, accumulate_now: bool);
    fn reset_stats(&mut self);
    fn try_global_count(&self, name: &str) -> Option<PegCount>;
    fn show_stats(&self, out: &mut dyn StatsFormatter) -> Result<(), ModkitError>;
}

impl<H: ModuleHooks + Send> DynModule for Module<H> {
    fn name(&self) -> &str {
        Module::name(self)
    }

    fn help(&self) -> &str {
        Module::help(self)
    }

    fn enter_table(&mut self, fqn: &str, idx: usize) -> bool {
        Module::enter_table(self, fqn, idx)
    }

    fn apply_value(&mut self, fqn: &str, v: &Value) -> bool {
        Module::apply_value(self, fqn, v)
    }

    fn exit_table(&mut self, fqn: &str, idx: usize) -> bool {
        Module::exit_table(self, fqn, idx)
    }

    fn enable_trace(&self) {
        Module::enable_trace(self);
    }

    fn sum_stats(&mut self, accumulate_now: bool) {
        Module::sum_stats(self, accumulate_now);
    }

    fn reset_stats(&mut self) {
        Module::reset_stats(self);
    }

    fn try_global_count(&self, name: &str) -> Option<PegCount> {
        Module::try_global_count(self, name)
    }

    fn show_stats(&self, out: &mut dyn StatsFormatter) -> Result<(), ModkitError> {
        Module::show_stats(self, out)
    }
}

/// 모듈 레지스트리
pub struct ModuleRegistry {
    modules: Vec<Box<dyn DynModule>>,
}

impl ModuleRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// 모듈을 등록합니다. 같은 이름이 이미 있으면 에러를 반환합니다.
    pub fn register(&mut self, module: Box<dyn DynModule>) -> Result<(), ModkitError> {
        let name = module.name().to_owned();
        if self.modules.iter().any(|m| m.name() == name) {
            return Err(RegistryError::AlreadyRegistered { name }.into());
        }
        debug!(module = %name, "module registered");
        self.modules.push(module);
        self.publish_count();
        Ok(())
    }

    /// 모듈을 해제하고 소유권을 반환합니다.
    pub fn unregister(&mut self, name: &str) -> Result<Box<dyn DynModule>, ModkitError> {
        let pos = self.modules.iter().position(|m| m.name() == name);
        match pos {
            Some(idx) => {
                let module = self.modules.remove(idx);
                self.publish_count();
                Ok(module)
            }
            None => Err(RegistryError::NotFound {
                name: name.to_owned(),
            }
            .into()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn DynModule> {
        self.modules
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut dyn DynModule> {
        for module in &mut self.modules {
            if module.name() == name {
                return Some(&mut **module);
            }
        }
        None
    }

    /// 등록된 모듈 수
    pub fn count(&self) -> usize {
        self.modules.len()
    }

    /// 등록 순서대로 모듈 이름을 반환합니다.
    pub fn list(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// 런타임 설정을 적용합니다. 현재는 `trace.enable_all`만 해당합니다.
    pub fn apply_config(&self, config: &ModkitConfig) {
        if config.trace.enable_all {
            self.enable_trace_all();
        }
    }

    /// 모든 모듈의 트레이스 비트를 켭니다.
    pub fn enable_trace_all(&self) {
        for module in &self.modules {
            module.enable_trace();
        }
        info!(modules = self.modules.len(), "trace enabled for all modules");
    }

    /// 모든 모듈의 라이브 카운터를 누적 값에 합칩니다.
    pub fn sum_all(&mut self, config: &StatsConfig) {
        for module in &mut self.modules {
            module.sum_stats(config.accumulate_now_stats);
        }
    }

    /// 모든 모듈의 누적 값을 0으로 만듭니다.
    pub fn reset_all(&mut self) {
        for module in &mut self.modules {
            module.reset_stats();
        }
    }

    /// 등록 순서대로 모든 모듈의 통계를 출력합니다.
    ///
    /// 첫 번째 출력 실패에서 즉시 반환합니다.
    pub fn show_all(&self, out: &mut dyn StatsFormatter) -> Result<(), ModkitError> {
        for module in &self.modules {
            module.show_stats(out)?;
        }
        Ok(())
    }

    /// `[stats]` 설정이 지정한 형식으로 모든 모듈의 통계를 `out`에 출력합니다.
    pub fn show_configured<W: std::io::Write>(
        &self,
        config: &StatsConfig,
        out: W,
    ) -> Result<(), ModkitError> {
        let mut formatter = format::from_config(config, out)?;
        self.show_all(formatter.as_mut())
    }

    fn publish_count(&self) {
        #[allow(clippy::cast_precision_loss)]
        {
            metrics::gauge!(m::MODULES_REGISTERED).set(self.modules.len() as f64);
        }
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
