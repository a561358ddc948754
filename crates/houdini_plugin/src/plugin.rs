use std::{any::Any, borrow::Cow, fmt::Debug, sync::Arc};

use async_trait::async_trait;
use houdini_common::{ModuleType, ResolvedId};
use houdini_utils::pretty_type_name::pretty_type_name;

use crate::{HookLoadArgs, HookLoadOutput, HookResolveIdArgs, ParserHooks, PluginContext};

pub type HookNoopReturn = anyhow::Result<()>;
pub type HookResolveIdReturn = anyhow::Result<Option<ResolvedId>>;
pub type HookLoadReturn = anyhow::Result<Option<HookLoadOutput>>;

#[async_trait]
pub trait Plugin: Any + Debug + Send + Sync + 'static {
  /// Plugins are looked up by this name when they are forwarded to a child compiler.
  fn name(&self) -> Cow<'static, str> {
    pretty_type_name::<Self>()
  }

  /// Called once per build, before any module is resolved.
  async fn build_start(&self, _ctx: &PluginContext) -> HookNoopReturn {
    Ok(())
  }

  /// Called once per build for every javascript dialect.
  fn register_parser_hooks(
    &self,
    _ctx: &PluginContext,
    _module_type: ModuleType,
    _hooks: &mut ParserHooks,
  ) {
  }

  async fn resolve_id(
    &self,
    _ctx: &PluginContext,
    _args: &HookResolveIdArgs<'_>,
  ) -> HookResolveIdReturn {
    Ok(None)
  }

  async fn load(&self, _ctx: &PluginContext, _args: &HookLoadArgs<'_>) -> HookLoadReturn {
    Ok(None)
  }
}

pub type SharedPlugin = Arc<dyn Plugin>;
