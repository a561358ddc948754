use std::sync::Arc;

use houdini_common::ModuleType;
use rustc_hash::FxHashMap;

use crate::{
  HookLoadArgs, HookLoadReturn, HookNoopReturn, HookResolveIdArgs, HookResolveIdReturn,
  ParserHooks, PluginContext, SharedPlugin,
};

pub type SharedPluginDriver = Arc<PluginDriver>;

#[derive(Debug)]
pub struct PluginDriver {
  plugins: Vec<SharedPlugin>,
  ctx: PluginContext,
  parser_hooks: FxHashMap<ModuleType, ParserHooks>,
}

impl PluginDriver {
  pub fn new_shared(ctx: PluginContext) -> SharedPluginDriver {
    let plugins = ctx.plugins().to_vec();
    let parser_hooks = ModuleType::javascript_dialects()
      .into_iter()
      .map(|module_type| {
        let mut hooks = ParserHooks::default();
        for plugin in &plugins {
          plugin.register_parser_hooks(&ctx, module_type, &mut hooks);
        }
        (module_type, hooks)
      })
      .collect();
    Arc::new(Self { plugins, ctx, parser_hooks })
  }

  pub fn context(&self) -> &PluginContext {
    &self.ctx
  }

  pub fn plugins(&self) -> &[SharedPlugin] {
    &self.plugins
  }

  /// `None` if no plugin tapped into the parser of `module_type`.
  pub fn parser_hooks(&self, module_type: ModuleType) -> Option<&ParserHooks> {
    self.parser_hooks.get(&module_type).filter(|hooks| !hooks.is_empty())
  }

  pub async fn build_start(&self) -> HookNoopReturn {
    for plugin in &self.plugins {
      plugin.build_start(&self.ctx).await?;
    }
    Ok(())
  }

  /// The first plugin returning `Some` wins.
  pub async fn resolve_id(&self, args: &HookResolveIdArgs<'_>) -> HookResolveIdReturn {
    for plugin in &self.plugins {
      if let Some(resolved) = plugin.resolve_id(&self.ctx, args).await? {
        return Ok(Some(resolved));
      }
    }
    Ok(None)
  }

  /// The first plugin returning `Some` wins.
  pub async fn load(&self, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    for plugin in &self.plugins {
      if let Some(output) = plugin.load(&self.ctx, args).await? {
        return Ok(Some(output));
      }
    }
    Ok(None)
  }
}
