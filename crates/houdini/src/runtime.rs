use houdini_common::RuntimeGlobals;
use houdini_utils::{concat_string, ecmascript::to_js_string_literal};

pub struct RuntimeRenderArgs<'a> {
  /// `function (module, exports, __houdini_require__) { ... }` entries keyed by stable id.
  pub modules: &'a [(&'a str, &'a str)],
  pub entry: &'a str,
  pub global_object: &'a str,
  pub public_path: &'a str,
  /// Number of directories between the output directory and the chunk. Used by `auto` public paths.
  pub chunk_depth: usize,
}

/// Renders a chunk: an IIFE receiving the global object, holding every module of the chunk and
/// the `__houdini_require__` runtime.
pub fn render_runtime(args: &RuntimeRenderArgs) -> String {
  let require = RuntimeGlobals::REQUIRE;
  let mut code = String::from("(function (__houdini_global__) {\n  var __houdini_modules__ = {\n");
  for (stable_id, module) in args.modules {
    code.push_str(&concat_string!("    ", to_js_string_literal(stable_id), ": ", module, ",\n"));
  }
  code.push_str("  };\n  var __houdini_module_cache__ = {};\n");
  code.push_str(&concat_string!(
    "  function ",
    require,
    "(id) {\n",
    "    var cached = __houdini_module_cache__[id];\n",
    "    if (cached !== undefined) return cached.exports;\n",
    "    var module = (__houdini_module_cache__[id] = { exports: {} });\n",
    "    __houdini_modules__[id].call(module.exports, module, module.exports, ",
    require,
    ");\n",
    "    return module.exports;\n",
    "  }\n"
  ));
  let public_path = render_public_path(args);
  code.push_str(&concat_string!("  ", RuntimeGlobals::PUBLIC_PATH, " = ", public_path, ";\n"));
  code.push_str(&concat_string!("  ", RuntimeGlobals::GLOBAL, " = __houdini_global__;\n"));
  code.push_str(HELPERS);
  code.push_str(&concat_string!("  ", require, "(", to_js_string_literal(args.entry), ");\n"));
  code.push_str(&concat_string!("})(", args.global_object, ");\n"));
  code
}

fn render_public_path(args: &RuntimeRenderArgs) -> String {
  if args.public_path != "auto" {
    return to_js_string_literal(args.public_path);
  }
  let up = "../".repeat(args.chunk_depth);
  concat_string!(
    "(function () {\n",
    "    var script = __houdini_global__.document && __houdini_global__.document.currentScript;\n",
    "    var location = __houdini_global__.location;\n",
    "    var url = script ? script.src : (location && location.href) || \"\";\n",
    "    return url.replace(/[?#].*$/, \"\").replace(/[^\\/]*$/, \"\") + ",
    to_js_string_literal(&up),
    ";\n",
    "  })()"
  )
}

const HELPERS: &str = r#"  __houdini_require__.r = function (exports) {
    if (typeof Symbol !== "undefined" && Symbol.toStringTag) {
      Object.defineProperty(exports, Symbol.toStringTag, { value: "Module" });
    }
    Object.defineProperty(exports, "__esModule", { value: true });
  };
  __houdini_require__.e = function (exports, getters) {
    for (var key in getters) {
      if (!Object.prototype.hasOwnProperty.call(exports, key)) {
        Object.defineProperty(exports, key, { enumerable: true, get: getters[key] });
      }
    }
  };
  __houdini_require__.d = function (module) {
    return module && module.__esModule ? module["default"] : module;
  };
  __houdini_require__.s = function (exports, from) {
    Object.keys(from).forEach(function (key) {
      if (key !== "default" && !Object.prototype.hasOwnProperty.call(exports, key)) {
        Object.defineProperty(exports, key, {
          enumerable: true,
          get: function () { return from[key]; }
        });
      }
    });
  };
  __houdini_require__.w = function (url) {
    return WebAssembly.compileStreaming(fetch(url));
  };
"#;

#[test]
fn test_render_runtime() {
  let modules =
    [("./main.js", "function (module, exports, __houdini_require__) {\nconsole.log(1);\n}")];
  let code = render_runtime(&RuntimeRenderArgs {
    modules: &modules,
    entry: "./main.js",
    global_object: "self",
    public_path: "/static/",
    chunk_depth: 0,
  });
  assert!(code.starts_with("(function (__houdini_global__) {\n"));
  assert!(code.contains("    \"./main.js\": function (module, exports, __houdini_require__) {\n"));
  assert!(code.contains("  __houdini_require__.p = \"/static/\";\n"));
  assert!(code.ends_with("  __houdini_require__(\"./main.js\");\n})(self);\n"));
}

#[test]
fn test_auto_public_path_walks_up_from_the_chunk() {
  let code = render_runtime(&RuntimeRenderArgs {
    modules: &[],
    entry: "./main.js",
    global_object: "window",
    public_path: "auto",
    chunk_depth: 2,
  });
  assert!(code.contains("document.currentScript"));
  assert!(code.contains("+ \"../../\";"));
}
