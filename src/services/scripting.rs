//! Script sandbox
//!
//! Scripts are WebAssembly modules (text or binary) run by wasmtime. They can
//! import two host functions from the `env` module:
//!
//! - `button(ptr, len) -> state`: draws a button described by a JSON object in
//!   linear memory and returns its state bits (1 = hovered, 2 = pressed,
//!   4 = clicked). Malformed descriptions trap, aborting only that call.
//! - `log(ptr, len)`: writes a UTF-8 message to the diagnostic log.
//!
//! Failures never reach the caller: they are logged and a neutral value is
//! returned instead.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use wasmtime::{Caller, Engine, Instance, Linker, Module, Store, TypedFunc, WasmParams, WasmResults};

use crate::core::fonts::FontHandle;
use crate::ui::buttons::{render_button, Button, ButtonState};
use crate::ui::canvas::{Canvas, MAX_CORNER_SEGMENTS};
use crate::ui::scaling::FrameContext;

const DIAGNOSTICS_SCRIPT: &str = include_str!("../../scripts/diagnostics.wat");
const BUTTON_DEMO_SCRIPT: &str = include_str!("../../scripts/button_demo.wat");

/// Exported by scripts that want a one-time setup call after instantiation
const INIT_EXPORT: &str = "init";

const STATE_HOVERED: i32 = 1;
const STATE_PRESSED: i32 = 2;
const STATE_CLICKED: i32 = 4;

/// Button description accepted from scripts.
///
/// `x`, `y`, `width`, `height` and `text` are required, the rest fall back to
/// documented defaults. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScriptButton {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    #[serde(default = "ScriptButton::default_font_size")]
    pub font_size: f32,
    #[serde(default = "ScriptButton::default_border_width")]
    pub border_width: f32,
    #[serde(default = "ScriptButton::default_border_radius")]
    pub border_radius: f32,
    #[serde(default = "ScriptButton::default_segments")]
    pub segments: i32,
    #[serde(default = "ScriptButton::default_use_roboto")]
    pub use_roboto: bool,
}

impl ScriptButton {
    fn default_font_size() -> f32 {
        56.0
    }

    fn default_border_width() -> f32 {
        2.0
    }

    fn default_border_radius() -> f32 {
        0.3
    }

    fn default_segments() -> i32 {
        16
    }

    fn default_use_roboto() -> bool {
        true
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let button: Self = serde_json::from_slice(bytes).context("invalid button description")?;
        button.validate()?;
        Ok(button)
    }

    pub fn validate(&self) -> Result<()> {
        let numbers = [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("fontSize", self.font_size),
            ("borderWidth", self.border_width),
            ("borderRadius", self.border_radius),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            bail!("button.{} must be a finite number", name);
        }
        if self.width < 0.0 || self.height < 0.0 {
            bail!("button size must not be negative");
        }
        if self.font_size <= 0.0 {
            bail!("button.fontSize must be positive");
        }
        if self.border_width < 0.0 {
            bail!("button.borderWidth must not be negative");
        }
        if !(0.0..=1.0).contains(&self.border_radius) {
            bail!("button.borderRadius must be within 0..=1");
        }
        if self.segments < 0 || self.segments as usize > MAX_CORNER_SEGMENTS {
            bail!("button.segments must be within 0..={}", MAX_CORNER_SEGMENTS);
        }
        Ok(())
    }

    /// Builds the widget description with the default button palette
    pub fn to_button(&self, font: Option<FontHandle>) -> Button {
        let mut button = Button::new(self.text.clone(), self.x, self.y, self.width, self.height)
            .with_font_size(self.font_size)
            .with_rounding(self.border_radius, self.segments);
        button.border_width = self.border_width;
        if self.use_roboto {
            button.font = font;
        }
        button
    }
}

impl ButtonState {
    pub fn to_bits(self) -> i32 {
        let mut bits = 0;
        if self.hovered {
            bits |= STATE_HOVERED;
        }
        if self.pressed {
            bits |= STATE_PRESSED;
        }
        if self.clicked {
            bits |= STATE_CLICKED;
        }
        bits
    }

    pub fn from_bits(bits: i32) -> Self {
        Self {
            hovered: bits & STATE_HOVERED != 0,
            pressed: bits & STATE_PRESSED != 0,
            clicked: bits & STATE_CLICKED != 0,
        }
    }
}

/// Host-side state visible to `env` imports
pub struct SandboxState {
    frame: FrameContext,
    /// Only set while a script button function is running
    canvas: Option<Box<dyn Canvas + Send>>,
    font: Option<FontHandle>,
}

impl SandboxState {
    fn render(&mut self, desc: &ScriptButton) -> Result<ButtonState> {
        let frame = self.frame;
        let btn = desc.to_button(self.font.clone());
        let canvas = self
            .canvas
            .as_mut()
            .ok_or_else(|| anyhow!("button() can only be called while a frame is drawn"))?;
        Ok(render_button(&frame, canvas.as_mut(), &btn))
    }
}

struct LoadedScript {
    name: String,
    instance: Instance,
}

struct Runtime {
    engine: Engine,
    linker: Linker<SandboxState>,
    store: Store<SandboxState>,
    scripts: Vec<LoadedScript>,
}

pub struct ScriptSandbox {
    runtime: Option<Runtime>,
}

impl ScriptSandbox {
    /// Creates the runtime and evaluates the bootstrap scripts.
    ///
    /// Bootstrap failures are logged; only runtime creation itself can fail.
    pub fn new(font: Option<FontHandle>) -> Result<Self> {
        let engine = Engine::new(&wasmtime::Config::default())
            .map_err(|e| anyhow!("failed to create script engine: {e:#}"))?;
        let mut linker = Linker::new(&engine);
        linker.func_wrap("env", "button", host_button)?;
        linker.func_wrap("env", "log", host_log)?;

        let store = Store::new(
            &engine,
            SandboxState {
                frame: FrameContext::default(),
                canvas: None,
                font,
            },
        );

        let mut sandbox = Self {
            runtime: Some(Runtime {
                engine,
                linker,
                store,
                scripts: Vec::new(),
            }),
        };

        for (name, source) in [
            ("diagnostics", DIAGNOSTICS_SCRIPT),
            ("button_demo", BUTTON_DEMO_SCRIPT),
        ] {
            if let Err(e) = sandbox.load_script(name, source) {
                log::error!("❌ Ошибка скрипта {}: {:#}", name, e);
            }
        }

        Ok(sandbox)
    }

    /// Compiles and instantiates a script, then calls its `init` export if any
    pub fn load_script(&mut self, name: &str, source: impl AsRef<[u8]>) -> Result<()> {
        let rt = self.runtime.as_mut().context("script runtime is shut down")?;

        let module = Module::new(&rt.engine, source)
            .with_context(|| format!("failed to compile script '{}'", name))?;
        let instance = rt
            .linker
            .instantiate(&mut rt.store, &module)
            .with_context(|| format!("failed to instantiate script '{}'", name))?;

        if let Ok(init) = instance.get_typed_func::<(), ()>(&mut rt.store, INIT_EXPORT) {
            init.call(&mut rt.store, ())
                .with_context(|| format!("script '{}' failed in init", name))?;
        }

        rt.scripts.push(LoadedScript {
            name: name.to_owned(),
            instance,
        });
        log::info!("📜 Скрипт {} загружен", name);
        Ok(())
    }

    /// Loads every `.wat`/`.wasm` file in `dir` in name order.
    ///
    /// Returns the number of scripts that loaded; failures are logged.
    pub fn load_scripts_dir(&mut self, dir: &Path) -> usize {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Не удалось прочитать каталог скриптов {}: {}", dir.display(), e);
                return 0;
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("wat") | Some("wasm")
                )
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("script")
                .to_owned();
            let result = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))
                .and_then(|bytes| self.load_script(&name, bytes));
            match result {
                Ok(()) => loaded += 1,
                Err(e) => log::error!("❌ Ошибка скрипта {}: {:#}", name, e),
            }
        }
        loaded
    }

    pub fn is_running(&self) -> bool {
        self.runtime.is_some()
    }

    /// Calls a `() -> (ptr, len)` function and reads the UTF-8 string it points at
    pub fn call_string(&mut self, name: &str) -> Option<String> {
        let rt = self.runtime.as_mut()?;
        let (instance, func) = find_func::<(), (i32, i32)>(rt, name)?;
        let result = func.call(&mut rt.store, ()).and_then(|(ptr, len)| {
            let memory = instance
                .get_memory(&mut rt.store, "memory")
                .context("script does not export memory")?;
            let bytes = guest_slice(memory.data(&rt.store), ptr, len)?;
            Ok(String::from_utf8(bytes.to_vec())?)
        });
        log_failure(name, result)
    }

    /// Calls a `(f64, f64) -> f64` function, 0.0 on failure
    pub fn call_math(&mut self, name: &str, a: f64, b: f64) -> f64 {
        let Some(rt) = self.runtime.as_mut() else {
            return 0.0;
        };
        let Some((_, func)) = find_func::<(f64, f64), f64>(rt, name) else {
            return 0.0;
        };
        log_failure(name, func.call(&mut rt.store, (a, b))).unwrap_or(0.0)
    }

    /// Calls a `() -> state` function that draws through `button()`.
    ///
    /// `canvas` is only reachable from the script for the duration of the call.
    pub fn call_button(
        &mut self,
        name: &str,
        frame: &FrameContext,
        canvas: Box<dyn Canvas + Send>,
    ) -> ButtonState {
        let Some(rt) = self.runtime.as_mut() else {
            return ButtonState::default();
        };
        let Some((_, func)) = find_func::<(), i32>(rt, name) else {
            return ButtonState::default();
        };

        {
            let state = rt.store.data_mut();
            state.frame = *frame;
            state.canvas = Some(canvas);
        }
        let result = func.call(&mut rt.store, ());
        rt.store.data_mut().canvas = None;

        log_failure(name, result)
            .map(ButtonState::from_bits)
            .unwrap_or_default()
    }

    /// Names of the loaded scripts, in load order
    pub fn script_names(&self) -> Vec<&str> {
        self.runtime
            .as_ref()
            .map(|rt| rt.scripts.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Releases the runtime. Later calls return neutral values.
    pub fn shutdown(&mut self) {
        if self.runtime.take().is_some() {
            log::info!("Скриптовая среда остановлена");
        }
    }
}

/// Finds an export by name, later scripts shadowing earlier ones
fn find_func<Params, Results>(
    rt: &mut Runtime,
    name: &str,
) -> Option<(Instance, TypedFunc<Params, Results>)>
where
    Params: WasmParams,
    Results: WasmResults,
{
    let Runtime { store, scripts, .. } = rt;
    let script = scripts
        .iter()
        .rev()
        .find(|s| s.instance.get_func(&mut *store, name).is_some());
    let Some(script) = script else {
        log::error!("Функция {} не найдена в скриптах", name);
        return None;
    };

    match script.instance.get_typed_func::<Params, Results>(&mut *store, name) {
        Ok(func) => Some((script.instance, func)),
        Err(e) => {
            log::error!("Функция {} в скрипте {} имеет другую сигнатуру: {:#}", name, script.name, e);
            None
        }
    }
}

fn log_failure<T>(name: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("❌ Ошибка при вызове {}: {:#}", name, e);
            None
        }
    }
}

fn guest_slice(data: &[u8], ptr: i32, len: i32) -> Result<&[u8]> {
    let start = ptr as u32 as usize;
    let end = start
        .checked_add(len as u32 as usize)
        .filter(|&end| end <= data.len())
        .with_context(|| format!("range {}+{} is outside script memory", ptr, len))?;
    Ok(&data[start..end])
}

fn read_guest_bytes(caller: &mut Caller<'_, SandboxState>, ptr: i32, len: i32) -> Result<Vec<u8>> {
    let memory = caller
        .get_export("memory")
        .and_then(|e| e.into_memory())
        .context("script does not export memory")?;
    Ok(guest_slice(memory.data(&*caller), ptr, len)?.to_vec())
}

fn host_button(mut caller: Caller<'_, SandboxState>, ptr: i32, len: i32) -> Result<i32> {
    let bytes = read_guest_bytes(&mut caller, ptr, len)?;
    let desc = ScriptButton::from_json(&bytes)?;
    let state = caller.data_mut().render(&desc)?;
    Ok(state.to_bits())
}

fn host_log(mut caller: Caller<'_, SandboxState>, ptr: i32, len: i32) -> Result<()> {
    let bytes = read_guest_bytes(&mut caller, ptr, len)?;
    log::info!("[script] {}", String::from_utf8_lossy(&bytes));
    Ok(())
}
