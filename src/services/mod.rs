pub mod scripting;

pub use scripting::ScriptSandbox;
