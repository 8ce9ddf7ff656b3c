pub mod commands;
pub mod config;
pub mod engine;
pub mod gesture;
pub mod input;
pub mod mutator;

pub use commands::{Command, CommandStack, ConnectionEdit, UndoLog};
pub use config::EngineConfig;
pub use engine::{ConnectCallback, ConnectionEngine, ContextAction};
pub use gesture::{ConnectGesture, GesturePhase, ReleaseOutcome};
pub use input::{InputEvent, Modifiers, MouseButton};
pub use mutator::{ConnectionMutator, Link, connection_count};
