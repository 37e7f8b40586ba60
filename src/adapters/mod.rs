// Adapters layer: concrete implementations of the domain ports (process spawning, terminal I/O).

pub mod process;
pub mod terminal;

pub use process::SystemRunner;
pub use terminal::TerminalConsole;
