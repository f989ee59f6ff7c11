pub mod console;
pub mod levels;
pub mod state;
