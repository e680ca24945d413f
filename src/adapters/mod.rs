// Adapters layer: concrete implementations of the domain ports (process, http, console, lang).

pub mod composer;
pub mod console;
pub mod gateway;
pub mod lang;

pub use composer::ComposerProcess;
pub use console::{BufferedReporter, ConsoleReporter, OutputKind};
pub use gateway::UpdateGateway;
pub use lang::Lang;
