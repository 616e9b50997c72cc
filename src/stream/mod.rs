/// Reactive stream engines for the dashboard's dependency graph.
///
/// ```text
/// stream
/// ├── replay   — retained-value multicast cell (publish / subscribe)
/// ├── cascade  — dependent collection fetches with supersession
/// ├── derived  — terminal keyed fetches with supersession
/// └── resolver — id → entity recombination over two inputs
/// ```
///
/// Each engine runs as one cooperative task owning its loading flag and
/// result slot; nothing here requires a lock.

pub mod cascade;
pub mod derived;
pub mod replay;
pub mod resolver;

pub use cascade::spawn_cascade;
pub use derived::spawn_derived;
pub use replay::{ReplayCache, ReplayStream};
pub use resolver::spawn_resolver;
