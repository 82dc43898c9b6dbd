//! Configuration section definitions.
//!
//! Each module corresponds to a section in `mdxroute.toml`:
//!
//! | Module    | TOML Section  | Purpose                                  |
//! |-----------|---------------|------------------------------------------|
//! | `routes`  | `[routes]`    | App directory, content root and glob     |
//! | `compile` | `[compile]`   | Cache location, import resolution, runtime |
//! | `watch`   | `[watch]`     | Watcher debounce                         |

mod compile;
mod routes;
mod watch;

pub use compile::CompileConfig;
pub use routes::RoutesConfig;
pub use watch::WatchConfig;
