//! # MJML Studio
//!
//! Builds responsive HTML emails for many independent projects from one
//! workspace. Each project keeps its own MJML templates, shared components
//! and metadata; one run compiles every template of every project (or of a
//! single project) into a mirrored tree of `.html` files.
//!
//! # Pipeline
//!
//! ```text
//! projects/<id>/templates/**/*.mjml
//!     → locate    (walk the template root)
//!     → compiler  (mjml transform, soft validation)
//!     → writer    (dist/<id>/**/*.html)
//!     → pipeline  (tally successes, file errors, project errors)
//! ```
//!
//! A run keeps going past every failure it can. A broken template is counted
//! and skipped; a project without a template root is counted and skipped.
//! Only when nothing can run at all (no projects directory, unknown
//! `--project`) does the build stop before compiling. The exit status is 0
//! only if nothing failed anywhere.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `studio.toml` loading, stock defaults, merging, validation |
//! | [`registry`] | Workspace layout, project enumeration, `project.json` metadata |
//! | [`locate`] | Recursive template discovery under a template root |
//! | [`compiler`] | The [`compiler::Transform`] seam and the `mjml` CLI backend |
//! | [`writer`] | Output path mapping and file persistence |
//! | [`pipeline`] | Build orchestration, tallies, progress events, dry-run check |
//! | [`ses`] | AWS SES template documents from compiled HTML |
//! | [`types`] | Serialized project metadata (`ProjectMeta`) |
//! | [`output`] | CLI output formatting |
//! | [`logger`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## External Compiler
//!
//! MJML itself is not reimplemented. The [`compiler::MjmlCli`] backend runs
//! the reference `mjml` command once per template, feeding the source on
//! stdin. Everything above it talks to the [`compiler::Transform`] trait, so
//! tests drive the whole pipeline with a deterministic mock and no Node
//! installation.
//!
//! ## Components Are Not Templates
//!
//! Only files under `templates/` are compiled. `components/` holds fragments
//! pulled in with `<mj-include>`; the compiler resolves those relative to the
//! template's own path, which is why every transform call carries the source
//! path.
//!
//! ## Full Rebuilds
//!
//! There is no cache. Every run rewrites every output file, so two runs over
//! the same input produce the same bytes.

pub mod compiler;
pub mod config;
pub mod locate;
pub mod logger;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod ses;
pub mod types;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
