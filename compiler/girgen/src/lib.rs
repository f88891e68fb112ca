//! girgen - Binding Generator Driver
//!
//! Wires the descriptor model and the synthesizer into a generation run:
//!
//! 1. [`Config`] supplies the block list, rename table and C includes.
//! 2. [`GenState`] restores the id counters into a [`Session`].
//! 3. [`closure`] resolves the namespace's transitive dependencies once.
//! 4. [`generate_namespace`] visits free functions, then every declared type
//!    entity with its members, in metadata order.
//! 5. The updated counters are persisted for the next run.
//!
//! The driver writes no source files. [`NamespaceOutput`] holds the generated
//! text and the import set; placing it on disk is the caller's concern.
//!
//! # Tracing
//!
//! Call [`init_tracing`] once at startup, then enable output with
//! `RUST_LOG=girgen=debug` or `RUST_LOG=gir_codegen=trace`.

mod config;
mod deps;
mod error;
mod memory;
mod output;
mod state;

use std::path::Path;
use std::sync::Once;

use gir_codegen::{type_getter, LookupHint, Metrics, Session, Synthesizer, TypeNamer};
use gir_ir::{split_namespace_id, NamespaceEntity, Repository, RepositoryError};
use tracing::{debug, info};

pub use config::Config;
pub use deps::closure;
pub use error::GenError;
pub use memory::MemoryRepository;
pub use output::{NamespaceOutput, GIR_IMPORT_ROOT};
pub use state::GenState;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Generate every wrapper of the namespace `ns_id` (`Gtk-3.0`, or a bare name).
///
/// Ids are drawn from `session`, so several namespaces generated with one
/// session never share an id. Failing to load the namespace or any member of
/// its dependency closure aborts before any id is consumed.
#[tracing::instrument(level = "debug", skip_all, fields(namespace = ns_id))]
pub fn generate_namespace<R: Repository + ?Sized>(
    repo: &R,
    ns_id: &str,
    config: &Config,
    session: &mut Session,
) -> Result<NamespaceOutput, GenError> {
    let ns = load_root(repo, ns_id)?;
    let deps = closure(repo, ns_id)?;
    debug!(deps = deps.len(), "dependency closure resolved");

    let policy = config.policy();
    let mut namer = TypeNamer::new(ns.name.as_str(), deps);
    let before = session.metrics();
    let mut blocks = Vec::new();

    let mut synth = Synthesizer::new(&mut namer, &policy, session);
    for (index, func) in ns.functions.iter().enumerate() {
        blocks.push(synth.synthesize(func, LookupHint::free(index)).block);
    }
    for (type_index, entity) in ns.types.iter().enumerate() {
        if let Some(getter) = type_getter(synth.session(), entity) {
            blocks.push(getter);
        }
        for (member_index, func) in entity.functions.iter().enumerate() {
            let hint = LookupHint::member(type_index, member_index);
            blocks.push(synth.synthesize(func, hint).block);
        }
    }
    let metrics = metrics_since(before, synth.session().metrics());

    info!(
        namespace = %ns.name,
        functions = metrics.functions,
        incomplete = metrics.incomplete,
        skipped = metrics.skipped,
        type_getters = metrics.type_getters,
        "namespace generated"
    );

    Ok(NamespaceOutput {
        namespace: ns.name.clone(),
        blocks,
        imports: namer.imports().clone(),
        c_includes: config.c_includes.clone(),
        metrics,
    })
}

/// One complete run: load state, generate `ns_id`, save state.
///
/// State is only written after generation succeeds.
pub fn run<R: Repository + ?Sized>(
    repo: &R,
    ns_id: &str,
    config: &Config,
    state_path: &Path,
) -> Result<NamespaceOutput, GenError> {
    let (name, _) = split_namespace_id(ns_id);
    let state = GenState::load(state_path)?;
    state.note_namespace(name);

    let mut session = Session::new(state.counters());
    let output = generate_namespace(repo, ns_id, config, &mut session)?;

    GenState::new(name, session.counters()).save(state_path)?;
    Ok(output)
}

fn load_root<'r, R: Repository + ?Sized>(
    repo: &'r R,
    ns_id: &str,
) -> Result<&'r NamespaceEntity, GenError> {
    match split_namespace_id(ns_id) {
        (name, Some(version)) => Ok(repo.require(name, version)?),
        (name, None) => repo.namespace(name).ok_or_else(|| {
            GenError::from(RepositoryError::NotFound {
                namespace: name.to_string(),
            })
        }),
    }
}

fn metrics_since(before: Metrics, after: Metrics) -> Metrics {
    Metrics {
        functions: after.functions - before.functions,
        incomplete: after.incomplete - before.incomplete,
        skipped: after.skipped - before.skipped,
        type_getters: after.type_getters - before.type_getters,
    }
}
